pub mod line_client;
