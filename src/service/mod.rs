pub mod extractor;
pub mod link_builder;
pub mod reply_service;
