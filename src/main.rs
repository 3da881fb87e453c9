#![allow(non_snake_case)]

use std::env;

use calendarLinkBot::cli;
use calendarLinkBot::config::AppConfig;
use calendarLinkBot::runtime::{self, ApiSettings};
use calendarLinkBot::service::extractor::EventExtractor;
use calendarLinkBot::service::link_builder::CalendarLinkBuilder;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring config file: {}", e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    };

    let run_mode = config.run_mode();
    if run_mode == "api" {
        let settings = ApiSettings {
            channel_secret: config
                .require("LINE_CHANNEL_SECRET")
                .expect("LINE_CHANNEL_SECRET must be set for api mode"),
            access_token: config
                .require("LINE_CHANNEL_ACCESS_TOKEN")
                .expect("LINE_CHANNEL_ACCESS_TOKEN must be set for api mode"),
            bind_address: config.bind_address(),
            port: config.port().expect("PORT must be a port number"),
        };
        if let Err(e) = runtime::run_api(settings).await {
            log::error!("Server error: {}", e);
        }
    } else if run_mode == "cli" {
        let extractor = EventExtractor::new().expect("Event patterns must compile");
        cli::cli(extractor, CalendarLinkBuilder::new());
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
