use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::clients::line_client::LineClient;
use crate::error::{BotError, BotResult};
use crate::handlers::webhook::{self, WebhookHandler};
use crate::service::extractor::EventExtractor;
use crate::service::link_builder::CalendarLinkBuilder;
use crate::service::reply_service::{CalendarLinks, ReplyService};

pub struct ApiSettings {
    pub channel_secret: String,
    pub access_token: String,
    pub bind_address: String,
    pub port: u16,
}

impl ApiSettings {
    pub fn socket_addr(&self) -> BotResult<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| BotError::Config(format!("Invalid BIND_ADDRESS: {}", self.bind_address)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

pub async fn run_api(settings: ApiSettings) -> BotResult<()> {
    let addr = settings.socket_addr()?;
    let extractor = EventExtractor::new()?;
    let replies = ReplyService::new(Arc::new(CalendarLinks::new(
        extractor,
        CalendarLinkBuilder::new(),
    )));
    let sender = Arc::new(LineClient::new(settings.access_token));
    let handler = Arc::new(WebhookHandler::new(settings.channel_secret, replies, sender));

    log::info!("Listening for LINE webhooks on http://{}/callback", addr);
    warp::serve(webhook::routes(handler)).run(addr).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(bind_address: &str) -> ApiSettings {
        ApiSettings {
            channel_secret: "s".to_string(),
            access_token: "t".to_string(),
            bind_address: bind_address.to_string(),
            port: 8000,
        }
    }

    #[test]
    fn socket_addr_from_settings() {
        let addr = settings("127.0.0.1").socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn invalid_bind_address_is_config_error() {
        assert!(matches!(
            settings("localhost:80").socket_addr(),
            Err(BotError::Config(_))
        ));
    }
}
