use async_trait::async_trait;
use serde::Serialize;

use crate::error::{BotError, BotResult};

pub const LINE_REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";

#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(&self, reply_token: &str, text: &str) -> BotResult<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

pub struct LineClient {
    access_token: String,
    endpoint: String,
    http: reqwest::Client,
}

impl LineClient {
    pub fn new(access_token: String) -> Self {
        Self::with_endpoint(access_token, LINE_REPLY_ENDPOINT.to_string())
    }

    pub fn with_endpoint(access_token: String, endpoint: String) -> Self {
        Self {
            access_token,
            endpoint,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply(&self, reply_token: &str, text: &str) -> BotResult<()> {
        let request = ReplyRequest {
            reply_token,
            messages: vec![TextMessage { kind: "text", text }],
        };
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
