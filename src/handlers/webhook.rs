use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::clients::line_client::ReplySender;
use crate::error::BotResult;
use crate::handlers::signature::check_signature;
use crate::service::reply_service::ReplyService;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub reply_token: Option<String>,
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

impl WebhookEvent {
    /// `(reply_token, text)` for text messages that can be answered.
    pub fn text_message(&self) -> Option<(&str, &str)> {
        if self.kind != "message" {
            return None;
        }
        let message = self.message.as_ref()?;
        if message.kind != "text" {
            return None;
        }
        Some((self.reply_token.as_deref()?, message.text.as_deref()?))
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct WebhookHandler {
    channel_secret: String,
    replies: ReplyService,
    sender: Arc<dyn ReplySender>,
    clock: fn() -> NaiveDateTime,
}

impl WebhookHandler {
    pub fn new(channel_secret: String, replies: ReplyService, sender: Arc<dyn ReplySender>) -> Self {
        Self {
            channel_secret,
            replies,
            sender,
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Verifies and dispatches one webhook delivery. Returns how many replies
    /// were sent successfully.
    pub async fn handle(&self, signature: Option<&str>, body: &[u8]) -> BotResult<usize> {
        check_signature(&self.channel_secret, body, signature)?;
        let payload: WebhookBody = serde_json::from_slice(body)?;

        let mut sent = 0;
        for event in &payload.events {
            let Some((reply_token, text)) = event.text_message() else {
                log::debug!("Ignoring webhook event of type {}", event.kind);
                continue;
            };
            let reply = self.replies.compose(text, (self.clock)());
            match self.sender.reply(reply_token, &reply).await {
                Ok(()) => sent += 1,
                Err(err) => log::warn!("Failed to send reply: {}", err),
            }
        }
        Ok(sent)
    }
}

pub fn routes(
    handler: Arc<WebhookHandler>,
) -> impl Filter<Extract = (warp::reply::Response,), Error = Rejection> + Clone {
    warp::post()
        .and(warp::path("callback"))
        .and(warp::path::end())
        .and(warp::header::optional::<String>(SIGNATURE_HEADER))
        .and(warp::body::bytes())
        .and(warp::any().map(move || handler.clone()))
        .and_then(callback)
}

pub async fn callback(
    signature: Option<String>,
    body: Bytes,
    handler: Arc<WebhookHandler>,
) -> Result<warp::reply::Response, Infallible> {
    match handler.handle(signature.as_deref(), &body).await {
        Ok(sent) => {
            log::info!("Webhook handled, {} replies sent", sent);
            Ok(warp::reply::with_status("OK", StatusCode::OK).into_response())
        }
        Err(err) => {
            log::warn!("Rejected webhook: {}", err);
            Ok(warp::reply::with_status("Bad Request", StatusCode::BAD_REQUEST).into_response())
        }
    }
}
