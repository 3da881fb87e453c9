//! Error types for the webhook and reply transport.
//!
//! The parsing core has no error type of its own; everything here belongs to
//! the adapters around it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Missing x-line-signature header")]
    MissingSignature,

    #[error("Webhook signature does not match the request body")]
    InvalidSignature,

    #[error("Invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LINE API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

pub type BotResult<T> = Result<T, BotError>;
