// src/error.rs
// Error types for the operator client glue. The win evaluator itself never fails.

use std::path::PathBuf;

use crate::defs::{CardId, Number};

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("card {card_id}: column {column} has {len} cells, expected 5")]
    ColumnLength { card_id: CardId, column: char, len: usize },

    #[error("card {card_id}: number {number} is outside column {column} range")]
    OutOfRange { card_id: CardId, column: char, number: Number },

    #[error("card {card_id}: number {number} appears more than once")]
    Duplicate { card_id: CardId, number: Number },

    #[error("catalog contains card {0} twice")]
    DuplicateId(CardId),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context}: server returned {status} {body}")]
    Status {
        context: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("card number {0} is not between 1 and {max}", max = crate::defs::TOTAL_CARDS)]
    InvalidCardNumber(CardId),

    #[error("no cards selected")]
    EmptySelection,

    #[error("no shop id in session; log in first")]
    MissingShopId,

    #[error("invalid card: {0}")]
    Card(#[from] CardError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
