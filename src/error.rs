use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Window start lies after its end.
    #[error("Invalid window: from {from} is after to {to}")]
    InvalidWindow {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    /// Status event at `index` is earlier than the one before it.
    #[error("Unsorted events: event {index} is earlier than its predecessor")]
    UnsortedEvents { index: usize },
}
