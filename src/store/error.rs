//! Store failures.

use crate::error::ErrorLocation;
use derive_more::{Display, Error};
use tracing::instrument;

/// The backing storage could not be read or written.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}", message, location)]
pub struct StoreError {
    /// What went wrong.
    pub message: String,
    /// Where it was raised.
    pub location: ErrorLocation,
}

impl StoreError {
    /// Creates an error located at the caller.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}
