//! Traits describing provider capabilities and the shared error type.

use std::time::Duration;

use async_trait::async_trait;
use chrono::ParseError as ChronoParseError;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;

use crate::model::{Collection, Uprn};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while fetching or decoding a schedule.
pub enum BinsError {
    /// Request construction, network failure, request timeout, or non-success status.
    #[error("Transport error: {0}")]
    Transport(#[source] ReqwestError),
    /// The response body could not be read.
    #[error("Read error: {0}")]
    Read(#[source] ReqwestError),
    /// The payload is not valid JSON or does not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] JsonError),
    /// A scheduled start could not be parsed.
    #[error("Invalid scheduled start {value:?}: {source}")]
    Timestamp {
        /// Raw value sent upstream.
        value: String,
        /// Parser failure.
        source: ChronoParseError,
    },
    /// The caller's deadline elapsed before the schedule arrived.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    /// Input is not a decimal property reference.
    #[error("Invalid UPRN: {0:?}")]
    InvalidUprn(String),
}

#[async_trait]
/// Trait for backends that resolve a property to its collection schedule.
pub trait CollectionPort: Send + Sync {
    /// Fetch and normalize the collections for a property.
    ///
    /// # Errors
    ///
    /// Returns a [`BinsError`] when the request fails or the payload cannot be decoded.
    async fn collections(&self, uprn: Uprn) -> Result<Vec<Collection>, BinsError>;
}
