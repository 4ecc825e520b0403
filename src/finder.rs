//! Optional external quote finder.
//!
//! The finder locates a source quote inside one of the carrier documents so
//! a snippet can be attached to the embedding record. It is the only
//! component that performs I/O; every failure degrades to a warning and the
//! embedding itself never depends on it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request sent to the external similarity service.
#[derive(Debug, Serialize)]
pub struct FinderRequest<'a> {
    pub needle: &'a str,
    pub haystack: &'a [String],
}

/// Best-match response from the similarity service.
#[derive(Debug, Clone, Deserialize)]
pub struct FinderMatch {
    pub best_match: Option<String>,
    /// Index into the haystack; negative when nothing matched.
    pub index: i64,
    pub score: f64,
}

/// Failures of the quote finder, mapped to typed warnings upstream.
#[derive(Error, Debug)]
pub enum FinderError {
    /// Transport failure or non-2xx status.
    #[error("finder unavailable: {0}")]
    Unavailable(String),
    /// The service answered with something that is not a match record.
    #[error("finder returned a malformed response: {0}")]
    BadResponse(String),
}

/// Locates a source quote inside the carrier documents.
pub trait QuoteFinder {
    fn find(&self, needle: &str, haystack: &[String]) -> Result<FinderMatch, FinderError>;
}

/// HTTP finder speaking JSON to a configured endpoint.
pub struct HttpQuoteFinder {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpQuoteFinder {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FinderError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .map_err(|e| FinderError::Unavailable(format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl QuoteFinder for HttpQuoteFinder {
    fn find(&self, needle: &str, haystack: &[String]) -> Result<FinderMatch, FinderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&FinderRequest { needle, haystack })
            .send()
            .map_err(|e| FinderError::Unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(FinderError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }
        response
            .json::<FinderMatch>()
            .map_err(|e| FinderError::BadResponse(e.to_string()))
    }
}
