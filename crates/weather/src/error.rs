//! Weather provider error types.

use std::time::Duration;

use thiserror::Error;

/// Errors from a single upstream weather lookup.
///
/// These never leave [`WeatherClient::get_weather`](crate::WeatherClient::get_weather);
/// they are rendered into the `error` field of a failed
/// [`WeatherResult`](crate::WeatherResult).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The city argument was empty.
    #[error("city must not be empty")]
    InvalidCity,

    /// The upstream did not answer within the configured bound.
    #[error("timeout after {}s waiting for weather service", .0.as_secs_f32())]
    Timeout(Duration),

    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The upstream answered with a non-success status.
    #[error("weather service returned {0}")]
    Status(reqwest::StatusCode),

    /// The body was not the expected JSON.
    #[error("invalid weather response: {0}")]
    Decode(String),
}

/// Errors that stop the weather server itself.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The upstream base URL cannot carry a city path segment.
    #[error("invalid upstream url: {0}")]
    InvalidUpstream(String),

    /// The mount path for the MCP endpoint is unusable.
    #[error("invalid mount path '{0}': must start with '/'")]
    InvalidPath(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// An I/O error occurred (bind, serve).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
