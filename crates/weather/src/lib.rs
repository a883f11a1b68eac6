//! Weather tool provider.
//!
//! Exposes one MCP operation, `get_weather`, over streamable HTTP. Each call
//! performs a single lookup against a public text/JSON weather service and
//! normalizes the answer into a fixed [`WeatherResult`] shape. Lookups never
//! fail past their own boundary: network errors, timeouts, bad statuses and
//! malformed bodies all come back as `{"ok": false, "error": ...}`.
//!
//! # Example
//!
//! ```no_run
//! use weather::{Units, WeatherClient};
//!
//! # async fn example() -> weather::Result<()> {
//! let client = WeatherClient::new()?;
//! let result = client.get_weather("Bengaluru", Units::Metric, "en").await;
//! println!("{}", serde_json::to_string(&result).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod report;
mod server;

pub use client::{DEFAULT_TIMEOUT, DEFAULT_UPSTREAM, WeatherClient, WeatherClientBuilder};
pub use error::{Error, FetchError, Result};
pub use report::{Forecast, Units, Weather, WeatherResult};
pub use server::{DEFAULT_PATH, GetWeatherRequest, WeatherServer, router, serve};
