//! Upstream weather lookup.

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use crate::error::{Error, FetchError, Result};
use crate::report::{Forecast, Units, Weather, WeatherResult};

/// Public text/JSON weather service queried by default.
pub const DEFAULT_UPSTREAM: &str = "https://wttr.in";

/// Bound on a single upstream lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

/// Builder for a [`WeatherClient`].
#[derive(Debug, Clone)]
pub struct WeatherClientBuilder {
    upstream: String,
    timeout: Duration,
}

impl WeatherClientBuilder {
    pub fn new() -> Self {
        Self {
            upstream: DEFAULT_UPSTREAM.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Base URL of the upstream service.
    pub fn upstream(mut self, upstream: impl Into<String>) -> Self {
        self.upstream = upstream.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<WeatherClient> {
        let upstream = Url::parse(&self.upstream)
            .map_err(|e| Error::InvalidUpstream(format!("{}: {e}", self.upstream)))?;
        if upstream.cannot_be_a_base() {
            return Err(Error::InvalidUpstream(self.upstream));
        }

        // One connection per lookup: nothing is kept alive between calls.
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(WeatherClient {
            http,
            upstream,
            timeout: self.timeout,
        })
    }
}

impl Default for WeatherClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the upstream weather service.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    upstream: Url,
    timeout: Duration,
}

impl WeatherClient {
    pub fn builder() -> WeatherClientBuilder {
        WeatherClientBuilder::new()
    }

    /// Client against the public service with the default timeout.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Fetch current conditions for `city`.
    ///
    /// Total: every failure (empty city, network, timeout, status, decode) is
    /// returned as [`WeatherResult::Failed`].
    pub async fn get_weather(&self, city: &str, units: Units, lang: &str) -> WeatherResult {
        match self.fetch(city, units, lang).await {
            Ok(weather) => WeatherResult::Found(weather),
            Err(e) => {
                warn!(city, %units, error = %e, "weather lookup failed");
                WeatherResult::Failed(e.to_string())
            }
        }
    }

    async fn fetch(&self, city: &str, units: Units, lang: &str) -> std::result::Result<Weather, FetchError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::InvalidCity);
        }

        let url = self.request_url(city, units, lang);
        debug!(%url, "fetching weather");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let forecast: Forecast =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(Weather::from_forecast(city, units, lang, forecast))
    }

    /// `{upstream}/{city}?format=j1&{flag}&lang={lang}`
    pub fn request_url(&self, city: &str, units: Units, lang: &str) -> Url {
        let mut url = self.upstream.clone();
        // Checked at build time: the upstream can be a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(city);
        }
        url.query_pairs_mut()
            .append_pair("format", "j1")
            .append_key_only(units.flag())
            .append_pair("lang", lang);
        url
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}
