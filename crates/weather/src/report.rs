//! Normalized weather result and the upstream `j1` payload it is built from.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::ser::Serializer;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Unit system requested by the caller.
///
/// Only selects the flag sent upstream; both metric and imperial fields are
/// always populated in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// Query flag understood by the upstream service.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Metric => "m",
            Self::Imperial => "u",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions for one city.
///
/// Numeric fields carry the upstream values verbatim and are `None` when the
/// upstream omitted them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub city: String,
    pub desc: String,
    pub temp_c: Option<String>,
    pub temp_f: Option<String>,
    pub feels_like_c: Option<String>,
    pub feels_like_f: Option<String>,
    pub humidity_pct: Option<String>,
    pub wind_kmph: Option<String>,
    pub wind_mph: Option<String>,
    pub observation_time_utc: Option<String>,
    pub units: Units,
}

impl Weather {
    /// Map the first current-condition entry onto the fixed result shape.
    pub fn from_forecast(city: &str, units: Units, lang: &str, forecast: Forecast) -> Self {
        let current = forecast.current_condition.into_iter().next().unwrap_or_default();
        let desc = current.description(lang);

        Self {
            city: city.to_string(),
            desc,
            temp_c: scalar(current.temp_c),
            temp_f: scalar(current.temp_f),
            feels_like_c: scalar(current.feels_like_c),
            feels_like_f: scalar(current.feels_like_f),
            humidity_pct: scalar(current.humidity),
            wind_kmph: scalar(current.windspeed_kmph),
            wind_mph: scalar(current.windspeed_miles),
            observation_time_utc: scalar(current.observation_time),
            units,
        }
    }
}

/// Outcome of a weather lookup.
///
/// Serializes as `{"ok": true, "weather": {...}}` or
/// `{"ok": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Found(Weather),
    Failed(String),
}

impl WeatherResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn weather(&self) -> Option<&Weather> {
        match self {
            Self::Found(weather) => Some(weather),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Found(_) => None,
            Self::Failed(message) => Some(message),
        }
    }
}

#[derive(Serialize)]
struct WireResult<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    weather: Option<&'a Weather>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for WeatherResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireResult {
            ok: self.is_ok(),
            weather: self.weather(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Upstream wire types
// ─────────────────────────────────────────────────────────────────────────────

/// The subset of the upstream `format=j1` document we read.
#[derive(Debug, Default, Deserialize)]
pub struct Forecast {
    #[serde(default, deserialize_with = "null_as_default")]
    current_condition: Vec<CurrentCondition>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: Option<Value>,
    #[serde(rename = "temp_F")]
    temp_f: Option<Value>,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: Option<Value>,
    #[serde(rename = "FeelsLikeF")]
    feels_like_f: Option<Value>,
    humidity: Option<Value>,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: Option<Value>,
    #[serde(rename = "windspeedMiles")]
    windspeed_miles: Option<Value>,
    observation_time: Option<Value>,
    #[serde(rename = "weatherDesc", default, deserialize_with = "null_as_default")]
    weather_desc: Vec<DescValue>,
    /// Language-tagged descriptions (`lang_de`, `lang_fr`, ...).
    #[serde(flatten)]
    localized: HashMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct DescValue {
    #[serde(default, deserialize_with = "null_as_default")]
    value: String,
}

/// Upstream sends `null` where it means "nothing".
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CurrentCondition {
    fn description(&self, lang: &str) -> String {
        let tagged = self
            .localized
            .get(&format!("lang_{lang}"))
            .and_then(|v| v.as_array())
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("value"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty());

        match tagged {
            Some(desc) => desc.to_string(),
            None => self
                .weather_desc
                .first()
                .map(|d| d.value.clone())
                .unwrap_or_default(),
        }
    }
}

fn scalar(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
