//! Weather stub
//!
//! Returns made-up but stable conditions per location; there is no upstream.

use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ToolArgs, ToolResult, ToolServerError};
use crate::rag::fnv1a64;

const CONDITIONS: &[&str] = &["sunny", "partly cloudy", "overcast", "light rain", "windy", "snow"];

/// Temperature scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// Arguments for `get_weather`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WeatherArgs {
    /// City or place name, e.g. "Ann Arbor, MI"
    pub location: String,
    /// "metric" (Celsius, default) or "imperial" (Fahrenheit)
    #[serde(default)]
    pub units: Option<Units>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: f64,
    pub units: Units,
    pub conditions: String,
}

/// Deterministic report for a location
pub fn report(args: &WeatherArgs) -> ToolResult<WeatherReport> {
    let location = args.location.trim();
    if location.is_empty() {
        return Err(ToolServerError::invalid("location must not be empty"));
    }

    let hash = fnv1a64(location.to_lowercase().as_bytes());
    // -5.0 to 34.5 °C in half-degree steps
    let celsius = (hash % 80) as f64 / 2.0 - 5.0;
    let conditions = CONDITIONS[((hash >> 8) % CONDITIONS.len() as u64) as usize];
    let units = args.units.unwrap_or_default();
    let temperature = match units {
        Units::Metric => celsius,
        Units::Imperial => (celsius * 9.0 / 5.0 + 32.0).round(),
    };

    Ok(WeatherReport {
        location: location.to_string(),
        temperature,
        units,
        conditions: conditions.to_string(),
    })
}

pub async fn handler(ToolArgs(args): ToolArgs<WeatherArgs>) -> ToolResult<Json<WeatherReport>> {
    let report = report(&args)?;
    tracing::info!(location = %report.location, conditions = %report.conditions, "weather stub");
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(location: &str, units: Option<Units>) -> WeatherArgs {
        WeatherArgs {
            location: location.to_string(),
            units,
        }
    }

    #[test]
    fn test_report_is_stable() {
        let a = report(&args("Ann Arbor", None)).unwrap();
        let b = report(&args("  ann arbor ", None)).unwrap();
        assert_eq!(a.temperature, b.temperature);
        assert_eq!(a.conditions, b.conditions);
        assert_eq!(a.units, Units::Metric);
        assert!((-5.0..=34.5).contains(&a.temperature));
    }

    #[test]
    fn test_imperial_conversion() {
        let metric = report(&args("Detroit", Some(Units::Metric))).unwrap();
        let imperial = report(&args("Detroit", Some(Units::Imperial))).unwrap();
        assert_eq!(imperial.temperature, (metric.temperature * 9.0 / 5.0 + 32.0).round());
    }

    #[test]
    fn test_empty_location_rejected() {
        assert!(report(&args("   ", None)).is_err());
    }

    #[test]
    fn test_units_parse() {
        let parsed: WeatherArgs = serde_json::from_str(r#"{"location": "Paris", "units": "imperial"}"#).unwrap();
        assert_eq!(parsed.units, Some(Units::Imperial));
        assert!(serde_json::from_str::<WeatherArgs>(r#"{"location": "Paris", "units": "kelvin"}"#).is_err());
    }
}
