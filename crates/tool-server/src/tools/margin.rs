//! Margin calculator

use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ToolArgs, ToolResult, ToolServerError};

/// Arguments for `calculate_margin`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MarginArgs {
    /// Revenue amount, zero or more
    pub revenue: f64,
    /// Margin as a percentage between -100 and 100, e.g. 20 for 20%
    pub margin_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginResponse {
    pub margin: f64,
}

/// Margin amount for the given revenue and percentage
pub fn calculate_margin(args: &MarginArgs) -> ToolResult<f64> {
    if !args.revenue.is_finite() || args.revenue < 0.0 {
        return Err(ToolServerError::invalid("revenue must be a finite number of at least 0"));
    }
    if !args.margin_pct.is_finite() || !(-100.0..=100.0).contains(&args.margin_pct) {
        return Err(ToolServerError::invalid("margin_pct must be a finite number between -100 and 100"));
    }
    Ok(args.revenue * args.margin_pct / 100.0)
}

pub async fn handler(ToolArgs(args): ToolArgs<MarginArgs>) -> ToolResult<Json<MarginResponse>> {
    let margin = calculate_margin(&args)?;
    tracing::info!(revenue = args.revenue, margin_pct = args.margin_pct, margin, "calculated margin");
    Ok(Json(MarginResponse { margin }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(revenue: f64, margin_pct: f64) -> MarginArgs {
        MarginArgs { revenue, margin_pct }
    }

    #[test]
    fn test_margin() {
        assert_eq!(calculate_margin(&args(100.0, 20.0)).unwrap(), 20.0);
        assert_eq!(calculate_margin(&args(250.0, -10.0)).unwrap(), -25.0);
        assert_eq!(calculate_margin(&args(0.0, 100.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_range_inputs() {
        assert!(calculate_margin(&args(-1.0, 20.0)).is_err());
        assert!(calculate_margin(&args(f64::INFINITY, 20.0)).is_err());
        assert!(calculate_margin(&args(100.0, 100.5)).is_err());
        assert!(calculate_margin(&args(100.0, f64::NAN)).is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let parsed: Result<MarginArgs, _> =
            serde_json::from_str(r#"{"revenue": 1, "margin_pct": 2, "currency": "USD"}"#);
        assert!(parsed.is_err());
    }
}
