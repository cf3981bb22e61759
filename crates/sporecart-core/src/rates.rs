use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    #[serde(alias = "id")]
    pub object_id: String,
    pub provider: String,
    #[serde(alias = "servicelevel")]
    pub service: String,
    pub amount: String,
    #[serde(default)]
    pub estimated_days: Option<u32>,
}

impl ShippingRate {
    pub fn parsed_amount(&self) -> Result<f64, MalformedRateError> {
        parse_amount(&self.amount).map_err(|error| MalformedRateError {
            rate_id: Some(self.object_id.clone()),
            ..error
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.provider, self.service)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}amount '{amount}' is not a valid price", rate_prefix(.rate_id))]
pub struct MalformedRateError {
    pub rate_id: Option<String>,
    pub amount: String,
}

fn rate_prefix(rate_id: &Option<String>) -> String {
    match rate_id {
        Some(id) => format!("rate '{id}': "),
        None => String::new(),
    }
}

/// Parses a decimal-as-string price. Negative and non-finite values are rejected.
pub fn parse_amount(raw: &str) -> Result<f64, MalformedRateError> {
    let malformed = || MalformedRateError {
        rate_id: None,
        amount: raw.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(malformed());
    }

    let value = trimmed.parse::<f64>().map_err(|_| malformed())?;
    if !value.is_finite() || value < 0.0 {
        return Err(malformed());
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimal_strings() {
        assert_eq!(parse_amount("3.50").expect("valid"), 3.5);
        assert_eq!(parse_amount(" 12 ").expect("valid"), 12.0);
        assert_eq!(parse_amount("0.00").expect("valid"), 0.0);
    }

    #[test]
    fn rejects_non_numeric_and_negative_amounts() {
        for raw in ["", "free", "NaN", "inf", "-1.00", "4,99"] {
            assert!(parse_amount(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn error_names_the_offending_rate() {
        let rate = ShippingRate {
            object_id: "r1".to_string(),
            provider: "USPS".to_string(),
            service: "Priority".to_string(),
            amount: "n/a".to_string(),
            estimated_days: None,
        };

        let error = rate.parsed_amount().expect_err("malformed");
        assert_eq!(error.rate_id.as_deref(), Some("r1"));
        assert_eq!(error.to_string(), "rate 'r1': amount 'n/a' is not a valid price");
    }

    #[test]
    fn deserializes_id_alias() {
        let rate: ShippingRate = serde_json::from_str(
            r#"{"id":"a","provider":"UPS","service":"Ground","amount":"5.00"}"#,
        )
        .expect("rate json");
        assert_eq!(rate.object_id, "a");
        assert_eq!(rate.estimated_days, None);
        assert_eq!(rate.display_name(), "UPS Ground");
    }
}
