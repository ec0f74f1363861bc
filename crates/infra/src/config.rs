//! Runtime configuration read from `RESTOFLOW_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use restoflow_ai::AiSettings;
use restoflow_inventory::NegativeStockPolicy;
use restoflow_sales::PercentageScope;

pub const NEGATIVE_STOCK: &str = "RESTOFLOW_NEGATIVE_STOCK";
pub const TAX_RATE: &str = "RESTOFLOW_TAX_RATE";
pub const TIP_RATE: &str = "RESTOFLOW_TIP_RATE";
pub const PERCENTAGE_SCOPE: &str = "RESTOFLOW_PERCENTAGE_SCOPE";
pub const ACTOR: &str = "RESTOFLOW_ACTOR";
pub const AI_API_KEY: &str = "RESTOFLOW_AI_API_KEY";
pub const AI_MODEL: &str = "RESTOFLOW_AI_MODEL";
pub const AI_ENDPOINT: &str = "RESTOFLOW_AI_ENDPOINT";
pub const AI_TIMEOUT_SECS: &str = "RESTOFLOW_AI_TIMEOUT_SECS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub negative_stock: NegativeStockPolicy,
    /// Fraction applied to the discounted subtotal (impoconsumo by default).
    pub tax_rate: Decimal,
    /// Fraction of the subtotal suggested as tip.
    pub tip_rate: Decimal,
    pub percentage_scope: PercentageScope,
    /// Name recorded as `performed_by` for automatic movements.
    pub actor: String,
    pub ai: AiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            negative_stock: NegativeStockPolicy::Reject,
            tax_rate: Decimal::new(8, 2),
            tip_rate: Decimal::new(10, 2),
            percentage_scope: PercentageScope::WholeOrder,
            actor: "System".to_string(),
            ai: AiSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get(NEGATIVE_STOCK) {
            cfg.negative_stock = parse_policy(&v).ok_or_else(|| invalid(NEGATIVE_STOCK, &v))?;
        }
        if let Some(v) = get(TAX_RATE) {
            cfg.tax_rate = parse_rate(TAX_RATE, &v)?;
        }
        if let Some(v) = get(TIP_RATE) {
            cfg.tip_rate = parse_rate(TIP_RATE, &v)?;
        }
        if let Some(v) = get(PERCENTAGE_SCOPE) {
            cfg.percentage_scope = match v.to_ascii_lowercase().as_str() {
                "whole_order" => PercentageScope::WholeOrder,
                "targeted_lines" => PercentageScope::TargetedLines,
                _ => return Err(invalid(PERCENTAGE_SCOPE, &v)),
            };
        }
        if let Some(v) = get(ACTOR) {
            cfg.actor = v;
        }

        cfg.ai.api_key = get(AI_API_KEY);
        if let Some(v) = get(AI_MODEL) {
            cfg.ai.model = v;
        }
        if let Some(v) = get(AI_ENDPOINT) {
            cfg.ai.endpoint = v;
        }
        if let Some(v) = get(AI_TIMEOUT_SECS) {
            let secs = v
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| invalid(AI_TIMEOUT_SECS, &v))?;
            cfg.ai.timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}

fn parse_policy(value: &str) -> Option<NegativeStockPolicy> {
    match value.to_ascii_lowercase().as_str() {
        "allow" => Some(NegativeStockPolicy::Allow),
        "reject" => Some(NegativeStockPolicy::Reject),
        "clamp" | "clamp_to_zero" => Some(NegativeStockPolicy::ClampToZero),
        _ => None,
    }
}

/// A fraction in `[0, 1]`.
fn parse_rate(key: &'static str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value)
        .ok()
        .filter(|r| !r.is_sign_negative() && *r <= Decimal::ONE)
        .ok_or_else(|| invalid(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_match_reference_restaurant() {
        let cfg = from(&[]).unwrap();
        assert_eq!(cfg.negative_stock, NegativeStockPolicy::Reject);
        assert_eq!(cfg.tax_rate, dec!(0.08));
        assert_eq!(cfg.tip_rate, dec!(0.10));
        assert_eq!(cfg.percentage_scope, PercentageScope::WholeOrder);
        assert_eq!(cfg.actor, "System");
        assert_eq!(cfg.ai.api_key, None);
        assert_eq!(cfg.ai.model, "gemini-2.5-flash");
    }

    #[test]
    fn reads_overrides() {
        let cfg = from(&[
            (NEGATIVE_STOCK, "Clamp"),
            (TAX_RATE, "0.19"),
            (PERCENTAGE_SCOPE, "targeted_lines"),
            (AI_API_KEY, " secret "),
            (AI_TIMEOUT_SECS, "5"),
        ])
        .unwrap();
        assert_eq!(cfg.negative_stock, NegativeStockPolicy::ClampToZero);
        assert_eq!(cfg.tax_rate, dec!(0.19));
        assert_eq!(cfg.percentage_scope, PercentageScope::TargetedLines);
        assert_eq!(cfg.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.ai.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values_with_key() {
        let err = from(&[(TAX_RATE, "8%")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: TAX_RATE,
                value: "8%".to_string()
            }
        );
        assert!(from(&[(NEGATIVE_STOCK, "maybe")]).is_err());
        assert!(from(&[(TIP_RATE, "1.5")]).is_err());
    }
}
