//! Runtime configuration read from the environment.
//!
//! A `.env` file is honoured when present. Unparseable values fall back to
//! their defaults, so loading never fails.

use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for the external description service.
#[derive(Debug, Clone)]
pub struct DescribeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Bounds the vendor form enforces on top of the catalog's own rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorLimits {
    pub min_total_price: Decimal,
    pub max_total_shares: u64,
}

impl Default for VendorLimits {
    fn default() -> Self {
        Self {
            min_total_price: Decimal::from(1_000),
            max_total_shares: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarketConfig {
    pub describe: DescribeConfig,
    pub vendor: VendorLimits,
}

impl MarketConfig {
    pub fn from_env() -> Self {
        // A missing .env file is normal.
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            describe: DescribeConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .or_else(|_| env::var("API_KEY"))
                    .ok()
                    .filter(|k| !k.trim().is_empty()),
                model: env::var("GEMINI_MODEL").unwrap_or(defaults.describe.model),
                base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.describe.base_url),
                timeout: parse_var::<u64>("DESCRIBE_TIMEOUT_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.describe.timeout),
            },
            vendor: VendorLimits {
                min_total_price: parse_var::<Decimal>("VENDOR_MIN_TOTAL_PRICE")
                    .unwrap_or(defaults.vendor.min_total_price),
                max_total_shares: parse_var::<u64>("VENDOR_MAX_SHARES")
                    .unwrap_or(defaults.vendor.max_total_shares),
            },
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_storefront_form() {
        let config = MarketConfig::default();
        assert_eq!(config.vendor.min_total_price, Decimal::from(1000));
        assert_eq!(config.vendor.max_total_shares, 10_000);
        assert_eq!(config.describe.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.describe.timeout, Duration::from_secs(15));
        assert!(config.describe.api_key.is_none());
    }
}
