//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GROOVEO_DATA_DIR` - Directory holding the local state file (default: `.grooveo`)
//! - `GROOVEO_FREE_SHIPPING_THRESHOLD` - Subtotal in paise that ships free (default: 4150)
//! - `GROOVEO_SHIPPING_FEE` - Flat shipping fee in paise (default: 497)
//! - `GROOVEO_TAX_RATE` - Tax rate as a decimal fraction (default: 0.18)
//! - `GROOVEO_ENFORCE_PROMO_CONSTRAINTS` - Apply promo min-order and max-discount limits (default: false)
//! - `GROOVEO_SIMULATED_LATENCY_MS` - Artificial delay before placing an order (default: 0)
//! - `GROOVEO_SIMULATED_FAILURE_RATE` - Probability (0.0-1.0) that placing an order fails (default: 0.0)
//! - `GROOVEO_NOTIFICATION_EMAIL` - Recipient for simulated notification emails (default: `user@example.com`)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use grooveo_core::pricing::{PricingPolicy, PromoConstraintMode};
use grooveo_core::{Email, Money};
use rust_decimal::Decimal;
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".grooveo";
const DEFAULT_NOTIFICATION_EMAIL: &str = "user@example.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for the file-backed store
    pub data_dir: PathBuf,
    /// Shipping, tax and promo rules
    pub pricing: PricingPolicy,
    /// Artificial checkout latency and failures
    pub simulation: SimulationConfig,
    /// Address simulated notification emails are sent to
    pub notification_email: Email,
}

/// Knobs for the simulated payment backend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationConfig {
    /// Delay before an order is placed
    pub latency: Duration,
    /// Probability in `[0, 1]` that placing an order fails
    pub failure_rate: f64,
}

impl SimulationConfig {
    /// `failure_rate` clamped to `[0, 1]`. NaN counts as never failing.
    #[must_use]
    pub fn failure_probability(&self) -> f64 {
        if self.failure_rate.is_nan() {
            0.0
        } else {
            self.failure_rate.clamp(0.0, 1.0)
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Unset
    /// variables take their defaults, so `from_lookup(|_| None)` yields the
    /// default configuration.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = lookup("GROOVEO_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let free_shipping_threshold = parse_or(
            &lookup,
            "GROOVEO_FREE_SHIPPING_THRESHOLD",
            PricingPolicy::DEFAULT_FREE_SHIPPING_THRESHOLD.minor_units(),
        )?;
        let shipping_fee = parse_or(
            &lookup,
            "GROOVEO_SHIPPING_FEE",
            PricingPolicy::DEFAULT_SHIPPING_FEE.minor_units(),
        )?;
        if free_shipping_threshold < 0 {
            return Err(invalid("GROOVEO_FREE_SHIPPING_THRESHOLD", "must not be negative"));
        }
        if shipping_fee < 0 {
            return Err(invalid("GROOVEO_SHIPPING_FEE", "must not be negative"));
        }

        let tax_rate = parse_or(
            &lookup,
            "GROOVEO_TAX_RATE",
            PricingPolicy::default_tax_rate(),
        )?;
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
            return Err(invalid("GROOVEO_TAX_RATE", "must be between 0 and 1"));
        }

        let promo_constraints = if parse_or(&lookup, "GROOVEO_ENFORCE_PROMO_CONSTRAINTS", false)? {
            PromoConstraintMode::Enforce
        } else {
            PromoConstraintMode::Ignore
        };

        let latency_ms: u64 = parse_or(&lookup, "GROOVEO_SIMULATED_LATENCY_MS", 0)?;
        let failure_rate: f64 = parse_or(&lookup, "GROOVEO_SIMULATED_FAILURE_RATE", 0.0)?;
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(invalid(
                "GROOVEO_SIMULATED_FAILURE_RATE",
                "must be between 0.0 and 1.0",
            ));
        }

        let notification_email = lookup("GROOVEO_NOTIFICATION_EMAIL")
            .unwrap_or_else(|| DEFAULT_NOTIFICATION_EMAIL.to_string());
        let notification_email = Email::parse(&notification_email)
            .map_err(|e| invalid("GROOVEO_NOTIFICATION_EMAIL", &e.to_string()))?;

        Ok(Self {
            data_dir,
            pricing: PricingPolicy {
                free_shipping_threshold: Money::from_minor(free_shipping_threshold),
                shipping_fee: Money::from_minor(shipping_fee),
                tax_rate,
                promo_constraints,
            },
            simulation: SimulationConfig {
                latency: Duration::from_millis(latency_ms),
                failure_rate,
            },
            notification_email,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use `default`.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| invalid(key, &e.to_string())),
        None => Ok(default),
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}
