//! Unified error handling.
//!
//! Provides a unified `AppError` type for every storefront service. All
//! service operations return `Result<T, AppError>`.

use grooveo_core::loyalty::LoyaltyError;
use grooveo_core::order::{AddressError, TransitionError};
use grooveo_core::promo::PromoError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::checkout::PaymentError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistence failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Promo code rejected.
    #[error("Promo error: {0}")]
    Promo(#[from] PromoError),

    /// Loyalty redemption rejected.
    #[error("Loyalty error: {0}")]
    Loyalty(#[from] LoyaltyError),

    /// Order status change not allowed.
    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    /// Shipping address incomplete.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Payment details incomplete.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from the shopper.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The simulated payment backend failed.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl AppError {
    /// Message suitable for showing to the shopper.
    ///
    /// Internal failures are logged and replaced with a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(e) => {
                tracing::error!(error = %e, "Store failure");
                "Something went wrong saving your changes. Please try again.".to_string()
            }
            Self::Config(e) => e.to_string(),
            Self::Promo(e) => e.to_string(),
            Self::Loyalty(e) => e.to_string(),
            Self::Transition(e) => e.to_string(),
            Self::Address(e) => e.to_string(),
            Self::Payment(e) => e.to_string(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::BadRequest(msg) | Self::Unavailable(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product eco-box-9".to_string());
        assert_eq!(err.to_string(), "Not found: product eco-box-9");

        let err = AppError::BadRequest("cart is empty".to_string());
        assert_eq!(err.to_string(), "Bad request: cart is empty");
    }

    #[test]
    fn test_user_message_includes_shortfall() {
        let err = AppError::from(LoyaltyError::InsufficientPoints {
            requested: 300,
            available: 120,
            shortfall: 180,
        });
        assert!(err.user_message().contains("180 short"));
    }

    #[test]
    fn test_user_message_hides_store_details() {
        let io = std::io::Error::other("disk on fire");
        let err = AppError::from(StoreError::from(io));
        assert!(!err.user_message().contains("disk"));
    }
}
