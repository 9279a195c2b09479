//! Subcommand implementations. Output is written through `tracing` at info
//! level.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod loyalty;
pub mod notifications;
pub mod orders;
pub mod promo;
pub mod wishlist;

use grooveo_storefront::AppError;

/// Log the shopper-facing message before handing the error up.
pub fn report(err: AppError) -> AppError {
    tracing::warn!("{}", err.user_message());
    err
}
