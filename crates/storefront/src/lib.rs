//! Grooveo Storefront library.
//!
//! Services that keep the shopper's state (cart, wishlist, loyalty ledger,
//! notifications and order history) in a pluggable key-value store, plus
//! the checkout flow that ties them together.
//!
//! [`state::AppState`] wires every service to one store; front ends hold a
//! clone of it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;

pub use error::{AppError, Result};
pub use state::AppState;
