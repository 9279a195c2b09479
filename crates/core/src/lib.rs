//! Grooveo Core - Domain types and storefront logic.
//!
//! This crate provides the types and pure business rules shared by every
//! Grooveo component:
//! - `storefront` - State-store services, persistence and checkout flow
//! - `cli` - Command-line front end over the storefront services
//!
//! # Architecture
//!
//! The core crate contains only types, traits and deterministic functions -
//! no I/O, no persistence, no clocks. Every function that depends on the
//! current time takes it as an argument.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails and statuses
//! - [`catalog`] - Products, stock levels, filtering and sorting
//! - [`cart`] - Cart and wishlist containers
//! - [`promo`] - Promo code table and validation
//! - [`pricing`] - Checkout totals (shipping, discounts, tax)
//! - [`loyalty`] - Loyalty points ledger
//! - [`carbon`] - Carbon impact estimation
//! - [`order`] - Orders and their append-only status history
//! - [`notification`] - Notification feed and templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carbon;
pub mod cart;
pub mod catalog;
pub mod loyalty;
pub mod notification;
pub mod order;
pub mod pricing;
pub mod promo;
pub mod types;

pub use types::*;
