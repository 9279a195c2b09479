//! Storefront services.
//!
//! Each service is a thin, cloneable handle over the shared
//! [`KeyValueStore`](crate::store::KeyValueStore). Services load their slot,
//! apply a core operation and write the slot back; there is no ambient
//! global state.
//!
//! # Services
//!
//! - `cart` - Cart contents
//! - `wishlist` - Saved-for-later products
//! - `loyalty` - Points balance and ledger
//! - `notifications` - Notification feed, preferences and simulated email
//! - `orders` - Order history and status changes
//! - `checkout` - Promo and points application, order placement

pub mod cart;
pub mod checkout;
pub mod loyalty;
pub mod notifications;
pub mod orders;
pub mod wishlist;

pub use cart::CartService;
pub use checkout::{CheckoutService, CheckoutSession, OrderConfirmation, PaymentMethod};
pub use loyalty::LoyaltyService;
pub use notifications::{Delivery, NotificationService, Preference};
pub use orders::OrderService;
pub use wishlist::WishlistService;
