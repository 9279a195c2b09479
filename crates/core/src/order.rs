//! Orders and their status history.
//!
//! An order's items, address and total are fixed when it is placed. Only
//! the current status and the status history change afterwards, and the
//! history is append-only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Money, OrderId, OrderStatus, ProductId};

/// Location attached to out-for-delivery updates when none is given.
pub const DEFAULT_DELIVERY_LOCATION: &str = "Local Delivery Facility, Green City";

/// A product snapshot on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price when ordered.
    pub price: Money,
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// A required address field was blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shipping address is missing {0}")]
pub struct AddressError(pub &'static str);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Every field must be non-blank.
    ///
    /// # Errors
    ///
    /// Returns the first blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let fields = [
            ("name", &self.name),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("postal code", &self.postal_code),
            ("country", &self.country),
        ];
        match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(AddressError(field)),
            None => Ok(()),
        }
    }

    /// `street, city, state postal_code, country`.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.street, self.city, self.state, self.postal_code, self.country
        )
    }
}

/// One entry in an order's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Requested status is not reachable from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Default history message for a status.
#[must_use]
pub fn status_message(status: OrderStatus) -> String {
    match status {
        OrderStatus::Pending => "Order placed".to_owned(),
        other => format!("Order {}", other.label().to_lowercase()),
    }
}

/// Default location for a status, if any.
#[must_use]
pub fn status_location(status: OrderStatus) -> Option<String> {
    (status == OrderStatus::OutForDelivery).then(|| DEFAULT_DELIVERY_LOCATION.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    placed_at: DateTime<Utc>,
    status: OrderStatus,
    total: Money,
    items: Vec<OrderItem>,
    shipping_address: ShippingAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    estimated_delivery: Option<NaiveDate>,
    status_updates: Vec<StatusUpdate>,
}

impl Order {
    /// Create a pending order with a single "Order placed" update.
    #[must_use]
    pub fn place(
        id: OrderId,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        total: Money,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            placed_at: now,
            status: OrderStatus::Pending,
            total,
            items,
            shipping_address,
            tracking_number: None,
            carrier: None,
            estimated_delivery: None,
            status_updates: vec![StatusUpdate {
                status: OrderStatus::Pending,
                timestamp: now,
                message: status_message(OrderStatus::Pending),
                location: None,
            }],
        }
    }

    #[must_use]
    pub fn with_tracking(mut self, carrier: impl Into<String>, number: impl Into<String>) -> Self {
        self.carrier = Some(carrier.into());
        self.tracking_number = Some(number.into());
        self
    }

    #[must_use]
    pub const fn with_estimated_delivery(mut self, date: NaiveDate) -> Self {
        self.estimated_delivery = Some(date);
        self
    }

    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    #[must_use]
    pub const fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    #[must_use]
    pub const fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    #[must_use]
    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    #[must_use]
    pub fn carrier(&self) -> Option<&str> {
        self.carrier.as_deref()
    }

    #[must_use]
    pub const fn estimated_delivery(&self) -> Option<NaiveDate> {
        self.estimated_delivery
    }

    /// Status history, oldest first.
    #[must_use]
    pub fn status_updates(&self) -> &[StatusUpdate] {
        &self.status_updates
    }

    #[must_use]
    pub fn latest_update(&self) -> Option<&StatusUpdate> {
        self.status_updates.last()
    }

    /// Total units ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |n, item| n.saturating_add(item.quantity))
    }

    /// Set the status and append a history entry.
    ///
    /// This does not consult the transition table; callers that need the
    /// table enforced use [`Order::transition`].
    pub fn record_status(
        &mut self,
        status: OrderStatus,
        message: impl Into<String>,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> StatusUpdate {
        let update = StatusUpdate {
            status,
            timestamp: now,
            message: message.into(),
            location,
        };
        self.status = status;
        self.status_updates.push(update.clone());
        update
    }

    /// Move to `next` if the transition table allows it, recording the
    /// default message and location.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] and leaves the order untouched if `next`
    /// is not reachable from the current status.
    pub fn transition(
        &mut self,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusUpdate, TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        Ok(self.record_status(next, status_message(next), status_location(next), now))
    }
}
