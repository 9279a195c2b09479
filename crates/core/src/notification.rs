//! User notifications and the per-status templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{NotificationId, NotificationKind, OrderId, OrderStatus};

/// A notification before it is given an ID, timestamp and read flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub order_id: Option<OrderId>,
    pub order_status: Option<OrderStatus>,
}

impl NotificationDraft {
    #[must_use]
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action_url: None,
            order_id: None,
            order_status: None,
        }
    }

    #[must_use]
    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<OrderStatus>,
}

impl Notification {
    /// Materialize a draft as a new unread notification.
    #[must_use]
    pub fn from_draft(draft: NotificationDraft, id: NotificationId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            timestamp: now,
            read: false,
            action_url: draft.action_url,
            order_id: draft.order_id,
            order_status: draft.order_status,
        }
    }
}

/// Notifications, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    #[must_use]
    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| &n.id == id)
    }

    /// Insert at the front.
    pub fn add(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    /// Returns `true` if the notification exists.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        match self.items.iter_mut().find(|n| &n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }

    /// Returns `true` if the notification existed.
    pub fn remove(&mut self, id: &NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| &n.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Delivery toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub order_status: bool,
    pub promotional: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            order_status: true,
            promotional: true,
        }
    }
}

/// Link to an order's detail page.
#[must_use]
pub fn order_url(order_id: &OrderId) -> String {
    format!("/account/orders/{order_id}")
}

/// Notification announcing that an order moved to `status`.
#[must_use]
pub fn order_status_notification(order_id: &OrderId, status: OrderStatus) -> NotificationDraft {
    let (title, message) = match status {
        OrderStatus::Processing => (
            "Order Processing",
            format!(
                "Your order #{order_id} is now being processed. We'll update you when it ships!"
            ),
        ),
        OrderStatus::Shipped => (
            "Order Shipped",
            format!("Great news! Your order #{order_id} has been shipped and is on its way to you."),
        ),
        OrderStatus::OutForDelivery => (
            "Out for Delivery",
            format!("Your order #{order_id} is out for delivery and will arrive soon!"),
        ),
        OrderStatus::Delivered => (
            "Order Delivered",
            format!(
                "Your order #{order_id} has been delivered. Enjoy your eco-friendly products!"
            ),
        ),
        OrderStatus::Cancelled => (
            "Order Cancelled",
            format!(
                "Your order #{order_id} has been cancelled. Please contact us if you have any questions."
            ),
        ),
        OrderStatus::Returned => (
            "Return Processed",
            format!(
                "Your return for order #{order_id} has been processed. Your refund will be issued shortly."
            ),
        ),
        OrderStatus::Pending => (
            "Order Update",
            format!(
                "There's an update to your order #{order_id}. Check your order details for more information."
            ),
        ),
    };
    NotificationDraft {
        kind: NotificationKind::OrderStatus,
        title: title.to_owned(),
        message,
        action_url: Some(order_url(order_id)),
        order_id: Some(order_id.clone()),
        order_status: Some(status),
    }
}

/// Notification sent when checkout completes.
#[must_use]
pub fn order_placed_notification(order_id: &OrderId) -> NotificationDraft {
    NotificationDraft {
        kind: NotificationKind::OrderStatus,
        title: "Order Placed".to_owned(),
        message: format!(
            "Thank you! Your order #{order_id} has been placed. We'll let you know when it's processing."
        ),
        action_url: Some(order_url(order_id)),
        order_id: Some(order_id.clone()),
        order_status: Some(OrderStatus::Pending),
    }
}

/// Subject line for the status email.
#[must_use]
pub const fn email_subject(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Processing => "Your Order is Being Processed",
        OrderStatus::Shipped => "Your Order Has Shipped!",
        OrderStatus::OutForDelivery => "Your Order is Out for Delivery",
        OrderStatus::Delivered => "Your Order Has Been Delivered",
        OrderStatus::Cancelled => "Your Order Has Been Cancelled",
        OrderStatus::Returned => "Your Return Has Been Processed",
        OrderStatus::Pending => "Order Status Update",
    }
}
