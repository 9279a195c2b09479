//! Order history service.
//!
//! This is the only place order statuses change after checkout, and it
//! enforces the declared transition table before recording anything.

use std::sync::Arc;

use chrono::Utc;
use grooveo_core::notification::order_status_notification;
use grooveo_core::order::Order;
use grooveo_core::{OrderId, OrderStatus};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::seed;
use crate::services::notifications::{Delivery, NotificationService};
use crate::store::{self, KeyValueStore, Slot};

/// Reads and writes the `orders` slot.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn KeyValueStore>,
    notifications: NotificationService,
}

impl OrderService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// All orders, newest first. A store that has never held orders is
    /// seeded with the demo history.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read or written.
    pub fn list(&self) -> Result<Vec<Order>> {
        if let Some(orders) = store::load(self.store.as_ref(), Slot::Orders)? {
            return Ok(orders);
        }
        let orders = seed::demo_orders();
        self.save(&orders)?;
        tracing::debug!(count = orders.len(), "Seeded demo orders");
        Ok(orders)
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no order has this ID.
    pub fn get(&self, id: &OrderId) -> Result<Order> {
        self.list()?
            .into_iter()
            .find(|o| o.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("order {id}")))
    }

    /// Returns `true` if an order with this ID exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn exists(&self, id: &OrderId) -> Result<bool> {
        Ok(self.list()?.iter().any(|o| o.id() == id))
    }

    /// Record a newly placed order at the top of the history.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the ID is already taken.
    pub fn insert(&self, order: Order) -> Result<()> {
        let mut orders = self.list()?;
        if orders.iter().any(|o| o.id() == order.id()) {
            return Err(AppError::BadRequest(format!(
                "order {} already exists",
                order.id()
            )));
        }
        orders.insert(0, order);
        self.save(&orders)
    }

    /// Move an order to `next`, append the history entry and notify the
    /// shopper.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown order and
    /// `AppError::Transition` if `next` is not reachable from the current
    /// status. Nothing is recorded on error.
    #[instrument(skip_all, fields(order_id = %id, next = %next))]
    pub fn advance(&self, id: &OrderId, next: OrderStatus) -> Result<(Order, Delivery)> {
        let mut orders = self.list()?;
        let order = orders
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

        let from = order.status();
        order.transition(next, Utc::now())?;
        let updated = order.clone();
        self.save(&orders)?;
        tracing::info!(%from, "Order status updated");

        let delivery = self
            .notifications
            .add(order_status_notification(id, next))?;
        Ok((updated, delivery))
    }

    fn save(&self, orders: &[Order]) -> Result<()> {
        store::save(self.store.as_ref(), Slot::Orders, &orders)?;
        Ok(())
    }
}
