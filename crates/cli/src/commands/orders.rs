//! Order history commands.
//!
//! # Usage
//!
//! ```bash
//! grooveo orders list
//! grooveo orders show ORD-12346
//! grooveo orders advance ORD-12346 out_for_delivery
//! grooveo orders impact            # all orders
//! grooveo orders impact ORD-12345
//! ```

use clap::Subcommand;
use grooveo_core::carbon::{self, CarbonImpact};
use grooveo_core::order::{Order, OrderItem};
use grooveo_core::{OrderId, OrderStatus};
use grooveo_storefront::{AppState, Result};

use super::report;

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders, newest first
    List,
    /// Show an order with its tracking history
    Show { id: String },
    /// Move an order to its next status
    Advance {
        id: String,
        /// Target status (`processing`, `shipped`, `out_for_delivery`, ...)
        status: OrderStatus,
    },
    /// Environmental impact of one order, or of every order
    Impact { id: Option<String> },
}

pub fn run(state: &AppState, action: OrderAction) -> Result<()> {
    let orders = state.orders();
    match action {
        OrderAction::List => {
            for order in orders.list()? {
                tracing::info!(
                    "  {}  {}  {:<18} {:>3} items  {:>10}",
                    order.id().as_str(),
                    order.placed_at().format("%Y-%m-%d"),
                    order.status().label(),
                    order.item_count(),
                    order.total().to_string()
                );
            }
        }
        OrderAction::Show { id } => {
            let order = orders.get(&OrderId::new(id)).map_err(report)?;
            show(&order);
        }
        OrderAction::Advance { id, status } => {
            let (order, delivery) = orders
                .advance(&OrderId::new(id), status)
                .map_err(report)?;
            tracing::info!("{} is now {}", order.id(), order.status().label());
            if delivery.toast {
                tracing::info!("{}: {}", delivery.notification.title, delivery.notification.message);
            }
        }
        OrderAction::Impact { id } => {
            let items: Vec<OrderItem> = match id {
                Some(id) => orders.get(&OrderId::new(id)).map_err(report)?.items().to_vec(),
                None => orders
                    .list()?
                    .iter()
                    .filter(|o| o.status() != OrderStatus::Cancelled)
                    .flat_map(|o| o.items().iter().cloned())
                    .collect(),
            };
            impact(&carbon::calculate(&items, state.catalog()));
        }
    }
    Ok(())
}

fn show(order: &Order) {
    tracing::info!(
        "Order #{} placed {}  {}",
        order.id(),
        order.placed_at().format("%Y-%m-%d %H:%M"),
        order.status().label()
    );
    for item in order.items() {
        tracing::info!(
            "  {:<32} {:>3} x {:>8} = {:>9}",
            item.name,
            item.quantity,
            item.price.to_string(),
            item.line_total().to_string()
        );
    }
    tracing::info!("  Total: {}", order.total());

    let address = order.shipping_address();
    tracing::info!("  Ship to: {}, {}", address.name, address.one_line());
    if let (Some(carrier), Some(number)) = (order.carrier(), order.tracking_number()) {
        tracing::info!("  Tracking: {carrier} {number}");
    }
    if let Some(date) = order.estimated_delivery() {
        tracing::info!("  Estimated delivery: {}", date.format("%d %b %Y"));
    }

    tracing::info!("History:");
    for update in order.status_updates() {
        let location = update
            .location
            .as_deref()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        tracing::info!(
            "  {}  {}{location}",
            update.timestamp.format("%Y-%m-%d %H:%M"),
            update.message
        );
    }
}

fn impact(impact: &CarbonImpact) {
    if impact.is_zero() {
        tracing::info!("No impact recorded yet");
        return;
    }
    tracing::info!("CO2 saved:        {:.2} kg", impact.carbon_saved);
    tracing::info!("Trees equivalent: {:.1}", impact.trees_equivalent);
    tracing::info!("Water saved:      {:.0} L", impact.water_saved);
    tracing::info!("Plastic avoided:  {:.0} g", impact.plastic_reduced);
    tracing::info!("Car miles offset: {:.0}", impact.car_miles_equivalent);
    for fact in carbon::impact_facts(impact) {
        tracing::info!("  * {fact}");
    }
}
