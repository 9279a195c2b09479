//! Shopping cart commands.

use clap::Subcommand;
use grooveo_core::ProductId;
use grooveo_core::cart::Cart;
use grooveo_storefront::{AppState, Result};

use super::report;

#[derive(Subcommand)]
pub enum CartAction {
    /// Add a product (merges with an existing line)
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product line
    Remove { product_id: String },
    /// Set a line's quantity; 0 removes it
    Set { product_id: String, quantity: u32 },
    /// Show the cart
    Show,
    /// Empty the cart
    Clear,
}

pub fn run(state: &AppState, action: CartAction) -> Result<()> {
    let carts = state.cart();
    match action {
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let cart = carts.add(&ProductId::new(product_id), quantity).map_err(report)?;
            show(&cart);
        }
        CartAction::Remove { product_id } => {
            if !carts.remove(&ProductId::new(&product_id))? {
                tracing::info!("{product_id} was not in the cart");
            }
            show(&carts.cart()?);
        }
        CartAction::Set {
            product_id,
            quantity,
        } => {
            let cart = carts
                .update_quantity(&ProductId::new(product_id), quantity)
                .map_err(report)?;
            show(&cart);
        }
        CartAction::Show => show(&carts.cart()?),
        CartAction::Clear => {
            carts.clear()?;
            tracing::info!("Cart cleared");
        }
    }
    Ok(())
}

pub fn show(cart: &Cart) {
    if cart.is_empty() {
        tracing::info!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        tracing::info!(
            "  {:<14} {:<32} {:>3} x {:>8} = {:>9}",
            item.product.id.as_str(),
            item.product.name,
            item.quantity,
            item.product.price.to_string(),
            item.line_total().to_string()
        );
    }
    tracing::info!("{} items, subtotal {}", cart.item_count(), cart.subtotal());
}
