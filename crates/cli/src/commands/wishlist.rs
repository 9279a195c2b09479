//! Wishlist commands.

use clap::Subcommand;
use grooveo_core::ProductId;
use grooveo_storefront::{AppState, Result};

use super::report;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Save a product
    Add { product_id: String },
    /// Forget a saved product
    Remove { product_id: String },
    /// List saved products
    Show,
    /// Remove everything
    Clear,
}

pub fn run(state: &AppState, action: WishlistAction) -> Result<()> {
    let wishlist = state.wishlist();
    match action {
        WishlistAction::Add { product_id } => {
            if wishlist.add(&ProductId::new(&product_id)).map_err(report)? {
                tracing::info!("Saved {product_id}");
            } else {
                tracing::info!("{product_id} is already on your wishlist");
            }
        }
        WishlistAction::Remove { product_id } => {
            if wishlist.remove(&ProductId::new(&product_id))? {
                tracing::info!("Removed {product_id}");
            } else {
                tracing::info!("{product_id} was not on your wishlist");
            }
        }
        WishlistAction::Show => {
            let saved = wishlist.wishlist()?;
            tracing::info!("{} saved", saved.count());
            for product in saved.items() {
                tracing::info!(
                    "  {:<14} {:<32} {:>8}  {}",
                    product.id.as_str(),
                    product.name,
                    product.price.to_string(),
                    product.stock_level().label()
                );
            }
        }
        WishlistAction::Clear => {
            wishlist.clear()?;
            tracing::info!("Wishlist cleared");
        }
    }
    Ok(())
}
