//! Cart service.

use std::sync::Arc;

use grooveo_core::cart::Cart;
use grooveo_core::catalog::Catalog;
use grooveo_core::ProductId;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::store::{self, KeyValueStore, Slot};

/// Reads and writes the `cart` slot.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<Catalog>,
}

impl CartService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    /// Current cart; empty if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn cart(&self) -> Result<Cart> {
        Ok(store::load(self.store.as_ref(), Slot::Cart)?.unwrap_or_default())
    }

    /// Add units of a catalog product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown product and
    /// `AppError::BadRequest` for a zero quantity or an out-of-stock product.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn add(&self, product_id: &ProductId, quantity: u32) -> Result<Cart> {
        if quantity == 0 {
            return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
        }
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
        if !product.is_in_stock() {
            return Err(AppError::BadRequest(format!("{} is out of stock", product.name)));
        }

        let mut cart = self.cart()?;
        cart.add(product, quantity);
        self.save(&cart)?;
        tracing::info!(items = cart.item_count(), "Added to cart");
        Ok(cart)
    }

    /// Remove a line. Returns `false` if the product was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read or written.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove(&self, product_id: &ProductId) -> Result<bool> {
        let mut cart = self.cart()?;
        let removed = cart.remove(product_id);
        if removed {
            self.save(&cart)?;
        }
        Ok(removed)
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the cart.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<Cart> {
        let mut cart = self.cart()?;
        if !cart.update_quantity(product_id, quantity) {
            return Err(AppError::NotFound(format!("cart line for {product_id}")));
        }
        self.save(&cart)?;
        Ok(cart)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.save(&Cart::default())
    }

    fn save(&self, cart: &Cart) -> Result<()> {
        store::save(self.store.as_ref(), Slot::Cart, cart)?;
        Ok(())
    }
}
