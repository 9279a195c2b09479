//! Wishlist service.

use std::sync::Arc;

use grooveo_core::cart::Wishlist;
use grooveo_core::catalog::Catalog;
use grooveo_core::ProductId;

use crate::error::{AppError, Result};
use crate::store::{self, KeyValueStore, Slot};

/// Reads and writes the `wishlist` slot.
#[derive(Clone)]
pub struct WishlistService {
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<Catalog>,
}

impl WishlistService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    /// Current wishlist; empty if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn wishlist(&self) -> Result<Wishlist> {
        Ok(store::load(self.store.as_ref(), Slot::Wishlist)?.unwrap_or_default())
    }

    /// Save a product. Returns `false` if it was already saved.
    ///
    /// Out-of-stock products may be saved.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown product.
    pub fn add(&self, product_id: &ProductId) -> Result<bool> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
        let mut wishlist = self.wishlist()?;
        let added = wishlist.add(product);
        if added {
            self.save(&wishlist)?;
            tracing::info!(product_id = %product_id, "Added to wishlist");
        }
        Ok(added)
    }

    /// Returns `false` if the product was not saved.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read or written.
    pub fn remove(&self, product_id: &ProductId) -> Result<bool> {
        let mut wishlist = self.wishlist()?;
        let removed = wishlist.remove(product_id);
        if removed {
            self.save(&wishlist)?;
        }
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn contains(&self, product_id: &ProductId) -> Result<bool> {
        Ok(self.wishlist()?.contains(product_id))
    }

    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn count(&self) -> Result<usize> {
        Ok(self.wishlist()?.count())
    }

    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.save(&Wishlist::default())
    }

    fn save(&self, wishlist: &Wishlist) -> Result<()> {
        store::save(self.store.as_ref(), Slot::Wishlist, wishlist)?;
        Ok(())
    }
}
