//! Application state shared by every front end.

use std::sync::Arc;

use grooveo_core::catalog::Catalog;
use grooveo_core::promo::PromoTable;

use crate::config::StorefrontConfig;
use crate::seed;
use crate::services::{
    CartService, CheckoutService, LoyaltyService, NotificationService, OrderService,
    WishlistService,
};
use crate::store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};

/// Application state: configuration, the backing store and one instance of
/// each service, all wired to the same store.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<Catalog>,
    promos: Arc<PromoTable>,
    cart: CartService,
    wishlist: WishlistService,
    loyalty: LoyaltyService,
    notifications: NotificationService,
    orders: OrderService,
    checkout: CheckoutService,
}

impl AppState {
    /// Create the state over an existing store.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Backing key-value store shared by every service
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let catalog = Arc::new(seed::catalog());
        let promos = Arc::new(PromoTable::default());

        let notifications =
            NotificationService::new(Arc::clone(&store), config.notification_email.clone());
        let cart = CartService::new(Arc::clone(&store), Arc::clone(&catalog));
        let wishlist = WishlistService::new(Arc::clone(&store), Arc::clone(&catalog));
        let loyalty = LoyaltyService::new(Arc::clone(&store));
        let orders = OrderService::new(Arc::clone(&store), notifications.clone());
        let checkout = CheckoutService::new(
            cart.clone(),
            loyalty.clone(),
            orders.clone(),
            notifications.clone(),
            Arc::clone(&catalog),
            Arc::clone(&promos),
            config.pricing,
            config.simulation,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
                promos,
                cart,
                wishlist,
                loyalty,
                notifications,
                orders,
                checkout,
            }),
        }
    }

    /// Create the state over a [`JsonFileStore`] in `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the data directory cannot be created.
    pub fn open(config: StorefrontConfig) -> Result<Self, StoreError> {
        let store = JsonFileStore::open(&config.data_dir)?;
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Create the state over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory(config: StorefrontConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn promos(&self) -> &PromoTable {
        &self.inner.promos
    }

    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistService {
        &self.inner.wishlist
    }

    #[must_use]
    pub fn loyalty(&self) -> &LoyaltyService {
        &self.inner.loyalty
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationService {
        &self.inner.notifications
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
