//! Integration tests for Grooveo.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p grooveo-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to placed order, across every service
//! - `file_store` - State surviving a reopen of the data directory

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;

use grooveo_core::order::ShippingAddress;
use grooveo_storefront::AppState;
use grooveo_storefront::config::StorefrontConfig;
use grooveo_storefront::store::StoreError;
use tempfile::TempDir;

/// A storefront backed by a file store in a temporary data directory.
///
/// The directory is deleted when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// # Errors
    ///
    /// Returns an error if the temporary directory or store cannot be
    /// created.
    pub fn new() -> io::Result<Self> {
        Self::with_env(&[])
    }

    /// Like [`TestContext::new`] with extra `GROOVEO_*` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory or store cannot be
    /// created, or a setting is invalid.
    pub fn with_env(vars: &[(&str, &str)]) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let config = config_for(&dir, vars)?;
        let state = AppState::open(config).map_err(into_io)?;
        Ok(Self { dir, state })
    }

    /// Open a second state over the same directory, as a new process would.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn reopen(&self) -> io::Result<AppState> {
        let config = config_for(&self.dir, &[])?;
        AppState::open(config).map_err(into_io)
    }
}

fn config_for(dir: &TempDir, vars: &[(&str, &str)]) -> io::Result<StorefrontConfig> {
    let data_dir = dir.path().to_string_lossy().into_owned();
    StorefrontConfig::from_lookup(|key| {
        if key == "GROOVEO_DATA_DIR" {
            return Some(data_dir.clone());
        }
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    })
    .map_err(io::Error::other)
}

fn into_io(err: StoreError) -> io::Error {
    match err {
        StoreError::Io(e) => e,
        other => io::Error::other(other),
    }
}

/// A complete shipping address.
#[must_use]
pub fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        name: "Meera Iyer".to_owned(),
        street: "4 Residency Road".to_owned(),
        city: "Chennai".to_owned(),
        state: "TN".to_owned(),
        postal_code: "600006".to_owned(),
        country: "India".to_owned(),
    }
}
