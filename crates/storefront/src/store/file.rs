//! Single-file JSON store.
//!
//! All slots live in one document, `storefront.json`, inside the data
//! directory:
//!
//! ```json
//! { "cart": [...], "loyalty": { "balance": 120, "transactions": [...] } }
//! ```
//!
//! Every write rewrites the whole file through a temporary sibling and a
//! rename, so a crash mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use super::{KeyValueStore, Slot, StoreError};

const FILE_NAME: &str = "storefront.json";

type Document = BTreeMap<String, Value>;

/// File-backed store rooted at a data directory.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) the store in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(FILE_NAME);
        tracing::debug!(path = %path.display(), "Opened file store");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Document::new());
        }
        match serde_json::from_str(&raw) {
            Ok(document) => Ok(document),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "State file is not valid JSON, starting empty"
                );
                Ok(Document::new())
            }
        }
    }

    fn write_document(&self, document: &Document) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Document)) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut document = self.read_document()?;
        f(&mut document);
        self.write_document(&document)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, slot: Slot) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let document = self.read_document()?;
        Ok(document.get(slot.key()).map(Value::to_string))
    }

    fn set(&self, slot: Slot, value: String) -> Result<(), StoreError> {
        let value: Value = serde_json::from_str(&value)?;
        self.update(|document| {
            document.insert(slot.key().to_string(), value);
        })
    }

    fn remove(&self, slot: Slot) -> Result<(), StoreError> {
        self.update(|document| {
            document.remove(slot.key());
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(Document::clear)
    }
}
