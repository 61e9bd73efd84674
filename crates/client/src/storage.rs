//! Guest-side persistence.
//!
//! Guests keep their cart and wishlist in a small key/value store under
//! well-known keys. The store is deliberately dumb: strings in, strings
//! out. The sessions own the JSON encoding.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::ClientError;

/// Key under which the guest cart is stored.
pub const CART_KEY: &str = "volt-cart";

/// Key under which the guest wishlist is stored.
pub const WISHLIST_KEY: &str = "volt-wishlist";

/// Key/value persistence for guest state.
pub trait GuestStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the backing store fails.
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the backing store fails.
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Delete a value. Deleting an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the backing store fails.
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

impl<S: GuestStore + ?Sized> GuestStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        (**self).remove(key)
    }
}

/// In-memory store, used in tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GuestStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let values = self
            .values
            .lock()
            .map_err(|_| ClientError::Storage("poisoned lock".to_owned()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ClientError::Storage("poisoned lock".to_owned()))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ClientError::Storage("poisoned lock".to_owned()))?;
        values.remove(key);
        Ok(())
    }
}

/// File-backed store, one file per key under a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| ClientError::Storage(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl GuestStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::Storage(format!("read {key}: {e}"))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        std::fs::write(self.path_for(key), value)
            .map_err(|e| ClientError::Storage(format!("write {key}: {e}")))
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!("remove {key}: {e}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get(CART_KEY).unwrap().is_none());

        store.set(CART_KEY, "[]").unwrap();
        assert_eq!(store.get(CART_KEY).unwrap().as_deref(), Some("[]"));

        store.remove(CART_KEY).unwrap();
        assert!(store.get(CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_remove_absent_is_noop() {
        let store = MemoryStore::new();
        store.remove("never-set").unwrap();
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("volt-store-{}", std::process::id()));
        let store = FileStore::new(&dir).unwrap();

        store.set(WISHLIST_KEY, r#"{"products":[]}"#).unwrap();
        assert!(store.get(WISHLIST_KEY).unwrap().is_some());

        store.remove(WISHLIST_KEY).unwrap();
        assert!(store.get(WISHLIST_KEY).unwrap().is_none());

        let _ = std::fs::remove_dir_all(dir);
    }
}
