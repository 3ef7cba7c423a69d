//! Key-value persistence for records and settings
//!
//! Values are stored as JSON strings under fixed keys. Browser builds use
//! LocalStorage; native builds and tests use an in-memory map.

mod memory;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStore;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage failures
#[derive(Debug)]
pub enum StoreError {
    /// No storage backend is reachable (private mode, no window)
    Unavailable,
    /// The backend rejected the operation
    Backend(String),
    /// Stored value is not valid JSON for the expected type
    Malformed(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "storage unavailable"),
            StoreError::Backend(msg) => write!(f, "storage error: {msg}"),
            StoreError::Malformed(err) => write!(f, "malformed stored value: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Malformed(err)
    }
}

/// String key-value storage
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON value; `Ok(None)` when the key is absent
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get_item(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        a: u32,
    }

    #[test]
    fn test_json_round_trip_and_absence() {
        let mut store = MemoryStore::default();
        assert!(load_json::<Record>(&store, "k").unwrap().is_none());

        save_json(&mut store, "k", &Record { a: 3 }).unwrap();
        assert_eq!(load_json::<Record>(&store, "k").unwrap(), Some(Record { a: 3 }));
    }

    #[test]
    fn test_malformed_value() {
        let mut store = MemoryStore::default();
        store.set_item("k", "{not json").unwrap();
        let err = load_json::<Record>(&store, "k").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
        assert!(err.to_string().starts_with("malformed stored value"));
    }
}
