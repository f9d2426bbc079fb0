// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for livemap hosts.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::prefs::MapPrefs;

/// Key under which [`MapPrefs`] are stored.
pub const MAP_PREFS_KEY: &str = "map_prefs";

/// Storage port for raw config blobs, keyed by logical name.
///
/// Keys are plain identifiers (`[A-Za-z0-9_-]+`); stores may reject anything
/// else with [`ConfigError::InvalidKey`].
pub trait ConfigStore {
    /// Load a raw blob. [`ConfigError::NotFound`] when the key was never saved.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw blob, replacing any previous value.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("not found")]
    NotFound,
    /// The key is not a plain identifier.
    #[error("invalid config key {0:?}")]
    InvalidKey(String),
    /// Store I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A stored blob did not match the expected shape.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store-specific failure.
    #[error("other: {0}")]
    Other(String),
}

/// True for keys every store must accept.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Serializes values as JSON and hands the bytes to a [`ConfigStore`].
#[derive(Debug)]
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Service over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load the value under `key`; `Ok(None)` when missing or empty.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => return Ok(None),
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Store `value` under `key` as pretty JSON.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        if !is_valid_key(key) {
            return Err(ConfigError::InvalidKey(key.to_owned()));
        }
        self.store.save_raw(key, &serde_json::to_vec_pretty(value)?)
    }

    /// Load map preferences, falling back to defaults when none are stored.
    ///
    /// A stored blob that fails to parse is still an error.
    pub fn load_map_prefs(&self) -> Result<MapPrefs, ConfigError> {
        Ok(self.load(MAP_PREFS_KEY)?.unwrap_or_default())
    }

    /// Persist map preferences.
    pub fn save_map_prefs(&self, prefs: &MapPrefs) -> Result<(), ConfigError> {
        self.save(MAP_PREFS_KEY, prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStore {
        blobs: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl ConfigStore for MemStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.blobs
                .borrow()
                .get(key)
                .cloned()
                .ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_missing_prefs_fall_back_to_defaults() {
        let service = ConfigService::new(MemStore::default());
        let prefs = service.load_map_prefs().expect("load");
        assert_eq!(prefs.default_zoom, 17);
    }

    #[test]
    fn test_saved_prefs_round_trip() {
        let service = ConfigService::new(MemStore::default());
        let mut prefs = MapPrefs::default();
        prefs.default_zoom = 15;
        prefs.route_line.color = "red".into();
        service.save_map_prefs(&prefs).expect("save");
        let loaded = service.load_map_prefs().expect("load");
        assert_eq!(loaded.default_zoom, 15);
        assert_eq!(loaded.route_line.color, "red");
    }

    #[test]
    fn test_empty_blob_reads_as_missing() {
        let store = MemStore::default();
        store.save_raw(MAP_PREFS_KEY, b"").expect("save");
        let service = ConfigService::new(store);
        assert!(service.load::<MapPrefs>(MAP_PREFS_KEY).expect("load").is_none());
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let store = MemStore::default();
        store.save_raw(MAP_PREFS_KEY, b"{not json").expect("save");
        let service = ConfigService::new(store);
        assert!(matches!(service.load_map_prefs(), Err(ConfigError::Serde(_))));
    }

    #[test]
    fn test_path_like_keys_are_rejected() {
        let service = ConfigService::new(MemStore::default());
        assert!(matches!(
            service.save("../prefs", &MapPrefs::default()),
            Err(ConfigError::InvalidKey(_))
        ));
        assert!(is_valid_key(MAP_PREFS_KEY));
        assert!(service.store().blobs.borrow().is_empty());
    }
}
