// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON config service over a byte-oriented storage port.
//!
//! Keys are logical names such as `profiles/fast`; how they map onto storage
//! is up to the [`ConfigStore`] implementation.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Where serialized configs live.
pub trait ConfigStore {
    /// Reads the blob stored under `key`; [`ConfigError::NotFound`] if there
    /// is none.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Writes `data` under `key`, replacing any previous blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Failures of the config layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing is stored under the key.
    #[error("config not found")]
    NotFound,
    /// The backing store could not be read or written.
    #[error("config i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// A stored blob is not valid JSON for the requested type.
    #[error("config is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    /// Invalid key or invalid settings.
    #[error("{0}")]
    Other(String),
}

/// Serializes config values as JSON and delegates storage to a
/// [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwraps the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize the value stored under `key`. Missing keys and
    /// empty blobs yield `Ok(None)`.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize (pretty JSON) and persist `value` under `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}
