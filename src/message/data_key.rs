//! Typed data keys and their registry.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::codec::{CodecError, DataCodec, JsonCodec};

/// A named, typed slot inside a message.
///
/// Identity is the key's name, which is globally unique within one
/// [`DataKeyRegistry`]. The key owns the codec used to encode and decode
/// its payload type, so the typed `set`/`get` round trip on a message
/// never involves a cast.
///
/// Keys are defined once at process start and handed out by value; cloning
/// a key clones a handle to the same codec, not the codec itself.
pub struct DataKey<T> {
    name: &'static str,
    codec: Arc<dyn DataCodec<T>>,
}

impl<T> DataKey<T> {
    /// The globally unique name identifying this key.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        self.codec.encode(value)
    }

    pub(crate) fn decode(&self, raw: &[u8]) -> Result<T, CodecError> {
        self.codec.decode(raw)
    }
}

impl<T> Clone for DataKey<T> {
    fn clone(&self) -> Self {
        DataKey {
            name: self.name,
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<T> fmt::Debug for DataKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataKey").field("name", &self.name).finish()
    }
}

/// Error type for data key definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataKeyError {
    /// A key with this name was already defined in the registry.
    DuplicateName(&'static str),
}

impl fmt::Display for DataKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKeyError::DuplicateName(name) => {
                write!(f, "data key '{}' is already defined", name)
            }
        }
    }
}

impl Error for DataKeyError {}

/// Registry enforcing global uniqueness of data key names.
///
/// Built once during process initialization; there is no removal and no
/// redefinition. A name collision is a wiring mistake and aborts
/// initialization.
///
/// ## Example
///
/// ```
/// use domainbus::{DataKeyRegistry, JsonCodec};
///
/// let mut registry = DataKeyRegistry::new();
/// let executed_by = registry
///     .define("common.executedby", JsonCodec::<String>::new())
///     .unwrap();
/// assert_eq!(executed_by.name(), "common.executedby");
///
/// // Defining the same name again fails, whatever the payload type.
/// assert!(registry.define_json::<u64>("common.executedby").is_err());
/// ```
pub struct DataKeyRegistry {
    names: BTreeSet<&'static str>,
}

impl Default for DataKeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DataKeyRegistry {
    pub fn new() -> Self {
        DataKeyRegistry {
            names: BTreeSet::new(),
        }
    }

    /// Define a key with an explicit codec.
    ///
    /// Fails with [`DataKeyError::DuplicateName`] if the name is taken.
    pub fn define<T, C>(&mut self, name: &'static str, codec: C) -> Result<DataKey<T>, DataKeyError>
    where
        T: 'static,
        C: DataCodec<T> + 'static,
    {
        if !self.names.insert(name) {
            return Err(DataKeyError::DuplicateName(name));
        }
        Ok(DataKey {
            name,
            codec: Arc::new(codec),
        })
    }

    /// Define a key using the default JSON codec.
    pub fn define_json<T>(&mut self, name: &'static str) -> Result<DataKey<T>, DataKeyError>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.define(name, JsonCodec::new())
    }

    /// Number of keys defined so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no keys have been defined yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether a key with this name was defined.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
