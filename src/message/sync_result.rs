//! Result envelope of a synchronous send.

use std::fmt;

use serde_json::Value;

use super::codec::CodecError;
use super::data_key::DataKey;
use super::message::DataMap;
use super::message_id::MessageId;

/// The answer produced by a synchronous handler.
///
/// Mirrors [`Message`](super::Message): an id plus typed data slots, read
/// through the same [`DataKey`] contract. The result is owned solely by
/// the caller of `send_sync` and is never shared with other handlers.
///
/// ## Example
///
/// ```
/// use domainbus::{DataKeyRegistry, MessageId, SyncResult};
///
/// let mut registry = DataKeyRegistry::new();
/// let trafficlight = registry.define_json::<String>("report.trafficlight").unwrap();
///
/// let mut result = SyncResult::new(MessageId::JobDone);
/// result.set(&trafficlight, &"GREEN".to_string()).unwrap();
/// assert_eq!(result.get(&trafficlight).unwrap(), Some("GREEN".to_string()));
/// ```
pub struct SyncResult {
    id: MessageId,
    data: DataMap,
}

impl SyncResult {
    /// Create an empty result for the given id.
    pub fn new(id: MessageId) -> Self {
        SyncResult {
            id,
            data: DataMap::default(),
        }
    }

    /// The id this result answers.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Store a value under a typed key, encoding it through the key's codec.
    pub fn set<T>(&mut self, key: &DataKey<T>, value: &T) -> Result<(), CodecError> {
        self.data.set(key, value)
    }

    /// Retrieve a value stored under a typed key; `Ok(None)` when unset.
    pub fn get<T>(&self, key: &DataKey<T>) -> Result<Option<T>, CodecError> {
        self.data.get(key)
    }

    /// Whether a value is stored under the given key.
    pub fn contains<T>(&self, key: &DataKey<T>) -> bool {
        self.data.contains(key.name())
    }

    /// Loggable JSON rendering, same shape as a message snapshot.
    pub fn snapshot(&self) -> Value {
        serde_json::json!({
            "message_id": self.id.to_string(),
            "data": self.data.snapshot(),
        })
    }
}

impl fmt::Debug for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncResult")
            .field("id", &self.id)
            .field("keys", &self.data.key_names().collect::<Vec<_>>())
            .finish()
    }
}
