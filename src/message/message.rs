//! The message envelope carried through the bus.

use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

use super::codec::CodecError;
use super::data_key::DataKey;
use super::message_id::MessageId;

/// Typed key/value storage shared by [`Message`] and
/// [`SyncResult`](super::SyncResult).
///
/// Values are encoded through the key's codec at `set` time, so the map
/// only ever holds transport bytes. Keyed by the key's name, which the
/// registry guarantees unique.
#[derive(Default, Clone)]
pub(crate) struct DataMap {
    entries: BTreeMap<&'static str, Vec<u8>>,
}

impl DataMap {
    pub(crate) fn set<T>(&mut self, key: &DataKey<T>, value: &T) -> Result<(), CodecError> {
        let raw = key.encode(value)?;
        self.entries.insert(key.name(), raw);
        Ok(())
    }

    pub(crate) fn get<T>(&self, key: &DataKey<T>) -> Result<Option<T>, CodecError> {
        match self.entries.get(key.name()) {
            Some(raw) => key.decode(raw).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub(crate) fn key_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Render every entry for logging: JSON payloads verbatim, other UTF-8
    /// as a string, binary as base64.
    pub(crate) fn snapshot(&self) -> Value {
        let mut rendered = serde_json::Map::new();
        for (name, raw) in &self.entries {
            let value = match std::str::from_utf8(raw) {
                Ok(text) => serde_json::from_str(text)
                    .unwrap_or_else(|_| Value::String(text.to_string())),
                Err(_) => Value::String(STANDARD.encode(raw)),
            };
            rendered.insert((*name).to_string(), value);
        }
        Value::Object(rendered)
    }
}

/// An immutable, typed envelope dispatched through the domain bus.
///
/// A message is identified by its [`MessageId`] and carries zero or more
/// typed payloads, each addressed by a [`DataKey`]. Messages are created
/// per send and are not reused: the producer builds one, the handler(s)
/// read it, and it is dropped when dispatch completes.
///
/// ## Example
///
/// ```
/// use domainbus::{DataKeyRegistry, Message, MessageId};
///
/// let mut registry = DataKeyRegistry::new();
/// let executed_by = registry.define_json::<String>("common.executedby").unwrap();
///
/// let mut message = Message::new(MessageId::UserCreated);
/// message.set(&executed_by, &"admin".to_string()).unwrap();
///
/// assert_eq!(message.id(), MessageId::UserCreated);
/// assert_eq!(message.get(&executed_by).unwrap(), Some("admin".to_string()));
/// ```
pub struct Message {
    id: MessageId,
    data: DataMap,
}

impl Message {
    /// Create an empty message for the given id.
    pub fn new(id: MessageId) -> Self {
        Message {
            id,
            data: DataMap::default(),
        }
    }

    /// The id identifying what this message represents.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Store a value under a typed key, encoding it through the key's codec.
    ///
    /// Setting the same key twice replaces the previous value.
    pub fn set<T>(&mut self, key: &DataKey<T>, value: &T) -> Result<(), CodecError> {
        self.data.set(key, value)
    }

    /// Retrieve a value stored under a typed key.
    ///
    /// Returns `Ok(None)` when the key was never set - absence is a valid
    /// state, not an error.
    pub fn get<T>(&self, key: &DataKey<T>) -> Result<Option<T>, CodecError> {
        self.data.get(key)
    }

    /// Whether a value is stored under the given key.
    pub fn contains<T>(&self, key: &DataKey<T>) -> bool {
        self.data.contains(key.name())
    }

    /// Loggable JSON rendering of the message: id plus every payload.
    ///
    /// Used by the bus when reporting an isolated handler failure, so an
    /// operator can reconstruct exactly what the handler received.
    pub fn snapshot(&self) -> Value {
        serde_json::json!({
            "message_id": self.id.to_string(),
            "data": self.data.snapshot(),
        })
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("keys", &self.data.key_names().collect::<Vec<_>>())
            .finish()
    }
}
