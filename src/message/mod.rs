//! Message model - typed envelopes routed by the domain bus.
//!
//! A [`Message`] is an immutable envelope identified by a [`MessageId`] and
//! carrying a map of typed data slots. Each slot is addressed by a
//! [`DataKey`], which owns the codec used to encode and decode its payload.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Message                              │
//! │  id: MessageId                                              │
//! │  data: key name → encoded payload bytes                     │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼  set(key, value) / get(key)
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DataKey<T>                             │
//! │  name: globally unique identity                             │
//! │  codec: DataCodec<T> (JSON or bitcode)                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are encoded at `set` time through the key's codec, so a message
//! can be snapshotted for logging at any point without touching handler
//! types. Retrieval through the same key decodes with the same codec,
//! which keeps the typed round trip safe.

mod codec;
mod data_key;
mod message;
mod message_id;
mod sync_result;

pub use codec::{BitcodeCodec, CodecError, DataCodec, JsonCodec};
pub use data_key::{DataKey, DataKeyError, DataKeyRegistry};
pub use message::Message;
pub use message_id::MessageId;
pub use sync_result::SyncResult;
