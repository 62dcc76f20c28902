mod bus;
mod executor;
mod handler;
mod keys;
mod message;

pub use bus::{BusBuilder, BusConfigError, DomainBus, SendError};
pub use executor::{ImmediateExecutor, PoolStats, Task, TaskExecutor, ThreadPoolExecutor};
pub use handler::{AsyncHandler, HandlerError, SyncHandler};
pub use keys::{JobData, ProjectData, StandardKeys, UserData};
pub use message::{
    BitcodeCodec, CodecError, DataCodec, DataKey, DataKeyError, DataKeyRegistry, JsonCodec,
    Message, MessageId, SyncResult,
};
