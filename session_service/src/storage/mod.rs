mod config;
mod data_store;
mod errors;
mod maintenance;
mod memory;
mod null;
mod redis;
mod schema_validation;
mod types;

pub use config::{
    SESSION_SAVE_HANDLER_TYPE, SESSION_SAVE_HANDLER_URL, SESSION_TABLE, SaveHandlerFactory,
    SaveHandlerType,
};
pub use data_store::SqlSaveHandler;
pub use errors::StorageError;
pub use maintenance::collect_garbage;
pub use memory::{MemorySaveHandler, WriteStats};
pub use null::NullSaveHandler;
pub use redis::RedisSaveHandler;
pub use types::{ExistenceAware, SaveHandler};
