//! Ephemeral key-value storage for the demo user record
//!
//! Writes are best-effort: callers log failures and carry on.

mod file;
mod memory;
mod record;
mod traits;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::UserRecord;
pub use traits::KeyValueStore;

#[cfg(test)]
pub use traits::MockKeyValueStore;
