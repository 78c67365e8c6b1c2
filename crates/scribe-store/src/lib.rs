mod kv;
mod migrations;
mod notes;

pub use kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use notes::NoteStore;
