use std::sync::Arc;

use anyhow::{Context, Result};
use scribe_core::Note;
use tracing::{debug, info};

use crate::kv::KeyValueStore;

/// The ordered note collection, newest first, mirrored to a single slot.
///
/// Every mutation rewrites the whole slot. A failed write leaves the in-memory
/// list changed and reports the error.
pub struct NoteStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    notes: Vec<Note>,
}

impl NoteStore {
    /// Reads the slot once. A missing slot is an empty collection.
    pub fn load(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let notes = load_all(kv.as_ref(), &key)?;
        info!(key = %key, count = notes.len(), "loaded notes");
        Ok(Self { kv, key, notes })
    }

    /// Starts from an empty collection without reading the slot.
    pub fn empty(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            notes: Vec::new(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn prepend(&mut self, note: Note) -> Result<()> {
        self.notes.insert(0, note);
        self.persist_all()
    }

    /// Overwrites the content of `id`. Returns `false` when no such note exists.
    pub fn update_content(&mut self, id: &str, content: &str) -> Result<bool> {
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            return Ok(false);
        };
        note.content = content.to_owned();
        self.persist_all()?;
        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> Result<Option<Note>> {
        let Some(position) = self.notes.iter().position(|note| note.id == id) else {
            return Ok(None);
        };
        let removed = self.notes.remove(position);
        self.persist_all()?;
        Ok(Some(removed))
    }

    pub fn persist_all(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.notes).context("failed to serialize notes")?;
        self.kv
            .set(&self.key, &blob)
            .with_context(|| format!("failed to write notes slot {}", self.key))?;
        debug!(key = %self.key, count = self.notes.len(), "persisted notes");
        Ok(())
    }
}

fn load_all(kv: &dyn KeyValueStore, key: &str) -> Result<Vec<Note>> {
    let Some(blob) = kv
        .get(key)
        .with_context(|| format!("failed to read notes slot {key}"))?
    else {
        return Ok(Vec::new());
    };
    serde_json::from_str(&blob).with_context(|| format!("invalid notes blob in slot {key}"))
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::kv::{MemoryKeyValueStore, SqliteKeyValueStore};

    const KEY: &str = "scribe_ai_notes";

    fn note(id: &str, title: &str, content: &str, created_at: i64) -> Note {
        Note {
            id: id.to_owned(),
            title: title.to_owned(),
            content: content.to_owned(),
            created_at,
        }
    }

    #[test]
    fn reload_reproduces_persisted_list() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set(KEY, r#"[{"id":"1","title":"A","content":"x","createdAt":1000}]"#)
            .expect("seed");

        let store = NoteStore::load(kv.clone(), KEY).expect("load");
        assert_eq!(store.notes(), &[note("1", "A", "x", 1000)]);

        store.persist_all().expect("persist");
        let reloaded = NoteStore::load(kv, KEY).expect("reload");
        assert_eq!(reloaded.notes(), store.notes());
    }

    #[test]
    fn missing_slot_loads_empty() {
        let store =
            NoteStore::load(Arc::new(MemoryKeyValueStore::new()), KEY).expect("load empty");
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_blob_is_a_load_error() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.set(KEY, r#"{"not":"a list"}"#).expect("seed");
        assert!(NoteStore::load(kv, KEY).is_err());
    }

    #[test]
    fn mutations_are_mirrored_to_the_slot() {
        let kv = Arc::new(SqliteKeyValueStore::in_memory().expect("open store"));
        let mut store = NoteStore::empty(kv.clone(), KEY);

        store.prepend(note("1", "First", "one", 1)).expect("prepend");
        store.prepend(note("2", "Second", "two", 2)).expect("prepend");
        assert!(store.update_content("1", "uno").expect("update"));
        assert!(!store.update_content("missing", "x").expect("update missing"));

        let reloaded = NoteStore::load(kv.clone(), KEY).expect("reload");
        let ids: Vec<_> = reloaded.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
        assert_eq!(reloaded.get("1").expect("note 1").content, "uno");

        let removed = store.remove("2").expect("remove").expect("existed");
        assert_eq!(removed.title, "Second");
        assert!(store.remove("2").expect("remove again").is_none());
        assert_eq!(NoteStore::load(kv, KEY).expect("reload").len(), 1);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("storage is read-only"))
        }
    }

    #[test]
    fn failed_write_keeps_in_memory_change() {
        let mut store = NoteStore::empty(Arc::new(ReadOnlyStore), KEY);
        let err = store.prepend(note("1", "A", "x", 1)).expect_err("must fail");
        assert!(err.to_string().contains("failed to write notes slot"));
        assert_eq!(store.len(), 1);
    }
}
