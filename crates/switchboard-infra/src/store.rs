//! JSON-file memory store.
//!
//! The whole [`MemoryDocument`] lives in one JSON file. Reads are served
//! from an in-memory copy guarded by a `tokio::sync::Mutex`; every
//! mutation rewrites the file atomically (tempfile in the same directory,
//! then rename). A file that fails to parse is quarantined with a
//! `.corrupt` suffix and replaced by an empty document, so a damaged store
//! never takes the agent down.

use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use switchboard_core::memory::{summarize_notes, MemoryStore};
use switchboard_core::pairs::{find_pairs, rebuild_pairs};
use switchboard_types::error::MemoryError;
use switchboard_types::memory::MemoryDocument;

/// File name of the persisted document inside the data directory.
pub const MEMORY_FILE_NAME: &str = "memory.json";

/// [`MemoryStore`] backed by a single JSON file.
pub struct JsonFileMemoryStore {
    path: PathBuf,
    doc: Mutex<MemoryDocument>,
}

impl JsonFileMemoryStore {
    /// Open (or create) the store at `path`.
    ///
    /// Never fails: a missing file starts empty, an unreadable file
    /// degrades to an empty in-memory document, and a corrupt file is
    /// renamed aside before starting fresh.
    pub fn open(path: PathBuf) -> Self {
        let doc = Self::load(&path);
        Self {
            path,
            doc: Mutex::new(doc),
        }
    }

    /// The default store location: `{data_dir}/memory.json`.
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join(MEMORY_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> MemoryDocument {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return MemoryDocument::new();
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "memory store unreadable, starting empty");
                return MemoryDocument::new();
            }
        };

        match serde_json::from_str::<MemoryDocument>(&content) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "memory store corrupt, quarantining");
                let quarantine = path.with_extension("json.corrupt");
                if let Err(err) = std::fs::rename(path, &quarantine) {
                    tracing::warn!(error = %err, "failed to quarantine corrupt store");
                }
                MemoryDocument::new()
            }
        }
    }

    /// Rewrite the backing file atomically. The document is small, so the
    /// blocking write happens inline.
    fn persist(&self, doc: &MemoryDocument) -> Result<(), MemoryError> {
        let json = serde_json::to_string_pretty(doc)
            .map_err(|err| MemoryError::Serialize(err.to_string()))?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|err| MemoryError::Io(err.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|err| MemoryError::Io(err.to_string()))?;
        tmp.write_all(json.as_bytes())
            .map_err(|err| MemoryError::Io(err.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|err| MemoryError::Io(err.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|err| MemoryError::Io(err.to_string()))?;
        Ok(())
    }
}

impl MemoryStore for JsonFileMemoryStore {
    async fn get_notes(&self, user: &str) -> Result<Vec<String>, MemoryError> {
        let doc = self.doc.lock().await;
        Ok(doc.get(user).map(|r| r.notes.clone()).unwrap_or_default())
    }

    async fn append_note(&self, user: &str, note: &str) -> Result<(), MemoryError> {
        if note.is_empty() {
            return Ok(());
        }
        let mut doc = self.doc.lock().await;
        doc.entry(user.to_string()).or_default().push_note(note);
        self.persist(&doc)
    }

    async fn summary(&self, user: &str, max_chars: usize) -> Result<String, MemoryError> {
        let doc = self.doc.lock().await;
        let notes = doc.get(user).map(|r| r.notes.as_slice()).unwrap_or(&[]);
        Ok(summarize_notes(notes, max_chars))
    }

    async fn set_pair(&self, user: &str, a: &str, b: &str) -> Result<(), MemoryError> {
        if a.is_empty() || b.is_empty() {
            return Ok(());
        }
        let mut doc = self.doc.lock().await;
        doc.entry(user.to_string()).or_default().set_pair(a, b);
        self.persist(&doc)
    }

    async fn find_pair(&self, user: &str, key: &str) -> Result<Option<String>, MemoryError> {
        let doc = self.doc.lock().await;
        Ok(doc.get(user).and_then(|r| r.pairs.get(key).cloned()))
    }

    async fn find_pair_any(&self, key: &str) -> Result<Option<String>, MemoryError> {
        let mut doc = self.doc.lock().await;
        if let Some(value) = doc.values().find_map(|r| r.pairs.get(key).cloned()) {
            return Ok(Some(value));
        }
        // Miss: the pair index may be stale, rebuild from notes and retry
        if rebuild_pairs(&mut doc) {
            self.persist(&doc)?;
        }
        Ok(doc.values().find_map(|r| r.pairs.get(key).cloned()))
    }

    async fn ingest_text_for_pairs(&self, user: &str, text: &str) -> Result<(), MemoryError> {
        let pairs = find_pairs(text);
        if pairs.is_empty() {
            return Ok(());
        }
        let mut doc = self.doc.lock().await;
        let record = doc.entry(user.to_string()).or_default();
        for (a, b) in pairs {
            record.set_pair(&a, &b);
        }
        self.persist(&doc)
    }

    async fn rebuild_all(&self) -> Result<(), MemoryError> {
        let mut doc = self.doc.lock().await;
        if rebuild_pairs(&mut doc) {
            self.persist(&doc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileMemoryStore {
        JsonFileMemoryStore::open(dir.path().join(MEMORY_FILE_NAME))
    }

    #[tokio::test]
    async fn test_notes_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let store = store_in(&tmp);
            store.append_note("alice", "likes rust").await.unwrap();
            store.append_note("alice", "dislikes mornings").await.unwrap();
        }
        let store = store_in(&tmp);
        assert_eq!(
            store.get_notes("alice").await.unwrap(),
            vec!["likes rust".to_string(), "dislikes mornings".to_string()]
        );
    }

    #[tokio::test]
    async fn test_pairs_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let store = store_in(&tmp);
            store.set_pair("bob", "1234", "5678").await.unwrap();
        }
        let store = store_in(&tmp);
        assert_eq!(
            store.find_pair("bob", "5678").await.unwrap().as_deref(),
            Some("1234")
        );
    }

    #[tokio::test]
    async fn test_find_pair_is_user_scoped() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.set_pair("alice", "1234", "5678").await.unwrap();

        assert!(store.find_pair("bob", "1234").await.unwrap().is_none());
        assert_eq!(
            store.find_pair_any("1234").await.unwrap().as_deref(),
            Some("5678")
        );
    }

    #[tokio::test]
    async fn test_find_pair_any_rebuilds_from_notes() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        // A note containing a pair that was never indexed
        store.append_note("carol", "codes 4711 -> 1147").await.unwrap();

        assert_eq!(
            store.find_pair_any("4711").await.unwrap().as_deref(),
            Some("1147")
        );
        // The rebuild is persisted, so the direct lookup now hits too
        assert_eq!(
            store.find_pair("carol", "1147").await.unwrap().as_deref(),
            Some("4711")
        );
    }

    #[tokio::test]
    async fn test_ingest_text_indexes_pairs() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store
            .ingest_text_for_pairs("dave", "remember 22 : 99 for me")
            .await
            .unwrap();
        assert_eq!(
            store.find_pair("dave", "22").await.unwrap().as_deref(),
            Some("99")
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_quarantined() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MEMORY_FILE_NAME);
        std::fs::write(&path, "{ not json at all").unwrap();

        let store = JsonFileMemoryStore::open(path.clone());
        assert!(store.get_notes("anyone").await.unwrap().is_empty());
        assert!(tmp.path().join("memory.json.corrupt").exists());

        // The store works normally after quarantine
        store.append_note("anyone", "fresh start").await.unwrap();
        assert_eq!(
            store.get_notes("anyone").await.unwrap(),
            vec!["fresh start".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.get_notes("nobody").await.unwrap().is_empty());
        assert!(store.summary("nobody", 1000).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stray_partial_temp_file_ignored_on_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let store = store_in(&tmp);
            store.append_note("fay", "survives the crash").await.unwrap();
        }
        // A write interrupted before the rename leaves an orphaned temp
        // file with truncated JSON beside the store
        std::fs::write(
            tmp.path().join(".tmpa1b2c3"),
            r#"{"fay":{"notes":["trunc"#,
        )
        .unwrap();

        let store = store_in(&tmp);
        assert_eq!(
            store.get_notes("fay").await.unwrap(),
            vec!["survives the crash".to_string()]
        );
        assert!(!tmp.path().join("memory.json.corrupt").exists());
    }

    #[tokio::test]
    async fn test_document_on_disk_parses_after_every_write() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        for i in 0..20 {
            store.append_note("gus", &format!("note {i}")).await.unwrap();
            // Each write replaces the file whole; a reader between writes
            // never observes a partial document
            let content =
                std::fs::read_to_string(tmp.path().join(MEMORY_FILE_NAME)).unwrap();
            let doc: MemoryDocument = serde_json::from_str(&content).unwrap();
            assert_eq!(doc["gus"].notes.len(), i + 1);
        }
    }

    #[tokio::test]
    async fn test_empty_note_is_noop() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.append_note("erin", "").await.unwrap();
        assert!(store.get_notes("erin").await.unwrap().is_empty());
        // No file is created for a no-op
        assert!(!tmp.path().join(MEMORY_FILE_NAME).exists());
    }
}
