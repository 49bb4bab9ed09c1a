//! Note store with file-based JSON persistence
//!
//! All notes live in a single pretty-printed JSON array. The file is the
//! source of truth: every read goes to disk, and every mutation is a
//! load → modify → save cycle performed under one mutex so concurrent
//! writers cannot lose each other's updates. Saves go through a temporary
//! sibling file and a rename, so readers never observe a partial write.

use crate::error::{Error, Result};
use crate::notes::types::{Note, DEFAULT_TITLE};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

/// File-backed note store
pub struct NoteStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl NoteStore {
    /// Create a store backed by the given file. The file is not touched until
    /// the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all notes in insertion order.
    ///
    /// A missing, unreadable or malformed file yields an empty list.
    pub async fn load_all(&self) -> Vec<Note> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read notes file {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Note>>(&data) {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!("Failed to parse notes file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Replace the persisted note list
    pub async fn save_all(&self, notes: &[Note]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_file(notes).await
    }

    /// Create a note. `title` falls back to "Untitled"; `content` must be
    /// non-empty after trimming.
    pub async fn create(&self, title: &str, content: &str) -> Result<Note> {
        let content = required_content(content)?;
        let title = title.trim();

        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            },
            content: content.to_string(),
        };

        let _guard = self.write_lock.lock().await;
        let mut notes = self.load_all().await;
        notes.push(note.clone());
        self.write_file(&notes).await?;

        tracing::debug!(id = %note.id, "Created note");
        Ok(note)
    }

    /// Update a note in place. An empty `title` keeps the existing one.
    pub async fn update(&self, id: &str, title: &str, content: &str) -> Result<Note> {
        let content = required_content(content)?;
        let title = title.trim();

        let _guard = self.write_lock.lock().await;
        let mut notes = self.load_all().await;

        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound("Note not found".to_string()))?;

        note.content = content.to_string();
        if !title.is_empty() {
            note.title = title.to_string();
        }
        let updated = note.clone();

        self.write_file(&notes).await?;

        tracing::debug!(id = %updated.id, "Updated note");
        Ok(updated)
    }

    /// Delete a note by id
    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut notes = self.load_all().await;

        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(Error::NotFound("Note not found".to_string()));
        }

        self.write_file(&notes).await?;

        tracing::debug!(id = %id, "Deleted note");
        Ok(())
    }

    /// Write the list via a temporary sibling file + rename. Callers hold
    /// `write_lock`.
    async fn write_file(&self, notes: &[Note]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(notes)?;
        let tmp = self.tmp_path();
        let written = match tokio::fs::write(&tmp, json).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "notes.json".to_string());
        self.path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }
}

fn required_content(content: &str) -> Result<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::Validation("Content is required".to_string()));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn make_store() -> (NoteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path().join("data").join("notes.json"));
        (store, dir)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let (store, _dir) = make_store();
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty() {
        let (store, _dir) = make_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load_all().await.is_empty());

        std::fs::write(store.path(), r#"{"id":"x"}"#).unwrap();
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_default_title() {
        let (store, _dir) = make_store();
        let note = store.create("", "Hello").await.unwrap();

        assert_eq!(note.title, "Untitled");
        assert_eq!(note.content, "Hello");
        assert!(Uuid::parse_str(&note.id).is_ok());

        let notes = store.load_all().await;
        assert_eq!(notes, vec![note]);
    }

    #[tokio::test]
    async fn test_create_trims_fields() {
        let (store, _dir) = make_store();
        let note = store.create("  Bio  ", "\n I like tea \n").await.unwrap();
        assert_eq!(note.title, "Bio");
        assert_eq!(note.content, "I like tea");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let (store, _dir) = make_store();
        assert!(matches!(store.create("t", "").await, Err(Error::Validation(_))));
        assert!(matches!(store.create("t", "  \n\t").await, Err(Error::Validation(_))));
        assert!(store.load_all().await.is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_insertion_order() {
        let (store, _dir) = make_store();
        let a = store.create("a", "first").await.unwrap();
        let b = store.create("b", "second").await.unwrap();
        let c = store.create("c", "third").await.unwrap();

        let ids: Vec<String> = store.load_all().await.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn test_update_replaces_content_and_title() {
        let (store, _dir) = make_store();
        let note = store.create("Old", "old content").await.unwrap();

        let updated = store.update(&note.id, "New", "new content").await.unwrap();
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "new content");
        assert_eq!(store.load_all().await, vec![updated]);
    }

    #[tokio::test]
    async fn test_update_blank_title_keeps_existing() {
        let (store, _dir) = make_store();
        let note = store.create("Keep me", "v1").await.unwrap();

        let updated = store.update(&note.id, "   ", "v2").await.unwrap();
        assert_eq!(updated.title, "Keep me");
        assert_eq!(updated.content, "v2");
    }

    #[tokio::test]
    async fn test_update_not_found_does_not_mutate() {
        let (store, _dir) = make_store();
        store.create("a", "content").await.unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let result = store.update("missing", "x", "y").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_content() {
        let (store, _dir) = make_store();
        let note = store.create("a", "content").await.unwrap();

        let result = store.update(&note.id, "b", " ").await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.load_all().await, vec![note]);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let (store, _dir) = make_store();
        let a = store.create("a", "1").await.unwrap();
        let b = store.create("b", "2").await.unwrap();

        store.delete(&a.id).await.unwrap();
        assert_eq!(store.load_all().await, vec![b]);

        let again = store.delete(&a.id).await;
        assert!(matches!(again, Err(Error::NotFound(_))));
        assert_eq!(store.load_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_load_round_trip_is_stable() {
        let (store, _dir) = make_store();
        store.create("Résumé", "Café in München ✓").await.unwrap();
        store.create("", "plain").await.unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let notes = store.load_all().await;
        store.save_all(&notes).await.unwrap();

        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.load_all().await, notes);
    }

    #[tokio::test]
    async fn test_file_is_pretty_and_keeps_non_ascii() {
        let (store, _dir) = make_store();
        store.create("日記", "こんにちは").await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("こんにちは"));
        assert!(raw.contains("\n  {"));
        assert!(!raw.contains("\\u"));
    }

    #[tokio::test]
    async fn test_no_tmp_files_left_behind() {
        let (store, _dir) = make_store();
        store.create("a", "1").await.unwrap();
        store.create("b", "2").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["notes.json".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_save_removes_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::create_dir_all(path.join("blocker")).unwrap();
        let store = NoteStore::new(&path);

        assert!(store.save_all(&[]).await.is_err());

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let (store, _dir) = make_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.create("", &format!("note {}", i)).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.load_all().await.len(), 20);
    }
}
