//! Recently opened files, persisted between sessions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VolviewError};

/// Maximum number of remembered paths.
pub const HISTORY_CAPACITY: usize = 10;

/// On-disk layout: `{ "recent": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    recent: Vec<PathBuf>,
}

/// Returns `<data_local_dir>/volview/history.json`.
pub fn default_history_path() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|base| base.join("volview").join("history.json"))
        .ok_or(VolviewError::NoDataDir)
}

/// Most-recent-first list of opened paths.
///
/// Paths are unique by exact value and the list never exceeds
/// [`HISTORY_CAPACITY`]. Persistence is best effort: read and write failures
/// are logged and otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<PathBuf>,
    file: Option<PathBuf>,
}

impl HistoryStore {
    /// Creates an empty store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates an empty store persisted at `file`. Call [`load`](Self::load) to read it.
    pub fn with_file(file: impl Into<PathBuf>) -> Self {
        Self {
            entries: Vec::new(),
            file: Some(file.into()),
        }
    }

    /// Creates a store at the platform default location, or in memory if
    /// there is none.
    pub fn at_default_location() -> Self {
        match default_history_path() {
            Ok(path) => Self::with_file(path),
            Err(err) => {
                log::debug!("recent files kept in memory: {err}");
                Self::in_memory()
            }
        }
    }

    /// Returns the entries, most recent first.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves `path` to the front, truncates and persists.
    ///
    /// Relative paths are made absolute against the working directory first;
    /// if that fails the path is kept as given.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        let path = absolute_or_given(path.into());
        self.entries.retain(|existing| *existing != path);
        self.entries.insert(0, path);
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist();
    }

    /// Forgets every entry and persists the empty list.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Replaces the entries with the persisted list, dropping paths that no
    /// longer exist. Any read failure leaves the store empty.
    pub fn load(&mut self) {
        self.entries = match self.read() {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!("no recent files loaded: {err}");
                Vec::new()
            }
        };
    }

    /// Writes the entries to the backing file, if any.
    pub fn persist(&self) {
        if let Err(err) = self.write() {
            log::warn!("could not save recent files: {err}");
        }
    }

    fn read(&self) -> Result<Vec<PathBuf>> {
        let Some(file) = &self.file else {
            return Ok(Vec::new());
        };
        let text = std::fs::read_to_string(file)?;
        let parsed: HistoryFile = serde_json::from_str(&text)?;
        let mut entries: Vec<PathBuf> = Vec::with_capacity(HISTORY_CAPACITY);
        for path in parsed.recent {
            if path.exists() && !entries.contains(&path) {
                entries.push(path);
            }
        }
        entries.truncate(HISTORY_CAPACITY);
        Ok(entries)
    }

    fn write(&self) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = HistoryFile {
            recent: self.entries.clone(),
        };
        std::fs::write(file, serde_json::to_string_pretty(&body)?)?;
        Ok(())
    }
}

fn absolute_or_given(path: PathBuf) -> PathBuf {
    match std::path::absolute(&path) {
        Ok(absolute) => absolute,
        Err(err) => {
            log::debug!("keeping {} as given: {err}", path.display());
            path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_moves_to_front() {
        let mut history = HistoryStore::in_memory();
        history.push("/a");
        history.push("/b");
        history.push("/a");
        assert_eq!(
            history.entries(),
            &[PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn test_same_path_twice_is_one_entry() {
        let mut history = HistoryStore::in_memory();
        history.push("/x");
        history.push("/x");
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries(), &[PathBuf::from("/x")]);
    }

    #[test]
    fn test_relative_paths_are_stored_absolute() {
        let mut history = HistoryStore::in_memory();
        history.push("scans/knee.nii");
        let expected = std::env::current_dir().unwrap().join("scans/knee.nii");
        assert!(history.entries()[0].is_absolute());
        assert_eq!(history.entries(), &[expected]);

        history.push(std::env::current_dir().unwrap().join("scans/knee.nii"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_push_is_idempotent() {
        let mut history = HistoryStore::in_memory();
        history.push("/x");
        history.push("/y");
        let once = history.entries().to_vec();
        history.push("/y");
        assert_eq!(history.entries(), once.as_slice());
    }

    #[test]
    fn test_capacity() {
        let mut history = HistoryStore::in_memory();
        for name in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"] {
            history.push(format!("/{name}"));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0], PathBuf::from("/k"));
        assert!(!history.entries().contains(&PathBuf::from("/a")));
    }

    #[test]
    fn test_load_drops_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.nii");
        std::fs::write(&present, b"").unwrap();
        let file = dir.path().join("history.json");
        let body = serde_json::json!({
            "recent": [present.clone(), dir.path().join("gone.nii")]
        });
        std::fs::write(&file, body.to_string()).unwrap();

        let mut history = HistoryStore::with_file(&file);
        history.load();
        assert_eq!(history.entries(), &[present]);
    }

    #[test]
    fn test_unreadable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("history.json");
        std::fs::write(&file, "garbage").unwrap();
        let mut history = HistoryStore::with_file(&file);
        history.load();
        assert!(history.is_empty());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be makes the write fail
        let file = dir.path().join("history.json");
        std::fs::create_dir(&file).unwrap();
        let mut history = HistoryStore::with_file(&file);
        history.push("/a");
        assert_eq!(history.len(), 1);
    }
}
