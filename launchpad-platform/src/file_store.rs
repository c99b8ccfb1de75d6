//! File-backed key-value store.
//!
//! Each key is stored as `{key}.json` in one directory. Writes go to a
//! temporary file that is then renamed over the target, so a crash mid-write
//! leaves the previous value intact.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use launchpad_ui::{KeyValueStore, StorageError};
use tracing::debug;

/// Directory name under the platform data directory.
const APP_DIR: &str = "launchpad";

/// Persistent store keeping one JSON file per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Create a store in the platform data directory, falling back to the
    /// working directory where none exists.
    pub fn default_location() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(APP_DIR))
    }

    /// Directory holding the stored files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "FileStore"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        debug!(key, path = %path.display(), "stored value");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use launchpad_ui::{KeyValueStore, StorageError};
    use tempfile::TempDir;

    use super::FileStore;

    #[test]
    fn stores_one_file_per_key() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get_item("settings").expect("read"), None);

        store
            .set_item("settings", r#"{"useStars":false}"#)
            .expect("write");
        assert!(dir.path().join("nested/settings.json").is_file());
        assert!(!dir.path().join("nested/settings.json.tmp").exists());
        assert_eq!(
            store.get_item("settings").expect("read").as_deref(),
            Some(r#"{"useStars":false}"#)
        );

        store.set_item("settings", "{}").expect("overwrite");
        assert_eq!(store.get_item("settings").expect("read").as_deref(), Some("{}"));

        store.remove_item("settings").expect("remove");
        store.remove_item("settings").expect("remove missing");
        assert_eq!(store.get_item("settings").expect("read"), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(key)) if key == "../escape"
        ));
        assert!(store.get_item("").is_err());
    }
}
