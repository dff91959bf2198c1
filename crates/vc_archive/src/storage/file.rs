use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{SaveStorage, check_name};
use crate::StorageError;

const EXTENSION: &str = "json";

/// Stores each slot as `<root>/<category>/<name>.json`.
///
/// Writes go to a temporary file that then replaces the slot, so a failed
/// write never leaves a truncated save behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    #[inline]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file backing a slot.
    pub fn slot_path(&self, category: &str, name: &str) -> Result<PathBuf, StorageError> {
        check_name(category)?;
        check_name(name)?;
        Ok(self.root.join(category).join(format!("{name}.{EXTENSION}")))
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let tmp = temp_path_for(path);
    fs::write(&tmp, bytes).map_err(|e| StorageError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StorageError::io(path, e));
    }
    Ok(())
}

impl SaveStorage for FileStorage {
    fn load(&self, category: &str, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.slot_path(category, name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn save(&mut self, category: &str, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.slot_path(category, name)?;
        write_atomic(&path, bytes)
    }

    fn remove(&mut self, category: &str, name: &str) -> Result<bool, StorageError> {
        let path = self.slot_path(category, name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn list(&self, category: &str) -> Result<Vec<String>, StorageError> {
        check_name(category)?;
        let dir = self.root.join(category);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StorageError::io(&dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.into());
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::FileStorage;
    use crate::SaveStorage;

    #[test]
    fn slots_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());

        assert_eq!(storage.load("Level", "Arena").unwrap(), None);
        assert!(storage.list("Level").unwrap().is_empty());

        storage.save("Level", "Arena", b"{}").unwrap();
        storage.save("Level", "Arena", b"{\"v\":2}").unwrap();
        storage.save("Level", "Cave", b"{}").unwrap();

        let path = dir.path().join("Level").join("Arena.json");
        assert_eq!(storage.slot_path("Level", "Arena").unwrap(), path);
        assert_eq!(std::fs::read(&path).unwrap(), b"{\"v\":2}");
        assert!(!dir.path().join("Level").join("Arena.json.tmp").exists());
        assert_eq!(storage.list("Level").unwrap(), ["Arena", "Cave"]);

        assert!(storage.remove("Level", "Cave").unwrap());
        assert!(!storage.remove("Level", "Cave").unwrap());
        assert!(storage.save("..", "Arena", b"").is_err());
    }
}
