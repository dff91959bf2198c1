use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use vc_reflect::hash::HashMap;

use super::{SaveStorage, check_name};
use crate::StorageError;

/// Keeps save slots in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<(Box<str>, Box<str>), Vec<u8>>,
}

impl MemoryStorage {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored slots across all categories.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn key(category: &str, name: &str) -> (Box<str>, Box<str>) {
    (category.into(), name.into())
}

impl SaveStorage for MemoryStorage {
    fn load(&self, category: &str, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        check_name(category)?;
        check_name(name)?;
        Ok(self.slots.get(&key(category, name)).cloned())
    }

    fn save(&mut self, category: &str, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        check_name(category)?;
        check_name(name)?;
        self.slots.insert(key(category, name), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, category: &str, name: &str) -> Result<bool, StorageError> {
        check_name(category)?;
        check_name(name)?;
        Ok(self.slots.remove(&key(category, name)).is_some())
    }

    fn list(&self, category: &str) -> Result<Vec<String>, StorageError> {
        check_name(category)?;
        let mut names: Vec<String> = self
            .slots
            .keys()
            .filter(|(c, _)| &**c == category)
            .map(|(_, n)| String::from(&**n))
            .collect();
        names.sort_unstable();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStorage;
    use crate::{SaveStorage, StorageError};

    #[test]
    fn slots() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load("Level", "Arena").unwrap(), None);

        storage.save("Level", "Arena", b"{}").unwrap();
        storage.save("Level", "Cave", b"[]").unwrap();
        storage.save("Player", "Arena", b"1").unwrap();
        storage.save("Level", "Arena", b"{\"a\":1}").unwrap();

        assert_eq!(storage.len(), 3);
        assert_eq!(storage.load("Level", "Arena").unwrap().as_deref(), Some(&b"{\"a\":1}"[..]));
        assert_eq!(storage.list("Level").unwrap(), ["Arena", "Cave"]);
        assert!(storage.contains("Player", "Arena").unwrap());

        assert!(storage.remove("Level", "Cave").unwrap());
        assert!(!storage.remove("Level", "Cave").unwrap());
        assert!(matches!(storage.save("Level", "../x", b""), Err(StorageError::InvalidName(_))));
    }
}
