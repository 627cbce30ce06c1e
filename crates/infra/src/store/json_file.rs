use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use shopledger_ledger::{KeyValueStore, StorageKey, StoreError};

/// One `<key>.json` file per key under a directory.
///
/// The directory is created on first write. Writes go to a temporary file
/// that is then renamed over the target, so a crash mid-write leaves the
/// previous value in place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let tmp = target.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;
        tracing::trace!(path = %target.display(), bytes = value.len(), "state written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopledger_ledger::{NoopPresenter, Storefront, StorefrontOptions};

    #[test]
    fn missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));
        assert_eq!(store.get(StorageKey::Catalog).unwrap(), None);
    }

    #[test]
    fn put_creates_directory_and_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state"));

        store.put(StorageKey::Catalog, "[]").unwrap();
        store.put(StorageKey::Cart, "[{}]").unwrap();

        assert!(dir.path().join("state/sim-catalog.json").is_file());
        assert_eq!(store.get(StorageKey::Cart).unwrap().as_deref(), Some("[{}]"));
        assert!(!dir.path().join("state/sim-cart.json.tmp").exists());
    }

    #[test]
    fn storefront_state_survives_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let mut sf = Storefront::open(
            JsonFileStore::new(dir.path()),
            NoopPresenter,
            StorefrontOptions::default(),
        );
        let id = sf.ledger().catalog().products()[2].id_typed().clone();
        sf.add_to_cart(&id).unwrap();
        drop(sf);

        let sf = Storefront::open(
            JsonFileStore::new(dir.path()),
            NoopPresenter,
            StorefrontOptions::default(),
        );
        assert_eq!(sf.ledger().held_units(&id), 1);
        assert_eq!(sf.ledger().product(&id).unwrap().stock(), 3);
    }
}
