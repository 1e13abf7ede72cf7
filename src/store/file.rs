use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};

use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use log::{debug, trace};

use super::{Item, ItemStore, MemoryStore};
use crate::error::{Result, SysconfError};

/// File-backed item store.
///
/// The whole database is read into a [`MemoryStore`] cache when opened and
/// written back by [`FileStore::save`]. The on-disk format is a JSON object
/// mapping item names to their owners, fields, flags, and variables.
///
/// Saving writes a sibling temporary file and renames it over the database
/// while holding an exclusive advisory lock on `<path>.lock`, so readers never
/// observe a half-written file.
#[derive(Debug)]
pub struct FileStore {
    path: Utf8PathBuf,
    cache: MemoryStore,
    dirty: bool,
}

impl FileStore {
    /// Open the database at `path`, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns [`SysconfError::StoreLoad`] when the file exists but cannot be
    /// read or does not contain a valid database.
    pub fn open(name: impl Into<String>, path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(text) => parse_items(&path, &text)?,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(target: "sysconf::store", "{path} does not exist yet; starting empty");
                BTreeMap::new()
            }
            Err(error) => {
                return Err(SysconfError::StoreLoad {
                    path,
                    reason: error.to_string(),
                });
            }
        };

        Ok(Self {
            cache: MemoryStore::with_items(name, items),
            path,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the cache holds changes not yet saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write pending changes to disk.
    ///
    /// Does nothing when the cache is clean.
    ///
    /// # Errors
    ///
    /// Returns [`SysconfError::StoreSave`] when the lock, the temporary file,
    /// or the rename fails.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            trace!(target: "sysconf::store", "{}: nothing to save", self.path);
            return Ok(());
        }

        self.write_atomically()
            .map_err(|source| SysconfError::StoreSave {
                path: self.path.clone(),
                source,
            })?;
        self.dirty = false;
        debug!(target: "sysconf::store", "saved {} items to {}", self.cache.as_map().len(), self.path);
        Ok(())
    }

    fn write_atomically(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(sibling(&self.path, "lock"))?;
        lock.lock_exclusive()?;

        let outcome = self.write_snapshot();
        FileExt::unlock(&lock)?;
        outcome
    }

    fn write_snapshot(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self.cache.as_map())?;
        let temporary = sibling(&self.path, "new");
        let mut file = File::create(&temporary)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        fs::rename(&temporary, &self.path)
    }

    fn mark_dirty<T>(&mut self, outcome: Option<T>) -> Option<T> {
        if outcome.is_some() {
            self.dirty = true;
        }
        outcome
    }
}

fn parse_items(path: &Utf8Path, text: &str) -> Result<BTreeMap<String, Item>> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(text).map_err(|error| SysconfError::StoreLoad {
        path: path.to_owned(),
        reason: error.to_string(),
    })
}

fn sibling(path: &Utf8Path, extension: &str) -> Utf8PathBuf {
    let mut name = path.file_name().unwrap_or("db").to_owned();
    name.push('.');
    name.push_str(extension);
    path.with_file_name(name)
}

impl ItemStore for FileStore {
    fn name(&self) -> &str {
        self.cache.name()
    }

    fn items(&self) -> Vec<String> {
        self.cache.items()
    }

    fn exists(&self, item: &str) -> bool {
        self.cache.exists(item)
    }

    fn owners(&self, item: &str) -> Option<Vec<String>> {
        self.cache.owners(item)
    }

    fn add_owner(&mut self, item: &str, owner: &str, item_type: &str) -> Option<String> {
        let outcome = self.cache.add_owner(item, owner, item_type);
        self.mark_dirty(outcome)
    }

    fn remove_owner(&mut self, item: &str, owner: &str) -> Option<String> {
        let outcome = self.cache.remove_owner(item, owner);
        self.mark_dirty(outcome)
    }

    fn field(&self, item: &str, field: &str) -> Option<String> {
        self.cache.field(item, field)
    }

    fn set_field(&mut self, item: &str, field: &str, value: &str) -> Option<String> {
        let outcome = self.cache.set_field(item, field, value);
        self.mark_dirty(outcome)
    }

    fn remove_field(&mut self, item: &str, field: &str) -> Option<String> {
        let outcome = self.cache.remove_field(item, field);
        self.mark_dirty(outcome)
    }

    fn fields(&self, item: &str) -> Option<Vec<String>> {
        self.cache.fields(item)
    }

    fn flag(&self, item: &str, flag: &str) -> Option<String> {
        self.cache.flag(item, flag)
    }

    fn set_flag(&mut self, item: &str, flag: &str, value: &str) -> Option<String> {
        let outcome = self.cache.set_flag(item, flag, value);
        self.mark_dirty(outcome)
    }

    fn flags(&self, item: &str) -> Option<Vec<String>> {
        self.cache.flags(item)
    }

    fn variable(&self, item: &str, variable: &str) -> Option<String> {
        self.cache.variable(item, variable)
    }

    fn set_variable(&mut self, item: &str, variable: &str, value: &str) -> Option<String> {
        let outcome = self.cache.set_variable(item, variable, value);
        self.mark_dirty(outcome)
    }

    fn variables(&self, item: &str) -> Option<Vec<String>> {
        self.cache.variables(item)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("failed to create temp dir")
    }

    fn db_path(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().join("config.json")).expect("temp dir should be UTF-8")
    }

    #[rstest]
    fn missing_file_opens_empty(temp_dir: TempDir) {
        let store = FileStore::open("config", db_path(&temp_dir)).expect("open should succeed");

        assert!(store.items().is_empty());
        assert!(!store.is_dirty());
        assert_eq!(store.name(), "config");
    }

    #[rstest]
    fn saved_items_survive_reopening(temp_dir: TempDir) {
        let path = db_path(&temp_dir);
        let mut store = FileStore::open("config", path.clone()).expect("open should succeed");
        store.add_owner("demo/host", "demo", "string");
        store.set_field("demo/host", "template", "demo/host");
        store.set_flag("demo/host", "seen", "true");
        store.set_variable("demo/host", "domain", "example.org");
        assert!(store.is_dirty());

        store.save().expect("save should succeed");
        assert!(!store.is_dirty());

        let reopened = FileStore::open("config", path).expect("reopen should succeed");
        assert_eq!(reopened.owners("demo/host"), Some(vec!["demo".to_owned()]));
        assert_eq!(
            reopened.field("demo/host", "template").as_deref(),
            Some("demo/host")
        );
        assert_eq!(reopened.flag("demo/host", "seen").as_deref(), Some("true"));
        assert_eq!(
            reopened.variable("demo/host", "domain").as_deref(),
            Some("example.org")
        );
    }

    #[rstest]
    fn shutdown_saves_through_the_trait(temp_dir: TempDir) {
        let path = db_path(&temp_dir);
        let mut store: Box<dyn ItemStore> =
            Box::new(FileStore::open("config", path.clone()).expect("open should succeed"));
        store.add_owner("demo/host", "demo", "");

        store.shutdown().expect("shutdown should succeed");

        let reopened = FileStore::open("config", path).expect("reopen should succeed");
        assert!(reopened.exists("demo/host"));
    }

    #[rstest]
    fn refused_writes_do_not_dirty_the_cache(temp_dir: TempDir) {
        let mut store = FileStore::open("config", db_path(&temp_dir)).expect("open should succeed");

        assert_eq!(store.set_field("demo/missing", "type", "string"), None);
        assert!(!store.is_dirty());
    }

    #[rstest]
    fn clean_save_does_not_create_the_file(temp_dir: TempDir) {
        let path = db_path(&temp_dir);
        let mut store = FileStore::open("config", path.clone()).expect("open should succeed");

        store.save().expect("save should succeed");

        assert!(!path.exists());
    }

    #[rstest]
    fn corrupt_file_is_reported(temp_dir: TempDir) {
        let path = db_path(&temp_dir);
        fs::write(&path, "{ not json").expect("failed to write fixture");

        let outcome = FileStore::open("config", path);

        assert!(matches!(outcome, Err(SysconfError::StoreLoad { .. })));
    }

    #[rstest]
    fn save_creates_missing_parent_directories(temp_dir: TempDir) {
        let path = Utf8PathBuf::try_from(temp_dir.path().join("nested").join("templates.json"))
            .expect("temp dir should be UTF-8");
        let mut store = FileStore::open("templates", path.clone()).expect("open should succeed");
        store.add_owner("demo/host", "demo/host", "string");

        store.save().expect("save should succeed");

        assert!(path.exists());
    }
}
