#![forbid(unsafe_code)]

//! Durable page preferences.
//!
//! A browser keeps the visitor's theme choice in `localStorage`; outside a
//! browser the same job falls to a [`StateRegistry`]: a small key/value
//! cache that reads from and writes back to a pluggable [`StorageBackend`].
//!
//! Three backends ship with the crate:
//!
//! - [`MemoryStorage`] keeps entries in process memory.
//! - [`UnavailableStorage`] rejects every call, like a locked down profile.
//! - `FileStorage` (feature `state-persistence`) writes a JSON document.
//!
//! Storage problems are reported as [`StorageError`] values. The registry
//! keeps serving its cache when the backend fails, so a page can always
//! fall back to its defaults. Setting a key to the value it already holds
//! leaves the registry clean and costs no write.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use folio_core::{debug, warn};

/// Why a storage call failed.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    /// The stored document could not be encoded or decoded.
    #[cfg(feature = "state-persistence")]
    Serialization(String),
    /// Internal state is unusable (a poisoned lock).
    Corruption(String),
    /// The backend refuses all access.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            #[cfg(feature = "state-persistence")]
            Self::Serialization(detail) => write!(f, "serialization error: {detail}"),
            Self::Corruption(detail) => write!(f, "storage corruption: {detail}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Io(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Corruption("lock poisoned".to_owned())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// One preference together with the version of its value format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEntry {
    pub key: String,
    pub version: u32,
    /// Raw string value, exactly as a page script would store it.
    pub value: String,
}

impl StoredEntry {
    fn new(key: impl Into<String>, version: u32, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version,
            value: value.into(),
        }
    }
}

type Entries = HashMap<String, StoredEntry>;

/// Where preferences live between page loads.
///
/// Backends are `Send + Sync`; a host shim and the page model may hold the
/// same registry.
pub trait StorageBackend: Send + Sync {
    /// Short label used in log fields.
    fn name(&self) -> &str;

    /// Read every stored entry. A backend that has never been written
    /// returns an empty map.
    fn load_all(&self) -> StorageResult<Entries>;

    /// Overwrite the stored set with `entries`.
    fn save_all(&self, entries: &Entries) -> StorageResult<()>;

    fn clear(&self) -> StorageResult<()>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Lets two registries (two page loads, say) share one store.
impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    fn name(&self) -> &str {
        B::name(self)
    }

    fn load_all(&self) -> StorageResult<Entries> {
        B::load_all(self)
    }

    fn save_all(&self, entries: &Entries) -> StorageResult<()> {
        B::save_all(self, entries)
    }

    fn clear(&self) -> StorageResult<()> {
        B::clear(self)
    }

    fn is_available(&self) -> bool {
        B::is_available(self)
    }
}

/// Process-local store. Entries vanish with the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<Entries>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with `(key, value)` pairs, all at format version 1.
    #[must_use]
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = values
            .into_iter()
            .map(|(key, value)| (key.to_owned(), StoredEntry::new(key, 1, value)))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load_all(&self) -> StorageResult<Entries> {
        Ok(self.entries.read()?.clone())
    }

    fn save_all(&self, entries: &Entries) -> StorageResult<()> {
        self.entries.write()?.clone_from(entries);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.entries.write()?.clear();
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stored = self.entries.read().map_or(0, |e| e.len());
        f.debug_struct("MemoryStorage")
            .field("entries", &stored)
            .finish()
    }
}

/// A store that is switched off. Every call fails with
/// [`StorageError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct UnavailableStorage {
    reason: String,
}

impl UnavailableStorage {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn refuse<T>(&self) -> StorageResult<T> {
        Err(StorageError::Unavailable(self.reason.clone()))
    }
}

impl StorageBackend for UnavailableStorage {
    fn name(&self) -> &str {
        "UnavailableStorage"
    }

    fn load_all(&self) -> StorageResult<Entries> {
        self.refuse()
    }

    fn save_all(&self, _entries: &Entries) -> StorageResult<()> {
        self.refuse()
    }

    fn clear(&self) -> StorageResult<()> {
        self.refuse()
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(feature = "state-persistence")]
mod file_storage {
    use super::{Entries, StorageBackend, StorageError, StorageResult, StoredEntry};
    use folio_core::{debug, warn};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::fmt;
    use std::fs;
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    const FORMAT_VERSION: u32 = 1;

    /// On-disk document.
    #[derive(Serialize, Deserialize)]
    struct Document {
        format_version: u32,
        entries: HashMap<String, Record>,
    }

    #[derive(Serialize, Deserialize)]
    struct Record {
        version: u32,
        value: String,
    }

    /// Preferences kept in a JSON file:
    ///
    /// ```json
    /// { "format_version": 1, "entries": { "theme": { "version": 1, "value": "light" } } }
    /// ```
    ///
    /// A save writes a sibling `.json.tmp` file, syncs it and renames it into
    /// place, so readers see either the old document or the new one.
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// The file is created by the first save.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_owned(),
            }
        }

        /// `<state dir>/folio/<site>/preferences.json`, where the state dir is
        /// `$XDG_STATE_HOME`, else `$HOME/.local/state`, else `.`.
        #[must_use]
        pub fn default_for_site(site: &str) -> Self {
            let root = std::env::var_os("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/state"))
                })
                .unwrap_or_else(|| PathBuf::from("."));
            Self::new(root.join("folio").join(site).join("preferences.json"))
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn staging_path(&self) -> PathBuf {
            self.path.with_extension("json.tmp")
        }

        fn write_document(&self, doc: &Document) -> StorageResult<()> {
            let staging = self.staging_path();
            let mut out = BufWriter::new(fs::File::create(&staging)?);
            serde_json::to_writer_pretty(&mut out, doc)
                .map_err(|e| StorageError::Serialization(format!("cannot encode preferences: {e}")))?;
            out.flush()?;
            out.get_ref().sync_all()?;
            drop(out);
            fs::rename(&staging, &self.path)?;
            Ok(())
        }
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn load_all(&self) -> StorageResult<Entries> {
            let file = match fs::File::open(&self.path) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
                Err(e) => return Err(e.into()),
            };
            let doc: Document = serde_json::from_reader(BufReader::new(file))
                .map_err(|e| StorageError::Serialization(format!("cannot decode preferences: {e}")))?;

            if doc.format_version != FORMAT_VERSION {
                warn!(
                    found = doc.format_version,
                    supported = FORMAT_VERSION,
                    "unknown preference file format, starting from defaults"
                );
                return Ok(Entries::new());
            }

            Ok(doc
                .entries
                .into_iter()
                .map(|(key, record)| {
                    let entry = StoredEntry::new(key.clone(), record.version, record.value);
                    (key, entry)
                })
                .collect())
        }

        fn save_all(&self, entries: &Entries) -> StorageResult<()> {
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            let doc = Document {
                format_version: FORMAT_VERSION,
                entries: entries
                    .values()
                    .map(|entry| {
                        let record = Record {
                            version: entry.version,
                            value: entry.value.clone(),
                        };
                        (entry.key.clone(), record)
                    })
                    .collect(),
            };
            self.write_document(&doc)?;
            debug!(path = %self.path.display(), stored = entries.len(), "preferences written");
            Ok(())
        }

        fn clear(&self) -> StorageResult<()> {
            match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        }

        fn is_available(&self) -> bool {
            let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) else {
                return true;
            };
            fs::create_dir_all(dir).is_ok()
                && fs::metadata(dir).is_ok_and(|meta| !meta.permissions().readonly())
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_tuple("FileStorage").field(&self.path).finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_storage::FileStorage;

#[derive(Default)]
struct Cache {
    entries: Entries,
    dirty: bool,
}

/// Preference cache in front of a [`StorageBackend`].
///
/// Reads are served from the cache. Writes mark the cache dirty and reach
/// the backend on the next [`flush`](Self::flush).
///
/// ```
/// use folio_runtime::state_persistence::StateRegistry;
///
/// let registry = StateRegistry::in_memory();
/// registry.set("theme", 1, "light");
/// assert_eq!(registry.value("theme").as_deref(), Some("light"));
/// assert!(registry.flush().unwrap());
/// ```
pub struct StateRegistry {
    backend: Box<dyn StorageBackend>,
    cache: RwLock<Cache>,
}

impl StateRegistry {
    /// Starts empty; nothing is read until [`load`](Self::load).
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            cache: RwLock::new(Cache::default()),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    #[cfg(feature = "state-persistence")]
    #[must_use]
    pub fn with_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(Box::new(FileStorage::new(path)))
    }

    /// Replace the cache with the backend's contents and return how many
    /// entries were read.
    pub fn load(&self) -> StorageResult<usize> {
        let entries = self.backend.load_all()?;
        let count = entries.len();
        *self.cache.write()? = Cache {
            entries,
            dirty: false,
        };
        debug!(backend = self.backend.name(), count, "preferences loaded");
        Ok(count)
    }

    /// Write the cache to the backend if it changed since the last load or
    /// flush. Returns whether a write happened. On failure the cache stays
    /// dirty.
    pub fn flush(&self) -> StorageResult<bool> {
        let mut cache = self.cache.write()?;
        if !cache.dirty {
            return Ok(false);
        }
        self.backend.save_all(&cache.entries)?;
        cache.dirty = false;
        Ok(true)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<StoredEntry> {
        self.cache.read().ok()?.entries.get(key).cloned()
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.get(key).map(|entry| entry.value)
    }

    /// Store `value` under `key`. A write that changes nothing keeps the
    /// registry clean.
    pub fn set(&self, key: impl Into<String>, version: u32, value: impl Into<String>) {
        let entry = StoredEntry::new(key, version, value);
        let Ok(mut cache) = self.cache.write() else {
            warn!(key = %entry.key, "preference cache poisoned, value not stored");
            return;
        };
        if cache.entries.get(&entry.key) == Some(&entry) {
            return;
        }
        cache.entries.insert(entry.key.clone(), entry);
        cache.dirty = true;
    }

    pub fn remove(&self, key: &str) -> Option<StoredEntry> {
        let Ok(mut cache) = self.cache.write() else {
            warn!(key, "preference cache poisoned, entry not removed");
            return None;
        };
        let removed = cache.entries.remove(key)?;
        cache.dirty = true;
        Some(removed)
    }

    /// Empty the backend, then the cache.
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.clear()?;
        *self.cache.write()? = Cache::default();
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().map_or(0, |c| c.entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cache holds changes the backend has not seen.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.cache.read().is_ok_and(|c| c.dirty)
    }

    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRegistry")
            .field("backend", &self.backend_name())
            .field("entries", &self.len())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}
