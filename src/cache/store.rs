use log::trace;
use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Entries larger than this are never read by [`DirectoryStore`].
pub const MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

/// A key to bytes store backing an [`AttractorCache`](crate::cache::AttractorCache).
///
/// `read` returns `Ok(None)` for missing keys. Implementations must make `write` appear
/// atomic to concurrent readers (a reader sees either the old or the new value).
pub trait CacheStore: Send + Sync {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>>;
    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

/// A process-local [`CacheStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|it| it.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("memory store lock is poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("memory store lock is poisoned"))?;
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Distinguishes temporary files of concurrent writers within one process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A [`CacheStore`] that keeps one file per key in a directory.
///
/// The directory is created on first write. Writes go to a temporary file which is then
/// renamed over the destination, so readers never observe a partially written entry.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    dir: PathBuf,
    /// Reading an entry larger than this fails (default: [`MAX_ENTRY_BYTES`]).
    pub max_entry_bytes: u64,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> DirectoryStore {
        DirectoryStore {
            dir: dir.into(),
            max_entry_bytes: MAX_ENTRY_BYTES,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl CacheStore for DirectoryStore {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.path(key);
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if metadata.len() > self.max_entry_bytes {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "entry `{}` has {} bytes (limit {})",
                    path.display(),
                    metadata.len(),
                    self.max_entry_bytes
                ),
            ));
        }
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp_path = self.dir.join(format!(
            "{key}.{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let result =
            std::fs::write(&tmp_path, bytes).and_then(|_| std::fs::rename(&tmp_path, &path));
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp_path);
        } else {
            trace!("Wrote {} bytes to `{}`.", bytes.len(), path.display());
        }
        result
    }
}
