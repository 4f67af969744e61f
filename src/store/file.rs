//! File-based site store implementation.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::site::{NewSite, OwnerId, Site, SiteId, SiteStatus};

use super::{SiteStore, StatusUpdate, StoreError};

/// Current store file format version.
///
/// Increment this when making breaking changes to the format.
const STORE_FILE_VERSION: u32 = 1;

/// On-disk store format.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Format version; any other version is rejected as corrupted.
    version: u32,

    /// Id handed to the next registered site. Never reused after removal.
    next_id: u64,

    sites: Vec<Site>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: STORE_FILE_VERSION,
            next_id: 1,
            sites: Vec::new(),
        }
    }
}

/// File-based implementation of [`SiteStore`].
///
/// Keeps every site in a single JSON document. Each operation is a full
/// read-modify-write cycle, serialized by an async mutex within the process
/// and by an exclusive advisory lock on `{path}.lock` across processes, so
/// `add` running next to `watch` cannot lose either side's write.
///
/// # Atomic Writes
///
/// Uses write-to-temp-then-rename:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
///
/// A missing file is an empty store. An unreadable or unparsable file is an
/// error and is left untouched.
#[derive(Debug)]
pub struct FileSiteStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSiteStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is created on the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the path to the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registers a new site with `status = not_checked`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the owner already tracks the URL,
    /// or any I/O error from reading or writing the file.
    pub async fn register(&self, new_site: NewSite) -> Result<Site, StoreError> {
        self.with_file(move |path| {
            let mut file = load(path)?;

            if file
                .sites
                .iter()
                .any(|s| s.owner_id == new_site.owner_id && s.url == new_site.url)
            {
                return Err(StoreError::Duplicate {
                    owner: new_site.owner_id,
                    url: new_site.url,
                });
            }

            let site = Site {
                id: SiteId(file.next_id),
                owner_id: new_site.owner_id,
                url: new_site.url,
                status: SiteStatus::NotChecked,
                last_checked_at: None,
            };
            file.next_id += 1;
            file.sites.push(site.clone());

            save(path, &file)?;
            Ok(site)
        })
        .await
    }

    /// Deletes a site. Returns `false` if no site had that id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or written.
    pub async fn remove(&self, id: SiteId) -> Result<bool, StoreError> {
        self.with_file(move |path| {
            let mut file = load(path)?;
            let before = file.sites.len();
            file.sites.retain(|s| s.id != id);

            if file.sites.len() == before {
                return Ok(false);
            }

            save(path, &file)?;
            Ok(true)
        })
        .await
    }

    /// Returns the sites registered by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read.
    pub async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Site>, StoreError> {
        let mut sites = self.list_all().await?;
        sites.retain(|s| &s.owner_id == owner);
        Ok(sites)
    }

    /// Runs a blocking file operation on the blocking pool, one at a time.
    async fn with_file<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T, StoreError> + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let mut lock = RwLock::new(open_lock_file(&path)?);
            let _held = lock.write().map_err(|e| StoreError::Lock {
                path: lock_path(&path),
                source: e,
            })?;
            op(&path)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

impl SiteStore for FileSiteStore {
    async fn list_all(&self) -> Result<Vec<Site>, StoreError> {
        self.with_file(|path| Ok(load(path)?.sites)).await
    }

    async fn update(&self, id: SiteId, update: StatusUpdate) -> Result<(), StoreError> {
        self.with_file(move |path| {
            let mut file = load(path)?;
            let site = file
                .sites
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(StoreError::NotFound(id))?;

            site.status = update.status;
            site.last_checked_at = Some(update.last_checked_at);

            save(path, &file)
        })
        .await
    }
}

/// `sites.json` -> `sites.json.lock`
fn lock_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}

/// Opens (creating if needed) the lock file next to the store.
fn open_lock_file(path: &Path) -> Result<File, StoreError> {
    let lock_path = lock_path(path);
    let to_error = |source| StoreError::Lock {
        path: lock_path.clone(),
        source,
    };

    create_parent_dir(path).map_err(to_error)?;
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(to_error)
}

fn create_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn load(path: &Path) -> Result<StoreFile, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
        Err(e) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let file: StoreFile = serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
        path: path.to_path_buf(),
        reason: format!("Invalid JSON: {e}"),
    })?;

    if file.version != STORE_FILE_VERSION {
        return Err(StoreError::Corrupted {
            path: path.to_path_buf(),
            reason: format!(
                "Incompatible version: expected {STORE_FILE_VERSION}, got {}",
                file.version
            ),
        });
    }

    Ok(file)
}

fn save(path: &Path, file: &StoreFile) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(file).map_err(StoreError::Serialize)?;

    create_parent_dir(path).map_err(StoreError::Write)?;

    // sites.json -> sites.json.tmp, not sites.tmp
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));

    std::fs::write(&temp_path, content).map_err(StoreError::Write)?;
    std::fs::rename(&temp_path, path).map_err(StoreError::Write)?;

    Ok(())
}
