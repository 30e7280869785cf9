use fd_lock::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{decode_snapshot, encode_snapshot, PersistenceBridge, PersistenceError};
use crate::board::BoardState;

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// JSON snapshot stored in a single file
#[derive(Debug, Clone)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock file guarding this snapshot against concurrent writers.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl PersistenceBridge for JsonFileSnapshot {
    fn load_snapshot(&self) -> Result<Option<BoardState>, PersistenceError> {
        if !self.path.exists() {
            debug!(file = ?self.path, "No snapshot file");
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let state = decode_snapshot(&contents)?;
        info!(file = ?self.path, blocks = state.blocks.len(), "Snapshot loaded");
        Ok(Some(state))
    }

    fn save_snapshot(&self, state: &BoardState) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let serialized = encode_snapshot(state)?;

        // Write to temporary file first, then rename (atomic replace)
        let temp = self.temp_path();
        fs::write(&temp, serialized)?;
        fs::rename(&temp, &self.path)?;

        debug!(file = ?self.path, blocks = state.blocks.len(), "Snapshot saved");
        Ok(())
    }
}

/// Advisory exclusive lock serializing board sessions across processes
pub struct BoardLock {
    path: PathBuf,
    lock: RwLock<File>,
}

impl BoardLock {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        Ok(Self {
            path,
            lock: RwLock::new(file),
        })
    }

    /// Wait up to `timeout` for the lock and run `f` while holding it.
    ///
    /// The lock is released when `f` returns.
    pub fn with_exclusive<R>(
        &mut self,
        timeout: Duration,
        f: impl FnOnce() -> R,
    ) -> Result<R, PersistenceError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.lock.try_write() {
                Ok(_guard) => {
                    debug!(file = ?self.path, "Board lock acquired");
                    return Ok(f());
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) => return Err(e.into()),
            }

            if Instant::now() >= deadline {
                return Err(PersistenceError::Lock {
                    reason: format!(
                        "{} is held by another blockboard process",
                        self.path.display()
                    ),
                });
            }
            thread::sleep(LOCK_POLL_INTERVAL);
        }
    }
}
