//! Keep a store directory to a single server process.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".caseboard.lock";

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

fn lock_path(store_dir: &Path) -> PathBuf {
    store_dir.join(LOCK_FILE)
}

/// Acquire an exclusive lock on `store_dir`, failing if another server holds it
pub fn acquire_lock(store_dir: &Path) -> Result<LockGuard> {
    let path = lock_path(store_dir);
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another caseboard-server is already using {}.\n\
            If you believe this is an error, remove: {}",
            store_dir.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}
