//! Only one workday-server may own a data directory at a time.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

fn lock_path(data_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    Ok(data_dir.join("server.lock"))
}

/// Acquire an exclusive lock on `data_dir`, failing if another instance holds it
pub fn acquire_lock(data_dir: &Path) -> Result<LockGuard> {
    let path = lock_path(data_dir)?;
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another workday-server instance is already using this data directory.\n\
            If you believe this is an error, remove: {}",
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_lock_on_same_dir_fails() {
        let dir = TempDir::new().unwrap();

        let guard = acquire_lock(dir.path()).unwrap();
        let err = acquire_lock(dir.path()).err().unwrap();
        assert!(err.to_string().contains("already using this data directory"));

        drop(guard);
        assert!(acquire_lock(dir.path()).is_ok());
    }
}
