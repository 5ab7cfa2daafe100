// # Atomic File Publisher
//
// File-based implementation of HostsPublisher using write-then-rename.
//
// ## Purpose
//
// Replaces a live hosts file (usually `/etc/hosts`) so that concurrent
// readers observe either the previous file or the complete new one, never a
// partially written one.
//
// ## Protocol
//
// 1. Create a fresh, uniquely named temp file in the scratch directory
// 2. Write the content, flush and fsync
// 3. Close the handle (the rename never sees an open file)
// 4. Set the permission bits (0644 by default)
// 5. Rename the temp file onto the target
//
// ## Failure Behavior
//
// - Failure before the rename: the temp file is removed, the target is untouched
// - Rename failure: the temp file is KEPT for inspection and its path is part
//   of the returned error
// - The scratch directory must live on the target's filesystem; a
//   cross-device rename fails like any other rename error

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_FILE_MODE;
use crate::traits::HostsPublisher;
use crate::Error;

/// Prefix of the temporary files created in the scratch directory
pub const TEMP_FILE_PREFIX: &str = "hostsync-work--";

/// Publisher that atomically replaces a file
///
/// # Example
///
/// ```rust,no_run
/// use hostsync_core::publish::AtomicFilePublisher;
/// use hostsync_core::traits::HostsPublisher;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let publisher = AtomicFilePublisher::new("/etc/hosts");
///     publisher.publish(b"10.0.0.5\t\tweb1.internal.example.com\n").await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AtomicFilePublisher {
    target: PathBuf,
    scratch_dir: PathBuf,
    mode: u32,
}

impl AtomicFilePublisher {
    /// Create a publisher for `target` using the system temp dir as scratch space
    pub fn new<P: AsRef<Path>>(target: P) -> Self {
        Self {
            target: target.as_ref().to_path_buf(),
            scratch_dir: std::env::temp_dir(),
            mode: DEFAULT_FILE_MODE,
        }
    }

    /// Use a different scratch directory for the temp file
    pub fn with_scratch_dir<P: AsRef<Path>>(mut self, scratch_dir: P) -> Self {
        self.scratch_dir = scratch_dir.as_ref().to_path_buf();
        self
    }

    /// Use different permission bits for the published file
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Target path
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Scratch directory
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Write `content` to a temp file and rename it onto the target
    ///
    /// Blocking; callers on a runtime go through [`HostsPublisher::publish`].
    fn commit(&self, content: &[u8]) -> Result<(), Error> {
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| {
                Error::publish(format!(
                    "Failed to create temp file in {}: {}",
                    self.scratch_dir.display(),
                    e
                ))
            })?;

        file.write_all(content)
            .and_then(|_| file.flush())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| {
                Error::publish(format!(
                    "Failed to write temp file {}: {}",
                    file.path().display(),
                    e
                ))
            })?;

        // Closes the handle; the path is still removed on drop until persisted
        let temp_path = file.into_temp_path();
        set_mode(&temp_path, self.mode)?;

        tracing::info!("Rename {} to {}", temp_path.display(), self.target.display());
        if let Err(err) = temp_path.persist(&self.target) {
            let leftover = match err.path.keep() {
                Ok(path) => path,
                Err(keep_err) => keep_err.path.to_path_buf(),
            };
            return Err(Error::publish(format!(
                "Failed to rename {} to {}: {} (temp file left in place)",
                leftover.display(),
                self.target.display(),
                err.error
            )));
        }

        Ok(())
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
        Error::publish(format!(
            "Failed to set mode {:o} on {}: {}",
            mode,
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), Error> {
    Ok(())
}

#[async_trait]
impl HostsPublisher for AtomicFilePublisher {
    async fn publish(&self, content: &[u8]) -> Result<(), Error> {
        let publisher = self.clone();
        let content = content.to_vec();

        tokio::task::spawn_blocking(move || publisher.commit(&content))
            .await
            .map_err(|e| Error::publish(format!("Publish task failed: {}", e)))?
    }

    fn destination(&self) -> String {
        self.target.display().to_string()
    }
}
