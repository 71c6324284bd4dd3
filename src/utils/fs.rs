use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, SpliceError};

/// Read a file's contents as a UTF-8 string
pub fn read_file_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    debug!("Reading file: {}", path.display());

    let bytes = fs::read(path).map_err(|e| SpliceError::io_error(e, Some(path)))?;
    String::from_utf8(bytes).map_err(|source| SpliceError::Encoding {
        source,
        path: path.to_path_buf(),
    })
}

/// Copy a file next to itself as `<name>.<timestamp>.bak`
pub fn backup_file(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .ok_or_else(|| SpliceError::invalid_argument(format!("not a file: {}", path.display())))?
        .to_string_lossy();
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let backup = path.with_file_name(format!("{}.{}.bak", file_name, stamp));

    debug!("Backing up {} to {}", path.display(), backup.display());
    fs::copy(path, &backup).map_err(|e| SpliceError::io_error(e, Some(&backup)))?;
    Ok(backup)
}

/// Replace a file's content without leaving it half written.
///
/// Content goes to a temp file in the same directory which is then renamed
/// over the target. A symlink is resolved first so the file it points at is
/// replaced, not the link. The result is re-read and its hash compared.
pub fn write_file_atomic(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = resolve_symlink(path.as_ref())?;
    let path = path.as_path();
    debug!("Writing file atomically: {}", path.display());

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp =
        NamedTempFile::new_in(dir).map_err(|e| SpliceError::io_error(e, Some(dir)))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| SpliceError::io_error(e, Some(temp.path())))?;

    // Keep the original permissions on the replacement
    if let Ok(meta) = fs::metadata(path) {
        if let Err(e) = fs::set_permissions(temp.path(), meta.permissions()) {
            warn!("Could not copy permissions to {}: {}", path.display(), e);
        }
    }

    temp.persist(path)
        .map_err(|e| SpliceError::io_error(e.error, Some(path)))?;

    let on_disk = fs::read(path).map_err(|e| SpliceError::io_error(e, Some(path)))?;
    if calculate_hash(&on_disk) != calculate_hash(content.as_bytes()) {
        warn!("File hash after write doesn't match expected: {}", path.display());
        return Err(SpliceError::VerificationFailed {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

fn resolve_symlink(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let target =
                fs::canonicalize(path).map_err(|e| SpliceError::io_error(e, Some(path)))?;
            debug!("{} links to {}", path.display(), target.display());
            Ok(target)
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// SHA-256 of some bytes, hex encoded
fn calculate_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
