//! Atomic file write helpers.
//!
//! Uses a temp file + rename pattern. The temp file lives in the destination
//! directory so the rename never crosses filesystems, and it is removed on
//! drop, so a failed write leaves nothing behind.
//!
//! On Windows, rename-over-existing fails, so [`atomic_write`] falls back to
//! backup-and-restore to avoid data loss when overwriting.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

/// Prefix of in-flight temp files; anything carrying it is transient.
pub const TEMP_PREFIX: &str = ".folio-tmp-";

/// Upper bound on `name (n).ext` candidates tried by [`persist_new_unique`].
const MAX_NUMBERED_CANDIDATES: u32 = 10_000;

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn write_temp(dir: &Path, bytes: &[u8]) -> io::Result<NamedTempFile> {
    let mut tmp = Builder::new().prefix(TEMP_PREFIX).tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Replace `path` with `bytes` atomically.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let tmp = write_temp(parent_dir(path), bytes)?;

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        // Windows fallback: backup and restore.
        let backup_path = path.with_extension("bak");
        let _ = fs::remove_file(&backup_path);
        fs::rename(path, &backup_path)?;

        if let Err(rename_err) = err.file.persist(path) {
            let _ = fs::rename(&backup_path, path);
            return Err(rename_err.error);
        }
        if let Err(e) = fs::remove_file(&backup_path) {
            tracing::warn!(
                path = %backup_path.display(),
                "Failed to remove .bak after atomic write: {e}"
            );
        }
    }
    Ok(())
}

/// `report.pdf` -> `report (n).pdf`; `n == 0` returns the name unchanged.
#[must_use]
pub fn numbered_file_name(file_name: &str, n: u32) -> String {
    if n == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{file_name} ({n})"),
    }
}

/// Write `bytes` into `dir` under `file_name`, never overwriting.
///
/// When `file_name` is taken the next free `name (n).ext` is used, the way
/// browsers name repeated downloads. Returns the path actually written.
pub fn persist_new_unique(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let mut tmp = write_temp(dir, bytes)?;

    for n in 0..MAX_NUMBERED_CANDIDATES {
        let candidate = dir.join(numbered_file_name(file_name, n));
        match tmp.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(err) if err.error.kind() == ErrorKind::AlreadyExists => tmp = err.file,
            Err(err) => return Err(err.error),
        }
    }

    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free file name for {file_name} in {}", dir.display()),
    ))
}
