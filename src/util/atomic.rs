// ============================================================================
// src/util/atomic.rs – Durable atomic replace for env files
// ============================================================================

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Return the parent directory path, treating a bare file name as `.`.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Fsync a directory to persist metadata (like rename).
#[cfg(unix)]
fn fsync_dir(dir: &Path) -> Result<()> {
    let f = File::open(dir).with_context(|| format!("Open dir for fsync: {dir:?}"))?;
    f.sync_all()
        .with_context(|| format!("Fsync dir failed: {dir:?}"))?;
    Ok(())
}

#[cfg(not(unix))]
fn fsync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

/// Follow symlinks to the file that is actually rewritten; the link stays in place.
fn resolve_target(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path)
            .with_context(|| format!("Resolve symlink target of {}", path.display())),
        _ => Ok(path.to_path_buf()),
    }
}

/// Replace `path` with `bytes`: write a temp file next to the real file,
/// carry over the existing permissions, fsync, rename into place, then fsync
/// the parent directory. The temp file is removed if any step fails.
pub fn atomic_replace(path: &Path, bytes: &[u8]) -> Result<()> {
    let target = resolve_target(path)?;
    let path = target.as_path();

    let dir = parent_dir(path);
    let existing = fs::metadata(path).ok().map(|m| m.permissions());

    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Create temp file in {}", dir.display()))?;

    if let Some(perms) = existing {
        fs::set_permissions(tmp.path(), perms)
            .with_context(|| format!("Copy permissions onto {}", tmp.path().display()))?;
    }

    tmp.write_all(bytes).context("Write to temp file failed")?;
    tmp.as_file().sync_all().context("Fsync temp file failed")?;

    let tmp_path = tmp.path().to_path_buf();
    tmp.persist(path).with_context(|| {
        format!(
            "Atomic rename failed ({} -> {})",
            tmp_path.display(),
            path.display()
        )
    })?;

    fsync_dir(&dir)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "atomic replace complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn replaces_contents_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join(".env");
        fs::write(&target, "A=1\n").unwrap();

        atomic_replace(&target, b"A=1\nB=2\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "A=1\nB=2\n");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let target = dir.path().join(".env");
        fs::write(&target, "A=1\n").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

        atomic_replace(&target, b"A=2\n").unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn writes_through_symlink_and_keeps_link() {
        let dir = tempdir().unwrap();
        let shared = dir.path().join("shared");
        fs::create_dir(&shared).unwrap();
        let real = shared.join("real.env");
        let link = dir.path().join(".env");
        fs::write(&real, "A=1\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        atomic_replace(&link, b"A=2\n").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "A=2\n");
        assert_eq!(fs::read_to_string(&link).unwrap(), "A=2\n");
        // temp file lived beside the real file and is gone
        assert_eq!(fs::read_dir(&shared).unwrap().count(), 1);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn bare_file_name_resolves_to_current_dir() {
        assert_eq!(parent_dir(Path::new(".env")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("/srv/app/.env")), PathBuf::from("/srv/app"));
    }
}
