//! Crash-safe filesystem primitives
//!
//! - [`write_atomic`]: temp file in the target directory, then persist over
//!   the destination. Readers see either the old or the new document.
//! - [`relocate`]: move a file so that afterwards the destination holds the
//!   source's prior content and the source no longer exists.

use super::error::{CatalogError, Result};
use super::hasher::ContentHash;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// How [`relocate`] satisfied its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    /// Source and destination are the same path
    Unchanged,
    Renamed,
    /// Rename failed; copied then removed the source
    Copied,
    /// Destination already held identical content (e.g. an interrupted earlier move)
    AlreadyPresent,
    /// Destination held different content and was overwritten
    Replaced,
}

/// Write `contents` to `path` atomically.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = parent_dir(path);
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Move `from` to `to`: atomic rename first, copy-then-delete as fallback.
///
/// Calling it again after a completed move is harmless: a missing source with
/// the destination present reports [`Relocation::AlreadyPresent`].
pub fn relocate(from: &Path, to: &Path) -> Result<Relocation> {
    if from == to {
        return Ok(Relocation::Unchanged);
    }

    if !from.exists() {
        if to.exists() {
            return Ok(Relocation::AlreadyPresent);
        }
        return Err(CatalogError::SourceMissing(from.to_path_buf()));
    }

    let replacing = to.exists();
    if replacing {
        if same_content(from, to)? {
            debug!(from = %from.display(), to = %to.display(), "destination already holds source content");
            fs::remove_file(from).map_err(|e| relocate_error(from, to, e))?;
            return Ok(Relocation::AlreadyPresent);
        }
        warn!(from = %from.display(), to = %to.display(), "replacing destination with newer content");
    } else {
        fs::create_dir_all(parent_dir(to))?;
    }

    let moved = match fs::rename(from, to) {
        Ok(()) => Relocation::Renamed,
        Err(rename_err) => {
            warn!(
                from = %from.display(),
                to = %to.display(),
                error = %rename_err,
                "rename failed, falling back to copy"
            );
            copy_then_remove(from, to)?;
            Relocation::Copied
        }
    };
    Ok(if replacing { Relocation::Replaced } else { moved })
}

/// Copy into a temp file beside `to`, persist it over `to`, then drop the source.
/// A crash mid-copy leaves only a stray temp file, never a partial `to`.
fn copy_then_remove(from: &Path, to: &Path) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(to))?;
    let mut src = File::open(from).map_err(|e| relocate_error(from, to, e))?;
    io::copy(&mut src, &mut tmp).map_err(|e| relocate_error(from, to, e))?;
    tmp.as_file().sync_all()?;
    tmp.persist(to)?;

    fs::remove_file(from).map_err(|e| relocate_error(from, to, e))?;
    Ok(())
}

fn same_content(a: &Path, b: &Path) -> Result<bool> {
    let a_meta = fs::metadata(a)?;
    let b_meta = fs::metadata(b)?;
    if a_meta.len() != b_meta.len() {
        return Ok(false);
    }
    Ok(ContentHash::compute(&fs::read(a)?) == ContentHash::compute(&fs::read(b)?))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn relocate_error(from: &Path, to: &Path, err: io::Error) -> CatalogError {
    CatalogError::Relocate {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/manifest.json");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");
        // No temp files left behind
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_same_path_is_noop() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.gif");
        fs::write(&path, b"x").unwrap();
        assert_eq!(relocate(&path, &path).unwrap(), Relocation::Unchanged);
        assert_eq!(fs::read(&path).unwrap(), b"x");
    }

    #[test]
    fn test_rename_creates_parent() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("inbox/a.gif");
        let to = temp.path().join("approved/a.gif");
        fs::create_dir_all(from.parent().unwrap()).unwrap();
        fs::write(&from, b"payload").unwrap();

        assert_eq!(relocate(&from, &to).unwrap(), Relocation::Renamed);
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"payload");
    }

    #[test]
    fn test_repeat_after_move_is_already_present() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.gif");
        let to = temp.path().join("out/a.gif");
        fs::write(&from, b"payload").unwrap();
        relocate(&from, &to).unwrap();
        assert_eq!(relocate(&from, &to).unwrap(), Relocation::AlreadyPresent);
    }

    #[test]
    fn test_identical_destination_consumes_source() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.gif");
        let to = temp.path().join("b.gif");
        fs::write(&from, b"same").unwrap();
        fs::write(&to, b"same").unwrap();
        assert_eq!(relocate(&from, &to).unwrap(), Relocation::AlreadyPresent);
        assert!(!from.exists());
    }

    #[test]
    fn test_different_destination_is_replaced() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("inbox/siren.gif");
        let to = temp.path().join("approved/siren.gif");
        fs::create_dir_all(from.parent().unwrap()).unwrap();
        fs::create_dir_all(to.parent().unwrap()).unwrap();
        fs::write(&from, b"refetched").unwrap();
        fs::write(&to, b"older").unwrap();

        assert_eq!(relocate(&from, &to).unwrap(), Relocation::Replaced);
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"refetched");
    }

    #[test]
    fn test_copy_fallback_overwrites_destination() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.gif");
        let to = temp.path().join("b.gif");
        fs::write(&from, b"new").unwrap();
        fs::write(&to, b"old").unwrap();

        copy_then_remove(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"new");
    }

    #[test]
    fn test_missing_source_and_destination() {
        let temp = TempDir::new().unwrap();
        let err = relocate(&temp.path().join("nope.gif"), &temp.path().join("x/nope.gif"));
        assert!(matches!(err, Err(CatalogError::SourceMissing(_))));
    }

    #[test]
    fn test_copy_fallback_satisfies_contract() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.gif");
        let to = temp.path().join("sub/a.gif");
        fs::create_dir_all(to.parent().unwrap()).unwrap();
        fs::write(&from, b"copied").unwrap();

        copy_then_remove(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"copied");
    }
}
