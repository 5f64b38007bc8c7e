//! Size-rotated log file writer.
//!
//! `<dir>/<name>.log` is the live file; on overflow it becomes `<name>.log.1`,
//! older files shift up, and anything past `max_files` is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

struct SizeRolledFile {
    dir: PathBuf,
    base_name: String,
    max_files: usize,
    max_size: u64,
    file: Option<File>,
    written: u64,
}

impl SizeRolledFile {
    fn open(dir: PathBuf, base_name: &str, max_files: usize, max_size: u64) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        let mut rolled = Self {
            dir,
            base_name: sanitize_name(base_name),
            max_files: max_files.max(1),
            max_size,
            file: None,
            written: 0,
        };
        rolled.reopen()?;
        if rolled.written > rolled.max_size {
            rolled.rotate()?;
        }
        Ok(rolled)
    }

    fn live_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_name))
    }

    fn archived_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.base_name, index))
    }

    fn reopen(&mut self) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.live_path())?;
        self.written = file.metadata()?.len();
        self.file = Some(file);
        Ok(())
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
        self.shift_archives()?;
        self.reopen()
    }

    fn shift_archives(&self) -> io::Result<()> {
        let last = self.max_files.saturating_sub(1);
        if last == 0 {
            // Single-file mode: truncate in place
            let live = self.live_path();
            if live.exists() {
                fs::remove_file(live)?;
            }
            return Ok(());
        }

        let oldest = self.archived_path(last);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for idx in (1..last).rev() {
            let src = self.archived_path(idx);
            if src.exists() {
                fs::rename(&src, self.archived_path(idx + 1))?;
            }
        }

        let live = self.live_path();
        if live.exists() {
            fs::rename(live, self.archived_path(1))?;
        }
        Ok(())
    }
}

impl Write for SizeRolledFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written + buf.len() as u64 > self.max_size {
            self.rotate()?;
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        let n = file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Cloneable handle usable as a `tracing_subscriber` writer.
#[derive(Clone)]
pub struct SharedRollingWriter {
    inner: Arc<Mutex<SizeRolledFile>>,
}

impl SharedRollingWriter {
    pub fn new(dir: PathBuf, base_name: &str, max_files: usize, max_size: u64) -> io::Result<Self> {
        let file = SizeRolledFile::open(dir, base_name, max_files, max_size)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(file)),
        })
    }

    fn with_file<T>(&self, op: impl FnOnce(&mut SizeRolledFile) -> io::Result<T>) -> io::Result<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        op(&mut guard)
    }
}

impl Write for SharedRollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedRollingWriter {
    type Writer = SharedRollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rotates_when_full() {
        let temp = TempDir::new().unwrap();
        let mut writer = SharedRollingWriter::new(temp.path().to_path_buf(), "gifgate", 3, 16).unwrap();

        writer.write_all(b"0123456789").unwrap();
        writer.write_all(b"0123456789").unwrap();
        writer.write_all(b"0123456789").unwrap();
        writer.flush().unwrap();

        assert!(temp.path().join("gifgate.log").exists());
        assert!(temp.path().join("gifgate.log.1").exists());
        assert!(temp.path().join("gifgate.log.2").exists());
        assert!(!temp.path().join("gifgate.log.3").exists());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("gif gate/scan"), "gif_gate_scan");
        assert_eq!(sanitize_name("gifgate-cli_1"), "gifgate-cli_1");
    }
}
