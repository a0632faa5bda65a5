//! Size-rotated append-only line writer.
//!
//! When the live file would grow past its size limit it is shifted to
//! `<name>.1`, existing backups move up by one (`.1` → `.2`, ...), and the
//! oldest backup beyond the retention count is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Default size limit of the live file (10 MB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of rotated backups kept.
pub const DEFAULT_BACKUPS: usize = 3;

struct Live {
    file: Option<File>,
    written: u64,
}

/// Thread-safe rotating line writer.
pub struct RotatingWriter {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    live: Mutex<Live>,
}

impl RotatingWriter {
    /// Creates a writer with the default limits. The file is opened lazily.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)
    }

    /// Creates a writer that rotates once the file exceeds `max_bytes`,
    /// keeping at most `backups` older files.
    #[must_use]
    pub fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            backups,
            live: Mutex::new(Live { file: None, written: 0 }),
        }
    }

    /// Appends `line` plus a newline, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from rotating, opening or writing the file.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        let incoming = line.len() as u64 + 1;

        if live.file.is_none() {
            live.written = fs::metadata(&self.path).map_or(0, |m| m.len());
        }
        if live.written > 0 && live.written + incoming > self.max_bytes {
            live.file = None;
            self.rotate()?;
            live.written = 0;
        }

        if live.file.is_none() {
            live.file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        if let Some(file) = live.file.as_mut() {
            writeln!(file, "{line}")?;
            file.flush()?;
        }
        live.written += incoming;
        Ok(())
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&self) -> io::Result<()> {
        if self.backups == 0 {
            return remove_if_exists(&self.path);
        }

        remove_if_exists(&self.backup_path(self.backups))?;
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        if self.path.exists() {
            fs::rename(&self.path, self.backup_path(1))?;
        }
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backups", &self.backups)
            .finish_non_exhaustive()
    }
}
