//! Logging setup.
//!
//! All code logs through the `log` facade with a bracketed subsystem prefix
//! (`[TRAIL]`, `[CACHE]`, `[PRELOAD]`, `[CONFIG]`). `init_logging` installs
//! `env_logger`, optionally writing to a daily log file with size-based
//! rotation and cleanup of old files.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use env_logger::{Builder, Env, Target};

use crate::error::{GalleryResult, ResultExt};

/// Maximum log file size before rotation (5MB)
pub const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
pub const MAX_LOG_FILES: usize = 5;

const LOG_FILE_PREFIX: &str = "cursor_gallery_";

/// Install the global logger.
///
/// The filter comes from `RUST_LOG` (default `info`). With `log_dir`, output
/// goes to today's log file instead of stderr (debug builds echo to stderr).
pub fn init_logging(log_dir: Option<&Path>) -> GalleryResult<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}] [{}] [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(dir) = log_dir {
        let file = RotatingLogFile::open(dir)?.echo_stderr(cfg!(debug_assertions));
        cleanup_old_logs(dir, MAX_LOG_FILES, Some(file.path()));
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Failed to install logger")?;

    log::info!("[LOG] Logging system initialized");
    if let Some(dir) = log_dir {
        log::info!("[LOG] Log directory: {:?}", dir);
    }
    Ok(())
}

/// Platform log directory (e.g. `~/.local/share/cursor-gallery/logs`).
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("cursor-gallery").join("logs"))
}

/// Path of today's log file (one per day).
pub fn current_log_path(log_dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    log_dir.join(format!("{}{}.log", LOG_FILE_PREFIX, date))
}

/// Delete old log files, keeping the `keep` most recent.
///
/// `current` is never deleted and counts towards `keep`. Returns how many
/// files were removed.
pub fn cleanup_old_logs(log_dir: &Path, keep: usize, current: Option<&Path>) -> usize {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return 0;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_log_file(p) && Some(p.as_path()) != current)
        .collect();

    // Newest first
    log_files.sort_by(|a, b| {
        let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
        let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time).then_with(|| b.cmp(a))
    });

    let keep_others = keep.saturating_sub(usize::from(current.is_some()));
    let mut removed = 0;
    for path in log_files.into_iter().skip(keep_others) {
        if fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    removed
}

/// Last `lines` lines of today's log file (empty if there is none yet).
pub fn recent_logs(log_dir: &Path, lines: usize) -> GalleryResult<String> {
    let log_path = current_log_path(log_dir);
    if !log_path.exists() {
        return Ok(String::new());
    }

    let content = fs::read_to_string(&log_path)?;
    let recent: Vec<&str> = content.lines().rev().take(lines).collect();
    Ok(recent.into_iter().rev().collect::<Vec<_>>().join("\n"))
}

fn is_log_file(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(LOG_FILE_PREFIX))
        .unwrap_or(false);
    name_ok && path.extension().map(|ext| ext == "log").unwrap_or(false)
}

/// Append-only log file that rotates once it grows past a size limit.
pub struct RotatingLogFile {
    dir: PathBuf,
    path: PathBuf,
    file: File,
    written: u64,
    max_size: u64,
    max_files: usize,
    echo_stderr: bool,
}

impl RotatingLogFile {
    /// Open (or create) today's log file in `dir`.
    pub fn open(dir: &Path) -> GalleryResult<Self> {
        Self::with_limits(dir, MAX_LOG_SIZE, MAX_LOG_FILES)
    }

    pub fn with_limits(dir: &Path, max_size: u64, max_files: usize) -> GalleryResult<Self> {
        fs::create_dir_all(dir)?;
        let path = current_log_path(dir);
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            path,
            file,
            written,
            max_size,
            max_files: max_files.max(1),
            echo_stderr: false,
        })
    }

    /// Also copy every line to stderr.
    pub fn echo_stderr(mut self, enabled: bool) -> Self {
        self.echo_stderr = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
        let mut rotated = self
            .dir
            .join(format!("{}{}.log", LOG_FILE_PREFIX, timestamp));
        let mut n = 1;
        while rotated.exists() {
            rotated = self
                .dir
                .join(format!("{}{}-{}.log", LOG_FILE_PREFIX, timestamp, n));
            n += 1;
        }
        fs::rename(&self.path, &rotated)?;

        self.path = current_log_path(&self.dir);
        self.file = open_append(&self.path)?;
        self.written = 0;

        cleanup_old_logs(&self.dir, self.max_files, Some(&self.path));
        Ok(())
    }
}

impl Write for RotatingLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_size {
            // Keep logging to the current file if rotation fails
            let _ = self.rotate();
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        if self.echo_stderr {
            let _ = io::stderr().write_all(&buf[..n]);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
