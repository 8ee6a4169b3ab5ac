use chrono::{DateTime, TimeZone};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Artifact filename for a capture instant: `YYYY-MM-DD_HH-MM-SS.jpg`.
/// Shared between the local file and the uploaded object key.
pub fn snapshot_filename<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("{}.jpg", t.format("%Y-%m-%d_%H-%M-%S"))
}

/// Writes captured JPEGs under a local directory. Nothing is ever
/// cleaned up; unbounded growth is accepted.
pub struct LocalSink {
    dir: PathBuf,
}

impl LocalSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[allow(dead_code)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if it does not exist yet. Safe to call
    /// on every iteration.
    pub fn ensure_dir(&self) -> io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            tracing::info!(dir = %self.dir.display(), "Created image folder");
        }
        Ok(())
    }

    /// Persist one image, returning the path it landed at.
    pub fn write(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}
