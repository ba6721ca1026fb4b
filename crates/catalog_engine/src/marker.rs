use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("marker directory unusable: {0}")]
    Directory(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Persisted "this catalog has been bulk loaded" flag.
///
/// `exists` followed by `set` is not atomic; two concurrent runs may both
/// observe an unset marker.
pub trait CompletionMarker: Send + Sync {
    fn exists(&self) -> Result<bool, MarkerError>;
    fn set(&self) -> Result<(), MarkerError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSettings {
    pub dir: PathBuf,
    /// Bump the version suffix to force a reload under a new target.
    pub name: String,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("flags"),
            name: "indexing_done_26.flag".to_string(),
        }
    }
}

/// Marker kept as an empty file; presence means "done".
#[derive(Debug, Clone)]
pub struct FileMarker {
    dir: PathBuf,
    name: String,
}

impl FileMarker {
    pub fn new(settings: MarkerSettings) -> Self {
        Self {
            dir: settings.dir,
            name: settings.name,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

impl CompletionMarker for FileMarker {
    fn exists(&self) -> Result<bool, MarkerError> {
        let path = self.path();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(true),
            Ok(_) => Err(MarkerError::Directory(format!(
                "{} exists but is not a file",
                path.display()
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(MarkerError::Io(err)),
        }
    }

    /// Writes through a temp file and renames it into place.
    fn set(&self) -> Result<(), MarkerError> {
        ensure_marker_dir(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(self.path()).map_err(|e| MarkerError::Io(e.error))?;
        Ok(())
    }
}

/// Ensure the marker directory exists; create if missing.
pub(crate) fn ensure_marker_dir(dir: &Path) -> Result<(), MarkerError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| MarkerError::Directory(e.to_string()))?;
        if !meta.is_dir() {
            return Err(MarkerError::Directory(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| MarkerError::Directory(e.to_string()))?;
    }
    Ok(())
}
