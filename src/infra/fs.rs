//! File I/O primitives: atomic writes, no-clobber copies, directory listing.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors during file system operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("I/O error for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parent directory does not exist: {path}")]
    ParentNotFound { path: PathBuf },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Writes bytes to `path` atomically.
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over the destination, so readers never observe a partial file.
/// The parent directory must exist.
///
/// # Errors
///
/// Returns `FsError::ParentNotFound` if the parent directory doesn't exist.
/// Returns `FsError::AtomicWrite` if the final rename fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), FsError> {
    let parent = path
        .parent()
        .ok_or_else(|| FsError::ParentNotFound { path: path.into() })?;

    if !parent.is_dir() {
        return Err(FsError::ParentNotFound {
            path: parent.into(),
        });
    }

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::from_io(path, e))?;
    temp.write_all(bytes).map_err(|e| FsError::from_io(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| FsError::from_io(path, e))?;

    temp.persist(path).map_err(|e| FsError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;

    Ok(())
}

/// Copies `src` to `dst`, refusing to overwrite an existing destination.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns `FsError::AlreadyExists` if `dst` exists; other failures map
/// through [`FsError::from_io`].
pub fn copy_new(src: &Path, dst: &Path) -> Result<u64, FsError> {
    let mut reader = File::open(src).map_err(|e| FsError::from_io(src, e))?;
    if !reader
        .metadata()
        .map_err(|e| FsError::from_io(src, e))?
        .is_file()
    {
        return Err(FsError::Io {
            path: src.into(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)
        .map_err(|e| FsError::from_io(dst, e))?;

    io::copy(&mut reader, &mut writer).map_err(|e| FsError::from_io(dst, e))
}

/// Moves a file within one file system by renaming it.
pub fn move_file(src: &Path, dst: &Path) -> Result<(), FsError> {
    fs::rename(src, dst).map_err(|e| FsError::from_io(src, e))
}

/// Clears the write permission bits of a file.
pub fn set_readonly(path: &Path) -> Result<(), FsError> {
    let mut permissions = fs::metadata(path)
        .map_err(|e| FsError::from_io(path, e))?
        .permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions).map_err(|e| FsError::from_io(path, e))
}

/// Returns a file's modification time.
pub fn modified_time(path: &Path) -> Result<SystemTime, FsError> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| FsError::from_io(path, e))
}

/// Creates a directory and all its parents.
pub fn ensure_dir(path: &Path) -> Result<(), FsError> {
    fs::create_dir_all(path).map_err(|e| FsError::from_io(path, e))
}

/// Lists the immediate, non-hidden subdirectories of `dir`, sorted by name.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the directory doesn't exist.
/// Returns `FsError::NotADirectory` if the path is not a directory.
pub fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>, FsError> {
    list_children(dir, |e| e.file_type().is_dir())
}

/// Lists the immediate, non-hidden regular files of `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, FsError> {
    list_children(dir, |e| e.file_type().is_file())
}

fn list_children(dir: &Path, keep: fn(&DirEntry) -> bool) -> Result<Vec<PathBuf>, FsError> {
    if !dir.exists() {
        return Err(FsError::NotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(FsError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut children = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(source) => FsError::from_io(&path, source),
                None => FsError::Io {
                    path,
                    source: io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
                },
            }
        })?;
        if !is_hidden(&entry) && keep(&entry) {
            children.push(entry.into_path());
        }
    }
    Ok(children)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}
