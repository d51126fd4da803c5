use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    archive::GobArchive,
    error::{FormatError, InvalidEntryError},
};

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("Failed to read GOB file. Path: '{}'", .1.display())]
    ReadFailed(#[source] std::io::Error, PathBuf),

    #[error("Invalid GOB file. Path: '{}'", .1.display())]
    InvalidArchive(#[source] FormatError, PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Archive cannot be serialized.")]
    InvalidEntry(#[from] InvalidEntryError),

    #[error("Failed to write GOB file. Path: '{}'", .1.display())]
    WriteFailed(#[source] std::io::Error, PathBuf),
}

/// A [`GobArchive`] tied to a path on disk.
#[derive(Debug)]
pub struct GobFile {
    path: PathBuf,
    archive: GobArchive,
}

fn read_archive(path: &Path) -> Result<GobArchive, OpenError> {
    let bytes = fs::read(path).map_err(|e| OpenError::ReadFailed(e, path.to_path_buf()))?;
    GobArchive::from_bytes(bytes).map_err(|e| OpenError::InvalidArchive(e, path.to_path_buf()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl GobFile {
    /// Reads and parses the whole file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<GobFile, OpenError> {
        let path = path.as_ref().to_path_buf();
        let archive = read_archive(&path)?;
        tracing::info!(path = %path.display(), entries = archive.len(), "opened GOB archive");
        Ok(GobFile { path, archive })
    }

    /// An empty archive for `path`. Nothing touches the disk until it is saved.
    pub fn create<P: AsRef<Path>>(path: P) -> GobFile {
        GobFile {
            path: path.as_ref().to_path_buf(),
            archive: GobArchive::new(),
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn archive(&self) -> &GobArchive {
        &self.archive
    }

    #[inline(always)]
    pub fn archive_mut(&mut self) -> &mut GobArchive {
        &mut self.archive
    }

    /// Discards all in-memory changes and parses the file again. On error the
    /// in-memory entries are kept.
    pub fn reload(&mut self) -> Result<(), OpenError> {
        let bytes =
            fs::read(&self.path).map_err(|e| OpenError::ReadFailed(e, self.path.clone()))?;
        self.archive
            .reload(bytes)
            .map_err(|e| OpenError::InvalidArchive(e, self.path.clone()))?;
        tracing::info!(path = %self.path.display(), entries = self.archive.len(), "reloaded GOB archive");
        Ok(())
    }

    /// Writes the archive to its path and returns the number of bytes written.
    pub fn save(&mut self) -> Result<u64, SaveError> {
        let path = self.path.clone();
        self.save_to(&path)
    }

    /// Writes the archive to `path`, which becomes the path of this file.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<u64, SaveError> {
        let path = path.as_ref().to_path_buf();
        let len = self.save_to(&path)?;
        self.path = path;
        Ok(len)
    }

    fn save_to(&mut self, path: &Path) -> Result<u64, SaveError> {
        let buffer = self.archive.to_bytes()?;

        // Never leave a half-written archive behind: write beside it, then swap.
        let tmp = temp_path(path);
        fs::write(&tmp, &buffer[..]).map_err(|e| SaveError::WriteFailed(e, tmp.clone()))?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(SaveError::WriteFailed(e, path.to_path_buf()));
        }

        tracing::info!(
            path = %path.display(),
            entries = self.archive.len(),
            bytes = buffer.len(),
            "saved GOB archive"
        );
        Ok(buffer.len() as u64)
    }
}
