use std::path::PathBuf;

use gob_format::{ExportError, InvalidEntryError, NotFoundError, OpenError, SaveError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: OpenError,
    },

    #[error("Cannot save archive `{}`", .path.display())]
    SaveArchive {
        path: PathBuf,
        #[source]
        source: SaveError,
    },

    #[error("Archive already exists: `{}` (use -f/--force to overwrite)", .path.display())]
    ArchiveExists { path: PathBuf },

    #[error("Cowardly refusing to archive `{}` into itself", .path.display())]
    ArchiveSelf { path: PathBuf },

    #[error("No files specified to add to archive")]
    NoFilesSpecified,

    #[error("Cannot read file `{}`", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write file `{}`", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create directory `{}`", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot derive an entry name from `{}`", .path.display())]
    InvalidFileName { path: PathBuf },

    #[error("Refusing to extract entry `{name}` outside the output directory")]
    UnsafeEntryName { name: String },

    #[error("Cannot import `{}`", .path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: InvalidEntryError,
    },

    #[error("Cannot export `{name}`")]
    Export {
        name: String,
        #[source]
        source: ExportError,
    },

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("Cannot serialize listing")]
    Json(#[source] serde_json::Error),

    #[error("Cannot read from terminal")]
    Terminal(#[source] std::io::Error),
}
