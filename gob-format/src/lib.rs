//! Herein lies the codec for the `GOB` container format.
//!
//! A GOB file is a signature, a pointer to a trailing directory, and the
//! content of every entry packed back-to-back in between. Use [read] and
//! [write] on raw buffers, [GobArchive] to manage a collection of entries,
//! and [GobFile] to tie one to a path on disk.

mod archive;
mod de;
mod entry;
mod error;
pub mod field;
mod file;
mod header;
mod record;
mod ser;

pub use archive::{
    export_content, filter_by_extension, find_by_name, import_content, next_start,
    position_by_name, GobArchive,
};
pub use de::read;
pub use entry::{Content, Entry, EntryName};
pub use error::{ExportError, FormatError, InvalidEntryError, NotFoundError, OutOfBounds};
pub use file::{GobFile, OpenError, SaveError};
pub use header::{NAME_LEN, SIGNATURE};
pub use ser::write;
