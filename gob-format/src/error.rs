use crate::entry::EntryName;

/// A field read that falls outside the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Range [{start:#x}, {end:#x}) exceeds buffer of {len} bytes.")]
pub struct OutOfBounds {
    pub start: u64,
    pub end: u64,
    pub len: usize,
}

/// The buffer is not a well-formed GOB archive. No entries are returned.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Archive is too short to hold a header.")]
    TruncatedHeader(#[source] OutOfBounds),

    #[error("Invalid signature {found:02x?}. Is this a GOB archive?")]
    InvalidSignature { found: [u8; 4] },

    #[error("Truncated or corrupt directory at offset {offset:#x}.")]
    TruncatedDirectory {
        offset: u64,
        #[source]
        source: OutOfBounds,
    },

    #[error("Entry {index} (`{name}`) exceeds buffer bounds: {size} bytes at {start:#x}, buffer is {len} bytes.")]
    EntryOutOfBounds {
        index: usize,
        name: EntryName,
        start: u32,
        size: u32,
        len: usize,
    },
}

/// An entry whose content cannot be placed in an archive.
#[derive(Debug, thiserror::Error)]
pub enum InvalidEntryError {
    #[error("Entry `{name}` has no content: {size} bytes at {start:#x} is outside its buffer of {len} bytes.")]
    Unresolved {
        name: EntryName,
        start: u32,
        size: u32,
        len: usize,
    },

    #[error("Entry `{name}` is too large: {size} bytes does not fit a 32-bit size.")]
    TooLarge { name: EntryName, size: u64 },

    #[error("Archive would be {size} bytes, which does not fit 32-bit offsets.")]
    ArchiveTooLarge { size: u64 },
}

/// A lookup that matched nothing. The archive is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("No entry named `{0}`.")]
    Name(String),

    #[error("No entries with extension `{0}`.")]
    Extension(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    InvalidEntry(#[from] InvalidEntryError),
}
