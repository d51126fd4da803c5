use crate::entry::EntryName;

/// One 21-byte row of the directory, as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectoryRecord {
    /// The position of the content from the start of the file.
    pub(crate) start: u32,

    /// The exact length of the content.
    pub(crate) size: u32,

    /// Zero-terminated when shorter than the 13-byte field.
    pub(crate) name: EntryName,
}

impl DirectoryRecord {
    /// One past the last content byte, widened so it cannot overflow.
    #[inline(always)]
    pub(crate) fn end(&self) -> u64 {
        self.start as u64 + self.size as u64
    }
}
