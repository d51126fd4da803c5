use std::convert::TryFrom;
use std::fmt;
use std::sync::Arc;

use crate::error::InvalidEntryError;
use crate::field;
use crate::header::NAME_LEN;

/// The name of an entry: at most [`EntryName::MAX_LEN`] raw bytes, stored
/// without a terminator. Conventionally uppercase `NAME.EXT`.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryName(pub(crate) Vec<u8>);

impl EntryName {
    pub const MAX_LEN: usize = NAME_LEN;

    /// Silently truncates to [`EntryName::MAX_LEN`] bytes.
    pub fn new<B: AsRef<[u8]>>(bytes: B) -> EntryName {
        let bytes = bytes.as_ref();
        EntryName(bytes[..bytes.len().min(Self::MAX_LEN)].to_vec())
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The one to three bytes after the last `.`, if there are any.
    pub fn extension(&self) -> Option<&[u8]> {
        let dot = self.0.iter().rposition(|&b| b == b'.')?;
        let ext = &self.0[dot + 1..];
        if (1..=3).contains(&ext.len()) {
            Some(ext)
        } else {
            None
        }
    }

    /// ASCII case-insensitive comparison against the whole name.
    #[inline(always)]
    pub fn matches<N: AsRef<[u8]>>(&self, name: N) -> bool {
        self.0.eq_ignore_ascii_case(name.as_ref())
    }

    /// ASCII case-insensitive comparison against the extension. A leading `.`
    /// in `ext` is ignored.
    pub fn has_extension<E: AsRef<[u8]>>(&self, ext: E) -> bool {
        let ext = ext.as_ref();
        let ext = ext.strip_prefix(b".").unwrap_or(ext);
        self.extension()
            .map(|own| own.eq_ignore_ascii_case(ext))
            .unwrap_or(false)
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&field::latin1(&self.0))
    }
}

impl fmt::Debug for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntryName")
            .field(&field::latin1(&self.0))
            .finish()
    }
}

impl From<&str> for EntryName {
    fn from(name: &str) -> Self {
        EntryName::new(name)
    }
}

impl From<&[u8]> for EntryName {
    fn from(name: &[u8]) -> Self {
        EntryName::new(name)
    }
}

/// Where the bytes of an entry live.
#[derive(Clone)]
pub enum Content {
    /// `size` bytes of a loaded or written archive buffer, starting at the
    /// entry's `start`.
    Archived { buffer: Arc<[u8]>, size: u32 },

    /// Bytes supplied by an import and not yet written to any archive.
    Fresh(Vec<u8>),
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Archived { buffer, size } => f
                .debug_struct("Archived")
                .field("buffer_len", &buffer.len())
                .field("size", size)
                .finish(),
            Content::Fresh(bytes) => f.debug_tuple("Fresh").field(&bytes.len()).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub name: EntryName,

    /// The position of the content in the archive buffer. For fresh entries
    /// this is only a guess of where the content will land; a write assigns
    /// the real value.
    pub start: u32,

    pub content: Content,
}

impl Entry {
    #[inline(always)]
    pub(crate) fn archived(name: EntryName, buffer: Arc<[u8]>, start: u32, size: u32) -> Entry {
        Entry {
            name,
            start,
            content: Content::Archived { buffer, size },
        }
    }

    /// The length of the content. Fresh content too long for 32 bits reports
    /// `u32::MAX`; the writer rejects it.
    #[inline(always)]
    pub fn size(&self) -> u32 {
        match &self.content {
            Content::Archived { size, .. } => *size,
            Content::Fresh(bytes) => u32::try_from(bytes.len()).unwrap_or(u32::MAX),
        }
    }

    #[inline(always)]
    pub fn is_fresh(&self) -> bool {
        matches!(self.content, Content::Fresh(_))
    }

    /// The content bytes, or `None` if an archived view falls outside its buffer.
    #[inline(always)]
    pub fn data(&self) -> Option<&[u8]> {
        self.resolve().ok()
    }

    pub(crate) fn resolve(&self) -> Result<&[u8], InvalidEntryError> {
        match &self.content {
            Content::Archived { buffer, size } => {
                field::read_fixed(buffer, self.start as usize, *size as usize).map_err(|_| {
                    InvalidEntryError::Unresolved {
                        name: self.name.clone(),
                        start: self.start,
                        size: *size,
                        len: buffer.len(),
                    }
                })
            }
            Content::Fresh(bytes) => {
                if bytes.len() as u64 > u32::MAX as u64 {
                    return Err(InvalidEntryError::TooLarge {
                        name: self.name.clone(),
                        size: bytes.len() as u64,
                    });
                }
                Ok(bytes)
            }
        }
    }
}
