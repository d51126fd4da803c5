use std::sync::Arc;

use crate::{
    de,
    entry::{Content, Entry, EntryName},
    error::{ExportError, FormatError, InvalidEntryError, NotFoundError},
    field,
    header::HEADER_LEN,
    ser,
};

/// Where the next imported entry is expected to land: right after the last
/// entry, or right after the header when there are none.
#[inline(always)]
pub fn next_start(entries: &[Entry]) -> u32 {
    entries
        .last()
        .map(|last| last.start.saturating_add(last.size()))
        .unwrap_or(HEADER_LEN as u32)
}

/// Appends a fresh entry holding `bytes`.
///
/// Names longer than [`EntryName::MAX_LEN`] bytes are truncated. The entry's
/// `start` is provisional until the archive is written.
pub fn import_content<N: AsRef<[u8]>>(
    entries: &mut Vec<Entry>,
    name: N,
    bytes: Vec<u8>,
) -> Result<&Entry, InvalidEntryError> {
    let raw = name.as_ref();
    let name = EntryName::new(raw);

    if raw.len() > EntryName::MAX_LEN {
        tracing::warn!(
            original = %field::latin1(raw),
            %name,
            "entry name truncated to {} bytes",
            EntryName::MAX_LEN
        );
    }

    if bytes.len() as u64 > u32::MAX as u64 {
        return Err(InvalidEntryError::TooLarge {
            name,
            size: bytes.len() as u64,
        });
    }

    let start = next_start(entries);
    tracing::debug!(
        %name,
        start = format_args!("{:#x}", start),
        bytes = bytes.len(),
        "imported entry"
    );

    let index = entries.len();
    entries.push(Entry {
        name,
        start,
        content: Content::Fresh(bytes),
    });
    Ok(&entries[index])
}

/// The content of `entry`: a slice of its archive buffer, or its own bytes.
#[inline(always)]
pub fn export_content(entry: &Entry) -> Result<&[u8], InvalidEntryError> {
    entry.resolve()
}

/// Case-insensitive lookup. With duplicate names, the first in archive order wins.
pub fn find_by_name<N: AsRef<[u8]>>(entries: &[Entry], name: N) -> Option<&Entry> {
    let name = name.as_ref();
    entries.iter().find(|entry| entry.name.matches(name))
}

/// Index of the first entry [`find_by_name`] would return.
pub fn position_by_name<N: AsRef<[u8]>>(entries: &[Entry], name: N) -> Option<usize> {
    let name = name.as_ref();
    entries.iter().position(|entry| entry.name.matches(name))
}

/// Entries whose extension equals `ext`, ignoring case, in archive order.
pub fn filter_by_extension<E: AsRef<[u8]>>(entries: &[Entry], ext: E) -> Vec<&Entry> {
    let ext = ext.as_ref();
    entries
        .iter()
        .filter(|entry| entry.name.has_extension(ext))
        .collect()
}

/// An ordered collection of entries, owned in one place.
///
/// Hold on to the handle rather than its entries: [`GobArchive::reload`]
/// replaces the whole collection.
#[derive(Debug, Clone, Default)]
pub struct GobArchive {
    entries: Vec<Entry>,
}

impl GobArchive {
    pub fn new() -> GobArchive {
        GobArchive::default()
    }

    pub fn from_bytes<B: Into<Arc<[u8]>>>(buffer: B) -> Result<GobArchive, FormatError> {
        Ok(GobArchive {
            entries: de::read(buffer)?,
        })
    }

    /// Replaces every entry with those parsed from `buffer`. If parsing
    /// fails the current entries are kept.
    pub fn reload<B: Into<Arc<[u8]>>>(&mut self, buffer: B) -> Result<(), FormatError> {
        let entries = de::read(buffer)?;
        tracing::debug!(
            previous = self.entries.len(),
            count = entries.len(),
            "reloaded archive"
        );
        self.entries = entries;
        Ok(())
    }

    #[inline(always)]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry sizes.
    pub fn content_len(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size() as u64).sum()
    }

    /// Whether any entry has not been written yet.
    pub fn has_fresh(&self) -> bool {
        self.entries.iter().any(Entry::is_fresh)
    }

    #[inline(always)]
    pub fn next_start(&self) -> u32 {
        next_start(&self.entries)
    }

    pub fn import<N: AsRef<[u8]>>(
        &mut self,
        name: N,
        bytes: Vec<u8>,
    ) -> Result<&Entry, InvalidEntryError> {
        import_content(&mut self.entries, name, bytes)
    }

    #[inline(always)]
    pub fn find<N: AsRef<[u8]>>(&self, name: N) -> Option<&Entry> {
        find_by_name(&self.entries, name)
    }

    pub fn export<N: AsRef<[u8]>>(&self, name: N) -> Result<&[u8], ExportError> {
        let name = name.as_ref();
        let entry = self
            .find(name)
            .ok_or_else(|| NotFoundError::Name(field::latin1(name)))?;
        Ok(export_content(entry)?)
    }

    /// Removes the first entry matching `name`. The others keep their order.
    pub fn remove<N: AsRef<[u8]>>(&mut self, name: N) -> Result<Entry, NotFoundError> {
        let name = name.as_ref();
        let index = position_by_name(&self.entries, name)
            .ok_or_else(|| NotFoundError::Name(field::latin1(name)))?;
        let entry = self.entries.remove(index);
        tracing::debug!(name = %entry.name, index, "removed entry");
        Ok(entry)
    }

    #[inline(always)]
    pub fn filter_by_extension<E: AsRef<[u8]>>(&self, ext: E) -> Vec<&Entry> {
        filter_by_extension(&self.entries, ext)
    }

    /// Like [`GobArchive::filter_by_extension`], but an empty result is an error.
    pub fn require_extension<E: AsRef<[u8]>>(&self, ext: E) -> Result<Vec<&Entry>, NotFoundError> {
        let ext = ext.as_ref();
        let found = self.filter_by_extension(ext);
        if found.is_empty() {
            return Err(NotFoundError::Extension(field::latin1(ext)));
        }
        Ok(found)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serializes the archive. Afterwards every entry refers to the returned buffer.
    pub fn to_bytes(&mut self) -> Result<Arc<[u8]>, InvalidEntryError> {
        ser::write(&mut self.entries)
    }
}

impl<'a> IntoIterator for &'a GobArchive {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
