use std::sync::Arc;

use crate::{
    entry::{Content, Entry},
    error::InvalidEntryError,
    field,
    header::{GobHeader, COUNT_LEN, FIXED_OVERHEAD, HEADER_LEN, NAME_LEN, RECORD_LEN},
    record::DirectoryRecord,
};

pub(crate) trait Serialize {
    /// Writes `self` at `offset` and returns the number of bytes written.
    fn write(&self, buffer: &mut [u8], offset: usize) -> usize;
}

impl Serialize for GobHeader {
    fn write(&self, buffer: &mut [u8], offset: usize) -> usize {
        field::write_fixed(buffer, offset, &self.signature);
        field::write_u32(buffer, offset + 4, self.directory_offset);
        HEADER_LEN
    }
}

impl Serialize for DirectoryRecord {
    fn write(&self, buffer: &mut [u8], offset: usize) -> usize {
        field::write_u32(buffer, offset, self.start);
        field::write_u32(buffer, offset + 4, self.size);
        field::write_terminated(buffer, offset + 8, offset + 8 + NAME_LEN, self.name.as_bytes());
        RECORD_LEN
    }
}

/// Serializes `entries` in order into a new archive buffer.
///
/// Content is packed back-to-back after the header and followed by the
/// directory. Once the buffer is complete every entry is re-pointed at it, so
/// fresh entries become archived ones with their final `start`. On error the
/// entries are left untouched.
pub fn write(entries: &mut [Entry]) -> Result<Arc<[u8]>, InvalidEntryError> {
    let contents = entries
        .iter()
        .map(Entry::resolve)
        .collect::<Result<Vec<_>, _>>()?;

    let data_len: u64 = contents.iter().map(|data| data.len() as u64).sum();
    let total = FIXED_OVERHEAD as u64 + RECORD_LEN as u64 * entries.len() as u64 + data_len;
    if total > u32::MAX as u64 {
        return Err(InvalidEntryError::ArchiveTooLarge { size: total });
    }

    let mut buffer = vec![0u8; total as usize];
    let mut cursor = HEADER_LEN;
    let mut records = Vec::with_capacity(entries.len());

    for (entry, data) in entries.iter().zip(&contents) {
        field::write_fixed(&mut buffer, cursor, data);
        records.push(DirectoryRecord {
            start: cursor as u32,
            size: data.len() as u32,
            name: entry.name.clone(),
        });
        cursor += data.len();
    }
    drop(contents);

    let directory = cursor;
    GobHeader::new(directory as u32).write(&mut buffer, 0);

    field::write_u32(&mut buffer, cursor, records.len() as u32);
    cursor += COUNT_LEN;

    for record in &records {
        cursor += record.write(&mut buffer, cursor);
    }
    debug_assert_eq!(cursor, buffer.len());

    tracing::debug!(
        directory = format_args!("{:#x}", directory),
        end = format_args!("{:#x}", cursor),
        bytes = total,
        count = records.len(),
        "serialized GOB archive"
    );

    let buffer: Arc<[u8]> = buffer.into();
    for (entry, record) in entries.iter_mut().zip(records) {
        entry.start = record.start;
        entry.content = Content::Archived {
            buffer: Arc::clone(&buffer),
            size: record.size,
        };
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{de::read, entry::EntryName};

    fn fresh(name: &str, data: &[u8]) -> Entry {
        Entry {
            name: EntryName::new(name),
            start: 0,
            content: Content::Fresh(data.to_vec()),
        }
    }

    #[test]
    fn write_empty_archive() {
        let buf = write(&mut []).unwrap();
        assert_eq!(&*buf, b"GOB\x0a\x08\0\0\0\0\0\0\0");
    }

    #[test]
    fn write_single_entry() {
        let mut entries = vec![fresh("LEVEL1.LEV", &[1, 2, 3, 4])];
        let buf = write(&mut entries).unwrap();

        assert_eq!(buf.len(), 12 + 21 + 4);
        assert_eq!(&buf[0..4], b"GOB\n");
        assert_eq!(&buf[4..8], &12u32.to_le_bytes());
        assert_eq!(&buf[8..12], &[1, 2, 3, 4]);
        assert_eq!(&buf[12..16], &1u32.to_le_bytes());
        assert_eq!(&buf[16..20], &8u32.to_le_bytes());
        assert_eq!(&buf[20..24], &4u32.to_le_bytes());
        assert_eq!(&buf[24..37], b"LEVEL1.LEV\0\0\0");

        let read_back = read(Arc::clone(&buf)).unwrap();
        assert_eq!(read_back.len(), 1);
        assert_eq!(read_back[0].name.to_string(), "LEVEL1.LEV");
        assert_eq!(read_back[0].size(), 4);
        assert_eq!(read_back[0].start, 8);
        assert_eq!(read_back[0].data(), Some(&[1u8, 2, 3, 4][..]));
    }

    #[test]
    fn write_repoints_entries_at_new_buffer() {
        let mut entries = vec![fresh("A.BIN", b"aaa"), fresh("B.BIN", b"bb")];
        let buf = write(&mut entries).unwrap();

        assert_eq!(entries[0].start, 8);
        assert_eq!(entries[1].start, 11);
        for entry in &entries {
            match &entry.content {
                Content::Archived { buffer, .. } => assert!(Arc::ptr_eq(buffer, &buf)),
                Content::Fresh(_) => panic!("entry still fresh after write"),
            }
        }
        assert_eq!(entries[1].data(), Some(&b"bb"[..]));
    }

    #[test]
    fn write_round_trips_and_is_idempotent() {
        let mut entries = vec![
            fresh("INTRO.TXT", b"hello"),
            fresh("EMPTY.DAT", b""),
            fresh("intro.txt", b"duplicate name"),
        ];
        let first = write(&mut entries).unwrap();

        let mut reread = read(Arc::clone(&first)).unwrap();
        assert_eq!(reread.len(), 3);
        for (a, b) in entries.iter().zip(&reread) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.size(), b.size());
            assert_eq!(a.data(), b.data());
        }

        let second = write(&mut reread).unwrap();
        assert_eq!(&*first, &*second);
    }

    #[test]
    fn write_compacts_reordered_archive() {
        let mut entries = vec![fresh("A", b"1111"), fresh("B", b"22")];
        let buf = write(&mut entries).unwrap();

        let mut reread = read(buf).unwrap();
        reread.swap(0, 1);
        write(&mut reread).unwrap();

        assert_eq!(reread[0].name.to_string(), "B");
        assert_eq!(reread[0].start, 8);
        assert_eq!(reread[1].start, 10);
        assert_eq!(reread[1].data(), Some(&b"1111"[..]));
    }

    #[test]
    fn write_truncates_long_names() {
        let mut entries = vec![Entry {
            name: EntryName(b"ABCDEFGHIJKLMNOP".to_vec()),
            start: 0,
            content: Content::Fresh(vec![9]),
        }];
        let buf = write(&mut entries).unwrap();
        let reread = read(buf).unwrap();
        assert_eq!(reread[0].name.as_bytes(), b"ABCDEFGHIJKLM");
    }

    #[test]
    fn write_name_with_embedded_zero() {
        let mut entries = vec![fresh("AB\0CD", b"x")];
        let buf = write(&mut entries).unwrap();
        let reread = read(buf).unwrap();
        assert_eq!(reread[0].name.as_bytes(), b"AB");
    }

    #[test]
    fn write_rejects_unresolved_entry_without_touching_entries() {
        let stale: Arc<[u8]> = Arc::from(vec![0u8; 4]);
        let mut entries = vec![
            fresh("GOOD.BIN", b"good"),
            Entry {
                name: EntryName::new("STALE.BIN"),
                start: 2,
                content: Content::Archived {
                    buffer: stale,
                    size: 10,
                },
            },
        ];

        match write(&mut entries) {
            Err(InvalidEntryError::Unresolved { name, .. }) => {
                assert_eq!(name.to_string(), "STALE.BIN")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(entries[0].is_fresh());
        assert_eq!(entries[0].start, 0);
    }
}
