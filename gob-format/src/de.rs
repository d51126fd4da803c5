use std::sync::Arc;

use crate::{
    entry::{Entry, EntryName},
    error::{FormatError, OutOfBounds},
    field,
    header::{GobHeader, COUNT_LEN, HEADER_LEN, NAME_LEN, RECORD_LEN, SIGNATURE},
    record::DirectoryRecord,
};

pub(crate) trait Deserialize: Sized {
    fn deserialize(buffer: &[u8], offset: usize) -> Result<Self, FormatError>;
}

impl Deserialize for GobHeader {
    fn deserialize(buffer: &[u8], offset: usize) -> Result<Self, FormatError> {
        let found = field::read_fixed(buffer, offset, SIGNATURE.len())
            .map_err(FormatError::TruncatedHeader)?;

        if found != SIGNATURE {
            let mut signature = [0u8; 4];
            signature.copy_from_slice(found);
            return Err(FormatError::InvalidSignature { found: signature });
        }

        let directory_offset = field::read_u32(buffer, offset + SIGNATURE.len())
            .map_err(FormatError::TruncatedHeader)?;

        tracing::debug!(
            start = format_args!("{:#x}", offset),
            end = format_args!("{:#x}", offset + HEADER_LEN),
            bytes = HEADER_LEN,
            directory_offset = format_args!("{:#x}", directory_offset),
            "deserialized GobHeader"
        );

        Ok(GobHeader::new(directory_offset))
    }
}

impl Deserialize for DirectoryRecord {
    fn deserialize(buffer: &[u8], offset: usize) -> Result<Self, FormatError> {
        let truncated = |source| FormatError::TruncatedDirectory {
            offset: offset as u64,
            source,
        };

        let start = field::read_u32(buffer, offset).map_err(truncated)?;
        let size = field::read_u32(buffer, offset + 4).map_err(truncated)?;
        let name = field::read_terminated(buffer, offset + 8, offset + 8 + NAME_LEN)
            .map_err(truncated)?;
        let name = EntryName::new(name);

        tracing::trace!(
            start = format_args!("{:#x}", offset),
            end = format_args!("{:#x}", offset + RECORD_LEN),
            bytes = RECORD_LEN,
            %name,
            "deserialized DirectoryRecord"
        );

        Ok(DirectoryRecord { start, size, name })
    }
}

/// Parses `buffer` into its entries, in directory order.
///
/// Every entry is a view into `buffer`, which stays alive as long as any of
/// them does. All offsets and sizes are checked against the buffer; nothing is
/// returned unless the whole directory is valid.
pub fn read<B: Into<Arc<[u8]>>>(buffer: B) -> Result<Vec<Entry>, FormatError> {
    let buffer: Arc<[u8]> = buffer.into();
    let len = buffer.len();

    let header = GobHeader::deserialize(&buffer, 0)?;
    let directory = header.directory_offset as usize;

    let count = field::read_u32(&buffer, directory).map_err(|source| {
        FormatError::TruncatedDirectory {
            offset: directory as u64,
            source,
        }
    })?;

    // The count is untrusted: make sure every record fits before allocating for them.
    let records_start = directory + COUNT_LEN;
    let records_end = records_start as u64 + count as u64 * RECORD_LEN as u64;
    if records_end > len as u64 {
        return Err(FormatError::TruncatedDirectory {
            offset: directory as u64,
            source: OutOfBounds {
                start: records_start as u64,
                end: records_end,
                len,
            },
        });
    }

    let mut entries = Vec::with_capacity(count as usize);
    for index in 0..count as usize {
        let record = DirectoryRecord::deserialize(&buffer, records_start + index * RECORD_LEN)?;

        if record.end() > len as u64 {
            return Err(FormatError::EntryOutOfBounds {
                index,
                name: record.name,
                start: record.start,
                size: record.size,
                len,
            });
        }

        entries.push(Entry::archived(
            record.name,
            Arc::clone(&buffer),
            record.start,
            record.size,
        ));
    }

    tracing::debug!(
        directory = format_args!("{:#x}", directory),
        end = format_args!("{:#x}", records_end),
        bytes = len,
        count,
        "deserialized GOB archive"
    );

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(directory_offset: u32, data: &[u8], records: &[(u32, u32, &[u8])]) -> Vec<u8> {
        let mut buf = SIGNATURE.to_vec();
        buf.extend_from_slice(&directory_offset.to_le_bytes());
        buf.extend_from_slice(data);
        buf.extend_from_slice(&(records.len() as u32).to_le_bytes());
        for (start, size, name) in records {
            buf.extend_from_slice(&start.to_le_bytes());
            buf.extend_from_slice(&size.to_le_bytes());
            let mut field = [0u8; NAME_LEN];
            field[..name.len()].copy_from_slice(name);
            buf.extend_from_slice(&field);
        }
        buf
    }

    #[test]
    fn read_empty_archive() {
        let buf = archive(8, &[], &[]);
        assert_eq!(buf.len(), 12);
        assert!(read(buf).unwrap().is_empty());
    }

    #[test]
    fn read_entries_in_directory_order() {
        let buf = archive(
            8 + 7,
            b"ABCDEFG",
            &[(12, 3, b"SECOND.TXT"), (8, 4, b"FIRST.BIN")],
        );
        let entries = read(buf).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name.to_string(), "SECOND.TXT");
        assert_eq!(entries[0].start, 12);
        assert_eq!(entries[0].data(), Some(&b"EFG"[..]));
        assert_eq!(entries[1].name.to_string(), "FIRST.BIN");
        assert_eq!(entries[1].data(), Some(&b"ABCD"[..]));
        assert!(!entries[0].is_fresh());
    }

    #[test]
    fn read_full_width_name_without_terminator() {
        let buf = archive(9, b"X", &[(8, 1, b"ABCDEFGHI.JKL")]);
        let entries = read(buf).unwrap();
        assert_eq!(entries[0].name.as_bytes(), b"ABCDEFGHI.JKL");
    }

    #[test]
    fn read_rejects_bad_signature() {
        let mut buf = archive(8, &[], &[]);
        buf[3] = b'\r';
        match read(buf) {
            Err(FormatError::InvalidSignature { found }) => assert_eq!(&found, b"GOB\r"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_rejects_short_header() {
        assert!(matches!(read(&b"GO"[..]), Err(FormatError::TruncatedHeader(_))));
        assert!(matches!(
            read(&b"GOB\n\x08\0"[..]),
            Err(FormatError::TruncatedHeader(_))
        ));
    }

    #[test]
    fn read_rejects_directory_offset_past_end() {
        let buf = archive(0x1000, &[], &[]);
        assert!(matches!(
            read(buf),
            Err(FormatError::TruncatedDirectory { offset: 0x1000, .. })
        ));

        let buf = archive(u32::MAX, &[], &[]);
        assert!(matches!(read(buf), Err(FormatError::TruncatedDirectory { .. })));
    }

    #[test]
    fn read_rejects_count_larger_than_directory() {
        let mut buf = archive(8, &[], &[]);
        buf[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        match read(buf) {
            Err(FormatError::TruncatedDirectory { offset, source }) => {
                assert_eq!(offset, 8);
                assert_eq!(source.start, 12);
                assert_eq!(source.len, 12);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_rejects_entry_past_end() {
        let buf = archive(12, b"ABCD", &[(8, 4, b"OK"), (10, 100, b"BAD.BIN")]);
        match read(buf) {
            Err(FormatError::EntryOutOfBounds {
                index, name, size, ..
            }) => {
                assert_eq!(index, 1);
                assert_eq!(name.to_string(), "BAD.BIN");
                assert_eq!(size, 100);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_rejects_entry_whose_end_overflows() {
        let buf = archive(8, &[], &[(u32::MAX, u32::MAX, b"WRAP")]);
        assert!(matches!(read(buf), Err(FormatError::EntryOutOfBounds { .. })));
    }

    #[test]
    fn read_shares_one_buffer() {
        let buf = archive(10, b"AB", &[(8, 1, b"A"), (9, 1, b"B")]);
        let entries = read(buf).unwrap();
        match (&entries[0].content, &entries[1].content) {
            (
                crate::Content::Archived { buffer: a, .. },
                crate::Content::Archived { buffer: b, .. },
            ) => assert!(Arc::ptr_eq(a, b)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
