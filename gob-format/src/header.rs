/// Every `.gob` file starts with these four bytes.
pub const SIGNATURE: &[u8; 4] = b"GOB\x0a";

/// Width of the name field in a directory record, in bytes.
pub const NAME_LEN: usize = 13;

/// Signature plus the directory offset. Entry content starts right after it.
pub(crate) const HEADER_LEN: usize = 8;

/// The entry count that opens the directory.
pub(crate) const COUNT_LEN: usize = 4;

/// `start` + `size` + name.
pub(crate) const RECORD_LEN: usize = 4 + 4 + NAME_LEN;

/// Bytes every archive carries regardless of its entries: header and entry count.
pub(crate) const FIXED_OVERHEAD: usize = HEADER_LEN + COUNT_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GobHeader {
    pub(crate) signature: [u8; 4],
    pub(crate) directory_offset: u32,
}

impl GobHeader {
    pub(crate) fn new(directory_offset: u32) -> GobHeader {
        GobHeader {
            signature: *SIGNATURE,
            directory_offset,
        }
    }
}
