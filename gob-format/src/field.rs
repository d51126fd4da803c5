//! Fixed- and variable-width field primitives over byte buffers.
//!
//! Reads are bounds-checked and report [`OutOfBounds`]. Writes index the
//! buffer directly, so the caller sizes the buffer before writing into it.

use std::convert::TryFrom;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::OutOfBounds;

#[inline(always)]
fn out_of_bounds(buffer: &[u8], start: usize, end: u64) -> OutOfBounds {
    OutOfBounds {
        start: start as u64,
        end,
        len: buffer.len(),
    }
}

/// Returns the `length` bytes at `offset`, undecoded.
pub fn read_fixed(buffer: &[u8], offset: usize, length: usize) -> Result<&[u8], OutOfBounds> {
    offset
        .checked_add(length)
        .and_then(|end| buffer.get(offset..end))
        .ok_or_else(|| out_of_bounds(buffer, offset, (offset as u64).saturating_add(length as u64)))
}

/// Returns the bytes of `[start, end)` up to, not including, the first zero byte.
/// A field without a zero byte is returned whole.
pub fn read_terminated(buffer: &[u8], start: usize, end: usize) -> Result<&[u8], OutOfBounds> {
    let field = buffer
        .get(start..end)
        .ok_or_else(|| out_of_bounds(buffer, start, end as u64))?;

    match field.iter().position(|&b| b == 0) {
        Some(terminator) => Ok(&field[..terminator]),
        None => Ok(field),
    }
}

/// Reads a little-endian `u32` at `offset`.
#[inline(always)]
pub fn read_u32(buffer: &[u8], offset: usize) -> Result<u32, OutOfBounds> {
    read_fixed(buffer, offset, 4).map(LittleEndian::read_u32)
}

/// Copies `value` verbatim to `offset`. No padding, no field width.
///
/// # Panics
///
/// If `value` does not fit in `buffer` at `offset`.
pub fn write_fixed(buffer: &mut [u8], offset: usize, value: &[u8]) {
    buffer[offset..offset + value.len()].copy_from_slice(value);
}

/// Writes `value` into `[start, end)` and zero-fills the rest of the field.
/// A value longer than the field is cut off at the field boundary.
///
/// # Panics
///
/// If `[start, end)` does not fit in `buffer`.
pub fn write_terminated(buffer: &mut [u8], start: usize, end: usize, value: &[u8]) {
    let field = &mut buffer[start..end];
    let len = value.len().min(field.len());
    field[..len].copy_from_slice(&value[..len]);
    field[len..].fill(0);
}

/// Writes `value` as a little-endian `u32` at `offset`.
///
/// # Panics
///
/// If four bytes do not fit in `buffer` at `offset`.
#[inline(always)]
pub fn write_u32(buffer: &mut [u8], offset: usize, value: u32) {
    LittleEndian::write_u32(&mut buffer[offset..offset + 4], value);
}

/// Decodes every byte as one character, without validation.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`latin1`]. `None` if any character lies above U+00FF.
pub fn to_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}
