//! Cursor-based primitive decoders
//!
//! Every reader takes the backing buffer and a mutable cursor, advances the
//! cursor past what it consumed, and fails with [`Error::OutOfBounds`] instead
//! of reading past `buf.len()`.

use bytes::Bytes;

use super::{Error, Result, padded_len_blob, padded_len_string};

/// Borrow `n` bytes at the cursor and advance past them.
#[inline]
fn take<'a>(buf: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8]> {
    let start = *pos;
    let end = start
        .checked_add(n)
        .filter(|&end| end <= buf.len())
        .ok_or(Error::OutOfBounds {
            offset: start,
            needed: n,
            len: buf.len(),
        })?;
    *pos = end;
    Ok(&buf[start..end])
}

#[inline]
fn take_array<const N: usize>(buf: &[u8], pos: &mut usize) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(buf, pos, N)?);
    Ok(out)
}

/// Read a big-endian `i32`.
pub fn read_i32(buf: &[u8], pos: &mut usize) -> Result<i32> {
    take_array(buf, pos).map(i32::from_be_bytes)
}

/// Read a big-endian IEEE-754 `f32`.
pub fn read_f32(buf: &[u8], pos: &mut usize) -> Result<f32> {
    take_array(buf, pos).map(f32::from_be_bytes)
}

/// Read an 8-byte big-endian time tag as an opaque tick count.
pub fn read_timetag(buf: &[u8], pos: &mut usize) -> Result<u64> {
    take_array(buf, pos).map(u64::from_be_bytes)
}

/// Read a NUL-terminated string and skip its padding.
///
/// The cursor advances by the padded size, counted from the field start.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_string(buf: &[u8], pos: &mut usize) -> Result<String> {
    let start = *pos;
    let rest = buf.get(start..).unwrap_or_default();
    let len = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(Error::OutOfBounds {
            offset: start,
            needed: rest.len() + 1,
            len: buf.len(),
        })?;
    let bytes = take(buf, pos, padded_len_string(len))?;
    Ok(String::from_utf8_lossy(&bytes[..len]).into_owned())
}

/// Read a length-prefixed blob and skip its padding.
pub fn read_blob(buf: &[u8], pos: &mut usize) -> Result<Bytes> {
    let offset = *pos;
    let length = read_i32(buf, pos)?;
    let len = usize::try_from(length).map_err(|_| Error::NegativeLength { offset, length })?;
    let bytes = take(buf, pos, padded_len_blob(len))?;
    Ok(Bytes::copy_from_slice(&bytes[..len]))
}
