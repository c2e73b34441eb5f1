//! Primitive encoders, the inverse of [`reader`](super::reader)

use bytes::{BufMut, BytesMut};

use super::{padded_len_blob, padded_len_string};

/// Append a big-endian `i32`.
#[inline]
pub fn write_i32(out: &mut BytesMut, value: i32) {
    out.put_i32(value);
}

/// Append a big-endian `f32`.
#[inline]
pub fn write_f32(out: &mut BytesMut, value: f32) {
    out.put_f32(value);
}

/// Append an 8-byte big-endian time tag.
#[inline]
pub fn write_timetag(out: &mut BytesMut, ticks: u64) {
    out.put_u64(ticks);
}

/// Append a string followed by its terminator and NUL padding.
///
/// Strings containing NUL bytes are written as-is; a decoder will stop at the
/// first one.
pub fn write_string(out: &mut BytesMut, value: &str) {
    let bytes = value.as_bytes();
    out.put_slice(bytes);
    out.put_bytes(0, padded_len_string(bytes.len()) - bytes.len());
}

/// Append a length-prefixed blob followed by NUL padding.
///
/// # Panics
///
/// Panics if the blob is longer than `i32::MAX` bytes, which OSC cannot frame.
pub fn write_blob(out: &mut BytesMut, value: &[u8]) {
    let len = i32::try_from(value.len()).expect("blob exceeds OSC length prefix");
    out.put_i32(len);
    out.put_slice(value);
    out.put_bytes(0, padded_len_blob(value.len()) - value.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_string_padding() {
        let mut out = BytesMut::new();
        write_string(&mut out, "abc");
        assert_eq!(&out[..], b"abc\0");

        out.clear();
        write_string(&mut out, "/VMC");
        assert_eq!(&out[..], b"/VMC\0\0\0\0");

        out.clear();
        write_string(&mut out, "");
        assert_eq!(&out[..], b"\0\0\0\0");
    }

    #[test]
    fn test_write_blob_padding() {
        let mut out = BytesMut::new();
        write_blob(&mut out, &[1, 2, 3, 4, 5]);
        assert_eq!(&out[..], &[0, 0, 0, 5, 1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn test_write_numbers() {
        let mut out = BytesMut::new();
        write_i32(&mut out, 1);
        write_f32(&mut out, 1.0);
        write_timetag(&mut out, 1);
        assert_eq!(
            &out[..],
            &[0, 0, 0, 1, 0x3F, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }
}
