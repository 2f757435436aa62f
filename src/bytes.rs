//! Fixed-width primitive reads and writes over byte slices.
//!
//! Readers return `None` when the slice is shorter than the primitive, which is how short
//! buffers surface as absent values. Writers always receive a slice of exactly the field width.

use byteorder::{BigEndian, ByteOrder, LittleEndian, NativeEndian};

use crate::catalog::{Endian, NibbleOrder};

/// Mask covering the low `width` bytes.
pub fn width_mask(width: usize) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}

/// Reads an unsigned integer of `width` bytes (1..=8) from the start of `data`.
pub fn read_uint(data: &[u8], width: usize, endian: Endian) -> Option<u64> {
    let buf = data.get(..width)?;
    Some(match endian {
        Endian::Native => NativeEndian::read_uint(buf, width),
        Endian::Little => LittleEndian::read_uint(buf, width),
        Endian::Big => BigEndian::read_uint(buf, width),
    })
}

/// Reads a sign-extended integer of `width` bytes (1..=8) from the start of `data`.
pub fn read_int(data: &[u8], width: usize, endian: Endian) -> Option<i64> {
    let buf = data.get(..width)?;
    Some(match endian {
        Endian::Native => NativeEndian::read_int(buf, width),
        Endian::Little => LittleEndian::read_int(buf, width),
        Endian::Big => BigEndian::read_int(buf, width),
    })
}

/// Reads a 4-byte float. The bit pattern is kept as is, signalling NaNs included.
pub fn read_f32(data: &[u8], endian: Endian) -> Option<f32> {
    read_uint(data, 4, endian).map(|bits| f32::from_bits(bits as u32))
}

/// Reads an 8-byte float, keeping its bit pattern.
pub fn read_f64(data: &[u8], endian: Endian) -> Option<f64> {
    read_uint(data, 8, endian).map(f64::from_bits)
}

/// Writes the low `buf.len()` bytes of `bits`. Higher bits are truncated.
pub fn write_uint(buf: &mut [u8], bits: u64, endian: Endian) {
    let width = buf.len();
    let value = bits & width_mask(width);
    match endian {
        Endian::Native => NativeEndian::write_uint(buf, value, width),
        Endian::Little => LittleEndian::write_uint(buf, value, width),
        Endian::Big => BigEndian::write_uint(buf, value, width),
    }
}

/// Writes a 4-byte float from its bit pattern.
pub fn write_f32(buf: &mut [u8], value: f32, endian: Endian) {
    write_uint(buf, value.to_bits() as u64, endian);
}

/// Writes an 8-byte float from its bit pattern.
pub fn write_f64(buf: &mut [u8], value: f64, endian: Endian) {
    write_uint(buf, value.to_bits(), endian);
}

/// Strips trailing NUL bytes.
pub fn strip_nul(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &data[..end]
}

/// Strips trailing NUL bytes, then trailing ASCII spaces.
pub fn strip_padded(data: &[u8]) -> &[u8] {
    let data = strip_nul(data);
    let end = data.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    &data[..end]
}

/// Copies `src` into `buf`, truncating it or filling the remainder with `fill`.
pub fn pad_into(buf: &mut [u8], src: &[u8], fill: u8) {
    let n = src.len().min(buf.len());
    buf[..n].copy_from_slice(&src[..n]);
    buf[n..].fill(fill);
}

/// Renders bytes as lowercase hex digits in the given nibble order.
pub fn to_hex(data: &[u8], order: NibbleOrder) -> String {
    match order {
        NibbleOrder::HighFirst => hex::encode(data),
        NibbleOrder::LowFirst => {
            let swapped: Vec<u8> = data.iter().map(|b| b.rotate_left(4)).collect();
            hex::encode(swapped)
        }
    }
}

/// Parses hex digits into exactly `buf.len()` bytes. Short input is padded with `0` digits,
/// long input truncated.
pub fn hex_into(buf: &mut [u8], digits: &str, order: NibbleOrder) -> Result<(), hex::FromHexError> {
    let want = buf.len() * 2;
    let mut text: String = digits.chars().take(want).collect();
    while text.len() < want {
        text.push('0');
    }

    hex::decode_to_slice(&text, buf)?;
    if order == NibbleOrder::LowFirst {
        for b in buf.iter_mut() {
            *b = b.rotate_left(4);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_uint_endian() {
        assert_eq!(read_uint(&[0x00, 0x00, 0x30, 0x39], 4, Endian::Big), Some(12345));
        assert_eq!(read_uint(&[0x39, 0x30, 0x00, 0x00], 4, Endian::Little), Some(12345));
    }

    #[test]
    fn test_read_short_slice() {
        assert_eq!(read_uint(&[0x01], 2, Endian::Little), None);
        assert_eq!(read_int(&[], 1, Endian::Little), None);
        assert_eq!(read_f32(&[0, 0, 0], Endian::Big), None);
    }

    #[test]
    fn test_read_int_sign_extends() {
        assert_eq!(read_int(&[0x80], 1, Endian::Little), Some(-128));
        assert_eq!(read_int(&[0x00, 0x80], 2, Endian::Little), Some(-32768));
        assert_eq!(read_int(&[0xff; 8], 8, Endian::Big), Some(-1));
    }

    #[test]
    fn test_write_uint_truncates() {
        let mut buf = [0u8; 2];
        write_uint(&mut buf, 0x12345, Endian::Big);
        assert_eq!(buf, [0x23, 0x45]);

        let mut buf = [0u8; 1];
        write_uint(&mut buf, (-1i64) as u64, Endian::Little);
        assert_eq!(buf, [0xff]);
    }

    #[test]
    fn test_float_round_trip() {
        let mut buf = [0u8; 4];
        write_f32(&mut buf, 2.5, Endian::Big);
        assert_eq!(buf, [0x40, 0x20, 0x00, 0x00]);
        assert_eq!(read_f32(&buf, Endian::Big), Some(2.5));

        let mut buf = [0u8; 8];
        write_f64(&mut buf, -0.5, Endian::Little);
        assert_eq!(read_f64(&buf, Endian::Little), Some(-0.5));
    }

    #[test]
    fn test_f32_keeps_signalling_nan() {
        let data = [0x01, 0x00, 0x80, 0x7f];
        let value = read_f32(&data, Endian::Little).unwrap();
        assert!(value.is_nan());

        let mut buf = [0u8; 4];
        write_f32(&mut buf, value, Endian::Little);
        assert_eq!(buf, data);
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip_padded(b"hello   "), b"hello");
        assert_eq!(strip_padded(b"hi \0\0"), b"hi");
        assert_eq!(strip_nul(b"hello\0\0\0"), b"hello");
        assert_eq!(strip_nul(b"a \0"), b"a ");
        assert_eq!(strip_nul(b"\0\0"), b"");
    }

    #[test]
    fn test_pad_into() {
        let mut buf = [0xaau8; 5];
        pad_into(&mut buf, b"ab", b' ');
        assert_eq!(&buf, b"ab   ");

        pad_into(&mut buf, b"abcdefg", 0);
        assert_eq!(&buf, b"abcde");
    }

    #[test]
    fn test_hex_nibble_orders() {
        assert_eq!(to_hex(b"1234", NibbleOrder::HighFirst), "31323334");
        assert_eq!(to_hex(b"1234", NibbleOrder::LowFirst), "13233343");

        let mut buf = [0u8; 4];
        hex_into(&mut buf, "13233343", NibbleOrder::LowFirst).unwrap();
        assert_eq!(&buf, b"1234");
    }

    #[test]
    fn test_hex_into_pads_short_input() {
        let mut buf = [0xffu8; 2];
        hex_into(&mut buf, "12", NibbleOrder::HighFirst).unwrap();
        assert_eq!(buf, [0x12, 0x00]);
    }

    #[test]
    fn test_hex_into_rejects_bad_digit() {
        let mut buf = [0u8; 1];
        assert!(hex_into(&mut buf, "zz", NibbleOrder::HighFirst).is_err());
    }
}
