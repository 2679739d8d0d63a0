//! Modified UTF-8, the string encoding of the typed-tag protocol.
//!
//! Differs from UTF-8 in two ways: U+0000 is written as `C0 80`, and
//! characters outside the BMP are written as two 3-byte surrogates.

use crate::DecodeError;

pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut units = [0u16; 2];
    for c in s.chars() {
        for &unit in c.encode_utf16(&mut units).iter() {
            push_unit(&mut out, unit);
        }
    }
    out
}

fn push_unit(out: &mut Vec<u8>, unit: u16) {
    match unit {
        0x0001..=0x007F => out.push(unit as u8),
        0x0000 | 0x0080..=0x07FF => {
            out.push(0xC0 | (unit >> 6) as u8);
            out.push(0x80 | (unit & 0x3F) as u8);
        }
        _ => {
            out.push(0xE0 | (unit >> 12) as u8);
            out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
            out.push(0x80 | (unit & 0x3F) as u8);
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let cont = |b: Option<&u8>| -> Result<u16, DecodeError> {
        match b {
            Some(&b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
            _ => Err(DecodeError::InvalidUtf8),
        }
    };
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(b as u16);
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            units.push(((b & 0x1F) as u16) << 6 | cont(bytes.get(i + 1))?);
            i += 2;
        } else if b & 0xF0 == 0xE0 {
            units.push(
                ((b & 0x0F) as u16) << 12 | cont(bytes.get(i + 1))? << 6 | cont(bytes.get(i + 2))?,
            );
            i += 3;
        } else {
            return Err(DecodeError::InvalidUtf8);
        }
    }
    String::from_utf16(&units).map_err(|_| DecodeError::InvalidUtf8)
}
