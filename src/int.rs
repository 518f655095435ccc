//! Encoded integers.
//!
//! INTEGER and ENUMERATED values share their content encoding: a
//! variable-length, big-endian, two's complement octet sequence. This crate
//! limits the value range to that of `i64` and fails with an overflow error
//! for anything longer.
//!
//! This is a private module. The element type's accessors are the public
//! way to these functions.

use bytes::Bytes;
use crate::error::Error;
use crate::mode::Mode;


/// Parses the content octets of an INTEGER value.
///
/// The most significant bit of the first octet serves as the sign bit. An
/// encoding where the first nine bits are all zero or all one carries a
/// redundant leading octet; CER and DER forbid such an encoding while BER
/// tolerates it.
pub fn decode(value: &[u8], mode: Mode) -> Result<i64, Error> {
    let mut value = value;
    if value.is_empty() {
        return Err(Error::size("integer encoded on zero octets"))
    }
    while value.len() > 1 && is_redundant(value[0], value[1]) {
        if mode.is_restricted() {
            return Err(Error::padding(
                "redundant leading octet in integer"
            ))
        }
        value = &value[1..];
    }
    if value.len() > 8 {
        return Err(Error::overflow("integer does not fit into 64 bits"))
    }
    let mut res = if value[0] & 0x80 != 0 { -1i64 } else { 0 };
    for &octet in value {
        res = (res << 8) | i64::from(octet);
    }
    Ok(res)
}

/// Returns the content octets encoding the given integer.
///
/// The encoding always uses the minimum number of octets and is therefore
/// valid under all three rule sets.
pub fn encode(value: i64) -> Bytes {
    let octets = value.to_be_bytes();
    let mut start = 0;
    while start < octets.len() - 1
        && is_redundant(octets[start], octets[start + 1])
    {
        start += 1;
    }
    Bytes::copy_from_slice(&octets[start..])
}

/// Returns whether a leading octet is redundant with the following one.
///
/// The first nine bits of a multi-octet integer must not be all zero or
/// all one; otherwise the first octet merely repeats the sign.
fn is_redundant(first: u8, second: u8) -> bool {
    (first == 0x00 && second & 0x80 == 0)
        || (first == 0xFF && second & 0x80 != 0)
}


//============ Tests =========================================================
