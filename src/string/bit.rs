//! Encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use bytes::Bytes;
use crate::error::Error;
use crate::mode::Mode;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike octet strings, they do not
/// need to contain a multiple of eight bits.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that
/// there may be unused bits in the final octet.
///
/// # BER Encoding
///
/// In the primitive encoding, the first content octet gives the number of
/// unused bits in the last content octet and the following octets contain
/// the bits with the first bit in the most significant bit of the octet.
/// An empty bit string is encoded with a single content octet of zero.
///
/// In the constructed encoding, the bit string is represented as a
/// sequence of bit strings which in turn may either be constructed or
/// primitive. Only the last fragment may have a non-zero number of unused
/// bits; every other fragment's content must be byte-aligned. BER lets the
/// sender choose either form; CER demands the constructed form for values
/// longer than 1000 octets; DER permits only the primitive form. The
/// element type takes care of these rules; this type only deals with the
/// primitive content.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last octet.
    unused: u8,

    /// The octets of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Fails if `unused` is larger than 7 or if it is non-zero for an
    /// empty bit sequence.
    pub fn new(unused: u8, bits: Bytes) -> Result<Self, Error> {
        if unused > 7 {
            return Err(Error::generic(
                "more than 7 unused bits in bit string"
            ))
        }
        if bits.is_empty() && unused != 0 {
            return Err(Error::generic(
                "unused bits in empty bit string"
            ))
        }
        Ok(BitString { unused, bits })
    }

    /// Creates a new, empty bit string.
    pub fn empty() -> Self {
        BitString { unused: 0, bits: Bytes::new() }
    }

    /// Returns the value of the given bit.
    ///
    /// Bits past the end of the string are reported as unset.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        let idx = bit >> 3;
        let mask = 0x80 >> (bit & 7);
        self.bits[idx] & mask != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - (self.unused as usize)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets of the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }
}

/// # Decoding and Encoding
impl BitString {
    /// Parses the primitive content octets of a bit string value.
    ///
    /// Under CER and DER the unused bits of the last octet have to be
    /// zero; BER tolerates any value in them.
    pub fn from_content(value: &[u8], mode: Mode) -> Result<Self, Error> {
        let Some((&unused, bits)) = value.split_first() else {
            return Err(Error::size("bit string encoded on zero octets"))
        };
        if unused > 7 {
            return Err(Error::generic(
                "more than 7 unused bits in bit string"
            ))
        }
        if bits.is_empty() && unused != 0 {
            return Err(Error::generic(
                "unused bits in empty bit string"
            ))
        }
        if mode.is_restricted() && unused > 0 {
            let last = bits[bits.len() - 1];
            if last & ((1 << unused) - 1) != 0 {
                return Err(Error::padding(
                    "non-zero unused bits in bit string"
                ))
            }
        }
        Ok(BitString {
            unused,
            bits: Bytes::copy_from_slice(bits),
        })
    }

    /// Returns the primitive content octets encoding the bit string.
    pub fn to_content(&self) -> Bytes {
        let mut res = Vec::with_capacity(self.bits.len() + 1);
        res.push(self.unused);
        res.extend_from_slice(&self.bits);
        Bytes::from(res)
    }
}


//============ Tests =========================================================
