//! The length octets.
//!
//! This is a private module. The [`Length`] type defined herein is
//! re-exported by the crate root.

use crate::error::Error;
use crate::mode::Mode;
use crate::source::Source;


//------------ Length --------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length is either definite, providing the actual number of content
/// octets of the value, or indefinite, in which case the content is
/// delimited by a special end-of-contents marker.
///
/// # BER Encoding
///
/// Which of the two basic encodings is used is determined by the most
/// significant bit of the first octet. If it is clear, the remaining bits
/// of this first octet provide the definite length directly. If it is set
/// and the remaining bits are zero, i.e., the octet is 0x80, the length is
/// indefinite. The octet 0xFF is reserved. Otherwise the remaining bits
/// specify the number of following octets that provide the big-endian
/// definite length.
///
/// This crate accepts at most four length octets, i.e., lengths up to
/// 2³² − 1; anything longer is rejected as overflow before any length
/// octet is read. Under CER and DER a definite length must additionally be
/// encoded in the minimum number of octets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    /// A length with the given number of content octets.
    Definite(usize),

    /// A length delimited by an end-of-contents marker.
    Indefinite,
}

impl Length {
    /// The largest number of length octets following the initial one.
    const MAX_MULTI: usize = 4;

    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Parses the length octets from the beginning of a source.
    pub fn take_from(
        source: &mut Source, mode: Mode
    ) -> Result<Self, Error> {
        let start = source.pos();
        let first = source.take_u8()?;
        if first & 0x80 == 0 {
            return Ok(Length::Definite(first as usize))
        }
        if first == 0x80 {
            return Ok(Length::Indefinite)
        }
        if first == 0xFF {
            return Err(
                Error::undefined("reserved length octet 0xFF").at(start)
            )
        }

        let count = (first & 0x7F) as usize;
        if count > Self::MAX_MULTI {
            return Err(Error::overflow(
                "more than four length octets"
            ).at(start))
        }
        if mode.is_restricted() {
            // The second octet can't be zero and, if it is also the last
            // one, can't be below 0x80 either. In both cases there is a
            // shorter encoding.
            let second = source.peek(0)?;
            if second == 0 || (second < 0x80 && count == 1) {
                return Err(Error::padding(
                    "non-minimal length octets"
                ).at(start))
            }
        }
        let mut len = 0usize;
        for _ in 0..count {
            len = (len << 8) | source.take_u8().map_err(|_| {
                Error::truncated("data ends within length octets").at(start)
            })? as usize;
        }
        Ok(Length::Definite(len))
    }

    /// Returns the length of the encoded representation of the length.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Definite(len) => {
                if len <= 0x7F {
                    1
                }
                else {
                    1 + (usize::BITS - len.leading_zeros())
                        .div_ceil(8) as usize
                }
            }
            Length::Indefinite => 1,
        }
    }

    /// Appends the encoded length to the end of `target`.
    ///
    /// Definite lengths are always encoded in the minimum number of octets.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        match self {
            Length::Definite(len) => {
                if len <= 0x7F {
                    target.push(len as u8);
                }
                else {
                    let count = (
                        usize::BITS - len.leading_zeros()
                    ).div_ceil(8) as usize;
                    target.push(0x80 | count as u8);
                    for i in (0..count).rev() {
                        target.push((len >> (8 * i)) as u8);
                    }
                }
            }
            Length::Indefinite => target.push(0x80),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use super::*;

    fn take(slice: &[u8], mode: Mode) -> Result<Length, Error> {
        let mut source = Source::new(slice);
        let res = Length::take_from(&mut source, mode)?;
        assert_eq!(source.remaining(), 0, "trailing data");
        Ok(res)
    }

    #[test]
    fn ber_take_from() {
        assert_eq!(
            take(b"\x00", Mode::Ber).unwrap(), Length::Definite(0)
        );
        assert_eq!(
            take(b"\x12", Mode::Ber).unwrap(), Length::Definite(0x12)
        );
        assert_eq!(
            take(b"\x7F", Mode::Ber).unwrap(), Length::Definite(0x7F)
        );
        assert_eq!(
            take(b"\x80", Mode::Ber).unwrap(), Length::Indefinite
        );
        assert_eq!(
            take(b"\x81\x00", Mode::Ber).unwrap(), Length::Definite(0)
        );
        assert_eq!(
            take(b"\x81\xF0", Mode::Ber).unwrap(), Length::Definite(0xF0)
        );
        assert_eq!(
            take(b"\x82\x00\x0E", Mode::Ber).unwrap(), Length::Definite(0x0E)
        );
        assert_eq!(
            take(b"\x84\xF0\x00\x00\x01", Mode::Ber).unwrap(),
            Length::Definite(0xF000_0001)
        );
    }

    #[test]
    fn der_take_from() {
        assert_eq!(
            take(b"\x7F", Mode::Der).unwrap(), Length::Definite(0x7F)
        );
        assert_eq!(
            take(b"\x81\x80", Mode::Der).unwrap(), Length::Definite(0x80)
        );
        assert_eq!(
            take(b"\x82\xF0\x0E", Mode::Der).unwrap(),
            Length::Definite(0xF00E)
        );
        assert_eq!(
            take(b"\x81\x00", Mode::Der).unwrap_err().kind(),
            ErrorKind::Padding
        );
        assert_eq!(
            take(b"\x81\x7F", Mode::Der).unwrap_err().kind(),
            ErrorKind::Padding
        );
        assert_eq!(
            take(b"\x82\x00\x0E", Mode::Cer).unwrap_err().kind(),
            ErrorKind::Padding
        );
    }

    #[test]
    fn take_from_errors() {
        assert_eq!(
            take(b"\xFF", Mode::Ber).unwrap_err().kind(),
            ErrorKind::Undefined
        );
        // Five length octets announced.
        assert_eq!(
            take(b"\x85\x01\x01\x01\x01\x01", Mode::Ber).unwrap_err().kind(),
            ErrorKind::Overflow
        );
        // Data ends within the length octets.
        assert_eq!(
            take(b"\x82\x01", Mode::Ber).unwrap_err().kind(),
            ErrorKind::Truncated
        );
        assert_eq!(
            take(b"", Mode::Ber).unwrap_err().kind(),
            ErrorKind::Truncated
        );
    }

    #[test]
    fn encode() {
        fn step(length: Length, expected: &[u8]) {
            let mut buf = Vec::new();
            length.append_encoded(&mut buf);
            assert_eq!(buf.as_slice(), expected, "encode failed {length:?}");
            assert_eq!(buf.len(), length.encoded_len());
        }

        step(Length::Indefinite, b"\x80");
        step(Length::Definite(0), b"\x00");
        step(Length::Definite(0x12), b"\x12");
        step(Length::Definite(0x7F), b"\x7F");
        step(Length::Definite(0x80), b"\x81\x80");
        step(Length::Definite(0xDEAD), b"\x82\xDE\xAD");
        step(Length::Definite(0x0100_0000), b"\x84\x01\x00\x00\x00");
    }
}
