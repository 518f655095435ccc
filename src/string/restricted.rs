//! Restricted character string types.
//!
//! Restricted character strings are sequences of characters from a
//! specific character set mapped into a sequence of octets. They share
//! their framing with the octet string and differ only in the permitted
//! octet sequences. This module provides the [`CharSet`] trait describing
//! one character set and marker types implementing it for each of the
//! string types this crate supports.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::borrow::Cow;
use crate::error::Error;
use crate::tag::Tag;


//------------ CharSet -------------------------------------------------------

/// The character set of a restricted character string type.
///
/// The trait only includes associated functions and can thus be implemented
/// for marker types. Its main purpose is to take an iterator over `u8`s and
/// produce `char`s or errors; this happens in [`next_char`][Self::next_char].
pub trait CharSet {
    /// The natural tag of the related restricted character string type.
    const TAG: Tag;

    /// Returns the next character from an octet sequence.
    ///
    /// Returns `Ok(None)` at the end of the sequence, a characters error
    /// for octets outside the set, and a size error for a sequence that
    /// ends in the middle of a multi-octet character.
    fn next_char<I: Iterator<Item = u8>>(
        iter: &mut I
    ) -> Result<Option<char>, Error>;

    /// Converts a `str` into an octet sequence.
    ///
    /// If the string's own representation is identical to the encoded
    /// sequence, it is returned as `Cow::Borrowed`; otherwise a fresh
    /// vector is produced. Characters that cannot be represented in the
    /// set cause a characters error.
    fn from_str(s: &str) -> Result<Cow<'_, [u8]>, Error>;

    /// Checks whether a sequence of octets is a valid string.
    fn check<I: Iterator<Item = u8>>(iter: &mut I) -> Result<(), Error> {
        while Self::next_char(iter)?.is_some() { }
        Ok(())
    }

    /// Decodes a sequence of octets into a string.
    fn decode(slice: &[u8]) -> Result<String, Error> {
        let mut res = String::with_capacity(slice.len());
        let mut iter = slice.iter().copied();
        while let Some(ch) = Self::next_char(&mut iter)? {
            res.push(ch);
        }
        Ok(res)
    }
}

/// Produces `next_char` for a set defined by a predicate over one octet.
macro_rules! single_octet_next_char {
    ( $check:expr, $msg:literal ) => {
        fn next_char<I: Iterator<Item = u8>>(
            iter: &mut I
        ) -> Result<Option<char>, Error> {
            match iter.next() {
                Some(ch) if $check(ch) => Ok(Some(ch.into())),
                Some(_) => Err(Error::characters($msg)),
                None => Ok(None),
            }
        }
    }
}

/// Produces `from_str` for a set that is a subset of ASCII.
macro_rules! ascii_subset_from_str {
    ( $check:expr, $msg:literal ) => {
        fn from_str(s: &str) -> Result<Cow<'_, [u8]>, Error> {
            if s.bytes().all($check) {
                Ok(Cow::Borrowed(s.as_bytes()))
            }
            else {
                Err(Error::characters($msg))
            }
        }
    }
}


//------------ Utf8CharSet ---------------------------------------------------

/// The character set for the UTF8String type.
///
/// Any valid UTF-8 sequence is allowed; the octets are the string's own
/// representation.
#[derive(Clone, Copy, Debug)]
pub struct Utf8CharSet;

impl CharSet for Utf8CharSet {
    const TAG: Tag = Tag::UTF8_STRING;

    fn next_char<I: Iterator<Item = u8>>(
        iter: &mut I
    ) -> Result<Option<char>, Error> {
        let Some(first) = iter.next() else {
            return Ok(None)
        };
        let (len, mut acc) = if first & 0x80 == 0 {
            return Ok(Some(first.into()))
        }
        else if first & 0xE0 == 0xC0 {
            (1, u32::from(first & 0x1F))
        }
        else if first & 0xF0 == 0xE0 {
            (2, u32::from(first & 0x0F))
        }
        else if first & 0xF8 == 0xF0 {
            (3, u32::from(first & 0x07))
        }
        else {
            return Err(Error::characters("invalid UTF-8 sequence"))
        };
        for _ in 0..len {
            let Some(octet) = iter.next() else {
                return Err(Error::size("incomplete UTF-8 sequence"))
            };
            if octet & 0xC0 != 0x80 {
                return Err(Error::characters("invalid UTF-8 sequence"))
            }
            acc = (acc << 6) | u32::from(octet & 0x3F);
        }
        // Reject overlong forms and surrogate values by round-tripping
        // through the char conversion with a minimum-value check.
        let min = match len {
            1 => 0x80,
            2 => 0x800,
            _ => 0x10000,
        };
        if acc < min {
            return Err(Error::characters("overlong UTF-8 sequence"))
        }
        char::from_u32(acc)
            .map(Some)
            .ok_or_else(|| Error::characters("invalid UTF-8 sequence"))
    }

    fn from_str(s: &str) -> Result<Cow<'_, [u8]>, Error> {
        Ok(Cow::Borrowed(s.as_bytes()))
    }
}


//------------ NumericCharSet ------------------------------------------------

/// The character set for the NumericString type.
///
/// Allows the decimal digits `0` to `9` and the space character, encoded
/// with their ASCII value.
#[derive(Clone, Copy, Debug)]
pub struct NumericCharSet;

impl NumericCharSet {
    fn contains(ch: u8) -> bool {
        ch == b' ' || ch.is_ascii_digit()
    }
}

impl CharSet for NumericCharSet {
    const TAG: Tag = Tag::NUMERIC_STRING;

    single_octet_next_char!(
        Self::contains, "illegal character for NumericString"
    );
    ascii_subset_from_str!(
        Self::contains, "illegal character for NumericString"
    );
}


//------------ PrintableCharSet ----------------------------------------------

/// The character set for the PrintableString type.
///
/// Allows the following characters from the ASCII character set, encoded
/// with their ASCII value:
///
/// * the letters `A` to `Z` and `a` to `z`,
/// * the digits `0` to `9`,
/// * the space character,
/// * the symbols `'`, `(`, `)`, `+`, `,`, `-`, `.`, `/`, `:`, `=`, and `?`.
///
/// Note that `*` and `@` are not part of the set.
#[derive(Clone, Copy, Debug)]
pub struct PrintableCharSet;

impl PrintableCharSet {
    fn contains(ch: u8) -> bool {
        ch.is_ascii_alphanumeric()
            || ch == b' ' || ch == b'\'' || ch == b'(' || ch == b')'
            || ch == b'+' || ch == b',' || ch == b'-' || ch == b'.'
            || ch == b'/' || ch == b':' || ch == b'=' || ch == b'?'
    }
}

impl CharSet for PrintableCharSet {
    const TAG: Tag = Tag::PRINTABLE_STRING;

    single_octet_next_char!(
        Self::contains, "illegal character for PrintableString"
    );
    ascii_subset_from_str!(
        Self::contains, "illegal character for PrintableString"
    );
}


//------------ Ia5CharSet ----------------------------------------------------

/// The character set for the IA5String type.
///
/// International Alphabet 5 is identical to the full seven-bit ASCII
/// character set, control characters included.
#[derive(Clone, Copy, Debug)]
pub struct Ia5CharSet;

impl Ia5CharSet {
    fn contains(ch: u8) -> bool {
        ch.is_ascii()
    }
}

impl CharSet for Ia5CharSet {
    const TAG: Tag = Tag::IA5_STRING;

    single_octet_next_char!(
        Self::contains, "illegal character for IA5String"
    );
    ascii_subset_from_str!(
        Self::contains, "illegal character for IA5String"
    );
}


//------------ VisibleCharSet ------------------------------------------------

/// The character set for the VisibleString type.
///
/// Allows the printable ASCII characters, i.e., octets 0x20 through 0x7E.
#[derive(Clone, Copy, Debug)]
pub struct VisibleCharSet;

impl VisibleCharSet {
    fn contains(ch: u8) -> bool {
        (0x20..=0x7E).contains(&ch)
    }
}

impl CharSet for VisibleCharSet {
    const TAG: Tag = Tag::VISIBLE_STRING;

    single_octet_next_char!(
        Self::contains, "illegal character for VisibleString"
    );
    ascii_subset_from_str!(
        Self::contains, "illegal character for VisibleString"
    );
}


//------------ GraphicCharSet ------------------------------------------------

/// The character set for the GraphicString and ObjectDescriptor types.
///
/// Treated as the printable ASCII characters, octets 0x20 through 0x7E.
#[derive(Clone, Copy, Debug)]
pub struct GraphicCharSet;

impl CharSet for GraphicCharSet {
    const TAG: Tag = Tag::GRAPHIC_STRING;

    single_octet_next_char!(
        VisibleCharSet::contains, "illegal character for GraphicString"
    );
    ascii_subset_from_str!(
        VisibleCharSet::contains, "illegal character for GraphicString"
    );
}


//------------ GeneralCharSet ------------------------------------------------

/// The character set for the GeneralString type.
///
/// GeneralString officially permits whole character set escapes which
/// nobody uses. This implementation restricts the type to seven-bit ASCII
/// in both directions.
#[derive(Clone, Copy, Debug)]
pub struct GeneralCharSet;

impl CharSet for GeneralCharSet {
    const TAG: Tag = Tag::GENERAL_STRING;

    single_octet_next_char!(
        Ia5CharSet::contains, "illegal character for GeneralString"
    );
    ascii_subset_from_str!(
        Ia5CharSet::contains, "illegal character for GeneralString"
    );
}


//------------ UniversalCharSet ----------------------------------------------

/// The character set for the UniversalString type.
///
/// Characters are encoded in UTF-32BE, i.e., four octets per character,
/// and may come from all of Unicode.
#[derive(Clone, Copy, Debug)]
pub struct UniversalCharSet;

impl CharSet for UniversalCharSet {
    const TAG: Tag = Tag::UNIVERSAL_STRING;

    fn next_char<I: Iterator<Item = u8>>(
        iter: &mut I
    ) -> Result<Option<char>, Error> {
        let Some(first) = iter.next() else {
            return Ok(None)
        };
        let mut acc = u32::from(first);
        for _ in 0..3 {
            let Some(octet) = iter.next() else {
                return Err(Error::size(
                    "UniversalString content not a multiple of 4 octets"
                ))
            };
            acc = (acc << 8) | u32::from(octet);
        }
        char::from_u32(acc).map(Some).ok_or_else(|| {
            Error::characters("illegal code point in UniversalString")
        })
    }

    fn from_str(s: &str) -> Result<Cow<'_, [u8]>, Error> {
        let mut res = Vec::with_capacity(s.chars().count() * 4);
        for ch in s.chars() {
            res.extend_from_slice(&u32::from(ch).to_be_bytes());
        }
        Ok(Cow::Owned(res))
    }
}


//------------ BmpCharSet ----------------------------------------------------

/// The character set for the BMPString type.
///
/// Characters are encoded in UTF-16BE with two octets per character, which
/// limits the type to the Basic Multilingual Plane. Surrogate values are
/// rejected in both directions.
#[derive(Clone, Copy, Debug)]
pub struct BmpCharSet;

impl CharSet for BmpCharSet {
    const TAG: Tag = Tag::BMP_STRING;

    fn next_char<I: Iterator<Item = u8>>(
        iter: &mut I
    ) -> Result<Option<char>, Error> {
        let Some(first) = iter.next() else {
            return Ok(None)
        };
        let Some(second) = iter.next() else {
            return Err(Error::size(
                "BMPString content not a multiple of 2 octets"
            ))
        };
        let acc = (u32::from(first) << 8) | u32::from(second);
        char::from_u32(acc).map(Some).ok_or_else(|| {
            Error::characters("surrogate code unit in BMPString")
        })
    }

    fn from_str(s: &str) -> Result<Cow<'_, [u8]>, Error> {
        let mut res = Vec::with_capacity(s.chars().count() * 2);
        for ch in s.chars() {
            let value = u32::from(ch);
            if value > 0xFFFF {
                return Err(Error::characters(
                    "character outside the Basic Multilingual Plane"
                ))
            }
            res.extend_from_slice(&(value as u16).to_be_bytes());
        }
        Ok(Cow::Owned(res))
    }
}


//============ Tests =========================================================
