//! The identifier octets of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the crate
//! root.

use std::fmt;
use crate::error::Error;
use crate::source::Source;


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// Bits 8 and 7 of the first identifier octet select one of four tag
/// classes. See clause 8.1.2.2 of ITU-T recommendation X.690.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// The universal class of the types defined in X.680 itself.
    Universal,

    /// The application class.
    Application,

    /// The context-specific class.
    Context,

    /// The private class.
    Private,
}

impl Class {
    /// Returns the class encoded in the given first identifier octet.
    pub const fn from_u8(octet: u8) -> Self {
        match octet >> 6 {
            0b00 => Self::Universal,
            0b01 => Self::Application,
            0b10 => Self::Context,
            _ => Self::Private,
        }
    }

    /// Returns the class as the top two bits of an identifier octet.
    pub const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//------------ Tag -----------------------------------------------------------

/// The tag of an encoded value.
///
/// In ASN.1, tags identify the type of a value. A tag consists of one of
/// four classes, represented by the [`Class`] enum, and a number within that
/// class. In the encoding, the tag is combined with a bit indicating whether
/// the value is primitive or constructed to form the identifier octets. The
/// `Tag` type represents only the tag itself; construction is tracked
/// separately by the element.
///
/// # Limitations
///
/// Tag numbers have to fit into a `u32`. Encodings with larger numbers are
/// rejected with an overflow error. This should be more than enough in
/// practice.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    /// The class of the tag.
    class: Class,

    /// The number of the tag.
    number: u32,
}

/// # Constants for Universal Tags
///
/// See clause 8.4 of ITU-T recommendation X.690.
impl Tag {
    /// The tag marking the end-of-contents in an indefinite length value.
    ///
    /// This is UNIVERSAL 0.
    pub const END_OF_CONTENTS: Self = Self::universal(0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the ObjectDescriptor type, UNIVERSAL 7.
    pub const OBJECT_DESCRIPTOR: Self = Self::universal(7);

    /// The tag for the EXTERNAL and Instance-of types, UNIVERSAL 8.
    pub const EXTERNAL: Self = Self::universal(8);

    /// The tag for the REAL type, UNIVERSAL 9.
    pub const REAL: Self = Self::universal(9);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::universal(10);

    /// The tag for the EMBEDDED PDV type, UNIVERSAL 11.
    pub const EMBEDDED_PDV: Self = Self::universal(11);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the RELATIVE-OID type, UNIVERSAL 13.
    pub const RELATIVE_OID: Self = Self::universal(13);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::universal(18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::universal(19);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Self::universal(20);

    /// The tag for the VideotexString type, UNIVERSAL 21.
    pub const VIDEOTEX_STRING: Self = Self::universal(21);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::universal(23);

    /// The tag for the GeneralizedTime type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::universal(24);

    /// The tag for the GraphicString type, UNIVERSAL 25.
    pub const GRAPHIC_STRING: Self = Self::universal(25);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::universal(26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Self::universal(27);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Self::universal(28);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Self::universal(30);
}

impl Tag {
    /// The largest tag number encodable in the short form.
    const MAX_SHORT_FORM: u32 = 30;

    /// Creates a new tag from a class and a number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in the universal class with the given number.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in the context-specific class with the given
    /// number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in the private class with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag is of the universal class.
    pub fn is_universal(self) -> bool {
        matches!(self.class, Class::Universal)
    }
}

/// # Decoding and Encoding
impl Tag {
    /// Takes the identifier octets from the beginning of a source.
    ///
    /// Upon success, returns both the tag and whether the value is
    /// constructed.
    ///
    /// Tag numbers up to 30 have to use the short form, larger numbers the
    /// long form with base 128 continuation octets. A long form starting
    /// with the padding octet 0x80 or resolving to a number that should
    /// have used the short form is rejected as padding; a number that does
    /// not fit into 32 bits is rejected as overflow.
    pub fn take_from(source: &mut Source) -> Result<(Self, bool), Error> {
        let start = source.pos();
        let first = source.take_u8()?;
        let class = Class::from_u8(first);
        let constructed = first & 0x20 != 0;
        if first & 0x1F != 0x1F {
            return Ok((
                Tag::new(class, u32::from(first & 0x1F)), constructed
            ))
        }

        // Long form. The number is in base 128, big-endian, with bit 8 of
        // every octet but the last set.
        let mut number = 0u32;
        let mut index = 0;
        loop {
            let octet = source.take_u8().map_err(|_| {
                Error::truncated(
                    "data ends within a long form tag number"
                ).at(start)
            })?;
            if index == 0 && octet == 0x80 {
                return Err(Error::padding(
                    "leading zero octet in long form tag number"
                ).at(start))
            }
            if number & 0xFE00_0000 != 0 {
                return Err(Error::overflow(
                    "tag number does not fit into 32 bits"
                ).at(start))
            }
            number = (number << 7) | u32::from(octet & 0x7F);
            if octet & 0x80 == 0 {
                break
            }
            index += 1;
        }
        if number <= Self::MAX_SHORT_FORM {
            return Err(Error::padding(
                "long form used for short form tag number"
            ).at(start))
        }
        Ok((Tag::new(class, number), constructed))
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if self.number <= Self::MAX_SHORT_FORM {
            1
        }
        else {
            // One leading octet plus one octet per seven bits of number.
            let bits = 32 - self.number.leading_zeros() as usize;
            1 + bits.div_ceil(7)
        }
    }

    /// Appends the identifier octets to the end of `target`.
    ///
    /// If `constructed` is true, the encoded octets will signal a value in
    /// constructed encoding and primitive encoding otherwise.
    pub fn append_encoded(self, constructed: bool, target: &mut Vec<u8>) {
        let mut first = self.class.into_u8();
        if constructed {
            first |= 0x20;
        }
        if self.number <= Self::MAX_SHORT_FORM {
            target.push(first | self.number as u8);
            return
        }
        target.push(first | 0x1F);
        let count = self.encoded_len() - 2;
        for i in (0..=count).rev() {
            let mut octet = ((self.number >> (7 * i)) & 0x7F) as u8;
            if i > 0 {
                octet |= 0x80;
            }
            target.push(octet);
        }
    }
}


//--- Display and Debug

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::END_OF_CONTENTS => write!(f, "END-OF-CONTENTS"),
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::OBJECT_DESCRIPTOR => write!(f, "ObjectDescriptor"),
            Tag::EXTERNAL => write!(f, "EXTERNAL"),
            Tag::REAL => write!(f, "REAL"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::EMBEDDED_PDV => write!(f, "EMBEDDED PDV"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::RELATIVE_OID => write!(f, "RELATIVE-OID"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::NUMERIC_STRING => write!(f, "NumericString"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::TELETEX_STRING => write!(f, "TeletexString"),
            Tag::VIDEOTEX_STRING => write!(f, "VideotexString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::GRAPHIC_STRING => write!(f, "GraphicString"),
            Tag::VISIBLE_STRING => write!(f, "VisibleString"),
            Tag::GENERAL_STRING => write!(f, "GeneralString"),
            Tag::UNIVERSAL_STRING => write!(f, "UniversalString"),
            Tag::BMP_STRING => write!(f, "BMPString"),
            tag => {
                match tag.class {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number)
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use super::*;

    fn take(slice: &[u8]) -> Result<(Tag, bool, usize), Error> {
        let mut source = Source::new(slice);
        let (tag, constructed) = Tag::take_from(&mut source)?;
        Ok((tag, constructed, source.pos()))
    }

    fn roundtrip(tag: Tag, constructed: bool) {
        let mut buf = Vec::new();
        tag.append_encoded(constructed, &mut buf);
        assert_eq!(buf.len(), tag.encoded_len());
        assert_eq!(take(&buf).unwrap(), (tag, constructed, buf.len()));
    }

    #[test]
    fn short_form() {
        assert_eq!(
            take(b"\x02\x01").unwrap(),
            (Tag::INTEGER, false, 1)
        );
        assert_eq!(
            take(b"\x30").unwrap(),
            (Tag::SEQUENCE, true, 1)
        );
        assert_eq!(
            take(b"\xDE").unwrap(),
            (Tag::private(30), false, 1)
        );
        for number in [0, 1, 17, 30] {
            roundtrip(Tag::universal(number), false);
            roundtrip(Tag::ctx(number), true);
        }
    }

    #[test]
    fn long_form() {
        // 2 continuation octets: 0x1F 0x87 0x67 is tag number 999.
        assert_eq!(
            take(b"\x1F\x87\x67").unwrap(),
            (Tag::universal(999), false, 3)
        );
        // Application class, constructed.
        assert_eq!(
            take(b"\x7F\x81\x00").unwrap(),
            (Tag::application(128), true, 3)
        );
        for number in [31, 127, 128, 999, 0x3FFF, 0x1F_FFFF, u32::MAX] {
            roundtrip(Tag::universal(number), false);
            roundtrip(Tag::application(number), true);
        }
    }

    #[test]
    fn long_form_errors() {
        // Leading padding octet.
        assert_eq!(
            take(b"\x1F\x80\x01").unwrap_err().kind(),
            ErrorKind::Padding
        );
        // Long form for a number that fits the short form.
        assert_eq!(
            take(b"\x1F\x1E").unwrap_err().kind(),
            ErrorKind::Padding
        );
        // Number does not fit into 32 bits.
        assert_eq!(
            take(b"\x1F\x90\x80\x80\x80\x00").unwrap_err().kind(),
            ErrorKind::Overflow
        );
        assert_eq!(
            take(b"\x1F\x81\x80\x80\x80\x80\x00").unwrap_err().kind(),
            ErrorKind::Overflow
        );
        // Data ends inside the tag number.
        assert_eq!(
            take(b"\x1F\x87").unwrap_err().kind(),
            ErrorKind::Truncated
        );
        assert_eq!(
            take(b"\x1F").unwrap_err().kind(),
            ErrorKind::Truncated
        );
    }

    #[test]
    fn display() {
        assert_eq!(Tag::BOOLEAN.to_string(), "BOOLEAN");
        assert_eq!(Tag::ctx(4).to_string(), "[4]");
        assert_eq!(Tag::application(77).to_string(), "[APPLICATION 77]");
    }
}
