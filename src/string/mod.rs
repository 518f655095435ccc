//! The various string types of ASN.1.
//!
//! ASN.1 has a bit of a selection of string types. They can be separated
//! into two categories: those that contain binary data, i.e., the bit
//! string and the octet string, and those that contain, indeed, a string of
//! characters from some character set.

pub use self::bit::BitString;
pub use self::restricted::{
    BmpCharSet, CharSet, GeneralCharSet, GraphicCharSet, Ia5CharSet,
    NumericCharSet, PrintableCharSet, UniversalCharSet, Utf8CharSet,
    VisibleCharSet,
};

mod bit;
mod restricted;
