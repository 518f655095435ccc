//! Handling of data in the X.690 transfer syntaxes.
//!
//! This crate allows decoding and encoding of ASN.1 data in the _Basic
//! Encoding Rules_ as defined in ITU-T recommendation X.690 as well as
//! their stricter companions _Canonical Encoding Rules_ and _Distinguished
//! Encoding Rules._
//!
//! The central type of the crate is [`Element`], a carrier for one encoded
//! value of any type. It keeps the tag, the construction, and the raw
//! content octets, and provides typed accessors and setters for the
//! universal ASN.1 types: booleans, integers, reals, the various string
//! types, object identifiers, times, and the constructed SEQUENCE and SET.
//! Which of the three rule sets applies is chosen by a [`Mode`] value when
//! an element is created or parsed.
//!
//! Parsing starts from a byte buffer via [`Element::from_bytes`]; encoding
//! produces one via [`Element::to_bytes`]. The crate performs no I/O of its
//! own and keeps no state beyond the individual elements.
//!
//! A few helper types round off the picture: [`Tag`] and [`Class`] describe
//! the identifier octets, [`Oid`] object identifiers, [`BitString`] bit
//! strings, and [`UtcTime`] and [`GeneralizedTime`] the two time types.
//! All failures are reported through [`Error`], which carries one of the
//! [`ErrorKind`] categories for callers that need to tell truncated input
//! from, say, a character set violation.

//--- Re-exports

pub use self::element::{Element, NESTING_LIMIT};
pub use self::error::{Error, ErrorKind};
pub use self::length::Length;
pub use self::mode::{LengthPreference, Mode};
pub use self::oid::Oid;
pub use self::string::BitString;
pub use self::tag::{Class, Tag};
pub use self::time::{GeneralizedTime, UtcTime};
pub use self::value::Value;


//--- Public modules

pub mod element;
pub mod oid;
pub mod string;
pub mod time;


//--- Private modules

mod error;
mod int;
mod length;
mod mode;
mod real;
mod source;
mod tag;
mod value;
