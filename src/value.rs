//! Native values with a default universal type.
//!
//! This is a private module. Its public items are re-exported by the crate
//! root.

use bytes::Bytes;
use crate::element::Element;
use crate::oid::Oid;
use crate::time::GeneralizedTime;


//------------ Value ---------------------------------------------------------

/// A native value together with its default universal type.
///
/// Every variant corresponds to the universal ASN.1 type that a value of
/// its shape encodes as when no explicit tag is chosen: booleans become
/// BOOLEAN, integers INTEGER, floating point numbers REAL, strings
/// UTF8String, byte buffers OCTET STRING, ordered collections SEQUENCE,
/// set collections SET, timestamps GeneralizedTime, and object identifiers
/// OBJECT IDENTIFIER.
///
/// [`Element::from_value`] encodes a value into a fresh element with the
/// matching universal tag; [`Element::to_value`] goes the other way for
/// elements whose universal tag has a variant here.
#[derive(Clone, Debug)]
pub enum Value {
    /// A BOOLEAN value.
    Boolean(bool),

    /// An INTEGER value.
    Integer(i64),

    /// A REAL value.
    Real(f64),

    /// A UTF8String value.
    Utf8(String),

    /// A NULL value.
    Null,

    /// An OCTET STRING value.
    Octets(Bytes),

    /// A SEQUENCE of elements.
    Sequence(Vec<Element>),

    /// A SET of elements.
    Set(Vec<Element>),

    /// A GeneralizedTime value.
    Time(GeneralizedTime),

    /// An OBJECT IDENTIFIER value.
    Oid(Oid),
}


//--- From

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Utf8(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Utf8(value.into())
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Octets(value)
    }
}

impl From<GeneralizedTime> for Value {
    fn from(value: GeneralizedTime) -> Self {
        Value::Time(value)
    }
}

impl From<Oid> for Value {
    fn from(value: Oid) -> Self {
        Value::Oid(value)
    }
}
