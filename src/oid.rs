//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object
//! identifiers, a construct used by ASN.1 to uniquely identify all sorts of
//! things. The type is also re-exported at the crate root.

use std::{fmt, str};
use bytes::Bytes;
use smallvec::SmallVec;
use crate::error::Error;


//------------ Oid -----------------------------------------------------------

/// An object identifier.
///
/// Object identifiers are globally unique, hierarchical values that are
/// used to identify objects or their type. When written, they are presented
/// as a sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’.
///
/// Values of this type keep the sequence of component integers, called
/// arcs. The first arc must be 0, 1, or 2 and, if it is 0 or 1, the second
/// arc must be less than 40, a consequence of the two of them sharing the
/// first octet of the encoded form. Arcs are limited to the range of a
/// `u32`; encodings with larger arcs are rejected as overflow.
///
/// The `Display` implementation produces the dot notation and `FromStr`
/// parses it back.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Oid {
    /// The arcs of the identifier.
    ///
    /// Holds at least two elements. Most real-world identifiers have no
    /// more than a handful, hence the inline capacity.
    arcs: SmallVec<[u32; 7]>,
}

impl Oid {
    /// Creates an object identifier from its arcs.
    ///
    /// Returns an error if fewer than two arcs are given or if the leading
    /// arcs violate their range restrictions.
    pub fn new(
        arcs: impl IntoIterator<Item = u32>
    ) -> Result<Self, Error> {
        let arcs = SmallVec::from_iter(arcs);
        if arcs.len() < 2 {
            return Err(Error::generic(
                "object identifier with fewer than two arcs"
            ))
        }
        if arcs[0] > 2 {
            return Err(Error::generic(
                "first arc of object identifier must be 0, 1, or 2"
            ))
        }
        if arcs[0] < 2 && arcs[1] >= 40 {
            return Err(Error::generic(
                "second arc of object identifier must be less than 40"
            ))
        }
        Ok(Oid { arcs })
    }

    /// Returns the arcs of the identifier.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }
}

/// # Decoding and Encoding
impl Oid {
    /// Parses the content octets of an OBJECT IDENTIFIER value.
    ///
    /// The content is a sequence of base 128 sub-identifiers with bit 8 of
    /// every octet but the last of each sub-identifier set. The first
    /// sub-identifier packs the first two arcs as 40 · arc₁ + arc₂.
    pub fn from_content(value: &[u8]) -> Result<Self, Error> {
        if value.is_empty() {
            return Err(Error::size(
                "object identifier encoded on zero octets"
            ))
        }
        let mut arcs: SmallVec<[u32; 7]> = SmallVec::new();
        let mut cursor = value;
        let first = take_subidentifier(&mut cursor)?;
        if first < 40 {
            arcs.push(0);
            arcs.push(first);
        }
        else if first < 80 {
            arcs.push(1);
            arcs.push(first - 40);
        }
        else {
            arcs.push(2);
            arcs.push(first - 80);
        }
        while !cursor.is_empty() {
            arcs.push(take_subidentifier(&mut cursor)?);
        }
        Ok(Oid { arcs })
    }

    /// Returns the content octets encoding the identifier.
    ///
    /// The arc restrictions are enforced on construction, so this cannot
    /// fail.
    pub fn to_content(&self) -> Bytes {
        let mut res = Vec::with_capacity(self.arcs.len() + 4);
        let first = u64::from(self.arcs[0]) * 40 + u64::from(self.arcs[1]);
        append_subidentifier(first, &mut res);
        for &arc in &self.arcs[2..] {
            append_subidentifier(u64::from(arc), &mut res);
        }
        Bytes::from(res)
    }
}

/// Takes one base 128 sub-identifier from the front of `cursor`.
fn take_subidentifier(cursor: &mut &[u8]) -> Result<u32, Error> {
    if cursor[0] == 0x80 {
        return Err(Error::padding(
            "leading zero octet in object identifier component"
        ))
    }
    let mut res = 0u32;
    loop {
        let Some((&octet, rest)) = cursor.split_first() else {
            return Err(Error::truncated(
                "object identifier ends within a component"
            ))
        };
        *cursor = rest;
        if res & 0xFE00_0000 != 0 {
            return Err(Error::overflow(
                "object identifier component does not fit into 32 bits"
            ))
        }
        res = (res << 7) | u32::from(octet & 0x7F);
        if octet & 0x80 == 0 {
            return Ok(res)
        }
    }
}

/// Appends one sub-identifier in base 128 to `target`.
fn append_subidentifier(value: u64, target: &mut Vec<u8>) {
    let count = if value == 0 {
        0
    }
    else {
        (63 - value.leading_zeros() as usize) / 7
    };
    for i in (0..=count).rev() {
        let mut octet = ((value >> (7 * i)) & 0x7F) as u8;
        if i > 0 {
            octet |= 0x80;
        }
        target.push(octet);
    }
}


//--- Display and FromStr

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{}", first)?;
        }
        for arc in arcs {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}

impl str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut arcs: SmallVec<[u32; 7]> = SmallVec::new();
        for part in s.split('.') {
            arcs.push(part.parse::<u32>().map_err(|_| {
                Error::characters("malformed object identifier notation")
            })?);
        }
        Self::new(arcs)
    }
}


//============ Tests =========================================================
