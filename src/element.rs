//! The polymorphic element.
//!
//! This module provides [`Element`], the carrier for one encoded value of
//! any type. An element keeps the tag, the construction bit, and the raw
//! content octets, plus the [`Mode`] it is to be interpreted under. Typed
//! accessors interpret the content octets as a value of one of the
//! universal types; typed setters install freshly encoded content octets.
//!
//! Reading an element from a byte buffer only parses the framing. The
//! content of constructed values is parsed lazily when one of the
//! accessors is invoked, and the child elements handed out then are
//! independent copies: changing them does not write through to the
//! parent.

use std::io;
use bytes::{Bytes, BytesMut};
use crate::error::Error;
use crate::int;
use crate::length::Length;
use crate::mode::{LengthPreference, Mode};
use crate::oid::Oid;
use crate::real;
use crate::source::Source;
use crate::string::{
    BitString, BmpCharSet, CharSet, GeneralCharSet, GraphicCharSet,
    Ia5CharSet, NumericCharSet, PrintableCharSet, UniversalCharSet,
    Utf8CharSet, VisibleCharSet,
};
use crate::tag::Tag;
use crate::time::{GeneralizedTime, UtcTime};
use crate::value::Value;


//------------ Configuration -------------------------------------------------

/// The maximum depth of nested constructed encodings.
///
/// Both the scan for the end-of-contents marker of indefinite length
/// values and the reassembly of constructed strings recurse into nested
/// values. This limit bounds stack and heap use on hostile input.
pub const NESTING_LIMIT: usize = 5;

/// The fragment size at which CER breaks up long string values.
const CER_FRAGMENT_LEN: usize = 1000;


//------------ Element -------------------------------------------------------

/// One encoded value of any ASN.1 type.
///
/// An element consists of a [`Tag`], a flag stating whether the value uses
/// primitive or constructed encoding, and the raw content octets. For a
/// primitive value the content octets are the value's literal content; for
/// a constructed value they are the back-to-back encodings of zero or more
/// child elements.
///
/// The element also carries the [`Mode`] chosen when it was created or
/// parsed. The mode governs the strictness of the typed accessors on the
/// decode side and the length form and string fragmentation on the encode
/// side. For constructed values in BER mode, an additional
/// [`LengthPreference`] selects between the definite and the indefinite
/// length form; it is irrelevant in the other modes.
///
/// Equality compares tag, construction, and content octets but not the
/// mode. Two elements carrying the same encoded value are equal however
/// they were parsed.
#[derive(Clone, Debug)]
pub struct Element {
    /// The mode the element is interpreted and encoded under.
    mode: Mode,

    /// The tag of the element.
    tag: Tag,

    /// Whether the value uses constructed encoding.
    constructed: bool,

    /// The content octets.
    value: Bytes,

    /// The preferred length form when encoding in BER mode.
    length_pref: LengthPreference,
}

/// # Creation and Basic Access
impl Element {
    /// Creates a new, empty primitive element with the given tag.
    pub fn new(mode: Mode, tag: Tag) -> Self {
        Element {
            mode, tag,
            constructed: false,
            value: Bytes::new(),
            length_pref: LengthPreference::default(),
        }
    }

    /// Creates an element from all its parts.
    pub fn with_value(
        mode: Mode, tag: Tag, constructed: bool, value: Bytes
    ) -> Self {
        Element {
            mode, tag, constructed, value,
            length_pref: LengthPreference::default(),
        }
    }

    /// Returns the mode of the element.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the tag of the element.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Changes the tag of the element.
    ///
    /// The content octets stay untouched, making this the way to apply an
    /// implicit tag.
    pub fn set_tag(&mut self, tag: Tag) {
        self.tag = tag;
    }

    /// Returns whether the value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns the raw content octets.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Returns the preferred length form for encoding in BER mode.
    pub fn length_preference(&self) -> LengthPreference {
        self.length_pref
    }

    /// Sets the preferred length form for encoding in BER mode.
    pub fn set_length_preference(&mut self, pref: LengthPreference) {
        self.length_pref = pref;
    }

    /// Returns whether this is the end-of-contents marker.
    fn is_end_of_contents(&self) -> bool {
        self.tag == Tag::END_OF_CONTENTS
            && !self.constructed
            && self.value.is_empty()
    }
}

/// # Decoding
impl Element {
    /// Parses a single element from the start of a byte buffer.
    ///
    /// Returns the element and the number of octets it occupied. Anything
    /// after those octets is left alone, so several concatenated encodings
    /// can be read by calling this repeatedly on the remainder.
    pub fn from_bytes(
        slice: &[u8], mode: Mode
    ) -> Result<(Self, usize), Error> {
        let mut source = Source::new(slice);
        let res = Self::take_from(&mut source, mode, 0)?;
        Ok((res, source.pos()))
    }

    /// Parses a single element from a source.
    fn take_from(
        source: &mut Source, mode: Mode, depth: usize
    ) -> Result<Self, Error> {
        if depth > NESTING_LIMIT {
            return Err(
                Error::recursion("values nested too deeply").at(source.pos())
            )
        }
        let (tag, constructed) = Tag::take_from(source)?;
        let length_pos = source.pos();
        let length = Length::take_from(source, mode)?;
        let value = match length {
            Length::Definite(len) => {
                Bytes::copy_from_slice(source.take(len)?)
            }
            Length::Indefinite => {
                if !constructed {
                    return Err(Error::construction(
                        "indefinite length on a primitive value"
                    ).at(length_pos))
                }
                if !mode.allows_indefinite() {
                    return Err(Error::generic(
                        "indefinite length form is not allowed in DER"
                    ).at(length_pos))
                }
                Self::take_indefinite(source, mode, depth)?
            }
        };
        if mode == Mode::Cer
            && !constructed
            && value.len() > CER_FRAGMENT_LEN
            && tag.is_universal()
            && is_fragmentable(tag)
        {
            return Err(Error::construction(
                "primitive string value longer than 1000 octets in CER"
            ).at(length_pos))
        }
        Ok(Element {
            mode, tag, constructed, value,
            length_pref: match length {
                Length::Definite(_) => LengthPreference::Definite,
                Length::Indefinite => LengthPreference::Indefinite,
            },
        })
    }

    /// Collects the content of an indefinite length value.
    ///
    /// Skips over child elements until the end-of-contents marker and
    /// returns everything before the marker. Running out of data before
    /// the marker is found is a truncation error.
    fn take_indefinite(
        source: &mut Source, mode: Mode, depth: usize
    ) -> Result<Bytes, Error> {
        let start = source.pos();
        loop {
            if source.remaining() == 0 {
                return Err(Error::truncated(
                    "indefinite value without end-of-contents"
                ).at(source.pos()))
            }
            let child_start = source.pos();
            let child = Self::take_from(source, mode, depth + 1)?;
            if child.is_end_of_contents() {
                let content = source.span_from(start);
                return Ok(Bytes::copy_from_slice(
                    &content[..child_start - start]
                ))
            }
        }
    }
}

/// # Encoding
impl Element {
    /// Returns the complete encoding of the element.
    ///
    /// The mode of the element decides the details: DER always uses the
    /// minimal definite length form, CER uses the indefinite form for
    /// constructed values and breaks long string values into fragments,
    /// and BER follows the element's length preference for constructed
    /// values.
    pub fn to_bytes(&self) -> Bytes {
        let mut res = Vec::with_capacity(
            self.tag.encoded_len() + 5 + self.value.len()
        );
        self.append_encoded(&mut res);
        Bytes::from(res)
    }

    /// Writes the complete encoding of the element.
    pub fn write_encoded<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self.to_bytes().as_ref())
    }

    /// Appends the complete encoding to the end of `target`.
    fn append_encoded(&self, target: &mut Vec<u8>) {
        if self.mode == Mode::Cer
            && !self.constructed
            && self.value.len() > CER_FRAGMENT_LEN
            && self.tag.is_universal()
            && is_fragmentable(self.tag)
        {
            return self.append_fragmented(target)
        }
        let indefinite = self.constructed && match self.mode {
            Mode::Ber => {
                self.length_pref == LengthPreference::Indefinite
            }
            Mode::Cer => true,
            Mode::Der => false,
        };
        self.tag.append_encoded(self.constructed, target);
        if indefinite {
            Length::Indefinite.append_encoded(target);
            target.extend_from_slice(&self.value);
            target.extend_from_slice(&[0x00, 0x00]);
        }
        else {
            Length::Definite(self.value.len()).append_encoded(target);
            target.extend_from_slice(&self.value);
        }
    }

    /// Appends the encoding of a long string value broken into fragments.
    ///
    /// The outer value becomes an indefinite length constructed value of
    /// the same tag whose children are primitive values of at most 1000
    /// content octets. Bit strings are split along their payload so that
    /// every fragment but the last is byte-aligned with a zero unused-bits
    /// octet of its own.
    fn append_fragmented(&self, target: &mut Vec<u8>) {
        self.tag.append_encoded(true, target);
        Length::Indefinite.append_encoded(target);
        if self.tag == Tag::BIT_STRING && !self.value.is_empty() {
            let unused = self.value[0];
            let payload = &self.value[1..];
            let mut chunks = payload.chunks(CER_FRAGMENT_LEN - 1).peekable();
            while let Some(chunk) = chunks.next() {
                let last = chunks.peek().is_none();
                self.tag.append_encoded(false, target);
                Length::Definite(chunk.len() + 1).append_encoded(target);
                target.push(if last { unused } else { 0 });
                target.extend_from_slice(chunk);
            }
        }
        else {
            for chunk in self.value.chunks(CER_FRAGMENT_LEN) {
                self.tag.append_encoded(false, target);
                Length::Definite(chunk.len()).append_encoded(target);
                target.extend_from_slice(chunk);
            }
        }
        target.extend_from_slice(&[0x00, 0x00]);
    }
}

/// # Child Elements
impl Element {
    /// Parses the content octets as a sequence of child elements.
    ///
    /// This is the accessor for SEQUENCE and SET values but works on any
    /// constructed value. The children are fresh copies; mutating them
    /// does not change this element.
    pub fn children(&self) -> Result<Vec<Element>, Error> {
        if !self.constructed {
            return Err(Error::construction(
                "child elements of a primitive value"
            ))
        }
        let mut source = Source::new(self.value.as_ref());
        let mut res = Vec::new();
        while source.remaining() > 0 {
            res.push(Self::take_from(&mut source, self.mode, 0)?);
        }
        Ok(res)
    }

    /// Parses the content octets as exactly one child element.
    ///
    /// This is the accessor for explicitly tagged values. Fails if the
    /// content is shorter or longer than one complete encoding.
    pub fn inner(&self) -> Result<Element, Error> {
        let mut source = Source::new(self.value.as_ref());
        let res = Self::take_from(&mut source, self.mode, 0)?;
        if source.remaining() != 0 {
            return Err(Error::size(
                "more than one value inside an explicit tag"
            ))
        }
        Ok(res)
    }

    /// Creates a universal SEQUENCE from the given child elements.
    pub fn from_sequence(
        mode: Mode, children: impl IntoIterator<Item = Element>
    ) -> Self {
        let mut res = Self::new(mode, Tag::SEQUENCE);
        res.set_sequence(children);
        res
    }

    /// Creates a universal SET from the given child elements.
    ///
    /// In CER and DER mode the children are sorted by their tag; in BER
    /// mode the given order is kept.
    pub fn from_set(
        mode: Mode, children: impl IntoIterator<Item = Element>
    ) -> Self {
        let mut res = Self::new(mode, Tag::SET);
        res.set_set(children);
        res
    }

    /// Replaces the content with the encodings of the given elements.
    ///
    /// Makes the element constructed, keeping its tag.
    pub fn set_sequence(
        &mut self, children: impl IntoIterator<Item = Element>
    ) {
        let mut value = Vec::new();
        for child in children {
            child.append_encoded(&mut value);
        }
        self.constructed = true;
        self.value = Bytes::from(value);
    }

    /// Replaces the content with the encodings of the given elements,
    /// sorted for a SET.
    ///
    /// In CER and DER mode the children are sorted by their tag before
    /// encoding; in BER mode the given order is kept. Makes the element
    /// constructed, keeping its tag.
    pub fn set_set(
        &mut self, children: impl IntoIterator<Item = Element>
    ) {
        let mut children: Vec<Element> = children.into_iter().collect();
        if self.mode.is_restricted() {
            children.sort_by_key(|child| child.tag);
        }
        self.set_sequence(children);
    }

    /// Wraps the element in a new constructed element with the given tag.
    ///
    /// This is the encoding side of explicit tagging.
    pub fn into_explicit(self, tag: Tag) -> Element {
        let mut value = Vec::new();
        self.append_encoded(&mut value);
        Element {
            mode: self.mode,
            tag,
            constructed: true,
            value: Bytes::from(value),
            length_pref: self.length_pref,
        }
    }
}

/// # Reassembly of Constructed String Values
impl Element {
    /// Returns the complete content of a possibly fragmented string value.
    ///
    /// A primitive value contributes its content octets as they are. A
    /// constructed value is parsed into child elements which must all
    /// carry the element's own tag and are reassembled recursively, at
    /// most [`NESTING_LIMIT`] levels deep.
    fn deconstruct(&self, depth: usize) -> Result<Bytes, Error> {
        if !self.constructed {
            return Ok(self.value.clone())
        }
        if !self.mode.allows_constructed_strings() {
            return Err(Error::construction(
                "constructed string value in DER mode"
            ))
        }
        let depth = depth + 1;
        if depth > NESTING_LIMIT {
            return Err(Error::recursion(
                "constructed string nested too deeply"
            ))
        }
        let children = self.children()?;
        let mut parts = Vec::with_capacity(children.len());
        for child in &children {
            if child.tag != self.tag {
                return Err(Error::construction(
                    "fragment with foreign tag in constructed string"
                ))
            }
            parts.push(child.deconstruct(depth)?);
        }
        let total = parts.iter().map(Bytes::len).sum();
        let mut res = BytesMut::with_capacity(total);
        for part in &parts {
            res.extend_from_slice(part);
        }
        Ok(res.freeze())
    }

    /// Reassembles a possibly fragmented bit string value.
    ///
    /// Works like [`deconstruct`][Self::deconstruct] except that every
    /// fragment is itself a bit string and only the final fragment may
    /// have unused bits in its last octet.
    fn deconstruct_bits(&self, depth: usize) -> Result<BitString, Error> {
        if !self.constructed {
            return BitString::from_content(self.value.as_ref(), self.mode)
        }
        if !self.mode.allows_constructed_strings() {
            return Err(Error::construction(
                "constructed string value in DER mode"
            ))
        }
        let depth = depth + 1;
        if depth > NESTING_LIMIT {
            return Err(Error::recursion(
                "constructed string nested too deeply"
            ))
        }
        let children = self.children()?;
        let mut bits = BytesMut::new();
        let mut unused = 0;
        for (idx, child) in children.iter().enumerate() {
            if child.tag != self.tag {
                return Err(Error::construction(
                    "fragment with foreign tag in constructed string"
                ))
            }
            let fragment = child.deconstruct_bits(depth)?;
            if idx + 1 != children.len() && fragment.unused() != 0 {
                return Err(Error::construction(
                    "unused bits in non-final bit string fragment"
                ))
            }
            bits.extend_from_slice(fragment.octet_slice());
            unused = fragment.unused();
        }
        BitString::new(unused, bits.freeze())
    }
}

/// # Typed Access
///
/// Each accessor first asserts the construction the type permits (the
/// string types accept constructed encodings where the mode does, all
/// others require primitive encoding) and then interprets the content
/// octets. None of them checks the element's tag: interpreting, say, a
/// context-tagged value as an INTEGER is exactly what implicit tagging
/// needs.
impl Element {
    /// Returns the content octets of a value that must be primitive.
    fn primitive_value(&self) -> Result<&[u8], Error> {
        if self.constructed {
            return Err(Error::construction(
                "constructed encoding of a primitive-only type"
            ))
        }
        Ok(self.value.as_ref())
    }

    /// Returns the element interpreted as a BOOLEAN.
    ///
    /// In BER mode any non-zero content octet is true; in CER and DER
    /// mode true must be encoded as 0xFF.
    pub fn to_bool(&self) -> Result<bool, Error> {
        let value = self.primitive_value()?;
        if value.len() != 1 {
            return Err(Error::size("boolean must be a single octet"))
        }
        match value[0] {
            0x00 => Ok(false),
            0xFF => Ok(true),
            _ if !self.mode.is_restricted() => Ok(true),
            _ => Err(Error::generic(
                "boolean must be encoded as 0x00 or 0xFF"
            )),
        }
    }

    /// Returns the element interpreted as an INTEGER.
    pub fn to_i64(&self) -> Result<i64, Error> {
        int::decode(self.primitive_value()?, self.mode)
    }

    /// Returns the element interpreted as an ENUMERATED value.
    ///
    /// ENUMERATED shares the content encoding of INTEGER.
    pub fn to_enumerated(&self) -> Result<i64, Error> {
        self.to_i64()
    }

    /// Returns the element interpreted as a REAL.
    pub fn to_f64(&self) -> Result<f64, Error> {
        real::decode(self.primitive_value()?)
    }

    /// Checks that the element is a well-formed NULL.
    pub fn to_null(&self) -> Result<(), Error> {
        if !self.primitive_value()?.is_empty() {
            return Err(Error::size("NULL with content octets"))
        }
        Ok(())
    }

    /// Returns the element interpreted as an OBJECT IDENTIFIER.
    pub fn to_oid(&self) -> Result<Oid, Error> {
        Oid::from_content(self.primitive_value()?)
    }

    /// Returns the element interpreted as a BIT STRING.
    pub fn to_bit_string(&self) -> Result<BitString, Error> {
        self.deconstruct_bits(0)
    }

    /// Returns the element interpreted as an OCTET STRING.
    pub fn to_octets(&self) -> Result<Bytes, Error> {
        self.deconstruct(0)
    }

    /// Returns the element interpreted as a UTCTime.
    pub fn to_utc_time(&self) -> Result<UtcTime, Error> {
        UtcTime::from_content(self.primitive_value()?)
    }

    /// Returns the element interpreted as a GeneralizedTime.
    pub fn to_generalized_time(&self) -> Result<GeneralizedTime, Error> {
        GeneralizedTime::from_content(self.primitive_value()?)
    }

    /// Returns the element interpreted as a string in some character set.
    fn to_restricted<L: CharSet>(&self) -> Result<String, Error> {
        L::decode(self.deconstruct(0)?.as_ref())
    }

    /// Returns the element interpreted as a UTF8String.
    pub fn to_utf8(&self) -> Result<String, Error> {
        self.to_restricted::<Utf8CharSet>()
    }

    /// Returns the element interpreted as a NumericString.
    pub fn to_numeric_string(&self) -> Result<String, Error> {
        self.to_restricted::<NumericCharSet>()
    }

    /// Returns the element interpreted as a PrintableString.
    pub fn to_printable_string(&self) -> Result<String, Error> {
        self.to_restricted::<PrintableCharSet>()
    }

    /// Returns the element interpreted as an IA5String.
    pub fn to_ia5_string(&self) -> Result<String, Error> {
        self.to_restricted::<Ia5CharSet>()
    }

    /// Returns the element interpreted as a VisibleString.
    pub fn to_visible_string(&self) -> Result<String, Error> {
        self.to_restricted::<VisibleCharSet>()
    }

    /// Returns the element interpreted as a GraphicString.
    pub fn to_graphic_string(&self) -> Result<String, Error> {
        self.to_restricted::<GraphicCharSet>()
    }

    /// Returns the element interpreted as a GeneralString.
    pub fn to_general_string(&self) -> Result<String, Error> {
        self.to_restricted::<GeneralCharSet>()
    }

    /// Returns the element interpreted as an ObjectDescriptor.
    pub fn to_object_descriptor(&self) -> Result<String, Error> {
        self.to_restricted::<GraphicCharSet>()
    }

    /// Returns the element interpreted as a UniversalString.
    pub fn to_universal_string(&self) -> Result<String, Error> {
        self.to_restricted::<UniversalCharSet>()
    }

    /// Returns the element interpreted as a BMPString.
    pub fn to_bmp_string(&self) -> Result<String, Error> {
        self.to_restricted::<BmpCharSet>()
    }
}

/// # Typed Setters
///
/// Each setter replaces the content octets with the encoding of the given
/// value and resets the construction to primitive. The tag is left alone;
/// use the [`Value`]-based constructor or [`from_text`][Self::from_text]
/// when the default universal tag is wanted.
impl Element {
    /// Creates an element carrying a restricted character string.
    ///
    /// The element gets the character set's natural universal tag and the
    /// string's encoding in that set as its content:
    ///
    /// ```
    /// use x690::{Element, Mode, Tag};
    /// use x690::string::PrintableCharSet;
    ///
    /// let elem = Element::from_text::<PrintableCharSet>(
    ///     Mode::Der, "Test User 1"
    /// )?;
    /// assert_eq!(elem.tag(), Tag::PRINTABLE_STRING);
    /// # Ok::<(), x690::Error>(())
    /// ```
    pub fn from_text<L: CharSet>(
        mode: Mode, value: &str
    ) -> Result<Self, Error> {
        let mut res = Self::new(mode, L::TAG);
        res.set_restricted::<L>(value)?;
        Ok(res)
    }

    /// Installs freshly encoded primitive content.
    fn set_primitive(&mut self, value: Bytes) {
        self.constructed = false;
        self.value = value;
    }

    /// Encodes a BOOLEAN into the element.
    pub fn set_bool(&mut self, value: bool) {
        self.set_primitive(Bytes::from_static(
            if value { b"\xFF" } else { b"\x00" }
        ));
    }

    /// Encodes an INTEGER into the element.
    pub fn set_i64(&mut self, value: i64) {
        self.set_primitive(int::encode(value));
    }

    /// Encodes an ENUMERATED value into the element.
    pub fn set_enumerated(&mut self, value: i64) {
        self.set_i64(value);
    }

    /// Encodes a REAL into the element.
    pub fn set_f64(&mut self, value: f64) {
        self.set_primitive(real::encode(value));
    }

    /// Encodes a NULL into the element.
    pub fn set_null(&mut self) {
        self.set_primitive(Bytes::new());
    }

    /// Encodes an OBJECT IDENTIFIER into the element.
    pub fn set_oid(&mut self, value: &Oid) {
        self.set_primitive(value.to_content());
    }

    /// Encodes a BIT STRING into the element.
    pub fn set_bit_string(&mut self, value: &BitString) {
        self.set_primitive(value.to_content());
    }

    /// Encodes an OCTET STRING into the element.
    pub fn set_octets(&mut self, value: Bytes) {
        self.set_primitive(value);
    }

    /// Encodes a UTCTime into the element.
    pub fn set_utc_time(&mut self, value: UtcTime) {
        self.set_primitive(value.to_content());
    }

    /// Encodes a GeneralizedTime into the element.
    pub fn set_generalized_time(&mut self, value: GeneralizedTime) {
        self.set_primitive(value.to_content());
    }

    /// Encodes a string in some character set into the element.
    fn set_restricted<L: CharSet>(
        &mut self, value: &str
    ) -> Result<(), Error> {
        let octets = L::from_str(value)?;
        self.set_primitive(Bytes::copy_from_slice(octets.as_ref()));
        Ok(())
    }

    /// Encodes a UTF8String into the element.
    pub fn set_utf8(&mut self, value: &str) {
        self.set_primitive(Bytes::copy_from_slice(value.as_bytes()));
    }

    /// Encodes a NumericString into the element.
    pub fn set_numeric_string(&mut self, value: &str) -> Result<(), Error> {
        self.set_restricted::<NumericCharSet>(value)
    }

    /// Encodes a PrintableString into the element.
    pub fn set_printable_string(
        &mut self, value: &str
    ) -> Result<(), Error> {
        self.set_restricted::<PrintableCharSet>(value)
    }

    /// Encodes an IA5String into the element.
    pub fn set_ia5_string(&mut self, value: &str) -> Result<(), Error> {
        self.set_restricted::<Ia5CharSet>(value)
    }

    /// Encodes a VisibleString into the element.
    pub fn set_visible_string(&mut self, value: &str) -> Result<(), Error> {
        self.set_restricted::<VisibleCharSet>(value)
    }

    /// Encodes a GraphicString into the element.
    pub fn set_graphic_string(&mut self, value: &str) -> Result<(), Error> {
        self.set_restricted::<GraphicCharSet>(value)
    }

    /// Encodes a GeneralString into the element.
    pub fn set_general_string(&mut self, value: &str) -> Result<(), Error> {
        self.set_restricted::<GeneralCharSet>(value)
    }

    /// Encodes an ObjectDescriptor into the element.
    pub fn set_object_descriptor(
        &mut self, value: &str
    ) -> Result<(), Error> {
        self.set_restricted::<GraphicCharSet>(value)
    }

    /// Encodes a UniversalString into the element.
    pub fn set_universal_string(
        &mut self, value: &str
    ) -> Result<(), Error> {
        self.set_restricted::<UniversalCharSet>(value)
    }

    /// Encodes a BMPString into the element.
    pub fn set_bmp_string(&mut self, value: &str) -> Result<(), Error> {
        self.set_restricted::<BmpCharSet>(value)
    }
}

/// # Generic Values
impl Element {
    /// Creates an element from a native value.
    ///
    /// The universal tag follows from the value's shape; see [`Value`] for
    /// the mapping.
    pub fn from_value(mode: Mode, value: Value) -> Self {
        match value {
            Value::Boolean(inner) => {
                let mut res = Self::new(mode, Tag::BOOLEAN);
                res.set_bool(inner);
                res
            }
            Value::Integer(inner) => {
                let mut res = Self::new(mode, Tag::INTEGER);
                res.set_i64(inner);
                res
            }
            Value::Real(inner) => {
                let mut res = Self::new(mode, Tag::REAL);
                res.set_f64(inner);
                res
            }
            Value::Utf8(inner) => {
                let mut res = Self::new(mode, Utf8CharSet::TAG);
                res.set_primitive(Bytes::from(inner.into_bytes()));
                res
            }
            Value::Null => Self::new(mode, Tag::NULL),
            Value::Octets(inner) => {
                let mut res = Self::new(mode, Tag::OCTET_STRING);
                res.set_octets(inner);
                res
            }
            Value::Sequence(children) => Self::from_sequence(mode, children),
            Value::Set(children) => Self::from_set(mode, children),
            Value::Time(inner) => {
                let mut res = Self::new(mode, Tag::GENERALIZED_TIME);
                res.set_generalized_time(inner);
                res
            }
            Value::Oid(inner) => {
                let mut res = Self::new(mode, Tag::OID);
                res.set_oid(&inner);
                res
            }
        }
    }

    /// Interprets the element as the native value of its universal tag.
    ///
    /// Fails with an undefined error for elements outside the universal
    /// class and for universal types without a [`Value`] variant.
    pub fn to_value(&self) -> Result<Value, Error> {
        if !self.tag.is_universal() {
            return Err(Error::undefined(
                "no universal interpretation for this tag"
            ))
        }
        match self.tag {
            Tag::BOOLEAN => self.to_bool().map(Value::Boolean),
            Tag::INTEGER => self.to_i64().map(Value::Integer),
            Tag::REAL => self.to_f64().map(Value::Real),
            Tag::UTF8_STRING => self.to_utf8().map(Value::Utf8),
            Tag::NULL => self.to_null().map(|_| Value::Null),
            Tag::OCTET_STRING => self.to_octets().map(Value::Octets),
            Tag::SEQUENCE => self.children().map(Value::Sequence),
            Tag::SET => self.children().map(Value::Set),
            Tag::GENERALIZED_TIME => {
                self.to_generalized_time().map(Value::Time)
            }
            Tag::OID => self.to_oid().map(Value::Oid),
            _ => Err(Error::undefined(
                "no native value for this universal type"
            )),
        }
    }
}


//--- PartialEq and Eq

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.constructed == other.constructed
            && self.value == other.value
    }
}

impl Eq for Element { }


//------------ Helpers -------------------------------------------------------

/// Returns whether values of a universal tag may be fragmented under CER.
///
/// These are the string types: both binary strings and all the character
/// strings including ObjectDescriptor.
fn is_fragmentable(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::BIT_STRING | Tag::OCTET_STRING | Tag::OBJECT_DESCRIPTOR
        | Tag::UTF8_STRING | Tag::NUMERIC_STRING | Tag::PRINTABLE_STRING
        | Tag::TELETEX_STRING | Tag::VIDEOTEX_STRING | Tag::IA5_STRING
        | Tag::GRAPHIC_STRING | Tag::VISIBLE_STRING | Tag::GENERAL_STRING
        | Tag::UNIVERSAL_STRING | Tag::BMP_STRING
    )
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use super::*;

    fn decode(slice: &[u8], mode: Mode) -> Element {
        let (res, consumed) = Element::from_bytes(slice, mode).unwrap();
        assert_eq!(consumed, slice.len(), "leftover bytes");
        res
    }

    fn decode_err(slice: &[u8], mode: Mode) -> ErrorKind {
        Element::from_bytes(slice, mode).unwrap_err().kind()
    }

    #[test]
    fn boolean() {
        let mut elem = Element::new(Mode::Der, Tag::BOOLEAN);
        elem.set_bool(true);
        assert_eq!(elem.to_bytes().as_ref(), b"\x01\x01\xFF");
        assert!(decode(b"\x01\x01\xFF", Mode::Der).to_bool().unwrap());
        assert!(!decode(b"\x01\x01\x00", Mode::Der).to_bool().unwrap());

        elem.set_bool(false);
        assert_eq!(elem.to_bytes().as_ref(), b"\x01\x01\x00");

        // BER takes any non-zero octet for true, DER and CER don't.
        assert!(decode(b"\x01\x01\x2A", Mode::Ber).to_bool().unwrap());
        assert_eq!(
            decode(b"\x01\x01\x2A", Mode::Der).to_bool()
                .unwrap_err().kind(),
            ErrorKind::Generic
        );
        assert_eq!(
            decode(b"\x01\x01\x2A", Mode::Cer).to_bool()
                .unwrap_err().kind(),
            ErrorKind::Generic
        );

        assert_eq!(
            decode(b"\x01\x00", Mode::Ber).to_bool().unwrap_err().kind(),
            ErrorKind::Size
        );
        assert_eq!(
            decode(b"\x01\x02\xFF\xFF", Mode::Ber).to_bool()
                .unwrap_err().kind(),
            ErrorKind::Size
        );
    }

    #[test]
    fn integer() {
        for (value, encoding) in [
            (127i64, b"\x02\x01\x7F".as_slice()),
            (-128, b"\x02\x01\x80"),
            (32767, b"\x02\x02\x7F\xFF"),
            (0, b"\x02\x01\x00"),
        ] {
            let mut elem = Element::new(Mode::Der, Tag::INTEGER);
            elem.set_i64(value);
            assert_eq!(elem.to_bytes().as_ref(), encoding);
            assert_eq!(decode(encoding, Mode::Der).to_i64().unwrap(), value);
        }

        // DER insists on the minimal encoding, BER doesn't.
        assert_eq!(
            decode(b"\x02\x02\x00\x00", Mode::Der).to_i64()
                .unwrap_err().kind(),
            ErrorKind::Padding
        );
        assert_eq!(
            decode(b"\x02\x02\x00\x00", Mode::Ber).to_i64().unwrap(), 0
        );
        assert_eq!(
            decode(b"\x02\x00", Mode::Ber).to_i64().unwrap_err().kind(),
            ErrorKind::Size
        );
    }

    #[test]
    fn framing_roundtrip() {
        let mut elem = Element::new(Mode::Der, Tag::OCTET_STRING);
        elem.set_octets(Bytes::from(vec![0xAB; 300]));
        let encoded = elem.to_bytes();
        // 300 needs the two octet long length form.
        assert_eq!(&encoded.as_ref()[..4], b"\x04\x82\x01\x2C");
        let (parsed, consumed) = Element::from_bytes(
            encoded.as_ref(), Mode::Der
        ).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(parsed, elem);
        assert_eq!(
            parsed,
            Element::with_value(
                Mode::Der, Tag::OCTET_STRING, false,
                Bytes::from(vec![0xAB; 300]),
            )
        );
    }

    #[test]
    fn concatenated_elements() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"\x02\x01\x2A");
        buf.extend_from_slice(b"\x01\x01\xFF");
        let (first, consumed) = Element::from_bytes(
            &buf, Mode::Ber
        ).unwrap();
        assert_eq!(first.to_i64().unwrap(), 42);
        let (second, rest) = Element::from_bytes(
            &buf[consumed..], Mode::Ber
        ).unwrap();
        assert!(second.to_bool().unwrap());
        assert_eq!(consumed + rest, buf.len());
    }

    #[test]
    fn indefinite_length() {
        // A [0] wrapper around two octet strings in indefinite form.
        let input = b"\xA0\x80\x04\x01\x01\x04\x01\x02\x00\x00";
        let elem = decode(input, Mode::Ber);
        assert!(elem.is_constructed());
        assert_eq!(elem.value().as_ref(), b"\x04\x01\x01\x04\x01\x02");
        assert_eq!(elem.children().unwrap().len(), 2);

        // The same in DER is not allowed.
        assert_eq!(decode_err(input, Mode::Der), ErrorKind::Generic);

        // Indefinite length with the primitive bit.
        assert_eq!(
            decode_err(b"\x04\x80\x00\x00", Mode::Ber),
            ErrorKind::Construction
        );

        // Missing end-of-contents.
        assert_eq!(
            decode_err(b"\xA0\x80\x04\x01\x01", Mode::Ber),
            ErrorKind::Truncated
        );

        // Nested indefinite values stop at their own marker.
        let input = b"\xA0\x80\xA1\x80\x04\x00\x00\x00\x00\x00";
        let elem = decode(input, Mode::Ber);
        let inner = elem.inner().unwrap();
        assert_eq!(inner.tag(), Tag::ctx(1));
        assert_eq!(inner.value().as_ref(), b"\x04\x00");
    }

    #[test]
    fn nesting_limit() {
        // Six nested indefinite values exceed the limit of five.
        let mut input = Vec::new();
        for _ in 0..6 {
            input.extend_from_slice(b"\xA0\x80");
        }
        input.extend_from_slice(b"\x04\x00");
        for _ in 0..6 {
            input.extend_from_slice(b"\x00\x00");
        }
        assert_eq!(decode_err(&input, Mode::Ber), ErrorKind::Recursion);

        // Five levels are fine.
        let mut input = Vec::new();
        for _ in 0..5 {
            input.extend_from_slice(b"\xA0\x80");
        }
        input.extend_from_slice(b"\x04\x00");
        for _ in 0..5 {
            input.extend_from_slice(b"\x00\x00");
        }
        assert!(Element::from_bytes(&input, Mode::Ber).is_ok());
    }

    #[test]
    fn constructed_octet_string() {
        // Nested constructed fragments reassemble in order.
        let input = b"\x24\x11\
            \x04\x04\x01\x02\x03\x04\
            \x24\x05\x04\x03\x05\x06\x07\
            \x04\x02\x08\x09";
        let elem = decode(input, Mode::Ber);
        assert_eq!(
            elem.to_octets().unwrap().as_ref(),
            b"\x01\x02\x03\x04\x05\x06\x07\x08\x09"
        );

        // A fragment with a foreign tag is refused.
        let input = b"\x24\x07\x04\x01\x01\x05\x00\x04\x00";
        assert_eq!(
            decode(input, Mode::Ber).to_octets().unwrap_err().kind(),
            ErrorKind::Construction
        );

        // DER never accepts the constructed form for strings.
        let input = b"\x24\x06\x04\x01\x01\x04\x01\x02";
        assert_eq!(
            decode(input, Mode::Der).to_octets().unwrap_err().kind(),
            ErrorKind::Construction
        );
    }

    #[test]
    fn constructed_bit_string() {
        // 0000 1111 0000 1111 111: nineteen bits across three
        // fragments, one of them nested constructed.
        let input = b"\x23\x0E\
            \x03\x02\x00\x0F\
            \x23\x04\x03\x02\x00\x0F\
            \x03\x02\x05\xF0";
        let bits = decode(input, Mode::Ber).to_bit_string().unwrap();
        assert_eq!(bits.bit_len(), 19);
        assert_eq!(bits.unused(), 5);
        assert_eq!(bits.octet_slice(), b"\x0F\x0F\xF0");

        // A non-final fragment with unused bits is refused.
        let input = b"\x23\x08\x03\x02\x05\xF0\x03\x02\x00\x0F";
        assert_eq!(
            decode(input, Mode::Ber).to_bit_string().unwrap_err().kind(),
            ErrorKind::Construction
        );
    }

    #[test]
    fn deconstruct_nesting_limit() {
        // Each level of constructed string nesting costs one depth unit.
        fn nested(levels: usize) -> Vec<u8> {
            let mut value: Vec<u8> = b"\x04\x01\x2A".to_vec();
            for _ in 0..levels {
                let mut outer = vec![0x24, value.len() as u8];
                outer.extend_from_slice(&value);
                value = outer;
            }
            value
        }

        let elem = decode(&nested(5), Mode::Ber);
        assert_eq!(elem.to_octets().unwrap().as_ref(), b"\x2A");
        let elem = decode(&nested(6), Mode::Ber);
        assert_eq!(
            elem.to_octets().unwrap_err().kind(), ErrorKind::Recursion
        );
    }

    #[test]
    fn cer_fragmentation() {
        let mut elem = Element::new(Mode::Cer, Tag::OCTET_STRING);
        elem.set_octets(Bytes::from(vec![0u8; 2500]));
        let encoded = elem.to_bytes();

        let parsed = decode(encoded.as_ref(), Mode::Cer);
        assert!(parsed.is_constructed());
        let children = parsed.children().unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].value().len(), 1000);
        assert_eq!(children[1].value().len(), 1000);
        assert_eq!(children[2].value().len(), 500);
        assert!(children.iter().all(|child| {
            child.tag() == Tag::OCTET_STRING && !child.is_constructed()
        }));
        assert_eq!(parsed.to_octets().unwrap().len(), 2500);

        // At exactly 1000 octets the value stays primitive.
        let mut elem = Element::new(Mode::Cer, Tag::OCTET_STRING);
        elem.set_octets(Bytes::from(vec![0u8; 1000]));
        let encoded = elem.to_bytes();
        let parsed = decode(encoded.as_ref(), Mode::Cer);
        assert!(!parsed.is_constructed());

        // CER refuses over-long primitive string values on decode, too.
        let mut input = vec![0x04, 0x82, 0x03, 0xE9];
        input.extend_from_slice(&[0u8; 1001]);
        assert_eq!(decode_err(&input, Mode::Cer), ErrorKind::Construction);
        assert!(Element::from_bytes(&input, Mode::Ber).is_ok());

        // DER never fragments.
        let mut elem = Element::new(Mode::Der, Tag::OCTET_STRING);
        elem.set_octets(Bytes::from(vec![0u8; 2500]));
        let parsed = decode(elem.to_bytes().as_ref(), Mode::Der);
        assert!(!parsed.is_constructed());
        assert_eq!(parsed.value().len(), 2500);
    }

    #[test]
    fn cer_bit_string_fragmentation() {
        let mut payload = vec![0xAAu8; 1500];
        *payload.last_mut().unwrap() = 0xA8;
        let bits = BitString::new(3, Bytes::from(payload)).unwrap();
        let mut elem = Element::new(Mode::Cer, Tag::BIT_STRING);
        elem.set_bit_string(&bits);

        let parsed = decode(elem.to_bytes().as_ref(), Mode::Cer);
        assert!(parsed.is_constructed());
        let children = parsed.children().unwrap();
        assert_eq!(children.len(), 2);
        // Non-final fragments are byte-aligned and 1000 octets long.
        assert_eq!(children[0].value().len(), 1000);
        assert_eq!(children[0].value()[0], 0);
        assert_eq!(children[1].value()[0], 3);
        assert_eq!(parsed.to_bit_string().unwrap(), bits);
    }

    #[test]
    fn oid_element() {
        let oid = Oid::new([2, 999, 3]).unwrap();
        let mut elem = Element::new(Mode::Der, Tag::OID);
        elem.set_oid(&oid);
        assert_eq!(elem.to_bytes().as_ref(), b"\x06\x03\x88\x37\x03");
        assert_eq!(
            decode(b"\x06\x03\x88\x37\x03", Mode::Der).to_oid().unwrap(),
            oid
        );
    }

    #[test]
    fn ber_indefinite_encoding() {
        let mut child = Element::new(Mode::Ber, Tag::INTEGER);
        child.set_i64(1);
        let mut elem = Element::from_sequence(Mode::Ber, [child]);
        assert_eq!(elem.to_bytes().as_ref(), b"\x30\x03\x02\x01\x01");

        elem.set_length_preference(LengthPreference::Indefinite);
        assert_eq!(
            elem.to_bytes().as_ref(), b"\x30\x80\x02\x01\x01\x00\x00"
        );

        // CER always uses the indefinite form for constructed values.
        let mut child = Element::new(Mode::Cer, Tag::INTEGER);
        child.set_i64(1);
        let elem = Element::from_sequence(Mode::Cer, [child]);
        assert_eq!(
            elem.to_bytes().as_ref(), b"\x30\x80\x02\x01\x01\x00\x00"
        );
    }

    #[test]
    fn set_ordering() {
        let mut bool_elem = Element::new(Mode::Der, Tag::BOOLEAN);
        bool_elem.set_bool(true);
        let mut int_elem = Element::new(Mode::Der, Tag::INTEGER);
        int_elem.set_i64(5);

        // DER sorts by tag, BER keeps the given order.
        let elem = Element::from_set(
            Mode::Der, [int_elem.clone(), bool_elem.clone()]
        );
        assert_eq!(elem.value().as_ref(), b"\x01\x01\xFF\x02\x01\x05");

        let mut bool_elem = bool_elem;
        bool_elem.mode = Mode::Ber;
        let mut int_elem = int_elem;
        int_elem.mode = Mode::Ber;
        let elem = Element::from_set(Mode::Ber, [int_elem, bool_elem]);
        assert_eq!(elem.value().as_ref(), b"\x02\x01\x05\x01\x01\xFF");
    }

    #[test]
    fn explicit_tagging() {
        let mut inner = Element::new(Mode::Der, Tag::INTEGER);
        inner.set_i64(7);
        let wrapped = inner.clone().into_explicit(Tag::ctx(3));
        assert_eq!(wrapped.to_bytes().as_ref(), b"\xA3\x03\x02\x01\x07");

        let parsed = decode(b"\xA3\x03\x02\x01\x07", Mode::Der);
        assert_eq!(parsed.inner().unwrap(), inner);

        // Trailing data after the single child is refused.
        let parsed = decode(
            b"\xA3\x06\x02\x01\x07\x02\x01\x08", Mode::Der
        );
        assert_eq!(
            parsed.inner().unwrap_err().kind(), ErrorKind::Size
        );
    }

    #[test]
    fn values() {
        let elem = Element::from_value(Mode::Der, Value::Boolean(true));
        assert_eq!(elem.tag(), Tag::BOOLEAN);
        assert!(matches!(
            elem.to_value().unwrap(), Value::Boolean(true)
        ));

        let elem = Element::from_value(Mode::Der, Value::Integer(-7));
        assert_eq!(elem.tag(), Tag::INTEGER);
        assert!(matches!(
            elem.to_value().unwrap(), Value::Integer(-7)
        ));

        let elem = Element::from_value(Mode::Der, "hello".into());
        assert_eq!(elem.tag(), Tag::UTF8_STRING);
        assert_eq!(elem.value().as_ref(), b"hello");

        let elem = Element::from_value(Mode::Der, Value::Null);
        assert_eq!(elem.to_bytes().as_ref(), b"\x05\x00");
        assert!(elem.to_null().is_ok());

        let elem = Element::from_value(Mode::Der, Value::Sequence(vec![
            Element::from_value(Mode::Der, Value::Integer(1)),
            Element::from_value(Mode::Der, Value::Boolean(false)),
        ]));
        assert_eq!(
            elem.to_bytes().as_ref(),
            b"\x30\x06\x02\x01\x01\x01\x01\x00"
        );

        // No interpretation outside the universal class.
        let elem = Element::new(Mode::Der, Tag::ctx(0));
        assert_eq!(
            elem.to_value().unwrap_err().kind(), ErrorKind::Undefined
        );
    }

    #[test]
    fn tag_transparency() {
        // Accessors don't check tags: implicit tagging decodes through
        // the same paths.
        let mut elem = Element::new(Mode::Der, Tag::ctx(0));
        elem.set_i64(300);
        assert_eq!(elem.to_bytes().as_ref(), b"\x80\x02\x01\x2C");
        let parsed = decode(b"\x80\x02\x01\x2C", Mode::Der);
        assert_eq!(parsed.to_i64().unwrap(), 300);
    }

    #[test]
    fn text_constructors() {
        let elem = Element::from_text::<NumericCharSet>(
            Mode::Der, "123 45"
        ).unwrap();
        assert_eq!(elem.tag(), Tag::NUMERIC_STRING);
        assert_eq!(elem.to_bytes().as_ref(), b"\x12\x06123 45");
        assert_eq!(
            decode(b"\x12\x06123 45", Mode::Der)
                .to_numeric_string().unwrap(),
            "123 45"
        );

        let elem = Element::from_text::<BmpCharSet>(
            Mode::Der, "Ab"
        ).unwrap();
        assert_eq!(elem.tag(), Tag::BMP_STRING);
        assert_eq!(elem.value().as_ref(), b"\x00\x41\x00\x62");

        assert_eq!(
            Element::from_text::<PrintableCharSet>(Mode::Der, "a@b")
                .unwrap_err().kind(),
            ErrorKind::Characters
        );
    }

    #[test]
    fn utf8_and_times() {
        let mut elem = Element::new(Mode::Der, Tag::UTF8_STRING);
        elem.set_utf8("gr\u{FC}n");
        let encoded = elem.to_bytes();
        assert_eq!(
            decode(encoded.as_ref(), Mode::Der).to_utf8().unwrap(),
            "gr\u{FC}n"
        );

        let time = UtcTime::new(2001, 2, 3, 4, 5, 6).unwrap();
        let mut elem = Element::new(Mode::Der, Tag::UTC_TIME);
        elem.set_utc_time(time);
        assert_eq!(elem.to_bytes().as_ref(), b"\x17\x0D010203040506Z");
        assert_eq!(
            decode(b"\x17\x0D010203040506Z", Mode::Der)
                .to_utc_time().unwrap(),
            time
        );

        let time = GeneralizedTime::new(2001, 2, 3, 4, 5, 6).unwrap();
        let mut elem = Element::new(Mode::Der, Tag::GENERALIZED_TIME);
        elem.set_generalized_time(time);
        assert_eq!(
            decode(elem.to_bytes().as_ref(), Mode::Der)
                .to_generalized_time().unwrap(),
            time
        );
    }

    #[test]
    fn der_is_bit_exact() {
        // Whatever DER decodes successfully re-encodes to the same bytes.
        for input in [
            b"\x01\x01\xFF".as_slice(),
            b"\x02\x01\x00",
            b"\x02\x02\x7F\xFF",
            b"\x03\x02\x05\xE0",
            b"\x04\x03\x01\x02\x03",
            b"\x05\x00",
            b"\x06\x03\x88\x37\x03",
            b"\x30\x06\x02\x01\x01\x01\x01\x00",
            b"\x17\x0D010203040506Z",
        ] {
            let (elem, consumed) = Element::from_bytes(
                input, Mode::Der
            ).unwrap();
            assert_eq!(consumed, input.len());
            assert_eq!(elem.to_bytes().as_ref(), input);
        }
    }

    #[test]
    fn zero_length_values_fail() {
        assert_eq!(
            decode(b"\x01\x00", Mode::Ber).to_bool().unwrap_err().kind(),
            ErrorKind::Size
        );
        assert_eq!(
            decode(b"\x02\x00", Mode::Ber).to_i64().unwrap_err().kind(),
            ErrorKind::Size
        );
        assert_eq!(
            decode(b"\x03\x00", Mode::Ber).to_bit_string()
                .unwrap_err().kind(),
            ErrorKind::Size
        );
        assert_eq!(
            decode(b"\x06\x00", Mode::Ber).to_oid().unwrap_err().kind(),
            ErrorKind::Size
        );
        assert_eq!(
            decode(b"\x0A\x00", Mode::Ber).to_enumerated()
                .unwrap_err().kind(),
            ErrorKind::Size
        );
        assert_eq!(
            decode(b"\x17\x00", Mode::Ber).to_utc_time()
                .unwrap_err().kind(),
            ErrorKind::Size
        );
        assert_eq!(
            decode(b"\x18\x00", Mode::Ber).to_generalized_time()
                .unwrap_err().kind(),
            ErrorKind::Size
        );
    }
}
