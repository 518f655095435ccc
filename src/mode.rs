//! The encoding rules and their differences.

/// The rule set to apply when encoding or decoding data.
///
/// X.690 defines three sets of transfer rules that share the same basic
/// framing but differ in how much freedom the sender has. The Basic Encoding
/// Rules allow alternative encodings for several types as well as the
/// indefinite length form, while the Canonical and Distinguished Encoding
/// Rules each pick exactly one encoding for every abstract value.
///
/// All machinery in this crate is generic over the rules via a value of this
/// type; there are no separate element types per rule set.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings for
    /// some types as well as indefinite length values.
    Ber,

    /// Canonical Encoding Rules.
    ///
    /// These rules always employ indefinite length form for constructed
    /// values and the shortest possible form for primitive values. Character
    /// and octet strings longer than 1000 octets are broken up into
    /// constructed values. There are additional restrictions for certain
    /// types.
    Cer,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length form and require the
    /// shortest possible encoding. Additional rules apply to some types.
    Der,
}

impl Mode {
    /// Returns whether the mode is CER or DER.
    ///
    /// These two modes require canonical encodings and therefore reject a
    /// number of alternative forms on decoding that plain BER tolerates.
    pub fn is_restricted(self) -> bool {
        !matches!(self, Mode::Ber)
    }

    /// Returns whether the mode accepts the indefinite length form.
    pub fn allows_indefinite(self) -> bool {
        !matches!(self, Mode::Der)
    }

    /// Returns whether the mode accepts constructed string encodings.
    pub fn allows_constructed_strings(self) -> bool {
        !matches!(self, Mode::Der)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Ber
    }
}


//------------ LengthPreference ----------------------------------------------

/// The length form to prefer when encoding constructed values in BER.
///
/// BER leaves the choice between definite and indefinite length encoding of
/// constructed values to the sender. The preference is kept per element so
/// that no process-wide state exists; it is ignored in CER and DER mode
/// where the length form is fixed, and for primitive values which must
/// always use the definite form.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LengthPreference {
    /// Use the definite length form.
    #[default]
    Definite,

    /// Use the indefinite length form.
    Indefinite,
}
