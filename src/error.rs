//! Error handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! crate root.

use std::{error, fmt};


//------------ ErrorKind -----------------------------------------------------

/// The category of an error encountered while encoding or decoding.
///
/// Every [`Error`] carries one of these kinds alongside its human-readable
/// message. Callers that need to react to a specific failure mode can match
/// on the kind returned by [`Error::kind`] instead of inspecting the
/// message.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input ended before the encoding was complete.
    Truncated,

    /// A number in the encoding exceeds the range the crate supports.
    Overflow,

    /// An encoding carries forbidden padding.
    ///
    /// This covers leading zero octets in long-form tag numbers, non-minimal
    /// length octets under CER and DER, redundant leading octets of an
    /// INTEGER under CER and DER, and non-zero trailing bits of a
    /// BIT STRING under CER and DER.
    Padding,

    /// A value uses primitive encoding where constructed is required or
    /// vice versa.
    Construction,

    /// A fixed-width value has the wrong number of octets.
    Size,

    /// The encoding uses an octet sequence with reserved or undefined
    /// meaning.
    Undefined,

    /// Nested encodings exceed the nesting limit.
    Recursion,

    /// A character string contains a character outside its character set.
    Characters,

    /// Any other violation of the encoding rules.
    Generic,
}

impl ErrorKind {
    /// Returns a short description of the error kind.
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Truncated => "unexpected end of data",
            ErrorKind::Overflow => "value out of supported range",
            ErrorKind::Padding => "illegally padded encoding",
            ErrorKind::Construction => "illegal construction",
            ErrorKind::Size => "invalid content size",
            ErrorKind::Undefined => "reserved encoding",
            ErrorKind::Recursion => "nesting too deep",
            ErrorKind::Characters => "illegal characters",
            ErrorKind::Generic => "invalid data",
        }
    }
}


//------------ Error ---------------------------------------------------------

/// An error happened while encoding or decoding data.
///
/// The error consists of an [`ErrorKind`] stating what category of rule was
/// violated, a message with the details, and, when the error was produced
/// while parsing, the position of the offending octet in the input.
pub struct Error {
    /// The category of the error.
    kind: ErrorKind,

    /// The actual error message.
    msg: ErrorMessage,

    /// The position in the input where the error happened, if known.
    pos: Option<usize>,
}

impl Error {
    /// Creates a new error from a kind and a message.
    pub fn new(kind: ErrorKind, msg: impl Into<ErrorMessage>) -> Self {
        Error { kind, msg: msg.into(), pos: None }
    }

    /// Creates an error signalling unexpectedly ending data.
    pub fn truncated(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Truncated, msg)
    }

    /// Creates an error signalling a value outside the supported range.
    pub fn overflow(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Overflow, msg)
    }

    /// Creates an error signalling forbidden padding.
    pub fn padding(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Padding, msg)
    }

    /// Creates an error signalling the wrong construction of a value.
    pub fn construction(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Construction, msg)
    }

    /// Creates an error signalling a wrongly sized value.
    pub fn size(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Size, msg)
    }

    /// Creates an error signalling an encoding with reserved meaning.
    pub fn undefined(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Undefined, msg)
    }

    /// Creates an error signalling that nesting went too deep.
    pub fn recursion(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Recursion, msg)
    }

    /// Creates an error signalling characters outside a character set.
    pub fn characters(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Characters, msg)
    }

    /// Creates an error for any other rule violation.
    pub fn generic(msg: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Generic, msg)
    }

    /// Attaches the input position the error happened at.
    pub fn at(mut self, pos: usize) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the position in the input the error happened at, if known.
    pub fn pos(&self) -> Option<usize> {
        self.pos
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("msg", &format_args!("{}", self.msg))
            .field("pos", &self.pos)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(pos) = self.pos {
            write!(f, " at octet {}", pos)?;
        }
        write!(f, ": {}", self.msg)
    }
}

impl error::Error for Error { }


//------------ ErrorMessage --------------------------------------------------

/// An error message.
///
/// This type is an intermediary that makes it possible to pass various
/// things as an error message without explicit conversion: static strings
/// are kept as such and don't allocate, anything else is boxed up.
pub struct ErrorMessage {
    /// The actual yet hidden message.
    inner: ErrorMessageKind,
}

/// The actual error message as a hidden enum.
enum ErrorMessageKind {
    /// The error message is a static str.
    Static(&'static str),

    /// The error message is a boxed trait object.
    Boxed(Box<dyn fmt::Display + Send + Sync + 'static>),
}

impl ErrorMessage {
    /// Creates an error message from a static str.
    pub fn from_static(msg: &'static str) -> Self {
        ErrorMessage {
            inner: ErrorMessageKind::Static(msg)
        }
    }

    /// Creates an error message from a boxed trait object.
    pub fn from_boxed(
        msg: Box<dyn fmt::Display + Send + Sync + 'static>
    ) -> Self {
        ErrorMessage {
            inner: ErrorMessageKind::Boxed(msg)
        }
    }
}

impl From<&'static str> for ErrorMessage {
    fn from(msg: &'static str) -> Self {
        Self::from_static(msg)
    }
}

impl From<String> for ErrorMessage {
    fn from(msg: String) -> Self {
        Self::from_boxed(Box::new(msg))
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            ErrorMessageKind::Static(msg) => f.write_str(msg),
            ErrorMessageKind::Boxed(ref msg) => msg.fmt(f),
        }
    }
}


//============ Tests =========================================================
