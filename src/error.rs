//! Contains the Error and Result type used throughout the crate.
use std::fmt::Display;

use crate::TagKind;

/// Various errors that can occur while building, decoding or encoding tags.
///
/// Every error aborts the operation that produced it. A decode never returns
/// a partially built tree.
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Duplicate registration, or a lookup of an id, tag kind or value kind
    /// that nothing was registered for. During decode this is how unknown
    /// tag ids surface.
    Registration,

    /// Malformed wire data: negative lengths, truncated input, a missing or
    /// non-compound root, duplicate compound keys, undecodable strings or a
    /// nesting depth beyond the configured limit.
    Format,

    /// A tag was added to a second container, a list-owned tag was renamed,
    /// a list was given the wrong kind of element, or a list of End was
    /// requested.
    Ownership,

    /// A payload or value was of a different kind than the operation
    /// required.
    Conversion,

    /// Error from the underlying byte source or sink, other than running out
    /// of input.
    Io(std::io::ErrorKind),
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_registration(&self) -> bool {
        matches!(self.kind, ErrorKind::Registration)
    }

    pub fn is_format(&self) -> bool {
        matches!(self.kind, ErrorKind::Format)
    }

    pub fn is_ownership(&self) -> bool {
        matches!(self.kind, ErrorKind::Ownership)
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self.kind, ErrorKind::Conversion)
    }

    /// Create an error of the given kind. Useful for third-party adapters and
    /// converters.
    pub fn new(kind: ErrorKind, msg: impl Display) -> Self {
        Self {
            msg: msg.to_string(),
            kind,
        }
    }

    pub fn registration(msg: impl Display) -> Self {
        Self::new(ErrorKind::Registration, msg)
    }

    pub fn format(msg: impl Display) -> Self {
        Self::new(ErrorKind::Format, msg)
    }

    pub fn ownership(msg: impl Display) -> Self {
        Self::new(ErrorKind::Ownership, msg)
    }

    pub fn conversion(msg: impl Display) -> Self {
        Self::new(ErrorKind::Conversion, msg)
    }

    pub(crate) fn invalid_tag(id: u8) -> Self {
        Self::registration(format!("no tag kind registered for id {}", id))
    }

    pub(crate) fn unregistered_kind(kind: TagKind) -> Self {
        Self::registration(format!("no id registered for {}", kind))
    }

    pub(crate) fn no_root_compound() -> Self {
        Self::format("invalid nbt: no root compound")
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::format("eof: unexpectedly ran out of input")
    }

    pub(crate) fn negative_len(len: i32) -> Self {
        Self::format(format!("invalid nbt: negative length {}", len))
    }

    pub(crate) fn nonunicode_string(data: &[u8]) -> Self {
        Self::format(format!(
            "invalid nbt string: nonunicode: {}",
            String::from_utf8_lossy(data)
        ))
    }

    pub(crate) fn already_parented(kind: TagKind) -> Self {
        Self::ownership(format!(
            "{} already belongs to a container, remove it first",
            kind
        ))
    }

    pub(crate) fn mismatch(expected: impl Display, found: impl Display) -> Self {
        Self::conversion(format!("expected {}, found {}", expected, found))
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            // Running dry part way through a tag means the data is truncated.
            std::io::ErrorKind::UnexpectedEof => Self::unexpected_eof(),
            kind => Self {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Io(kind),
            },
        }
    }
}
