use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors that can occur while assembling or writing a metainfo file.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// An extra field option was not of the form `key:value`.
    #[error("bad extra field '{0}': expected a key and a value separated by a colon")]
    ExtraFieldSyntax(String),

    /// An extra field key matched one of the required info dictionary keys.
    #[error("extra field key '{0}' collides with a required info dictionary key")]
    ReservedExtraKey(String),

    /// The same extra field key was given twice.
    #[error("duplicate extra field key '{0}'")]
    DuplicateExtraKey(String),

    /// A private torrent was requested without any announce URL.
    #[error("a private torrent requires at least one announce URL")]
    PrivateWithoutAnnounce,

    /// The torrent has no name.
    #[error("missing torrent name")]
    MissingName,

    /// File content changed between scanning and hashing.
    #[error("content changed while hashing: expected {expected} bytes, read {actual}")]
    ContentChanged { expected: u64, actual: u64 },

    /// Writing the document failed.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// An I/O error outside the encoder.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An invariant the earlier stages should have upheld was violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}
