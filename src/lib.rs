//! mktor - create BitTorrent metainfo files
//!
//! This library turns a file or a directory tree into a canonical `.torrent`
//! document: an ordered file manifest, a piece-length plan, one SHA-1 digest
//! per fixed-size content piece, and a single-pass bencoded emission with
//! strictly sorted dictionary keys.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 streaming encoder and the integer-literal predicate
//! - [`metainfo`] - manifest, piece plan, extra fields, document writer
//! - [`walk`] - filesystem traversal feeding the manifest
//! - [`hasher`] - parallel piece hashing
//! - [`constants`] - generator string, digest length, piece-length table

pub mod bencode;
pub mod constants;
pub mod hasher;
pub mod metainfo;
pub mod walk;

pub use bencode::{is_integer_literal, BencodeError, Encoder};
pub use hasher::{hash_pieces, PieceDigests};
pub use metainfo::{
    ExtraField, ExtraFields, FileEntry, FileManifest, Metafile, MetainfoError, PiecePlan,
};
pub use walk::scan_tree;
