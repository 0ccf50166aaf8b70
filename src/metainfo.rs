//! Metainfo assembly: from an ordered file manifest to a canonical
//! `.torrent` document.
//!
//! # Overview
//!
//! A metainfo file is one bencoded dictionary describing the content of a
//! torrent: tracker URLs, the file layout, the piece size, and one SHA-1
//! digest per piece. Everything in it is canonical — dictionary keys appear
//! in ascending byte order — so two runs over the same content produce the
//! same info dictionary.
//!
//! The pipeline through this module:
//!
//! - [`FileManifest`] accumulates `(path, size)` entries from the traversal
//!   in case-insensitive path order.
//! - [`PiecePlan`] picks the piece length from the total size (or a user
//!   override) and derives the piece count.
//! - [`ExtraFields`] holds user-supplied `key:value` additions to the info
//!   dictionary, sorted, with reserved and duplicate keys rejected.
//! - [`Metafile`] merges all of the above plus the piece digest table into
//!   one streamed document, interleaving extra fields at their sorted
//!   positions among the required keys.
//!
//! # Examples
//!
//! ```
//! use mktor::hasher::PieceDigests;
//! use mktor::metainfo::{ExtraFields, FileManifest, Metafile, PiecePlan};
//!
//! let manifest = FileManifest::single_file("hello.txt", 0);
//! let plan = PiecePlan::from_total_size(manifest.total_size(), None);
//!
//! let metafile = Metafile {
//!     name: "hello.txt".to_string(),
//!     announce: vec![vec!["http://tracker.example.com/announce".to_string()]],
//!     comment: None,
//!     no_creation_date: true,
//!     private: false,
//!     web_seeds: Vec::new(),
//!     extra: ExtraFields::default(),
//!     target_is_directory: false,
//!     manifest,
//!     plan,
//! };
//!
//! let mut out = Vec::new();
//! metafile.write_to(&PieceDigests::empty(), &mut out).unwrap();
//! assert!(out.starts_with(b"d8:announce"));
//! ```

mod error;
mod extra;
mod manifest;
mod piece;
mod writer;

pub use error::MetainfoError;
pub use extra::{ExtraField, ExtraFields, RESERVED_INFO_KEYS};
pub use manifest::{FileEntry, FileManifest};
pub use piece::PiecePlan;
pub use writer::Metafile;

#[cfg(test)]
mod tests;
