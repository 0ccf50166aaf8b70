//! Bencode encoding ([BEP-3]).
//!
//! Bencode is the serialization format used for `.torrent` files. This module
//! provides a streaming encoder for the four bencode data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! The encoder writes straight to any [`std::io::Write`] sink with no
//! intermediate value tree, so a metainfo document is emitted in one pass.
//! It is a pure codec: dictionary keys must be supplied in ascending
//! lexicographic byte order by the caller, the encoder never reorders or
//! deduplicates them.
//!
//! # Examples
//!
//! ```
//! use mktor::bencode::Encoder;
//!
//! let mut buf = Vec::new();
//! let mut enc = Encoder::new(&mut buf);
//! enc.dict_begin().unwrap();
//! enc.byte_string(b"name").unwrap();
//! enc.byte_string(b"example.txt").unwrap();
//! enc.byte_string(b"piece length").unwrap();
//! enc.integer(16384).unwrap();
//! enc.dict_end().unwrap();
//! assert_eq!(buf, b"d4:name11:example.txt12:piece lengthi16384ee");
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod encode;
mod error;

pub use encode::{is_integer_literal, Encoder};
pub use error::BencodeError;
