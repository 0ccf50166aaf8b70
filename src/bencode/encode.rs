use std::io::Write;

use super::error::BencodeError;

/// A streaming bencode encoder.
///
/// Writes each primitive directly to the underlying sink. Nothing is
/// buffered here, so callers that care about syscall counts should hand in
/// a [`std::io::BufWriter`].
///
/// Lists and dictionaries are emitted as open/close delimiter pairs with the
/// items written in between; the encoder does not track nesting. For
/// dictionaries the caller must emit keys in ascending lexicographic byte
/// order — canonical ordering is the caller's contract, not the encoder's.
///
/// # Examples
///
/// ```
/// use mktor::bencode::Encoder;
///
/// let mut buf = Vec::new();
/// let mut enc = Encoder::new(&mut buf);
/// enc.list_begin().unwrap();
/// enc.byte_string(b"spam").unwrap();
/// enc.integer(42).unwrap();
/// enc.list_end().unwrap();
/// assert_eq!(buf, b"l4:spami42ee");
/// ```
#[derive(Debug)]
pub struct Encoder<W: Write> {
    sink: W,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Emits a byte string: `<decimal length>:<raw bytes>`.
    ///
    /// The length is the exact byte count; the data is written verbatim with
    /// no escaping. An empty string encodes as `0:`.
    pub fn byte_string(&mut self, s: &[u8]) -> Result<(), BencodeError> {
        write!(self.sink, "{}:", s.len())?;
        self.sink.write_all(s)?;
        Ok(())
    }

    /// Emits an integer: `i<decimal>e`.
    ///
    /// Negative values keep their sign; zero is the single digit `0`.
    pub fn integer(&mut self, n: i64) -> Result<(), BencodeError> {
        write!(self.sink, "i{}e", n)?;
        Ok(())
    }

    /// Emits an already-encoded token verbatim.
    ///
    /// Used for values that are themselves legal bencode, e.g. an extra
    /// field whose value passes [`is_integer_literal`] and must not be
    /// re-wrapped as a byte string.
    pub fn raw(&mut self, token: &[u8]) -> Result<(), BencodeError> {
        self.sink.write_all(token)?;
        Ok(())
    }

    /// Opens a list.
    pub fn list_begin(&mut self) -> Result<(), BencodeError> {
        self.sink.write_all(b"l")?;
        Ok(())
    }

    /// Closes a list.
    pub fn list_end(&mut self) -> Result<(), BencodeError> {
        self.sink.write_all(b"e")?;
        Ok(())
    }

    /// Opens a dictionary. Keys must follow in ascending byte order.
    pub fn dict_begin(&mut self) -> Result<(), BencodeError> {
        self.sink.write_all(b"d")?;
        Ok(())
    }

    /// Closes a dictionary.
    pub fn dict_end(&mut self) -> Result<(), BencodeError> {
        self.sink.write_all(b"e")?;
        Ok(())
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> Result<(), BencodeError> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Returns true if `s` is a complete, legal bencoded integer token.
///
/// The token grammar is `i(-?[1-9][0-9]*|0)e`: an optional minus, no leading
/// zeros, and `i0e` as the only form of zero. `i-0e`, `i01e`, `ie`, a bare
/// `i`, and the empty string are all rejected.
///
/// # Examples
///
/// ```
/// use mktor::bencode::is_integer_literal;
///
/// assert!(is_integer_literal("i42e"));
/// assert!(is_integer_literal("i-5e"));
/// assert!(is_integer_literal("i0e"));
/// assert!(!is_integer_literal("i-0e"));
/// assert!(!is_integer_literal("i01e"));
/// assert!(!is_integer_literal("42"));
/// ```
pub fn is_integer_literal(s: &str) -> bool {
    let body = match s.strip_prefix('i').and_then(|rest| rest.strip_suffix('e')) {
        Some(body) => body,
        None => return false,
    };

    let digits = body.strip_prefix('-').unwrap_or(body);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    // no leading zeros, and no negative zero
    if digits.len() > 1 && digits.starts_with('0') {
        return false;
    }
    !(body.starts_with('-') && digits == "0")
}
