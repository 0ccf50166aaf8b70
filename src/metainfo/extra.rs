use super::error::MetainfoError;

/// The seven keys the assembler itself owns inside the info dictionary.
///
/// User-supplied extra fields must not collide with any of these. `md5sum`
/// is reserved even though this pipeline never emits it.
pub const RESERVED_INFO_KEYS: [&str; 7] = [
    "files",
    "length",
    "md5sum",
    "name",
    "piece length",
    "pieces",
    "private",
];

/// One user-supplied info dictionary field.
///
/// The value is kept as the raw string given on the command line; whether it
/// is emitted as a byte string or as an integer token is decided at write
/// time via [`crate::bencode::is_integer_literal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraField {
    pub key: String,
    pub value: String,
}

/// User-supplied extra info dictionary fields, kept sorted by key.
///
/// Fields are inserted from `key:value` option strings and later merged into
/// the required-key stream by the metainfo writer: before each required key
/// the writer drains every stored field sorting ahead of it, so the info
/// dictionary comes out in one ascending pass.
///
/// # Examples
///
/// ```
/// use mktor::metainfo::ExtraFields;
///
/// let mut extra = ExtraFields::default();
/// extra.insert("source:EXAMPLE").unwrap();
/// extra.insert("author:me").unwrap();
///
/// // `author` sorts before `name`, `source` does not
/// let before_name = extra.drain_until(Some("name"));
/// assert_eq!(before_name.len(), 1);
/// assert_eq!(before_name[0].key, "author");
///
/// let rest = extra.drain_until(None);
/// assert_eq!(rest[0].key, "source");
/// ```
#[derive(Debug, Default)]
pub struct ExtraFields {
    fields: Vec<ExtraField>,
}

impl ExtraFields {
    /// Parses `key:value` and inserts the field at its sorted position.
    ///
    /// The string is split at the first colon; the colon itself is
    /// discarded, so the value may contain further colons. Fails if there is
    /// no colon, the key is empty, the key is reserved, or the key is
    /// already present.
    pub fn insert(&mut self, spec: &str) -> Result<(), MetainfoError> {
        let (key, value) = spec
            .split_once(':')
            .ok_or_else(|| MetainfoError::ExtraFieldSyntax(spec.to_string()))?;
        if key.is_empty() {
            return Err(MetainfoError::ExtraFieldSyntax(spec.to_string()));
        }
        if RESERVED_INFO_KEYS.contains(&key) {
            return Err(MetainfoError::ReservedExtraKey(key.to_string()));
        }

        let pos = self.fields.partition_point(|f| f.key.as_str() < key);
        if self.fields.get(pos).is_some_and(|f| f.key == key) {
            return Err(MetainfoError::DuplicateExtraKey(key.to_string()));
        }
        self.fields.insert(
            pos,
            ExtraField {
                key: key.to_string(),
                value: value.to_string(),
            },
        );
        Ok(())
    }

    /// Removes and returns every field whose key sorts strictly before
    /// `reference`, in ascending order. With no reference, removes and
    /// returns everything left.
    pub fn drain_until(&mut self, reference: Option<&str>) -> Vec<ExtraField> {
        let cut = match reference {
            Some(key) => self.fields.partition_point(|f| f.key.as_str() < key),
            None => self.fields.len(),
        };
        self.fields.drain(..cut).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates the stored fields in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtraField> {
        self.fields.iter()
    }
}
