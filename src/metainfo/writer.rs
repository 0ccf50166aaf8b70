use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::error::MetainfoError;
use super::extra::{ExtraField, ExtraFields};
use super::manifest::FileManifest;
use super::piece::PiecePlan;
use crate::bencode::{is_integer_literal, Encoder};
use crate::constants::CREATED_BY;
use crate::hasher::PieceDigests;

/// Everything needed to emit one metainfo document.
///
/// The option-like fields come straight from the command line; `manifest`
/// and `plan` are derived during initialization and frozen before
/// [`Metafile::write_to`] runs.
#[derive(Debug)]
pub struct Metafile {
    /// Torrent name; also the root directory name for directory targets.
    pub name: String,
    /// Announce tiers: the first tier is primary, later tiers are backups.
    pub announce: Vec<Vec<String>>,
    /// Optional free-form comment.
    pub comment: Option<String>,
    /// Suppress the `creation date` field.
    pub no_creation_date: bool,
    /// Emit `private` = 1.
    pub private: bool,
    /// Web seed URLs ([BEP-19]), in the order given.
    ///
    /// [BEP-19]: http://bittorrent.org/beps/bep_0019.html
    pub web_seeds: Vec<String>,
    /// User-supplied extra info dictionary fields.
    pub extra: ExtraFields,
    /// Whether the target was a directory (emit `files`) or a single file
    /// (emit `length`).
    pub target_is_directory: bool,
    /// The files going into the torrent.
    pub manifest: FileManifest,
    /// Piece length and count.
    pub plan: PiecePlan,
}

impl Metafile {
    /// Checks the configuration before any output is produced.
    pub fn validate(&self) -> Result<(), MetainfoError> {
        if self.name.is_empty() {
            return Err(MetainfoError::MissingName);
        }
        if self.private && self.announce.is_empty() {
            return Err(MetainfoError::PrivateWithoutAnnounce);
        }
        Ok(())
    }

    /// Writes the complete metainfo document to `sink` in a single pass.
    ///
    /// Root keys are emitted in ascending order: `announce`,
    /// `announce-list`, `comment`, `created by`, `creation date`, `info`,
    /// `url-list` (optional ones only when set). Inside `info`, stored
    /// extra fields are drained ahead of each required key so the whole
    /// dictionary comes out sorted without ever materializing it.
    ///
    /// Nothing is buffered beyond the sink itself; on failure the sink's
    /// contents are not a valid document and callers should discard them.
    pub fn write_to<W: Write>(self, digests: &PieceDigests, sink: W) -> Result<(), MetainfoError> {
        if digests.piece_count() as u64 != self.plan.piece_count {
            return Err(MetainfoError::Internal(
                "piece digest table does not match the piece plan",
            ));
        }

        debug!(pieces = self.plan.piece_count, "writing metainfo document");
        let mut extra = self.extra;
        let mut enc = Encoder::new(sink);

        enc.dict_begin()?;

        if let Some(primary) = self.announce.first().and_then(|tier| tier.first()) {
            enc.byte_string(b"announce")?;
            enc.byte_string(primary.as_bytes())?;
            // announce-list only carries information beyond `announce` when
            // there is a second URL anywhere
            if self.announce.len() > 1 || self.announce[0].len() > 1 {
                enc.byte_string(b"announce-list")?;
                enc.list_begin()?;
                for tier in &self.announce {
                    enc.list_begin()?;
                    for url in tier {
                        enc.byte_string(url.as_bytes())?;
                    }
                    enc.list_end()?;
                }
                enc.list_end()?;
            }
        }

        if let Some(comment) = &self.comment {
            enc.byte_string(b"comment")?;
            enc.byte_string(comment.as_bytes())?;
        }

        enc.byte_string(b"created by")?;
        enc.byte_string(CREATED_BY.as_bytes())?;

        if !self.no_creation_date {
            enc.byte_string(b"creation date")?;
            enc.integer(unix_now())?;
        }

        enc.byte_string(b"info")?;
        enc.dict_begin()?;

        if self.target_is_directory {
            emit_extra(&mut enc, extra.drain_until(Some("files")))?;
            enc.byte_string(b"files")?;
            enc.list_begin()?;
            for entry in self.manifest.entries() {
                enc.dict_begin()?;
                enc.byte_string(b"length")?;
                enc.integer(entry.size as i64)?;
                enc.byte_string(b"path")?;
                enc.list_begin()?;
                for component in entry.path.split('/') {
                    enc.byte_string(component.as_bytes())?;
                }
                enc.list_end()?;
                enc.dict_end()?;
            }
            enc.list_end()?;
        } else {
            emit_extra(&mut enc, extra.drain_until(Some("length")))?;
            let size = self
                .manifest
                .entries()
                .first()
                .map(|entry| entry.size)
                .ok_or(MetainfoError::Internal("single-file manifest is empty"))?;
            enc.byte_string(b"length")?;
            enc.integer(size as i64)?;
        }

        emit_extra(&mut enc, extra.drain_until(Some("name")))?;
        enc.byte_string(b"name")?;
        enc.byte_string(self.name.as_bytes())?;

        emit_extra(&mut enc, extra.drain_until(Some("piece length")))?;
        enc.byte_string(b"piece length")?;
        enc.integer(self.plan.piece_length as i64)?;

        emit_extra(&mut enc, extra.drain_until(Some("pieces")))?;
        enc.byte_string(b"pieces")?;
        enc.byte_string(digests.as_bytes())?;

        if self.private {
            emit_extra(&mut enc, extra.drain_until(Some("private")))?;
            enc.byte_string(b"private")?;
            enc.integer(1)?;
        }

        emit_extra(&mut enc, extra.drain_until(None))?;
        enc.dict_end()?;

        match self.web_seeds.as_slice() {
            [] => {}
            [only] => {
                enc.byte_string(b"url-list")?;
                enc.byte_string(only.as_bytes())?;
            }
            many => {
                enc.byte_string(b"url-list")?;
                enc.list_begin()?;
                for url in many {
                    enc.byte_string(url.as_bytes())?;
                }
                enc.list_end()?;
            }
        }

        enc.dict_end()?;
        enc.flush()?;
        Ok(())
    }
}

/// Writes drained extra fields, deciding per value between a byte string
/// and a verbatim integer token.
fn emit_extra<W: Write>(
    enc: &mut Encoder<W>,
    fields: Vec<ExtraField>,
) -> Result<(), MetainfoError> {
    for field in fields {
        // the store rejects empty keys at insert time
        if field.key.is_empty() {
            return Err(MetainfoError::Internal("extra field with an empty key"));
        }
        enc.byte_string(field.key.as_bytes())?;
        if is_integer_literal(&field.value) {
            enc.raw(field.value.as_bytes())?;
        } else {
            enc.byte_string(field.value.as_bytes())?;
        }
    }
    Ok(())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
