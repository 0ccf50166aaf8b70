//! Parallel SHA-1 piece hashing.
//!
//! The content of a torrent is the concatenation of its files in manifest
//! order, chunked into fixed-size pieces with no padding in between. Each
//! piece's digest is independent of every other, so hashing fans out to a
//! fixed pool of worker threads:
//!
//! - The calling thread streams file contents into piece-length buffers and
//!   hands each full buffer to the pool over a bounded channel (the bound
//!   keeps at most a few buffers in flight).
//! - Workers hash buffers and report `(piece_index, digest)` back.
//! - A final collection pass writes each digest into slot `piece_index` of a
//!   pre-sized table; workers may finish out of order, the table cannot.
//!
//! Any read error aborts the whole run: new work stops being issued, the
//! workers drain and exit, and the error propagates. There is nothing to
//! retry — a failed run produces no usable digest table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::constants::DIGEST_LENGTH;
use crate::metainfo::{FileManifest, MetainfoError, PiecePlan};

/// The piece digest table: `piece_count` SHA-1 digests, index-aligned with
/// the byte-offset chunking of the content stream.
///
/// Stored flat so the writer can emit the `pieces` value as one opaque blob
/// without another copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceDigests {
    bytes: Vec<u8>,
}

impl PieceDigests {
    /// The table for empty content: zero pieces, zero bytes.
    pub fn empty() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Builds a table from digests already in index order.
    pub fn from_digests(digests: Vec<[u8; DIGEST_LENGTH]>) -> Self {
        let mut bytes = Vec::with_capacity(digests.len() * DIGEST_LENGTH);
        for digest in digests {
            bytes.extend_from_slice(&digest);
        }
        Self { bytes }
    }

    fn zeroed(piece_count: usize) -> Self {
        Self {
            bytes: vec![0; piece_count * DIGEST_LENGTH],
        }
    }

    fn set(&mut self, index: usize, digest: &[u8; DIGEST_LENGTH]) {
        self.bytes[index * DIGEST_LENGTH..(index + 1) * DIGEST_LENGTH].copy_from_slice(digest);
    }

    pub fn piece_count(&self) -> usize {
        self.bytes.len() / DIGEST_LENGTH
    }

    /// The concatenated digests, `piece_count * 20` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Hashes every piece of the manifest's content with a pool of `workers`
/// threads.
///
/// File paths are resolved relative to `base`. The files are read exactly
/// once, in manifest order; if the number of bytes read differs from the
/// manifest's recorded total, the content changed since scanning and the
/// run fails rather than emit a misaligned table.
pub fn hash_pieces(
    base: &Path,
    manifest: &FileManifest,
    plan: &PiecePlan,
    workers: usize,
) -> Result<PieceDigests, MetainfoError> {
    if plan.piece_count == 0 {
        return Ok(PieceDigests::empty());
    }

    let piece_length = plan.piece_length as usize;
    let workers = workers.max(1);
    debug!(
        pieces = plan.piece_count,
        piece_length, workers, "hashing content"
    );

    // work is bounded for backpressure on buffer memory; results are
    // unbounded so workers never block while the reader still holds the
    // work sender
    let (work_tx, work_rx) = bounded::<(usize, Vec<u8>)>(workers * 2);
    let (done_tx, done_rx) = unbounded::<(usize, [u8; DIGEST_LENGTH])>();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move || hash_worker(work_rx, done_tx));
        }
        drop(work_rx);
        drop(done_tx);

        let read_result = feed_pieces(base, manifest, piece_length, &work_tx);
        // closing the work channel lets the pool drain and exit, on the
        // error path too
        drop(work_tx);

        let total_read = read_result?;
        if total_read != manifest.total_size() {
            return Err(MetainfoError::ContentChanged {
                expected: manifest.total_size(),
                actual: total_read,
            });
        }

        let mut table = PieceDigests::zeroed(plan.piece_count as usize);
        for _ in 0..plan.piece_count {
            let (index, digest) = done_rx
                .recv()
                .map_err(|_| MetainfoError::Internal("hash worker exited early"))?;
            table.set(index, &digest);
        }
        Ok(table)
    })
}

fn hash_worker(work_rx: Receiver<(usize, Vec<u8>)>, done_tx: Sender<(usize, [u8; DIGEST_LENGTH])>) {
    for (index, buf) in work_rx {
        let mut hasher = Sha1::new();
        hasher.update(&buf);
        let digest: [u8; DIGEST_LENGTH] = hasher.finalize().into();
        // send fails only when the run is already aborting
        if done_tx.send((index, digest)).is_err() {
            return;
        }
    }
}

/// Reads the manifest's files in order, sending each full piece buffer to
/// the pool. Returns the total number of bytes read.
fn feed_pieces(
    base: &Path,
    manifest: &FileManifest,
    piece_length: usize,
    work_tx: &Sender<(usize, Vec<u8>)>,
) -> Result<u64, MetainfoError> {
    let mut buf: Vec<u8> = Vec::with_capacity(piece_length);
    let mut index = 0usize;
    let mut total = 0u64;

    for entry in manifest.entries() {
        let path = base.join(&entry.path);
        let mut file = File::open(&path)?;
        loop {
            let want = piece_length - buf.len();
            let got = (&mut file).take(want as u64).read_to_end(&mut buf)?;
            total += got as u64;
            if buf.len() == piece_length {
                let full = std::mem::replace(&mut buf, Vec::with_capacity(piece_length));
                work_tx
                    .send((index, full))
                    .map_err(|_| MetainfoError::Internal("hash worker exited early"))?;
                index += 1;
            }
            if got < want {
                break;
            }
        }
    }

    if !buf.is_empty() {
        work_tx
            .send((index, buf))
            .map_err(|_| MetainfoError::Internal("hash worker exited early"))?;
    }

    Ok(total)
}
