//! Re-openable content producers (§3's "content-opener", §4.4's "streams as
//! first-class values, not hidden state").

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

/// A re-openable producer of a leaf's byte content.
///
/// Invoking `open` more than once must reproduce the same byte sequence
/// (§3's content-opener invariant). Transformers rely on this for
/// `checkBeforeTransformation`'s two-pass scan, and callers may open a node's
/// content long after the walker has moved on to its siblings.
pub trait ContentOpener: Send + Sync {
    /// Open a fresh stream over this content.
    fn open(&self) -> io::Result<Box<dyn Read>>;
}

/// Re-opens a plain filesystem file from its path. This is the common case
/// (most leaves are ordinary files) and the cheapest form of reuse: each call
/// is a real `File::open`, no buffering required.
#[derive(Debug, Clone)]
pub struct FileOpener {
    path: PathBuf,
}

impl FileOpener {
    /// Create an opener for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentOpener for FileOpener {
    fn open(&self) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(fs::File::open(&self.path)?))
    }
}

/// Re-opens from an in-memory buffer.
///
/// Archive entries and compressed streams are read forward-only by
/// `zz-format`'s readers (§4.2's `ArchiveReader::next_entry` lending model),
/// so once the walker has visited such a leaf, reproducing its bytes again
/// means either re-running the whole chain of readers from the root, or
/// keeping the materialized bytes around. This opener takes the latter,
/// simpler and always-correct route; it is the documented fallback the
/// nested-stream reuse optimization (§4.4) falls back to for containers that
/// cannot cheaply reopen from an arbitrary offset.
#[derive(Clone)]
pub struct BufferedOpener {
    bytes: Arc<Vec<u8>>,
}

impl BufferedOpener {
    /// Create an opener over already-materialized bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes: Arc::new(bytes) }
    }

    /// Create an opener sharing an already-`Arc`'d buffer, so a leaf and a
    /// recursive descent into it (e.g. re-probing it as a compressed stream)
    /// can read the same bytes without either side cloning them.
    pub fn from_arc(bytes: Arc<Vec<u8>>) -> Self {
        Self { bytes }
    }
}

impl ContentOpener for BufferedOpener {
    fn open(&self) -> io::Result<Box<dyn Read>> {
        Ok(arc_cursor(Arc::clone(&self.bytes)))
    }
}

/// Open a fresh, independent cursor over a shared buffer without copying it.
pub(crate) fn arc_cursor(bytes: Arc<Vec<u8>>) -> Box<dyn Read> {
    Box::new(ArcCursor { bytes, position: 0 })
}

/// A `Read` cursor over a shared, reference-counted buffer, so that opening
/// the same content twice never copies it.
struct ArcCursor {
    bytes: Arc<Vec<u8>>,
    position: usize,
}

impl Read for ArcCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let slice = &self.bytes[self.position..];
        let n = slice.len().min(buf.len());
        buf[..n].copy_from_slice(&slice[..n]);
        self.position += n;
        Ok(n)
    }
}
