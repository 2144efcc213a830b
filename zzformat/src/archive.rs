//! The archive format capability set (§4.2).

use std::fmt::Display;
use std::io::{Read, Write};
use std::time::SystemTime;

use typed_builder::TypedBuilder;

use crate::Error;

/// Metadata transported for an archive entry. Per §1's non-goals, only name,
/// size, modification time, and (where supported) mode are transported —
/// extended archive metadata is not preserved.
#[derive(Clone, Debug, TypedBuilder)]
pub struct EntryMeta {
    /// The entry's name within the archive (not a full nested path).
    #[builder(setter(into))]
    pub name: String,

    /// The entry's uncompressed size, if known.
    #[builder(default)]
    pub size: Option<u64>,

    /// The entry's modification time, if the format records one.
    #[builder(default)]
    pub modified: Option<SystemTime>,

    /// The entry's unix mode bits, if the format records them.
    #[builder(default)]
    pub mode: Option<u32>,

    /// The entry's CRC-32, if the format records one.
    #[builder(default)]
    pub crc32: Option<u32>,

    /// Whether the entry is itself a directory (no content).
    #[builder(default)]
    pub is_dir: bool,
}

/// One entry produced while reading an archive.
///
/// This is a lending handle rather than an owned value: its content reader
/// borrows the underlying archive reader, exactly as `zip::ZipArchive::by_index`
/// and `tar::Entries` do. Readers are consumed in the order the format provides
/// (§4.1's "archive entries: the archive reader's native order").
pub struct EntryHandle<'a> {
    /// The entry's metadata.
    pub meta: EntryMeta,
    /// The entry's content stream, readable exactly once per `next_entry` call.
    pub content: Box<dyn Read + 'a>,
}

/// A reader over an open archive. Implementations advance strictly forward;
/// re-reading requires reopening the underlying stream (§3's content-opener
/// contract; §4.4's nested-stream reuse optimization is what makes repeat
/// reopens cheap for formats that support it).
pub trait ArchiveReader {
    /// Produce the next entry, or `None` once the archive is exhausted.
    fn next_entry(&mut self) -> Result<Option<EntryHandle<'_>>, Error>;
}

/// A writer for an archive being assembled (§4.4's transform output, §4.7's pack assembler).
pub trait ArchiveWriter {
    /// Append one entry, streaming its content from `content`.
    fn add_entry(&mut self, meta: &EntryMeta, content: &mut dyn Read) -> Result<(), Error>;

    /// Finalize the archive, flushing any trailer the format requires.
    fn finish(self: Box<Self>) -> Result<(), Error>;
}

/// The capability set for one archive format (§4.2).
///
/// Implementations are registered as trait object values, not subclasses:
/// formats are data, and the registry dispatches by value, not by type.
///
/// `Send + Sync` so a [`crate::Registry`] can be shared across the walker's
/// background thread and its parallel directory fan-out without cloning.
pub trait ArchiveFormat: Display + Send + Sync {
    /// The format's canonical name, used for `--archive-format` and `lookInto` matching.
    fn name(&self) -> &str;

    /// Filename extensions this format is commonly associated with.
    fn file_extensions(&self) -> &[&str];

    /// Probe a buffer of (up to) the first 8 KiB of a stream for this format's signature.
    fn probe(&self, first_bytes: &[u8]) -> bool;

    /// Open a reader over `stream`.
    fn open_reader<'a>(&self, stream: Box<dyn Read + 'a>) -> Result<Box<dyn ArchiveReader + 'a>, Error>;

    /// Open a writer over `stream`.
    fn open_writer<'a>(&self, stream: Box<dyn Write + 'a>) -> Result<Box<dyn ArchiveWriter + 'a>, Error>;

    /// Whether this format supports writing at all.
    fn can_write(&self) -> bool;

    /// Whether this format can transport modification times.
    fn preserves_mod_time(&self) -> bool;
}
