//! The compression format capability set (§4.2).

use std::fmt::Display;
use std::io::{Read, Write};

/// The capability set for one compression format (§4.2).
///
/// `Send + Sync` so a [`crate::Registry`] can be shared across the walker's
/// background thread and its parallel directory fan-out without cloning.
pub trait CompressionFormat: Display + Send + Sync {
    /// The format's canonical name, used for `--compression-format` and `lookInto` matching.
    fn name(&self) -> &str;

    /// Filename extensions this format is commonly associated with.
    fn file_extensions(&self) -> &[&str];

    /// Probe a buffer of (up to) the first 8 KiB of a stream for this format's signature.
    fn probe(&self, first_bytes: &[u8]) -> bool;

    /// Wrap a reader with this format's decompressor.
    fn wrap_in<'a>(&self, inner: Box<dyn Read + 'a>) -> Box<dyn Read + 'a>;

    /// Wrap a writer with this format's compressor.
    fn wrap_out<'a>(&self, inner: Box<dyn Write + 'a>) -> Box<dyn Write + 'a>;
}
