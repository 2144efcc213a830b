use std::fmt::{self, Display};
use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::compression::CompressionFormat;

/// Raw DEFLATE, without gzip's or zlib's header. Has no magic number, so it
/// is only ever selected by name or extension, never by content probe.
#[derive(Copy, Clone, Debug, Default)]
pub struct Deflate;

impl Display for Deflate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deflate")
    }
}

impl CompressionFormat for Deflate {
    fn name(&self) -> &str {
        "deflate"
    }

    fn file_extensions(&self) -> &[&str] {
        &["deflate", "zz"]
    }

    fn probe(&self, _first_bytes: &[u8]) -> bool {
        false
    }

    fn wrap_in<'a>(&self, inner: Box<dyn Read + 'a>) -> Box<dyn Read + 'a> {
        Box::new(DeflateDecoder::new(inner))
    }

    fn wrap_out<'a>(&self, inner: Box<dyn Write + 'a>) -> Box<dyn Write + 'a> {
        Box::new(DeflateEncoder::new(inner, Compression::default()))
    }
}
