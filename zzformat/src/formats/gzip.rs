use std::fmt::{self, Display};
use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::compression::CompressionFormat;

const SIGNATURE: [u8; 2] = [0x1f, 0x8b];

/// The gzip compression format.
#[derive(Copy, Clone, Debug, Default)]
pub struct Gzip;

impl Display for Gzip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gzip")
    }
}

impl CompressionFormat for Gzip {
    fn name(&self) -> &str {
        "gzip"
    }

    fn file_extensions(&self) -> &[&str] {
        &["gz", "tgz"]
    }

    fn probe(&self, first_bytes: &[u8]) -> bool {
        first_bytes.starts_with(&SIGNATURE)
    }

    fn wrap_in<'a>(&self, inner: Box<dyn Read + 'a>) -> Box<dyn Read + 'a> {
        Box::new(GzDecoder::new(inner))
    }

    fn wrap_out<'a>(&self, inner: Box<dyn Write + 'a>) -> Box<dyn Write + 'a> {
        Box::new(GzEncoder::new(inner, Compression::default()))
    }
}
