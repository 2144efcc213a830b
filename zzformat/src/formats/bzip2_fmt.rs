use std::fmt::{self, Display};
use std::io::{Read, Write};

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use bzip2::Compression;

use crate::compression::CompressionFormat;

const SIGNATURE: &[u8] = b"BZh";

/// The bzip2 compression format.
#[derive(Copy, Clone, Debug, Default)]
pub struct Bzip2;

impl Display for Bzip2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bzip2")
    }
}

impl CompressionFormat for Bzip2 {
    fn name(&self) -> &str {
        "bzip2"
    }

    fn file_extensions(&self) -> &[&str] {
        &["bz2"]
    }

    fn probe(&self, first_bytes: &[u8]) -> bool {
        first_bytes.starts_with(SIGNATURE)
    }

    fn wrap_in<'a>(&self, inner: Box<dyn Read + 'a>) -> Box<dyn Read + 'a> {
        Box::new(BzDecoder::new(inner))
    }

    fn wrap_out<'a>(&self, inner: Box<dyn Write + 'a>) -> Box<dyn Write + 'a> {
        Box::new(BzEncoder::new(inner, Compression::default()))
    }
}
