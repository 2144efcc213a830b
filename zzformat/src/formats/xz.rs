use std::fmt::{self, Display};
use std::io::{Read, Write};

use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

use crate::compression::CompressionFormat;

const SIGNATURE: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// The xz/lzma compression format.
#[derive(Copy, Clone, Debug, Default)]
pub struct Xz;

impl Display for Xz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xz")
    }
}

impl CompressionFormat for Xz {
    fn name(&self) -> &str {
        "xz"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xz", "lzma"]
    }

    fn probe(&self, first_bytes: &[u8]) -> bool {
        first_bytes.starts_with(SIGNATURE)
    }

    fn wrap_in<'a>(&self, inner: Box<dyn Read + 'a>) -> Box<dyn Read + 'a> {
        Box::new(XzDecoder::new(inner))
    }

    fn wrap_out<'a>(&self, inner: Box<dyn Write + 'a>) -> Box<dyn Write + 'a> {
        Box::new(XzEncoder::new(inner, 6))
    }
}
