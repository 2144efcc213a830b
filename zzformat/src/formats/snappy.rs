use std::fmt::{self, Display};
use std::io::{Read, Write};

use snap::read::FrameDecoder;
use snap::write::FrameEncoder;

use crate::compression::CompressionFormat;

// Framed Snappy streams open with this identifier chunk (type 0xff, length
// 6, body "sNaPpY").
const SIGNATURE: &[u8] = &[0xff, 0x06, 0x00, 0x00, b's', b'N', b'a', b'P', b'p', b'Y'];

/// The framed Snappy compression format.
#[derive(Copy, Clone, Debug, Default)]
pub struct Snappy;

impl Display for Snappy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snappy")
    }
}

impl CompressionFormat for Snappy {
    fn name(&self) -> &str {
        "snappy"
    }

    fn file_extensions(&self) -> &[&str] {
        &["sz"]
    }

    fn probe(&self, first_bytes: &[u8]) -> bool {
        first_bytes.starts_with(SIGNATURE)
    }

    fn wrap_in<'a>(&self, inner: Box<dyn Read + 'a>) -> Box<dyn Read + 'a> {
        Box::new(FrameDecoder::new(inner))
    }

    fn wrap_out<'a>(&self, inner: Box<dyn Write + 'a>) -> Box<dyn Write + 'a> {
        Box::new(FrameEncoder::new(inner))
    }
}
