use std::fmt::{self, Display};
use std::io::{self, Read, Write};

use crate::compression::CompressionFormat;

const SIGNATURE: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd];

/// The zstd compression format.
#[derive(Copy, Clone, Debug, Default)]
pub struct Zstd;

impl Display for Zstd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zstd")
    }
}

impl CompressionFormat for Zstd {
    fn name(&self) -> &str {
        "zstd"
    }

    fn file_extensions(&self) -> &[&str] {
        &["zst"]
    }

    fn probe(&self, first_bytes: &[u8]) -> bool {
        first_bytes.starts_with(SIGNATURE)
    }

    fn wrap_in<'a>(&self, inner: Box<dyn Read + 'a>) -> Box<dyn Read + 'a> {
        // `wrap_in`/`wrap_out` return a bare stream, so there's no `?` to route a
        // fallible frame-header parse through; construction is deferred to the
        // first `read`/`write` call, where the error can surface as an ordinary
        // `io::Error` instead of panicking on malformed input.
        Box::new(LazyDecoder::Pending(inner))
    }

    fn wrap_out<'a>(&self, inner: Box<dyn Write + 'a>) -> Box<dyn Write + 'a> {
        Box::new(LazyEncoder::Pending(inner))
    }
}

enum LazyDecoder<'a> {
    Pending(Box<dyn Read + 'a>),
    Ready(zstd::stream::read::Decoder<'static, io::BufReader<Box<dyn Read + 'a>>>),
    Poisoned,
}

impl Read for LazyDecoder<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_ready()?;
        match self {
            LazyDecoder::Ready(decoder) => decoder.read(buf),
            LazyDecoder::Pending(_) | LazyDecoder::Poisoned => unreachable!("ensure_ready leaves only Ready or returns Err"),
        }
    }
}

impl LazyDecoder<'_> {
    fn ensure_ready(&mut self) -> io::Result<()> {
        if let LazyDecoder::Pending(_) = self {
            let LazyDecoder::Pending(inner) = std::mem::replace(self, LazyDecoder::Poisoned) else { unreachable!() };
            *self = LazyDecoder::Ready(zstd::stream::read::Decoder::new(inner)?);
        }
        match self {
            LazyDecoder::Ready(_) => Ok(()),
            LazyDecoder::Poisoned => Err(io::Error::new(io::ErrorKind::Other, "zstd decoder failed to initialize")),
            LazyDecoder::Pending(_) => unreachable!(),
        }
    }
}

enum LazyEncoder<'a> {
    Pending(Box<dyn Write + 'a>),
    Ready(zstd::stream::write::AutoFinishEncoder<'static, Box<dyn Write + 'a>>),
    Poisoned,
}

impl LazyEncoder<'_> {
    fn ensure_ready(&mut self) -> io::Result<()> {
        if let LazyEncoder::Pending(_) = self {
            let LazyEncoder::Pending(inner) = std::mem::replace(self, LazyEncoder::Poisoned) else { unreachable!() };
            *self = LazyEncoder::Ready(zstd::stream::write::Encoder::new(inner, 0)?.auto_finish());
        }
        match self {
            LazyEncoder::Ready(_) => Ok(()),
            LazyEncoder::Poisoned => Err(io::Error::new(io::ErrorKind::Other, "zstd encoder failed to initialize")),
            LazyEncoder::Pending(_) => unreachable!(),
        }
    }
}

impl Write for LazyEncoder<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ensure_ready()?;
        match self {
            LazyEncoder::Ready(encoder) => encoder.write(buf),
            LazyEncoder::Pending(_) | LazyEncoder::Poisoned => unreachable!("ensure_ready leaves only Ready or returns Err"),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ensure_ready()?;
        match self {
            LazyEncoder::Ready(encoder) => encoder.flush(),
            LazyEncoder::Pending(_) | LazyEncoder::Poisoned => unreachable!("ensure_ready leaves only Ready or returns Err"),
        }
    }
}
