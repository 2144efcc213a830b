//! The format registry (§4.2): a fixed, ordered set of archive and
//! compression formats, probed in registration order so ambiguous content
//! (e.g. a `.zip` file that libarchive could also open) resolves predictably.

use std::io::Read;

use crate::archive::ArchiveFormat;
use crate::compression::CompressionFormat;
use crate::formats::{bzip2_fmt, cpio, deflate, gzip, libarchive, snappy, tar_fmt, xz, zip_fmt, zstd_fmt};
use crate::Error;

const PROBE_WINDOW: usize = 8192;

/// The registered archive and compression formats.
///
/// Built once via [`Registry::standard`] and shared (typically behind an
/// `Arc`) by every crate that needs to open or identify a container.
pub struct Registry {
    archives: Vec<Box<dyn ArchiveFormat>>,
    compressions: Vec<Box<dyn CompressionFormat>>,
}

/// The outcome of probing a stream's leading bytes against the registry.
pub enum Identification<'a> {
    /// The stream is an archive container in the named format.
    Archive(&'a dyn ArchiveFormat),
    /// The stream is wrapped in the named compression format.
    Compression(&'a dyn CompressionFormat),
    /// Neither an archive nor a compression format claimed the stream.
    Plain,
}

impl Registry {
    /// The standard registry: native formats first, libarchive as the catch-all.
    ///
    /// Archive order: zip, tar, cpio, libarchive.
    /// Compression order: gzip, bzip2, xz, zstd, deflate, snappy.
    pub fn standard() -> Self {
        let archives: Vec<Box<dyn ArchiveFormat>> = vec![
            Box::new(zip_fmt::Zip),
            Box::new(tar_fmt::Tar),
            Box::new(cpio::Cpio),
            Box::new(libarchive::Libarchive),
        ];
        let compressions: Vec<Box<dyn CompressionFormat>> = vec![
            Box::new(gzip::Gzip),
            Box::new(bzip2_fmt::Bzip2),
            Box::new(xz::Xz),
            Box::new(zstd_fmt::Zstd),
            Box::new(deflate::Deflate),
            Box::new(snappy::Snappy),
        ];
        Registry { archives, compressions }
    }

    /// All registered archive formats, in registration order.
    pub fn archive_formats(&self) -> impl Iterator<Item = &dyn ArchiveFormat> {
        self.archives.iter().map(|f| f.as_ref())
    }

    /// All registered compression formats, in registration order.
    pub fn compression_formats(&self) -> impl Iterator<Item = &dyn CompressionFormat> {
        self.compressions.iter().map(|f| f.as_ref())
    }

    /// Look up an archive format by its canonical name (`--archive-format`, `lookInto`).
    pub fn archive_by_name(&self, name: &str) -> Result<&dyn ArchiveFormat, Error> {
        self.archives
            .iter()
            .map(|f| f.as_ref())
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::UnknownFormat { name: name.to_owned() })
    }

    /// Look up a compression format by its canonical name.
    pub fn compression_by_name(&self, name: &str) -> Result<&dyn CompressionFormat, Error> {
        self.compressions
            .iter()
            .map(|f| f.as_ref())
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::UnknownFormat { name: name.to_owned() })
    }

    /// Find the first archive format whose extensions include `ext` (matched
    /// case-insensitively, without the leading dot).
    pub fn archive_by_extension(&self, ext: &str) -> Option<&dyn ArchiveFormat> {
        self.archives
            .iter()
            .map(|f| f.as_ref())
            .find(|f| f.file_extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Find the first compression format whose extensions include `ext`.
    pub fn compression_by_extension(&self, ext: &str) -> Option<&dyn CompressionFormat> {
        self.compressions
            .iter()
            .map(|f| f.as_ref())
            .find(|f| f.file_extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Identify a stream by probing its leading bytes against every
    /// registered format in order, archives before compressions (an archive
    /// format claiming the bytes takes precedence: e.g. zip's local-file
    /// signature is checked before any compression format gets a chance).
    ///
    /// Reads up to [`PROBE_WINDOW`] bytes from `stream` without consuming
    /// more than that from the caller's point of view; callers that need the
    /// consumed bytes back should probe a peekable/buffered reader.
    pub fn identify<'a, R: Read>(&'a self, stream: &mut R) -> Result<Identification<'a>, Error> {
        let mut buf = vec![0u8; PROBE_WINDOW];
        let mut filled = 0;
        while filled < buf.len() {
            match stream.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        buf.truncate(filled);

        for format in &self.archives {
            if format.probe(&buf) {
                return Ok(Identification::Archive(format.as_ref()));
            }
        }
        for format in &self.compressions {
            if format.probe(&buf) {
                return Ok(Identification::Compression(format.as_ref()));
            }
        }
        Ok(Identification::Plain)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn looks_up_by_name() {
        let registry = Registry::standard();
        assert_eq!(registry.archive_by_name("zip").unwrap().name(), "zip");
        assert_eq!(registry.compression_by_name("gzip").unwrap().name(), "gzip");
    }

    #[test]
    fn unknown_name_is_an_error() {
        let registry = Registry::standard();
        assert!(registry.archive_by_name("nonexistent").is_err());
    }

    #[test]
    fn looks_up_by_extension_case_insensitively() {
        let registry = Registry::standard();
        assert_eq!(registry.archive_by_extension("ZIP").unwrap().name(), "zip");
        assert_eq!(registry.compression_by_extension("GZ").unwrap().name(), "gzip");
    }

    #[test]
    fn identifies_gzip_signature() {
        let registry = Registry::standard();
        let mut stream = std::io::Cursor::new(vec![0x1f, 0x8b, 0x08, 0x00]);
        match registry.identify(&mut stream).unwrap() {
            Identification::Compression(format) => assert_eq!(format.name(), "gzip"),
            _ => panic!("expected gzip"),
        }
    }

    #[test]
    fn identifies_zip_signature_before_any_compression() {
        let registry = Registry::standard();
        let mut stream = std::io::Cursor::new(b"PK\x03\x04rest-of-header".to_vec());
        match registry.identify(&mut stream).unwrap() {
            Identification::Archive(format) => assert_eq!(format.name(), "zip"),
            _ => panic!("expected zip"),
        }
    }

    #[test]
    fn unrecognized_bytes_are_plain() {
        let registry = Registry::standard();
        let mut stream = std::io::Cursor::new(b"just some text".to_vec());
        assert!(matches!(registry.identify(&mut stream).unwrap(), Identification::Plain));
    }
}
