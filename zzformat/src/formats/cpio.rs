//! The `cpio` archive format (new ASCII "newc" variant only; read-only).
//!
//! `cpio` predates a maintained Rust crate; rather than pull in an unmaintained
//! binding, the "newc" header (the variant modern package managers and RPM
//! actually emit) is small enough to parse directly, the same way this
//! codebase's `berkeleydb` crate hand-parses its own small fixed-format headers.

use std::fmt::{self, Display};
use std::io::{Read, Write};

use crate::archive::{ArchiveFormat, ArchiveReader, ArchiveWriter, EntryHandle, EntryMeta};
use crate::Error;

const MAGIC: &[u8] = b"070701";
const TRAILER: &str = "TRAILER!!!";

/// The cpio archive format (newc variant).
#[derive(Copy, Clone, Debug, Default)]
pub struct Cpio;

impl Display for Cpio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cpio")
    }
}

impl ArchiveFormat for Cpio {
    fn name(&self) -> &str {
        "cpio"
    }

    fn file_extensions(&self) -> &[&str] {
        &["cpio"]
    }

    fn probe(&self, first_bytes: &[u8]) -> bool {
        first_bytes.starts_with(MAGIC)
    }

    fn open_reader<'a>(&self, stream: Box<dyn Read + 'a>) -> Result<Box<dyn ArchiveReader + 'a>, Error> {
        Ok(Box::new(CpioReader { stream, done: false }))
    }

    fn open_writer<'a>(&self, _stream: Box<dyn Write + 'a>) -> Result<Box<dyn ArchiveWriter + 'a>, Error> {
        Err(Error::UnsupportedWrite {
            name: self.name().to_owned(),
        })
    }

    fn can_write(&self) -> bool {
        false
    }

    fn preserves_mod_time(&self) -> bool {
        true
    }
}

struct CpioReader<'a> {
    stream: Box<dyn Read + 'a>,
    done: bool,
}

impl<'a> ArchiveReader for CpioReader<'a> {
    fn next_entry(&mut self) -> Result<Option<EntryHandle<'_>>, Error> {
        if self.done {
            return Ok(None);
        }

        let mut header = [0u8; 110];
        if read_exact_or_eof(&mut self.stream, &mut header)?.is_none() {
            self.done = true;
            return Ok(None);
        }
        if &header[0..6] != MAGIC {
            return Err(Error::CorruptArchive {
                path: "<cpio entry>".into(),
                source: None,
            });
        }

        let field = |range: std::ops::Range<usize>| -> Result<u64, Error> {
            let text = std::str::from_utf8(&header[range]).map_err(|_| Error::CorruptArchive {
                path: "<cpio entry>".into(),
                source: None,
            })?;
            u64::from_str_radix(text, 16).map_err(|_| Error::CorruptArchive {
                path: "<cpio entry>".into(),
                source: None,
            })
        };

        let mode = field(14..22)? as u32;
        let mtime = field(46..54)?;
        let filesize = field(54..62)?;
        let namesize = field(94..102)? as usize;

        let mut name_buf = vec![0u8; namesize];
        self.stream.read_exact(&mut name_buf)?;
        // Name is NUL-terminated; drop the terminator before decoding.
        let name = String::from_utf8_lossy(&name_buf[..namesize.saturating_sub(1)]).into_owned();
        skip_padding(&mut self.stream, 110 + namesize)?;

        if name == TRAILER {
            self.done = true;
            return Ok(None);
        }

        let mut content = vec![0u8; filesize as usize];
        self.stream.read_exact(&mut content)?;
        skip_padding(&mut self.stream, filesize as usize)?;

        let meta = EntryMeta::builder()
            .name(name)
            .size(Some(filesize))
            .modified(
                std::time::UNIX_EPOCH.checked_add(std::time::Duration::from_secs(mtime)),
            )
            .mode(Some(mode))
            .is_dir(mode & 0o170000 == 0o040000)
            .build();

        Ok(Some(EntryHandle {
            meta,
            content: Box::new(std::io::Cursor::new(content)),
        }))
    }
}

/// cpio newc entries are padded to 4-byte boundaries measured from the start of the header.
fn skip_padding(stream: &mut dyn Read, bytes_so_far: usize) -> Result<(), Error> {
    let pad = (4 - (bytes_so_far % 4)) % 4;
    if pad > 0 {
        let mut discard = vec![0u8; pad];
        stream.read_exact(&mut discard)?;
    }
    Ok(())
}

fn read_exact_or_eof(stream: &mut dyn Read, buf: &mut [u8]) -> Result<Option<()>, Error> {
    let mut read = 0;
    while read < buf.len() {
        match stream.read(&mut buf[read..])? {
            0 if read == 0 => return Ok(None),
            0 => {
                return Err(Error::CorruptArchive {
                    path: "<cpio entry>".into(),
                    source: None,
                })
            }
            n => read += n,
        }
    }
    Ok(Some(()))
}
