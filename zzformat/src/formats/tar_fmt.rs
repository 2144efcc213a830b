//! The native `tar` format.

use std::fmt::{self, Display};
use std::io::{Read, Write};
use std::time::{Duration, UNIX_EPOCH};

use tar::{Archive, Builder, EntryType, Header};

use crate::archive::{ArchiveFormat, ArchiveReader, ArchiveWriter, EntryHandle, EntryMeta};
use crate::Error;

/// The POSIX tar format. Tar has no magic at offset zero; it is recognized by
/// the `ustar\0` marker at offset 257, which is well within the 8 KiB probe window.
#[derive(Copy, Clone, Debug, Default)]
pub struct Tar;

impl Display for Tar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tar")
    }
}

impl ArchiveFormat for Tar {
    fn name(&self) -> &str {
        "tar"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tar"]
    }

    fn probe(&self, first_bytes: &[u8]) -> bool {
        first_bytes.len() > 262 && &first_bytes[257..262] == b"ustar"
    }

    fn open_reader<'a>(&self, stream: Box<dyn Read + 'a>) -> Result<Box<dyn ArchiveReader + 'a>, Error> {
        Ok(Box::new(TarReader {
            archive: Archive::new(stream),
        }))
    }

    fn open_writer<'a>(&self, stream: Box<dyn Write + 'a>) -> Result<Box<dyn ArchiveWriter + 'a>, Error> {
        Ok(Box::new(TarWriter {
            builder: Builder::new(stream),
        }))
    }

    fn can_write(&self) -> bool {
        true
    }

    fn preserves_mod_time(&self) -> bool {
        true
    }
}

struct TarReader<'a> {
    archive: Archive<Box<dyn Read + 'a>>,
}

impl<'a> ArchiveReader for TarReader<'a> {
    fn next_entry(&mut self) -> Result<Option<EntryHandle<'_>>, Error> {
        // `tar::Archive::entries` tracks its read position on the archive itself,
        // so re-acquiring the iterator each call and taking one entry from it
        // is equivalent to holding a single long-lived iterator, without the
        // self-referential struct that would otherwise require.
        let mut iter = self.archive.entries()?;
        match iter.next() {
            None => Ok(None),
            Some(entry) => {
                let mut entry = entry?;
                let path = entry.path()?.to_string_lossy().into_owned();
                let meta = EntryMeta::builder()
                    .name(path)
                    .size(Some(entry.header().size()?))
                    .modified(
                        entry
                            .header()
                            .mtime()
                            .ok()
                            .and_then(|secs| UNIX_EPOCH.checked_add(Duration::from_secs(secs))),
                    )
                    .mode(entry.header().mode().ok())
                    .is_dir(entry.header().entry_type() == EntryType::Directory)
                    .build();
                let mut buf = Vec::new();
                entry.read_to_end(&mut buf)?;
                Ok(Some(EntryHandle {
                    meta,
                    content: Box::new(std::io::Cursor::new(buf)),
                }))
            }
        }
    }
}

struct TarWriter<'a> {
    builder: Builder<Box<dyn Write + 'a>>,
}

impl<'a> ArchiveWriter for TarWriter<'a> {
    fn add_entry(&mut self, meta: &EntryMeta, content: &mut dyn Read) -> Result<(), Error> {
        let mut header = Header::new_gnu();
        header.set_size(meta.size.unwrap_or(0));
        header.set_mode(meta.mode.unwrap_or(0o644));
        header.set_entry_type(if meta.is_dir {
            EntryType::Directory
        } else {
            EntryType::Regular
        });
        if let Some(modified) = meta.modified {
            if let Ok(elapsed) = modified.duration_since(UNIX_EPOCH) {
                header.set_mtime(elapsed.as_secs());
            }
        }
        header.set_cksum();
        self.builder.append_data(&mut header, &meta.name, content)?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), Error> {
        self.builder.finish()?;
        Ok(())
    }
}
