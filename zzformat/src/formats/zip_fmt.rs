//! The native `zip` format, also serving `jar` (a zip with a manifest convention).

use std::fmt::{self, Display};
use std::io::{Cursor, Read, Write};

use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::archive::{ArchiveFormat, ArchiveReader, ArchiveWriter, EntryHandle, EntryMeta};
use crate::Error;

/// Magic bytes shared by all zip (and jar) local file headers.
const SIGNATURE: &[u8] = b"PK\x03\x04";

/// The zip archive format.
#[derive(Copy, Clone, Debug, Default)]
pub struct Zip;

impl Display for Zip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zip")
    }
}

impl ArchiveFormat for Zip {
    fn name(&self) -> &str {
        "zip"
    }

    fn file_extensions(&self) -> &[&str] {
        &["zip", "jar", "war", "ear", "apk"]
    }

    fn probe(&self, first_bytes: &[u8]) -> bool {
        first_bytes.starts_with(SIGNATURE)
    }

    fn open_reader<'a>(&self, mut stream: Box<dyn Read + 'a>) -> Result<Box<dyn ArchiveReader + 'a>, Error> {
        // The `zip` crate requires `Seek`; since archive nodes are presented as
        // plain byte streams, buffer fully into memory. Large archives would
        // want a spooled temp file here; this is a reasonable default for the
        // sizes this tool family operates on.
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf)?;
        let archive = ZipArchive::new(Cursor::new(buf))?;
        Ok(Box::new(ZipReader { archive, index: 0 }))
    }

    fn open_writer<'a>(&self, stream: Box<dyn Write + 'a>) -> Result<Box<dyn ArchiveWriter + 'a>, Error> {
        // `zip::ZipWriter` needs `Seek` to patch in its central directory, but
        // archive nodes only promise `Write`. Buffer the output and copy it to
        // the real sink once on `finish`, same tradeoff as the zip reader above.
        Ok(Box::new(ZipWriterAdapter {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            sink: stream,
        }))
    }

    fn can_write(&self) -> bool {
        true
    }

    fn preserves_mod_time(&self) -> bool {
        true
    }
}

/// Convert a zip `DateTime` (MS-DOS precision, local time assumed UTC) to unix seconds.
/// Zip's on-disk timestamp has no timezone, so this is necessarily approximate;
/// it is only used for reporting, not for any correctness-sensitive comparison.
fn chrono_epoch_seconds(dt: &zip::DateTime) -> Option<u64> {
    let days = days_from_civil(dt.year() as i64, dt.month() as u32, dt.day() as u32);
    let secs = days * 86_400
        + dt.hour() as i64 * 3_600
        + dt.minute() as i64 * 60
        + dt.second() as i64;
    u64::try_from(secs).ok()
}

/// Howard Hinnant's `days_from_civil`, the standard branch-free civil-to-epoch-days algorithm.
fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as i64;
    let mp = (m as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

struct ZipReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    index: usize,
}

impl ArchiveReader for ZipReader {
    fn next_entry(&mut self) -> Result<Option<EntryHandle<'_>>, Error> {
        if self.index >= self.archive.len() {
            return Ok(None);
        }
        let index = self.index;
        self.index += 1;

        let file = self.archive.by_index(index)?;
        let modified = file
            .last_modified()
            .and_then(|dt| chrono_epoch_seconds(&dt))
            .and_then(|secs| std::time::UNIX_EPOCH.checked_add(std::time::Duration::from_secs(secs)));
        let meta = EntryMeta::builder()
            .name(file.name().to_owned())
            .size(Some(file.size()))
            .modified(modified)
            .mode(file.unix_mode())
            .crc32(Some(file.crc32()))
            .is_dir(file.is_dir())
            .build();

        Ok(Some(EntryHandle {
            meta,
            content: Box::new(file),
        }))
    }
}

struct ZipWriterAdapter<'a> {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    sink: Box<dyn Write + 'a>,
}

impl<'a> ArchiveWriter for ZipWriterAdapter<'a> {
    fn add_entry(&mut self, meta: &EntryMeta, content: &mut dyn Read) -> Result<(), Error> {
        let options: FileOptions<()> = FileOptions::default();
        let options = if let Some(mode) = meta.mode {
            options.unix_permissions(mode)
        } else {
            options
        };
        if meta.is_dir {
            self.writer.add_directory(&meta.name, options)?;
        } else {
            self.writer.start_file(&meta.name, options)?;
            std::io::copy(content, &mut self.writer)?;
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), Error> {
        let cursor = self.writer.finish()?;
        self.sink.write_all(cursor.get_ref())?;
        Ok(())
    }
}
