//! The pack assembler (§4.7): the engine behind `zzpack`.
//!
//! [`pack`] collects an ordered list of inputs (files or directory trees,
//! walked the same way the node enumerator walks them) into a flat list of
//! entries, then writes them through a single [`format::ArchiveWriter`],
//! optionally wrapped in one [`format::CompressionFormat`] at the top —
//! mirroring how `transform`'s archive rewriting opens a reader/writer pair
//! from the same registry, just without a reader on this side.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
mod options;

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use format::EntryMeta;
use walk::{ContentOpener, Node};

pub use error::Error;
pub use options::{PackOptions, RenameRule};

/// One entry destined for the output archive, collected before any writer is opened.
struct PendingEntry {
    name: String,
    size: Option<u64>,
    modified: Option<SystemTime>,
    is_dir: bool,
    content: Content,
}

enum Content {
    Empty,
    File(PathBuf),
    Opener(Box<dyn ContentOpener>),
}

impl Content {
    fn open(&self) -> io::Result<Box<dyn Read>> {
        match self {
            Content::Empty => Ok(Box::new(io::empty())),
            Content::File(path) => Ok(Box::new(File::open(path)?)),
            Content::Opener(opener) => opener.open(),
        }
    }
}

/// Pack `inputs`, in the given order, into one archive written to `output`.
///
/// Each input is either a single file (one entry, named by its file name)
/// or a directory (walked via the node enumerator; entry names are each
/// descendant's path relative to that input, per §4.7). Within a directory
/// input, members are sorted according to `options.sort`; across inputs, the
/// caller's order is preserved.
pub fn pack(inputs: &[PathBuf], output: &mut dyn Write, options: &PackOptions) -> Result<(), Error> {
    let entries = collect_entries(inputs, options)?;

    let archive_fmt = options.registry.archive_by_name(&options.archive_format)?;
    if !archive_fmt.can_write() {
        return Err(format::Error::UnsupportedWrite {
            name: options.archive_format.clone(),
        }
        .into());
    }

    let mut compressor;
    let sink: &mut dyn Write = match &options.compression_format {
        Some(name) => {
            let compression_fmt = options.registry.compression_by_name(name)?;
            compressor = compression_fmt.wrap_out(Box::new(output));
            compressor.as_mut()
        }
        None => output,
    };

    let mut writer = archive_fmt.open_writer(Box::new(sink))?;
    let mut written_names: std::collections::HashSet<String> = std::collections::HashSet::new();

    for entry in &entries {
        let name = match &options.rename {
            Some(rule) => rule.apply(&entry.name),
            None => entry.name.clone(),
        };
        if !written_names.insert(name.clone()) {
            return Err(Error::DuplicateEntry { name });
        }

        let meta = EntryMeta::builder()
            .name(name)
            .size(entry.size)
            .modified(entry.modified)
            .is_dir(entry.is_dir)
            .build();

        let mut content = entry.content.open()?;
        writer.add_entry(&meta, &mut *content)?;
    }

    writer.finish()?;
    Ok(())
}

fn collect_entries(inputs: &[PathBuf], options: &PackOptions) -> Result<Vec<PendingEntry>, Error> {
    let mut entries = Vec::new();

    for input in inputs {
        let metadata = std::fs::metadata(input)?;
        if metadata.is_file() {
            let name = file_name_of(input)?;
            entries.push(PendingEntry {
                name,
                size: Some(metadata.len()),
                modified: metadata.modified().ok(),
                is_dir: false,
                content: Content::File(input.clone()),
            });
            continue;
        }
        if !metadata.is_dir() {
            return Err(Error::NotPackable { path: input.clone() });
        }

        let walk_options = match &options.look_into {
            Some(glob) => walk::Options::builder().sort(options.sort).look_into(glob.clone()).build(),
            None => walk::Options::builder().sort(options.sort).build(),
        };
        for result in walk::walk(input, walk_options) {
            let node = result?;
            let name = node.path().as_str().replace(['!', '%'], "/");
            match node {
                Node::Directory(meta) | Node::ArchiveContainer(meta) => {
                    entries.push(PendingEntry {
                        name,
                        size: None,
                        modified: meta.modified(),
                        is_dir: true,
                        content: Content::Empty,
                    });
                }
                Node::Leaf { meta, opener } => {
                    entries.push(PendingEntry {
                        name,
                        size: meta.size(),
                        modified: meta.modified(),
                        is_dir: false,
                        content: Content::Opener(opener),
                    });
                }
            }
        }
    }

    Ok(entries)
}

fn file_name_of(path: &Path) -> Result<String, Error> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::NotPackable { path: path.to_owned() })
}
