//! The contents transformer pipeline (§4.4): the engine behind `zzpatch`.
//!
//! [`transform`] is a single recursive function whose behavior depends on
//! what its input turns out to be once probed against the [format
//! registry](format::Registry): a leaf runs the [`leaf`] pipeline; a
//! compressed stream is unwrapped, recursed into, and rewrapped; an archive
//! is rewritten entry by entry, honoring remove predicates, rename rules,
//! and post-pass add rules.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
mod leaf;
mod lines;
mod options;
mod patch;

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read, Write};

use format::{ArchiveFormat, ArchiveReader, ArchiveWriter, CompressionFormat, EntryMeta, Identification};

pub use error::Error;
pub use leaf::{LeafTransformer, NoOpTransformer, PatchTransformer, RenameTransformer, SubstituteCondition, SubstituteTransformer, UpdateTransformer};
pub use options::{AddRule, TransformOptions};

/// Mirrors [`format::Registry`]'s own probe window; re-declared here since
/// the registry keeps it private and `transform` needs to read a node fully
/// before deciding how to recurse into it anyway.
const PROBE_WINDOW: usize = 8192;

/// Transform `path`'s content from `input` to `output` according to `options`.
///
/// `path` is the node's nested path (§4.3), used to match every predicate
/// (leaf transformers, the remove predicate, rename rules) — not a
/// filesystem path. Content is read fully into memory before being
/// dispatched, matching the rest of this workspace's container-handling
/// style (§3's content-opener contract assumes nodes are reasonably sized).
pub fn transform(path: &str, input: &mut dyn Read, output: &mut dyn Write, options: &TransformOptions) -> Result<(), Error> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let head_len = bytes.len().min(PROBE_WINDOW);

    match options.registry.identify(&mut io::Cursor::new(&bytes[..head_len]))? {
        Identification::Archive(fmt) => transform_archive(path, fmt, bytes, output, options),
        Identification::Compression(fmt) => transform_compressed(path, fmt, bytes, output, options),
        Identification::Plain => transform_leaf(path, &bytes, output, options),
    }
}

fn transform_leaf(path: &str, bytes: &[u8], output: &mut dyn Write, options: &TransformOptions) -> Result<(), Error> {
    let mut current = bytes.to_vec();
    for transformer in &options.leaf_transformers {
        if !transformer.matches(path) {
            continue;
        }
        log::debug!("applying {transformer} to {path}");
        let mut next = Vec::new();
        transformer.apply(path, &mut current.as_slice(), &mut next)?;
        current = next;
    }
    output.write_all(&current)?;
    Ok(())
}

fn transform_compressed(path: &str, fmt: &dyn CompressionFormat, bytes: Vec<u8>, output: &mut dyn Write, options: &TransformOptions) -> Result<(), Error> {
    let mut decompressed = fmt.wrap_in(Box::new(io::Cursor::new(bytes)));
    let mut plain = Vec::new();
    decompressed.read_to_end(&mut plain)?;
    drop(decompressed);

    let mut rewritten = Vec::new();
    transform(path, &mut io::Cursor::new(plain), &mut rewritten, options)?;

    let out_fmt = match &options.compression_override {
        Some(name) => options.registry.compression_by_name(name)?,
        None => fmt,
    };
    let mut compressor = out_fmt.wrap_out(Box::new(output));
    compressor.write_all(&rewritten)?;
    Ok(())
}

fn transform_archive(path: &str, fmt: &dyn ArchiveFormat, bytes: Vec<u8>, output: &mut dyn Write, options: &TransformOptions) -> Result<(), Error> {
    let mut reader = fmt.open_reader(Box::new(io::Cursor::new(bytes)))?;
    let mut writer = fmt.open_writer(Box::new(output))?;
    let mut written_names: HashSet<String> = HashSet::new();

    while let Some(entry) = reader.next_entry()? {
        let entry_path = format!("{path}!{}", entry.meta.name);

        if let Some(remove) = &options.remove {
            if remove.is_match(&entry_path) {
                log::debug!("removing entry {entry_path}");
                continue;
            }
        }

        let mut meta = entry.meta;
        if let Some(new_name) = resolve_rename(&entry_path, options) {
            log::debug!("renaming entry {entry_path} to {new_name}");
            meta.name = new_name;
        }
        if !written_names.insert(meta.name.clone()) {
            return Err(Error::DuplicateEntry { path: path.to_owned(), name: meta.name });
        }

        if meta.is_dir {
            writer.add_entry(&meta, &mut io::empty())?;
            continue;
        }

        let mut rewritten = Vec::new();
        let mut content = entry.content;
        transform(&entry_path, &mut *content, &mut rewritten, options)?;
        meta.size = Some(rewritten.len() as u64);
        writer.add_entry(&meta, &mut rewritten.as_slice())?;
    }

    for rule in &options.add_rules {
        if !rule.target_archive.is_match(path) {
            continue;
        }
        if !written_names.insert(rule.entry_name.clone()) {
            return Err(Error::DuplicateEntry { path: path.to_owned(), name: rule.entry_name.clone() });
        }
        let entry_path = format!("{path}!{}", rule.entry_name);
        log::debug!("adding entry {entry_path} from {}", rule.source.display());
        let mut source = File::open(&rule.source)?;
        let mut rewritten = Vec::new();
        transform(&entry_path, &mut source, &mut rewritten, options)?;
        let meta = EntryMeta::builder().name(rule.entry_name.clone()).size(Some(rewritten.len() as u64)).build();
        writer.add_entry(&meta, &mut rewritten.as_slice())?;
    }

    writer.finish()?;
    Ok(())
}

/// Scan the leaf-transformer pipeline for rename decisions matching `path`,
/// in declaration order; the last matching rename wins, consistently with
/// running the whole ordered pipeline once per entry.
fn resolve_rename(path: &str, options: &TransformOptions) -> Option<String> {
    let mut result = None;
    for transformer in &options.leaf_transformers {
        if transformer.matches(path) {
            if let Some(name) = transformer.rename(path) {
                result = Some(name);
            }
        }
    }
    result
}
