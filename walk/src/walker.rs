//! The node enumerator (§4.1): a channel-plus-thread iterator over the same
//! idea as the expand crate's own `walk`, generalized to treat archive
//! entries and compression wrappers as first-class recursion, not a
//! temp-directory extraction.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Sender};
use format::{ArchiveFormat, CompressionFormat, Registry};
use path::NestedPath;
use rayon::prelude::*;

use crate::node::{FormatTag, Node, NodeMeta};
use crate::opener::{arc_cursor, BufferedOpener, ContentOpener, FileOpener};
use crate::options::{ErrorPolicy, Identification, Options, Recursion};
use crate::{invariant, Error};

/// The first-bytes window probed for archive/compression signatures (§4.1: "peeking the first 8 KiB").
const PROBE_WINDOW: usize = 8192;

/// Walk `root`, yielding nodes as a lazy iterator.
///
/// `root` may be a file or a directory (§3's "the empty path represents the
/// input root when the root is a single file"). Enumeration happens on a
/// background thread; the returned iterator blocks on each `next()` until
/// the walker produces the next node, so dropping the iterator early (e.g.
/// `zzfind -prune`) stops the walk without materializing the rest of the tree.
pub fn walk(root: impl AsRef<Path>, options: Options) -> impl Iterator<Item = Result<Node, Error>> {
    let (tx, rx) = bounded(0);
    let root = root.as_ref().to_path_buf();
    thread::spawn(move || walk_root(tx, root, options));
    rx.into_iter()
}

fn walk_root(tx: Sender<Result<Node, Error>>, root: PathBuf, options: Options) {
    let mut sink = Sink::Direct(&tx);
    let result = (|| -> Result<(), Error> {
        let metadata = fs::symlink_metadata(&root)?;
        if metadata.file_type().is_symlink() {
            return invariant!(RootSymlink, root);
        }
        if metadata.is_dir() {
            walk_directory_children(&mut sink, &root, NestedPath::root(), 0, &options)
        } else if metadata.is_file() {
            visit_file(&mut sink, &root, NestedPath::root(), 0, &options)
        } else {
            invariant!(NotWalkable, root)
        }
    })();
    if let Err(err) = result {
        let _ = tx.send(Err(err));
    }
}

/// Either a direct channel sender (the root call) or an in-memory buffer
/// (used while a sibling directory is being walked on a worker thread, so
/// results can be drained to the shared channel in deterministic order
/// once every sibling has finished — §5's ordering guarantee).
enum Sink<'a> {
    Direct(&'a Sender<Result<Node, Error>>),
    Buffer(Vec<Result<Node, Error>>),
}

impl<'a> Sink<'a> {
    /// Emit an item. Returns `false` if the receiving end has gone away
    /// (only meaningful for `Direct`), signaling the walk should stop.
    fn emit(&mut self, item: Result<Node, Error>) -> bool {
        match self {
            Sink::Direct(tx) => tx.send(item).is_ok(),
            Sink::Buffer(buf) => {
                buf.push(item);
                true
            }
        }
    }

    fn into_vec(self) -> Vec<Result<Node, Error>> {
        match self {
            Sink::Buffer(v) => v,
            Sink::Direct(_) => Vec::new(),
        }
    }
}

fn handle_error(sink: &mut Sink<'_>, opts: &Options, path: &str, err: impl Into<Error>) -> Result<(), Error> {
    let err = err.into().at_path(path);
    match opts.on_error {
        ErrorPolicy::Abort => Err(err),
        ErrorPolicy::Skip => {
            sink.emit(Err(err));
            Ok(())
        }
    }
}

fn emit_if_matches(sink: &mut Sink<'_>, node: Node, opts: &Options) {
    let candidate = node.path().as_str().to_owned();
    let visible = opts.filter.as_ref().map_or(true, |g| g.is_match(&candidate));
    if visible {
        sink.emit(Ok(node));
    }
}

fn can_descend(depth: usize, opts: &Options) -> bool {
    match opts.recursion {
        Recursion::Enabled { depth: max } => depth < max,
        Recursion::Disabled => false,
    }
}

fn look_into_matches(opts: &Options, format_name: &str, path: &NestedPath) -> bool {
    opts.look_into
        .as_ref()
        .is_some_and(|li| li.matches(format_name, path.as_str()))
}

fn file_extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

fn identify_compression<'a>(
    registry: &'a Registry,
    ext: Option<&str>,
    head: &[u8],
    identification: Identification,
) -> Option<&'a dyn CompressionFormat> {
    if identification == Identification::ExtensionThenProbe {
        if let Some(ext) = ext {
            if let Some(fmt) = registry.compression_by_extension(ext) {
                return Some(fmt);
            }
        }
    }
    registry.compression_formats().find(|f| f.probe(head))
}

fn identify_archive<'a>(
    registry: &'a Registry,
    ext: Option<&str>,
    head: &[u8],
    identification: Identification,
) -> Option<&'a dyn ArchiveFormat> {
    if identification == Identification::ExtensionThenProbe {
        if let Some(ext) = ext {
            if let Some(fmt) = registry.archive_by_extension(ext) {
                return Some(fmt);
            }
        }
    }
    registry.archive_formats().find(|f| f.probe(head))
}

/// Visit a directory entry, dispatching on its filesystem type.
fn visit_entry(sink: &mut Sink<'_>, fs_path: &Path, path: NestedPath, depth: usize, opts: &Options) -> Result<(), Error> {
    let metadata = match fs::symlink_metadata(fs_path) {
        Ok(m) => m,
        Err(err) => return handle_error(sink, opts, path.as_str(), err),
    };
    if metadata.file_type().is_symlink() {
        // Symlinks are not followed (§4.1); the entry is silently skipped.
        return Ok(());
    }
    if metadata.is_dir() {
        return visit_directory(sink, fs_path, path, depth, opts);
    }
    if metadata.is_file() {
        return visit_file(sink, fs_path, path, depth, opts);
    }
    Ok(())
}

fn visit_directory(sink: &mut Sink<'_>, fs_dir: &Path, path: NestedPath, depth: usize, opts: &Options) -> Result<(), Error> {
    let modified = fs::metadata(fs_dir).ok().and_then(|m| m.modified().ok());
    emit_if_matches(
        sink,
        Node::Directory(NodeMeta::new(path.clone(), None, modified, None, FormatTag::File)),
        opts,
    );
    walk_directory_children(sink, fs_dir, path, depth, opts)
}

/// Read and recurse into a directory's children, in sorted order (§4.1),
/// optionally fanning siblings out across a worker pool (§5).
fn walk_directory_children(sink: &mut Sink<'_>, fs_dir: &Path, path: NestedPath, depth: usize, opts: &Options) -> Result<(), Error> {
    let read_dir = match fs::read_dir(fs_dir) {
        Ok(rd) => rd,
        Err(err) => return handle_error(sink, opts, path.as_str(), err),
    };

    let mut children: Vec<(String, PathBuf)> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| (entry.file_name().to_string_lossy().into_owned(), entry.path()))
        .collect();

    if opts.sort {
        children.sort_by(|a, b| a.0.cmp(&b.0));
    }

    if opts.parallel && children.len() > 1 {
        let outcomes: Vec<(Vec<Result<Node, Error>>, Result<(), Error>)> = children
            .par_iter()
            .map(|(name, child_fs_path)| {
                let mut buffer = Sink::Buffer(Vec::new());
                let child_path = path.join_dir(name);
                let result = visit_entry(&mut buffer, child_fs_path, child_path, depth, opts);
                (buffer.into_vec(), result)
            })
            .collect();

        for (items, result) in outcomes {
            for item in items {
                if !sink.emit(item) {
                    return Ok(());
                }
            }
            result?;
        }
    } else {
        for (name, child_fs_path) in &children {
            let child_path = path.join_dir(name);
            visit_entry(sink, child_fs_path, child_path, depth, opts)?;
        }
    }
    Ok(())
}

/// Visit a real filesystem file: peek its head, classify, and either
/// recurse (materializing the rest of the file only when descent is
/// warranted) or emit it as a cheaply re-openable leaf.
fn visit_file(sink: &mut Sink<'_>, fs_path: &Path, path: NestedPath, depth: usize, opts: &Options) -> Result<(), Error> {
    let metadata = match fs::metadata(fs_path) {
        Ok(m) => m,
        Err(err) => return handle_error(sink, opts, path.as_str(), err),
    };
    let mut file = match fs::File::open(fs_path) {
        Ok(f) => f,
        Err(err) => return handle_error(sink, opts, path.as_str(), err),
    };

    let local_name = path.local_name().to_owned();
    let ext = file_extension(&local_name);
    let mut head = vec![0u8; PROBE_WINDOW];
    let filled = match read_up_to(&mut file, &mut head) {
        Ok(n) => n,
        Err(err) => return handle_error(sink, opts, path.as_str(), err),
    };
    head.truncate(filled);
    let size = Some(metadata.len());
    let modified = metadata.modified().ok();

    if let Some(cfmt) = identify_compression(&opts.registry, ext, &head, opts.identification) {
        let name = cfmt.name().to_owned();
        if can_descend(depth, opts) && look_into_matches(opts, &name, &path) {
            let mut rest = Vec::new();
            if let Err(err) = file.read_to_end(&mut rest) {
                return handle_error(sink, opts, path.as_str(), err);
            }
            head.extend(rest);
            let mut decompressed = cfmt.wrap_in(Box::new(std::io::Cursor::new(head)));
            let mut buf = Vec::new();
            if let Err(err) = decompressed.read_to_end(&mut buf) {
                return handle_error(sink, opts, path.as_str(), err);
            }
            drop(decompressed);
            return visit_bytes(sink, path.join_compression(), Arc::new(buf), None, modified, depth + 1, opts);
        }
        let opener: Box<dyn ContentOpener> = Box::new(FileOpener::new(fs_path));
        emit_if_matches(
            sink,
            Node::Leaf {
                meta: NodeMeta::new(path, size, modified, None, FormatTag::Compression(name)),
                opener,
            },
            opts,
        );
        return Ok(());
    }

    if let Some(afmt) = identify_archive(&opts.registry, ext, &head, opts.identification) {
        let name = afmt.name().to_owned();
        if can_descend(depth, opts) && look_into_matches(opts, &name, &path) {
            emit_if_matches(
                sink,
                Node::ArchiveContainer(NodeMeta::new(path.clone(), size, modified, None, FormatTag::Archive(name.clone()))),
                opts,
            );
            let mut rest = Vec::new();
            if let Err(err) = file.read_to_end(&mut rest) {
                return handle_error(sink, opts, path.as_str(), err);
            }
            head.extend(rest);
            let content: Box<dyn Read> = Box::new(std::io::Cursor::new(head));
            return visit_archive_entries(sink, afmt, &path, content, depth + 1, opts);
        }
        let opener: Box<dyn ContentOpener> = Box::new(FileOpener::new(fs_path));
        emit_if_matches(
            sink,
            Node::Leaf {
                meta: NodeMeta::new(path, size, modified, None, FormatTag::Archive(name)),
                opener,
            },
            opts,
        );
        return Ok(());
    }

    let opener: Box<dyn ContentOpener> = Box::new(FileOpener::new(fs_path));
    emit_if_matches(
        sink,
        Node::Leaf {
            meta: NodeMeta::new(path, size, modified, None, FormatTag::File),
            opener,
        },
        opts,
    );
    Ok(())
}

/// Visit already-materialized content: a decompressed stream, or an
/// archive entry's bytes. `bytes` is shared so the eventual leaf opener
/// never copies it.
fn visit_bytes(
    sink: &mut Sink<'_>,
    path: NestedPath,
    bytes: Arc<Vec<u8>>,
    size_hint: Option<u64>,
    modified: Option<std::time::SystemTime>,
    depth: usize,
    opts: &Options,
) -> Result<(), Error> {
    let local_name = path.local_name().to_owned();
    let ext = file_extension(&local_name);
    let head_len = bytes.len().min(PROBE_WINDOW);
    let head = bytes[..head_len].to_vec();

    if let Some(cfmt) = identify_compression(&opts.registry, ext, &head, opts.identification) {
        let name = cfmt.name().to_owned();
        if can_descend(depth, opts) && look_into_matches(opts, &name, &path) {
            let reader = arc_cursor(Arc::clone(&bytes));
            let mut decompressed = cfmt.wrap_in(reader);
            let mut buf = Vec::new();
            if let Err(err) = decompressed.read_to_end(&mut buf) {
                return handle_error(sink, opts, path.as_str(), err);
            }
            drop(decompressed);
            return visit_bytes(sink, path.join_compression(), Arc::new(buf), None, modified, depth + 1, opts);
        }
        let opener: Box<dyn ContentOpener> = Box::new(BufferedOpener::from_arc(Arc::clone(&bytes)));
        emit_if_matches(
            sink,
            Node::Leaf {
                meta: NodeMeta::new(path, size_hint, modified, None, FormatTag::Compression(name)),
                opener,
            },
            opts,
        );
        return Ok(());
    }

    if let Some(afmt) = identify_archive(&opts.registry, ext, &head, opts.identification) {
        let name = afmt.name().to_owned();
        if can_descend(depth, opts) && look_into_matches(opts, &name, &path) {
            emit_if_matches(
                sink,
                Node::ArchiveContainer(NodeMeta::new(path.clone(), size_hint, modified, None, FormatTag::Archive(name))),
                opts,
            );
            let reader = arc_cursor(Arc::clone(&bytes));
            return visit_archive_entries(sink, afmt, &path, reader, depth + 1, opts);
        }
        let opener: Box<dyn ContentOpener> = Box::new(BufferedOpener::from_arc(Arc::clone(&bytes)));
        emit_if_matches(
            sink,
            Node::Leaf {
                meta: NodeMeta::new(path, size_hint, modified, None, FormatTag::Archive(name)),
                opener,
            },
            opts,
        );
        return Ok(());
    }

    let opener: Box<dyn ContentOpener> = Box::new(BufferedOpener::from_arc(bytes));
    emit_if_matches(
        sink,
        Node::Leaf {
            meta: NodeMeta::new(path, size_hint, modified, None, FormatTag::File),
            opener,
        },
        opts,
    );
    Ok(())
}

/// Drain every entry from an opened archive reader, in the reader's native
/// order (§4.1's "archive entries: the archive reader's native order").
fn visit_archive_entries(
    sink: &mut Sink<'_>,
    afmt: &dyn ArchiveFormat,
    container_path: &NestedPath,
    content: Box<dyn Read>,
    depth: usize,
    opts: &Options,
) -> Result<(), Error> {
    let mut reader = match afmt.open_reader(content) {
        Ok(r) => r,
        Err(err) => return handle_error(sink, opts, container_path.as_str(), err),
    };

    loop {
        let handle = match reader.next_entry() {
            Ok(Some(handle)) => handle,
            Ok(None) => break,
            Err(err) => {
                handle_error(sink, opts, container_path.as_str(), err)?;
                break;
            }
        };

        let entry_path = container_path.join_archive_entry(&handle.meta.name);
        if handle.meta.is_dir {
            emit_if_matches(
                sink,
                Node::Directory(NodeMeta::new(
                    entry_path,
                    handle.meta.size,
                    handle.meta.modified,
                    handle.meta.crc32,
                    FormatTag::Archive(afmt.name().to_owned()),
                )),
                opts,
            );
            continue;
        }

        let mut content = handle.content;
        let mut buf = Vec::new();
        let read_result = content.read_to_end(&mut buf);
        drop(content);
        if let Err(err) = read_result {
            handle_error(sink, opts, entry_path.as_str(), err)?;
            continue;
        }

        let size_hint = handle.meta.size.or(Some(buf.len() as u64));
        visit_bytes(sink, entry_path, Arc::new(buf), size_hint, handle.meta.modified, depth, opts)?;
    }
    Ok(())
}

fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
