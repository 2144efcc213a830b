//! The enumerator's output type (§3's "Node").

use std::fmt;
use std::time::SystemTime;

use path::NestedPath;

use crate::opener::ContentOpener;

/// The format tag carried by every node: which format (if any) produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatTag {
    /// A plain filesystem file or directory, not produced by any codec.
    File,
    /// Produced by the named archive format.
    Archive(String),
    /// Produced by the named compression format.
    Compression(String),
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatTag::File => write!(f, "FILE"),
            FormatTag::Archive(name) | FormatTag::Compression(name) => write!(f, "{name}"),
        }
    }
}

/// Metadata common to every node flavor (§3).
#[derive(Clone, Debug)]
pub struct NodeMeta {
    path: NestedPath,
    size: Option<u64>,
    modified: Option<SystemTime>,
    crc32: Option<u32>,
    format: FormatTag,
}

impl NodeMeta {
    /// Build node metadata.
    pub fn new(path: NestedPath, size: Option<u64>, modified: Option<SystemTime>, crc32: Option<u32>, format: FormatTag) -> Self {
        Self {
            path,
            size,
            modified,
            crc32,
            format,
        }
    }

    /// The node's full nested path.
    pub fn path(&self) -> &NestedPath {
        &self.path
    }

    /// The node's local name (the final path segment).
    pub fn local_name(&self) -> &str {
        self.path.local_name()
    }

    /// The node's size, or `None` if unknown (§3's `-1`).
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// The node's modification time, if known.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// The node's CRC-32, if the producing format records one.
    pub fn crc32(&self) -> Option<u32> {
        self.crc32
    }

    /// The tag identifying the format that produced this node.
    pub fn format(&self) -> &FormatTag {
        &self.format
    }
}

/// A node discovered by the enumerator (§3).
///
/// A `Directory` or `ArchiveContainer` has children that the walker will
/// visit next; a `Leaf` carries a re-openable content producer. An archive
/// or compressed file is emitted as exactly one of `Leaf` (not descended
/// into) or `ArchiveContainer`/wrapped recursion (descended into) within a
/// single pass, never both (§3's invariant).
pub enum Node {
    /// A filesystem directory or an archive's directory-like grouping.
    Directory(NodeMeta),
    /// An archive container that will be descended into.
    ArchiveContainer(NodeMeta),
    /// A leaf with byte contents.
    Leaf {
        /// Common metadata.
        meta: NodeMeta,
        /// A re-openable producer of this leaf's bytes.
        opener: Box<dyn ContentOpener>,
    },
}

impl Node {
    /// The node's metadata, regardless of flavor.
    pub fn meta(&self) -> &NodeMeta {
        match self {
            Node::Directory(meta) | Node::ArchiveContainer(meta) => meta,
            Node::Leaf { meta, .. } => meta,
        }
    }

    /// The node's full nested path.
    pub fn path(&self) -> &NestedPath {
        self.meta().path()
    }

    /// Whether this node is a leaf with an openable content stream.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
