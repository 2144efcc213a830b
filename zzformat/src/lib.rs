//! Archive and compression format adapters, and the registry that picks
//! among them (§4.2).
//!
//! Formats are capability-set trait objects (`ArchiveFormat`,
//! `CompressionFormat`), not a type hierarchy: the registry holds them as
//! `Vec<Box<dyn _>>` and dispatches by probing in registration order,
//! falling back to `libarchive` for anything no native format claims.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod archive;
mod compression;
mod error;
mod formats;
mod registry;

pub use archive::{ArchiveFormat, ArchiveReader, ArchiveWriter, EntryHandle, EntryMeta};
pub use compression::CompressionFormat;
pub use error::Error;
pub use registry::{Identification, Registry};
