//! Concrete archive and compression format implementations.

pub(crate) mod bzip2_fmt;
pub(crate) mod cpio;
pub(crate) mod deflate;
pub(crate) mod gzip;
pub(crate) mod libarchive;
pub(crate) mod snappy;
pub(crate) mod tar_fmt;
pub(crate) mod xz;
pub(crate) mod zip_fmt;
pub(crate) mod zstd_fmt;
