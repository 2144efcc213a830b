//! The node enumerator (§4.1): a lazy, cancellable walk over a filesystem
//! tree that transparently descends into archives and compression wrappers,
//! synthesizing the nested paths described in §3 and §4.3.
//!
//! The walk runs on a background thread and streams [`Node`]s back over a
//! bounded channel, mirroring the way the archive crate's own expansion walk
//! is structured — except this walker never extracts a container to a temp
//! directory; it descends through `zz-format`'s readers in memory, one level
//! at a time.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
mod node;
mod opener;
mod options;
mod walker;

pub use error::{Error, Invariant};
pub use node::{FormatTag, Node, NodeMeta};
pub use opener::{BufferedOpener, ContentOpener, FileOpener};
pub use options::{ErrorPolicy, Identification, Options, Recursion};
pub use walker::walk;

#[cfg(test)]
mod test {
    use std::fs;
    use std::io::Read;

    use tempfile::tempdir;

    use super::*;

    fn collect(root: &std::path::Path, options: Options) -> Vec<Node> {
        walk(root, options).map(|r| r.expect("walk should not fail")).collect()
    }

    #[test]
    fn walks_a_flat_directory_in_sorted_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let nodes = collect(dir.path(), Options::default());
        let names: Vec<_> = nodes.iter().map(|n| n.path().as_str().to_owned()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn recurses_into_subdirectories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/nested.txt"), b"x").unwrap();

        let nodes = collect(dir.path(), Options::default());
        let names: Vec<_> = nodes.iter().map(|n| n.path().as_str().to_owned()).collect();
        assert_eq!(names, vec!["sub", "sub/nested.txt"]);
    }

    #[test]
    fn single_file_root_is_the_empty_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("solo.txt");
        fs::write(&file, b"solo").unwrap();

        let nodes = collect(&file, Options::default());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path().as_str(), "");
    }

    #[test]
    fn filter_excludes_non_matching_paths() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("a.log"), b"a").unwrap();

        let options = Options::builder().filter(path::Glob::compile("**.txt").unwrap()).build();
        let nodes = collect(dir.path(), options);
        let names: Vec<_> = nodes.iter().map(|n| n.path().as_str().to_owned()).collect();
        assert_eq!(names, vec!["a.txt"]);
    }

    #[test]
    fn filter_does_not_prevent_structural_descent() {
        // An excluded directory may still hold an included descendant; the
        // filter only gates emission, never recursion.
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("skip")).unwrap();
        fs::write(dir.path().join("skip/keep.txt"), b"x").unwrap();

        let options = Options::builder()
            .filter(path::Glob::compile("~skip,skip/keep.txt").unwrap())
            .build();
        let nodes = collect(dir.path(), options);
        let names: Vec<_> = nodes.iter().map(|n| n.path().as_str().to_owned()).collect();
        assert_eq!(names, vec!["skip/keep.txt"]);
    }

    #[test]
    fn disabled_recursion_leaves_archives_as_leaves() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("a.zip");
        {
            let file = fs::File::create(&zip_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options: zip::write::FileOptions<()> = zip::write::FileOptions::default();
            writer.start_file("inner.txt", options).unwrap();
            use std::io::Write;
            writer.write_all(b"hello").unwrap();
            writer.finish().unwrap();
        }

        let options = Options::builder().recursion(Recursion::Disabled).build();
        let nodes = collect(dir.path(), options);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_leaf());
        assert_eq!(nodes[0].path().as_str(), "a.zip");
    }

    #[test]
    fn descends_into_a_zip_archive() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("a.zip");
        {
            let file = fs::File::create(&zip_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options: zip::write::FileOptions<()> = zip::write::FileOptions::default();
            writer.start_file("inner.txt", options).unwrap();
            use std::io::Write;
            writer.write_all(b"hello").unwrap();
            writer.finish().unwrap();
        }

        let options = Options::builder()
            .look_into(path::LookIntoGlob::compile("***:***").unwrap())
            .build();
        let nodes = collect(dir.path(), options);
        let names: Vec<_> = nodes.iter().map(|n| n.path().as_str().to_owned()).collect();
        assert_eq!(names, vec!["a.zip", "a.zip!inner.txt"]);

        let leaf = nodes.iter().find(|n| n.path().as_str() == "a.zip!inner.txt").unwrap();
        match leaf {
            Node::Leaf { opener, .. } => {
                let mut buf = Vec::new();
                opener.open().unwrap().read_to_end(&mut buf).unwrap();
                assert_eq!(buf, b"hello");
            }
            _ => panic!("expected a leaf"),
        }
    }

    #[test]
    fn single_threaded_mode_matches_parallel_ordering() {
        let dir = tempdir().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let sequential = collect(dir.path(), Options::builder().parallel(false).build());
        let parallel = collect(dir.path(), Options::builder().parallel(true).build());
        let seq_names: Vec<_> = sequential.iter().map(|n| n.path().as_str().to_owned()).collect();
        let par_names: Vec<_> = parallel.iter().map(|n| n.path().as_str().to_owned()).collect();
        assert_eq!(seq_names, par_names);
    }
}
