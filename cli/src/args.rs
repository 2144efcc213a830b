//! Small, reusable `clap::Args` groups flattened into every binary (§10.3):
//! the `--look-into` glob and the `--encoding` charset selector, defined
//! once here rather than repeated in each tool's own argument struct, the
//! same way `traceconf::TracingConfig` is designed to be flattened into any
//! consuming binary.

use clap::Args;

use crate::Error;

/// `--look-into <fmt-glob>:<path-glob>`, shared by every tool that walks a
/// tree (§6): governs whether a recognized container nested inside the
/// walk is descended into or visited as an opaque leaf.
#[derive(Debug, Clone, Default, Args)]
pub struct LookIntoArg {
    /// Descend into recognized containers matching `<format-glob>:<path-glob>`.
    #[clap(long = "look-into", value_name = "FMT:PATH")]
    pub look_into: Option<String>,
}

impl LookIntoArg {
    /// Compile the glob, if one was given.
    pub fn compile(&self) -> Result<Option<path::LookIntoGlob>, Error> {
        self.look_into.as_deref().map(path::LookIntoGlob::compile).transpose().map_err(Error::from)
    }
}

/// `--encoding <cs>`, the document-mode charset override (§6). Tree-mode
/// comparisons always decode UTF-8 lossily, matching the rest of this
/// workspace's node enumeration (see DESIGN.md); this only applies where a
/// tool reads a single file's bytes itself.
#[derive(Debug, Clone, Default, Args)]
pub struct EncodingArg {
    /// The charset bytes are decoded as (e.g. `UTF-8`, `windows-1252`, `Shift_JIS`).
    #[clap(long = "encoding", value_name = "CS")]
    pub encoding: Option<String>,
}

impl EncodingArg {
    /// Decode `bytes` per the requested charset, falling back to UTF-8
    /// lossy decoding when no charset was given or the label is unrecognized.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self.encoding.as_deref().and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes())).unwrap_or(encoding_rs::UTF_8);
        let (text, _, _) = encoding.decode(bytes);
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_arg_defaults_to_utf8_lossy() {
        let arg = EncodingArg { encoding: None };
        assert_eq!(arg.decode("caf\u{e9}".as_bytes()), "café");
    }

    #[test]
    fn encoding_arg_decodes_named_charset() {
        let arg = EncodingArg { encoding: Some("windows-1252".to_owned()) };
        // 0xE9 in windows-1252 is é.
        assert_eq!(arg.decode(&[0xE9]), "é");
    }

    #[test]
    fn encoding_arg_falls_back_on_unknown_label() {
        let arg = EncodingArg { encoding: Some("not-a-real-charset".to_owned()) };
        assert_eq!(arg.decode(b"hello"), "hello");
    }

    #[test]
    fn look_into_arg_compiles_none_when_absent() {
        let arg = LookIntoArg { look_into: None };
        assert!(arg.compile().unwrap().is_none());
    }

    #[test]
    fn look_into_arg_compiles_given_glob() {
        let arg = LookIntoArg { look_into: Some("*.zip:***".to_owned()) };
        assert!(arg.compile().unwrap().is_some());
    }

    #[test]
    fn look_into_arg_rejects_malformed_glob() {
        let arg = LookIntoArg { look_into: Some("no-discriminator".to_owned()) };
        assert!(arg.compile().is_err());
    }
}
