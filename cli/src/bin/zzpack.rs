//! `zzpack`: assemble a list of inputs into one archive (§4.7).

use std::path::PathBuf;

use clap::Parser;
use cli::{Error, LookIntoArg};
use pack::{PackOptions, RenameRule};
use stable_eyre::eyre::Result;

/// Pack files and directories into a single archive.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    #[clap(flatten)]
    logging: logconf::LoggingArgs,

    #[clap(flatten)]
    look_into: LookIntoArg,

    /// The archive format to write, e.g. `zip` or `tar`.
    #[clap(long = "archive-format", value_name = "FORMAT")]
    archive_format: String,

    /// The compression format to wrap the archive in, e.g. `gzip`.
    #[clap(long = "compression-format", value_name = "FORMAT")]
    compression_format: Option<String>,

    /// Rewrite every computed entry name via `PATTERN=REPLACEMENT`.
    #[clap(long = "rename", value_name = "PATTERN=REPLACEMENT")]
    rename: Option<String>,

    /// Disable lexicographic sorting of each directory input's members.
    #[clap(long = "no-sort")]
    no_sort: bool,

    /// The inputs to pack, in order.
    #[clap(required = true)]
    inputs: Vec<PathBuf>,

    /// The archive file to write.
    #[clap(long = "out", short = 'o', value_name = "FILE", required = true)]
    output: PathBuf,
}

fn main() -> Result<()> {
    stable_eyre::install()?;
    let cli = Cli::parse();
    cli.logging.init();

    match run(cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("zzpack: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let options = build_options(&cli)?;
    let mut out = std::fs::File::create(&cli.output)?;
    pack::pack(&cli.inputs, &mut out, &options)?;
    Ok(())
}

/// Every field of `PackOptions` is public (see DESIGN.md), so the options not
/// fixed at compile time (the optional flags) are filled in directly rather
/// than threading conditional `.build()` branches through the builder's
/// per-field type states.
fn build_options(cli: &Cli) -> Result<PackOptions, Error> {
    let rename = cli.rename.as_deref().map(RenameRule::parse).transpose()?;
    let look_into = cli.look_into.compile()?;

    Ok(PackOptions {
        registry: std::sync::Arc::new(format::Registry::standard()),
        archive_format: cli.archive_format.clone(),
        compression_format: cli.compression_format.clone(),
        look_into,
        sort: !cli.no_sort,
        rename,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            logging: logconf::LoggingArgs { nowarn: false, quiet: false, verbose: false, debug: false },
            look_into: LookIntoArg::default(),
            archive_format: "zip".to_owned(),
            compression_format: None,
            rename: None,
            no_sort: false,
            inputs: vec![PathBuf::from("a"), PathBuf::from("b")],
            output: PathBuf::from("out.zip"),
        }
    }

    #[test]
    fn build_options_defaults_to_sorted_with_no_rename() {
        let options = build_options(&base_cli()).unwrap();
        assert_eq!(options.archive_format, "zip");
        assert!(options.compression_format.is_none());
        assert!(options.look_into.is_none());
        assert!(options.sort);
        assert!(options.rename.is_none());
    }

    #[test]
    fn build_options_no_sort_flips_sort_off() {
        let mut cli = base_cli();
        cli.no_sort = true;
        let options = build_options(&cli).unwrap();
        assert!(!options.sort);
    }

    #[test]
    fn build_options_carries_compression_format_through() {
        let mut cli = base_cli();
        cli.compression_format = Some("gzip".to_owned());
        let options = build_options(&cli).unwrap();
        assert_eq!(options.compression_format.as_deref(), Some("gzip"));
    }

    #[test]
    fn build_options_parses_a_valid_rename_rule() {
        let mut cli = base_cli();
        cli.rename = Some("old/=new/".to_owned());
        assert!(build_options(&cli).unwrap().rename.is_some());
    }

    #[test]
    fn build_options_rejects_a_malformed_rename_rule() {
        let mut cli = base_cli();
        cli.rename = Some("no-equals-sign".to_owned());
        assert!(build_options(&cli).is_err());
    }

    #[test]
    fn build_options_rejects_a_malformed_look_into_glob() {
        let mut cli = base_cli();
        cli.look_into = LookIntoArg { look_into: Some("no-discriminator".to_owned()) };
        assert!(build_options(&cli).is_err());
    }
}
