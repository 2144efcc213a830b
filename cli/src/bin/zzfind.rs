//! `zzfind`: evaluate a predicate expression over a walked tree (§4.6).

use std::path::PathBuf;

use clap::Parser;
use cli::{Error, LookIntoArg};
use stable_eyre::eyre::Result;

/// Evaluate a find-style predicate expression against a tree.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    #[clap(flatten)]
    logging: logconf::LoggingArgs,

    #[clap(flatten)]
    look_into: LookIntoArg,

    /// The root to enumerate.
    root: PathBuf,

    /// The predicate expression, e.g. `-name '*.java' -print`.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    expr: Vec<String>,
}

fn main() -> Result<()> {
    stable_eyre::install()?;
    let cli = Cli::parse();
    cli.logging.init();

    match run(cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("zzfind: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let expr = find::parse(&cli.expr)?;

    let look_into = resolve_look_into(&cli.look_into)?;
    let walk_options = walk::Options::builder().look_into(look_into).build();
    let options = find::FindOptions::builder().root(cli.root).walk_options(walk_options).build();

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let deletions = find::run(&expr, &options, &mut lock)?;

    // `-delete` reports deepest entries first, so removing directories before
    // their (already-deleted) children are reported never happens; reverse
    // order guarantees every directory is empty by the time it's removed.
    for path in deletions.into_iter().rev() {
        if path.is_dir() {
            let _ = std::fs::remove_dir(&path);
        } else {
            let _ = std::fs::remove_file(&path);
        }
    }

    Ok(())
}

/// `zzfind` descends into every recognized container by default, matching
/// the original find-over-archives behavior this tool generalizes; a glob
/// matching everything stands in for "always descend".
fn resolve_look_into(arg: &LookIntoArg) -> Result<path::LookIntoGlob, Error> {
    arg.compile()?.map_or_else(|| path::LookIntoGlob::compile("***:***").map_err(Error::from), Ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_look_into_defaults_to_descend_everything() {
        let arg = LookIntoArg::default();
        let glob = resolve_look_into(&arg).unwrap();
        assert!(glob.matches("anything", "any/path"));
    }

    #[test]
    fn resolve_look_into_honors_an_explicit_glob() {
        let arg = LookIntoArg { look_into: Some("zip:***".to_owned()) };
        let glob = resolve_look_into(&arg).unwrap();
        assert!(glob.matches("zip", "any/path"));
        assert!(!glob.matches("tar", "any/path"));
    }

    #[test]
    fn resolve_look_into_propagates_a_malformed_glob() {
        let arg = LookIntoArg { look_into: Some("no-discriminator".to_owned()) };
        assert!(resolve_look_into(&arg).is_err());
    }
}
