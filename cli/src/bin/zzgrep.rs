//! `zzgrep`: line-pattern search over a walked tree. Unlike the other four
//! tools, this one has no dedicated core engine crate — its matching logic
//! is built directly on [`walk`] and [`regex`], since the predicate it
//! implements is a single fixed operation rather than a pluggable pipeline.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use cli::{Error, LookIntoArg};
use regex::RegexBuilder;
use stable_eyre::eyre::Result;

/// Search matching lines across a walked tree.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    #[clap(flatten)]
    logging: logconf::LoggingArgs,

    #[clap(flatten)]
    look_into: LookIntoArg,

    /// The pattern to search for. May also be given with `-e`.
    pattern: Option<String>,

    /// An additional (or, if `pattern` is absent, the only) search pattern.
    #[clap(short = 'e', long = "regexp")]
    patterns: Vec<String>,

    /// Ignore case distinctions.
    #[clap(short = 'i')]
    ignore_case: bool,

    /// Match only whole words.
    #[clap(short = 'w')]
    word_regexp: bool,

    /// Invert the sense of matching: select non-matching lines.
    #[clap(short = 'v')]
    invert: bool,

    /// Print only a count of matching lines per file.
    #[clap(short = 'c')]
    count: bool,

    /// Print only the names of files containing a match.
    #[clap(short = 'l')]
    files_with_matches: bool,

    /// Print only the names of files containing no match.
    #[clap(short = 'L')]
    files_without_match: bool,

    /// Prefix each matching line with its 1-based line number.
    #[clap(short = 'n')]
    line_number: bool,

    /// Always prefix output with the file name.
    #[clap(short = 'H')]
    with_filename: bool,

    /// Never prefix output with the file name.
    #[clap(short = 'h')]
    no_filename: bool,

    /// The roots to search.
    #[clap(required = true)]
    roots: Vec<PathBuf>,
}

fn main() -> Result<()> {
    stable_eyre::install()?;
    let cli = Cli::parse();
    cli.logging.init();

    match run(cli) {
        Ok(any_match) => std::process::exit(if any_match { 0 } else { 1 }),
        Err(err) => {
            eprintln!("zzgrep: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<bool, Error> {
    let mut patterns = cli.patterns.clone();
    if let Some(p) = &cli.pattern {
        patterns.push(p.clone());
    }
    if patterns.is_empty() {
        return Err(Error::Usage("no pattern given; pass one positionally or with -e".to_owned()));
    }

    let regexes: Vec<regex::Regex> = patterns
        .iter()
        .map(|p| {
            let body = if cli.word_regexp { format!(r"\b(?:{p})\b") } else { p.clone() };
            RegexBuilder::new(&body).case_insensitive(cli.ignore_case).build().map_err(|source| Error::Usage(format!("invalid pattern {p:?}: {source}")))
        })
        .collect::<Result<_, Error>>()?;

    let show_filename = !cli.no_filename && (cli.with_filename || cli.roots.len() > 1 || walk_may_yield_many(&cli.roots));
    let look_into = cli.look_into.compile()?;

    let mut any_match = false;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for root in &cli.roots {
        let walk_options = match &look_into {
            Some(glob) => walk::Options::builder().look_into(glob.clone()).build(),
            None => walk::Options::builder().build(),
        };

        for result in walk::walk(root, walk_options) {
            let node = result?;
            let walk::Node::Leaf { meta, opener } = node else { continue };

            let mut bytes = Vec::new();
            opener.open()?.read_to_end(&mut bytes)?;
            let text = String::from_utf8_lossy(&bytes);
            let display_path = display_path(root, meta.path());

            let matches: Vec<(usize, &str)> = text
                .lines()
                .enumerate()
                .filter(|(_, line)| regexes.iter().any(|re| re.is_match(line)) != cli.invert)
                .collect();

            if matches.is_empty() {
                if cli.files_without_match {
                    writeln!(out, "{display_path}")?;
                }
                continue;
            }

            any_match = true;
            if cli.files_without_match {
                continue;
            }

            if cli.files_with_matches {
                writeln!(out, "{display_path}")?;
            } else if cli.count {
                if show_filename {
                    writeln!(out, "{display_path}:{}", matches.len())?;
                } else {
                    writeln!(out, "{}", matches.len())?;
                }
            } else {
                for (index, line) in matches {
                    let prefix = match (show_filename, cli.line_number) {
                        (true, true) => format!("{display_path}:{}:", index + 1),
                        (true, false) => format!("{display_path}:"),
                        (false, true) => format!("{}:", index + 1),
                        (false, false) => String::new(),
                    };
                    writeln!(out, "{prefix}{line}")?;
                }
            }
        }
    }

    Ok(any_match)
}

fn display_path(root: &std::path::Path, nested: &path::NestedPath) -> String {
    if nested.as_str().is_empty() {
        root.display().to_string()
    } else {
        format!("{}/{}", root.display(), nested.as_str())
    }
}

/// Whether a single root could still plausibly yield more than one file, so
/// that a lone directory argument gets filenames even though `roots.len() == 1`.
fn walk_may_yield_many(roots: &[PathBuf]) -> bool {
    roots.iter().any(|r| r.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_uses_bare_root_for_the_root_node_itself() {
        let root = std::path::Path::new("tree");
        assert_eq!(display_path(root, &path::NestedPath::root()), "tree");
    }

    #[test]
    fn display_path_joins_nested_entries_under_the_root() {
        let root = std::path::Path::new("tree");
        let nested = path::NestedPath::parse("archive.zip!inner.txt").unwrap();
        assert_eq!(display_path(root, &nested), "tree/archive.zip!inner.txt");
    }

    #[test]
    fn walk_may_yield_many_is_false_for_a_single_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(!walk_may_yield_many(&[file.path().to_path_buf()]));
    }

    #[test]
    fn walk_may_yield_many_is_true_for_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(walk_may_yield_many(&[dir.path().to_path_buf()]));
    }
}
