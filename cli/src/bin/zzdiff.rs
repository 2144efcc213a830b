//! `zzdiff`: compares two files or two directory trees (§4.5).

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use cli::{Error, EncodingArg, LookIntoArg};
use diff::{AbsentFileMode, CStyleTokenizer, CompareOptions, Dialect, FileComparison, IgnoreLines, ScopedEquivalence};
use path::{Equivalence, Glob};
use stable_eyre::eyre::Result;

/// Compare two files, or two directory trees, line by line.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    #[clap(flatten)]
    logging: logconf::LoggingArgs,

    #[clap(flatten)]
    look_into: LookIntoArg,

    #[clap(flatten)]
    encoding: EncodingArg,

    /// Report only whether the inputs differ, without showing the diff itself.
    #[clap(short = 'q', long = "brief")]
    brief: bool,

    /// Context-diff output, with N lines of context (default 3).
    #[clap(short = 'c', long = "context", num_args = 0..=1, default_missing_value = "3")]
    context: Option<usize>,

    /// Unified-diff output, with N lines of context (default 3).
    #[clap(short = 'u', long = "unified", num_args = 0..=1, default_missing_value = "3")]
    unified: Option<usize>,

    /// Collapse runs of whitespace to a single space before comparing.
    #[clap(short = 'w', long = "ignore-whitespace")]
    ignore_whitespace: bool,

    /// Drop lines matching REGEX (in files matching PATH) from both sides before comparing.
    #[clap(short = 'I', long = "ignore-matching-lines", value_name = "PATH:REGEX")]
    ignore_lines: Vec<String>,

    /// Treat two lines as equal when REGEX matches both and every capture group agrees.
    #[clap(long = "line-equivalence", value_name = "PATH:REGEX")]
    line_equivalence: Vec<String>,

    /// How a file present only in the old tree is reported: `report`, `empty`, or `ignore`.
    #[clap(long = "added-file", value_name = "MODE")]
    added_file: Option<String>,

    /// How a file present only in the new tree is reported: `report`, `empty`, or `ignore`.
    #[clap(long = "deleted-file", value_name = "MODE")]
    deleted_file: Option<String>,

    /// Shorthand for `--added-file empty --deleted-file empty`.
    #[clap(short = 'N', long = "new-file")]
    new_file: bool,

    /// Pair up files present under different paths on each side when REGEX matches both.
    #[clap(long = "path-equivalence", visible_alias = "pe", value_name = "REGEX")]
    path_equivalence: Option<String>,

    /// Charset override for document-mode comparisons.
    /// (Directory-mode comparisons always decode UTF-8 lossily; see DESIGN.md.)
    #[clap(long = "out", value_name = "FILE")]
    out: Option<PathBuf>,

    /// Disable the background-thread walker, for deterministic single-threaded runs.
    #[clap(long = "sequential")]
    sequential: bool,

    /// Strip comments the way a Java-family tokenizer would before comparing.
    #[clap(long = "java-tokenization")]
    java_tokenization: bool,

    #[clap(long = "ignore-c-style-comments")]
    ignore_c_style_comments: bool,

    #[clap(long = "ignore-c++-style-comments")]
    ignore_cpp_style_comments: bool,

    #[clap(long = "ignore-doc-comments")]
    ignore_doc_comments: bool,

    /// The old file or directory.
    old: PathBuf,

    /// The new file or directory.
    new: PathBuf,
}

fn main() -> Result<()> {
    stable_eyre::install()?;
    let cli = Cli::parse();
    cli.logging.init();

    match run(cli) {
        Ok(differs) => std::process::exit(if differs { 1 } else { 0 }),
        Err(err) => {
            eprintln!("zzdiff: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<bool, Error> {
    let dialect = if let Some(context) = cli.unified {
        Dialect::Unified { context }
    } else if let Some(context) = cli.context {
        Dialect::Context { context }
    } else {
        Dialect::Normal
    };

    let compare = build_compare_options(&cli)?;
    let absent = merge_absent_mode(&cli)?;
    let path_equivalence = cli.path_equivalence.as_deref().map(Equivalence::compile).transpose()?;

    let mut out: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };

    if cli.old.is_dir() && cli.new.is_dir() {
        run_tree(&cli, &compare, dialect, absent, path_equivalence.as_ref(), &mut *out)
    } else {
        run_documents(&cli, &compare, dialect, &mut *out)
    }
}

fn run_documents(cli: &Cli, compare: &CompareOptions, dialect: Dialect, out: &mut dyn Write) -> Result<bool, Error> {
    let old_bytes = std::fs::read(&cli.old)?;
    let new_bytes = std::fs::read(&cli.new)?;
    let old_text = cli.encoding.decode(&old_bytes);
    let new_text = cli.encoding.decode(&new_bytes);

    let old_name = cli.old.display().to_string();
    let new_name = cli.new.display().to_string();
    let old_lines = compare.prepare_lines(&old_name, &old_text);
    let new_lines = compare.prepare_lines(&new_name, &new_text);

    let differential = diff::diff_documents(&old_lines, &new_lines, |a, b| compare.lines_equal(&old_name, a, b), dialect);
    if differential.is_empty() {
        return Ok(false);
    }

    if cli.brief {
        writeln!(out, "Files {} and {} differ", cli.old.display(), cli.new.display())?;
    } else {
        write!(out, "{}", diff::render(&differential, dialect, &old_name, &new_name))?;
    }
    Ok(true)
}

fn run_tree(cli: &Cli, compare: &CompareOptions, dialect: Dialect, absent: AbsentFileMode, path_equivalence: Option<&Equivalence>, out: &mut dyn Write) -> Result<bool, Error> {
    let mut walk_options = walk::Options::builder().build();
    if let Some(glob) = cli.look_into.compile()? {
        walk_options = walk::Options::builder().look_into(glob).parallel(!cli.sequential).build();
    } else if cli.sequential {
        walk_options = walk::Options::builder().parallel(false).build();
    }

    let tree_diff = diff::diff_trees(&cli.old, &cli.new, walk_options, compare, dialect, absent, path_equivalence)?;
    let differs = tree_diff.has_differences();

    for comparison in &tree_diff.comparisons {
        match comparison {
            FileComparison::Unchanged { .. } => {}
            FileComparison::Changed { old_path, new_path, differential } => {
                if cli.brief {
                    writeln!(out, "Files {old_path} and {new_path} differ")?;
                } else {
                    write!(out, "{}", diff::render(differential, dialect, old_path, new_path))?;
                }
            }
            FileComparison::OnlyInOld { path, differential } => {
                report_absent(out, cli.brief, path, differential.as_ref(), dialect, "Only in old tree")?;
            }
            FileComparison::OnlyInNew { path, differential } => {
                report_absent(out, cli.brief, path, differential.as_ref(), dialect, "Only in new tree")?;
            }
        }
    }

    Ok(differs)
}

fn report_absent(out: &mut dyn Write, brief: bool, path: &str, differential: Option<&diff::Differential>, dialect: Dialect, label: &str) -> Result<(), Error> {
    match differential {
        Some(differential) if !brief => write!(out, "{}", diff::render(differential, dialect, path, path))?,
        _ => writeln!(out, "{label}: {path}")?,
    }
    Ok(())
}

fn build_compare_options(cli: &Cli) -> Result<CompareOptions, Error> {
    let mut ignore_lines = Vec::new();
    for raw in &cli.ignore_lines {
        let (path, regex) = split_path_regex(raw)?;
        ignore_lines.push(IgnoreLines::new(Glob::compile(path)?, regex::Regex::new(regex).map_err(|source| Error::Usage(format!("invalid -I regex {regex:?}: {source}")))?));
    }

    let mut line_equivalences = Vec::new();
    for raw in &cli.line_equivalence {
        let (path, regex) = split_path_regex(raw)?;
        line_equivalences.push(ScopedEquivalence::new(Glob::compile(path)?, Equivalence::compile(regex)?));
    }

    let strip_line = cli.ignore_cpp_style_comments || cli.java_tokenization;
    let strip_block = cli.ignore_c_style_comments || cli.java_tokenization;
    let strip_doc = cli.ignore_doc_comments || cli.java_tokenization;
    let tokenizer = if strip_line || strip_block || strip_doc {
        Some(CStyleTokenizer { strip_line, strip_block, strip_doc })
    } else {
        None
    };

    Ok(CompareOptions {
        ignore_whitespace: cli.ignore_whitespace,
        line_equivalences,
        ignore_lines,
        tokenizer,
    })
}

/// `--added-file`/`--deleted-file` independently name a mode per side, but
/// this engine's tree differ takes one [`AbsentFileMode`] applied to both
/// (see DESIGN.md): the more disclosive mode wins when they disagree, so
/// that asking to see *either* side's absent files doesn't get silently
/// dropped by the other flag defaulting to `report`.
fn merge_absent_mode(cli: &Cli) -> Result<AbsentFileMode, Error> {
    if cli.new_file {
        return Ok(AbsentFileMode::CompareWithEmpty);
    }
    let added = cli.added_file.as_deref().map(parse_absent_mode).transpose()?;
    let deleted = cli.deleted_file.as_deref().map(parse_absent_mode).transpose()?;
    Ok(match (added, deleted) {
        (Some(AbsentFileMode::CompareWithEmpty), _) | (_, Some(AbsentFileMode::CompareWithEmpty)) => AbsentFileMode::CompareWithEmpty,
        (Some(AbsentFileMode::Ignore), Some(AbsentFileMode::Ignore)) => AbsentFileMode::Ignore,
        (Some(mode), None) | (None, Some(mode)) => mode,
        _ => AbsentFileMode::Report,
    })
}

fn parse_absent_mode(raw: &str) -> Result<AbsentFileMode, Error> {
    match raw.to_ascii_lowercase().as_str() {
        "report" => Ok(AbsentFileMode::Report),
        "empty" | "compare-with-empty" => Ok(AbsentFileMode::CompareWithEmpty),
        "ignore" => Ok(AbsentFileMode::Ignore),
        other => Err(Error::Usage(format!("invalid absent-file mode {other:?}; expected report, empty, or ignore"))),
    }
}

fn split_path_regex(raw: &str) -> Result<(&str, &str), Error> {
    raw.split_once(':').ok_or_else(|| Error::Usage(format!("expected PATH:REGEX, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            logging: logconf::LoggingArgs { nowarn: false, quiet: false, verbose: false, debug: false },
            look_into: LookIntoArg::default(),
            encoding: EncodingArg::default(),
            brief: false,
            context: None,
            unified: None,
            ignore_whitespace: false,
            ignore_lines: Vec::new(),
            line_equivalence: Vec::new(),
            added_file: None,
            deleted_file: None,
            new_file: false,
            path_equivalence: None,
            out: None,
            sequential: false,
            java_tokenization: false,
            ignore_c_style_comments: false,
            ignore_cpp_style_comments: false,
            ignore_doc_comments: false,
            old: PathBuf::from("old"),
            new: PathBuf::from("new"),
        }
    }

    #[test]
    fn parse_absent_mode_accepts_known_spellings() {
        assert_eq!(parse_absent_mode("report").unwrap(), AbsentFileMode::Report);
        assert_eq!(parse_absent_mode("EMPTY").unwrap(), AbsentFileMode::CompareWithEmpty);
        assert_eq!(parse_absent_mode("compare-with-empty").unwrap(), AbsentFileMode::CompareWithEmpty);
        assert_eq!(parse_absent_mode("ignore").unwrap(), AbsentFileMode::Ignore);
        assert!(parse_absent_mode("bogus").is_err());
    }

    #[test]
    fn merge_absent_mode_defaults_to_report() {
        let cli = base_cli();
        assert_eq!(merge_absent_mode(&cli).unwrap(), AbsentFileMode::Report);
    }

    #[test]
    fn merge_absent_mode_new_file_shortcircuits_to_compare_with_empty() {
        let mut cli = base_cli();
        cli.new_file = true;
        cli.deleted_file = Some("ignore".to_owned());
        assert_eq!(merge_absent_mode(&cli).unwrap(), AbsentFileMode::CompareWithEmpty);
    }

    #[test]
    fn merge_absent_mode_prefers_the_more_disclosive_side() {
        let mut cli = base_cli();
        cli.added_file = Some("ignore".to_owned());
        cli.deleted_file = Some("empty".to_owned());
        assert_eq!(merge_absent_mode(&cli).unwrap(), AbsentFileMode::CompareWithEmpty);
    }

    #[test]
    fn merge_absent_mode_both_ignore_stays_ignore() {
        let mut cli = base_cli();
        cli.added_file = Some("ignore".to_owned());
        cli.deleted_file = Some("ignore".to_owned());
        assert_eq!(merge_absent_mode(&cli).unwrap(), AbsentFileMode::Ignore);
    }

    #[test]
    fn split_path_regex_requires_a_colon() {
        assert!(split_path_regex("no-colon-here").is_err());
        assert_eq!(split_path_regex("*.txt:^\\s*$").unwrap(), ("*.txt", "^\\s*$"));
    }

    #[test]
    fn build_compare_options_enables_tokenizer_only_when_requested() {
        let cli = base_cli();
        let options = build_compare_options(&cli).unwrap();
        assert!(options.tokenizer.is_none());

        let mut cli = base_cli();
        cli.ignore_c_style_comments = true;
        let options = build_compare_options(&cli).unwrap();
        let tokenizer = options.tokenizer.unwrap();
        assert!(tokenizer.strip_block);
        assert!(!tokenizer.strip_line);
        assert!(!tokenizer.strip_doc);
    }

    #[test]
    fn build_compare_options_java_tokenization_enables_all_three() {
        let mut cli = base_cli();
        cli.java_tokenization = true;
        let tokenizer = build_compare_options(&cli).unwrap().tokenizer.unwrap();
        assert!(tokenizer.strip_line);
        assert!(tokenizer.strip_block);
        assert!(tokenizer.strip_doc);
    }
}
