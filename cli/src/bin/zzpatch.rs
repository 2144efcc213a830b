//! `zzpatch`: mirror a tree from IN to OUT, rewriting every file's content
//! through the contents transformer pipeline (§4.4). The rule syntax is a
//! flat token stream (`-substitute P R S [-iff C] -rename OLD=NEW ...`)
//! parsed by hand the same way [`find::parse`] parses its own predicate
//! grammar, since clap's derive model has no way to express an ordered,
//! variably-arity flag sequence followed by two trailing positionals.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use cli::Error;
use find::{Cmp, NumArg};
use path::Glob;
use stable_eyre::eyre::Result;
use transform::{AddRule, LeafTransformer, NoOpTransformer, PatchTransformer, RenameTransformer, SubstituteCondition, SubstituteTransformer, TransformOptions, UpdateTransformer};

/// Rewrite a tree's contents according to a sequence of transformation rules.
///
/// `--look-into` is deliberately absent here: the outer walk always surfaces
/// archives and compressed files as whole leaves (see [`walk::Recursion::Disabled`]
/// below), since [`transform::transform`] does its own format-aware recursion
/// once it has a leaf's complete bytes.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    #[clap(flatten)]
    logging: logconf::LoggingArgs,

    /// Rule tokens followed by the input and output roots, e.g.
    /// `-substitute '***.txt' foo bar IN OUT`.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    stable_eyre::install()?;
    let cli = Cli::parse();
    cli.logging.init();

    match run(cli) {
        Ok(any_error) => std::process::exit(if any_error { 1 } else { 0 }),
        Err(err) => {
            eprintln!("zzpatch: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<bool, Error> {
    let (parsed, input, output) = parse_rules(&cli.args)?;

    let mut walk_options = walk::Options::builder().recursion(walk::Recursion::Disabled).build();
    if parsed.keep_going {
        walk_options = walk::Options::builder().recursion(walk::Recursion::Disabled).on_error(walk::ErrorPolicy::Skip).build();
    }

    let options = parsed.options;

    if input.is_file() {
        let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let mut reader = File::open(&input)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&output)?;
        transform::transform(&name, &mut bytes.as_slice(), &mut out, &options)?;
        return Ok(false);
    }

    let mut any_error = false;
    for result in walk::walk(&input, walk_options) {
        let node = match result {
            Ok(node) => node,
            Err(err) if parsed.keep_going => {
                eprintln!("zzpatch: {err}");
                any_error = true;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let rel = node.path().as_str();
        let dest = output.join(rel.replace(['!', '%'], "/"));

        match &node {
            walk::Node::Directory(_) | walk::Node::ArchiveContainer(_) => {
                std::fs::create_dir_all(&dest)?;
            }
            walk::Node::Leaf { opener, .. } => {
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let mut reader = opener.open()?;
                let mut file = File::create(&dest)?;
                let outcome = transform::transform(rel, &mut reader, &mut file, &options);
                match outcome {
                    Ok(()) => {}
                    Err(err) if parsed.keep_going => {
                        eprintln!("{rel}: {err}");
                        any_error = true;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    Ok(any_error)
}

struct ParsedRules {
    options: TransformOptions,
    keep_going: bool,
}

fn parse_rules(tokens: &[String]) -> Result<(ParsedRules, PathBuf, PathBuf), Error> {
    let mut leaf_transformers: Vec<Box<dyn LeafTransformer>> = Vec::new();
    let mut add_rules: Vec<AddRule> = Vec::new();
    let mut remove: Option<Glob> = None;
    let mut check_before = false;
    let mut keep_going = false;

    let mut pos = 0usize;
    while pos < tokens.len() {
        let token = tokens[pos].as_str();
        match token {
            "-substitute" => {
                let [p, r, s] = take3(tokens, pos + 1)?;
                pos += 4;
                let mut condition = SubstituteCondition::Always;
                if tokens.get(pos).map(String::as_str) == Some("-iff") {
                    let arg = tokens.get(pos + 1).ok_or_else(|| Error::Usage("-iff requires a condition argument".to_owned()))?;
                    let num_arg = parse_count_condition(arg)?;
                    condition = SubstituteCondition::Predicate(std::sync::Arc::new(move |_path, _matched, count| num_arg.matches(count as u64)));
                    pos += 2;
                }
                leaf_transformers.push(Box::new(SubstituteTransformer::new(Glob::compile(p)?, r, s, condition, check_before)?));
            }
            "-patch" => {
                let p = next(tokens, pos + 1, "-patch")?;
                let file = next(tokens, pos + 2, "-patch")?;
                pos += 3;
                let text = std::fs::read_to_string(file)?;
                let differential = diff::parse(&text).map_err(transform::Error::from)?;
                leaf_transformers.push(Box::new(PatchTransformer::new(Glob::compile(p)?, vec![differential])));
            }
            "-update" => {
                let rule = next(tokens, pos + 1, "-update")?;
                pos += 2;
                let (target, source) = rule.split_once('=').ok_or_else(|| Error::Usage(format!("-update expects TARGET=SOURCE, got {rule:?}")))?;
                leaf_transformers.push(Box::new(UpdateTransformer::new(Glob::compile(target)?, PathBuf::from(source))));
            }
            "-add" => {
                let [p, name, source] = take3(tokens, pos + 1)?;
                pos += 4;
                add_rules.push(AddRule {
                    target_archive: Glob::compile(p)?,
                    entry_name: name.to_owned(),
                    source: PathBuf::from(source),
                });
            }
            "-remove" => {
                let p = next(tokens, pos + 1, "-remove")?;
                pos += 2;
                remove = Some(Glob::compile(p)?);
            }
            "-rename" => {
                let rule = next(tokens, pos + 1, "-rename")?;
                pos += 2;
                let (old, new) = rule.split_once('=').ok_or_else(|| Error::Usage(format!("-rename expects OLD=NEW, got {rule:?}")))?;
                leaf_transformers.push(Box::new(RenameTransformer::new(Glob::compile("***")?, old, new)?));
            }
            "-noop" => {
                let p = next(tokens, pos + 1, "-noop")?;
                pos += 2;
                leaf_transformers.push(Box::new(NoOpTransformer::new(Glob::compile(p)?)));
            }
            "-check-before-transformation" => {
                check_before = true;
                pos += 1;
            }
            "-keep-going" => {
                keep_going = true;
                pos += 1;
            }
            _ => break,
        }
    }

    let remaining = &tokens[pos..];
    let [input, output] = <[String; 2]>::try_from(remaining.to_vec()).map_err(|_| Error::Usage("expected exactly IN and OUT roots after the rules".to_owned()))?;

    let options = match remove {
        Some(glob) => TransformOptions::builder().leaf_transformers(leaf_transformers).add_rules(add_rules).remove(glob).build(),
        None => TransformOptions::builder().leaf_transformers(leaf_transformers).add_rules(add_rules).build(),
    };
    Ok((ParsedRules { options, keep_going }, PathBuf::from(input), PathBuf::from(output)))
}

fn next<'a>(tokens: &'a [String], idx: usize, flag: &str) -> Result<&'a str, Error> {
    tokens.get(idx).map(String::as_str).ok_or_else(|| Error::Usage(format!("{flag} requires an argument")))
}

fn take3<'a>(tokens: &'a [String], idx: usize) -> Result<[&'a str; 3], Error> {
    if idx + 3 > tokens.len() {
        return Err(Error::Usage("expected three arguments".to_owned()));
    }
    Ok([tokens[idx].as_str(), tokens[idx + 1].as_str(), tokens[idx + 2].as_str()])
}

/// `-iff`'s condition is restricted to a match-count comparison
/// (`N`/`+N`/`-N`, the same leading-sign convention `find`'s numeric tests
/// use) rather than an arbitrary predicate: expressing a fully general
/// `(path, match, count)` predicate from shell arguments would need its own
/// expression language, which isn't worth the complexity for this CLI layer
/// (the library's `SubstituteCondition::Predicate` hook remains fully
/// general for programmatic callers).
fn parse_count_condition(raw: &str) -> Result<NumArg, Error> {
    let (cmp, digits) = match raw.strip_prefix('+') {
        Some(rest) => (Cmp::Greater, rest),
        None => match raw.strip_prefix('-') {
            Some(rest) => (Cmp::Less, rest),
            None => (Cmp::Exact, raw),
        },
    };
    let magnitude = digits.parse().map_err(|_| Error::Usage(format!("invalid -iff condition {raw:?}")))?;
    Ok(NumArg { cmp, magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_count_condition_reads_leading_sign() {
        assert_eq!(parse_count_condition("3").unwrap(), NumArg { cmp: Cmp::Exact, magnitude: 3 });
        assert_eq!(parse_count_condition("+2").unwrap(), NumArg { cmp: Cmp::Greater, magnitude: 2 });
        assert_eq!(parse_count_condition("-1").unwrap(), NumArg { cmp: Cmp::Less, magnitude: 1 });
        assert!(parse_count_condition("abc").is_err());
    }

    #[test]
    fn parse_rules_splits_rule_clauses_from_trailing_roots() {
        let (parsed, input, output) = parse_rules(&tokens(&["-substitute", "***.txt", "foo", "bar", "IN", "OUT"])).unwrap();
        assert_eq!(input, PathBuf::from("IN"));
        assert_eq!(output, PathBuf::from("OUT"));
        assert_eq!(parsed.options.leaf_transformers.len(), 1);
        assert!(!parsed.keep_going);
    }

    #[test]
    fn parse_rules_collects_keep_going_and_multiple_clauses() {
        let (parsed, input, output) = parse_rules(&tokens(&[
            "-substitute", "***a", "x", "y", "-substitute", "***b", "p", "q", "-keep-going", "IN", "OUT",
        ]))
        .unwrap();
        assert_eq!(input, PathBuf::from("IN"));
        assert_eq!(output, PathBuf::from("OUT"));
        assert_eq!(parsed.options.leaf_transformers.len(), 2);
        assert!(parsed.keep_going);
    }

    #[test]
    fn parse_rules_rejects_wrong_trailing_positional_count() {
        assert!(parse_rules(&tokens(&["-keep-going", "ONLY_ONE"])).is_err());
        assert!(parse_rules(&tokens(&["-keep-going", "ONE", "TWO", "THREE"])).is_err());
    }

    #[test]
    fn parse_rules_iff_attaches_to_the_preceding_substitute() {
        let (parsed, ..) = parse_rules(&tokens(&["-substitute", "***", "a", "b", "-iff", "+1", "IN", "OUT"])).unwrap();
        assert_eq!(parsed.options.leaf_transformers.len(), 1);
    }

    #[test]
    fn parse_rules_rejects_unknown_rename_argument_shape() {
        assert!(parse_rules(&tokens(&["-rename", "missing-equals", "IN", "OUT"])).is_err());
    }
}
