//! Expression evaluation over a node enumeration (§4.6's evaluation rules, §5's cancellation points).

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use path::NestedPath;
use typed_builder::TypedBuilder;
use walk::Node;

use crate::ast::{Action, Expr, NodeType, Test};
use crate::digest;
use crate::Error;

/// The outcome of a `-disassemble` hook invocation.
pub enum DisassembleResult {
    /// A textual rendering of the recognized content.
    Rendered(String),
    /// The hook did not recognize this content.
    NotApplicable,
}

/// The pluggable `-disassemble` collaborator (§4.6's "retained as a named,
/// pluggable hook"). The core ships only [`StubDisassembler`]; a real
/// byte-code disassembler is an external collaborator (§1).
pub trait DisassembleHook: Send + Sync {
    fn disassemble(&self, path: &str, bytes: &[u8], args: &[String]) -> DisassembleResult;
}

/// The core's stub `-disassemble` implementation: always [`DisassembleResult::NotApplicable`].
pub struct StubDisassembler;

impl DisassembleHook for StubDisassembler {
    fn disassemble(&self, _path: &str, _bytes: &[u8], _args: &[String]) -> DisassembleResult {
        DisassembleResult::NotApplicable
    }
}

/// Options controlling a find run (§4.6, §5).
#[derive(TypedBuilder)]
pub struct FindOptions {
    /// The root to enumerate.
    pub root: PathBuf,

    /// The underlying node enumerator's configuration.
    #[builder(default)]
    pub walk_options: walk::Options,

    /// The `-disassemble` hook implementation.
    #[builder(default = Arc::new(StubDisassembler))]
    pub disassembler: Arc<dyn DisassembleHook>,
}

/// Run `expr` over every node the enumerator produces, writing action
/// output to `out`. Returns the set of real filesystem paths that
/// `-delete` scheduled, in the order they should be removed (children
/// before their parents).
pub fn run(expr: &Expr, options: &FindOptions, out: &mut dyn Write) -> Result<Vec<PathBuf>, Error> {
    let implicit_print = !expr.has_action();
    let mut evaluator = Evaluator {
        root: &options.root,
        disassembler: options.disassembler.as_ref(),
        out,
        pruned_prefixes: Vec::new(),
        deletions: Vec::new(),
    };

    for result in walk::walk(&options.root, options.walk_options.clone()) {
        let node = result?;
        if evaluator.is_pruned(node.path()) {
            continue;
        }
        let matched = evaluator.eval(expr, &node)?;
        if implicit_print && matched {
            writeln!(evaluator.out, "{}", node.path())?;
        }
    }

    Ok(evaluator.deletions)
}

struct Evaluator<'a> {
    root: &'a Path,
    disassembler: &'a dyn DisassembleHook,
    out: &'a mut dyn Write,
    /// Nested paths of directories pruned so far; any node whose path is
    /// nested under one of these is skipped without evaluation.
    pruned_prefixes: Vec<String>,
    /// Real filesystem paths `-delete` scheduled, in visit order (children
    /// are visited after their parent directory, so reversing this list at
    /// the end yields a safe post-order removal sequence).
    deletions: Vec<PathBuf>,
}

impl<'a> Evaluator<'a> {
    fn is_pruned(&self, path: &NestedPath) -> bool {
        let candidate = path.as_str();
        self.pruned_prefixes.iter().any(|prefix| {
            candidate.len() > prefix.len() && candidate.starts_with(prefix.as_str()) && matches!(candidate.as_bytes()[prefix.len()], b'/' | b'!' | b'%')
        })
    }

    fn eval(&mut self, expr: &Expr, node: &Node) -> Result<bool, Error> {
        match expr {
            Expr::Test(test) => Ok(self.eval_test(test, node)),
            Expr::Action(action) => self.eval_action(action, node),
            Expr::Not(inner) => Ok(!self.eval(inner, node)?),
            Expr::And(left, right) => Ok(self.eval(left, node)? && self.eval(right, node)?),
            Expr::Or(left, right) => Ok(self.eval(left, node)? || self.eval(right, node)?),
            Expr::Comma(left, right) => {
                self.eval(left, node)?;
                self.eval(right, node)
            }
        }
    }

    fn eval_test(&self, test: &Test, node: &Node) -> bool {
        match test {
            Test::Name(glob) => glob.is_match(node.meta().local_name()),
            Test::Path(glob) => glob.is_match(node.path().as_str()),
            Test::Type(kind) => match (kind, node) {
                (NodeType::File, Node::Leaf { .. }) => true,
                (NodeType::Directory, Node::Directory(_)) | (NodeType::Directory, Node::ArchiveContainer(_)) => true,
                _ => false,
            },
            Test::Readable => {
                if node.path().is_nested() {
                    true
                } else {
                    std::fs::File::open(self.real_fs_path(node.path())).is_ok()
                }
            }
            Test::Writable => self.real_metadata(node).map_or(false, |m| !m.permissions().readonly()),
            Test::Executable => self.real_metadata(node).map_or(false, is_executable),
            Test::Size(arg) => arg.matches(node.meta().size().unwrap_or(0)),
            Test::Mtime(arg) => arg.matches(days_since(node.meta().modified())),
            Test::Mmin(arg) => arg.matches(minutes_since(node.meta().modified())),
            Test::True => true,
            Test::False => false,
        }
    }

    /// Real filesystem metadata for a plain, non-nested node, or `None` for
    /// anything inside an archive or compressed stream (§8's open question:
    /// permission tests outside the real filesystem have no meaningful
    /// answer, so they default conservatively).
    fn real_metadata(&self, node: &Node) -> Option<std::fs::Metadata> {
        if node.path().is_nested() {
            return None;
        }
        std::fs::metadata(self.real_fs_path(node.path())).ok()
    }

    fn real_fs_path(&self, path: &NestedPath) -> PathBuf {
        self.root.join(path.as_str())
    }

    fn eval_action(&mut self, action: &Action, node: &Node) -> Result<bool, Error> {
        match action {
            Action::Print => {
                writeln!(self.out, "{}", node.path())?;
                Ok(true)
            }
            Action::Echo(text) => {
                writeln!(self.out, "{}", expand_placeholder(text, node))?;
                Ok(true)
            }
            Action::Printf { format, args } => {
                let rendered = render_printf(format, args, node);
                write!(self.out, "{rendered}")?;
                Ok(true)
            }
            Action::Ls => {
                let size = node.meta().size().unwrap_or(0);
                writeln!(self.out, "{size:>10} {}", node.path())?;
                Ok(true)
            }
            Action::Exec(command) => self.run_child(command, node, false),
            Action::Pipe(command) => self.run_child(command, node, true),
            Action::Cat => {
                if let Node::Leaf { opener, .. } = node {
                    let mut reader = opener.open()?;
                    std::io::copy(&mut reader, self.out)?;
                }
                Ok(true)
            }
            Action::Copy { archive_relative, dir } => {
                self.copy_to(node, *archive_relative, dir)?;
                Ok(true)
            }
            Action::Disassemble(args) => {
                if let Node::Leaf { opener, .. } = node {
                    let mut bytes = Vec::new();
                    opener.open()?.read_to_end(&mut bytes)?;
                    if let DisassembleResult::Rendered(text) = self.disassembler.disassemble(node.path().as_str(), &bytes, args) {
                        writeln!(self.out, "{text}")?;
                    }
                }
                Ok(true)
            }
            Action::Digest(alg) => {
                if let Node::Leaf { opener, .. } = node {
                    let mut bytes = Vec::new();
                    opener.open()?.read_to_end(&mut bytes)?;
                    writeln!(self.out, "{} {}", digest::hex_digest(alg, &bytes), node.path())?;
                }
                Ok(true)
            }
            Action::Checksum(alg) => {
                if let Node::Leaf { opener, .. } = node {
                    let mut bytes = Vec::new();
                    opener.open()?.read_to_end(&mut bytes)?;
                    writeln!(self.out, "{:08x} {}", digest::checksum(alg, &bytes), node.path())?;
                }
                Ok(true)
            }
            Action::Prune => {
                self.pruned_prefixes.push(node.path().as_str().to_owned());
                Ok(true)
            }
            Action::Delete => {
                if !node.path().is_nested() {
                    self.deletions.push(self.real_fs_path(node.path()));
                }
                Ok(true)
            }
        }
    }

    fn run_child(&mut self, command: &[String], node: &Node, pipe_content: bool) -> Result<bool, Error> {
        let Some((program, rest)) = command.split_first() else {
            return Ok(true);
        };
        let args: Vec<String> = rest.iter().map(|a| expand_placeholder(a, node)).collect();
        let mut child = Command::new(program)
            .args(&args)
            .stdin(if pipe_content { Stdio::piped() } else { Stdio::null() })
            .spawn()
            .map_err(|source| Error::Spawn { command: program.clone(), source })?;

        if pipe_content {
            if let Node::Leaf { opener, .. } = node {
                let mut reader = opener.open()?;
                if let Some(mut stdin) = child.stdin.take() {
                    std::io::copy(&mut reader, &mut stdin)?;
                }
            }
        }

        let status = child.wait()?;
        Ok(status.success())
    }

    fn copy_to(&self, node: &Node, archive_relative: bool, dir: &Path) -> Result<(), Error> {
        let Node::Leaf { meta, opener } = node else {
            return Ok(());
        };
        let dest = if archive_relative {
            let sanitized = meta.path().as_str().replace(['!', '%'], "/");
            dir.join(sanitized)
        } else {
            dir.join(meta.local_name())
        };
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut reader = opener.open()?;
        let mut file = std::fs::File::create(dest)?;
        std::io::copy(&mut reader, &mut file)?;
        Ok(())
    }
}

#[cfg(unix)]
fn is_executable(metadata: std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: std::fs::Metadata) -> bool {
    false
}

fn days_since(modified: Option<SystemTime>) -> u64 {
    age(modified, Duration::from_secs(86_400))
}

fn minutes_since(modified: Option<SystemTime>) -> u64 {
    age(modified, Duration::from_secs(60))
}

fn age(modified: Option<SystemTime>, unit: Duration) -> u64 {
    let Some(modified) = modified else { return 0 };
    let elapsed = SystemTime::now().duration_since(modified).unwrap_or_default();
    elapsed.as_secs() / unit.as_secs().max(1)
}

/// Expand a literal `{}` placeholder with the node's nested path, as
/// `-exec`/`-pipe`/`-echo` do.
fn expand_placeholder(text: &str, node: &Node) -> String {
    text.replace("{}", node.path().as_str())
}

fn render_printf(format: &str, args: &[String], node: &Node) -> String {
    let mut rendered = expand_placeholder(format, node);
    for (index, arg) in args.iter().enumerate() {
        rendered = rendered.replace(&format!("%{}", index + 1), &expand_placeholder(arg, node));
    }
    rendered
}
