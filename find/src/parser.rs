//! Recursive-descent parser for the predicate grammar (§4.6):
//!
//! ```text
//! expr   := comma
//! comma  := or (',' comma)?
//! or     := and (('-o'|'-or'|'||') or)?
//! and    := prim (('-a'|'-and'|'&&')? and)?   // AND is implicit between adjacent primaries
//! prim   := '(' comma ')' | ('!'|'-not') prim | test | action
//! ```
//!
//! Tokens are already-split argv words (as `clap`'s trailing-args collector
//! hands them over), not a string to re-tokenize.

use std::path::PathBuf;

use path::Glob;

use crate::ast::{Action, Cmp, Expr, NodeType, NumArg, Test};
use crate::Error;

/// Parse a full predicate expression from argv-style tokens.
pub fn parse(tokens: &[String]) -> Result<Expr, Error> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_comma()?;
    if let Some(tok) = parser.peek() {
        return Err(Error::Usage(format!("unexpected token {tok:?}")));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<&'a str> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &str) -> Result<(), Error> {
        match self.next() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(Error::Usage(format!("expected {expected:?}, found {tok:?}"))),
            None => Err(Error::Usage(format!("expected {expected:?}, found end of expression"))),
        }
    }

    fn require_arg(&mut self, flag: &str) -> Result<String, Error> {
        self.next()
            .map(str::to_owned)
            .ok_or_else(|| Error::Usage(format!("{flag} requires an argument")))
    }

    /// Collect tokens up to (and consuming) a literal `;` terminator, as `-exec`/`-pipe`/`-printf` do.
    fn collect_until_semicolon(&mut self, flag: &str) -> Result<Vec<String>, Error> {
        let mut collected = Vec::new();
        loop {
            match self.next() {
                Some(";") => return Ok(collected),
                Some(tok) => collected.push(tok.to_owned()),
                None => return Err(Error::Usage(format!("{flag} is missing a terminating ';'"))),
            }
        }
    }

    fn parse_comma(&mut self) -> Result<Expr, Error> {
        let left = self.parse_or()?;
        if self.peek() == Some(",") {
            self.next();
            let right = self.parse_comma()?;
            return Ok(Expr::Comma(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, Error> {
        let left = self.parse_and()?;
        if matches!(self.peek(), Some("-o") | Some("-or") | Some("||")) {
            self.next();
            let right = self.parse_or()?;
            return Ok(Expr::Or(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, Error> {
        let left = self.parse_primary()?;
        if matches!(self.peek(), Some("-a") | Some("-and") | Some("&&")) {
            self.next();
            let right = self.parse_and()?;
            return Ok(Expr::And(Box::new(left), Box::new(right)));
        }
        if self.starts_primary() {
            let right = self.parse_and()?;
            return Ok(Expr::And(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    /// Whether the next token can begin a new primary, used to detect an
    /// implicit AND between two adjacent primaries.
    fn starts_primary(&self) -> bool {
        !matches!(self.peek(), None | Some(")") | Some(",") | Some("-o") | Some("-or") | Some("||") | Some("-a") | Some("-and") | Some("&&"))
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        match self.peek() {
            Some("(") => {
                self.next();
                let inner = self.parse_comma()?;
                self.expect(")")?;
                Ok(inner)
            }
            Some("!") | Some("-not") => {
                self.next();
                let inner = self.parse_primary()?;
                Ok(Expr::Not(Box::new(inner)))
            }
            Some(tok) => self.parse_test_or_action(tok),
            None => Err(Error::Usage("expected a test or action, found end of expression".into())),
        }
    }

    fn parse_test_or_action(&mut self, tok: &str) -> Result<Expr, Error> {
        self.next();
        match tok {
            "-name" => Ok(Expr::Test(Test::Name(self.glob_arg("-name")?))),
            "-path" => Ok(Expr::Test(Test::Path(self.glob_arg("-path")?))),
            "-type" => Ok(Expr::Test(Test::Type(self.type_arg()?))),
            "-readable" => Ok(Expr::Test(Test::Readable)),
            "-writable" => Ok(Expr::Test(Test::Writable)),
            "-executable" => Ok(Expr::Test(Test::Executable)),
            "-size" => Ok(Expr::Test(Test::Size(self.num_arg("-size")?))),
            "-mtime" => Ok(Expr::Test(Test::Mtime(self.num_arg("-mtime")?))),
            "-mmin" => Ok(Expr::Test(Test::Mmin(self.num_arg("-mmin")?))),
            "-true" => Ok(Expr::Test(Test::True)),
            "-false" => Ok(Expr::Test(Test::False)),

            "-print" => Ok(Expr::Action(Action::Print)),
            "-echo" => Ok(Expr::Action(Action::Echo(self.require_arg("-echo")?))),
            "-printf" => {
                let format = self.require_arg("-printf")?;
                let args = self.collect_until_semicolon("-printf")?;
                Ok(Expr::Action(Action::Printf { format, args }))
            }
            "-ls" => Ok(Expr::Action(Action::Ls)),
            "-exec" => Ok(Expr::Action(Action::Exec(self.collect_until_semicolon("-exec")?))),
            "-pipe" => Ok(Expr::Action(Action::Pipe(self.collect_until_semicolon("-pipe")?))),
            "-cat" => Ok(Expr::Action(Action::Cat)),
            "-copy" => {
                let archive_relative = self.peek() == Some("-a");
                if archive_relative {
                    self.next();
                }
                let dir = PathBuf::from(self.require_arg("-copy")?);
                Ok(Expr::Action(Action::Copy { archive_relative, dir }))
            }
            "-disassemble" => Ok(Expr::Action(Action::Disassemble(self.collect_until_semicolon("-disassemble")?))),
            "-digest" => Ok(Expr::Action(Action::Digest(self.require_arg("-digest")?))),
            "-checksum" => Ok(Expr::Action(Action::Checksum(self.require_arg("-checksum")?))),
            "-prune" => Ok(Expr::Action(Action::Prune)),
            "-delete" => Ok(Expr::Action(Action::Delete)),

            other => Err(Error::Usage(format!("unknown test or action {other:?}"))),
        }
    }

    fn glob_arg(&mut self, flag: &str) -> Result<Glob, Error> {
        let raw = self.require_arg(flag)?;
        Ok(Glob::compile(raw)?)
    }

    fn type_arg(&mut self) -> Result<NodeType, Error> {
        let raw = self.require_arg("-type")?;
        match raw.as_str() {
            "f" => Ok(NodeType::File),
            "d" => Ok(NodeType::Directory),
            other => Err(Error::Usage(format!("-type expects 'f' or 'd', found {other:?}"))),
        }
    }

    fn num_arg(&mut self, flag: &str) -> Result<NumArg, Error> {
        let raw = self.require_arg(flag)?;
        parse_num_arg(&raw)
    }
}

fn parse_num_arg(raw: &str) -> Result<NumArg, Error> {
    let invalid = |reason: &str| Error::InvalidNumericArgument { arg: raw.to_owned(), reason: reason.to_owned() };

    let (cmp, body) = match raw.strip_prefix('+') {
        Some(rest) => (Cmp::Greater, rest),
        None => match raw.strip_prefix('-') {
            Some(rest) => (Cmp::Less, rest),
            None => (Cmp::Exact, raw),
        },
    };

    let (digits, multiplier) = match body.chars().last() {
        Some('k') | Some('K') => (&body[..body.len() - 1], 1024),
        Some('m') | Some('M') => (&body[..body.len() - 1], 1024 * 1024),
        Some('g') | Some('G') => (&body[..body.len() - 1], 1024 * 1024 * 1024),
        _ => (body, 1),
    };

    let value: u64 = digits.parse().map_err(|_| invalid("not a valid number"))?;
    Ok(NumArg { cmp, magnitude: value * multiplier })
}

#[cfg(test)]
mod test {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_implicit_and_between_adjacent_tests() {
        let expr = parse(&toks(&["-name", "*.java", "-print"])).unwrap();
        assert!(matches!(expr, Expr::And(_, _)));
        assert!(expr.has_action());
    }

    #[test]
    fn parses_explicit_or() {
        let expr = parse(&toks(&["-name", "*.java", "-o", "-name", "*.kt"])).unwrap();
        assert!(matches!(expr, Expr::Or(_, _)));
        assert!(!expr.has_action());
    }

    #[test]
    fn parses_negation_and_parens() {
        let expr = parse(&toks(&["!", "(", "-name", "*.class", "-o", "-name", "*.jar", ")"])).unwrap();
        assert!(matches!(expr, Expr::Not(_)));
    }

    #[test]
    fn exec_collects_until_semicolon() {
        let expr = parse(&toks(&["-exec", "echo", "{}", ";"])).unwrap();
        match expr {
            Expr::Action(Action::Exec(args)) => assert_eq!(args, vec!["echo".to_string(), "{}".to_string()]),
            other => panic!("expected an exec action, got {other:?}"),
        }
    }

    #[test]
    fn numeric_arguments_parse_comparisons_and_multipliers() {
        assert_eq!(parse_num_arg("10").unwrap(), NumArg { cmp: Cmp::Exact, magnitude: 10 });
        assert_eq!(parse_num_arg("+10k").unwrap(), NumArg { cmp: Cmp::Greater, magnitude: 10 * 1024 });
        assert_eq!(parse_num_arg("-1M").unwrap(), NumArg { cmp: Cmp::Less, magnitude: 1024 * 1024 });
    }
}
