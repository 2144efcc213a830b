//! Ambient logging configuration shared by every binary (§10.1): a small
//! `clap` flag group, in the same `#[clap(flatten)]`-friendly style this
//! codebase's own `traceconf` crate uses for its tools, translated to a
//! `tracing_subscriber` filter instead of `traceconf`'s fuller
//! level/span/format/color surface — this family only ever names four flags
//! (§6), so there is no span-event or JSON-output knob to expose.
//!
//! The core crates (`walk`, `transform`, `diff`, `find`, `pack`) log through
//! the plain `log` facade, not `tracing` directly; [`LoggingArgs::init`]
//! bridges their records into the same subscriber via `tracing-log`, so
//! `--verbose`/`--debug` govern both layers from one place.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

use clap::Parser;
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Shared logging flags, flattened into every tool's CLI (§6, §10.1).
#[derive(Debug, Parser)]
pub struct LoggingArgs {
    /// Suppress warnings; errors are still reported.
    #[clap(long, global = true)]
    pub nowarn: bool,

    /// Only report errors.
    #[clap(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Raise the log level to include informational messages.
    #[clap(long, global = true)]
    pub verbose: bool,

    /// Raise the log level to include debug messages.
    #[clap(long, global = true)]
    pub debug: bool,
}

impl LoggingArgs {
    /// Resolve the effective level from the flags, per §10.1's precedence:
    /// `--debug` > `--verbose` > `-q`/`--quiet` > `--nowarn` > the `warn` default.
    ///
    /// A single [`LevelFilter`] is a global threshold, not a per-class
    /// exclusion, so `--nowarn` is modeled as narrowing the *default* level
    /// down to `error`: once `--verbose`/`--debug` have already asked for a
    /// finer level, there is nothing left for `--nowarn` to narrow.
    pub fn level_filter(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else if self.verbose {
            LevelFilter::INFO
        } else if self.quiet || self.nowarn {
            LevelFilter::ERROR
        } else {
            LevelFilter::WARN
        }
    }

    /// Install a global subscriber for this run.
    ///
    /// `RUST_LOG` wins when set and parses (§6's escape hatch); otherwise the
    /// flags above decide. Output goes to stderr so stdout stays reserved for
    /// tool output (`-print`, diff text, packed bytes).
    pub fn init(&self) {
        let _ = tracing_log::LogTracer::init();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level_filter().to_string()));

        let subscriber = Registry::default().with(filter).with(fmt::layer().with_writer(std::io::stderr).with_target(false));
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_level_is_warn() {
        let args = LoggingArgs::parse_from(["zzfind"]);
        assert_eq!(args.level_filter(), LevelFilter::WARN);
    }

    #[test]
    fn debug_outranks_verbose_and_quiet() {
        let args = LoggingArgs::parse_from(["zzfind", "--debug", "--verbose", "--quiet"]);
        assert_eq!(args.level_filter(), LevelFilter::DEBUG);
    }

    #[test]
    fn verbose_outranks_quiet() {
        let args = LoggingArgs::parse_from(["zzfind", "--verbose", "--quiet"]);
        assert_eq!(args.level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn quiet_lowers_below_the_warn_default() {
        let args = LoggingArgs::parse_from(["zzfind", "--quiet"]);
        assert_eq!(args.level_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn nowarn_lowers_the_default_to_error() {
        let args = LoggingArgs::parse_from(["zzfind", "--nowarn"]);
        assert_eq!(args.level_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn nowarn_does_not_undercut_an_explicit_verbose_request() {
        let args = LoggingArgs::parse_from(["zzfind", "--nowarn", "--verbose"]);
        assert_eq!(args.level_filter(), LevelFilter::INFO);
    }
}
