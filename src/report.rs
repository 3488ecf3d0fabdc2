//! Status lines on stderr. Stdout is reserved for emitted tables.
use colored::Colorize;

use crate::error::CompileError;
use crate::family::{CompiledFamily, CompiledTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    verbosity: Verbosity,
}

impl Reporter {
    pub fn new(verbosity: Verbosity) -> Self { Self { verbosity } }

    pub fn verbosity(&self) -> Verbosity { self.verbosity }

    /// Detail only shown with `--verbose`.
    pub fn detail(&self, message: impl AsRef<str>) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "  ·".dimmed(), message.as_ref());
        }
    }

    pub fn status(&self, verb: &str, message: impl AsRef<str>) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{:>10} {}", verb.green().bold(), message.as_ref());
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "warning:".yellow().bold(), message.as_ref());
        }
    }

    /// Failures are printed even in quiet mode.
    pub fn failure(&self, family: &str, error: &CompileError) {
        eprintln!("{} {family}: {error}", "error:".red().bold());
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            eprintln!("  {} {cause}", "caused by:".red());
            source = cause.source();
        }
    }

    pub fn compiled(&self, family: &CompiledFamily) {
        self.status("Compiled", format!("{} from {} ({})", family.name.bold(), family.source, summary(&family.table)));
    }

    pub fn finished(&self, ok: usize, failed: usize) {
        if failed == 0 {
            self.status("Finished", format!("{ok} families"));
        } else {
            eprintln!("{:>10} {ok} families, {} failed", "Finished".red().bold(), failed.to_string().red());
        }
    }
}

/// `42 runs` or, for case tables, `1411 pairs → 203 runs (6.95×)`.
pub fn summary(table: &CompiledTable) -> String {
    match table {
        CompiledTable::Membership { intervals } => format!("{} intervals", intervals.len()),
        CompiledTable::Categorical { runs, fallback } => format!("{} runs, fallback {fallback}", runs.len()),
        CompiledTable::Affine { pairs, runs } => {
            let ratio = *pairs as f64 / runs.len().max(1) as f64;
            format!("{pairs} pairs → {} runs ({ratio:.2}×)", runs.len())
        }
    }
}
