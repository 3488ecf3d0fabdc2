//! Compile every configured family against one snapshot.
use rayon::prelude::*;

use crate::config::Config;
use crate::error::CompileError;
use crate::family::{CompiledFamily, compile};
use crate::report::Reporter;
use crate::source::Snapshot;

/// Per-family outcome, in configuration order.
#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    pub result: Result<CompiledFamily, CompileError>,
}

/// Families are independent, so they compile in parallel; the snapshot is
/// only ever read.
pub fn compile_all(config: &Config, snapshot: &Snapshot) -> Vec<Outcome> {
    config
        .families
        .par_iter()
        .map(|family| Outcome { name: family.name.clone(), result: compile(family, snapshot) })
        .collect()
}

/// Compile and report. With `keep_going` every failure is reported and the
/// families that did compile are returned; otherwise the first failure in
/// configuration order is returned as the error.
pub fn run(
    config: &Config,
    snapshot: &Snapshot,
    keep_going: bool,
    reporter: &Reporter,
) -> Result<Vec<CompiledFamily>, CompileError> {
    let mut compiled = Vec::with_capacity(config.families.len());
    let mut failed = 0;

    for family in &config.families {
        reporter.detail(format!("{}: {} over {}", family.name, family.kind.label(), family.source));
    }
    for outcome in compile_all(config, snapshot) {
        match outcome.result {
            Ok(family) => {
                reporter.compiled(&family);
                compiled.push(family);
            }
            Err(error) if keep_going => {
                reporter.failure(&outcome.name, &error);
                failed += 1;
            }
            Err(error) => return Err(error),
        }
    }

    reporter.finished(compiled.len(), failed);
    Ok(compiled)
}

// ------------------------------- Tests ------------------------------------ //
