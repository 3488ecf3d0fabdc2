//! CLI: read the character database → compile families → (json | inc)
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::emit::{TableSet, inc, render_inc};
use crate::family::CompiledFamily;
use crate::names::{NameLookup, NoNames, UcdNames};
use crate::record::read_unicode_data;
use crate::report::{Reporter, Verbosity};
use crate::source::{DirectoryProvider, Snapshot};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile Unicode character database files into compact, sorted lookup tables
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile and print every table as one JSON document
    Json(JsonOut),
    /// compile and write one C include fragment per family
    Inc(IncOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// directory holding UnicodeData.txt and friends; source paths are relative to it
    #[arg(long, default_value = ".")]
    ucd_dir: PathBuf,

    /// JSON configuration file (built-in families if omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// only compile these families (repeatable)
    #[arg(long = "family", short = 'f')]
    families: Vec<String>,

    /// report failing families and keep compiling the rest
    #[arg(long, default_value_t = false)]
    keep_going: bool,

    /// only print errors
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,

    /// print per-source details
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::Parser, Debug)]
struct JsonOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct IncOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory for the `<family>.inc` files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// omit character name comments
    #[arg(long)]
    no_names: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn reporter(&self) -> Reporter {
        let verbosity = match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (_, true) => Verbosity::Verbose,
            _ => Verbosity::Normal,
        };
        Reporter::new(verbosity)
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let config = match self.config.as_ref() {
            Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };
        Ok(config.select(&self.families)?)
    }

    fn load_snapshot(&self, config: &Config, with_names: bool, reporter: &Reporter) -> anyhow::Result<Snapshot> {
        let provider = DirectoryProvider::new(&self.ucd_dir, config.sources.clone());
        let snapshot = Snapshot::load(&provider, snapshot_sources(config, with_names))
            .with_context(|| format!("reading sources from {}", self.ucd_dir.display()))?;
        for name in snapshot.names() {
            if let Some(source) = snapshot.get(name) {
                reporter.detail(format!("{name}: {} ({} lines)", source.origin, source.text.lines().count()));
            }
        }
        Ok(snapshot)
    }

    /// `with_names` also loads UnicodeData for name comments, even when no
    /// selected family reads it.
    fn compile(&self, with_names: bool) -> anyhow::Result<(Snapshot, Vec<CompiledFamily>)> {
        let reporter = self.reporter();
        let config = self.load_config()?;
        let snapshot = self.load_snapshot(&config, with_names, &reporter)?;
        let compiled = crate::pipeline::run(&config, &snapshot, self.keep_going, &reporter)?;
        Ok((snapshot, compiled))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Json(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let (_, compiled) = target.input_settings.compile(false)?;
                let json = TableSet::new(compiled).to_json().context("serializing tables")?;
                match target.out.as_ref() {
                    Some(out) => write_file(out, &json)?,
                    None => println!("{json}"),
                }
            }
            Command::Inc(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let reporter = target.input_settings.reporter();
                let (snapshot, compiled) = target.input_settings.compile(!target.no_names)?;
                let rows = match snapshot.get(NAMES_SOURCE) {
                    Some(source) if !target.no_names => match read_unicode_data(&source.text) {
                        Ok(rows) => Some(rows),
                        Err(error) => {
                            reporter.warn(format!("no name comments, {} is unreadable: {error}", source.origin));
                            None
                        }
                    },
                    _ => None,
                };
                let ucd_names = rows.as_deref().map(UcdNames::from_rows);
                let names: &dyn NameLookup = match ucd_names.as_ref() {
                    Some(names) => names,
                    None => &NoNames,
                };

                for family in &compiled {
                    let path = target.out_dir.join(inc::file_name(family));
                    write_file(&path, &render_inc(family, names))?;
                    reporter.status("Wrote", path.display().to_string());
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Source that character names come from.
const NAMES_SOURCE: &str = "UnicodeData";

/// Sources to load: whatever the selected families read, plus the names
/// source when it is configured and wanted.
fn snapshot_sources(config: &Config, with_names: bool) -> Vec<&str> {
    let mut sources = config.required_sources();
    if with_names && config.sources.contains_key(NAMES_SOURCE) && !sources.contains(&NAMES_SOURCE) {
        sources.push(NAMES_SOURCE);
    }
    sources
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
