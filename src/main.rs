mod codegen;
mod ext;
mod format;
mod merge;
mod parse;
mod snapshot;
mod stats;

use std::{
  fs,
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{codegen::Codegen, stats::Compiler};

const DEFAULT_LOG_FILTER: &str = "warn";

/// Compares benchmark timings of `tc` against llvm, gcc and clang.
#[derive(Parser)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
  #[command(subcommand)]
  command: Option<Command>,
  #[command(flatten)]
  compare: Compare,
}

/// Merges a benchmark log into the results snapshot and prints a comparison.
///
/// The paths are `Option` so that `subcommand_negates_reqs` can lift the
/// requirement when a subcommand is given; clap still enforces both otherwise.
#[derive(ClapArgs, Debug)]
struct Compare {
  /// Benchmark log to parse.
  #[arg(required = true)]
  log: Option<PathBuf>,
  /// JSON snapshot of previous results, rewritten after the merge.
  #[arg(required = true)]
  snapshot: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Prints the raw total of every case run with one compiler.
  Extract {
    /// Benchmark log to parse.
    log: PathBuf,
    /// Which compiler's timings to print.
    #[arg(short, long, default_value = "llvm")]
    compiler: Compiler,
  },
  /// Runs the parser generator and splits its output into a header and a
  /// source file.
  Gen {
    /// Parser generator executable.
    #[arg(long, default_value = "parser_gen")]
    generator: PathBuf,
    /// Grammar description passed to the generator.
    #[arg(long, default_value = "parser.toml")]
    config: PathBuf,
    /// Directory receiving `parser.hpp` and `parser.cpp`.
    #[arg(long, default_value = "src/generated")]
    out_dir: PathBuf,
    /// Kill the generator after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,
  },
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

  let _ = tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(filter)
    .try_init();
}

fn read_log(path: &Path) -> Result<String> {
  fs::read_to_string(path).with_context(|| format!("read {path:?}"))
}

fn compare(log: PathBuf, snapshot_path: PathBuf) -> Result<()> {
  let fresh = parse::parse_results(&read_log(&log)?);
  let prior = snapshot::load(&snapshot_path);
  tracing::info!(fresh = fresh.len(), prior = prior.len(), "merging results");

  let (shown, merged) = merge::merge(fresh, prior);

  println!("{}", format::format(&shown).context("format")?);

  snapshot::save(&snapshot_path, merged).context("save snapshot")
}

fn extract(log: PathBuf, compiler: Compiler) -> Result<()> {
  for (case, total) in parse::raw_totals(&read_log(&log)?, compiler)? {
    println!("{case}: {total}");
  }

  Ok(())
}

fn main() -> Result<()> {
  init_tracing();

  let args = Args::parse();

  match args.command {
    Some(Command::Extract { log, compiler }) => extract(log, compiler),
    Some(Command::Gen {
      generator,
      config,
      out_dir,
      timeout,
    }) => Codegen {
      generator,
      config,
      out_dir,
      timeout: timeout.map(Duration::from_secs),
    }
    .run()
    .context("gen"),
    None => {
      let Compare { log, snapshot } = args.compare;

      compare(
        log.context("missing log path")?,
        snapshot.context("missing snapshot path")?,
      )
    }
  }
}
