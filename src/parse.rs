use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::stats::{Compiler, Micros, Record, Results};

/// A dashed line followed by a blank line ends each test block.
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^-{3,}[ \t]*\r?\n[ \t]*\r?\n").unwrap());

static TIMING: Lazy<Regex> = Lazy::new(|| {
  Regex::new(concat!(
    r"Test: check_run_(llvm|tc|gcc|clang)_(\S+)",
    r"(?s:.*?)",
    r"TOTAL: (\d+)H-(\d+)M-(\d+)S-(\d+)us",
  ))
  .unwrap()
});

/// A single `TOTAL` measurement found in a log.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
  pub compiler: Compiler,
  pub case: String,
  pub micros: u64,
}

/// Converts an `H`, `M`, `S`, `us` duration into total microseconds, failing
/// on overflow.
pub fn total_micros(hours: u64, minutes: u64, seconds: u64, micros: u64) -> Option<u64> {
  hours
    .checked_mul(60)?
    .checked_add(minutes)?
    .checked_mul(60)?
    .checked_add(seconds)?
    .checked_mul(1_000_000)?
    .checked_add(micros)
}

/// Returns every timing in a block. Any malformed timing rejects the whole
/// block.
pub fn parse_block(block: &str) -> Result<Vec<Timing>> {
  TIMING
    .captures_iter(block)
    .map(|caps| -> Result<Timing> {
      let case = &caps[2];
      let field = |i: usize| caps[i].parse::<u64>().with_context(|| format!("{case}: parse {:?}", &caps[i]));

      let micros = total_micros(field(3)?, field(4)?, field(5)?, field(6)?)
        .with_context(|| format!("{case}: duration overflows"))?;

      Ok(Timing {
        compiler: caps[1].parse()?,
        case: case.to_string(),
        micros,
      })
    })
    .collect()
}

/// Splits a log into blocks and collects the timings of each well-formed one.
pub fn parse_log(log: &str) -> Vec<Timing> {
  let mut timings = Vec::new();

  for (i, block) in BLOCK_SEPARATOR.split(log).enumerate() {
    match parse_block(block) {
      Ok(block_timings) => timings.extend(block_timings),
      Err(err) => tracing::debug!(block = i, "skipping block: {err:#}"),
    }
  }

  timings
}

/// Returns `(case, total)` for every case of `compiler` in the whole log, with
/// the total exactly as printed. Blocks and the total's format are ignored.
pub fn raw_totals(log: &str, compiler: Compiler) -> Result<Vec<(String, String)>> {
  let pattern = Regex::new(&format!(r"Test: check_run_{compiler}_(.*)(?s:.*?)TOTAL: (.*)")).context("pattern")?;

  Ok(
    pattern
      .captures_iter(log)
      .map(|caps| (caps[1].to_string(), caps[2].to_string()))
      .collect(),
  )
}

/// Builds fresh results from a log. Every case seen is marked as run.
pub fn parse_results(log: &str) -> Results {
  let mut results = Results::new();

  for timing in parse_log(log) {
    results
      .entry(timing.case)
      .or_insert_with(|| Record { run: true, ..Default::default() })
      .set(timing.compiler, timing.micros as Micros);
  }

  results
}
