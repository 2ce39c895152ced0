use std::fmt::Write;

use anyhow::Result;

use crate::stats::{Compiler, Micros, Record, Results};

const COLUMN_WIDTH: usize = 14;
const COLUMN_PADDING: &str = "  ";

/// Columns holding absolute times, in seconds.
const TIMES: [Compiler; 4] = [Compiler::Llvm, Compiler::Gcc, Compiler::Clang, Compiler::Tc];

fn join_row<'a, I: IntoIterator<Item = &'a str>>(case_width: usize, case: &str, cols: I) -> String {
  std::iter::once(format!("{case:<case_width$}"))
    .chain(cols.into_iter().map(|col| format!("{col:>COLUMN_WIDTH$}")))
    .collect::<Vec<_>>()
    .join(COLUMN_PADDING)
}

fn format_header(case_width: usize) -> String {
  let times = TIMES.map(Compiler::as_str);
  let ratios = Compiler::BASELINES.map(|baseline| format!("tc/{baseline}"));

  let header = join_row(
    case_width,
    "case",
    times.into_iter().chain(ratios.iter().map(String::as_str)),
  );

  format!("{header}\n{}", "=".repeat(header.len()))
}

/// Formats microseconds as seconds, `nan` when missing.
pub fn seconds(micros: Option<Micros>) -> String {
  match micros {
    Some(micros) => format!("{:.6}", micros / 1e6),
    None => "nan".to_string(),
  }
}

/// Formats `tc` as a percentage of `baseline`. A zero baseline is `N/A`.
pub fn ratio(tc: Option<Micros>, baseline: Option<Micros>) -> String {
  if baseline == Some(0.0) {
    return "N/A".to_string();
  }

  match (tc, baseline) {
    (Some(tc), Some(baseline)) => format!("{:.2}%", tc * 100.0 / baseline),
    _ => "nan%".to_string(),
  }
}

fn format_row(case_width: usize, case: &str, record: &Record) -> String {
  let times = TIMES.map(|compiler| seconds(record.get(compiler)));
  let ratios = Compiler::BASELINES.map(|baseline| ratio(record.tc, record.get(baseline)));

  join_row(case_width, case, times.iter().chain(&ratios).map(String::as_str))
}

/// Renders the comparison table of every case in `results`.
pub fn format(results: &Results) -> Result<String> {
  let case_width = results
    .keys()
    .map(|case| case.len())
    .max()
    .unwrap_or(0)
    .max(COLUMN_WIDTH);

  let mut table = String::new();

  writeln!(table, "{}", format_header(case_width))?;
  for (case, record) in results {
    writeln!(table, "{}", format_row(case_width, case, record))?;
  }

  Ok(table)
}
