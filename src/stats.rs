use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Elapsed time of a single case, in microseconds.
pub type Micros = f64;

/// Timing records for every case, keyed by case name.
pub type Results = BTreeMap<String, Record>;

/// One of the execution backends being compared. `Tc` is the compiler under
/// test, the others are baselines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compiler {
  Llvm,
  Tc,
  Gcc,
  Clang,
}

impl Compiler {
  pub const BASELINES: [Compiler; 3] = [Compiler::Llvm, Compiler::Gcc, Compiler::Clang];

  pub fn as_str(self) -> &'static str {
    match self {
      Compiler::Llvm => "llvm",
      Compiler::Tc => "tc",
      Compiler::Gcc => "gcc",
      Compiler::Clang => "clang",
    }
  }
}

impl fmt::Display for Compiler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Compiler {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "llvm" => Ok(Compiler::Llvm),
      "tc" => Ok(Compiler::Tc),
      "gcc" => Ok(Compiler::Gcc),
      "clang" => Ok(Compiler::Clang),
      _ => anyhow::bail!("unknown compiler {s:?}"),
    }
  }
}

/// Timings for a single case across all compilers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub llvm: Option<Micros>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gcc: Option<Micros>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub clang: Option<Micros>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tc: Option<Micros>,
  /// Whether the case appeared in the most recent log.
  #[serde(default)]
  pub run: bool,
}

impl Record {
  pub fn get(&self, compiler: Compiler) -> Option<Micros> {
    *self.field(compiler)
  }

  pub fn set(&mut self, compiler: Compiler, micros: Micros) {
    *self.field_mut(compiler) = Some(micros);
  }

  fn field(&self, compiler: Compiler) -> &Option<Micros> {
    match compiler {
      Compiler::Llvm => &self.llvm,
      Compiler::Tc => &self.tc,
      Compiler::Gcc => &self.gcc,
      Compiler::Clang => &self.clang,
    }
  }

  fn field_mut(&mut self, compiler: Compiler) -> &mut Option<Micros> {
    match compiler {
      Compiler::Llvm => &mut self.llvm,
      Compiler::Tc => &mut self.tc,
      Compiler::Gcc => &mut self.gcc,
      Compiler::Clang => &mut self.clang,
    }
  }
}

/// On-disk shape of the results cache.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
  pub results: Results,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn compiler_names() {
    for compiler in [Compiler::Llvm, Compiler::Tc, Compiler::Gcc, Compiler::Clang] {
      assert_eq!(compiler.as_str().parse::<Compiler>().unwrap(), compiler);
    }

    assert!("icc".parse::<Compiler>().is_err());
  }

  #[test]
  fn record_omits_missing_timings() {
    let mut record = Record { run: true, ..Default::default() };
    record.set(Compiler::Gcc, 12.0);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json, serde_json::json!({ "gcc": 12.0, "run": true }));
  }

  #[test]
  fn record_reads_null_and_integers() {
    let record: Record = serde_json::from_str(r#"{ "llvm": 1500000, "tc": null }"#).unwrap();

    assert_eq!(record.get(Compiler::Llvm), Some(1_500_000.0));
    assert_eq!(record.get(Compiler::Tc), None);
    assert!(!record.run);
  }
}
