use std::{
  fs,
  path::PathBuf,
  process::Command,
  time::Duration,
};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::ext::{ChildExt, CommandExt, NamedTempFileExt};

/// Marks the end of the declarations in the generator's output.
const SEPARATOR: &str = "\n\n\n";

const HEADER_PRELUDE: &str = "#pragma once\n\n";
const SOURCE_PRELUDE: &str = "#include \"parser.hpp\"\n\n";

pub struct Codegen {
  /// Parser generator executable.
  pub generator: PathBuf,
  /// Grammar description passed to the generator.
  pub config: PathBuf,
  /// Directory receiving `parser.hpp` and `parser.cpp`.
  pub out_dir: PathBuf,
  /// Kill the generator after this long.
  pub timeout: Option<Duration>,
}

impl Codegen {
  pub fn run(&self) -> Result<()> {
    let generated = self.generate().context("generate")?;
    let (header, source) = split(&generated).context("split")?;

    fs::create_dir_all(&self.out_dir).with_context(|| format!("create_dir {:?}", self.out_dir))?;
    self.write("parser.hpp", &header)?;
    self.write("parser.cpp", &source)?;

    Ok(())
  }

  /// Runs the generator into a temporary file and returns its contents.
  fn generate(&self) -> Result<String> {
    let output = NamedTempFile::scratch(".cpp")?;

    let mut command = Command::new(&self.generator);
    command
      .arg(&self.config)
      .args(["--lang", "cpp", "-o"])
      .arg(output.path());

    tracing::info!("running {command:?}");

    match self.timeout {
      Some(timeout) => {
        let mut child = command.spawn().context("spawn")?;
        if child.check_success_timeout(timeout)?.is_none() {
          anyhow::bail!("{:?} timed out after {timeout:?}", self.generator);
        }
      }
      None => command.check_success()?,
    }

    fs::read_to_string(output.path()).context("read generated parser")
  }

  fn write(&self, name: &str, contents: &str) -> Result<()> {
    let path = self.out_dir.join(name);
    tracing::info!("writing {path:?}");

    fs::write(&path, contents).with_context(|| format!("write {path:?}"))
  }
}

/// Splits generated code at the first blank-line pair into a header and a
/// source file.
pub fn split(generated: &str) -> Result<(String, String)> {
  let Some((declarations, definitions)) = generated.split_once(SEPARATOR) else {
    anyhow::bail!("no {SEPARATOR:?} separating declarations from definitions");
  };

  Ok((
    format!("{HEADER_PRELUDE}{declarations}"),
    format!("{SOURCE_PRELUDE}{definitions}"),
  ))
}
