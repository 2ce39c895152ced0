use std::{
  process::{Child, Command, ExitStatus},
  time::Duration,
};

use anyhow::{Context, Result};
use tempfile::{Builder, NamedTempFile};
use wait_timeout::ChildExt as WaitExt;

#[extend::ext]
pub impl ExitStatus {
  fn check_success(&self) -> Result<()> {
    if !self.success() {
      anyhow::bail!("exited with non-zero status {self}");
    }

    Ok(())
  }
}

#[extend::ext]
pub impl Child {
  /// Returns an error if the exit status was non-zero. On timeout, kills the
  /// child and returns `Ok(None)`.
  fn check_success_timeout(&mut self, timeout: Duration) -> Result<Option<()>> {
    let Some(status) = self.wait_timeout(timeout).context("wait")? else {
      self.kill().context("kill after timeout")?;
      self.wait().context("wait after kill")?;

      return Ok(None);
    };

    status.check_success()?;

    Ok(Some(()))
  }
}

#[extend::ext]
pub impl Command {
  /// Runs the command to completion, returning an error on non-zero exit.
  fn check_success(&mut self) -> Result<()> {
    self.status().context("status")?.check_success()
  }
}

#[extend::ext]
pub impl NamedTempFile {
  /// Creates a `tc-bench-` prefixed temporary file ending in `suffix`.
  fn scratch(suffix: &str) -> Result<NamedTempFile> {
    Builder::new().prefix("tc-bench-").suffix(suffix).tempfile().context("tempfile")
  }
}
