use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::stats::{Results, Snapshot};

/// Loads the results cached by a previous run. A missing file is an empty
/// cache; an unreadable or malformed one is reported and treated as empty.
pub fn load<P: AsRef<Path>>(path: P) -> Results {
  let path = path.as_ref();

  if !path.exists() {
    return Results::new();
  }

  match read(path) {
    Ok(snapshot) => snapshot.results,
    Err(err) => {
      tracing::warn!("ignoring snapshot {path:?}: {err:#}");
      Results::new()
    }
  }
}

fn read(path: &Path) -> Result<Snapshot> {
  let contents = fs::read_to_string(path).context("read")?;

  serde_json::from_str(&contents).context("parse")
}

/// Overwrites the snapshot at `path` with `results`.
pub fn save<P: AsRef<Path>>(path: P, results: Results) -> Result<()> {
  let path = path.as_ref();
  let json = serde_json::to_string_pretty(&Snapshot { results }).context("serialize")?;

  fs::write(path, json + "\n").with_context(|| format!("write {path:?}"))?;

  Ok(())
}
