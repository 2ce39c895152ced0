use crate::stats::{Compiler, Results};

/// Compilers whose timings survive runs that did not exercise them.
const BACKFILLED: [Compiler; 2] = [Compiler::Gcc, Compiler::Clang];

/// Fills in `gcc` and `clang` timings that the current log lacks from the
/// previous snapshot. Timings measured in this run are never replaced.
pub fn backfill(fresh: &mut Results, prior: &Results) {
  for (case, record) in fresh.iter_mut() {
    let Some(old) = prior.get(case) else {
      continue;
    };

    for compiler in BACKFILLED {
      if let (None, Some(micros)) = (record.get(compiler), old.get(compiler)) {
        record.set(compiler, micros);
      }
    }
  }
}

/// Adds every case of `prior` missing from `fresh`, marked as not run.
pub fn carry_forward(mut fresh: Results, prior: Results) -> Results {
  for (case, mut record) in prior {
    if !fresh.contains_key(&case) {
      record.run = false;
      fresh.insert(case, record);
    }
  }

  fresh
}

/// Merges a freshly parsed run with the previous snapshot, returning what is
/// rendered and what gets persisted.
pub fn merge(mut fresh: Results, prior: Results) -> (Results, Results) {
  backfill(&mut fresh, &prior);
  let merged = carry_forward(fresh.clone(), prior);

  (fresh, merged)
}
