//! Save run snapshots as JSON files (used by the `run_workflow` CLI).

use std::path::Path;

use tracing::instrument;

use crate::error::Result;
use crate::types::RunSnapshot;

/// Default filename for a run snapshot under an output directory.
pub const SNAPSHOT_FILENAME: &str = "run.json";

/// Writes `snapshot` to `path` as pretty JSON, creating parent directories.
#[instrument(level = "trace", skip(path, snapshot))]
pub fn save_run_snapshot(path: &Path, snapshot: &RunSnapshot) -> Result<()> {
  let json = serde_json::to_string_pretty(snapshot)?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)?;
  Ok(())
}
