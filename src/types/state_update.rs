//! Merge a node's partial update into the run state.

use tracing::instrument;

use super::{StateRecord, StateUpdate};

/// Shallow merge: keys in `update` are inserted or overwrite the existing value,
/// keys absent from `update` are left untouched.
#[instrument(level = "trace", skip(state, update))]
pub fn merge_update(state: &mut StateRecord, update: StateUpdate) {
  for (k, v) in update {
    state.insert(k, v);
  }
}
