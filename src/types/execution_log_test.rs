//! Tests for `ExecutionLog`.

use super::ExecutionLog;

#[test]
fn new_is_empty() {
  let log = ExecutionLog::new();
  assert!(log.is_empty());
  assert_eq!(log.last(), None);
}

#[test]
fn records_entries_in_order() {
  let mut log = ExecutionLog::new();
  log.record_executed("split_text");
  log.record_error("refine_summary", "boom");
  assert_eq!(
    log.entries(),
    &["Executed split_text", "Error in refine_summary: boom"]
  );
  assert_eq!(log.last(), Some("Error in refine_summary: boom"));
}

#[test]
fn limit_entries() {
  let mut log = ExecutionLog::new();
  log.record_step_limit(5, "loop");
  log.record_cancelled("a");
  log.record_timeout("b");
  assert_eq!(
    log.entries(),
    vec![
      "Step limit of 5 exceeded before loop",
      "Run cancelled before a",
      "Run timed out at b",
    ]
  );
}

#[test]
fn executed_count_matches_exact_node() {
  let mut log = ExecutionLog::new();
  log.record_executed("refine");
  log.record_executed("refine_summary");
  log.record_executed("refine");
  assert_eq!(log.executed_count("refine"), 2);
  assert_eq!(log.executed_count("refine_summary"), 1);
  assert_eq!(log.executed_count("missing"), 0);
}

#[test]
fn serializes_as_string_array() {
  let mut log = ExecutionLog::new();
  log.record_executed("a");
  let json = serde_json::to_value(&log).unwrap();
  assert_eq!(json, serde_json::json!(["Executed a"]));
  let back: ExecutionLog = serde_json::from_value(json).unwrap();
  assert_eq!(back, log);
}
