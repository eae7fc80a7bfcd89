//! Predefined workflow graphs.

use crate::error::Result;
use crate::nodes::{
  CheckLengthRouter, GenerateSummariesNode, MergeSummariesNode, RefineSummaryNode, SplitTextNode,
};
use crate::workflow_graph::WorkflowGraph;

/// Id under which the service pre-registers [summarization_graph].
pub const DEFAULT_SUMMARY_GRAPH_ID: &str = "default_summary_graph";

/// split_text → generate_summaries → merge_summaries → refine_summary, with
/// `check_length` looping refine_summary until the summary has at most
/// `max_length` words.
pub fn summarization_graph() -> Result<WorkflowGraph> {
  let mut graph = WorkflowGraph::new();
  graph
    .add_node(SplitTextNode::NAME, SplitTextNode)?
    .add_node(GenerateSummariesNode::NAME, GenerateSummariesNode)?
    .add_node(MergeSummariesNode::NAME, MergeSummariesNode)?
    .add_node(RefineSummaryNode::NAME, RefineSummaryNode)?
    .set_entry_point(SplitTextNode::NAME)
    .add_edge(SplitTextNode::NAME, GenerateSummariesNode::NAME)
    .add_edge(GenerateSummariesNode::NAME, MergeSummariesNode::NAME)
    .add_edge(MergeSummariesNode::NAME, RefineSummaryNode::NAME)
    .add_conditional_edge(RefineSummaryNode::NAME, CheckLengthRouter);
  Ok(graph)
}
