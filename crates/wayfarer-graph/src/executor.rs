use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use wayfarer_core::error::{Result, WayfarerError};

use crate::edge::{EdgeKind, Transition};
use crate::node::Node;
use crate::state::GraphState;

/// One executed node in a run, in execution order.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub node: String,
    pub elapsed_ms: u64,
}

/// Result of executing an entire graph.
#[derive(Debug, Clone)]
pub struct ExecutionReport<S> {
    /// The final merged state.
    pub state: S,
    /// Per-node records in execution order.
    pub steps: Vec<StepRecord>,
    /// Total execution time in milliseconds.
    pub total_elapsed_ms: u64,
}

impl<S> ExecutionReport<S> {
    /// Node names in execution order.
    pub fn trace(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.node.as_str()).collect()
    }
}

/// A compiled, executable graph. Built by
/// [`GraphBuilder`](crate::builder::GraphBuilder); immutable afterwards.
///
/// Execution is a strictly sequential interpreter. One node runs to
/// completion and has its update merged before the next node is resolved
/// from the edge table, until the terminal sentinel is reached.
pub struct Graph<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: HashMap<String, EdgeKind<S>>,
    entry: String,
    step_limit: Option<usize>,
}

impl<S: GraphState> Graph<S> {
    pub(crate) fn new(
        nodes: HashMap<String, Arc<dyn Node<S>>>,
        edges: HashMap<String, EdgeKind<S>>,
        entry: String,
        step_limit: Option<usize>,
    ) -> Self {
        Self {
            nodes,
            edges,
            entry,
            step_limit,
        }
    }

    pub fn entry_point(&self) -> &str {
        &self.entry
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.keys().map(|s| s.as_str()).collect()
    }

    /// Run the graph to the terminal sentinel.
    ///
    /// A node error aborts the run before that node's update is merged; the
    /// error reaches the caller unchanged and no final state is produced.
    pub async fn execute(&self, initial_state: S) -> Result<ExecutionReport<S>> {
        let start = Instant::now();
        let mut state = initial_state;
        let mut steps: Vec<StepRecord> = Vec::new();
        let mut current = self.entry.clone();

        loop {
            if let Some(limit) = self.step_limit {
                if steps.len() >= limit {
                    return Err(WayfarerError::StepLimitExceeded(limit));
                }
            }

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| WayfarerError::UnknownNode {
                    node: current.clone(),
                    context: "execution".into(),
                })?;

            info!(node = %current, step = steps.len(), "Executing graph node");

            let node_start = Instant::now();
            let update = node.run(&state).await?;
            state.apply(update);

            steps.push(StepRecord {
                node: current.clone(),
                elapsed_ms: node_start.elapsed().as_millis() as u64,
            });

            let transition = match self.edges.get(&current) {
                Some(EdgeKind::Fixed(t)) => t.clone(),
                Some(EdgeKind::Conditional(router)) => router.resolve(&current, &state)?,
                None => return Err(WayfarerError::UnroutedNode(current)),
            };

            match transition {
                Transition::To(next) => {
                    debug!(from = %current, to = %next, "Edge resolved");
                    current = next;
                }
                Transition::End => {
                    debug!(node = %current, "Terminal sentinel reached");
                    break;
                }
            }
        }

        let total_elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            steps = steps.len(),
            total_elapsed_ms, "Graph execution complete"
        );

        Ok(ExecutionReport {
            state,
            steps,
            total_elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::edge::END;
    use crate::node::FnNode;
    use crate::state::{RunState, StateUpdate};

    fn say(node: &'static str, text: &'static str) -> FnNode<RunState> {
        FnNode::new(move |_| Ok(StateUpdate::message(node, text)))
    }

    #[tokio::test]
    async fn test_linear_execution_order() {
        let graph = GraphBuilder::new()
            .add_node("a", say("a", "first"))
            .add_node("b", say("b", "second"))
            .set_entry_point("a")
            .add_edge("a", "b")
            .add_edge("b", END)
            .compile()
            .unwrap();

        let report = graph.execute(RunState::default()).await.unwrap();
        assert_eq!(report.trace(), vec!["a", "b"]);
        assert_eq!(report.state.messages.len(), 2);
        assert_eq!(report.state.messages[0].content, "first");
        assert_eq!(report.state.messages[1].content, "second");
    }

    #[tokio::test]
    async fn test_acyclic_graph_terminates_in_path_length_steps() {
        let graph = GraphBuilder::new()
            .add_node("a", say("a", "x"))
            .add_node("b", say("b", "y"))
            .add_node("c", say("c", "z"))
            .set_entry_point("a")
            .add_edge("a", "b")
            .add_edge("b", "c")
            .add_edge("c", END)
            .compile()
            .unwrap();

        let report = graph.execute(RunState::default()).await.unwrap();
        assert_eq!(report.steps.len(), 3);
    }

    #[tokio::test]
    async fn test_step_limit_stops_cycle() {
        let graph = GraphBuilder::new()
            .add_node("a", say("a", "again"))
            .set_entry_point("a")
            .add_edge("a", "a")
            .with_step_limit(7)
            .compile()
            .unwrap();

        let err = graph.execute(RunState::default()).await.unwrap_err();
        assert!(matches!(err, WayfarerError::StepLimitExceeded(7)));
    }
}
