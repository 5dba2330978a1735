use std::collections::HashMap;
use std::sync::Arc;

use wayfarer_core::error::{Result, WayfarerError};

use crate::edge::{EdgeKind, Router, Transition, END};
use crate::executor::Graph;
use crate::node::Node;
use crate::state::GraphState;

const DEFAULT_STEP_LIMIT: usize = 50;

/// Build-time assembly of a graph.
///
/// All wiring mistakes (duplicate nodes, dangling edges, router options
/// pointing at unregistered nodes, a missing entry point) are reported by
/// [`compile`](GraphBuilder::compile), so a broken graph never starts
/// executing.
pub struct GraphBuilder<S: GraphState> {
    nodes: Vec<(String, Arc<dyn Node<S>>)>,
    edges: Vec<(String, EdgeKind<S>)>,
    entry: Option<String>,
    step_limit: Option<usize>,
}

impl<S: GraphState> GraphBuilder<S> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            entry: None,
            step_limit: Some(DEFAULT_STEP_LIMIT),
        }
    }

    /// Register a node under a unique name.
    pub fn add_node(mut self, name: impl Into<String>, node: impl Node<S>) -> Self {
        self.nodes.push((name.into(), Arc::new(node)));
        self
    }

    /// Add a fixed transition. `to` may be [`END`].
    pub fn add_edge(mut self, from: impl Into<String>, to: &str) -> Self {
        self.edges
            .push((from.into(), EdgeKind::Fixed(Transition::from_target(to))));
        self
    }

    /// Add a conditional router at `from`. `options` maps every value the
    /// router can return to a target node name (or [`END`]).
    pub fn add_conditional_edges(
        mut self,
        from: impl Into<String>,
        select: impl Fn(&S) -> String + Send + Sync + 'static,
        options: &[(&str, &str)],
    ) -> Self {
        let option_map: HashMap<String, Transition> = options
            .iter()
            .map(|(value, target)| (value.to_string(), Transition::from_target(target)))
            .collect();
        self.edges.push((
            from.into(),
            EdgeKind::Conditional(Router::new(select, option_map)),
        ));
        self
    }

    /// Set the node execution starts from.
    pub fn set_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Cap the number of node executions per run (default 50).
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Remove the step cap. A misrouted cyclic graph will then loop until
    /// the caller kills it.
    pub fn without_step_limit(mut self) -> Self {
        self.step_limit = None;
        self
    }

    /// Validate the wiring and produce an executable graph.
    pub fn compile(self) -> Result<Graph<S>> {
        let mut nodes: HashMap<String, Arc<dyn Node<S>>> = HashMap::new();
        for (name, node) in self.nodes {
            if name == END {
                return Err(WayfarerError::Config(format!(
                    "'{END}' is reserved for the terminal sentinel"
                )));
            }
            if nodes.insert(name.clone(), node).is_some() {
                return Err(WayfarerError::DuplicateNode(name));
            }
        }

        let mut edges: HashMap<String, EdgeKind<S>> = HashMap::new();
        for (from, kind) in self.edges {
            if !nodes.contains_key(&from) {
                return Err(WayfarerError::UnknownNode {
                    node: from,
                    context: "edge source".into(),
                });
            }
            match &kind {
                EdgeKind::Fixed(Transition::To(to)) => {
                    if !nodes.contains_key(to) {
                        return Err(WayfarerError::UnknownNode {
                            node: to.clone(),
                            context: format!("edge from '{from}'"),
                        });
                    }
                }
                EdgeKind::Fixed(Transition::End) => {}
                EdgeKind::Conditional(router) => {
                    for target in router.targets() {
                        if !nodes.contains_key(target) {
                            return Err(WayfarerError::UnknownNode {
                                node: target.to_string(),
                                context: format!("router option at '{from}'"),
                            });
                        }
                    }
                }
            }
            if edges.insert(from.clone(), kind).is_some() {
                return Err(WayfarerError::Config(format!(
                    "node '{from}' already has an outgoing edge"
                )));
            }
        }

        for name in nodes.keys() {
            if !edges.contains_key(name) {
                return Err(WayfarerError::UnroutedNode(name.clone()));
            }
        }

        let entry = self.entry.ok_or(WayfarerError::MissingEntryPoint)?;
        if !nodes.contains_key(&entry) {
            return Err(WayfarerError::UnknownNode {
                node: entry,
                context: "entry point".into(),
            });
        }

        Ok(Graph::new(nodes, edges, entry, self.step_limit))
    }
}

impl<S: GraphState> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::FnNode;
    use crate::state::{RunState, StateUpdate};

    fn noop() -> FnNode<RunState> {
        FnNode::new(|_| Ok(StateUpdate::default()))
    }

    #[test]
    fn test_compile_valid_graph() {
        let graph = GraphBuilder::new()
            .add_node("a", noop())
            .add_node("b", noop())
            .set_entry_point("a")
            .add_edge("a", "b")
            .add_edge("b", END)
            .compile()
            .unwrap();
        assert_eq!(graph.entry_point(), "a");
    }

    #[test]
    fn test_duplicate_node_is_rejected() {
        let err = GraphBuilder::new()
            .add_node("a", noop())
            .add_node("a", noop())
            .set_entry_point("a")
            .add_edge("a", END)
            .compile()
            .unwrap_err();
        assert!(matches!(err, WayfarerError::DuplicateNode(name) if name == "a"));
    }

    #[test]
    fn test_dangling_edge_is_rejected() {
        let err = GraphBuilder::new()
            .add_node("a", noop())
            .set_entry_point("a")
            .add_edge("a", "ghost")
            .compile()
            .unwrap_err();
        assert!(matches!(err, WayfarerError::UnknownNode { node, .. } if node == "ghost"));
    }

    #[test]
    fn test_router_target_is_validated() {
        let err = GraphBuilder::new()
            .add_node("a", noop())
            .set_entry_point("a")
            .add_conditional_edges(
                "a",
                |_: &RunState| "x".into(),
                &[("x", "ghost"), ("done", END)],
            )
            .compile()
            .unwrap_err();
        assert!(matches!(err, WayfarerError::UnknownNode { node, .. } if node == "ghost"));
    }

    #[test]
    fn test_missing_entry_point() {
        let err = GraphBuilder::new()
            .add_node("a", noop())
            .add_edge("a", END)
            .compile()
            .unwrap_err();
        assert!(matches!(err, WayfarerError::MissingEntryPoint));
    }

    #[test]
    fn test_unknown_entry_point() {
        let err = GraphBuilder::new()
            .add_node("a", noop())
            .set_entry_point("ghost")
            .add_edge("a", END)
            .compile()
            .unwrap_err();
        assert!(matches!(err, WayfarerError::UnknownNode { node, .. } if node == "ghost"));
    }

    #[test]
    fn test_unrouted_node_is_rejected() {
        let err = GraphBuilder::new()
            .add_node("a", noop())
            .add_node("island", noop())
            .set_entry_point("a")
            .add_edge("a", END)
            .compile()
            .unwrap_err();
        assert!(matches!(err, WayfarerError::UnroutedNode(name) if name == "island"));
    }

    #[test]
    fn test_second_edge_for_same_node_is_rejected() {
        let err = GraphBuilder::new()
            .add_node("a", noop())
            .add_node("b", noop())
            .set_entry_point("a")
            .add_edge("a", "b")
            .add_edge("a", END)
            .add_edge("b", END)
            .compile()
            .unwrap_err();
        assert!(matches!(err, WayfarerError::Config(_)));
    }

    #[test]
    fn test_reserved_sentinel_name() {
        let err = GraphBuilder::new()
            .add_node(END, noop())
            .set_entry_point(END)
            .compile()
            .unwrap_err();
        assert!(matches!(err, WayfarerError::Config(_)));
    }
}
