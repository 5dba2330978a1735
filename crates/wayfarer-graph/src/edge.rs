use std::collections::HashMap;

use wayfarer_core::error::{Result, WayfarerError};

use crate::state::GraphState;

/// Sentinel node name marking the end of a run. Usable anywhere a target
/// node name is accepted.
pub const END: &str = "__end__";

/// Where control goes after a node completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Continue with the named node.
    To(String),
    /// Terminal sentinel: the run is complete.
    End,
}

impl Transition {
    /// Interpret a target name, mapping the [`END`] sentinel to `End`.
    pub fn from_target(target: &str) -> Self {
        if target == END {
            Transition::End
        } else {
            Transition::To(target.to_string())
        }
    }
}

/// A conditional router: a pure selector over the post-merge state paired
/// with its closed option set.
pub struct Router<S> {
    select: Box<dyn Fn(&S) -> String + Send + Sync>,
    options: HashMap<String, Transition>,
}

impl<S: GraphState> Router<S> {
    pub fn new(
        select: impl Fn(&S) -> String + Send + Sync + 'static,
        options: HashMap<String, Transition>,
    ) -> Self {
        Self {
            select: Box::new(select),
            options,
        }
    }

    /// Pick the transition for the current state. A value outside the
    /// declared option set is a fatal error, never a silent fallback.
    pub fn resolve(&self, node: &str, state: &S) -> Result<Transition> {
        let value = (self.select)(state);
        self.options
            .get(&value)
            .cloned()
            .ok_or(WayfarerError::UndeclaredRoute {
                node: node.to_string(),
                value,
            })
    }

    /// Node names this router can transition to.
    pub(crate) fn targets(&self) -> impl Iterator<Item = &str> {
        self.options.values().filter_map(|t| match t {
            Transition::To(name) => Some(name.as_str()),
            Transition::End => None,
        })
    }
}

/// Outgoing edge decision for a node.
pub(crate) enum EdgeKind<S> {
    Fixed(Transition),
    Conditional(Router<S>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RunState, StateUpdate};
    use crate::state::GraphState as _;

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, Transition> {
        pairs
            .iter()
            .map(|(value, target)| (value.to_string(), Transition::from_target(target)))
            .collect()
    }

    #[test]
    fn test_from_target_maps_sentinel() {
        assert_eq!(Transition::from_target(END), Transition::End);
        assert_eq!(
            Transition::from_target("worker"),
            Transition::To("worker".into())
        );
    }

    #[test]
    fn test_router_resolves_declared_option() {
        let router = Router::new(
            |state: &RunState| state.next.clone().unwrap_or_default(),
            options(&[("worker", "worker_node"), ("FINISH", END)]),
        );

        let mut state = RunState::default();
        state.apply(StateUpdate::route("worker"));
        assert_eq!(
            router.resolve("supervisor", &state).unwrap(),
            Transition::To("worker_node".into())
        );

        state.apply(StateUpdate::route("FINISH"));
        assert_eq!(
            router.resolve("supervisor", &state).unwrap(),
            Transition::End
        );
    }

    #[test]
    fn test_router_rejects_undeclared_option() {
        let router = Router::new(
            |state: &RunState| state.next.clone().unwrap_or_default(),
            options(&[("worker", "worker_node")]),
        );

        let mut state = RunState::default();
        state.apply(StateUpdate::route("intern"));

        let err = router.resolve("supervisor", &state).unwrap_err();
        match err {
            WayfarerError::UndeclaredRoute { node, value } => {
                assert_eq!(node, "supervisor");
                assert_eq!(value, "intern");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_router_is_deterministic() {
        let router = Router::new(
            |state: &RunState| state.next.clone().unwrap_or_default(),
            options(&[("worker", "worker_node")]),
        );
        let mut state = RunState::default();
        state.apply(StateUpdate::route("worker"));

        let first = router.resolve("supervisor", &state).unwrap();
        let second = router.resolve("supervisor", &state).unwrap();
        assert_eq!(first, second);
    }
}
