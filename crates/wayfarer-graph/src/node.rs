use futures::future::BoxFuture;

use wayfarer_core::error::Result;

use crate::state::GraphState;

/// A unit of work in the graph: read the state snapshot, return a sparse
/// update. Nodes are stateless across invocations except through the state.
pub trait Node<S: GraphState>: Send + Sync + 'static {
    fn run<'a>(&'a self, state: &'a S) -> BoxFuture<'a, Result<S::Update>>;
}

/// Adapter turning a plain synchronous function into a [`Node`].
///
/// Nodes that need to await something implement [`Node`] directly, like
/// [`SaveNode`](crate::save::SaveNode) does.
pub struct FnNode<S: GraphState> {
    func: Box<dyn Fn(&S) -> Result<S::Update> + Send + Sync>,
}

impl<S: GraphState> FnNode<S> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&S) -> Result<S::Update> + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
        }
    }
}

impl<S: GraphState> Node<S> for FnNode<S> {
    fn run<'a>(&'a self, state: &'a S) -> BoxFuture<'a, Result<S::Update>> {
        let result = (self.func)(state);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RunState, StateUpdate};

    #[tokio::test]
    async fn test_fn_node_echoes_input() {
        let node = FnNode::new(|state: &RunState| {
            let heard = state.last_message().map(|m| m.content.clone());
            Ok(StateUpdate::message("echo", heard.unwrap_or_default()))
        });

        let state = RunState::with_input("hello");
        let update = node.run(&state).await.unwrap();
        assert_eq!(update.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn test_fn_node_can_route() {
        let node = FnNode::new(|_: &RunState| Ok(StateUpdate::route("worker")));

        let update = node.run(&RunState::default()).await.unwrap();
        assert_eq!(update.next.as_deref(), Some("worker"));
    }
}
