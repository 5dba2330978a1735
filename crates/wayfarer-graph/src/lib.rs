//! Graph engine — orchestrates agent workflows over a shared run state.
//!
//! A workflow is a directed graph of named [`Node`]s. The [`Graph`] executor
//! walks it sequentially from an entry node: run the current node against a
//! snapshot of the state, merge the returned [`StateUpdate`], then follow a
//! fixed edge or consult a [`Router`] until the terminal sentinel is
//! reached. Messages accumulate append-only and carry the name of the node
//! that produced them.
//!
//! Graphs are assembled with [`GraphBuilder`], which validates all wiring
//! before anything executes.

pub mod agent;
pub mod builder;
pub mod edge;
pub mod executor;
pub mod node;
pub mod react;
pub mod save;
pub mod state;
pub mod supervisor;

pub use agent::{AgentNode, AgentRunner};
pub use builder::GraphBuilder;
pub use edge::{Router, Transition, END};
pub use executor::{ExecutionReport, Graph, StepRecord};
pub use node::{FnNode, Node};
pub use react::{ReasonNode, ToolExecutorNode};
pub use save::SaveNode;
pub use state::{
    AgentOutcome, AgentStep, GraphState, Message, Origin, RunState, StateUpdate, ToolInvocation,
};
pub use supervisor::{SupervisorNode, FINISH};
