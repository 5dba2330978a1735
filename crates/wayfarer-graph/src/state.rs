use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a message came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Supplied by the caller before the run started.
    External,
    /// Produced by the named graph node.
    Node(String),
}

impl Origin {
    /// The producing node's name, if any.
    pub fn node_name(&self) -> Option<&str> {
        match self {
            Origin::External => None,
            Origin::Node(name) => Some(name),
        }
    }
}

/// One entry in the shared conversation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn external(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            origin: Origin::External,
            timestamp: Some(Utc::now()),
        }
    }

    pub fn from_node(node: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            origin: Origin::Node(node.into()),
            timestamp: Some(Utc::now()),
        }
    }
}

/// A tool call requested by a reasoning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub input: serde_json::Value,
}

/// One completed reason/act round: the action taken and what it returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStep {
    pub action: ToolInvocation,
    pub observation: String,
}

/// Outcome of a single reasoning step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentOutcome {
    /// The agent wants a tool executed before it can answer.
    Action(ToolInvocation),
    /// The agent produced its final answer.
    Finish { output: String },
}

impl AgentOutcome {
    pub fn is_finish(&self) -> bool {
        matches!(self, AgentOutcome::Finish { .. })
    }
}

/// Shared state for one graph run.
///
/// Owned exclusively by the executor; nodes receive a read view and hand
/// back a [`StateUpdate`]. `messages` and `intermediate_steps` only ever
/// grow, `next` and `agent_outcome` are last-writer-wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_outcome: Option<AgentOutcome>,
    #[serde(default)]
    pub intermediate_steps: Vec<AgentStep>,
}

impl RunState {
    /// Fresh state seeded with one external input message.
    pub fn with_input(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::external(content)],
            ..Default::default()
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Sparse patch returned by a node. Unset fields leave the state untouched.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
    pub next: Option<String>,
    pub agent_outcome: Option<AgentOutcome>,
    pub intermediate_steps: Vec<AgentStep>,
}

impl StateUpdate {
    /// An update appending one message attributed to `node`.
    pub fn message(node: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::from_node(node, content)],
            ..Default::default()
        }
    }

    /// An update setting the routing hint.
    pub fn route(next: impl Into<String>) -> Self {
        Self {
            next: Some(next.into()),
            ..Default::default()
        }
    }

    /// An update setting the reasoning outcome.
    pub fn outcome(outcome: AgentOutcome) -> Self {
        Self {
            agent_outcome: Some(outcome),
            ..Default::default()
        }
    }

    /// An update appending one scratchpad step.
    pub fn step(step: AgentStep) -> Self {
        Self {
            intermediate_steps: vec![step],
            ..Default::default()
        }
    }
}

/// State flowing through a graph.
///
/// `apply` is the merge policy: it decides, per field, how a node's partial
/// update folds into the whole. The executor is the only caller.
pub trait GraphState: Clone + Send + Sync + 'static {
    type Update: Send + 'static;

    fn apply(&mut self, update: Self::Update);
}

impl GraphState for RunState {
    type Update = StateUpdate;

    fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);
        self.intermediate_steps.extend(update.intermediate_steps);
        if let Some(next) = update.next {
            self.next = Some(next);
        }
        if let Some(outcome) = update.agent_outcome {
            self.agent_outcome = Some(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_append_only() {
        let mut state = RunState::with_input("plan a trip");
        state.apply(StateUpdate::message("travel_agent", "day one: museums"));
        state.apply(StateUpdate::message("visualizer", "images/x.png"));

        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.messages[0].origin, Origin::External);
        assert_eq!(
            state.messages[1].origin,
            Origin::Node("travel_agent".into())
        );
        assert_eq!(state.messages[2].content, "images/x.png");
    }

    #[test]
    fn test_scalar_fields_overwrite() {
        let mut state = RunState::default();
        state.apply(StateUpdate::route("worker"));
        state.apply(StateUpdate::route("FINISH"));

        assert_eq!(state.next.as_deref(), Some("FINISH"));
    }

    #[test]
    fn test_empty_update_leaves_scalars() {
        let mut state = RunState::default();
        state.apply(StateUpdate::route("worker"));
        state.apply(StateUpdate::message("worker", "done"));

        // A message-only update must not clear the routing hint.
        assert_eq!(state.next.as_deref(), Some("worker"));
    }

    #[test]
    fn test_merge_non_interference() {
        let mut state = RunState::with_input("hello");
        let before = state.messages.len();

        state.apply(StateUpdate::route("anywhere"));
        assert_eq!(state.messages.len(), before);

        state.apply(StateUpdate::message("node_a", "reply"));
        assert_eq!(state.next.as_deref(), Some("anywhere"));
    }

    #[test]
    fn test_steps_accumulate() {
        let mut state = RunState::default();
        let step = |n: &str| AgentStep {
            action: ToolInvocation {
                tool: n.into(),
                input: serde_json::json!({}),
            },
            observation: "ok".into(),
        };
        state.apply(StateUpdate::step(step("get_weather")));
        state.apply(StateUpdate::step(step("generate_image")));

        assert_eq!(state.intermediate_steps.len(), 2);
        assert_eq!(state.intermediate_steps[0].action.tool, "get_weather");
    }

    #[test]
    fn test_outcome_is_replaced() {
        let mut state = RunState::default();
        state.apply(StateUpdate::outcome(AgentOutcome::Action(ToolInvocation {
            tool: "get_weather".into(),
            input: serde_json::json!({"location": "Seoul"}),
        })));
        assert!(!state.agent_outcome.as_ref().unwrap().is_finish());

        state.apply(StateUpdate::outcome(AgentOutcome::Finish {
            output: "sunny".into(),
        }));
        assert!(state.agent_outcome.as_ref().unwrap().is_finish());
    }
}
