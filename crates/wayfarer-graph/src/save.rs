use std::path::PathBuf;

use futures::future::BoxFuture;
use tracing::info;
use uuid::Uuid;

use wayfarer_core::error::{Result, WayfarerError};

use crate::node::Node;
use crate::state::{RunState, StateUpdate};

/// Leaf node that persists the last message to durable storage and confirms
/// with a message of its own before the graph ends.
pub struct SaveNode {
    name: String,
    output_dir: PathBuf,
}

impl SaveNode {
    pub fn new(name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            output_dir: output_dir.into(),
        }
    }
}

impl Node<RunState> for SaveNode {
    fn run<'a>(&'a self, state: &'a RunState) -> BoxFuture<'a, Result<StateUpdate>> {
        Box::pin(async move {
            let content = state
                .last_message()
                .map(|m| m.content.clone())
                .ok_or_else(|| {
                    WayfarerError::Config(format!(
                        "node '{}' requires at least one message",
                        self.name
                    ))
                })?;

            tokio::fs::create_dir_all(&self.output_dir).await?;
            let path = self.output_dir.join(format!("{}.md", Uuid::new_v4()));
            tokio::fs::write(&path, content).await?;

            info!(node = %self.name, path = %path.display(), "Output saved");

            Ok(StateUpdate::message(
                &self.name,
                format!("Output written successfully to {}", path.display()),
            ))
        })
    }
}
