use thiserror::Error;

#[derive(Debug, Error)]
pub enum WayfarerError {
    // LLM errors
    #[error("LLM request failed: {0}")]
    LlmRequest(String),

    #[error("LLM response parse error: {0}")]
    LlmParse(String),

    #[error("LLM provider not supported: {0}")]
    UnsupportedProvider(String),

    // Tool errors
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution failed: {tool}: {message}")]
    ToolExecution { tool: String, message: String },

    #[error("Tool timeout after {timeout_secs}s: {tool}")]
    ToolTimeout { tool: String, timeout_secs: u64 },

    #[error("Tool input validation failed: {0}")]
    ToolValidation(String),

    // Agent errors
    #[error("Agent exceeded max turns ({0})")]
    MaxTurnsExceeded(usize),

    // Graph configuration errors (raised at compile time, never mid-run)
    #[error("Node '{0}' is already registered")]
    DuplicateNode(String),

    #[error("{context} references unknown node '{node}'")]
    UnknownNode { node: String, context: String },

    #[error("Node '{0}' has no outgoing edge or router")]
    UnroutedNode(String),

    #[error("Graph has no entry point")]
    MissingEntryPoint,

    // Graph execution errors
    #[error("Router at node '{node}' returned undeclared option '{value}'")]
    UndeclaredRoute { node: String, value: String },

    #[error("Run exceeded step limit ({0})")]
    StepLimitExceeded(usize),

    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WayfarerError>;
