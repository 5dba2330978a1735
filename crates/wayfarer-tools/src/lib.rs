pub mod builtin;
mod registry;

pub use registry::ToolRegistry;
