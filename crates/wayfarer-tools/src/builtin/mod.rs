pub mod image;
pub mod pdf;
pub mod research;
pub mod search;
pub mod weather;

pub use image::GenerateImageTool;
pub use pdf::MarkdownToPdfTool;
pub use research::ResearchTool;
pub use search::WebSearchTool;
pub use weather::WeatherTool;
