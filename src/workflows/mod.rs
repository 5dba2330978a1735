pub mod research;
pub mod travel;
pub mod weather;

pub use research::build_research_graph;
pub use travel::build_travel_graph;
pub use weather::build_weather_graph;
