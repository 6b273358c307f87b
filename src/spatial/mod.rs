pub mod adjacency;
pub mod distance;
