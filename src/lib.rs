pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod spatial;
pub mod star;

pub use config::{CatalogConfig, EnumerationLimits};
pub use error::{Error, Result};
pub use graph::catalog::CatalogIndex;
pub use graph::explorer::VisitPolicy;
pub use spatial::adjacency::Neighbour;
pub use spatial::distance::distance;
pub use star::{StarField, StarRecord};
