pub mod grouping;
pub mod operations;
pub mod types;

pub use grouping::{NavigationGroup, NavigationItem, SearchEntry};
pub use operations::*;
pub use types::{NormalizedServer, NormalizedSpec, OperationNode};
