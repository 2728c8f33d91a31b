pub mod content;
pub mod example;
pub mod normalize;
pub mod ordering;
pub mod slug;

pub use normalize::{normalize_operation, normalize_spec};
pub use slug::build_operation_key;
