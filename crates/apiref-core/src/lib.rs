pub mod cache;
pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod reference;
pub mod request;
pub mod transform;

pub use config::{ReferenceConfig, SpecConfig, SpecSource};
pub use error::{ConfigError, ReferenceError, SourceError};
pub use reference::ApiReference;
pub use request::PreparedRequest;
