#![doc = include_str!("../README.md")]

mod error;
mod source;
mod types;

pub use error::{RepoError, RepoResult};
pub use source::{ConfigSource, Snapshot};
pub use types::{FailedSource, PropertySource, PropertyValue, Resolution, ResolvedFile};
