#![allow(missing_docs)]

pub mod files;
pub mod loader;
pub mod repository;
pub mod resolver;

pub use confserve_sdk as sdk;
pub use files::{content_type_for, FileResolver};
pub use loader::SourceFormat;
pub use repository::{LocalRepository, MemoryRepository};
pub use resolver::{Resolver, DEFAULT_PROFILE};
