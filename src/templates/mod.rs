//! Template value objects and storage-facing collaborator ports
//!
//! The [`Template`] record is immutable by convention: a changed field
//! means a new instance. Repositories and partial loaders are async
//! ports so that storage backends (object stores, HTTP services,
//! in-process fixtures) stay out of the core.

pub mod errors;
pub mod memory_repository;
pub mod traits;
pub mod types;

pub use errors::*;
pub use memory_repository::*;
pub use traits::*;
pub use types::*;
