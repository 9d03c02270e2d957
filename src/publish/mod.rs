//! Publishing templates to an external template-hosting service
//!
//! The publisher drives the renderer's re-output mode to express a
//! template in the host's dialect, then ships it with a
//! create-or-update fallback: attempt create, and on an
//! "already exists" response retry exactly once as update.

pub mod errors;
pub mod host_publisher;
pub mod traits;
pub mod types;

pub use errors::*;
pub use host_publisher::*;
pub use traits::*;
pub use types::*;
