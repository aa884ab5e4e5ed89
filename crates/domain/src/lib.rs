//! Domain layer for the homelab control plane
//!
//! Calendar events, tasks, the drafts and patches that create or change them,
//! and the value objects shared by every layer. No I/O lives here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
