//! Application layer - Use cases and orchestration
//!
//! Services for calendar events, tasks, the daily briefing and the quote
//! almanac. Storage is reached only through the ports defined here;
//! adapters in the infrastructure layer implement them.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
