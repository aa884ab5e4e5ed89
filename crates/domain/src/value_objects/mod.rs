//! Value Objects - Immutable, identity-less domain primitives

mod date_range;
mod pillar;
mod task_status;

pub use date_range::DateRange;
pub use pillar::Pillar;
pub use task_status::TaskStatus;
