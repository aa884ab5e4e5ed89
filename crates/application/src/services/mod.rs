//! Application services - use-case orchestration over the ports

mod almanac_service;
mod briefing_service;
mod calendar_service;
mod task_service;

pub use almanac_service::{ALMANAC_CATEGORY, AlmanacEntry, AlmanacService};
pub use briefing_service::{BriefingService, DailyBriefing, Tagged};
pub use calendar_service::{
    CalendarService, DEFAULT_CATEGORY, DEFAULT_LOOKAHEAD_DAYS, LOOKBACK_DAYS,
};
pub use task_service::{TaskFilter, TaskService};
