//! CalDAV integration
//!
//! Reads and writes calendar events and tasks on a CalDAV server
//! (Nextcloud, Baïkal, Radicale). The [`ical`] module holds the text-level
//! VEVENT/VTODO handling; the client, session and trait modules move that
//! text over HTTP.

pub mod client;
pub mod event;
pub mod ical;
pub mod session;
pub mod task;

pub use client::{CalDavConfig, CalDavError, ComponentKind, DavResource, HttpCalDavClient};
pub use event::CalDavClient;
pub use ical::MergeError;
pub use session::CalDavSession;
pub use task::CalDavTaskClient;
