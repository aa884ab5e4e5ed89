//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod caldav_calendar_adapter;
mod task_adapter;

pub use caldav_calendar_adapter::CalDavCalendarAdapter;
pub use task_adapter::CalDavTaskAdapter;

use application::ApplicationError;
use domain::DomainError;
use integration_caldav::CalDavError;

/// Map a CalDAV error to an application error
///
/// `entity_type` names the missing item when the server has no such UID.
pub(crate) fn map_caldav_error(err: CalDavError, entity_type: &str) -> ApplicationError {
    match err {
        CalDavError::ObjectNotFound(uid) => DomainError::not_found(entity_type, uid).into(),
        CalDavError::AuthenticationFailed | CalDavError::CalendarNotFound(_) => {
            ApplicationError::Configuration(err.to_string())
        },
        CalDavError::MalformedResource(_) => ApplicationError::Internal(err.to_string()),
        CalDavError::ConnectionFailed(_)
        | CalDavError::PreconditionFailed(_)
        | CalDavError::RequestFailed(_)
        | CalDavError::Timeout => ApplicationError::ExternalService(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integration_caldav::MergeError;

    #[test]
    fn missing_uid_becomes_not_found() {
        let err = map_caldav_error(CalDavError::ObjectNotFound("abc".to_string()), "Task");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), DomainError::not_found("Task", "abc").to_string());
    }

    #[test]
    fn credential_problems_are_configuration_errors() {
        assert!(matches!(
            map_caldav_error(CalDavError::AuthenticationFailed, "Event"),
            ApplicationError::Configuration(_)
        ));
        assert!(matches!(
            map_caldav_error(CalDavError::CalendarNotFound("x".to_string()), "Event"),
            ApplicationError::Configuration(_)
        ));
    }

    #[test]
    fn transport_problems_are_retryable() {
        assert!(map_caldav_error(CalDavError::Timeout, "Event").is_retryable());
        assert!(
            map_caldav_error(CalDavError::PreconditionFailed("/a.ics".to_string()), "Event")
                .is_retryable()
        );
        assert!(
            !map_caldav_error(
                CalDavError::MalformedResource(MergeError::MissingEnd("VTODO")),
                "Task"
            )
            .is_retryable()
        );
    }
}
