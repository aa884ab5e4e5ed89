//! Integration tests for infrastructure crate
//!
//! Drive the application services through the CalDAV adapters against a
//! mocked server.

use std::sync::Arc;
use std::time::Duration;

use application::{
    ApplicationError, BriefingService, CalendarPort, TaskFilter, TaskService,
};
use chrono::NaiveDate;
use infrastructure::{CalDavAppConfig, CalDavCalendarAdapter, CalDavTaskAdapter};
use integration_caldav::CalDavSession;
use secrecy::SecretString;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn app_config(server: &MockServer) -> CalDavAppConfig {
    CalDavAppConfig {
        server_url: server.uri(),
        username: "darren".to_string(),
        password: SecretString::from("pw".to_string()),
        calendar: "personal".to_string(),
        tasks_calendar: "tasks".to_string(),
        calendar_home: Some("/cal".to_string()),
        verify_certs: true,
        timeout_secs: 5,
        revalidate_secs: 300,
    }
}

fn session(server: &MockServer) -> Arc<CalDavSession> {
    let config = app_config(server);
    Arc::new(CalDavSession::new(config.to_caldav_config(), config.revalidate_after()).unwrap())
}

fn multistatus(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(href, data)| {
            format!(
                "<d:response><d:href>{href}</d:href><d:propstat><d:prop>\
                 <d:getetag>\"1\"</d:getetag>\
                 <cal:calendar-data><![CDATA[{data}]]></cal:calendar-data>\
                 </d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>"
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\"?><d:multistatus xmlns:d=\"DAV:\" \
         xmlns:cal=\"urn:ietf:params:xml:ns:caldav\">{body}</d:multistatus>"
    )
}

async fn mount_healthy(server: &MockServer) {
    Mock::given(method("PROPFIND"))
        .and(path("/cal/"))
        .respond_with(ResponseTemplate::new(207).set_body_string(multistatus(&[])))
        .mount(server)
        .await;
}

const TODOS: &str = "BEGIN:VCALENDAR\r\nBEGIN:VTODO\r\nUID:t-low\r\nSUMMARY:Clean gutters\r\n\
PRIORITY:5\r\nSTATUS:NEEDS-ACTION\r\nCATEGORIES:home\r\nEND:VTODO\r\nEND:VCALENDAR\r\n";

const TODOS_MORE: &str = "BEGIN:VCALENDAR\r\nBEGIN:VTODO\r\nUID:t-high\r\nSUMMARY:Send invoice\r\n\
PRIORITY:1\r\nDUE;VALUE=DATE:20260210\r\nSTATUS:IN-PROCESS\r\nEND:VTODO\r\nEND:VCALENDAR\r\n";

const TODOS_DONE: &str = "BEGIN:VCALENDAR\r\nBEGIN:VTODO\r\nUID:t-done\r\nSUMMARY:Old chore\r\n\
STATUS:COMPLETED\r\nPERCENT-COMPLETE:100\r\nEND:VTODO\r\nEND:VCALENDAR\r\n";

const EVENT: &str = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:e-1\r\nSUMMARY:Sprint review\r\n\
DTSTART:20260216T140000Z\r\nDTEND:20260216T150000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

// ============================================================================
// Adapter Tests
// ============================================================================

mod adapter_tests {
    use super::*;

    #[tokio::test]
    async fn calendar_adapter_lists_events_after_health_check() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;
        Mock::given(method("REPORT"))
            .and(path("/cal/personal/"))
            .respond_with(
                ResponseTemplate::new(207)
                    .set_body_string(multistatus(&[("/cal/personal/e-1.ics", EVENT)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let adapter = CalDavCalendarAdapter::new(session(&server), "personal");
        let events = adapter.list_events(None).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Sprint review");
        assert_eq!(events[0].start_date.as_deref(), Some("2026-02-16T14:00:00"));
    }

    #[tokio::test]
    async fn bad_credentials_surface_as_configuration_error() {
        let server = MockServer::start().await;
        Mock::given(method("PROPFIND"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let adapter = CalDavCalendarAdapter::new(session(&server), "personal");
        let err = adapter.list_events(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[tokio::test]
    async fn deleting_unknown_task_is_not_found() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/cal/tasks/ghost.ics"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("REPORT"))
            .and(path("/cal/tasks/"))
            .respond_with(ResponseTemplate::new(207).set_body_string(multistatus(&[])))
            .mount(&server)
            .await;

        let service = TaskService::new(Arc::new(CalDavTaskAdapter::new(session(&server), "tasks")));
        let err = service.delete("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }
}

// ============================================================================
// Service Tests
// ============================================================================

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn task_service_sorts_open_tasks_from_server() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;
        Mock::given(method("REPORT"))
            .and(path("/cal/tasks/"))
            .respond_with(ResponseTemplate::new(207).set_body_string(multistatus(&[
                ("/cal/tasks/t-low.ics", TODOS),
                ("/cal/tasks/t-done.ics", TODOS_DONE),
                ("/cal/tasks/t-high.ics", TODOS_MORE),
            ])))
            .mount(&server)
            .await;

        let service = TaskService::new(Arc::new(CalDavTaskAdapter::new(session(&server), "tasks")));
        let tasks = service.list(TaskFilter::Incomplete).await.unwrap();
        let uids: Vec<_> = tasks.iter().map(|t| t.uid.as_str()).collect();
        assert_eq!(uids, vec!["t-high", "t-low"]);
    }

    #[tokio::test]
    async fn briefing_survives_failing_calendar() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;
        Mock::given(method("REPORT"))
            .and(path("/cal/personal/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("REPORT"))
            .and(path("/cal/tasks/"))
            .respond_with(ResponseTemplate::new(207).set_body_string(multistatus(&[
                ("/cal/tasks/t-low.ics", TODOS),
                ("/cal/tasks/t-high.ics", TODOS_MORE),
            ])))
            .mount(&server)
            .await;

        let shared = session(&server);
        let briefing = BriefingService::new(
            Arc::new(CalDavCalendarAdapter::new(Arc::clone(&shared), "personal")),
            Arc::new(CalDavTaskAdapter::new(shared, "tasks")),
        );
        let date = NaiveDate::from_ymd_opt(2026, 2, 16).unwrap();
        let today = tokio::time::timeout(Duration::from_secs(10), briefing.today(date))
            .await
            .unwrap();

        assert!(today.events.is_empty());
        let uids: Vec<_> = today.tasks.iter().map(|t| t.item.uid.as_str()).collect();
        assert_eq!(uids, vec!["t-high", "t-low"]);
        assert_eq!(today.tasks[0].pillar, domain::Pillar::Professional);
        assert_eq!(today.tasks[1].pillar, domain::Pillar::Domestic);
    }
}
