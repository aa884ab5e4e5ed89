//! Property-based tests for the iCalendar layer

use chrono::{TimeZone, Utc};
use domain::{NewTask, TaskStatus, TaskUpdate};
use integration_caldav::ical::{
    Stamp, ical_to_iso, iso_to_ical_date, iso_to_ical_datetime, merge_task_update, parse_events,
    parse_tasks, todo_ics,
};
use proptest::prelude::*;

fn stamp() -> Stamp {
    Stamp::fixed(
        "prop-uid",
        Utc.with_ymd_and_hms(2026, 2, 15, 8, 0, 0).unwrap(),
    )
}

// ============================================================================
// Date Normalizer
// ============================================================================

mod date_tests {
    use super::*;

    proptest! {
        #[test]
        fn date_token_roundtrip(y in 1900u32..2100, m in 1u32..=12, d in 1u32..=28) {
            let token = format!("{y:04}{m:02}{d:02}");
            prop_assert_eq!(iso_to_ical_date(&ical_to_iso(&token)), Some(token));
        }

        #[test]
        fn datetime_token_roundtrip(
            y in 1900u32..2100, m in 1u32..=12, d in 1u32..=28,
            hh in 0u32..24, mm in 0u32..60, ss in 0u32..60,
        ) {
            let token = format!("{y:04}{m:02}{d:02}T{hh:02}{mm:02}{ss:02}Z");
            prop_assert_eq!(iso_to_ical_datetime(&ical_to_iso(&token)), Some(token));
        }

        #[test]
        fn encoded_datetime_has_fixed_shape(s in "\\PC*") {
            if let Some(token) = iso_to_ical_datetime(&s) {
                prop_assert_eq!(token.chars().count(), 16);
                prop_assert!(token.ends_with('Z'));
            }
        }
    }
}

// ============================================================================
// Parser / Serializer
// ============================================================================

mod roundtrip_tests {
    use super::*;

    proptest! {
        #[test]
        fn parser_never_panics(s in "\\PC*") {
            let _ = parse_events(&s);
            let _ = parse_tasks(&s);
        }

        #[test]
        fn created_task_parses_back(
            summary in "[A-Za-z][A-Za-z0-9 ,;:]{0,40}",
            priority in 0u8..=9,
            d in 1u32..=28,
        ) {
            let due = format!("2026-03-{d:02}");
            let draft = NewTask::new(summary.clone())
                .with_priority(priority)
                .with_due(due.clone());
            let tasks = parse_tasks(&todo_ics(&draft, &stamp()));

            prop_assert_eq!(tasks.len(), 1);
            prop_assert_eq!(&tasks[0].summary, summary.trim());
            prop_assert_eq!(tasks[0].priority, priority);
            prop_assert_eq!(tasks[0].status, TaskStatus::NeedsAction);
            prop_assert_eq!(tasks[0].due.as_deref(), Some(due.as_str()));
            prop_assert!(tasks[0].due_all_day);
        }

        #[test]
        fn percent_update_keeps_status_invariant(percent in -50i64..=150) {
            let raw = todo_ics(&NewTask::new("Chore"), &stamp());
            let update = TaskUpdate {
                percent_complete: Some(percent),
                ..TaskUpdate::default()
            };
            let merged = merge_task_update(&raw, &update, Utc::now()).unwrap();
            let task = &parse_tasks(&merged)[0];
            let has_completed_line = merged.contains("\r\nCOMPLETED:");

            prop_assert_eq!(i64::from(task.percent_complete), percent.clamp(0, 100));
            match task.percent_complete {
                100 => {
                    prop_assert_eq!(task.status, TaskStatus::Completed);
                    prop_assert!(has_completed_line);
                },
                0 => {
                    prop_assert_eq!(task.status, TaskStatus::NeedsAction);
                    prop_assert!(!has_completed_line);
                },
                _ => {
                    prop_assert_eq!(task.status, TaskStatus::InProgress);
                    prop_assert!(!has_completed_line);
                },
            }
        }

        #[test]
        fn merge_preserves_unknown_properties(value in "[a-z0-9]{1,20}") {
            let raw = todo_ics(&NewTask::new("Chore"), &stamp())
                .replace("END:VTODO", &format!("X-CUSTOM:{value}\r\nEND:VTODO"));
            let merged = merge_task_update(&raw, &TaskUpdate::complete(), Utc::now()).unwrap();
            let expected = format!("\r\nX-CUSTOM:{value}\r\n");
            prop_assert!(merged.contains(&expected));
        }
    }
}
