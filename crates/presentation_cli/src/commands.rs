//! Command execution
//!
//! Wires configuration to a CalDAV session, the adapters and the services,
//! then runs one command and returns its JSON result.

use std::sync::Arc;

use anyhow::Context;
use application::{
    AlmanacService, BriefingService, CalendarPort, CalendarService, TaskPort, TaskService,
};
use chrono::{Local, NaiveDate};
use infrastructure::{CalDavAppConfig, CalDavCalendarAdapter, CalDavTaskAdapter};
use integration_caldav::CalDavSession;
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{AlmanacCommand, Command, EventsCommand, TasksCommand};

/// Services sharing one CalDAV session
pub struct App {
    session: Arc<CalDavSession>,
    calendar: CalendarService,
    tasks: TaskService,
    briefing: BriefingService,
    almanac: AlmanacService,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").finish_non_exhaustive()
    }
}

impl App {
    /// Build the service graph; no request is sent yet
    pub fn connect(config: &CalDavAppConfig) -> anyhow::Result<Self> {
        let session = Arc::new(
            CalDavSession::new(config.to_caldav_config(), config.revalidate_after())
                .context("failed to build CalDAV client")?,
        );
        let events: Arc<dyn CalendarPort> = Arc::new(CalDavCalendarAdapter::new(
            Arc::clone(&session),
            config.calendar.clone(),
        ));
        let tasks: Arc<dyn TaskPort> = Arc::new(CalDavTaskAdapter::new(
            Arc::clone(&session),
            config.tasks_calendar.clone(),
        ));
        debug!(calendar = %config.calendar, tasks = %config.tasks_calendar, "Services wired");

        Ok(Self {
            session,
            calendar: CalendarService::new(Arc::clone(&events)),
            tasks: TaskService::new(Arc::clone(&tasks)),
            briefing: BriefingService::new(Arc::clone(&events), tasks),
            almanac: AlmanacService::new(events),
        })
    }

    /// Run `command` and return the value to print
    pub async fn run(&self, command: Command) -> anyhow::Result<Value> {
        match command {
            Command::Events(command) => self.run_events(command).await,
            Command::Tasks(command) => self.run_tasks(command).await,
            Command::Today { date } => {
                let briefing = self.briefing.today(date.unwrap_or_else(today)).await;
                Ok(serde_json::to_value(briefing)?)
            },
            Command::Almanac(command) => self.run_almanac(command).await,
            Command::Health => {
                self.session
                    .health_check()
                    .await
                    .context("CalDAV server is not healthy")?;
                Ok(json!({ "status": "ok" }))
            },
        }
    }

    async fn run_events(&self, command: EventsCommand) -> anyhow::Result<Value> {
        match command {
            EventsCommand::List { days } => {
                let events = self.calendar.upcoming(days).await?;
                Ok(serde_json::to_value(events)?)
            },
            EventsCommand::Create(args) => {
                let uid = self.calendar.create(args.into()).await?;
                Ok(json!({ "status": "created", "uid": uid }))
            },
            EventsCommand::Update(args) => {
                let (uid, update) = args.into_parts();
                self.calendar.update(&uid, &update).await?;
                Ok(json!({ "status": "updated", "uid": uid }))
            },
            EventsCommand::Delete { uid } => {
                self.calendar.delete(&uid).await?;
                Ok(json!({ "status": "deleted", "uid": uid }))
            },
        }
    }

    async fn run_almanac(&self, command: AlmanacCommand) -> anyhow::Result<Value> {
        match command {
            AlmanacCommand::Add { quote, date } => {
                let uid = self
                    .almanac
                    .record_quote(date.unwrap_or_else(today), &quote)
                    .await?;
                Ok(json!({ "status": "created", "uid": uid }))
            },
            AlmanacCommand::List { days } => {
                let entries = self.almanac.recent(today(), days).await?;
                Ok(serde_json::to_value(entries)?)
            },
        }
    }

    async fn run_tasks(&self, command: TasksCommand) -> anyhow::Result<Value> {
        match command {
            TasksCommand::List { filter } => {
                let tasks = self.tasks.list(filter).await?;
                Ok(serde_json::to_value(tasks)?)
            },
            TasksCommand::Create(args) => {
                let uid = self.tasks.create(args.into()).await?;
                Ok(json!({ "status": "created", "uid": uid }))
            },
            TasksCommand::Update(args) => {
                let (uid, update) = args.into_parts();
                self.tasks.update(&uid, &update).await?;
                Ok(json!({ "status": "updated", "uid": uid }))
            },
            TasksCommand::Complete { uid } => {
                self.tasks.complete(&uid).await?;
                Ok(json!({ "status": "completed", "uid": uid }))
            },
            TasksCommand::Delete { uid } => {
                self.tasks.delete(&uid).await?;
                Ok(json!({ "status": "deleted", "uid": uid }))
            },
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
