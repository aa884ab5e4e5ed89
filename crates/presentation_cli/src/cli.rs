//! Command-line arguments

use std::path::PathBuf;

use application::TaskFilter;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use domain::{EventUpdate, NewEvent, NewTask, TaskUpdate};

/// Homelab calendar control plane
#[derive(Debug, Parser)]
#[command(name = "homelab-cli")]
#[command(author, version, about = "Homelab calendar and task control plane", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "HOMELAB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calendar events
    #[command(subcommand)]
    Events(EventsCommand),

    /// VTODO tasks
    #[command(subcommand)]
    Tasks(TasksCommand),

    /// Agenda for one day: events plus open tasks due by then
    Today {
        /// Day to brief (default: today, local time)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Daily quote journal
    #[command(subcommand)]
    Almanac(AlmanacCommand),

    /// Check that the CalDAV server is reachable
    Health,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Events from a week ago to `days` ahead
    List {
        #[arg(short, long, default_value_t = application::DEFAULT_LOOKAHEAD_DAYS)]
        days: u32,
    },

    /// Create an event
    Create(CreateEventArgs),

    /// Change fields of an event
    Update(UpdateEventArgs),

    /// Delete an event
    Delete { uid: String },
}

#[derive(Debug, Args)]
pub struct CreateEventArgs {
    #[arg(short, long)]
    pub summary: String,

    /// ISO date or date-time
    #[arg(long)]
    pub start: String,

    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub all_day: bool,

    /// Repeatable
    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<CreateEventArgs> for NewEvent {
    fn from(args: CreateEventArgs) -> Self {
        Self {
            summary: args.summary,
            start_date: args.start,
            end_date: args.end,
            all_day: args.all_day,
            categories: args.categories,
            description: args.description,
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateEventArgs {
    pub uid: String,

    #[arg(short, long)]
    pub summary: Option<String>,

    /// Empty string removes the description
    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(long)]
    pub start: Option<String>,

    /// Empty string removes the end
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub all_day: Option<bool>,

    /// Replaces all categories; repeatable
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Remove every category
    #[arg(long, conflicts_with = "categories")]
    pub clear_categories: bool,
}

impl UpdateEventArgs {
    /// Split into the UID and the patch
    pub fn into_parts(self) -> (String, EventUpdate) {
        let categories = replacement_categories(self.categories, self.clear_categories);
        let update = EventUpdate {
            summary: self.summary,
            description: self.description,
            start_date: self.start,
            end_date: self.end,
            all_day: self.all_day,
            categories,
        };
        (self.uid, update)
    }
}

#[derive(Debug, Subcommand)]
pub enum AlmanacCommand {
    /// Record the quote for a day (one per day)
    Add {
        quote: String,

        /// Day of the entry (default: today, local time)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Entries of the last `days` days
    List {
        #[arg(short, long, default_value_t = 30)]
        days: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List tasks, most urgent first
    List {
        /// incomplete, completed or all
        #[arg(short, long, default_value = "incomplete")]
        filter: TaskFilter,
    },

    /// Create a task
    Create(CreateTaskArgs),

    /// Change fields of a task
    Update(UpdateTaskArgs),

    /// Mark a task as completed
    Complete { uid: String },

    /// Delete a task
    Delete { uid: String },
}

#[derive(Debug, Args)]
pub struct CreateTaskArgs {
    #[arg(short, long)]
    pub summary: String,

    /// ISO date (all-day) or date-time
    #[arg(long)]
    pub due: Option<String>,

    /// 1 (highest) to 9, 0 for none
    #[arg(short, long, default_value_t = 0)]
    pub priority: u8,

    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<CreateTaskArgs> for NewTask {
    fn from(args: CreateTaskArgs) -> Self {
        Self {
            summary: args.summary,
            description: args.description,
            priority: args.priority,
            due: args.due,
            categories: args.categories,
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateTaskArgs {
    pub uid: String,

    #[arg(short, long)]
    pub summary: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// NEEDS-ACTION, IN-PROCESS, COMPLETED or CANCELLED
    #[arg(long)]
    pub status: Option<String>,

    /// 0 to 100; decides the status when given
    #[arg(long, allow_negative_numbers = true)]
    pub percent: Option<i64>,

    #[arg(short, long)]
    pub priority: Option<u8>,

    /// Empty string removes the due date
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long, conflicts_with = "categories")]
    pub clear_categories: bool,
}

impl UpdateTaskArgs {
    /// Split into the UID and the patch
    pub fn into_parts(self) -> (String, TaskUpdate) {
        let categories = replacement_categories(self.categories, self.clear_categories);
        let update = TaskUpdate {
            summary: self.summary,
            description: self.description,
            status: self.status,
            percent_complete: self.percent,
            priority: self.priority,
            due: self.due,
            categories,
        };
        (self.uid, update)
    }
}

fn replacement_categories(categories: Vec<String>, clear: bool) -> Option<Vec<String>> {
    if clear {
        Some(Vec::new())
    } else if categories.is_empty() {
        None
    } else {
        Some(categories)
    }
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("homelab-cli").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_follows_verbosity() {
        assert_eq!(log_filter_from_verbosity(0), None);
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(7), Some("trace"));
    }

    #[test]
    fn events_list_defaults_to_thirty_days() {
        let cli = parse(&["events", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Events(EventsCommand::List { days: 30 })
        ));
    }

    #[test]
    fn events_create_collects_categories() {
        let cli = parse(&[
            "events",
            "create",
            "--summary",
            "Dentist",
            "--start",
            "2026-04-01T09:00:00",
            "--category",
            "health",
            "--category",
            "family",
        ])
        .unwrap();
        let Command::Events(EventsCommand::Create(args)) = cli.command else {
            panic!("expected events create");
        };
        let event = NewEvent::from(args);
        assert_eq!(event.summary, "Dentist");
        assert!(!event.all_day);
        assert_eq!(event.categories, vec!["health", "family"]);
    }

    #[test]
    fn events_create_requires_start() {
        assert!(parse(&["events", "create", "--summary", "Dentist"]).is_err());
    }

    #[test]
    fn events_update_builds_patch() {
        let cli = parse(&[
            "events", "update", "evt-1", "--end", "", "--all-day", "true",
        ])
        .unwrap();
        let Command::Events(EventsCommand::Update(args)) = cli.command else {
            panic!("expected events update");
        };
        let (uid, update) = args.into_parts();
        assert_eq!(uid, "evt-1");
        assert_eq!(update.end_date.as_deref(), Some(""));
        assert_eq!(update.all_day, Some(true));
        assert!(update.summary.is_none());
        assert!(update.categories.is_none());
    }

    #[test]
    fn clear_categories_conflicts_with_category() {
        assert!(
            parse(&[
                "events",
                "update",
                "evt-1",
                "--category",
                "work",
                "--clear-categories"
            ])
            .is_err()
        );
        let cli = parse(&["tasks", "update", "t-1", "--clear-categories"]).unwrap();
        let Command::Tasks(TasksCommand::Update(args)) = cli.command else {
            panic!("expected tasks update");
        };
        assert_eq!(args.into_parts().1.categories, Some(Vec::new()));
    }

    #[test]
    fn tasks_list_parses_filter() {
        let cli = parse(&["tasks", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Tasks(TasksCommand::List {
                filter: TaskFilter::Incomplete
            })
        ));

        let cli = parse(&["tasks", "list", "--filter", "all"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Tasks(TasksCommand::List {
                filter: TaskFilter::All
            })
        ));

        assert!(parse(&["tasks", "list", "--filter", "someday"]).is_err());
    }

    #[test]
    fn tasks_update_accepts_percent() {
        let cli = parse(&["tasks", "update", "t-1", "--percent", "-5"]).unwrap();
        let Command::Tasks(TasksCommand::Update(args)) = cli.command else {
            panic!("expected tasks update");
        };
        let (_, update) = args.into_parts();
        assert_eq!(update.percent_complete, Some(-5));
    }

    #[test]
    fn today_and_almanac_take_dates() {
        let cli = parse(&["today", "--date", "2026-02-16"]).unwrap();
        let Command::Today { date } = cli.command else {
            panic!("expected today");
        };
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 2, 16));

        let cli = parse(&["-vv", "almanac", "add", "First word"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Almanac(AlmanacCommand::Add { ref quote, date: None }) if quote == "First word"
        ));

        let cli = parse(&["almanac", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Almanac(AlmanacCommand::List { days: 30 })
        ));

        assert!(parse(&["today", "--date", "16/02/2026"]).is_err());
    }

    #[test]
    fn config_path_option() {
        let cli = parse(&["--config", "/etc/homelab.toml", "health"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/homelab.toml")));
        assert!(matches!(cli.command, Command::Health));
    }
}
