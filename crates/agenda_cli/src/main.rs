//! `agenda` command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto `agenda_core` use cases.
//! - Render results as plain text or JSON.
//!
//! # Invariants
//! - Exactly one store is opened per invocation and closed before exit.
//! - Failures print `error: ...` to stderr and exit with status 1.

use agenda_core::{
    format_due_date, init_logging, parse_due_date, render_reminder, AgendaConfig, AgendaService,
    ReportPeriod, Task, TaskStore,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use serde_json::json;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Personal academic task tracker.
#[derive(Debug, Parser)]
#[command(name = "agenda", version, about)]
struct Cli {
    /// SQLite database file (overrides AGENDA_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error (overrides AGENDA_LOG_LEVEL)
    #[arg(short = 'l', long = "log-level", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides AGENDA_LOG_DIR)
    #[arg(long = "log-dir", global = true)]
    log_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage subjects
    Subject {
        #[command(subcommand)]
        command: SubjectCommand,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Find tasks whose name or subject contains KEYWORD (case-insensitive)
    Search { keyword: String },

    /// Show tasks due from today through the next N days
    Remind {
        /// Lookahead in days (overrides AGENDA_REMINDER_DAYS)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Show tasks due this week or this month
    Report {
        #[arg(value_enum)]
        period: PeriodArg,

        /// Reference day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum SubjectCommand {
    /// Register a new subject
    Add { name: String },
    /// List subjects by name
    List,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Add a task under an existing subject
    Add {
        name: String,

        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: String,

        /// Name of an existing subject
        #[arg(short, long)]
        subject: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List all tasks by due date
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PeriodArg {
    Week,
    Month,
}

impl From<PeriodArg> for ReportPeriod {
    fn from(value: PeriodArg) -> Self {
        match value {
            PeriodArg::Week => Self::Week,
            PeriodArg::Month => Self::Month,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = run(cli, &mut io::stdout().lock());
    ExitCode::from(finish(result, &mut io::stderr().lock()))
}

/// Reports a failed run on `err_out` and returns the process status.
fn finish(result: Result<(), Box<dyn Error>>, err_out: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(err_out, "error: {err}");
            1
        }
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, log_dir)?;
    }
    debug!("event=cli_start module=cli status=ok command={:?}", cli.command);

    let service = AgendaService::new(TaskStore::open(&config.db_path)?);
    let result = execute(&service, &config, cli.command, cli.json, out);
    service.into_repo().close()?;
    result
}

fn resolve_config(cli: &Cli) -> Result<AgendaConfig, Box<dyn Error>> {
    let mut config = AgendaConfig::from_env()?;
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    if let Some(dir) = cli.log_dir.clone() {
        config.log_dir = Some(dir);
    }
    Ok(config)
}

fn execute(
    service: &AgendaService<TaskStore>,
    config: &AgendaConfig,
    command: Command,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Subject {
            command: SubjectCommand::Add { name },
        } => {
            let subject = service.add_subject(name)?;
            if as_json {
                writeln!(out, "{}", serde_json::to_string_pretty(&subject)?)?;
            } else {
                writeln!(
                    out,
                    "Subject saved: {} (id {})",
                    subject.name,
                    subject.id.unwrap_or_default()
                )?;
            }
        }
        Command::Subject {
            command: SubjectCommand::List,
        } => {
            let subjects = service.subjects()?;
            if as_json {
                writeln!(out, "{}", serde_json::to_string_pretty(&subjects)?)?;
            } else {
                for subject in subjects {
                    writeln!(out, "{}", subject.name)?;
                }
            }
        }
        Command::Task {
            command:
                TaskCommand::Add {
                    name,
                    due,
                    subject,
                    description,
                },
        } => {
            let task = service.add_task(name, &due, &subject, description)?;
            if as_json {
                writeln!(out, "{}", serde_json::to_string_pretty(&task)?)?;
            } else {
                writeln!(out, "Task saved: {task}")?;
            }
        }
        Command::Task {
            command: TaskCommand::List,
        } => print_tasks(out, &service.all_tasks()?, as_json)?,
        Command::Search { keyword } => print_tasks(out, &service.search(&keyword)?, as_json)?,
        Command::Remind { days } => {
            let days = days.unwrap_or(config.reminder_days);
            let tasks = service.upcoming(today(), days)?;
            if as_json {
                let payload = json!({ "days": days, "tasks": tasks });
                writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
            } else if let Some(text) = render_reminder(&tasks, days) {
                writeln!(out, "{text}")?;
            } else {
                writeln!(out, "Nothing due in the next {days} days.")?;
            }
        }
        Command::Report { period, date } => {
            let reference = match date {
                Some(text) => parse_due_date(&text)?,
                None => today(),
            };
            let report = service.report(period.into(), reference)?;
            if as_json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "{}", report.render())?;
            }
        }
    }
    Ok(())
}

fn print_tasks(out: &mut impl Write, tasks: &[Task], as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(tasks)?)?;
        return Ok(());
    }

    for task in tasks {
        writeln!(
            out,
            "{}  {:<15}  {}  {}",
            format_due_date(task.due_date),
            task.subject.name,
            task.name,
            task.description
        )?;
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
