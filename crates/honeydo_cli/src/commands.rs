//! Subcommand definitions and their dispatch onto the core services.

use honeydo_core::{
    category_label, AuthUser, CreateTaskRequest, NoteDeleteOutcome, NoteService, ServiceError,
    SqliteNoteRepository, SqliteTaskRepository, Task, TaskService, TaskStatus,
};
use log::debug;
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::io::Write;
use uuid::Uuid;

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print core health and version.
    Ping,
    /// Manage the shared task list.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage your personal notes.
    #[command(subcommand)]
    Note(NoteCommand),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Task(TaskCommand::Add { .. }) => "task_add",
            Self::Task(TaskCommand::List { .. }) => "task_list",
            Self::Task(TaskCommand::Toggle { .. }) => "task_toggle",
            Self::Task(TaskCommand::Edit { .. }) => "task_edit",
            Self::Task(TaskCommand::Rm { .. }) => "task_rm",
            Self::Note(NoteCommand::Add { .. }) => "note_add",
            Self::Note(NoteCommand::List) => "note_list",
            Self::Note(NoteCommand::Rm { .. }) => "note_rm",
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task at the end of a category.
    Add {
        title: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List one category in display order.
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Advance a task's status from the status you last saw.
    Toggle { id: Uuid, current: TaskStatus },
    /// Replace a task's title and notes.
    Edit {
        id: Uuid,
        title: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a task.
    Rm { id: Uuid },
}

#[derive(clap::Subcommand, Debug)]
pub enum NoteCommand {
    Add { content: String },
    List,
    Rm { id: Uuid },
}

#[derive(Debug)]
pub enum CommandError {
    Service(ServiceError),
    Output(std::io::Error),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ServiceError> for CommandError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<std::io::Error> for CommandError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

/// Runs one command as `session` and writes human-readable output.
pub fn run(
    conn: &Connection,
    session: &Option<AuthUser>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    debug!(
        "event=cli_dispatch module=cli command={} has_session={}",
        command.name(),
        session.is_some()
    );
    match command {
        Command::Ping => {
            writeln!(out, "honeydo_core ping={}", honeydo_core::ping())?;
            writeln!(out, "honeydo_core version={}", honeydo_core::core_version())?;
        }
        Command::Task(command) => run_task(conn, session, command, out)?,
        Command::Note(command) => run_note(conn, session, command, out)?,
    }
    Ok(())
}

fn run_task(
    conn: &Connection,
    session: &Option<AuthUser>,
    command: TaskCommand,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let service = TaskService::new(SqliteTaskRepository::new(conn));
    match command {
        TaskCommand::Add {
            title,
            notes,
            category,
        } => {
            let task = service.create_task(
                session,
                &CreateTaskRequest {
                    title,
                    notes,
                    category,
                },
            )?;
            writeln!(out, "added {} to {} at {}", task.id, task.category, task.position)?;
        }
        TaskCommand::List { category } => {
            let view = service.list_tasks(session, category.as_deref())?;
            writeln!(out, "{}", category_label(view.category.as_str()))?;
            if view.tasks.is_empty() {
                writeln!(out, "  (empty)")?;
            }
            for task in &view.tasks {
                writeln!(out, "  {}", format_task(task))?;
            }
        }
        TaskCommand::Toggle { id, current } => {
            let change = service.update_task_status(session, id, current)?;
            writeln!(out, "{id}: {current} -> {}", change.status)?;
        }
        TaskCommand::Edit { id, title, notes } => {
            service.update_task(session, id, title.as_str(), notes.as_deref())?;
            writeln!(out, "updated {id}")?;
        }
        TaskCommand::Rm { id } => {
            service.delete_task(session, id)?;
            writeln!(out, "deleted {id}")?;
        }
    }
    Ok(())
}

fn run_note(
    conn: &Connection,
    session: &Option<AuthUser>,
    command: NoteCommand,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let service = NoteService::new(SqliteNoteRepository::new(conn));
    match command {
        NoteCommand::Add { content } => {
            let note = service.create_note(session, content.as_str())?;
            writeln!(out, "added {}", note.id)?;
        }
        NoteCommand::List => {
            let notes = service.list_notes(session)?;
            if notes.is_empty() {
                writeln!(out, "no notes yet")?;
            }
            for note in &notes {
                writeln!(out, "{} {}", note.id, note.content)?;
            }
        }
        NoteCommand::Rm { id } => match service.delete_note(session, id)? {
            NoteDeleteOutcome::Deleted => writeln!(out, "deleted {id}")?,
            NoteDeleteOutcome::Missing | NoteDeleteOutcome::NotOwner => {
                writeln!(out, "nothing deleted")?
            }
        },
    }
    Ok(())
}

fn format_task(task: &Task) -> String {
    let marker = match task.status {
        TaskStatus::Open => "[ ]",
        TaskStatus::InProgress => "[~]",
        TaskStatus::Done => "[x]",
    };
    let mut line = format!("{marker} {} {} ({})", task.position, task.title, task.id);
    if let Some(email) = task.completed_by_email.as_deref() {
        line.push_str(&format!(" done by {email}"));
    }
    if let Some(notes) = task.notes.as_deref() {
        line.push_str(&format!("\n      {notes}"));
    }
    line
}
