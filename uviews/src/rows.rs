//! Row projections rendered by the dashboard tables.

use serde_json::Value;

use crate::{Meeting, Notification, Task, Team};

pub const PLACEHOLDER: &str = "-";

/// A record flattened into display cells.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRow {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

impl From<&Meeting> for MeetingRow {
    fn from(meeting: &Meeting) -> Self {
        let (date, time) = split_timestamp(meeting.scheduled_date.as_deref());
        Self {
            id: meeting.id.to_string(),
            title: meeting.title.clone(),
            date,
            time,
            status: meeting.status.clone(),
        }
    }
}

impl TableRow for MeetingRow {
    const COLUMNS: &'static [&'static str] = &["id", "title", "date", "time", "status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.date.clone(),
            self.time.clone(),
            self.status.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub team: String,
    pub status: String,
    pub due_date: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            team: or_placeholder(task.team_name.as_deref()),
            status: task.status.clone(),
            due_date: or_placeholder(task.due_date.as_deref()),
        }
    }
}

impl TableRow for TaskRow {
    const COLUMNS: &'static [&'static str] = &["id", "title", "team", "status", "due_date"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.team.clone(),
            self.status.clone(),
            self.due_date.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRow {
    pub id: String,
    pub name: String,
    pub members: String,
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        let members = match &team.members {
            Some(members) => members
                .iter()
                .map(member_label)
                .collect::<Vec<_>>()
                .join(", "),
            None => PLACEHOLDER.to_string(),
        };

        Self {
            id: team.id.to_string(),
            name: team.name.clone(),
            members,
        }
    }
}

impl TableRow for TeamRow {
    const COLUMNS: &'static [&'static str] = &["id", "name", "members"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.members.clone()]
    }
}

/// Single-line notification entry: `[type] title - message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationLine(pub String);

impl NotificationLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Notification> for NotificationLine {
    fn from(note: &Notification) -> Self {
        Self(format!(
            "[{}] {} - {}",
            note.notification_type, note.title, note.message
        ))
    }
}

/// Splits an ISO timestamp into date and time-of-day, dropping fractional seconds.
fn split_timestamp(value: Option<&str>) -> (String, String) {
    let Some(value) = value else {
        return (PLACEHOLDER.to_string(), PLACEHOLDER.to_string());
    };

    let mut parts = value.split('T');
    let date = parts.next();
    let time = parts
        .next()
        .and_then(|rest| rest.split('.').next());

    (or_placeholder(date), or_placeholder(time))
}

fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn member_label(member: &Value) -> String {
    match member {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}
