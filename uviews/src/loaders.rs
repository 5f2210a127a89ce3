//! Fetch-and-project helpers for each list view.
//!
//! A failed fetch or a non-array payload yields no rows; the gateway has
//! already reported the failure. Items that do not match the record shape are
//! skipped.

use serde::de::DeserializeOwned;
use serde_json::Value;
use ugateway::ApiGateway;

use crate::{
    Meeting, MeetingRow, Notification, NotificationLine, Task, TaskRow, Team, TeamRow,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Meetings,
    Tasks,
    Teams,
    Notifications,
}

impl ListView {
    pub const ALL: [ListView; 4] = [
        ListView::Meetings,
        ListView::Tasks,
        ListView::Teams,
        ListView::Notifications,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Meetings => "/meetings",
            Self::Tasks => "/tasks",
            Self::Teams => "/teams",
            Self::Notifications => "/notifications",
        }
    }
}

/// Decodes each item independently, dropping the ones that do not fit `T`.
pub fn decode_records<T>(items: Vec<Value>) -> Vec<T>
where
    T: DeserializeOwned,
{
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

pub async fn load_records<T>(gateway: &dyn ApiGateway, view: ListView) -> Vec<T>
where
    T: DeserializeOwned,
{
    decode_records(gateway.fetch_collection(view.path()).await)
}

pub async fn load_meetings(gateway: &dyn ApiGateway) -> Vec<MeetingRow> {
    load_records::<Meeting>(gateway, ListView::Meetings)
        .await
        .iter()
        .map(MeetingRow::from)
        .collect()
}

pub async fn load_tasks(gateway: &dyn ApiGateway) -> Vec<TaskRow> {
    load_records::<Task>(gateway, ListView::Tasks)
        .await
        .iter()
        .map(TaskRow::from)
        .collect()
}

pub async fn load_teams(gateway: &dyn ApiGateway) -> Vec<TeamRow> {
    load_records::<Team>(gateway, ListView::Teams)
        .await
        .iter()
        .map(TeamRow::from)
        .collect()
}

pub async fn load_notifications(gateway: &dyn ApiGateway) -> Vec<NotificationLine> {
    load_records::<Notification>(gateway, ListView::Notifications)
        .await
        .iter()
        .map(NotificationLine::from)
        .collect()
}
