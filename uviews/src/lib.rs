//! Dashboard list views: meetings, tasks, teams, and notifications.
//!
//! Each view is a `GET` of a JSON array projected into display rows.
//!
//! ```rust
//! use uviews::{Meeting, MeetingRow, RecordId, TableRow};
//!
//! let meeting = Meeting {
//!     id: RecordId::from(1),
//!     title: "Residents' council".to_string(),
//!     scheduled_date: Some("2024-06-02T18:00:00Z".to_string()),
//!     status: "scheduled".to_string(),
//! };
//!
//! let row = MeetingRow::from(&meeting);
//! assert_eq!(row.cells()[2], "2024-06-02");
//! assert_eq!(MeetingRow::COLUMNS.len(), 5);
//! ```

mod loaders;
mod records;
mod rows;

pub mod prelude {
    pub use crate::{
        ListView, MeetingRow, NotificationLine, TableRow, TaskRow, TeamRow, load_meetings,
        load_notifications, load_tasks, load_teams,
    };
}

pub use loaders::{
    ListView, decode_records, load_meetings, load_notifications, load_records, load_tasks,
    load_teams,
};
pub use records::{Meeting, Notification, RecordId, Task, Team};
pub use rows::{MeetingRow, NotificationLine, PLACEHOLDER, TableRow, TaskRow, TeamRow};
