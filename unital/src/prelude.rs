//! Common imports for applications embedding the dashboard client.

pub use crate::{
    ApiGateway, Author, ChatPolicy, ChatSessionDriver, ChatViewPort, ClientConfig, ClientRuntime,
    ConfigError, DriverState, FailureNotice, FailureSink, GatewayError, GatewayErrorKind,
    HeadlessViewPort, InputEvent, ListView, MeetingRow, NotificationLine, ReentryPolicy,
    RequestDescriptor, RequestGateway, ResponseOutcome, SessionContext, SubmitOutcome, TableRow,
    TaskRow, TeamRow, TranscriptEntry,
};
