//! Shared primitives and strongly-typed identifiers for the workspace crates.
//!
//! ```rust
//! use ucommon::{CallIdSource, SessionId, non_empty_trimmed};
//!
//! let session = SessionId::from("dashboard-1");
//! let calls = CallIdSource::new();
//!
//! assert_eq!(session.as_str(), "dashboard-1");
//! assert_eq!(calls.next_id().get(), 1);
//! assert_eq!(non_empty_trimmed("  hi  "), Some("hi"));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use ucommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Identifier newtypes shared across crates.
    //!
    //! ```rust
    //! use ucommon::{CallId, SessionId};
    //!
    //! let session = SessionId::new("chat-42");
    //! let call = CallId::new(7);
    //!
    //! assert_eq!(session.to_string(), "chat-42");
    //! assert_eq!(call.to_string(), "call-7");
    //! ```

    use std::fmt::{Display, Formatter};
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    /// Correlates the hook callbacks emitted for one outbound call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct CallId(u64);

    impl CallId {
        pub fn new(value: u64) -> Self {
            Self(value)
        }

        pub fn get(self) -> u64 {
            self.0
        }
    }

    impl Display for CallId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "call-{}", self.0)
        }
    }

    /// Hands out increasing call ids, starting at 1.
    #[derive(Debug, Default)]
    pub struct CallIdSource {
        last: AtomicU64,
    }

    impl CallIdSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn next_id(&self) -> CallId {
            CallId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
        }
    }
}

pub mod text {
    //! Input normalization helpers.

    /// Returns the trimmed text, or `None` when nothing but whitespace remains.
    pub fn non_empty_trimmed(value: &str) -> Option<&str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

pub use context::{CallId, CallIdSource, SessionId};
pub use future::BoxFuture;
pub use text::non_empty_trimmed;
