//! Production-friendly observability for gateway calls and failure reports.
//!
//! ```rust
//! use uobserve::{MetricsGatewayHooks, SafeGatewayHooks, TracingFailureSink, TracingGatewayHooks};
//!
//! let _hooks = SafeGatewayHooks::new(TracingGatewayHooks);
//! let _metrics = MetricsGatewayHooks;
//! let _sink = TracingFailureSink;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsGatewayHooks;
pub use safe_hooks::{SafeFailureSink, SafeGatewayHooks};
pub use tracing_hooks::{TracingFailureSink, TracingGatewayHooks};

pub mod prelude {
    pub use crate::{
        MetricsGatewayHooks, SafeFailureSink, SafeGatewayHooks, TracingFailureSink,
        TracingGatewayHooks,
    };
}
