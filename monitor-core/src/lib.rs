pub mod models;
pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, ServiceConfiguration};
pub use error::{Error, Result};
pub use logging::{LogSink, Severity, TracingSink};
pub use models::{ProbeOutcome, ProbeResult, ReplyStatus};
