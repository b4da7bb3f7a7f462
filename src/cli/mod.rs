pub mod rates;
pub mod solve;
pub mod ui;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::trace::{LogSink, StreamSink, TraceSink};

/// Builds the trace sink the config asks for: a file-backed text stream
/// when `trace_log` is set, the structured logger otherwise.
pub(crate) fn build_sink(config: &AppConfig) -> Result<Box<dyn TraceSink + Send + Sync>> {
    match &config.trace_log {
        Some(path) => {
            let sink = StreamSink::file(path)
                .with_context(|| format!("Failed to open trace log: {}", path.display()))?;
            Ok(Box::new(sink))
        }
        None => Ok(Box::new(LogSink)),
    }
}
