use crate::error::ReelError;

/// Where failed loads go. The UI never shows fetch errors directly; it renders
/// an empty state and hands the error to a reporter.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    fn report(&self, context: &str, err: &ReelError);
}

/// Production reporter: forwards to `tracing`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, err: &ReelError) {
        tracing::error!(context, error = %err, "load failed");
    }
}

#[cfg(test)]
pub use memory::MemoryReporter;
