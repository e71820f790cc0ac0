//! Diagnostic sink abstraction.
//!
//! The registry reports catalog loads and recoverable resolution failures
//! through an injected sink instead of logging directly, so embedders (build
//! plugins, test harnesses) decide where the text goes. `TracingSink` is the
//! default bridge into the `tracing` macros.

/// Receiver for human-readable registry diagnostics.
pub trait DiagnosticSink {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Sink that forwards to `tracing::info!` / `tracing::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "forbidden_sigs", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "forbidden_sigs", "{message}");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::DiagnosticSink;
    use std::cell::RefCell;

    /// Records every message for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub infos: RefCell<Vec<String>>,
        pub warns: RefCell<Vec<String>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn info(&self, message: &str) {
            self.infos.borrow_mut().push(message.to_string());
        }

        fn warn(&self, message: &str) {
            self.warns.borrow_mut().push(message.to_string());
        }
    }
}
