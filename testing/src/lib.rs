//! # reqtrace testing
//!
//! Testing utilities for code that binds or invokes reqtrace hook sets.
//!
//! This crate provides:
//! - Recording and counting hooks to observe invocation order
//! - Log capture for the `tracing` observers
//! - Property-based testing strategies for bind sequences
//!
//! ## Example
//!
//! ```
//! use reqtrace_core::Context;
//! use reqtrace_core::server::{HandlerDoneInfo, ServerTrace};
//! use reqtrace_testing::CallLog;
//!
//! let log = CallLog::new();
//! let a = ServerTrace { handler_done: Some(log.hook("A")), ..ServerTrace::default() };
//! let b = ServerTrace { handler_done: Some(log.hook("B")), ..ServerTrace::default() };
//!
//! let ctx = Context::background().with_hooks(&a).with_hooks(&b);
//! ctx.hooks::<ServerTrace>().unwrap().emit_handler_done(&HandlerDoneInfo::default());
//!
//! assert_eq!(log.entries(), vec!["B", "A"]);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use reqtrace_core::Hook;

/// Recording hooks
pub mod mocks {
    use super::{Arc, AtomicUsize, Hook, Mutex, MutexGuard, Ordering, PoisonError};

    /// Ordered record of hook invocations
    ///
    /// Clones share the same record, so one log can back many hooks.
    #[derive(Debug, Clone, Default)]
    pub struct CallLog {
        entries: Arc<Mutex<Vec<String>>>,
    }

    impl CallLog {
        /// Create an empty log
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A hook that appends `label` each time it runs
        #[must_use]
        pub fn hook<P: 'static>(&self, label: impl Into<String>) -> Hook<P> {
            let log = self.clone();
            let label = label.into();
            Arc::new(move |_: &P| log.record(&label))
        }

        /// Append `label` directly
        pub fn record(&self, label: &str) {
            self.lock().push(label.to_string());
        }

        /// Snapshot of all recorded labels, oldest first
        #[must_use]
        pub fn entries(&self) -> Vec<String> {
            self.lock().clone()
        }

        /// Number of recorded invocations
        #[must_use]
        pub fn len(&self) -> usize {
            self.lock().len()
        }

        /// Returns true if nothing was recorded
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.lock().is_empty()
        }

        /// Forget everything recorded so far
        pub fn clear(&self) {
            self.lock().clear();
        }

        fn lock(&self) -> MutexGuard<'_, Vec<String>> {
            // A panicking hook must not hide what was recorded before it.
            self.entries.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Counts hook invocations without recording order
    #[derive(Debug, Clone, Default)]
    pub struct CallCounter {
        count: Arc<AtomicUsize>,
    }

    impl CallCounter {
        /// Create a counter at zero
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A hook that increments this counter
        #[must_use]
        pub fn hook<P: 'static>(&self) -> Hook<P> {
            let count = Arc::clone(&self.count);
            Arc::new(move |_: &P| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        }

        /// Invocations so far
        #[must_use]
        pub fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }
}

/// Log capture helpers
pub mod helpers {
    use super::{Arc, Mutex, PoisonError};
    use std::io;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::util::SubscriberInitExt;

    /// In-memory sink for formatted `tracing` output
    #[derive(Debug, Clone, Default)]
    pub struct CapturedLogs {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl CapturedLogs {
        /// Everything written so far, lossily decoded
        #[must_use]
        pub fn contents(&self) -> String {
            let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&buffer).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with a thread-local subscriber capturing every event.
    ///
    /// Returns the closure's result and the formatted output.
    pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(LevelFilter::TRACE)
            .with_ansi(false)
            .finish();

        let result = {
            let _guard = subscriber.set_default();
            f()
        };
        (result, logs.contents())
    }

    /// Install a global test subscriber honouring `RUST_LOG`.
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::collection::{hash_set, vec};
    use proptest::prelude::*;

    /// Between one and `max` distinct lowercase labels
    pub fn arb_labels(max: usize) -> impl Strategy<Value = Vec<String>> {
        hash_set("[a-z]{1,8}", 1..=max.max(1)).prop_map(|labels| labels.into_iter().collect())
    }

    /// A sequence of up to `max_sets` hook sets to bind, each given as the
    /// set/unset state of its `slots` slots
    pub fn arb_bind_plan(max_sets: usize, slots: usize) -> impl Strategy<Value = Vec<Vec<bool>>> {
        vec(vec(any::<bool>(), slots), 1..=max_sets.max(1))
    }
}

pub use helpers::{CapturedLogs, capture_logs, init_test_tracing};
pub use mocks::{CallCounter, CallLog};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_records_in_order() {
        let log = CallLog::new();
        let first: Hook<u8> = log.hook("first");
        let second: Hook<u8> = log.hook("second");

        second(&0);
        first(&0);

        assert_eq!(log.entries(), vec!["second", "first"]);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_call_counter_shared_between_hooks() {
        let counter = CallCounter::new();
        let a: Hook<()> = counter.hook();
        let b: Hook<()> = counter.hook();

        a(&());
        b(&());
        a(&());

        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn test_captured_logs_shared_between_clones() {
        let logs = CapturedLogs::default();
        let mut writer = logs.clone();
        std::io::Write::write_all(&mut writer, b"direct").ok();
        assert_eq!(logs.contents(), "direct");
    }
}
