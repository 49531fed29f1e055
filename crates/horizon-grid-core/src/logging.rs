//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_grid=debug")
//!     .init();
//! ```
//!
//! Each subsystem logs under its own target (see [`targets`]) so that, for
//! example, selection changes can be traced without the noise of virtual
//! window recomputation on every scroll event.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Tree flattening and expansion.
    pub const TREE: &str = "horizon_grid::tree";
    /// Row selection.
    pub const SELECTION: &str = "horizon_grid::selection";
    /// Column resizing.
    pub const RESIZE: &str = "horizon_grid::resize";
    /// Pinned column layout.
    pub const FIXED: &str = "horizon_grid::fixed";
    /// Grouped header construction.
    pub const HEADER: &str = "horizon_grid::header";
    /// Row virtualization.
    pub const VIRTUAL: &str = "horizon_grid::virtual";
    /// Table controller.
    pub const TABLE: &str = "horizon_grid::table";
    /// Configuration loading.
    pub const CONFIG: &str = "horizon_grid::config";
    /// Performance spans.
    pub const PERF: &str = "horizon_grid::perf";
}

/// A guard for performance tracing spans.
///
/// When created, enters a tracing span. When dropped, exits the span. Table
/// recomputations (flattening, header building) are wrapped in one so their
/// cost shows up in span-timing subscribers.
///
/// # Example
///
/// ```ignore
/// use horizon_grid_core::PerfSpan;
///
/// fn rebuild() {
///     let _span = PerfSpan::new("rebuild");
///     // ... expensive work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Test subscriber that records the target of every span and event.
#[cfg(test)]
pub(crate) mod capture {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing::span::{Attributes, Id};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Clone, Default)]
    pub(crate) struct TargetRecorder {
        targets: Arc<Mutex<Vec<String>>>,
    }

    impl TargetRecorder {
        /// Runs `f` with this recorder as the thread's default subscriber.
        pub(crate) fn record<R>(&self, f: impl FnOnce() -> R) -> R {
            let subscriber = tracing_subscriber::registry().with(self.clone());
            tracing::subscriber::with_default(subscriber, f)
        }

        pub(crate) fn targets(&self) -> Vec<String> {
            self.targets.lock().clone()
        }
    }

    impl<S: Subscriber> Layer<S> for TargetRecorder {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            self.targets.lock().push(attrs.metadata().target().to_string());
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.targets.lock().push(event.metadata().target().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::capture::TargetRecorder;
    use super::*;

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let _span = PerfSpan::new("test_operation");
        tracing::debug!(target: targets::TABLE, "inside perf span");
    }

    #[test]
    fn test_perf_span_uses_perf_target() {
        let recorder = TargetRecorder::default();
        recorder.record(|| {
            let _span = PerfSpan::new("flatten");
        });
        assert_eq!(recorder.targets(), [targets::PERF]);
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::TREE,
            targets::SELECTION,
            targets::RESIZE,
            targets::FIXED,
            targets::HEADER,
            targets::VIRTUAL,
            targets::TABLE,
            targets::CONFIG,
            targets::PERF,
        ] {
            assert!(target.starts_with("horizon_grid::"));
        }
    }
}
