//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events while a conversion runs: start, each LLM attempt, and the final
//! outcome.
//!
//! Callers can forward events to a terminal spinner, a channel, or a UI
//! reducer without the library knowing how the host application
//! communicates. The trait is `Send + Sync` so one callback can be shared
//! by conversions running on different tasks.
//!
//! # Example
//!
//! ```rust
//! use llm_docconv::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
//!
//! struct AttemptCounter {
//!     attempts: AtomicU32,
//! }
//!
//! impl ConversionProgressCallback for AttemptCounter {
//!     fn on_attempt(&self, attempt: u32, max_attempts: u32) {
//!         self.attempts.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("attempt {attempt}/{max_attempts}");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(AttemptCounter { attempts: AtomicU32::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::format::Format;
use std::sync::Arc;

/// Called by the conversion pipeline as it runs.
///
/// All methods have default no-op implementations so callers only
/// override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, after validation, before the first LLM request.
    ///
    /// * `input_len` — byte length of the input document
    fn on_conversion_start(&self, input: Format, output: Format, input_len: usize) {
        let _ = (input, output, input_len);
    }

    /// Called before every LLM request.
    ///
    /// * `attempt` — 1-indexed attempt number
    /// * `max_attempts` — `max_retries + 1`
    fn on_attempt(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// Called when the LLM produced a response.
    ///
    /// * `output_len` — byte length of the cleaned response
    fn on_conversion_complete(&self, output_len: usize) {
        let _ = output_len;
    }

    /// Called when every attempt failed.
    fn on_conversion_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
#[derive(Debug)]
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        attempts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, _input: Format, _output: Format, _input_len: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_attempt(&self, _attempt: u32, _max_attempts: u32) {
            self.attempts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _output_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_error(&self, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(Format::Markdown, Format::Html, 12);
        cb.on_attempt(1, 3);
        cb.on_conversion_complete(42);
        cb.on_conversion_error("timeout");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_conversion_start(Format::Markdown, Format::Pdf, 10);
        tracker.on_attempt(1, 3);
        tracker.on_attempt(2, 3);
        tracker.on_conversion_complete(100);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.attempts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_attempt(1, 1);
    }
}
