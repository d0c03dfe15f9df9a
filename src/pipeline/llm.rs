//! LLM interaction: send the conversion prompt and collect the answer.
//!
//! Prompt wording lives in [`crate::prompts`]; this module only sends
//! requests and handles retries.
//!
//! ## Backend seam
//!
//! Requests go through the [`ConversionBackend`] trait. [`LlmBackend`]
//! adapts any `edgequake_llm` provider; tests and embedders can supply
//! their own implementation through
//! [`crate::config::ConversionConfigBuilder::backend`].
//!
//! ## Retry Strategy
//!
//! Transient provider errors (429 / 503 / timeouts) are common. Exponential
//! backoff (`retry_backoff_ms * 2^(attempt-1)`) spaces attempts out: with
//! 500 ms base and 2 retries the wait sequence is 500 ms → 1 s.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// One conversion request as sent to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

/// A backend's answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A successful completion plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub completion: Completion,
    /// Failed attempts before the successful one.
    pub retries: u32,
    pub duration_ms: u64,
}

/// Something that can answer a [`CompletionRequest`].
///
/// Errors are returned as display strings; every error is treated as
/// retryable by [`request_completion`].
pub trait ConversionBackend: Send + Sync {
    /// Short name for logs, e.g. `"gemini/gemini-2.5-flash"`.
    fn name(&self) -> String;

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<Completion, String>>;
}

/// [`ConversionBackend`] over an `edgequake_llm` provider.
pub struct LlmBackend {
    provider: Arc<dyn LLMProvider>,
    label: String,
}

impl LlmBackend {
    pub fn new(provider: Arc<dyn LLMProvider>, label: impl Into<String>) -> Self {
        Self {
            provider,
            label: label.into(),
        }
    }
}

impl fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmBackend").field("label", &self.label).finish()
    }
}

impl ConversionBackend for LlmBackend {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<Completion, String>> {
        Box::pin(async move {
            let messages = vec![
                ChatMessage::system(request.system.as_str()),
                ChatMessage::user(request.user.as_str()),
            ];
            let options = CompletionOptions {
                temperature: Some(request.temperature),
                max_tokens: Some(request.max_tokens),
                ..Default::default()
            };

            let response = self
                .provider
                .chat(&messages, Some(&options))
                .await
                .map_err(|e| format!("{}", e))?;

            Ok(Completion {
                content: response.content,
                input_tokens: response.prompt_tokens as u64,
                output_tokens: response.completion_tokens as u64,
            })
        })
    }
}

/// Build the request from prompts and config.
pub fn build_request(system: String, user: String, config: &ConversionConfig) -> CompletionRequest {
    CompletionRequest {
        system,
        user,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Longest single wait between attempts.
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Delay before retry number `retry` (1-based): `base * 2^(retry-1)`,
/// capped at [`MAX_BACKOFF_MS`].
pub fn backoff_ms(base: u64, retry: u32) -> u64 {
    2u64.checked_pow(retry.saturating_sub(1))
        .and_then(|m| base.checked_mul(m))
        .map_or(MAX_BACKOFF_MS, |d| d.min(MAX_BACKOFF_MS))
}

/// Send `request`, retrying with exponential backoff.
///
/// Each attempt is bounded by `config.api_timeout_secs`. After
/// `config.max_retries + 1` failed attempts the last error is returned as
/// [`ConvertError::ConversionFailed`].
pub async fn request_completion(
    backend: &dyn ConversionBackend,
    request: &CompletionRequest,
    config: &ConversionConfig,
) -> Result<CompletionOutcome, ConvertError> {
    let start = Instant::now();
    let max_attempts = config.max_retries.saturating_add(1);
    let per_call = Duration::from_secs(config.api_timeout_secs);
    let mut last_err: Option<String> = None;

    for attempt in 0..max_attempts {
        if attempt > 0 {
            let backoff = backoff_ms(config.retry_backoff_ms, attempt);
            warn!(
                "{}: retry {}/{} after {}ms",
                backend.name(),
                attempt,
                config.max_retries,
                backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_attempt(attempt + 1, max_attempts);
        }

        let result = match timeout(per_call, backend.complete(request)).await {
            Ok(r) => r,
            Err(_) => Err(format!(
                "request timed out after {}s",
                config.api_timeout_secs
            )),
        };

        match result {
            Ok(completion) => {
                let duration = start.elapsed();
                debug!(
                    "{}: {} input tokens, {} output tokens, {:?}",
                    backend.name(),
                    completion.input_tokens,
                    completion.output_tokens,
                    duration
                );
                return Ok(CompletionOutcome {
                    completion,
                    retries: attempt,
                    duration_ms: duration.as_millis() as u64,
                });
            }
            Err(e) => {
                warn!("{}: attempt {} failed — {}", backend.name(), attempt + 1, e);
                last_err = Some(e);
            }
        }
    }

    Err(ConvertError::ConversionFailed {
        attempts: max_attempts,
        detail: last_err.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails `failures` times, then echoes the user prompt length.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl ConversionBackend for Flaky {
        fn name(&self) -> String {
            "flaky".into()
        }

        fn complete<'a>(
            &'a self,
            request: &'a CompletionRequest,
        ) -> BoxFuture<'a, Result<Completion, String>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n < self.failures {
                    Err(format!("HTTP 503 (call {})", n + 1))
                } else {
                    Ok(Completion {
                        content: format!("{} chars", request.user.len()),
                        input_tokens: 10,
                        output_tokens: 2,
                    })
                }
            })
        }
    }

    fn fast_config(max_retries: u32) -> ConversionConfig {
        ConversionConfig::builder()
            .max_retries(max_retries)
            .retry_backoff_ms(1)
            .build()
            .unwrap()
    }

    fn request() -> CompletionRequest {
        build_request("sys".into(), "hello".into(), &ConversionConfig::default())
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let backend = Flaky {
            failures: 2,
            calls: AtomicU32::new(0),
        };
        let outcome = request_completion(&backend, &request(), &fast_config(2))
            .await
            .unwrap();
        assert_eq!(outcome.retries, 2);
        assert_eq!(outcome.completion.content, "5 chars");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let backend = Flaky {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let err = request_completion(&backend, &request(), &fast_config(1))
            .await
            .unwrap_err();
        match err {
            ConvertError::ConversionFailed { attempts, detail } => {
                assert_eq!(attempts, 2);
                assert!(detail.contains("call 2"), "got: {detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_ms(500, 1), 500);
        assert_eq!(backoff_ms(500, 2), 1000);
        assert_eq!(backoff_ms(500, 3), 2000);
        assert_eq!(backoff_ms(500, 20), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(0, 70), 0);
        assert_eq!(backoff_ms(u64::MAX, 2), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(1, u32::MAX), MAX_BACKOFF_MS);
    }

    #[tokio::test]
    async fn many_retries_without_builder_do_not_overflow() {
        let backend = Flaky {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let mut config = ConversionConfig::default();
        config.max_retries = 70;
        config.retry_backoff_ms = 0;
        let err = request_completion(&backend, &request(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::ConversionFailed { attempts: 71, .. }));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 71);
    }

    #[tokio::test]
    async fn max_u32_retries_still_succeed_first_time() {
        let backend = Flaky {
            failures: 0,
            calls: AtomicU32::new(0),
        };
        let mut config = ConversionConfig::default();
        config.max_retries = u32::MAX;
        let outcome = request_completion(&backend, &request(), &config)
            .await
            .unwrap();
        assert_eq!(outcome.retries, 0);
    }

    #[test]
    fn request_carries_sampling_options() {
        let r = request();
        assert_eq!(r.temperature, 0.1);
        assert_eq!(r.max_tokens, 8192);
    }
}
