//! Configuration types for document conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Every knob lives in one struct so a
//! config can be shared across tasks and logged as a whole.

use crate::error::ConvertError;
use crate::format::FormatCatalog;
use crate::materialize::{DecodePolicy, Materializer};
use crate::pipeline::llm::ConversionBackend;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Model used when a provider is chosen but no model is named.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Upper bound accepted for [`ConversionConfig::max_retries`].
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Configuration for a conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use llm_docconv::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .provider_name("gemini")
///     .model("gemini-2.5-flash")
///     .max_retries(1)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// LLM model identifier, e.g. "gemini-2.5-flash", "gpt-4.1-mini".
    /// If None, uses [`DEFAULT_MODEL`] for named providers.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed backend. Takes precedence over every provider setting.
    pub backend: Option<Arc<dyn ConversionBackend>>,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Conversion should be faithful, not creative.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate. Default: 8192.
    ///
    /// Base64 output for binary formats is roughly 4/3 the file size, so
    /// this also caps the size of a generated DOCX or PDF.
    pub max_tokens: usize,

    /// Retry attempts after the first failed request. Default: 2.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled per attempt. Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-request timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 60.
    pub download_timeout_secs: u64,

    /// Custom system prompt. If None, uses [`crate::prompts::system_prompt`].
    pub system_prompt: Option<String>,

    /// Strip an outer code fence wrapping the whole response. Default: true.
    pub clean_output: bool,

    /// Base64 leniency for binary formats. Default: [`DecodePolicy::IgnoreWhitespace`].
    pub decode_policy: DecodePolicy,

    /// Binary set, MIME and extension tables. Default: [`FormatCatalog::standard`].
    pub catalog: FormatCatalog,

    /// Optional progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            backend: None,
            temperature: 0.1,
            max_tokens: 8192,
            max_retries: 2,
            retry_backoff_ms: 500,
            api_timeout_secs: 120,
            download_timeout_secs: 60,
            system_prompt: None,
            clean_output: true,
            decode_policy: DecodePolicy::default(),
            catalog: FormatCatalog::standard(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("backend", &self.backend.as_ref().map(|_| "<dyn ConversionBackend>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("clean_output", &self.clean_output)
            .field("decode_policy", &self.decode_policy)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The materializer described by this config's catalogue and policy.
    pub fn materializer(&self) -> Materializer {
        Materializer::new(self.catalog.clone(), self.decode_policy)
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn ConversionBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn clean_output(mut self, v: bool) -> Self {
        self.config.clean_output = v;
        self
    }

    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.config.decode_policy = policy;
        self
    }

    pub fn catalog(mut self, catalog: FormatCatalog) -> Self {
        self.config.catalog = catalog;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(ConvertError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConvertError::InvalidConfig(format!(
                "max_retries must be ≤ {MAX_RETRIES_LIMIT} (got {})",
                c.max_retries
            )));
        }
        if c.api_timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(prompt) = &c.system_prompt {
            if prompt.trim().is_empty() {
                return Err(ConvertError::InvalidConfig(
                    "Custom system prompt is empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.temperature, 0.1);
        assert_eq!(c.max_retries, 2);
        assert!(c.clean_output);
        assert_eq!(c.decode_policy, DecodePolicy::IgnoreWhitespace);
        assert!(c.catalog.is_binary(Format::Pdf));
    }

    #[test]
    fn temperature_is_clamped() {
        let c = ConversionConfig::builder().temperature(7.5).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = ConversionConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let err = ConversionConfig::builder().max_tokens(0).build().unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn excessive_retries_rejected() {
        assert!(ConversionConfig::builder()
            .max_retries(MAX_RETRIES_LIMIT)
            .build()
            .is_ok());
        for n in [MAX_RETRIES_LIMIT + 1, 70, u32::MAX] {
            let err = ConversionConfig::builder().max_retries(n).build().unwrap_err();
            assert!(err.to_string().contains("max_retries"), "{n}: {err}");
        }
    }

    #[test]
    fn blank_system_prompt_rejected() {
        assert!(ConversionConfig::builder().system_prompt("  \n").build().is_err());
    }

    #[test]
    fn materializer_follows_config() {
        let c = ConversionConfig::builder()
            .decode_policy(DecodePolicy::Strict)
            .catalog(FormatCatalog::standard().without_binary(Format::Pdf))
            .build()
            .unwrap();
        let m = c.materializer();
        assert_eq!(m.policy(), DecodePolicy::Strict);
        assert!(m.materialize("plain words", Format::Pdf).is_text());
    }

    #[test]
    fn debug_hides_provider() {
        let dbg = format!("{:?}", ConversionConfig::default());
        assert!(dbg.contains("ConversionConfig"));
        assert!(dbg.contains("provider: None"));
    }
}
