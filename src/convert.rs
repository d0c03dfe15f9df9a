//! Conversion entry points.
//!
//! [`convert_document`] is the core operation: validate, prompt, call the
//! LLM, clean the answer. [`convert_text`] adds materialization and stats;
//! [`convert`] loads the input first; [`convert_to_file`] also saves.

use crate::config::{ConversionConfig, DEFAULT_MODEL};
use crate::error::ConvertError;
use crate::format::Format;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::llm::{self, CompletionOutcome, ConversionBackend, LlmBackend};
use crate::pipeline::{input, postprocess};
use crate::prompts;
use crate::save;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Convert `input_text` from `input_format` to `output_format`.
///
/// Returns the cleaned response string. For binary output formats this is
/// the base64 text the model produced; pass it through
/// [`crate::materialize::Materializer`] (or use [`convert_text`]) to get
/// bytes.
///
/// # Errors
/// - [`ConvertError::EmptyInput`] for empty or whitespace-only input, before
///   any provider is contacted
/// - [`ConvertError::UnsupportedInputFormat`] / [`ConvertError::UnsupportedOutputFormat`]
/// - [`ConvertError::ProviderNotConfigured`] when no backend can be built
/// - [`ConvertError::ConversionFailed`] once every attempt has failed
pub async fn convert_document(
    input_text: &str,
    input_format: Format,
    output_format: Format,
    config: &ConversionConfig,
) -> Result<String, ConvertError> {
    run(input_text, input_format, output_format, config)
        .await
        .map(|(content, _)| content)
}

/// Convert text and materialize the result.
///
/// A base64 decode failure is *not* an error here: it is returned as
/// [`crate::MaterializedOutput::DecodeError`] inside the output. Call
/// [`ConversionOutput::into_result`] to treat it as one.
pub async fn convert_text(
    input_text: &str,
    input_format: Format,
    output_format: Format,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let total_start = Instant::now();
    let (raw, outcome) = run(input_text, input_format, output_format, config).await?;

    let output = config.materializer().materialize(&raw, output_format);
    if let Some(e) = output.decode_error() {
        info!("Response for {} could not be decoded: {}", output_format, e.reason);
    }

    let stats = ConversionStats {
        input_chars: input_text.chars().count(),
        output_bytes: output.len(),
        input_tokens: outcome.completion.input_tokens,
        output_tokens: outcome.completion.output_tokens,
        retries: outcome.retries,
        llm_duration_ms: outcome.duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(ConversionOutput {
        input_format,
        output_format,
        raw,
        output,
        stats,
    })
}

/// Load `input` (path, URL or `-` for stdin) and convert it.
///
/// When `input_format` is `None` the format is detected from the file
/// extension.
pub async fn convert(
    input: impl AsRef<str>,
    input_format: Option<Format>,
    output_format: Format,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let input = input.as_ref();
    info!("Starting conversion: {}", input::display_name(input));

    let loaded = input::resolve_input(input, config.download_timeout_secs).await?;
    let input_format = input_format
        .or(loaded.detected_format)
        .ok_or_else(|| ConvertError::UnknownInputFormat {
            input: input::display_name(input).to_string(),
        })?;
    debug!(
        "Input {} resolved as {} ({} bytes)",
        input::display_name(input),
        input_format,
        loaded.text.len()
    );

    convert_text(&loaded.text, input_format, output_format, config).await
}

/// Convert and save the result to `dest`.
///
/// `dest` may be a directory, in which case the suggested download name
/// (`converted-document.<ext>`) is used inside it. A result that failed to
/// decode is not written.
pub async fn convert_to_file(
    input: impl AsRef<str>,
    input_format: Option<Format>,
    output_format: Format,
    dest: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<(ConversionOutput, PathBuf), ConvertError> {
    let output = convert(input, input_format, output_format, config)
        .await?
        .into_result()?;
    let path = save::save_output(&output.output, output_format, &config.catalog, dest).await?;
    Ok((output, path))
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input: impl AsRef<str>,
    input_format: Option<Format>,
    output_format: Format,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input, input_format, output_format, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Validate, call the backend and clean the response.
async fn run(
    input_text: &str,
    input_format: Format,
    output_format: Format,
    config: &ConversionConfig,
) -> Result<(String, CompletionOutcome), ConvertError> {
    // Validation happens before the backend is resolved so a blank form
    // never needs credentials.
    if input::is_blank(input_text) {
        return Err(ConvertError::EmptyInput);
    }
    if !input_format.is_input() {
        return Err(ConvertError::UnsupportedInputFormat {
            format: input_format,
        });
    }
    if !output_format.is_output() {
        return Err(ConvertError::UnsupportedOutputFormat {
            format: output_format,
        });
    }

    let backend = resolve_backend(config)?;
    let binary = config.catalog.is_binary(output_format);
    info!(
        "Converting {} → {}{} via {}",
        input_format,
        output_format,
        if binary { " (binary)" } else { "" },
        backend.name()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(input_format, output_format, input_text.len());
    }

    let system = match config.system_prompt {
        Some(ref custom) => custom.clone(),
        None => prompts::system_prompt(input_format, output_format, binary),
    };
    let user = prompts::user_prompt(input_text, input_format, output_format);
    let request = llm::build_request(system, user, config);

    let outcome = match llm::request_completion(backend.as_ref(), &request, config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_conversion_error(&e.to_string());
            }
            return Err(e);
        }
    };

    let content = postprocess::clean_response(
        &outcome.completion.content,
        output_format,
        &config.catalog,
        config.clean_output,
    );
    debug!(
        "Response: {} chars raw, {} chars cleaned",
        outcome.completion.content.len(),
        content.len()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(content.len());
    }

    Ok((content, outcome))
}

/// Instantiate a named provider with the given model.
fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, ConvertError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ConvertError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

fn named_backend(provider_name: &str, model: &str) -> Result<Arc<dyn ConversionBackend>, ConvertError> {
    let provider = create_provider(provider_name, model)?;
    Ok(Arc::new(LlmBackend::new(
        provider,
        format!("{provider_name}/{model}"),
    )))
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Resolve the backend, from most-specific to least-specific.
///
/// 1. **Pre-built backend** (`config.backend`), used as-is.
/// 2. **Pre-built provider** (`config.provider`), wrapped in [`LlmBackend`].
/// 3. **Named provider + model** (`config.provider_name`); the model
///    defaults to [`DEFAULT_MODEL`]. The factory reads the provider's API
///    key from the environment.
/// 4. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`),
///    honoured only when both are set.
/// 5. **Gemini key** (`GEMINI_API_KEY` or `GOOGLE_API_KEY`): Gemini with
///    `config.model` or [`DEFAULT_MODEL`].
/// 6. **Full auto-detection** via [`ProviderFactory::from_env`].
pub fn resolve_backend(config: &ConversionConfig) -> Result<Arc<dyn ConversionBackend>, ConvertError> {
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }

    if let Some(ref provider) = config.provider {
        let label = config.model.as_deref().unwrap_or("custom");
        return Ok(Arc::new(LlmBackend::new(Arc::clone(provider), label)));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return named_backend(name, model);
    }

    if let (Some(prov), Some(model)) = (
        env_non_empty("EDGEQUAKE_LLM_PROVIDER"),
        env_non_empty("EDGEQUAKE_MODEL"),
    ) {
        return named_backend(&prov, &model);
    }

    if env_non_empty("GEMINI_API_KEY").is_some() || env_non_empty("GOOGLE_API_KEY").is_some() {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return named_backend("gemini", model);
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ConvertError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(Arc::new(LlmBackend::new(llm_provider, "auto")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::{Completion, CompletionRequest};
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    /// Records the last request and replies with a fixed string.
    struct Canned {
        reply: String,
        seen: Mutex<Option<CompletionRequest>>,
    }

    impl Canned {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                seen: Mutex::new(None),
            })
        }
    }

    impl ConversionBackend for Canned {
        fn name(&self) -> String {
            "canned".into()
        }

        fn complete<'a>(
            &'a self,
            request: &'a CompletionRequest,
        ) -> BoxFuture<'a, Result<Completion, String>> {
            *self.seen.lock().unwrap() = Some(request.clone());
            let reply = self.reply.clone();
            Box::pin(async move {
                Ok(Completion {
                    content: reply,
                    input_tokens: 3,
                    output_tokens: 1,
                })
            })
        }
    }

    fn config_with(backend: Arc<Canned>) -> ConversionConfig {
        ConversionConfig::builder().backend(backend).build().unwrap()
    }

    #[tokio::test]
    async fn prompts_carry_formats_and_text() {
        let backend = Canned::new("<h1>Hi</h1>");
        let config = config_with(backend.clone());
        let out = convert_document("# Hi", Format::Markdown, Format::Html, &config)
            .await
            .unwrap();
        assert_eq!(out, "<h1>Hi</h1>");

        let seen = backend.seen.lock().unwrap().clone().unwrap();
        assert!(seen.system.contains("from Markdown to HTML"));
        assert!(seen.user.contains("INPUT TEXT (Markdown):\n# Hi"));
        assert!(seen.user.ends_with("CONVERTED TEXT (HTML):"));
    }

    #[tokio::test]
    async fn custom_system_prompt_replaces_builtin() {
        let backend = Canned::new("x");
        let config = ConversionConfig::builder()
            .backend(backend.clone())
            .system_prompt("Be terse.")
            .build()
            .unwrap();
        convert_document("a", Format::PlainText, Format::Rst, &config)
            .await
            .unwrap();
        let seen = backend.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.system, "Be terse.");
    }

    #[tokio::test]
    async fn blank_input_never_reaches_backend() {
        let backend = Canned::new("x");
        let config = config_with(backend.clone());
        let err = convert_document(" \n\t", Format::Markdown, Format::Html, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::EmptyInput));
        assert!(backend.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn binary_input_format_is_rejected() {
        let config = config_with(Canned::new("x"));
        let err = convert_document("x", Format::Pdf, Format::Html, &config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnsupportedInputFormat { format: Format::Pdf }
        ));
    }

    #[tokio::test]
    async fn convert_text_materializes_binary() {
        let config = config_with(Canned::new("```\nSGVsbG8=\n```"));
        let out = convert_text("# Hi", Format::Markdown, Format::Docx, &config)
            .await
            .unwrap();
        assert_eq!(out.raw, "SGVsbG8=");
        assert!(out.output.is_binary());
        assert_eq!(out.stats.output_bytes, 5);
        assert_eq!(out.stats.input_tokens, 3);
    }
}
