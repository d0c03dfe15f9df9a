//! # llm-docconv
//!
//! Convert text documents between ~40 markup, data and office formats by
//! asking a Large Language Model to act like `pandoc`.
//!
//! ## Why this crate?
//!
//! Writing a converter per format pair does not scale. An LLM already knows
//! Markdown, reStructuredText, LaTeX, DocBook and friends, so one prompt
//! covers every pair. The hard part is what comes *back*: text formats are
//! used as-is, but binary formats (ePub, DOCX, ODT, PDF) arrive as base64
//! and must be decoded before they can be saved. [`materialize`] turns the
//! model's answer into a typed [`MaterializedOutput`] so that a bad answer
//! becomes a visible [`DecodeError`] instead of a corrupt file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input text
//!  │
//!  ├─ 1. Input        path / URL / stdin, format detected from extension
//!  ├─ 2. Validate     non-empty, input/output formats supported
//!  ├─ 3. Prompt       pandoc-emulating system prompt + document
//!  ├─ 4. LLM          timeout + retry with exponential backoff
//!  ├─ 5. Clean        trim, strip wrapping code fence / data: prefix
//!  └─ 6. Materialize  Text | Binary { bytes, mime, filename } | DecodeError
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_docconv::{convert_text, ConversionConfig, Format};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = ConversionConfig::default();
//!     let out = convert_text("# Hello", Format::Markdown, Format::Html, &config).await?;
//!     if let Some(html) = out.output.copyable_text() {
//!         println!("{html}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docconv` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! llm-docconv = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod materialize;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod render;
pub mod save;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_MODEL};
pub use convert::{
    convert, convert_document, convert_sync, convert_text, convert_to_file, resolve_backend,
};
pub use error::{ConvertError, DecodeError};
pub use format::{
    accepted_upload_extensions, is_binary, Format, FormatCatalog, BINARY_FORMATS, INPUT_FORMATS,
    OUTPUT_FORMATS,
};
pub use materialize::{materialize, DecodePolicy, MaterializedOutput, Materializer};
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::llm::{Completion, CompletionRequest, ConversionBackend, LlmBackend};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use render::{default_view_mode, render, Rendered, ViewMode};
pub use save::{save_output, Download};
pub use state::{AppState, ConversionRequest, Event, Phase};
