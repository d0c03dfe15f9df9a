//! Error types for the llm-docconv library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] — **Fatal**: the conversion cannot produce a result
//!   at all (empty input, provider not configured, every LLM attempt
//!   failed). Returned as `Err(ConvertError)` from the `convert*` functions.
//!
//! * [`DecodeError`] — **Data**: the LLM answered, but the answer for a
//!   binary format is not valid base64. It travels inside
//!   [`crate::materialize::MaterializedOutput::DecodeError`] so callers
//!   match on it like any other result and cannot mistake it for a file.
//!   [`crate::output::ConversionOutput::into_result`] upgrades it to
//!   [`ConvertError::Decode`] when a hard failure is preferred.

use crate::format::Format;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the llm-docconv library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input was empty or whitespace only; no call is made.
    #[error("Input text cannot be empty.")]
    EmptyInput,

    /// A format name did not match any label or slug.
    #[error("Unknown format '{name}'\nRun `docconv --list-formats` to see the supported names.")]
    UnknownFormat { name: String },

    /// The format exists but is not offered as conversion input.
    #[error("{format} is not supported as an input format")]
    UnsupportedInputFormat { format: Format },

    /// The format exists but is not offered as conversion output.
    #[error("{format} is not supported as an output format")]
    UnsupportedOutputFormat { format: Format },

    /// No input format was given and none could be detected from the file name.
    #[error("Cannot detect the input format of '{input}'\nPass it explicitly with --from <FORMAT>.")]
    UnknownInputFormat { input: String },

    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file (or download) is not UTF-8 text.
    #[error("Failed to read the selected file: '{input}' is not UTF-8 text")]
    InputNotText { input: String },

    /// Reading the file or stdin failed for another reason.
    #[error("Failed to read the selected file '{input}': {source}")]
    FileReadFailed {
        input: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No provider could be initialised (missing API key etc.).
    #[error("API key is not configured for provider '{provider}'.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Every attempt failed; `detail` is the last underlying error.
    #[error(
        "Failed to convert the document. Please check your API key and network connection.\n\
         {attempts} attempt(s), last error: {detail}"
    )]
    ConversionFailed { attempts: u32, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Binary output could not be decoded; surfaced by `into_result`.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A save was requested for output that is not a file (decode failure).
    #[error("Nothing to save: {reason}")]
    NotDownloadable { reason: String },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Content declared as a binary format was not valid base64.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[error(
    "The returned content for the binary format {format} was not valid base64. \
     Cannot create download file. ({reason})"
)]
pub struct DecodeError {
    /// The declared output format.
    pub format: Format,
    /// Decoder detail, e.g. `Invalid symbol 33, offset 3.`
    pub reason: String,
}
