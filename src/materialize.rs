//! Output materialization: raw converted text → typed, ready-to-present result.
//!
//! The LLM always answers with a string. What that string *means* depends
//! only on the declared output format:
//!
//! ```text
//! format ∈ binary set ──▶ base64 decode ──┬─▶ Binary { bytes, mime_type, filename }
//!                                         └─▶ DecodeError { reason }
//! otherwise ────────────────────────────────▶ Text { content }   (verbatim)
//! ```
//!
//! There is no content sniffing: a Markdown answer that happens to be valid
//! base64 is still `Text`, and a PDF answer that is prose is a decode error.
//!
//! Materialization is pure. The same `(content, format)` always yields a
//! structurally equal [`MaterializedOutput`].

use crate::error::DecodeError;
use crate::format::{Format, FormatCatalog};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// How strictly base64 content is decoded.
///
/// Both policies use the RFC 4648 standard alphabet and reject characters
/// outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodePolicy {
    /// Remove ASCII whitespace (space, `\t`, `\r`, `\n`, form feed) anywhere
    /// in the content before decoding, so line-wrapped base64 (76-column
    /// MIME style) is accepted. `=` padding is optional and non-zero
    /// trailing bits are ignored, matching browser `atob`. (default)
    #[default]
    IgnoreWhitespace,
    /// Decode the content exactly as given: any whitespace, missing padding
    /// or non-zero trailing bits is an error.
    Strict,
}

/// A converted result, ready to render, copy, or save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaterializedOutput {
    /// Literal output, shown and copied verbatim.
    Text { content: String },
    /// Decoded file, offered for download only.
    Binary {
        #[serde(serialize_with = "serialize_base64")]
        bytes: Vec<u8>,
        mime_type: String,
        filename: String,
    },
    /// The declared format needed decoding and the content was not base64.
    DecodeError(DecodeError),
}

impl MaterializedOutput {
    /// The text to put on the clipboard; `None` for binary and failed output.
    pub fn copyable_text(&self) -> Option<&str> {
        match self {
            MaterializedOutput::Text { content } => Some(content),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, MaterializedOutput::Text { .. })
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, MaterializedOutput::Binary { .. })
    }

    /// The decode failure, if this result is one.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            MaterializedOutput::DecodeError(e) => Some(e),
            _ => None,
        }
    }

    /// Size of the content a user would receive, in bytes.
    pub fn len(&self) -> usize {
        match self {
            MaterializedOutput::Text { content } => content.len(),
            MaterializedOutput::Binary { bytes, .. } => bytes.len(),
            MaterializedOutput::DecodeError(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Materializes conversion results against a catalogue and decode policy.
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    catalog: FormatCatalog,
    policy: DecodePolicy,
}

impl Materializer {
    pub fn new(catalog: FormatCatalog, policy: DecodePolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    /// Turn `content` into a [`MaterializedOutput`] according to `format`.
    pub fn materialize(&self, content: &str, format: Format) -> MaterializedOutput {
        if !self.catalog.is_binary(format) {
            return MaterializedOutput::Text {
                content: content.to_string(),
            };
        }

        match decode_base64(content, self.policy) {
            Ok(bytes) => {
                debug!("Decoded {} base64 chars → {} bytes ({})", content.len(), bytes.len(), format);
                MaterializedOutput::Binary {
                    bytes,
                    mime_type: self.catalog.mime_type(format).to_string(),
                    filename: self.catalog.download_filename(format),
                }
            }
            Err(reason) => {
                debug!("Base64 decode failed for {}: {}", format, reason);
                MaterializedOutput::DecodeError(DecodeError { format, reason })
            }
        }
    }
}

/// Materialize with the standard catalogue and [`DecodePolicy::IgnoreWhitespace`].
pub fn materialize(content: &str, format: Format) -> MaterializedOutput {
    Materializer::default().materialize(content, format)
}

/// Standard alphabet, padding optional, trailing bits ignored.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode standard base64 under `policy`. Errors carry the decoder's message.
pub fn decode_base64(content: &str, policy: DecodePolicy) -> Result<Vec<u8>, String> {
    let result = match policy {
        DecodePolicy::Strict => STANDARD.decode(content),
        DecodePolicy::IgnoreWhitespace => {
            let compact: Vec<u8> = content
                .bytes()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            FORGIVING.decode(compact)
        }
    };
    result.map_err(|e| e.to_string())
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}
