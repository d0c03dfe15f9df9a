//! Presentation of a materialized result: preview, raw view, copy.
//!
//! HTML is only ever emitted as-is when the result is text *and* the
//! format is HTML-like *and* the preview view is selected. Everything else
//! is shown as literal preformatted text, and binary results get a
//! "ready to download" notice instead of a preview.

use crate::format::Format;
use crate::materialize::MaterializedOutput;
use html_escape::encode_text;
use serde::{Deserialize, Serialize};

/// Which tab of the output pane is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Rendered HTML for HTML-like formats.
    #[default]
    Preview,
    /// Source text.
    Raw,
}

/// The view selected after a conversion into `format` completes.
pub fn default_view_mode(format: Format) -> ViewMode {
    if format.is_html_like() {
        ViewMode::Preview
    } else {
        ViewMode::Raw
    }
}

/// What the output pane shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<'a> {
    /// Trusted HTML to inject into the page.
    Html(&'a str),
    /// Text shown verbatim in a monospace block.
    Preformatted(&'a str),
    /// A file is ready; no preview is available.
    BinaryReady {
        format: Format,
        filename: &'a str,
        size: usize,
    },
    /// Nothing can be shown or saved.
    Blocked { reason: String },
}

impl Rendered<'_> {
    /// An HTML fragment for embedding, escaping everything that is not
    /// previewed HTML.
    pub fn to_html_fragment(&self) -> String {
        match self {
            Rendered::Html(html) => (*html).to_string(),
            Rendered::Preformatted(text) => format!("<pre>{}</pre>", encode_text(text)),
            Rendered::BinaryReady { format, filename, size } => format!(
                "<div class=\"binary-ready\"><h3>Binary File Generated</h3>\
                 <p>Your {} file is ready to be downloaded as {} ({} bytes).</p>\
                 <p>A preview is not available for this format.</p></div>",
                encode_text(format.label()),
                encode_text(filename),
                size
            ),
            Rendered::Blocked { reason } => format!(
                "<div class=\"error\" role=\"alert\"><p>Error</p><p>{}</p></div>",
                encode_text(reason)
            ),
        }
    }

    /// Whether the output pane offers tab switching (preview ↔ raw).
    pub fn has_tabs(&self, format: Format) -> bool {
        matches!(self, Rendered::Html(_) | Rendered::Preformatted(_)) && format.is_html_like()
    }
}

/// Decide how `output`, produced for `format`, is displayed in `mode`.
pub fn render(output: &MaterializedOutput, format: Format, mode: ViewMode) -> Rendered<'_> {
    match output {
        MaterializedOutput::Text { content } => {
            if mode == ViewMode::Preview && format.is_html_like() {
                Rendered::Html(content)
            } else {
                Rendered::Preformatted(content)
            }
        }
        MaterializedOutput::Binary { bytes, filename, .. } => Rendered::BinaryReady {
            format,
            filename,
            size: bytes.len(),
        },
        MaterializedOutput::DecodeError(e) => Rendered::Blocked {
            reason: e.to_string(),
        },
    }
}
