//! Converter form state as an immutable value driven by discrete events.
//!
//! A front end (web, TUI, GUI) owns one [`AppState`], feeds it [`Event`]s
//! and re-renders from the returned state. Nothing is mutated in place:
//!
//! ```text
//! Idle ──ConversionStarted──▶ Converting ──ConversionSucceeded──▶ Done
//!                                  │                  (decode error)──▶ Failed
//!                                  └──ConversionFailed──────────────▶ Failed
//! ```
//!
//! A new `ConversionStarted` always supersedes the previous result and
//! error; with blank input it goes straight to `Failed`. Results that arrive while no conversion is in flight are ignored.

use crate::error::ConvertError;
use crate::format::{Format, FormatCatalog};
use crate::materialize::{DecodePolicy, MaterializedOutput, Materializer};
use crate::render::{default_view_mode, render, Rendered, ViewMode};
use std::time::Duration;

/// Example document the form starts with.
pub const DEFAULT_INPUT_TEXT: &str = r#"# Welcome to Pandoc Web!

This is a simple tool to help you convert text from one format to another. It's designed for beginners, so let's walk through an example.

The text you're reading right now is written in **Markdown**, a simple way to format text.

## How it works

1.  **Write or paste your text** in the box below.
2.  Make sure the **input format** (currently "Markdown") matches your text.
3.  **Choose the output format** you want to convert to.
4.  Click the **"Convert Document"** button.

### Here's a quick example

You can include things like lists:

*   Item 1
*   Item 2
*   Item 3

And even code blocks:

```javascript
function greet(name) {
  console.log(`Hello, ${name}!`);
}

greet('World');
```

Now, try converting this document to HTML or another format to see the magic happen!"#;

/// Messages cycled while a conversion is in flight.
pub const CONVERSION_MESSAGES: &[&str] = &[
    "Preparing your document for conversion...",
    "Establishing a secure connection to the AI engine...",
    "The AI is analyzing the input format...",
    "Translating content to the target format...",
    "Applying formatting rules and styles...",
    "Generating the final document structure...",
    "Performing quality checks on the output...",
    "Almost there, just polishing the final bits...",
];

/// How long each loading message stays up.
pub const LOADING_MESSAGE_INTERVAL: Duration = Duration::from_secs(2);

/// Notice shown after a copy attempt.
pub const COPY_SUCCESS: &str = "Copied to clipboard!";
pub const COPY_FAILURE: &str = "Failed to copy.";

/// The loading message to show `elapsed` after the conversion started.
pub fn loading_message(elapsed: Duration) -> &'static str {
    let step = (elapsed.as_millis() / LOADING_MESSAGE_INTERVAL.as_millis()) as usize;
    CONVERSION_MESSAGES[step % CONVERSION_MESSAGES.len()]
}

/// Where the conversion lifecycle is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing converted yet, or the input changed since.
    #[default]
    Idle,
    /// A request for `output_format` is in flight.
    Converting { output_format: Format },
    /// The last conversion produced a usable result for `format`.
    Done {
        format: Format,
        output: MaterializedOutput,
    },
    /// The last conversion failed; the message blocks the output pane.
    Failed { message: String },
}

/// Inputs that move the form from one state to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user typed in the input box; clears the uploaded file name.
    InputEdited(String),
    /// A file was picked and read; detection may switch the input format.
    FileLoaded { name: String, content: String },
    /// Reading the picked file failed.
    FileReadFailed,
    InputFormatChanged(Format),
    OutputFormatChanged(Format),
    ViewModeChanged(ViewMode),
    /// A request for `output_format` was sent.
    ConversionStarted { output_format: Format },
    /// The backend answered with this raw string.
    ConversionSucceeded(String),
    /// The backend failed; carries the user-facing message.
    ConversionFailed(String),
    /// A clipboard write finished.
    CopyFinished { ok: bool },
}

/// What to send to the converter when the user presses "Convert".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input_text: String,
    pub input_format: Format,
    pub output_format: Format,
}

/// The whole form.
#[derive(Debug, Clone)]
pub struct AppState {
    pub input_text: String,
    pub input_format: Format,
    pub output_format: Format,
    pub uploaded_file_name: Option<String>,
    pub phase: Phase,
    pub view_mode: ViewMode,
    pub copy_notice: Option<&'static str>,
    materializer: Materializer,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Materializer::default())
    }
}

impl AppState {
    /// Initial form: example Markdown, Markdown → HTML.
    pub fn new(materializer: Materializer) -> Self {
        Self {
            input_text: DEFAULT_INPUT_TEXT.to_string(),
            input_format: Format::Markdown,
            output_format: Format::Html,
            uploaded_file_name: None,
            phase: Phase::Idle,
            view_mode: ViewMode::Preview,
            copy_notice: None,
            materializer,
        }
    }

    /// Initial form using `catalog` and `policy` for materialization.
    pub fn with_catalog(catalog: FormatCatalog, policy: DecodePolicy) -> Self {
        Self::new(Materializer::new(catalog, policy))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Converting { .. })
    }

    /// The blocking error message, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// The current result and the format it was produced for.
    pub fn result(&self) -> Option<(&MaterializedOutput, Format)> {
        match &self.phase {
            Phase::Done { format, output } => Some((output, *format)),
            _ => None,
        }
    }

    /// What the output pane shows right now, if anything.
    pub fn rendered(&self) -> Option<Rendered<'_>> {
        self.result()
            .map(|(output, format)| render(output, format, self.view_mode))
    }

    /// Copy is offered only for a finished text result.
    pub fn can_copy(&self) -> bool {
        self.result()
            .and_then(|(output, _)| output.copyable_text())
            .is_some_and(|t| !t.is_empty())
    }

    /// Download is offered for any finished, non-empty result.
    pub fn can_download(&self) -> bool {
        self.result().is_some_and(|(output, _)| !output.is_empty())
    }

    /// Validate the form and build the request for the converter.
    ///
    /// Empty or whitespace-only input is rejected before any call is made.
    pub fn conversion_request(&self) -> Result<ConversionRequest, ConvertError> {
        if self.input_text.trim().is_empty() {
            return Err(ConvertError::EmptyInput);
        }
        Ok(ConversionRequest {
            input_text: self.input_text.clone(),
            input_format: self.input_format,
            output_format: self.output_format,
        })
    }

    /// Apply one event, returning the next state.
    pub fn reduce(self, event: Event) -> Self {
        match event {
            Event::InputEdited(text) => Self {
                input_text: text,
                uploaded_file_name: None,
                ..self
            },
            Event::FileLoaded { name, content } => {
                let input_format = Format::from_file_name(&name).unwrap_or(self.input_format);
                Self {
                    input_text: content,
                    input_format,
                    uploaded_file_name: Some(name),
                    ..self
                }
            }
            Event::FileReadFailed => Self {
                uploaded_file_name: None,
                phase: Phase::Failed {
                    message: "Failed to read the selected file.".to_string(),
                },
                ..self
            },
            Event::InputFormatChanged(format) => Self {
                input_format: format,
                ..self
            },
            // A finished result keeps the format it was produced for.
            Event::OutputFormatChanged(format) => Self {
                output_format: format,
                ..self
            },
            Event::ViewModeChanged(mode) => Self {
                view_mode: mode,
                ..self
            },
            // Blank input never starts a request; the form shows the error.
            Event::ConversionStarted { .. } if self.input_text.trim().is_empty() => Self {
                phase: Phase::Failed {
                    message: ConvertError::EmptyInput.to_string(),
                },
                copy_notice: None,
                ..self
            },
            Event::ConversionStarted { output_format } => Self {
                phase: Phase::Converting { output_format },
                copy_notice: None,
                ..self
            },
            Event::ConversionSucceeded(raw) => match self.phase {
                Phase::Converting { output_format } => {
                    let output = self.materializer.materialize(&raw, output_format);
                    let phase = match output {
                        MaterializedOutput::DecodeError(e) => Phase::Failed {
                            message: e.to_string(),
                        },
                        output => Phase::Done {
                            format: output_format,
                            output,
                        },
                    };
                    Self {
                        phase,
                        view_mode: default_view_mode(output_format),
                        ..self
                    }
                }
                _ => self,
            },
            Event::ConversionFailed(message) => match self.phase {
                Phase::Converting { .. } => Self {
                    phase: Phase::Failed { message },
                    ..self
                },
                _ => self,
            },
            Event::CopyFinished { ok } => Self {
                copy_notice: Some(if ok { COPY_SUCCESS } else { COPY_FAILURE }),
                ..self
            },
        }
    }
}
