//! Input resolution: turn a user-supplied path, URL, or `-` into text.
//!
//! The loaded document keeps its file name so the input format can be
//! detected from the extension (`notes.md` → Markdown), the same way an
//! upload form pre-selects the format of a picked file. Detection only
//! ever yields formats that are valid conversion inputs.

use crate::error::ConvertError;
use crate::format::Format;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Input argument meaning "read standard input".
pub const STDIN_MARKER: &str = "-";

/// A document loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedInput {
    /// Full document text.
    pub text: String,
    /// File name (last path or URL segment), `None` for stdin.
    pub file_name: Option<String>,
    /// Input format detected from `file_name`.
    pub detected_format: Option<Format>,
}

impl LoadedInput {
    /// Wrap text that came from somewhere other than a file.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file_name: None,
            detected_format: None,
        }
    }

    /// Wrap file contents, detecting the format from `file_name`.
    pub fn from_file(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let detected_format = Format::from_file_name(&file_name);
        Self {
            text: text.into(),
            file_name: Some(file_name),
            detected_format,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load the input: stdin for `-`, a download for URLs, otherwise a local file.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<LoadedInput, ConvertError> {
    if input == STDIN_MARKER {
        read_stdin().await
    } else if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(Path::new(input)).await
    }
}

/// Whether the text is empty once whitespace is ignored.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

async fn read_stdin() -> Result<LoadedInput, ConvertError> {
    let mut buf = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut buf)
        .await
        .map_err(|e| ConvertError::FileReadFailed {
            input: STDIN_MARKER.to_string(),
            source: e,
        })?;
    let text = String::from_utf8(buf).map_err(|_| ConvertError::InputNotText {
        input: "<stdin>".to_string(),
    })?;
    debug!("Read {} bytes from stdin", text.len());
    Ok(LoadedInput::from_text(text))
}

async fn read_local(path: &Path) -> Result<LoadedInput, ConvertError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConvertError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConvertError::FileReadFailed {
            input: path.display().to_string(),
            source: e,
        },
    })?;

    let text = String::from_utf8(bytes).map_err(|_| ConvertError::InputNotText {
        input: path.display().to_string(),
    })?;

    let name = file_name_of(path);
    debug!("Resolved local input: {} ({} bytes)", path.display(), text.len());
    Ok(match name {
        Some(n) => LoadedInput::from_file(n, text),
        None => LoadedInput::from_text(text),
    })
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Download a URL as text.
async fn download_url(url: &str, timeout_secs: u64) -> Result<LoadedInput, ConvertError> {
    info!("Downloading input from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ConvertError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ConvertError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ConvertError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ConvertError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ConvertError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let text = String::from_utf8(bytes.to_vec()).map_err(|_| ConvertError::InputNotText {
        input: url.to_string(),
    })?;

    info!("Downloaded {} bytes", text.len());

    Ok(match extract_filename(url) {
        Some(name) => LoadedInput::from_file(name, text),
        None => LoadedInput::from_text(text),
    })
}

/// Last non-empty URL path segment containing a dot, if any.
fn extract_filename(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if !last.is_empty() && last.contains('.') {
        Some(last.to_string())
    } else {
        None
    }
}

/// How an input argument is shown in logs and messages.
pub fn display_name(input: &str) -> &str {
    if input == STDIN_MARKER {
        "<stdin>"
    } else {
        input
    }
}
