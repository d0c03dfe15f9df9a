//! Post-processing: deterministic cleanup of the raw LLM response.
//!
//! Even when told not to, models occasionally wrap the whole answer in a
//! ```` ```html ... ``` ```` fence or prefix base64 with a `data:` URI.
//! These rules undo such wrappers without touching the content inside.
//!
//! Rules (applied in order):
//! 1. Trim surrounding whitespace (always)
//! 2. Strip one outer code fence that wraps the entire response
//! 3. Binary targets only: strip a leading `data:<mime>;base64,` prefix
//!
//! Rule 2 is conservative for text targets: the fence is removed only when
//! its info string is empty or names the target format, so a Markdown
//! document that legitimately *is* a single code block survives.

use crate::format::{Format, FormatCatalog};
use once_cell::sync::Lazy;
use regex::Regex;

/// Clean a raw response for `format`.
///
/// Binary handling and extension tags follow `catalog`. With
/// `strip_wrappers` off only rule 1 runs.
pub fn clean_response(
    raw: &str,
    format: Format,
    catalog: &FormatCatalog,
    strip_wrappers: bool,
) -> String {
    let s = raw.trim();
    if !strip_wrappers {
        return s.to_string();
    }
    let binary = catalog.is_binary(format);
    let s = strip_outer_fence(s, format, catalog, binary);
    let s = if binary { strip_data_uri(&s) } else { s };
    s.trim().to_string()
}

// ── Rule 2: Strip outer code fence ───────────────────────────────────────────

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```([A-Za-z0-9_+.-]*)[ \t]*\r?\n(.*?)\r?\n?```$").unwrap());

fn strip_outer_fence(input: &str, format: Format, catalog: &FormatCatalog, binary: bool) -> String {
    let Some(caps) = RE_OUTER_FENCE.captures(input) else {
        return input.to_string();
    };
    let tag = caps[1].to_ascii_lowercase();
    let body = &caps[2];

    // A fence inside the body means the outer ``` pair is not one block.
    if body.contains("\n```") {
        return input.to_string();
    }

    if binary || is_wrapper_tag(&tag, format, catalog) {
        body.to_string()
    } else {
        input.to_string()
    }
}

/// Whether a fence info string is just the model labelling the target format.
fn is_wrapper_tag(tag: &str, format: Format, catalog: &FormatCatalog) -> bool {
    if tag.is_empty() || tag == format.slug() {
        return true;
    }
    if tag == catalog.extension(format).trim_start_matches('.') {
        return true;
    }
    match tag {
        "markdown" | "md" => format.is_markdown(),
        "html" => format.is_html_like(),
        "xml" => matches!(
            format,
            Format::Xhtml | Format::DocBook | Format::Tei | Format::Jats | Format::Opml | Format::Icml
        ),
        "tex" | "latex" => matches!(format, Format::LaTeX | Format::ConTeXt | Format::Beamer),
        "json" => matches!(format, Format::Json | Format::CslJson),
        "yaml" | "yml" => matches!(format, Format::Yaml | Format::CslYaml),
        "bib" => matches!(format, Format::BibTeX | Format::BibLaTeX),
        "text" | "txt" | "plain" => format == Format::PlainText,
        _ => false,
    }
}

// ── Rule 3: Strip data-URI prefix ────────────────────────────────────────────

static RE_DATA_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:[A-Za-z0-9.+/-]*;base64,").unwrap());

fn strip_data_uri(input: &str) -> String {
    RE_DATA_URI.replace(input, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn std_catalog() -> FormatCatalog {
        FormatCatalog::standard()
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(clean_response("\n  <p>Hi</p> \n", Format::Html, &std_catalog(), true), "<p>Hi</p>");
    }

    #[test]
    fn strips_labelled_fence_for_text() {
        let raw = "```html\n<h1>Title</h1>\n<p>Body</p>\n```";
        assert_eq!(
            clean_response(raw, Format::Html, &std_catalog(), true),
            "<h1>Title</h1>\n<p>Body</p>"
        );
    }

    #[test]
    fn strips_bare_fence() {
        let raw = "```\n= Title\n```";
        assert_eq!(clean_response(raw, Format::AsciiDoc, &std_catalog(), true), "= Title");
    }

    #[test]
    fn keeps_foreign_fence_for_text() {
        // A Markdown document consisting of one Python block is content.
        let raw = "```python\nprint('hi')\n```";
        assert_eq!(clean_response(raw, Format::Markdown, &std_catalog(), true), raw);
    }

    #[test]
    fn keeps_multiple_blocks() {
        let raw = "```\na\n```\n\ntext\n\n```\nb\n```";
        assert_eq!(clean_response(raw, Format::Markdown, &std_catalog(), true), raw);
    }

    #[test]
    fn binary_strips_any_fence_and_data_uri() {
        let raw = "```base64\ndata:application/pdf;base64,SGVsbG8=\n```";
        assert_eq!(clean_response(raw, Format::Pdf, &std_catalog(), true), "SGVsbG8=");
    }

    #[test]
    fn wrappers_kept_when_disabled() {
        let raw = "  ```html\n<p/>\n```  ";
        assert_eq!(clean_response(raw, Format::Html, &std_catalog(), false), "```html\n<p/>\n```");
    }

    #[test]
    fn extension_tag_counts_as_wrapper() {
        let raw = "```rst\nTitle\n=====\n```";
        assert_eq!(clean_response(raw, Format::Rst, &std_catalog(), true), "Title\n=====");
    }

    #[test]
    fn follows_custom_catalogue() {
        // Custom extension becomes a recognised wrapper tag.
        let cat = FormatCatalog::standard().with_extension(Format::Textile, ".tx");
        let raw = "```tx
h1. Title
```";
        assert_eq!(clean_response(raw, Format::Textile, &cat, true), "h1. Title");
        assert_eq!(clean_response(raw, Format::Textile, &std_catalog(), true), raw);

        // A format removed from the binary set keeps its data: prefix.
        let cat = FormatCatalog::standard().without_binary(Format::Pdf);
        let raw = "data:application/pdf;base64,SGVsbG8=";
        assert_eq!(clean_response(raw, Format::Pdf, &cat, true), raw);
    }
}
