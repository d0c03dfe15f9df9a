//! The closed set of document formats and the static tables keyed by them.
//!
//! A [`Format`] is only ever used as a lookup key: the crate never parses
//! or renders any of these formats itself. Three tables hang off it:
//!
//! | Table | Fallback |
//! |-------|----------|
//! | binary set (`ePub`, DOCX, ODT, PDF) | not binary |
//! | MIME type | `text/plain` |
//! | file extension | `.txt` |
//!
//! The tables live in a [`FormatCatalog`] value rather than in `match`
//! arms scattered over the code base, so the materializer stays pure and
//! tests can build catalogues with deliberately missing entries.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// MIME type used for any format absent from the catalogue's MIME table.
pub const FALLBACK_MIME_TYPE: &str = "text/plain";

/// File extension used for any format absent from the catalogue's extension table.
pub const FALLBACK_EXTENSION: &str = ".txt";

/// Stem of every suggested download filename.
pub const DOWNLOAD_STEM: &str = "converted-document";

/// A named document format.
///
/// Serialises as its human-readable label (e.g. `"Microsoft Word (docx)"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Format {
    // ── Common text & markup ────────────────────────────────────────────
    #[serde(rename = "Markdown")]
    Markdown,
    #[serde(rename = "CommonMark")]
    CommonMark,
    #[serde(rename = "Markdown (Strict)")]
    MarkdownStrict,
    #[serde(rename = "Markdown (PHP Extra)")]
    MarkdownPhpExtra,
    #[serde(rename = "GitHub-Flavored Markdown")]
    MarkdownGithub,
    #[serde(rename = "MultiMarkdown")]
    MarkdownMmd,
    #[serde(rename = "Plain Text")]
    PlainText,
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "XHTML")]
    Xhtml,
    #[serde(rename = "Rich Text Format (RTF)")]
    RichText,
    #[serde(rename = "LaTeX")]
    LaTeX,
    #[serde(rename = "ConTeXt")]
    ConTeXt,
    #[serde(rename = "Beamer")]
    Beamer,

    // ── Wiki & lightweight markup ───────────────────────────────────────
    #[serde(rename = "reStructuredText")]
    Rst,
    #[serde(rename = "Org Mode")]
    OrgMode,
    #[serde(rename = "AsciiDoc")]
    AsciiDoc,
    #[serde(rename = "MediaWiki")]
    MediaWiki,
    #[serde(rename = "Textile")]
    Textile,
    #[serde(rename = "Creole")]
    Creole,
    #[serde(rename = "Muse")]
    Muse,
    #[serde(rename = "Txt2Tags")]
    Txt2Tags,
    #[serde(rename = "Jira Wiki")]
    JiraWiki,

    // ── XML-based ───────────────────────────────────────────────────────
    #[serde(rename = "DocBook")]
    DocBook,
    #[serde(rename = "TEI")]
    Tei,
    #[serde(rename = "JATS")]
    Jats,
    #[serde(rename = "OPML")]
    Opml,
    #[serde(rename = "ICML")]
    Icml,

    // ── Data & serialisation ────────────────────────────────────────────
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "YAML")]
    Yaml,
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "TSV")]
    Tsv,
    #[serde(rename = "BibTeX")]
    BibTeX,
    #[serde(rename = "BibLaTeX")]
    BibLaTeX,
    #[serde(rename = "CSL JSON")]
    CslJson,
    #[serde(rename = "CSL YAML")]
    CslYaml,

    // ── Binary ──────────────────────────────────────────────────────────
    #[serde(rename = "ePub")]
    Epub,
    #[serde(rename = "Microsoft Word (docx)")]
    Docx,
    #[serde(rename = "OpenDocument Text (ODT)")]
    Odt,
    #[serde(rename = "PDF")]
    Pdf,
}

/// Every format, in declaration order.
pub const ALL_FORMATS: &[Format] = &[
    Format::Markdown,
    Format::CommonMark,
    Format::MarkdownStrict,
    Format::MarkdownPhpExtra,
    Format::MarkdownGithub,
    Format::MarkdownMmd,
    Format::PlainText,
    Format::Html,
    Format::Xhtml,
    Format::RichText,
    Format::LaTeX,
    Format::ConTeXt,
    Format::Beamer,
    Format::Rst,
    Format::OrgMode,
    Format::AsciiDoc,
    Format::MediaWiki,
    Format::Textile,
    Format::Creole,
    Format::Muse,
    Format::Txt2Tags,
    Format::JiraWiki,
    Format::DocBook,
    Format::Tei,
    Format::Jats,
    Format::Opml,
    Format::Icml,
    Format::Json,
    Format::Yaml,
    Format::Csv,
    Format::Tsv,
    Format::BibTeX,
    Format::BibLaTeX,
    Format::CslJson,
    Format::CslYaml,
    Format::Epub,
    Format::Docx,
    Format::Odt,
    Format::Pdf,
];

/// Formats accepted as conversion input, in menu order.
pub const INPUT_FORMATS: &[Format] = &[
    Format::AsciiDoc,
    Format::CommonMark,
    Format::ConTeXt,
    Format::Creole,
    Format::DocBook,
    Format::Html,
    Format::JiraWiki,
    Format::Json,
    Format::LaTeX,
    Format::Markdown,
    Format::MarkdownGithub,
    Format::MarkdownMmd,
    Format::MarkdownPhpExtra,
    Format::MarkdownStrict,
    Format::MediaWiki,
    Format::Muse,
    Format::Opml,
    Format::OrgMode,
    Format::PlainText,
    Format::RichText,
    Format::Rst,
    Format::Tei,
    Format::Textile,
    Format::Txt2Tags,
    Format::Xhtml,
];

/// Formats offered as conversion output, in menu order.
pub const OUTPUT_FORMATS: &[Format] = &[
    Format::AsciiDoc,
    Format::Beamer,
    Format::BibTeX,
    Format::BibLaTeX,
    Format::CommonMark,
    Format::ConTeXt,
    Format::Creole,
    Format::CslJson,
    Format::CslYaml,
    Format::Csv,
    Format::DocBook,
    Format::Docx,
    Format::Epub,
    Format::Html,
    Format::Icml,
    Format::Jats,
    Format::JiraWiki,
    Format::Json,
    Format::LaTeX,
    Format::Markdown,
    Format::MarkdownGithub,
    Format::MarkdownMmd,
    Format::MarkdownPhpExtra,
    Format::MarkdownStrict,
    Format::MediaWiki,
    Format::Muse,
    Format::Odt,
    Format::Opml,
    Format::OrgMode,
    Format::Pdf,
    Format::PlainText,
    Format::RichText,
    Format::Rst,
    Format::Tei,
    Format::Textile,
    Format::Tsv,
    Format::Xhtml,
    Format::Yaml,
];

/// Formats whose converted content arrives as base64-encoded bytes.
pub const BINARY_FORMATS: &[Format] = &[Format::Epub, Format::Docx, Format::Odt, Format::Pdf];

const MIME_TABLE: &[(Format, &str)] = &[
    (Format::Html, "text/html"),
    (Format::Xhtml, "application/xhtml+xml"),
    (Format::RichText, "application/rtf"),
    (Format::LaTeX, "application/x-tex"),
    (Format::ConTeXt, "application/x-tex"),
    (Format::Beamer, "application/x-tex"),
    (Format::Markdown, "text/markdown"),
    (Format::CommonMark, "text/markdown"),
    (Format::MarkdownStrict, "text/markdown"),
    (Format::MarkdownPhpExtra, "text/markdown"),
    (Format::MarkdownGithub, "text/markdown"),
    (Format::MarkdownMmd, "text/markdown"),
    (Format::PlainText, "text/plain"),
    (Format::Rst, "text/x-rst"),
    (Format::OrgMode, "text/x-org"),
    (Format::AsciiDoc, "text/asciidoc"),
    (Format::MediaWiki, "text/plain"),
    (Format::Textile, "text/x-textile"),
    (Format::Creole, "text/x-creole"),
    (Format::Muse, "text/plain"),
    (Format::Txt2Tags, "text/plain"),
    (Format::JiraWiki, "text/plain"),
    (Format::DocBook, "application/docbook+xml"),
    (Format::Tei, "application/tei+xml"),
    (Format::Jats, "application/jats+xml"),
    (Format::Opml, "text/xml"),
    (Format::Icml, "application/vnd.adobe.incopy-icml"),
    (Format::Json, "application/json"),
    (Format::Yaml, "application/x-yaml"),
    (Format::Csv, "text/csv"),
    (Format::Tsv, "text/tab-separated-values"),
    (Format::BibTeX, "application/x-bibtex"),
    (Format::BibLaTeX, "application/x-bibtex"),
    (Format::CslJson, "application/json"),
    (Format::CslYaml, "application/x-yaml"),
    (Format::Epub, "application/epub+zip"),
    (
        Format::Docx,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (Format::Odt, "application/vnd.oasis.opendocument.text"),
    (Format::Pdf, "application/pdf"),
];

const EXTENSION_TABLE: &[(Format, &str)] = &[
    (Format::Html, ".html"),
    (Format::Xhtml, ".xhtml"),
    (Format::RichText, ".rtf"),
    (Format::LaTeX, ".tex"),
    (Format::ConTeXt, ".tex"),
    (Format::Beamer, ".tex"),
    (Format::Markdown, ".md"),
    (Format::CommonMark, ".md"),
    (Format::MarkdownStrict, ".md"),
    (Format::MarkdownPhpExtra, ".md"),
    (Format::MarkdownGithub, ".md"),
    (Format::MarkdownMmd, ".md"),
    (Format::PlainText, ".txt"),
    (Format::Rst, ".rst"),
    (Format::OrgMode, ".org"),
    (Format::AsciiDoc, ".adoc"),
    (Format::MediaWiki, ".wiki"),
    (Format::Textile, ".textile"),
    (Format::Creole, ".creole"),
    (Format::Muse, ".muse"),
    (Format::Txt2Tags, ".t2t"),
    (Format::JiraWiki, ".jira"),
    (Format::DocBook, ".dbk"),
    (Format::Tei, ".xml"),
    (Format::Jats, ".xml"),
    (Format::Opml, ".opml"),
    (Format::Icml, ".icml"),
    (Format::Json, ".json"),
    (Format::Yaml, ".yaml"),
    (Format::Csv, ".csv"),
    (Format::Tsv, ".tsv"),
    (Format::BibTeX, ".bib"),
    (Format::BibLaTeX, ".bib"),
    (Format::CslJson, ".json"),
    (Format::CslYaml, ".yaml"),
    (Format::Epub, ".epub"),
    (Format::Docx, ".docx"),
    (Format::Odt, ".odt"),
    (Format::Pdf, ".pdf"),
];

/// Upload extension → detected input format.
const UPLOAD_EXTENSIONS: &[(&str, Format)] = &[
    ("md", Format::Markdown),
    ("markdown", Format::Markdown),
    ("rst", Format::Rst),
    ("html", Format::Html),
    ("htm", Format::Html),
    ("tex", Format::LaTeX),
    ("latex", Format::LaTeX),
    ("rtf", Format::RichText),
    ("txt", Format::PlainText),
    ("json", Format::Json),
    ("adoc", Format::AsciiDoc),
    ("asciidoc", Format::AsciiDoc),
    ("org", Format::OrgMode),
    ("wiki", Format::MediaWiki),
    ("textile", Format::Textile),
    ("xhtml", Format::Xhtml),
    ("dbk", Format::DocBook),
    ("docbook", Format::DocBook),
    ("tei", Format::Tei),
    ("opml", Format::Opml),
    ("jira", Format::JiraWiki),
    ("creole", Format::Creole),
    ("muse", Format::Muse),
    ("t2t", Format::Txt2Tags),
    ("ctx", Format::ConTeXt),
];

impl Format {
    /// Human-readable label shown in format menus.
    pub const fn label(self) -> &'static str {
        match self {
            Format::Markdown => "Markdown",
            Format::CommonMark => "CommonMark",
            Format::MarkdownStrict => "Markdown (Strict)",
            Format::MarkdownPhpExtra => "Markdown (PHP Extra)",
            Format::MarkdownGithub => "GitHub-Flavored Markdown",
            Format::MarkdownMmd => "MultiMarkdown",
            Format::PlainText => "Plain Text",
            Format::Html => "HTML",
            Format::Xhtml => "XHTML",
            Format::RichText => "Rich Text Format (RTF)",
            Format::LaTeX => "LaTeX",
            Format::ConTeXt => "ConTeXt",
            Format::Beamer => "Beamer",
            Format::Rst => "reStructuredText",
            Format::OrgMode => "Org Mode",
            Format::AsciiDoc => "AsciiDoc",
            Format::MediaWiki => "MediaWiki",
            Format::Textile => "Textile",
            Format::Creole => "Creole",
            Format::Muse => "Muse",
            Format::Txt2Tags => "Txt2Tags",
            Format::JiraWiki => "Jira Wiki",
            Format::DocBook => "DocBook",
            Format::Tei => "TEI",
            Format::Jats => "JATS",
            Format::Opml => "OPML",
            Format::Icml => "ICML",
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Csv => "CSV",
            Format::Tsv => "TSV",
            Format::BibTeX => "BibTeX",
            Format::BibLaTeX => "BibLaTeX",
            Format::CslJson => "CSL JSON",
            Format::CslYaml => "CSL YAML",
            Format::Epub => "ePub",
            Format::Docx => "Microsoft Word (docx)",
            Format::Odt => "OpenDocument Text (ODT)",
            Format::Pdf => "PDF",
        }
    }

    /// Short command-line name, modelled on pandoc's reader/writer names.
    pub const fn slug(self) -> &'static str {
        match self {
            Format::Markdown => "markdown",
            Format::CommonMark => "commonmark",
            Format::MarkdownStrict => "markdown_strict",
            Format::MarkdownPhpExtra => "markdown_phpextra",
            Format::MarkdownGithub => "gfm",
            Format::MarkdownMmd => "markdown_mmd",
            Format::PlainText => "plain",
            Format::Html => "html",
            Format::Xhtml => "xhtml",
            Format::RichText => "rtf",
            Format::LaTeX => "latex",
            Format::ConTeXt => "context",
            Format::Beamer => "beamer",
            Format::Rst => "rst",
            Format::OrgMode => "org",
            Format::AsciiDoc => "asciidoc",
            Format::MediaWiki => "mediawiki",
            Format::Textile => "textile",
            Format::Creole => "creole",
            Format::Muse => "muse",
            Format::Txt2Tags => "t2t",
            Format::JiraWiki => "jira",
            Format::DocBook => "docbook",
            Format::Tei => "tei",
            Format::Jats => "jats",
            Format::Opml => "opml",
            Format::Icml => "icml",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::BibTeX => "bibtex",
            Format::BibLaTeX => "biblatex",
            Format::CslJson => "csljson",
            Format::CslYaml => "cslyaml",
            Format::Epub => "epub",
            Format::Docx => "docx",
            Format::Odt => "odt",
            Format::Pdf => "pdf",
        }
    }

    /// Whether the format may be selected as conversion input.
    pub fn is_input(self) -> bool {
        INPUT_FORMATS.contains(&self)
    }

    /// Whether the format may be selected as conversion output.
    pub fn is_output(self) -> bool {
        OUTPUT_FORMATS.contains(&self)
    }

    /// Whether text output in this format may be previewed as HTML.
    pub fn is_html_like(self) -> bool {
        matches!(self, Format::Html | Format::Xhtml)
    }

    /// Whether this is one of the Markdown dialects.
    pub fn is_markdown(self) -> bool {
        matches!(
            self,
            Format::Markdown
                | Format::CommonMark
                | Format::MarkdownStrict
                | Format::MarkdownPhpExtra
                | Format::MarkdownGithub
                | Format::MarkdownMmd
        )
    }

    /// Detect an input format from an uploaded file's extension.
    ///
    /// Accepts the extension with or without the leading dot, in any case.
    /// Returns `None` for unknown extensions and for extensions that map to
    /// a format that is not an input format.
    pub fn from_file_extension(ext: &str) -> Option<Format> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        UPLOAD_EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, f)| *f)
            .filter(|f| f.is_input())
    }

    /// Detect an input format from a file name (`notes.MD` → Markdown).
    pub fn from_file_name(name: &str) -> Option<Format> {
        let (_, ext) = name.rsplit_once('.')?;
        Format::from_file_extension(ext)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    /// Parse a label (`"Microsoft Word (docx)"`) or slug (`"docx"`),
    /// ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ALL_FORMATS
            .iter()
            .copied()
            .find(|f| f.label().eq_ignore_ascii_case(needle) || f.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ConvertError::UnknownFormat {
                name: needle.to_string(),
            })
    }
}

/// The `.ext` list for file pickers, in detection-table order.
pub fn accepted_upload_extensions() -> Vec<String> {
    UPLOAD_EXTENSIONS
        .iter()
        .map(|(ext, _)| format!(".{ext}"))
        .collect()
}

/// Lookup tables keyed by [`Format`], each a total function with a fallback.
///
/// [`FormatCatalog::standard`] is the shipped configuration. Custom
/// catalogues exist so callers can mark additional formats binary or
/// override a MIME type without touching the materializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCatalog {
    binary: HashSet<Format>,
    mime_types: HashMap<Format, String>,
    extensions: HashMap<Format, String>,
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl FormatCatalog {
    /// The standard tables: four binary formats, full MIME and extension maps.
    pub fn standard() -> Self {
        Self {
            binary: BINARY_FORMATS.iter().copied().collect(),
            mime_types: MIME_TABLE
                .iter()
                .map(|(f, m)| (*f, (*m).to_string()))
                .collect(),
            extensions: EXTENSION_TABLE
                .iter()
                .map(|(f, e)| (*f, (*e).to_string()))
                .collect(),
        }
    }

    /// A catalogue with no binary formats and empty tables.
    ///
    /// Every lookup falls back; useful as a starting point for tests.
    pub fn empty() -> Self {
        Self {
            binary: HashSet::new(),
            mime_types: HashMap::new(),
            extensions: HashMap::new(),
        }
    }

    /// Mark `format` as arriving base64-encoded.
    pub fn with_binary(mut self, format: Format) -> Self {
        self.binary.insert(format);
        self
    }

    /// Mark `format` as literal text.
    pub fn without_binary(mut self, format: Format) -> Self {
        self.binary.remove(&format);
        self
    }

    pub fn with_mime_type(mut self, format: Format, mime: impl Into<String>) -> Self {
        self.mime_types.insert(format, mime.into());
        self
    }

    pub fn without_mime_type(mut self, format: Format) -> Self {
        self.mime_types.remove(&format);
        self
    }

    /// `ext` should include the leading dot.
    pub fn with_extension(mut self, format: Format, ext: impl Into<String>) -> Self {
        self.extensions.insert(format, ext.into());
        self
    }

    pub fn without_extension(mut self, format: Format) -> Self {
        self.extensions.remove(&format);
        self
    }

    /// Membership in the binary set. This alone decides the decode path.
    pub fn is_binary(&self, format: Format) -> bool {
        self.binary.contains(&format)
    }

    /// MIME type for `format`, or [`FALLBACK_MIME_TYPE`].
    pub fn mime_type(&self, format: Format) -> &str {
        self.mime_types
            .get(&format)
            .map(String::as_str)
            .unwrap_or(FALLBACK_MIME_TYPE)
    }

    /// File extension (with dot) for `format`, or [`FALLBACK_EXTENSION`].
    pub fn extension(&self, format: Format) -> &str {
        self.extensions
            .get(&format)
            .map(String::as_str)
            .unwrap_or(FALLBACK_EXTENSION)
    }

    /// `"converted-document" + extension(format)`.
    pub fn download_filename(&self, format: Format) -> String {
        format!("{DOWNLOAD_STEM}{}", self.extension(format))
    }
}

/// Convenience: binary membership in the standard catalogue.
pub fn is_binary(format: Format) -> bool {
    BINARY_FORMATS.contains(&format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips_through_from_str() {
        for &f in ALL_FORMATS {
            assert_eq!(f.label().parse::<Format>().unwrap(), f, "label {}", f.label());
            assert_eq!(f.slug().parse::<Format>().unwrap(), f, "slug {}", f.slug());
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("microsoft word (DOCX)".parse::<Format>().unwrap(), Format::Docx);
        assert_eq!("  GFM ".parse::<Format>().unwrap(), Format::MarkdownGithub);
    }

    #[test]
    fn unknown_format_is_an_error() {
        let err = "WordPerfect".parse::<Format>().unwrap_err();
        assert!(err.to_string().contains("WordPerfect"), "got: {err}");
    }

    #[test]
    fn list_sizes_match_menus() {
        assert_eq!(ALL_FORMATS.len(), 39);
        assert_eq!(INPUT_FORMATS.len(), 25);
        assert_eq!(OUTPUT_FORMATS.len(), 38);
        assert!(!Format::Txt2Tags.is_output());
        assert!(!Format::Pdf.is_input());
    }

    #[test]
    fn binary_set_is_exactly_four() {
        let cat = FormatCatalog::standard();
        let binary: Vec<Format> = ALL_FORMATS.iter().copied().filter(|f| cat.is_binary(*f)).collect();
        assert_eq!(binary, vec![Format::Epub, Format::Docx, Format::Odt, Format::Pdf]);
        for f in binary {
            assert!(is_binary(f));
        }
    }

    #[test]
    fn standard_tables_cover_every_format() {
        let cat = FormatCatalog::standard();
        for &f in ALL_FORMATS {
            assert!(cat.mime_types.contains_key(&f), "no MIME for {f}");
            assert!(cat.extensions.contains_key(&f), "no extension for {f}");
        }
    }

    #[test]
    fn lookups_fall_back_when_unmapped() {
        let cat = FormatCatalog::standard()
            .without_mime_type(Format::Pdf)
            .without_extension(Format::Pdf);
        assert_eq!(cat.mime_type(Format::Pdf), "text/plain");
        assert_eq!(cat.extension(Format::Pdf), ".txt");
        assert_eq!(cat.download_filename(Format::Pdf), "converted-document.txt");
    }

    #[test]
    fn docx_download_name() {
        let cat = FormatCatalog::standard();
        assert_eq!(cat.download_filename(Format::Docx), "converted-document.docx");
        assert_eq!(
            cat.mime_type(Format::Docx),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn upload_detection() {
        assert_eq!(Format::from_file_extension("md"), Some(Format::Markdown));
        assert_eq!(Format::from_file_extension(".HTM"), Some(Format::Html));
        assert_eq!(Format::from_file_extension("ctx"), Some(Format::ConTeXt));
        assert_eq!(Format::from_file_extension("pdf"), None);
        assert_eq!(Format::from_file_name("Notes.Markdown"), Some(Format::Markdown));
        assert_eq!(Format::from_file_name("README"), None);
    }

    #[test]
    fn detected_formats_are_always_inputs() {
        for ext in accepted_upload_extensions() {
            let f = Format::from_file_extension(&ext).expect("listed extension detects");
            assert!(f.is_input(), "{ext} → {f} is not an input format");
        }
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&Format::Odt).unwrap();
        assert_eq!(json, "\"OpenDocument Text (ODT)\"");
        let back: Format = serde_json::from_str("\"GitHub-Flavored Markdown\"").unwrap();
        assert_eq!(back, Format::MarkdownGithub);
    }
}
