//! Prompts sent to the LLM for a conversion.
//!
//! Callers can override the system prompt via
//! [`crate::config::ConversionConfig::system_prompt`]; the user prompt
//! (which carries the document) is always built here.

use crate::format::Format;

/// Instruction appended when the target is a binary format.
///
/// `{output}` is replaced with the output format label.
pub const BINARY_OUTPUT_RULE: &str = "The output format, {output}, is a binary format. \
You must respond with ONLY the base64 encoded string of the final file. \
Do not include any other text, explanations, or markdown fences.";

/// Instruction appended when the target is a text format.
pub const TEXT_OUTPUT_RULE: &str = "It is crucial that you only return the converted text. \
Do not include any additional explanations, introductions, conversational filler, \
or markdown code block fences (e.g. ```) in your response unless it is part of the \
original content's syntax for the target format.";

/// Build the system prompt for converting `input` → `output`.
///
/// `binary` selects the base64-only instruction; pass the catalogue's
/// verdict so custom binary sets are honoured.
pub fn system_prompt(input: Format, output: Format, binary: bool) -> String {
    let rule = if binary {
        BINARY_OUTPUT_RULE.replace("{output}", output.label())
    } else {
        TEXT_OUTPUT_RULE.to_string()
    };

    format!(
        "You are an expert document format converter, designed to emulate the functionality \
of the command-line tool 'pandoc'.\n\
Your task is to convert the provided text from {input} to {output}.\n\n\
{rule}\n\n\
Your output must be pure, converted content."
    )
}

/// Build the user message carrying the document.
pub fn user_prompt(input_text: &str, input: Format, output: Format) -> String {
    format!(
        "---\n\nINPUT TEXT ({input}):\n{input_text}\n\n---\n\nCONVERTED TEXT ({output}):"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_prompt_demands_base64() {
        let p = system_prompt(Format::Markdown, Format::Pdf, true);
        assert!(p.contains("from Markdown to PDF"));
        assert!(p.contains("The output format, PDF, is a binary format"));
        assert!(p.contains("ONLY the base64 encoded string"));
        assert!(!p.contains("{output}"));
    }

    #[test]
    fn text_prompt_forbids_fences() {
        let p = system_prompt(Format::Rst, Format::Html, false);
        assert!(p.contains("from reStructuredText to HTML"));
        assert!(p.contains("only return the converted text"));
        assert!(!p.contains("base64"));
    }

    #[test]
    fn user_prompt_wraps_document() {
        let p = user_prompt("# Title", Format::Markdown, Format::LaTeX);
        assert!(p.contains("INPUT TEXT (Markdown):\n# Title\n"));
        assert!(p.trim_end().ends_with("CONVERTED TEXT (LaTeX):"));
    }
}
