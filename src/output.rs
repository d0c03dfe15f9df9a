//! Result types returned by the `convert*` functions.

use crate::error::ConvertError;
use crate::format::Format;
use crate::materialize::MaterializedOutput;
use serde::Serialize;

/// Everything a conversion produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutput {
    pub input_format: Format,
    pub output_format: Format,
    /// The cleaned LLM response, before materialization.
    pub raw: String,
    /// The typed result. May be a decode failure; see [`Self::into_result`].
    pub output: MaterializedOutput,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Treat a decode failure as an error.
    ///
    /// Use this when a conversion that produced no usable file should abort
    /// rather than be presented as a blocking message.
    pub fn into_result(self) -> Result<Self, ConvertError> {
        match self.output {
            MaterializedOutput::DecodeError(e) => Err(ConvertError::Decode(e)),
            _ => Ok(self),
        }
    }
}

/// Token and timing figures for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub input_chars: usize,
    pub output_bytes: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Failed attempts before the successful one.
    pub retries: u32,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::materialize;

    fn output_for(raw: &str, format: Format) -> ConversionOutput {
        ConversionOutput {
            input_format: Format::Markdown,
            output_format: format,
            raw: raw.to_string(),
            output: materialize(raw, format),
            stats: ConversionStats::default(),
        }
    }

    #[test]
    fn into_result_passes_text_and_binary() {
        assert!(output_for("# hi", Format::Rst).into_result().is_ok());
        assert!(output_for("SGVsbG8=", Format::Pdf).into_result().is_ok());
    }

    #[test]
    fn into_result_rejects_decode_failure() {
        let err = output_for("not-base64!!", Format::Pdf).into_result().unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
    }

    #[test]
    fn serialises_to_json() {
        let json = serde_json::to_value(output_for("<p>Hi</p>", Format::Html)).unwrap();
        assert_eq!(json["output_format"], "HTML");
        assert_eq!(json["output"]["kind"], "text");
        assert_eq!(json["output"]["content"], "<p>Hi</p>");
    }
}
