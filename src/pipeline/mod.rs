//! Pipeline stages for a conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ prompts ──▶ llm ──▶ postprocess ──▶ materialize
//! (path/URL)  (text)    (LLM)    (cleanup)      (Text | Binary)
//! ```
//!
//! 1. [`input`]  — load the user-supplied path, URL, or stdin as text and
//!    detect its format from the file extension
//! 2. [`llm`]    — drive the provider call with timeout and retry/backoff;
//!    the only stage with network I/O besides URL inputs
//! 3. [`postprocess`] — deterministic cleanup of model quirks (outer code
//!    fences, `data:` prefixes)
//!
//! Prompt wording lives in [`crate::prompts`]; the final typed result is
//! produced by [`crate::materialize`].

pub mod input;
pub mod llm;
pub mod postprocess;
