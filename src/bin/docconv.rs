//! CLI binary for llm-docconv.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints or saves results.

use anyhow::{Context, Result};
use clap::Parser;
use llm_docconv::state::loading_message;
use llm_docconv::{
    convert, is_binary, render, save_output, ConversionConfig, ConversionProgressCallback, DecodePolicy,
    Format, ProgressCallback, ViewMode, INPUT_FORMATS, OUTPUT_FORMATS,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that cycles the "conversion in progress" messages
/// while the LLM call is in flight.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, input: Format, output: Format, input_len: usize) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {input} → {output} ({input_len} chars)…"))
        ));
        self.bar.set_prefix("Converting");
        self.bar.set_message(loading_message(Duration::ZERO));
        self.bar.enable_steady_tick(Duration::from_millis(80));

        // Rotate the message until the bar is finished.
        let bar = self.bar.clone();
        let started = Instant::now();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(250));
            while !bar.is_finished() {
                ticker.tick().await;
                bar.set_message(loading_message(started.elapsed()));
            }
        });
    }

    fn on_attempt(&self, attempt: u32, max_attempts: u32) {
        if attempt > 1 {
            self.bar.println(format!(
                "  {} retrying ({attempt}/{max_attempts})",
                cyan("↻")
            ));
        }
    }

    fn on_conversion_complete(&self, output_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} converted  {}",
            green("✔"),
            dim(&format!("{output_len} chars"))
        );
    }

    fn on_conversion_error(&self, error: &str) {
        self.bar.finish_and_clear();
        let msg = error.lines().next().unwrap_or(error);
        eprintln!("{} {}", red("✘"), red(msg));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Markdown to HTML (stdout)
  docconv README.md --to html

  # Input format from a flag, text from stdin
  cat notes.txt | docconv --from plain --to rst

  # Binary formats must be written to a file
  docconv report.md --to docx -o report.docx

  # Save into a directory as converted-document.<ext>
  docconv paper.tex --to epub -o out/

  # Convert from URL with a specific model
  docconv https://example.com/guide.rst --to markdown --provider openai --model gpt-4.1-mini

  # Structured JSON (formats, result, token stats)
  docconv README.md --to latex --json > result.json

  # List every supported format
  docconv --list-formats

FORMATS:
  Accepts the display label ("GitHub-Flavored Markdown") or a short name
  ("gfm", "html", "docx", "rst", "latex", ...), case-insensitive.
  Binary outputs (ePub, DOCX, ODT, PDF) are produced as base64 by the model
  and decoded before saving.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred, default model gemini-2.5-flash)
  GOOGLE_API_KEY          Alternative name for the Gemini key
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
  RUST_LOG                Log filter (e.g. llm_docconv=debug)

SETUP:
  1. Set API key:     export GEMINI_API_KEY=...
  2. Convert:         docconv document.md --to html -o document.html
"#;

/// Convert documents between formats using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "docconv",
    version,
    about = "Convert documents between formats using LLMs",
    long_about = "Convert documents between ~40 markup, data and office formats by asking an LLM \
to act like pandoc. Supports Google Gemini, OpenAI, Anthropic, and any OpenAI-compatible \
endpoint (Ollama, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local file path, HTTP/HTTPS URL, or `-` for stdin.
    #[arg(default_value = "-")]
    input: String,

    /// Input format. Detected from the file extension when omitted.
    #[arg(short, long, env = "DOCCONV_FROM")]
    from: Option<Format>,

    /// Output format.
    #[arg(short, long, env = "DOCCONV_TO", required_unless_present = "list_formats")]
    to: Option<Format>,

    /// Write the result to this file (or directory) instead of stdout.
    #[arg(short, long, env = "DOCCONV_OUTPUT")]
    output: Option<PathBuf>,

    /// How text is printed: raw source, or preview (HTML fragment).
    #[arg(long, env = "DOCCONV_VIEW", value_enum, default_value = "raw")]
    view: ViewArg,

    /// Output structured JSON (ConversionOutput) instead of the document.
    #[arg(long, env = "DOCCONV_JSON")]
    json: bool,

    /// Print the supported input and output formats and exit.
    #[arg(long)]
    list_formats: bool,

    /// LLM model ID (e.g. gemini-2.5-flash, gpt-4.1-mini).
    #[arg(long, env = "DOCCONV_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(
        long,
        env = "DOCCONV_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: gemini, openai, anthropic, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "DOCCONV_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "DOCCONV_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// Retries on LLM failure (0–10).
    #[arg(long, env = "DOCCONV_MAX_RETRIES", default_value_t = 2,
          value_parser = clap::value_parser!(u32).range(0..=10))]
    max_retries: u32,

    /// LLM call timeout in seconds.
    #[arg(long, env = "DOCCONV_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// HTTP download timeout in seconds (URL inputs).
    #[arg(long, env = "DOCCONV_DOWNLOAD_TIMEOUT", default_value_t = 60)]
    download_timeout: u64,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "DOCCONV_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Keep the model's response as-is apart from trimming.
    #[arg(long, env = "DOCCONV_NO_CLEAN")]
    no_clean: bool,

    /// Reject base64 containing whitespace or line breaks.
    #[arg(long, env = "DOCCONV_STRICT_BASE64")]
    strict_base64: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "DOCCONV_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCCONV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCCONV_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ViewArg {
    Raw,
    Preview,
}

impl From<ViewArg> for ViewMode {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Raw => ViewMode::Raw,
            ViewArg::Preview => ViewMode::Preview,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner replaces INFO-level library logs unless -v is given.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.list_formats {
        print_formats();
        return Ok(());
    }

    let output_format = cli
        .to
        .context("--to is required unless --list-formats is given")?;

    // Refuse before spending tokens on a file that could not be shown.
    if is_binary(output_format) && cli.output.is_none() && !cli.json {
        anyhow::bail!(
            "{} is a binary format; use -o <PATH> to save it (or --json)",
            output_format
        );
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;

    // ── Run conversion ───────────────────────────────────────────────────
    let result = convert(&cli.input, cli.from, output_format, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    let result = result.into_result().context("Conversion failed")?;

    if let Some(ref dest) = cli.output {
        let path = save_output(&result.output, output_format, &config.catalog, dest)
            .await
            .context("Failed to save output")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} → {}  {}ms  →  {}",
                green("✔"),
                result.input_format,
                result.output_format,
                result.stats.total_duration_ms,
                bold(&path.display().to_string()),
            );
            eprintln!(
                "   {} tokens in  /  {} tokens out",
                dim(&result.stats.input_tokens.to_string()),
                dim(&result.stats.output_tokens.to_string()),
            );
        }
        return Ok(());
    }

    let text = render(&result.output, output_format, cli.view.into()).to_html_fragment();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    // Ensure a trailing newline on stdout.
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }

    if !cli.quiet {
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            dim(&result.stats.input_tokens.to_string()),
            dim(&result.stats.output_tokens.to_string()),
            result.stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .max_retries(cli.max_retries)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout)
        .clean_output(!cli.no_clean)
        .decode_policy(if cli.strict_base64 {
            DecodePolicy::Strict
        } else {
            DecodePolicy::IgnoreWhitespace
        });

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_formats() {
    println!("{}", bold("Input formats:"));
    for f in INPUT_FORMATS {
        println!("  {:<12} {}", f.slug(), f.label());
    }
    println!();
    println!("{}", bold("Output formats:"));
    for f in OUTPUT_FORMATS {
        let tag = if is_binary(*f) {
            dim(" (binary)")
        } else {
            String::new()
        };
        println!("  {:<12} {}{}", f.slug(), f.label(), tag);
    }
}
