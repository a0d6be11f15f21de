//! CLI binary for pdf2study.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `StudyConfig`, drives the stage spinner and prints the final report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2study::{
    generate_study_material, ProgressCallback, ReportFormat, Stage, StudyConfig, StudyError,
    StudyOutput, StudyProgressCallback,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Answer-key lines shown in the final preview.
const PREVIEW_LINES: usize = 5;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── Progress callbacks ───────────────────────────────────────────────────────

/// Spinner that shows the running stage and logs one line per finished stage.
struct SpinnerProgress {
    bar: ProgressBar,
    started: Mutex<Option<Instant>>,
}

impl SpinnerProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self {
            bar,
            started: Mutex::new(None),
        })
    }

    fn elapsed(&self) -> String {
        let secs = self
            .started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        format!("{secs:.1}s")
    }
}

impl StudyProgressCallback for SpinnerProgress {
    fn on_stage_start(&self, stage: Stage) {
        if let Ok(mut s) = self.started.lock() {
            *s = Some(Instant::now());
        }
        self.bar.reset_elapsed();
        self.bar.set_message(stage.banner());
    }

    fn on_stage_complete(&self, stage: Stage, detail: &str) {
        self.bar.println(format!(
            "{}  {}  {}",
            stage.banner(),
            dim(detail),
            dim(&self.elapsed())
        ));
        if stage == Stage::Write {
            self.bar.finish_and_clear();
        }
    }

    fn on_stage_error(&self, stage: Stage, _error: &str) {
        self.bar
            .println(format!("{}  {}", stage.banner(), red("falhou")));
        self.bar.finish_and_clear();
    }
}

/// Plain banners, one per stage, for terminals without a spinner.
struct PlainProgress;

impl StudyProgressCallback for PlainProgress {
    fn on_stage_start(&self, stage: Stage) {
        println!("{}", stage.banner());
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive: asks for the PDF path
  pdf2study

  # Direct
  pdf2study apostila.pdf

  # HTML report instead of PDF (no Chromium needed)
  pdf2study --format html apostila.pdf

  # Another provider and model
  pdf2study --provider openai --model gpt-4.1-mini apostila.pdf

  # Machine-readable result
  pdf2study --json apostila.pdf > result.json

OUTPUT:
  output_<YYYYMMDD_HHMMSS>/
    <base>_resumo.txt     summary
    <base>_questoes.txt   questions without answers
    <base>_gabarito.txt   answer key, one "<n>. <LETTER>" per line
    <base>_completo.txt   everything, answers included
    <base>.pdf            printable report (or .html)

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium
  CHROME_PATH             Chromium/Chrome executable for PDF reports

  A .env file in the working directory is loaded at startup.
"#;

/// Generate a study package (summary, questions, answer key, report) from a PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2study",
    version,
    about = "Generate summary, multiple-choice questions and answer key from a PDF",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path. Prompted for when omitted.
    input: Option<String>,

    /// LLM model ID (default: gemini-2.0-flash).
    #[arg(long, env = "PDF2STUDY_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(long, env = "PDF2STUDY_PROVIDER")]
    provider: Option<String>,

    /// Directory in which output_<timestamp>/ is created.
    #[arg(short, long, env = "PDF2STUDY_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Report format.
    #[arg(long, env = "PDF2STUDY_FORMAT", value_enum, default_value = "pdf")]
    format: FormatArg,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2STUDY_PASSWORD")]
    password: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDF2STUDY_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max LLM output tokens per call.
    #[arg(long, env = "PDF2STUDY_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// Per-call LLM timeout in seconds.
    #[arg(long, env = "PDF2STUDY_API_TIMEOUT", default_value_t = 180)]
    api_timeout: u64,

    /// Print the result as JSON instead of the human summary.
    #[arg(long, env = "PDF2STUDY_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDF2STUDY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2STUDY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2STUDY_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Pdf,
    Html,
}

impl From<FormatArg> for ReportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Pdf => ReportFormat::Pdf,
            FormatArg::Html => ReportFormat::Html,
        }
    }
}

#[tokio::main]
async fn main() {
    // Missing .env is normal.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs would fight with the spinner; keep them for
    // --no-progress and --verbose runs.
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

    if !cli.quiet && !cli.json {
        println!("=== Gerador de Material de Estudo ===");
        println!("(Ctrl+C para cancelar a qualquer momento)\n");
    }

    let outcome = tokio::select! {
        res = run(&cli, show_progress) => res,
        _ = tokio::signal::ctrl_c() => Err(StudyError::Interrupted.into()),
    };

    if let Err(e) = outcome {
        let interrupted = e
            .downcast_ref::<StudyError>()
            .is_some_and(StudyError::is_interrupt);
        if interrupted {
            println!("\nOperação cancelada.");
            std::process::exit(130);
        }
        eprintln!("\n{} {:#}", red("❌ Erro:"), e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    let input = match cli.input {
        Some(ref i) => i.clone(),
        None => prompt_for_path().await?,
    };

    let progress: Option<ProgressCallback> = if show_progress {
        Some(SpinnerProgress::new() as ProgressCallback)
    } else if !cli.quiet && !cli.json {
        Some(Arc::new(PlainProgress) as ProgressCallback)
    } else {
        None
    };
    let config = build_config(cli, progress)?;

    let output = generate_study_material(&input, &config).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        print_report(&output);
    }
    Ok(())
}

/// Ask for the PDF path on stdin.
async fn prompt_for_path() -> Result<String> {
    tokio::task::spawn_blocking(|| -> Result<String> {
        print!("Digite o caminho para o arquivo PDF: ");
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read the PDF path")?;
        println!();
        Ok(line.trim().to_string())
    })
    .await
    .context("Prompt task failed")?
}

/// Map CLI args to `StudyConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<StudyConfig> {
    let mut builder = StudyConfig::builder()
        .output_root(&cli.output_dir)
        .report_format(cli.format.into())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_report(output: &StudyOutput) {
    println!(
        "\n{} Material salvo na pasta: {}/",
        green("✅"),
        output.bundle.dir.display()
    );
    println!("- Resumo: {} palavras", output.stats.summary_words);
    println!("- Questões: {} com gabarito", output.answer_key.len());
    println!(
        "{}",
        dim(&format!(
            "  {} tokens in  /  {} tokens out  —  {}ms total",
            output.stats.total_input_tokens,
            output.stats.total_output_tokens,
            output.stats.total_duration_ms
        ))
    );

    println!("\n🔍 Prévia do gabarito:");
    println!("{}", answer_key_preview(&output.answer_key.lines()));
}

/// First lines of the key, with `...` when more remain.
fn answer_key_preview(lines: &[String]) -> String {
    let mut preview = lines
        .iter()
        .take(PREVIEW_LINES)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    if lines.len() > PREVIEW_LINES {
        preview.push_str("\n...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{i}. A")).collect()
    }

    #[test]
    fn preview_of_short_key_has_no_ellipsis() {
        assert_eq!(answer_key_preview(&lines(3)), "1. A\n2. A\n3. A");
        assert_eq!(answer_key_preview(&lines(5)).lines().count(), 5);
        assert_eq!(answer_key_preview(&[]), "");
    }

    #[test]
    fn preview_of_long_key_is_cut_at_five() {
        let p = answer_key_preview(&lines(10));
        assert!(p.ends_with("5. A\n..."));
        assert!(!p.contains("6. A"));
    }

    #[test]
    fn cli_maps_to_config() {
        let cli = Cli::parse_from([
            "pdf2study",
            "--format",
            "html",
            "--provider",
            "openai",
            "--api-timeout",
            "30",
            "doc.pdf",
        ]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.report_format, ReportFormat::Html);
        assert_eq!(config.provider_name.as_deref(), Some("openai"));
        assert_eq!(config.api_timeout_secs, 30);
        assert_eq!(cli.input.as_deref(), Some("doc.pdf"));
    }
}
