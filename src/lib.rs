//! # pdf2study
//!
//! Turn a PDF into a study package: an academic summary, ten multiple-choice
//! questions, the answer key, and a printable report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate the path and the %PDF header
//!  ├─ 2. Extract   text layer via pdfium (spawn_blocking)
//!  ├─ 3. Summary   LLM call over the first 30 000 characters
//!  ├─ 4. Questions LLM call over the first 20 000 characters of the summary
//!  ├─ 5. Key       parse "(correta)" markers into "<n>. <LETTER>" lines
//!  └─ 6. Write     output_<timestamp>/ with four .txt files and a PDF report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2study::{generate_study_material, StudyConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = StudyConfig::default();
//!     let output = generate_study_material("apostila.pdf", &config).await?;
//!     println!("{}", output.answer_key.join("\n"));
//!     eprintln!("tokens: {} in / {} out",
//!         output.stats.total_input_tokens,
//!         output.stats.total_output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature    | Default | Description |
//! |------------|---------|-------------|
//! | `cli`      | on      | Enables the `pdf2study` binary (clap + anyhow + tracing-subscriber) |
//! | `chromium` | on      | PDF reports through headless Chromium (chromiumoxide) |
//!
//! Without `chromium`, use [`ReportFormat::Html`]:
//! ```toml
//! pdf2study = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod study;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{StudyConfig, StudyConfigBuilder};
pub use error::StudyError;
pub use output::{Artifact, OutputBundle, RunStats, StudyOutput};
pub use pipeline::answer_key::{parse_answer_key, strip_markers, AnswerKey, AnswerKeyEntry};
pub use pipeline::export::{DocumentRenderer, HtmlRenderer, ReportFormat};
#[cfg(feature = "chromium")]
pub use pipeline::export::ChromiumRenderer;
pub use pipeline::llm::{Generation, ProviderGenerator, TextGenerator};
pub use pipeline::questions::{present_questions, render_questions_html, PresentedItem};
pub use pipeline::report::{build_report, compose_report, markdown_to_html};
pub use pipeline::tables::{transcode_tables, Alignment};
pub use pipeline::writer::write_materials;
pub use progress::{NoopProgressCallback, ProgressCallback, Stage, StudyProgressCallback};
pub use study::{generate_study_material, generate_study_material_sync, study_from_text};
