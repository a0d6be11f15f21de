//! Progress-callback trait for stage-level events of a study run.
//!
//! Inject an [`Arc<dyn StudyProgressCallback>`] via
//! [`crate::config::StudyConfigBuilder::progress_callback`] to be told when
//! each stage starts and finishes. The CLI drives its spinner from these
//! events; library users can forward them anywhere.
//!
//! # Example
//!
//! ```rust
//! use pdf2study::{Stage, StudyConfig, StudyProgressCallback};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl StudyProgressCallback for Printer {
//!     fn on_stage_complete(&self, stage: Stage, detail: &str) {
//!         eprintln!("{} done: {}", stage, detail);
//!     }
//! }
//!
//! let config = StudyConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn StudyProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// Stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Summary,
    Questions,
    AnswerKey,
    Write,
}

impl Stage {
    /// Progress banner shown by the CLI.
    pub fn banner(self) -> &'static str {
        match self {
            Stage::Extract => "📄 Extraindo texto do PDF...",
            Stage::Summary => "📚 Gerando resumo...",
            Stage::Questions => "📝 Criando questões...",
            Stage::AnswerKey => "✅ Processando gabarito...",
            Stage::Write => "💾 Salvando material...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::Summary => "summary",
            Stage::Questions => "questions",
            Stage::AnswerKey => "answer-key",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Called by the pipeline as it moves through the stages.
///
/// All methods default to no-ops so implementations only override what they
/// need. Stages run sequentially, so calls never overlap.
pub trait StudyProgressCallback: Send + Sync {
    /// Called just before `stage` starts.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called after `stage` succeeded. `detail` is a short human summary
    /// such as `"12 pages, 48211 chars"`.
    fn on_stage_complete(&self, stage: Stage, detail: &str) {
        let _ = (stage, detail);
    }

    /// Called when `stage` fails; the error is then returned to the caller.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// A shareable progress callback.
pub type ProgressCallback = Arc<dyn StudyProgressCallback>;

/// Callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressCallback;

impl StudyProgressCallback for NoopProgressCallback {}
