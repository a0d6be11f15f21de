//! Configuration for a study-material run.
//!
//! Everything a run needs (model choice, prompt limits, output location,
//! report format) lives in one [`StudyConfig`], built once at startup and
//! passed by reference into [`crate::study`]. Credentials are not stored
//! here: providers read their API keys from the environment.

use crate::error::StudyError;
use crate::pipeline::export::{DocumentRenderer, ReportFormat};
use crate::pipeline::llm::TextGenerator;
use crate::progress::ProgressCallback;
use crate::prompts::{DEFAULT_QUESTION_INPUT_CHARS, DEFAULT_SUMMARY_INPUT_CHARS};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Provider used when only `GEMINI_API_KEY` is set.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for one run.
///
/// # Example
/// ```rust
/// use pdf2study::{ReportFormat, StudyConfig};
///
/// let config = StudyConfig::builder()
///     .model("gemini-2.0-flash")
///     .report_format(ReportFormat::Html)
///     .output_root("/tmp")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct StudyConfig {
    /// LLM model identifier. If None, [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "anthropic", "ollama").
    /// If None, resolved from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed generator. Takes precedence over `provider_name`.
    pub generator: Option<Arc<dyn TextGenerator>>,

    /// Sampling temperature. Default: 0.3.
    pub temperature: f32,

    /// Maximum tokens per generated answer. Default: 8192.
    ///
    /// Detailed summaries of long documents routinely pass 4 000 tokens.
    pub max_tokens: usize,

    /// Characters of extracted text sent to the summary prompt. Default: 30 000.
    pub summary_input_chars: usize,

    /// Characters of summary sent to the question prompt. Default: 20 000.
    pub question_input_chars: usize,

    /// Per-call LLM timeout in seconds. Default: 180.
    pub api_timeout_secs: u64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Directory under which `output_<timestamp>/` is created. Default: `.`.
    pub output_root: PathBuf,

    /// Report format. Default: [`ReportFormat::Pdf`].
    pub report_format: ReportFormat,

    /// Pre-constructed renderer. Takes precedence over `report_format`.
    pub renderer: Option<Arc<dyn DocumentRenderer>>,

    /// Stage progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            generator: None,
            temperature: 0.3,
            max_tokens: 8192,
            summary_input_chars: DEFAULT_SUMMARY_INPUT_CHARS,
            question_input_chars: DEFAULT_QUESTION_INPUT_CHARS,
            api_timeout_secs: 180,
            password: None,
            output_root: PathBuf::from("."),
            report_format: ReportFormat::default(),
            renderer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for StudyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("generator", &self.generator.as_ref().map(|_| "<dyn TextGenerator>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("summary_input_chars", &self.summary_input_chars)
            .field("question_input_chars", &self.question_input_chars)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("output_root", &self.output_root)
            .field("report_format", &self.report_format)
            .field("renderer", &self.renderer.as_ref().map(|r| r.name()))
            .finish()
    }
}

impl StudyConfig {
    /// Create a new builder for `StudyConfig`.
    pub fn builder() -> StudyConfigBuilder {
        StudyConfigBuilder {
            config: Self::default(),
        }
    }

    /// Model to request, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Renderer for the report: the injected one, else one built from
    /// `report_format`.
    pub fn resolve_renderer(&self) -> Result<Arc<dyn DocumentRenderer>, StudyError> {
        match self.renderer {
            Some(ref r) => Ok(Arc::clone(r)),
            None => self.report_format.renderer(),
        }
    }
}

/// Builder for [`StudyConfig`].
pub struct StudyConfigBuilder {
    config: StudyConfig,
}

impl fmt::Debug for StudyConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl StudyConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn summary_input_chars(mut self, n: usize) -> Self {
        self.config.summary_input_chars = n;
        self
    }

    pub fn question_input_chars(mut self, n: usize) -> Self {
        self.config.question_input_chars = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.output_root = root.into();
        self
    }

    pub fn report_format(mut self, format: ReportFormat) -> Self {
        self.config.report_format = format;
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.config.renderer = Some(renderer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<StudyConfig, StudyError> {
        let c = &self.config;
        if c.summary_input_chars == 0 || c.question_input_chars == 0 {
            return Err(StudyError::InvalidConfig(
                "Prompt input limits must be ≥ 1 character".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(StudyError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(StudyError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(StudyError::InvalidConfig("Model name is empty".into()));
        }
        Ok(self.config)
    }
}
