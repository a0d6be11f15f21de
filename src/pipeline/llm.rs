//! Text generation: summary and question calls to the LLM.
//!
//! All provider traffic goes through [`TextGenerator`], a one-method seam
//! that takes a prompt and returns text. [`ProviderGenerator`] adapts any
//! `edgequake_llm::LLMProvider`; tests substitute canned generators.
//!
//! Calls are bounded by `api_timeout_secs` and never retried: a failed
//! generation ends the run.

use crate::config::StudyConfig;
use crate::error::StudyError;
use crate::pipeline::postprocess::{clean_generated, clean_question_block};
use crate::prompts::{questions_prompt, summary_prompt};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

/// Text plus token accounting for one generation call.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// Anything that can answer a prompt with text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, StudyError>;
}

/// [`TextGenerator`] backed by an edgequake-llm provider.
pub struct ProviderGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl ProviderGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &StudyConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }
}

#[async_trait]
impl TextGenerator for ProviderGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation, StudyError> {
        let messages = vec![ChatMessage::user(prompt)];
        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| StudyError::LlmApiError {
                stage: "generation".into(),
                message: e.to_string(),
            })?;
        Ok(Generation {
            text: response.content,
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }
}

/// Build `CompletionOptions` from the study config.
fn build_options(config: &StudyConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Ask for the academic summary of the extracted text.
pub async fn generate_summary(
    generator: &dyn TextGenerator,
    text: &str,
    config: &StudyConfig,
) -> Result<Generation, StudyError> {
    let prompt = summary_prompt(text, config.summary_input_chars);
    run_stage(generator, "summary", &prompt, clean_generated, config).await
}

/// Ask for the question block written from the summary.
pub async fn generate_questions(
    generator: &dyn TextGenerator,
    summary: &str,
    config: &StudyConfig,
) -> Result<Generation, StudyError> {
    let prompt = questions_prompt(summary, config.question_input_chars);
    run_stage(generator, "questions", &prompt, clean_question_block, config).await
}

async fn run_stage(
    generator: &dyn TextGenerator,
    stage: &str,
    prompt: &str,
    clean: fn(&str) -> String,
    config: &StudyConfig,
) -> Result<Generation, StudyError> {
    let start = Instant::now();
    debug!("{}: prompt of {} chars", stage, prompt.chars().count());

    let generation = timeout(
        Duration::from_secs(config.api_timeout_secs),
        generator.generate(prompt),
    )
    .await
    .map_err(|_| StudyError::ApiTimeout {
        stage: stage.to_string(),
        secs: config.api_timeout_secs,
    })?
    .map_err(|e| match e {
        StudyError::LlmApiError { message, .. } => StudyError::LlmApiError {
            stage: stage.to_string(),
            message,
        },
        other => other,
    })?;

    let text = clean(&generation.text);
    if text.trim().is_empty() {
        return Err(StudyError::EmptyGeneration {
            stage: stage.to_string(),
        });
    }
    info!(
        "{}: {} chars, {} in / {} out tokens, {:?}",
        stage,
        text.chars().count(),
        generation.input_tokens,
        generation.output_tokens,
        start.elapsed()
    );

    Ok(Generation { text, ..generation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Canned {
        answer: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<Generation, StudyError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(Generation {
                text: self.answer.clone(),
                input_tokens: 10,
                output_tokens: 5,
            })
        }
    }

    fn canned(answer: &str) -> Canned {
        Canned {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn build_options_defaults() {
        let opts = build_options(&StudyConfig::default());
        assert_eq!(opts.temperature, Some(0.3));
        assert_eq!(opts.max_tokens, Some(8192));
    }

    #[tokio::test]
    async fn summary_prompt_is_truncated_and_answer_cleaned() {
        let gen = canned("```markdown\n# Resumo\r\n```");
        let config = StudyConfig::builder()
            .summary_input_chars(5)
            .build()
            .unwrap();
        let out = generate_summary(&gen, "abcdefghij", &config).await.unwrap();
        assert_eq!(out.text, "# Resumo");
        assert_eq!(out.input_tokens, 10);
        let prompts = gen.prompts.lock().unwrap();
        assert!(prompts[0].ends_with("abcde"));
    }

    #[tokio::test]
    async fn hard_breaks_survive_only_in_the_summary() {
        let gen = canned("1. Pergunta  \na) sim");
        let config = StudyConfig::default();
        let summary = generate_summary(&gen, "texto", &config).await.unwrap();
        assert_eq!(summary.text, "1. Pergunta  \na) sim");
        let questions = generate_questions(&gen, "resumo", &config).await.unwrap();
        assert_eq!(questions.text, "1. Pergunta\na) sim");
    }

    #[tokio::test]
    async fn blank_answer_is_an_error() {
        let gen = canned(" \n\u{200B}\n");
        let err = generate_questions(&gen, "resumo", &StudyConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::EmptyGeneration { ref stage } if stage == "questions"));
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _prompt: &str) -> Result<Generation, StudyError> {
            Err(StudyError::LlmApiError {
                stage: "generation".into(),
                message: "401 unauthorized".into(),
            })
        }
    }

    #[tokio::test]
    async fn api_errors_are_tagged_with_the_stage() {
        let err = generate_summary(&Failing, "texto", &StudyConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::LlmApiError { ref stage, .. } if stage == "summary"));
    }

    struct Slow;

    #[async_trait]
    impl TextGenerator for Slow {
        async fn generate(&self, _prompt: &str) -> Result<Generation, StudyError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Generation::default())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generation_times_out() {
        let config = StudyConfig::builder().api_timeout_secs(1).build().unwrap();
        let err = generate_summary(&Slow, "texto", &config).await.unwrap_err();
        assert!(matches!(err, StudyError::ApiTimeout { secs: 1, .. }));
    }
}
