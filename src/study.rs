//! End-to-end entry points: PDF in, study package on disk out.
//!
//! Stages run strictly one after another: extraction, summary, questions,
//! answer key, write. Any error ends the run; files already written stay.

use crate::config::{StudyConfig, DEFAULT_MODEL, DEFAULT_PROVIDER};
use crate::error::StudyError;
use crate::output::{RunStats, StudyOutput};
use crate::pipeline::answer_key::parse_answer_key;
use crate::pipeline::llm::{self, ProviderGenerator, TextGenerator};
use crate::pipeline::{extract, input, writer};
use crate::progress::Stage;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Generate the full study package for a PDF.
///
/// This is the primary entry point for the library.
///
/// # Example
/// ```rust,no_run
/// use pdf2study::{generate_study_material, StudyConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StudyConfig::default();
/// let output = generate_study_material("apostila.pdf", &config).await?;
/// println!("saved to {}", output.bundle.dir.display());
/// for line in output.answer_key.lines() {
///     println!("{line}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn generate_study_material(
    input_str: impl AsRef<str>,
    config: &StudyConfig,
) -> Result<StudyOutput, StudyError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting study run: {}", input_str);

    let pdf_path = input::resolve_input(input_str)?;
    let base_name = input::base_name(&pdf_path);

    // Fail on a missing provider before spending time on extraction.
    let generator = resolve_generator(config)?;

    let extract_start = Instant::now();
    let extracted = tracked(config, Stage::Extract, async {
        let e = extract::extract_text(&pdf_path, config.password.as_deref()).await?;
        let detail = format!(
            "{} páginas, {} caracteres",
            e.page_count,
            e.text.chars().count()
        );
        Ok::<_, StudyError>((e, detail))
    })
    .await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    let mut output = run_from_text(&extracted.text, &base_name, generator.as_ref(), config).await?;
    output.stats.extract_duration_ms = extract_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Study run complete: {} questions answered, {}ms total",
        output.stats.answered_questions, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Generate the study package from text that was already extracted.
///
/// `base_name` names the output files (`<base>_resumo.txt`, …) and titles
/// the report.
pub async fn study_from_text(
    text: &str,
    base_name: &str,
    config: &StudyConfig,
) -> Result<StudyOutput, StudyError> {
    let total_start = Instant::now();
    if text.trim().is_empty() {
        return Err(StudyError::InvalidInput {
            input: "<empty text>".into(),
        });
    }
    let generator = resolve_generator(config)?;
    let mut output = run_from_text(text, base_name, generator.as_ref(), config).await?;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Synchronous wrapper around [`generate_study_material`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_study_material_sync(
    input_str: impl AsRef<str>,
    config: &StudyConfig,
) -> Result<StudyOutput, StudyError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| StudyError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate_study_material(input_str, config))
}

async fn run_from_text(
    text: &str,
    base_name: &str,
    generator: &dyn TextGenerator,
    config: &StudyConfig,
) -> Result<StudyOutput, StudyError> {
    let llm_start = Instant::now();
    let summary = tracked(config, Stage::Summary, async {
        let g = llm::generate_summary(generator, text, config).await?;
        let detail = format!("{} palavras", word_count(&g.text));
        Ok::<_, StudyError>((g, detail))
    })
    .await?;

    let questions = tracked(config, Stage::Questions, async {
        let g = llm::generate_questions(generator, &summary.text, config).await?;
        let detail = format!("{} caracteres", g.text.chars().count());
        Ok::<_, StudyError>((g, detail))
    })
    .await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    let answer_key = tracked(config, Stage::AnswerKey, async {
        let key = parse_answer_key(&questions.text);
        let detail = format!("{} respostas", key.len());
        Ok::<_, StudyError>((key, detail))
    })
    .await?;

    let renderer = config.resolve_renderer()?;
    let write_start = Instant::now();
    let bundle = tracked(config, Stage::Write, async {
        let b = writer::write_materials(
            &summary.text,
            &questions.text,
            &answer_key,
            base_name,
            &config.output_root,
            renderer.as_ref(),
        )
        .await?;
        let detail = b.dir_name();
        Ok::<_, StudyError>((b, detail))
    })
    .await?;
    let write_duration_ms = write_start.elapsed().as_millis() as u64;

    let stats = RunStats {
        extracted_chars: text.chars().count(),
        summary_words: word_count(&summary.text),
        answered_questions: answer_key.len(),
        total_input_tokens: (summary.input_tokens + questions.input_tokens) as u64,
        total_output_tokens: (summary.output_tokens + questions.output_tokens) as u64,
        extract_duration_ms: 0,
        llm_duration_ms,
        write_duration_ms,
        total_duration_ms: 0,
    };

    Ok(StudyOutput {
        summary: summary.text,
        questions: questions.text,
        answer_key,
        bundle,
        stats,
    })
}

/// Run one stage, reporting start, completion and failure to the callback.
async fn tracked<T, F>(config: &StudyConfig, stage: Stage, fut: F) -> Result<T, StudyError>
where
    F: Future<Output = Result<(T, String), StudyError>>,
{
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
    match fut.await {
        Ok((value, detail)) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_stage_complete(stage, &detail);
            }
            Ok(value)
        }
        Err(e) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_stage_error(stage, &e.to_string());
            }
            Err(e)
        }
    }
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, StudyError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        StudyError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the text generator, from most-specific to least-specific.
///
/// 1. **Pre-built generator** (`config.generator`), used as-is.
/// 2. **Named provider + model** (`config.provider_name`); the factory reads
///    the matching API key from the environment.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`),
///    both non-empty.
/// 4. **`GEMINI_API_KEY`** present: provider `gemini` with the configured
///    model or [`DEFAULT_MODEL`].
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_generator(config: &StudyConfig) -> Result<Arc<dyn TextGenerator>, StudyError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }
    let provider = resolve_provider(config)?;
    Ok(Arc::new(ProviderGenerator::new(provider, config)))
}

fn resolve_provider(config: &StudyConfig) -> Result<Arc<dyn LLMProvider>, StudyError> {
    if let Some(ref name) = config.provider_name {
        return create_provider(name, config.model_or_default());
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if std::env::var("GEMINI_API_KEY").is_ok_and(|k| !k.is_empty()) {
        return create_provider(DEFAULT_PROVIDER, config.model_or_default());
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| StudyError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY (default model {DEFAULT_MODEL}), OPENAI_API_KEY,\n\
                ANTHROPIC_API_KEY, or pass --provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::Generation;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, prompt: &str) -> Result<Generation, StudyError> {
            Ok(Generation {
                text: prompt.to_string(),
                ..Default::default()
            })
        }
    }

    #[test]
    fn word_count_splits_on_any_whitespace() {
        assert_eq!(word_count("um  dois\ntrês\tquatro"), 4);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn injected_generator_is_used_verbatim() {
        let echo: Arc<dyn TextGenerator> = Arc::new(Echo);
        let config = StudyConfig::builder()
            .generator(Arc::clone(&echo))
            .build()
            .unwrap();
        let resolved = resolve_generator(&config).unwrap();
        assert!(Arc::ptr_eq(&resolved, &echo));
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_generation() {
        let config = StudyConfig::builder()
            .generator(Arc::new(Echo))
            .build()
            .unwrap();
        let err = study_from_text("  \n ", "doc", &config).await.unwrap_err();
        assert!(matches!(err, StudyError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn missing_file_fails_before_provider_lookup() {
        let config = StudyConfig::default();
        let err = generate_study_material("/definitely/not/here.pdf", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::FileNotFound { .. }));
    }
}
