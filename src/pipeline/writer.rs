//! Persistence of a run: four text files plus the rendered report, all in a
//! fresh `output_<YYYYMMDD_HHMMSS>` directory.
//!
//! Files are written one after the other with no rollback; a failure midway
//! leaves the earlier files in place.
//!
//! Two runs started within the same second resolve to the same directory and
//! the later one overwrites the earlier files.

use super::answer_key::{strip_markers, AnswerKey};
use super::export::DocumentRenderer;
use super::report::build_report;
use crate::error::StudyError;
use crate::output::{Artifact, OutputBundle};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SUMMARY_BANNER: &str = "=== RESUMO DE ESTUDO ===\n\n";
pub const QUESTIONS_BANNER: &str = "=== QUESTÕES DE ESTUDO ===\n\n";
pub const ANSWER_KEY_BANNER: &str = "=== GABARITO ===\n\n";
pub const COMPLETE_BANNER: &str = "=== MATERIAL COMPLETO ===\n\n";

/// Name of the run directory for a given instant.
pub fn run_dir_name(at: DateTime<Local>) -> String {
    format!("output_{}", at.format("%Y%m%d_%H%M%S"))
}

/// Body of `<base>_completo.txt`, with the marker-bearing questions.
pub fn complete_text(summary: &str, questions: &str, answer_key: &AnswerKey) -> String {
    format!(
        "{COMPLETE_BANNER}RESUMO:\n\n{summary}\n\nQUESTÕES:\n\n{questions}\n\nGABARITO:\n\n{}",
        answer_key.join("\n")
    )
}

/// Write every artifact of a run under `root`.
///
/// `questions` is the raw block with markers; the public copy is derived
/// here. The report title is `base_name`.
pub async fn write_materials(
    summary: &str,
    questions: &str,
    answer_key: &AnswerKey,
    base_name: &str,
    root: &Path,
    renderer: &dyn DocumentRenderer,
) -> Result<OutputBundle, StudyError> {
    let dir = root.join(run_dir_name(Local::now()));
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| StudyError::OutputDirFailed {
            path: dir.clone(),
            source: e,
        })?;
    info!("Writing study material to {}", dir.display());

    let public = strip_markers(questions);
    let report_ext = renderer.extension();
    let paths: BTreeMap<Artifact, PathBuf> = Artifact::ALL
        .iter()
        .map(|&a| (a, dir.join(a.file_name(base_name, report_ext))))
        .collect();

    write_file(
        &paths[&Artifact::Summary],
        format!("{SUMMARY_BANNER}{summary}").as_bytes(),
    )
    .await?;
    write_file(
        &paths[&Artifact::Questions],
        format!("{QUESTIONS_BANNER}{public}").as_bytes(),
    )
    .await?;
    write_file(
        &paths[&Artifact::AnswerKey],
        format!("{ANSWER_KEY_BANNER}{}", answer_key.join("\n")).as_bytes(),
    )
    .await?;
    write_file(
        &paths[&Artifact::Complete],
        complete_text(summary, questions, answer_key).as_bytes(),
    )
    .await?;

    let html = build_report(base_name, summary, &public, answer_key);
    debug!("Composed report: {} bytes of HTML", html.len());
    let rendered = renderer.render(&html).await?;
    write_file(&paths[&Artifact::Report], &rendered).await?;

    Ok(OutputBundle { dir, paths })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), StudyError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| StudyError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::answer_key::parse_answer_key;
    use crate::pipeline::export::HtmlRenderer;
    use async_trait::async_trait;
    use chrono::TimeZone;

    const QUESTIONS: &str = "1. Capital da França?\na) Paris (correta)\nb) Roma\nc) Lima\nd) Oslo\n\n2. 2+2?\na) 3\nb) 4 (correta)\nc) 5\nd) 6\n";

    #[test]
    fn run_dir_name_format() {
        let at = Local.with_ymd_and_hms(2025, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(run_dir_name(at), "output_20250309_070501");
    }

    #[test]
    fn complete_text_keeps_markers() {
        let key = parse_answer_key(QUESTIONS);
        let text = complete_text("Resumo.", QUESTIONS, &key);
        assert!(text.starts_with("=== MATERIAL COMPLETO ===\n\nRESUMO:\n\nResumo.\n\nQUESTÕES:\n\n"));
        assert!(text.contains("a) Paris (correta)"));
        assert!(text.ends_with("GABARITO:\n\n1. A\n2. B"));
    }

    #[tokio::test]
    async fn writes_all_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let key = parse_answer_key(QUESTIONS);
        let bundle = write_materials("# Resumo", QUESTIONS, &key, "aula", tmp.path(), &HtmlRenderer)
            .await
            .unwrap();

        assert!(bundle.dir.starts_with(tmp.path()));
        assert!(bundle.dir_name().starts_with("output_"));
        assert_eq!(bundle.paths.len(), 5);

        let questoes = std::fs::read_to_string(bundle.path(Artifact::Questions).unwrap()).unwrap();
        assert!(questoes.starts_with(QUESTIONS_BANNER));
        assert!(!questoes.contains("correta"));

        let gabarito = std::fs::read_to_string(bundle.path(Artifact::AnswerKey).unwrap()).unwrap();
        assert_eq!(gabarito, "=== GABARITO ===\n\n1. A\n2. B");

        let report = bundle.path(Artifact::Report).unwrap();
        assert_eq!(report.file_name().unwrap(), "aula.html");
        let html = std::fs::read_to_string(report).unwrap();
        assert!(html.contains("<h2>Gabarito</h2>"));
        assert!(!html.contains("(correta)"));
    }

    struct FailingRenderer;

    #[async_trait]
    impl DocumentRenderer for FailingRenderer {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn extension(&self) -> &'static str {
            "pdf"
        }
        async fn render(&self, _html: &str) -> Result<Vec<u8>, StudyError> {
            Err(StudyError::RenderFailed {
                renderer: "failing".into(),
                detail: "status flag set".into(),
            })
        }
    }

    #[tokio::test]
    async fn render_failure_propagates_and_leaves_text_files() {
        let tmp = tempfile::tempdir().unwrap();
        let key = parse_answer_key(QUESTIONS);
        let err = write_materials("r", QUESTIONS, &key, "x", tmp.path(), &FailingRenderer)
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::RenderFailed { .. }));

        let run_dir = std::fs::read_dir(tmp.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        assert!(run_dir.join("x_resumo.txt").exists());
        assert!(run_dir.join("x_completo.txt").exists());
        assert!(!run_dir.join("x.pdf").exists());
    }

    #[tokio::test]
    async fn unwritable_root_is_an_output_dir_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not_a_dir");
        std::fs::write(&file, b"x").unwrap();
        let err = write_materials("r", "", &AnswerKey::default(), "x", &file, &HtmlRenderer)
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::OutputDirFailed { .. }));
    }
}
