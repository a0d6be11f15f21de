//! Result types returned by a study-material run.

use crate::pipeline::answer_key::AnswerKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the files a run persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    /// `<base>_resumo.txt`
    Summary,
    /// `<base>_questoes.txt`, markers stripped.
    Questions,
    /// `<base>_gabarito.txt`
    AnswerKey,
    /// `<base>_completo.txt`
    Complete,
    /// `<base>.pdf` or `<base>.html`
    Report,
}

impl Artifact {
    pub const ALL: [Artifact; 5] = [
        Artifact::Summary,
        Artifact::Questions,
        Artifact::AnswerKey,
        Artifact::Complete,
        Artifact::Report,
    ];

    /// Stable short name, used as the JSON key and in CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Artifact::Summary => "resumo",
            Artifact::Questions => "questoes",
            Artifact::AnswerKey => "gabarito",
            Artifact::Complete => "completo",
            Artifact::Report => "report",
        }
    }

    /// File name for this artifact given the base name and the report
    /// extension (only used by [`Artifact::Report`]).
    pub fn file_name(self, base: &str, report_ext: &str) -> String {
        match self {
            Artifact::Report => format!("{base}.{report_ext}"),
            other => format!("{base}_{}.txt", other.as_str()),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a run put its files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputBundle {
    /// The `output_<YYYYMMDD_HHMMSS>` directory created for this run.
    pub dir: PathBuf,
    /// Path of every artifact written, keyed by artifact.
    pub paths: BTreeMap<Artifact, PathBuf>,
}

impl OutputBundle {
    pub fn path(&self, artifact: Artifact) -> Option<&Path> {
        self.paths.get(&artifact).map(PathBuf::as_path)
    }

    /// Directory name without its parent, e.g. `output_20250101_120000`.
    pub fn dir_name(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dir.display().to_string())
    }
}

/// Timing and token statistics for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Characters of text extracted from the PDF.
    pub extracted_chars: usize,
    /// Whitespace-separated words in the generated summary.
    pub summary_words: usize,
    /// Number of answer-key entries.
    pub answered_questions: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub write_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyOutput {
    /// Generated summary (lightweight Markdown).
    pub summary: String,
    /// Generated question block, correctness markers still present.
    pub questions: String,
    pub answer_key: AnswerKey,
    pub bundle: OutputBundle,
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_file_names() {
        assert_eq!(Artifact::Summary.file_name("aula", "pdf"), "aula_resumo.txt");
        assert_eq!(Artifact::Questions.file_name("aula", "pdf"), "aula_questoes.txt");
        assert_eq!(Artifact::AnswerKey.file_name("aula", "pdf"), "aula_gabarito.txt");
        assert_eq!(Artifact::Complete.file_name("aula", "pdf"), "aula_completo.txt");
        assert_eq!(Artifact::Report.file_name("aula", "html"), "aula.html");
    }

    #[test]
    fn dir_name_strips_parent() {
        let bundle = OutputBundle {
            dir: PathBuf::from("/tmp/x/output_20250101_120000"),
            paths: BTreeMap::new(),
        };
        assert_eq!(bundle.dir_name(), "output_20250101_120000");
    }

    #[test]
    fn artifacts_serialize_as_snake_case_keys() {
        let mut paths = BTreeMap::new();
        paths.insert(Artifact::AnswerKey, PathBuf::from("a_gabarito.txt"));
        let bundle = OutputBundle {
            dir: PathBuf::from("output_x"),
            paths,
        };
        let json = serde_json::to_string(&bundle).unwrap();
        assert!(json.contains("\"answer_key\""), "got: {json}");
    }
}
