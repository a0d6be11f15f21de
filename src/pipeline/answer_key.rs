//! Answer-key extraction from a generated question block.
//!
//! The question prompt asks the model for this exact shape:
//!
//! ```text
//! 1. Enunciado da questão
//! a) Alternativa A (correta)
//! b) Alternativa B
//! c) Alternativa C
//! d) Alternativa D
//! ```
//!
//! Parsing is a three-state machine over trimmed lines. Anything that is not
//! a question or option line (blank lines, model chatter, format banners) is
//! ignored, so a question whose marker the model forgot simply leaves a gap
//! in the key.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Literal annotation the model attaches to the correct option.
pub const MARKER: &str = "(correta)";

/// `12. ` at the start of a trimmed line.
pub(crate) static RE_QUESTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s").unwrap());

/// `b) ` at the start of a trimmed line.
pub(crate) static RE_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-dA-D])\)\s").unwrap());

static RE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(\s*correta\s*\)").unwrap());

static RE_MARKER_WITH_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\(\s*correta\s*\)").unwrap());

/// One line of the answer key: question number and the correct letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    /// Question number exactly as it appeared in the block (digits only).
    pub number: String,
    /// Upper-case option letter, `A`–`D`.
    pub letter: char,
}

impl fmt::Display for AnswerKeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.letter)
    }
}

/// Ordered answer key, at most one entry per question number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey {
    entries: Vec<AnswerKeyEntry>,
}

impl AnswerKey {
    pub fn entries(&self) -> &[AnswerKeyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Letter recorded for question `number`, if any.
    pub fn get(&self, number: &str) -> Option<char> {
        self.entries
            .iter()
            .find(|e| e.number == number)
            .map(|e| e.letter)
    }

    /// `"<n>. <LETTER>"` per entry, in question order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Entries joined with `sep`.
    pub fn join(&self, sep: &str) -> String {
        self.lines().join(sep)
    }

    /// Record `letter` for `number`. A later marker for a number already in
    /// the key replaces the earlier letter in place.
    fn record(&mut self, number: &str, letter: char) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.number == number) {
            warn!(
                "Question {}: more than one option marked {}, keeping {} over {}",
                number, MARKER, letter, existing.letter
            );
            existing.letter = letter;
        } else {
            self.entries.push(AnswerKeyEntry {
                number: number.to_string(),
                letter,
            });
        }
    }
}

impl<'a> IntoIterator for &'a AnswerKey {
    type Item = &'a AnswerKeyEntry;
    type IntoIter = std::slice::Iter<'a, AnswerKeyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// How a trimmed line of a question block is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// `N. text`: number and the text after the prefix.
    Question(&'a str, &'a str),
    /// `x) text`: letter and the text after the prefix.
    Option(char, &'a str),
    Blank,
    Other(&'a str),
}

pub(crate) fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if let Some(caps) = RE_QUESTION.captures(line) {
        let number = caps.get(1).map_or("", |m| m.as_str());
        let rest = &line[caps.get(0).map_or(0, |m| m.end())..];
        return Line::Question(number, rest.trim_start());
    }
    if let Some(caps) = RE_OPTION.captures(line) {
        let letter = caps
            .get(1)
            .and_then(|m| m.as_str().chars().next())
            .map_or('A', |c| c.to_ascii_uppercase());
        let rest = &line[caps.get(0).map_or(0, |m| m.end())..];
        return Line::Option(letter, rest.trim_start());
    }
    Line::Other(line)
}

/// `true` if `text` carries the correctness marker (any case).
pub fn has_marker(text: &str) -> bool {
    RE_MARKER.is_match(text)
}

/// Remove every correctness marker together with the whitespace before it.
///
/// Idempotent: `strip_markers(&strip_markers(s)) == strip_markers(s)`.
pub fn strip_markers(block: &str) -> String {
    RE_MARKER_WITH_SPACE.replace_all(block, "").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State<'a> {
    BeforeFirstQuestion,
    InEnunciation { number: &'a str },
    InOptions { number: &'a str },
}

/// Extract the answer key from a question block.
///
/// Entries appear in the order their question numbers first appear. A
/// question with no marked option yields no entry; a question with several
/// marked options keeps the last one.
pub fn parse_answer_key(block: &str) -> AnswerKey {
    let mut key = AnswerKey::default();
    let mut state = State::BeforeFirstQuestion;

    for raw in block.lines() {
        state = match (state, classify(raw)) {
            (_, Line::Question(number, _)) => State::InEnunciation { number },

            // Option-shaped lines before any question never count.
            (State::BeforeFirstQuestion, Line::Option(..)) => State::BeforeFirstQuestion,

            (
                State::InEnunciation { number } | State::InOptions { number },
                Line::Option(letter, text),
            ) => {
                if has_marker(text) {
                    key.record(number, letter);
                }
                State::InOptions { number }
            }

            (state, Line::Blank | Line::Other(_)) => state,
        };
    }

    debug!("Parsed answer key with {} entries", key.len());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(n: usize) -> String {
        let letters = ['a', 'b', 'c', 'd'];
        let mut s = String::new();
        for q in 1..=n {
            s.push_str(&format!("{q}. Pergunta número {q}?\n"));
            let correct = (q - 1) % 4;
            for (i, l) in letters.iter().enumerate() {
                let marker = if i == correct { " (correta)" } else { "" };
                s.push_str(&format!("{l}) Alternativa {l}{marker}\n"));
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn ten_well_formed_questions_yield_ten_entries_in_order() {
        let key = parse_answer_key(&block(10));
        assert_eq!(key.len(), 10);
        let expected = ['A', 'B', 'C', 'D', 'A', 'B', 'C', 'D', 'A', 'B'];
        for (i, entry) in key.entries().iter().enumerate() {
            assert_eq!(entry.number, (i + 1).to_string());
            assert_eq!(entry.letter, expected[i]);
        }
    }

    #[test]
    fn question_without_marker_leaves_a_gap() {
        let text = "1. Primeira\na) x (correta)\nb) y\n\n2. Segunda\na) x\nb) y\n\n3. Terceira\na) x\nb) y (correta)\n";
        let key = parse_answer_key(text);
        assert_eq!(key.lines(), vec!["1. A", "3. B"]);
        assert_eq!(key.get("2"), None);
    }

    #[test]
    fn multiple_markers_keep_the_last_one() {
        let text = "1. Ambígua\na) x (correta)\nb) y\nc) z (correta)\nd) w\n2. Normal\nd) w (correta)\n";
        let key = parse_answer_key(text);
        assert_eq!(key.len(), 2);
        assert_eq!(key.get("1"), Some('C'));
        assert_eq!(key.entries()[0].number, "1");
        assert_eq!(key.get("2"), Some('D'));
    }

    #[test]
    fn options_before_first_question_are_ignored() {
        let text = "a) solta (correta)\nb) outra\n1. Agora sim\nb) certa (correta)\n";
        let key = parse_answer_key(text);
        assert_eq!(key.lines(), vec!["1. B"]);
    }

    #[test]
    fn marker_and_letter_are_case_insensitive() {
        let text = "  7. Indentada\n  C) opção (CORRETA)  \n";
        let key = parse_answer_key(text);
        assert_eq!(key.lines(), vec!["7. C"]);
    }

    #[test]
    fn words_containing_correta_are_not_markers() {
        let text = "1. Qual?\na) a afirmação incorreta\nb) a certa (correta)\n";
        assert_eq!(parse_answer_key(text).lines(), vec!["1. B"]);
    }

    #[test]
    fn option_without_space_after_parenthesis_is_not_an_option() {
        let text = "1. Qual?\na)colado (correta)\n";
        assert!(parse_answer_key(text).is_empty());
    }

    #[test]
    fn empty_block_gives_empty_key() {
        assert!(parse_answer_key("").is_empty());
        assert!(parse_answer_key("Aqui estão as questões:\n\n").is_empty());
    }

    #[test]
    fn strip_markers_removes_marker_and_leading_space() {
        let text = "a) Paris (correta)\nb) Roma\nc) Lima  (Correta)\n";
        assert_eq!(strip_markers(text), "a) Paris\nb) Roma\nc) Lima\n");
    }

    #[test]
    fn strip_markers_is_idempotent() {
        let once = strip_markers(&block(4));
        assert_eq!(strip_markers(&once), once);
        assert!(!once.contains("correta"));
    }

    #[test]
    fn classify_lines() {
        assert_eq!(classify("10. Texto"), Line::Question("10", "Texto"));
        assert_eq!(classify(" b)  Texto"), Line::Option('B', "Texto"));
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("e) fora"), Line::Other("e) fora"));
        assert_eq!(classify("1.5 não"), Line::Other("1.5 não"));
    }
}
