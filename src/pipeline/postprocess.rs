//! Post-processing: deterministic cleanup of generated text.
//!
//! Models wrap answers in code fences, emit CRLF line endings or sprinkle
//! zero-width characters, and each of those breaks the line-oriented parsing
//! of the question block. These passes normalise the text without touching
//! its content.
//!
//! Order matters: fences are stripped before line endings are normalised so
//! the fence regex sees the raw answer, and invisible characters go before
//! blank-line collapsing so a line holding only a zero-width space counts as
//! blank.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply every cleanup pass to a generated answer.
///
/// 1. Strip an outer ```` ``` ```` / ```` ```markdown ```` fence
/// 2. Normalise line endings (CRLF/CR → LF)
/// 3. Remove invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 4. Trim trailing whitespace per line, keeping Markdown hard breaks
///    (two or more trailing spaces become exactly two)
/// 5. Collapse runs of 3+ blank lines into one blank line
/// 6. Trim leading/trailing blank lines
pub fn clean_generated(input: &str) -> String {
    let s = strip_outer_fence(input);
    let s = normalise_line_endings(&s);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim_matches('\n').to_string()
}

/// [`clean_generated`] for the question block, where hard breaks mean
/// nothing and every line is trimmed completely.
pub fn clean_question_block(input: &str) -> String {
    clean_generated(input)
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\r?\n(.*?)\r?\n```\s*$").unwrap());

fn strip_outer_fence(input: &str) -> String {
    match RE_OUTER_FENCE.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(['\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}'], "")
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_end();
            let hard_break = !trimmed.is_empty() && line[trimmed.len()..].starts_with("  ");
            if hard_break {
                format!("{trimmed}  ")
            } else {
                trimmed.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}
