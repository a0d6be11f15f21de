//! Report composition: summary, questions and answer key in one HTML page.
//!
//! The page is self-contained (inline stylesheet, no external assets) so the
//! same markup can be saved as `.html` or printed to PDF by a headless
//! browser with identical results.

use super::answer_key::AnswerKey;
use super::questions::render_questions_html;
use super::tables::{escape_html, transcode_tables};
use pulldown_cmark::{html, Options, Parser};

/// Section headings, in document order.
pub const SUMMARY_HEADING: &str = "Resumo";
pub const QUESTIONS_HEADING: &str = "Questões";
pub const ANSWER_KEY_HEADING: &str = "Gabarito";

/// Render the summary's lightweight Markdown to HTML.
///
/// Pipe tables are expanded by [`transcode_tables`] first; the resulting
/// `<table>` blocks pass through the Markdown renderer as raw HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let with_tables = transcode_tables(markdown);
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(&with_tables, options);
    let mut out = String::with_capacity(with_tables.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Assemble the final document from ready-made fragments.
///
/// No validation happens here: `summary_html` and `questions_html` are
/// inserted verbatim.
pub fn compose_report(
    title: &str,
    summary_html: &str,
    questions_html: &str,
    answer_key: &AnswerKey,
) -> String {
    let answer_key_html = answer_key.join("<br>\n");
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{css}
</style>
</head>
<body>
<h1>{title}</h1>

<div class="section summary">
<h2>{summary_heading}</h2>
{summary_html}
</div>

<div class="section">
<h2>{questions_heading}</h2>
{questions_html}
</div>

<div class="answer-key">
<h2>{answer_key_heading}</h2>
{answer_key_html}
</div>
</body>
</html>
"#,
        title = escape_html(title),
        css = REPORT_CSS,
        summary_heading = SUMMARY_HEADING,
        questions_heading = QUESTIONS_HEADING,
        answer_key_heading = ANSWER_KEY_HEADING,
    )
}

/// Markdown summary + marker-free question block + key → full document.
pub fn build_report(
    title: &str,
    summary_markdown: &str,
    public_questions: &str,
    answer_key: &AnswerKey,
) -> String {
    compose_report(
        title,
        &markdown_to_html(summary_markdown),
        &render_questions_html(public_questions),
        answer_key,
    )
}

/// Print-oriented stylesheet embedded in every report.
pub const REPORT_CSS: &str = r#"@page {
    size: A4;
    margin: 1.5cm;
}

body {
    font-family: 'Helvetica Neue', Arial, sans-serif;
    font-size: 11pt;
    line-height: 1.4;
    color: #333;
}

h1 {
    font-size: 14pt;
    font-weight: 600;
    text-align: center;
    margin: 20px 0;
    padding-bottom: 8px;
    border-bottom: 1px solid #e1e1e1;
    color: #2c3e50;
}

h2 {
    font-size: 12pt;
    font-weight: 600;
    margin: 18px 0 12px 0;
    padding-bottom: 4px;
    border-bottom: 1px solid #f0f0f0;
    color: #2c3e50;
}

h3, h4 {
    font-size: 11pt;
    font-weight: 600;
    margin: 14px 0 8px 0;
}

p {
    margin: 0 0 8px 0;
}

ul, ol {
    margin: 8px 0 12px 20px;
    padding: 0;
}

li {
    margin-bottom: 6px;
}

code, pre {
    font-family: 'Courier New', monospace;
    font-size: 10pt;
    background-color: #f9f9f9;
}

pre {
    padding: 8px;
    border: 1px solid #ddd;
    border-radius: 3px;
    white-space: pre-wrap;
}

ol.questions {
    list-style-type: decimal;
}

ol.questions > li.question {
    margin-bottom: 16px;
    page-break-inside: avoid;
}

ol.questions > li.note {
    list-style: none;
    font-style: italic;
}

.question-text {
    font-weight: 500;
    margin-bottom: 8px;
}

.question-context {
    margin: 0 0 8px 12px;
    color: #444;
}

ol.options {
    list-style-type: lower-alpha;
}

table {
    width: 100%;
    border-collapse: collapse;
    margin: 12px 0;
    font-size: 10pt;
    page-break-inside: avoid;
}

th, td {
    border: 1px solid #ddd;
    padding: 6px 8px;
    vertical-align: top;
}

th {
    background-color: #f2f2f2;
    font-weight: 600;
}

td {
    word-wrap: break-word;
    overflow-wrap: break-word;
}

tr:nth-child(even) {
    background-color: #f9f9f9;
}

.section {
    margin-bottom: 24px;
}

.answer-key {
    margin-top: 24px;
    padding: 12px;
    background-color: #f8f8f8;
    border: 1px solid #e0e0e0;
    font-size: 10pt;
    page-break-inside: avoid;
}

.answer-key h2 {
    margin-top: 0;
}"#;
