//! Question presentation: the raw question block as a nested HTML outline.
//!
//! The same line classification as [`super::answer_key`] is reused, but here
//! every line is kept: questions become outer list items, options become an
//! inner lettered list. Other lines never close a question: between the
//! statement and the first option they are kept as the question's context
//! (an excerpt, a second statement line), after that they become notes
//! following the question.

use super::answer_key::{classify, strip_markers, Line};
use super::tables::escape_html;
use serde::{Deserialize, Serialize};

/// One entry of the presented outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentedItem {
    Question {
        /// Number as written in the block.
        number: String,
        /// Statement without its `N. ` prefix.
        enunciation: String,
        /// Further lines before the first option, e.g. a quoted excerpt.
        context: Vec<String>,
        /// Option texts without their `x) ` prefix, in original order.
        options: Vec<String>,
    },
    /// A line outside any statement (explanation, model chatter, an option
    /// before the first question).
    Note(String),
}

/// Restructure a question block into questions, options and notes.
///
/// Markers are stripped again here so that the outline never leaks the
/// answer even if the caller passed the marker-bearing block.
pub fn present_questions(block: &str) -> Vec<PresentedItem> {
    let public = strip_markers(block);
    let mut items: Vec<PresentedItem> = Vec::new();
    // Index into `items` of the question currently collecting options.
    let mut open: Option<usize> = None;

    for raw in public.lines() {
        match classify(raw) {
            Line::Blank => {}
            Line::Question(number, text) => {
                items.push(PresentedItem::Question {
                    number: number.to_string(),
                    enunciation: text.to_string(),
                    context: Vec::new(),
                    options: Vec::new(),
                });
                open = Some(items.len() - 1);
            }
            Line::Option(_, text) => match open.and_then(|i| items.get_mut(i)) {
                Some(PresentedItem::Question { options, .. }) => options.push(text.to_string()),
                _ => items.push(PresentedItem::Note(raw.trim().to_string())),
            },
            Line::Other(text) => match open.and_then(|i| items.get_mut(i)) {
                Some(PresentedItem::Question {
                    context, options, ..
                }) if options.is_empty() => context.push(text.to_string()),
                _ => items.push(PresentedItem::Note(text.to_string())),
            },
        }
    }
    items
}

/// Render the outline as HTML for the report's "Questões" section.
pub fn render_questions_html(block: &str) -> String {
    render_items(&present_questions(block))
}

/// Render already-presented items.
pub fn render_items(items: &[PresentedItem]) -> String {
    let mut html = String::from("<ol class=\"questions\">\n");
    for item in items {
        match item {
            PresentedItem::Question {
                number,
                enunciation,
                context,
                options,
            } => {
                html.push_str(&format!(
                    "<li class=\"question\" value=\"{}\"><p class=\"question-text\"><strong>{}</strong></p>\n",
                    escape_html(number),
                    escape_html(enunciation)
                ));
                for line in context {
                    html.push_str(&format!(
                        "<p class=\"question-context\">{}</p>\n",
                        escape_html(line)
                    ));
                }
                html.push_str("<ol class=\"options\" type=\"a\">\n");
                for option in options {
                    html.push_str(&format!("<li>{}</li>\n", escape_html(option)));
                }
                html.push_str("</ol></li>\n");
            }
            PresentedItem::Note(text) => {
                html.push_str(&format!(
                    "<li class=\"note\"><p>{}</p></li>\n",
                    escape_html(text)
                ));
            }
        }
    }
    html.push_str("</ol>");
    html
}

/// Question count of a presented outline.
pub fn question_count(items: &[PresentedItem]) -> usize {
    items
        .iter()
        .filter(|i| matches!(i, PresentedItem::Question { .. }))
        .count()
}
