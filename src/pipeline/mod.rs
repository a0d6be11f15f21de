//! Pipeline stages for turning a PDF into a study package.
//!
//! Each submodule implements one transformation step and is testable on its
//! own. Only [`extract`], [`llm`], [`export`] and [`writer`] touch the outside
//! world; everything between them is pure text processing.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ llm ──▶ answer_key ──▶ report ──▶ writer
//! (path)    (pdfium)    (x2)   (parse key)    (HTML)     (files + export)
//! ```
//!
//! 1. [`input`]  : validate the user-supplied path and the `%PDF` header
//! 2. [`extract`]: pull the text layer out with pdfium, in `spawn_blocking`
//! 3. [`llm`]    : summary call, then question call; [`postprocess`] tidies
//!    both answers
//! 4. [`answer_key`]: line state machine that reads `(correta)` markers
//! 5. [`tables`], [`questions`], [`report`]: Markdown tables and question
//!    lists to HTML, then the full report document
//! 6. [`writer`] : run directory, text artifacts, and the report through an
//!    [`export::DocumentRenderer`]

pub mod answer_key;
pub mod export;
pub mod extract;
pub mod input;
pub mod llm;
pub mod postprocess;
pub mod questions;
pub mod report;
pub mod tables;
pub mod writer;
