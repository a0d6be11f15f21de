//! Pipe-table transcoding: GFM-style tables in free text → HTML `<table>`.
//!
//! Summaries often contain comparison tables. They are rewritten to explicit
//! HTML before Markdown rendering so that column alignment survives into the
//! printed report, where the stylesheet gives them borders and row shading.
//!
//! A table is a run of at least two consecutive lines containing `|`: the
//! header, the alignment separator, then any number of data rows. Everything
//! outside such runs is copied through untouched.

use tracing::debug;

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Alignment from one trimmed separator segment (`:--`, `:-:`, `--:`).
    pub fn from_separator(segment: &str) -> Self {
        let s = segment.trim();
        match (s.starts_with(':'), s.ends_with(':')) {
            (true, true) if s.len() > 1 => Alignment::Center,
            (false, true) => Alignment::Right,
            _ => Alignment::Left,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Per-column alignments of a separator row, indexed by raw `|` segment.
pub fn parse_alignments(separator: &str) -> Vec<Alignment> {
    separator.split('|').map(Alignment::from_separator).collect()
}

/// Rewrite every table run in `text` as an HTML table.
pub fn transcode_tables(text: &str) -> String {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());
    let mut tables = 0usize;
    let mut i = 0;

    while i < lines.len() {
        let starts_table =
            lines[i].contains('|') && lines.get(i + 1).is_some_and(|next| next.contains('|'));
        if !starts_table {
            out.push_str(lines[i]);
            i += 1;
            continue;
        }

        let start = i;
        i += 2;
        while i < lines.len() && lines[i].contains('|') {
            i += 1;
        }
        let run = &lines[start..i];
        out.push_str(&render_table(run));
        if run.last().is_some_and(|l| l.ends_with('\n')) {
            // Blank line so the following text is not swallowed into the
            // raw HTML block by the Markdown renderer.
            out.push_str("\n\n");
        }
        tables += 1;
    }

    if tables > 0 {
        debug!("Transcoded {} table(s) to HTML", tables);
    }
    out
}

/// Render one run (header, separator, data rows) as a single-line table.
fn render_table(run: &[&str]) -> String {
    let header = strip_eol(run[0]);
    let alignments = parse_alignments(strip_eol(run[1]));
    let align_at = |i: usize| alignments.get(i).copied().unwrap_or_default();

    let mut html = String::from("<table><thead><tr>");
    for (i, cell) in cells(header) {
        push_cell(&mut html, "th", align_at(i), cell);
    }
    html.push_str("</tr></thead><tbody>");
    for row in &run[2..] {
        html.push_str("<tr>");
        for (i, cell) in cells(strip_eol(row)) {
            push_cell(&mut html, "td", align_at(i), cell);
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Trimmed cells of a row with their raw segment index. The empty first and
/// last segments produced by outer pipes are dropped.
fn cells(row: &str) -> Vec<(usize, &str)> {
    let segments: Vec<&str> = row.split('|').collect();
    let last = segments.len() - 1;
    segments
        .iter()
        .enumerate()
        .filter(|&(i, seg)| !((i == 0 || i == last) && seg.trim().is_empty()))
        .map(|(i, seg)| (i, seg.trim()))
        .collect()
}

fn push_cell(html: &mut String, tag: &str, align: Alignment, text: &str) {
    html.push_str(&format!(
        "<{tag} style=\"text-align:{}\">{}</{tag}>",
        align.as_css(),
        escape_html(text)
    ));
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_from_separator() {
        assert_eq!(Alignment::from_separator(":--"), Alignment::Left);
        assert_eq!(Alignment::from_separator(" :--: "), Alignment::Center);
        assert_eq!(Alignment::from_separator("--:"), Alignment::Right);
        assert_eq!(Alignment::from_separator("---"), Alignment::Left);
        assert_eq!(Alignment::from_separator(""), Alignment::Left);
        assert_eq!(Alignment::from_separator(":"), Alignment::Left);
    }

    #[test]
    fn text_without_tables_is_unchanged() {
        let text = "# Título\n\nUm parágrafo com | uma barra.\n\nOutro | parágrafo.\n";
        assert_eq!(transcode_tables(text), text);
        assert_eq!(transcode_tables(""), "");
        assert_eq!(transcode_tables("sem quebra final"), "sem quebra final");
    }

    #[test]
    fn three_column_table_with_alignments() {
        let text = "A|B|C\n:--|:--:|--:\n1|2|3\n";
        let html = transcode_tables(text);
        assert_eq!(
            html,
            "<table><thead><tr>\
<th style=\"text-align:left\">A</th>\
<th style=\"text-align:center\">B</th>\
<th style=\"text-align:right\">C</th>\
</tr></thead><tbody><tr>\
<td style=\"text-align:left\">1</td>\
<td style=\"text-align:center\">2</td>\
<td style=\"text-align:right\">3</td>\
</tr></tbody></table>\n\n"
        );
    }

    #[test]
    fn outer_pipes_keep_columns_aligned() {
        let text = "| Nome | Idade |\n|:-----|------:|\n| Ana | 30 |\n";
        let html = transcode_tables(text);
        assert!(html.contains("<th style=\"text-align:left\">Nome</th>"));
        assert!(html.contains("<th style=\"text-align:right\">Idade</th>"));
        assert!(html.contains("<td style=\"text-align:right\">30</td>"));
        assert_eq!(html.matches("<th ").count(), 2);
    }

    #[test]
    fn surrounding_text_is_preserved() {
        let text = "Antes\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nDepois\n";
        let html = transcode_tables(text);
        assert!(html.starts_with("Antes\n\n<table>"));
        assert!(html.ends_with("</table>\n\n\nDepois\n"));
    }

    #[test]
    fn single_pipe_line_is_not_a_table() {
        let text = "Só uma | linha\nsem separador\n";
        assert_eq!(transcode_tables(text), text);
    }

    #[test]
    fn short_rows_render_fewer_cells_and_wide_rows_fall_back_to_left() {
        let text = "a|b|c\n--|:-:|--:\nx\nx|y|z|w\n";
        let html = transcode_tables(text);
        // "x" contains no pipe, so the run ends before it.
        assert!(html.contains("</table>\n\nx\n"));

        let text = "a|b\n--:|:-:\n1|2|3\n4\n";
        let html = transcode_tables(text);
        assert!(html.contains("<td style=\"text-align:left\">3</td>"));
        assert_eq!(html.matches("<tr>").count(), 2);
    }

    #[test]
    fn interior_empty_cells_are_kept() {
        let html = transcode_tables("| a | b | c |\n|---|---|---|\n| 1 |  | 3 |\n");
        assert_eq!(html.matches("<td ").count(), 3);
        assert!(html.contains("<td style=\"text-align:left\"></td>"));
    }

    #[test]
    fn cell_text_is_escaped() {
        let html = transcode_tables("x | y\n--|--\na < b | c & d\n");
        assert!(html.contains("a &lt; b"));
        assert!(html.contains("c &amp; d"));
    }

    #[test]
    fn table_at_end_without_newline() {
        let html = transcode_tables("a|b\n-|-\n1|2");
        assert!(html.ends_with("</table>"));
    }

    #[test]
    fn crlf_lines_are_handled() {
        let html = transcode_tables("a|b\r\n:-:|-:\r\n1|2\r\n");
        assert!(html.contains("<th style=\"text-align:center\">a</th>"));
        assert!(html.contains("<td style=\"text-align:right\">2</td>"));
    }
}
