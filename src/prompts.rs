//! Prompts for summary and question generation.
//!
//! Output language is fixed to Brazilian Portuguese, and the question format
//! here is the contract that [`crate::pipeline::answer_key`] parses: numbered
//! questions, `a)`–`d)` options, and the literal `(correta)` marker.
//!
//! Inputs are truncated by characters (not bytes) so a multi-byte character
//! is never split.

/// Default number of extracted characters sent to the summary prompt.
pub const DEFAULT_SUMMARY_INPUT_CHARS: usize = 30_000;

/// Default number of summary characters sent to the question prompt.
pub const DEFAULT_QUESTION_INPUT_CHARS: usize = 20_000;

/// Number of questions requested.
pub const QUESTION_COUNT: usize = 10;

const SUMMARY_TEMPLATE: &str = r#"Crie um resumo acadêmico detalhado do seguinte texto,
organizando as informações em tópicos lógicos e destacando:
- Conceitos fundamentais
- Definições importantes
- Relações entre ideias
- Exemplos relevantes

O resumo deve ser completo o suficiente para servir como material de estudo autônomo.
Use Markdown: títulos com #, listas com -, **negrito** para termos-chave e
tabelas no formato | coluna | coluna | quando comparar conceitos.

Texto:
{text}"#;

const QUESTIONS_TEMPLATE: &str = r#"Com base no seguinte resumo, crie EXATAMENTE {count} questões de múltipla escolha seguindo ESTE FORMATO:

1. [Enunciado claro da questão]
a) [Alternativa A] (correta)
b) [Alternativa B]
c) [Alternativa C]
d) [Alternativa D]

REGRAS:
1. Cada questão deve ter 4 alternativas
2. Apenas UMA alternativa correta por questão, marcada com "(correta)"
3. A marcação (correta) deve aparecer SEMPRE ao lado da alternativa correta, exatamente assim: "a) conteúdo da alternativa (correta)"
4. Alternativas erradas devem ser plausíveis
5. Varie a posição da alternativa correta
6. Foque nos conceitos mais importantes do resumo
7. Não use "Todas as anteriores" ou "Nenhuma das anteriores"
8. Responda apenas com as questões, sem introdução nem comentários

Resumo:
{summary}"#;

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Summary-authoring prompt for the extracted document text.
pub fn summary_prompt(text: &str, max_chars: usize) -> String {
    SUMMARY_TEMPLATE.replace("{text}", truncate_chars(text, max_chars))
}

/// Question-authoring prompt for a generated summary.
pub fn questions_prompt(summary: &str, max_chars: usize) -> String {
    QUESTIONS_TEMPLATE
        .replace("{count}", &QUESTION_COUNT.to_string())
        .replace("{summary}", truncate_chars(summary, max_chars))
}
