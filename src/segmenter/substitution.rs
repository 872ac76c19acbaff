// WHY: Substitution-based splitting without quote tracking
// Reproduces the earlier whole-text behavior: every terminal-punctuation run
// (plus trailing closers) becomes a boundary, quoted or not

use std::sync::OnceLock;

use regex_automata::meta::Regex;
use tracing::debug;

use super::collapse_separator_runs;

/// Terminal-punctuation run with any closing delimiters riding on it
const BOUNDARY_PATTERN: &str = r#"[。.?？!！]+[”"’')）\]】]*"#;

fn boundary_regex() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(BOUNDARY_PATTERN).expect("boundary pattern compiles"))
}

/// Segment text by boundary substitution, ignoring quote nesting
///
/// Inserts the `\n\n` separator after every boundary match, consuming the
/// whitespace that followed it, then collapses any 3+ newline runs carried
/// over from the source text. Not quote-aware: punctuation inside quoted
/// spans splits like any other.
pub fn segment_substitution(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(text.len() + 16);
    let mut cursor = 0usize;

    for m in boundary_regex().find_iter(text) {
        result.push_str(&text[cursor..m.end()]);
        result.push_str("\n\n");

        // The inserted separator replaces whatever whitespace followed the
        // boundary, so blocks never start with stray spaces
        let rest = &text[m.end()..];
        cursor = m.end()
            + rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
    }

    result.push_str(&text[cursor..]);

    let cleaned = collapse_separator_runs(result.trim());
    debug!("Substitution splitter produced {} characters", cleaned.chars().count());
    cleaned
}
