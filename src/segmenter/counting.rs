// WHY: Display-only sentence counting, kept apart from segmentation
// Regex-style and quote-unaware; trailing closers extend a match but can
// never create or merge runs, so they do not change the count

use std::sync::OnceLock;

use regex_automata::meta::Regex;

const TERMINATOR_PATTERN: &str = r#"[。.?？!！]+[”"’')）\]】]*"#;

fn terminator_regex() -> &'static Regex {
    static TERMINATOR: OnceLock<Regex> = OnceLock::new();
    TERMINATOR.get_or_init(|| Regex::new(TERMINATOR_PATTERN).expect("terminator pattern compiles"))
}

/// Count terminal-punctuation boundaries in text
///
/// Cosmetic statistic for display; segmentation never consults it.
pub fn count_terminators(text: &str) -> usize {
    terminator_regex().find_iter(text).count()
}
