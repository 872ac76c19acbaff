// WHY: Quote-aware sentence segmentation with an explicit state machine
// A unit only closes when the scan position is outside all quoted content,
// so punctuation inside dialog never produces a break

use tracing::{debug, info};

use super::{collapse_separator_runs, SegmenterRules};

/// Quote state carried across the scan
///
/// Paired curly quotes use a nesting counter; the straight double-quote reuses
/// one glyph for open and close, so it can only be tracked as a toggle. Every
/// `"` flips the toggle regardless of pairing validity — a text with an odd
/// number of straight quotes ends in the open state and the remainder is
/// emitted as one unit.
#[derive(Debug, Clone, Copy, Default)]
struct QuoteState {
    nesting: usize,
    straight_open: bool,
}

impl QuoteState {
    fn update(&mut self, ch: char, rules: &SegmenterRules) {
        if rules.is_opening_quote(ch) {
            self.nesting += 1;
        } else if rules.is_closing_quote(ch) {
            // Stray closers clamp at zero rather than underflow
            self.nesting = self.nesting.saturating_sub(1);
        } else if rules.is_symmetric_quote(ch) {
            self.straight_open = !self.straight_open;
        }
    }

    fn is_closed(&self) -> bool {
        self.nesting == 0 && !self.straight_open
    }
}

/// Quote-aware segmenter — the published default strategy
pub struct QuoteAwareSegmenter {
    rules: SegmenterRules,
}

impl QuoteAwareSegmenter {
    /// Create a segmenter with custom rules
    pub fn new(rules: SegmenterRules) -> Self {
        Self { rules }
    }

    /// Create a segmenter with the default punctuation and quote sets
    pub fn with_default_rules() -> Self {
        Self::new(SegmenterRules::default())
    }

    /// Segment text into one sentence unit per paragraph, joined by `\n\n`
    pub fn segment(&self, text: &str) -> String {
        collapse_separator_runs(&self.segment_units(text).join("\n\n"))
    }

    /// Segment text into an ordered sequence of trimmed, non-empty units
    ///
    /// Single left-to-right pass over code points with greedy one-lookahead
    /// consumption; the cursor never revisits a position.
    pub fn segment_units(&self, text: &str) -> Vec<String> {
        debug!("Starting quote-aware segmentation on {} characters", text.chars().count());

        let mut units = Vec::new();
        let mut buffer = String::new();
        let mut state = QuoteState::default();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            buffer.push(ch);
            state.update(ch, &self.rules);

            if !self.rules.is_terminal(ch) {
                continue;
            }

            // Consume the rest of the punctuation run (e.g. "!!!", "?!", "。。。")
            // so the run stays a single boundary event
            while let Some(&next) = chars.peek() {
                if !self.rules.is_terminal(next) {
                    break;
                }
                buffer.push(next);
                chars.next();
            }

            // Consume closing delimiters riding on the punctuation; a consumed
            // closer can legitimately close an open quote, so the quote state
            // is updated for each one
            while let Some(&next) = chars.peek() {
                if !self.rules.is_trailing_delimiter(next) {
                    break;
                }
                buffer.push(next);
                state.update(next, &self.rules);
                chars.next();
            }

            if state.is_closed() {
                let unit = buffer.trim();
                if !unit.is_empty() {
                    units.push(unit.to_string());
                }
                buffer.clear();
            }
            // Otherwise the punctuation sits inside quoted content: keep
            // scanning and retain it in the buffer
        }

        // Trailing text with no terminal punctuation becomes the final unit
        let remainder = buffer.trim();
        if !remainder.is_empty() {
            units.push(remainder.to_string());
        }

        info!("Segmented into {} sentence units", units.len());
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> String {
        QuoteAwareSegmenter::with_default_rules().segment(text)
    }

    fn units(text: &str) -> Vec<String> {
        QuoteAwareSegmenter::with_default_rules().segment_units(text)
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(segment("Hi. Bye."), "Hi.\n\nBye.");
        assert_eq!(
            segment("First sentence. Second sentence! Third?"),
            "First sentence.\n\nSecond sentence!\n\nThird?"
        );
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(segment(""), "");
        assert_eq!(segment("   \n  \t  "), "");
    }

    #[test]
    fn test_no_terminal_punctuation_yields_trimmed_whole() {
        assert_eq!(segment("  just a fragment  "), "just a fragment");
        assert_eq!(units("just a fragment").len(), 1);
    }

    #[test]
    fn test_punctuation_run_stays_whole() {
        assert_eq!(segment("Wow!!! Really?"), "Wow!!!\n\nReally?");
        assert_eq!(segment("What?! No way."), "What?!\n\nNo way.");
        assert_eq!(segment("真的。。。好吧。"), "真的。。。\n\n好吧。");
    }

    #[test]
    fn test_straight_quote_protection() {
        let result = segment("He said, \"Stop. Wait.\" Then left.");
        assert_eq!(result, "He said, \"Stop. Wait.\"\n\nThen left.");
    }

    #[test]
    fn test_curly_quote_protection() {
        let result = segment("她说：“先别动。等一下。”然后走了。");
        assert_eq!(result, "她说：“先别动。等一下。”\n\n然后走了。");
    }

    #[test]
    fn test_nested_quotes_close_together() {
        // Inner close only drops nesting to one; the unit closes at the outer close
        let text = "\u{201C}He said \u{2018}Go.\u{2019} now.\u{201D} Done.";
        let result = units(text);
        assert_eq!(result.len(), 2, "Nested quotes should protect the inner boundary");
        assert_eq!(result[0], "\u{201C}He said \u{2018}Go.\u{2019} now.\u{201D}");
        assert_eq!(result[1], "Done.");
    }

    #[test]
    fn test_closing_delimiter_rides_along() {
        let result = units("He asked, \"Are you ready?\" The game began.");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], "He asked, \"Are you ready?\"");
        assert_eq!(result[1], "The game began.");
        // No unit ever starts with a bare closing mark
        for unit in &result {
            assert!(!unit.starts_with('"'), "Unit must not start with a bare closer: {unit}");
        }
    }

    #[test]
    fn test_fullwidth_delimiters_ride_along() {
        assert_eq!(segment("（好。）然后呢？"), "（好。）\n\n然后呢？");
        assert_eq!(segment("【完了。】下一个。"), "【完了。】\n\n下一个。");
    }

    #[test]
    fn test_rider_closing_quote_reopens_nothing() {
        // A bare closing quote after punctuation with no matching opener:
        // nesting clamps at zero and the unit still closes
        let result = units("Stop.\u{201D} Next.");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], "Stop.\u{201D}");
        assert_eq!(result[1], "Next.");
    }

    #[test]
    fn test_unmatched_closers_do_not_panic() {
        let result = segment("””” Stop.”” Done.");
        assert!(!result.is_empty());
    }

    #[test]
    fn test_odd_straight_quote_count_keeps_remainder_whole() {
        // Documented toggle behavior: the leading closer-less quote opens the
        // toggle, so nothing after it splits
        let result = units("Really?\" he asked. Nobody answered.");
        assert_eq!(result.len(), 1, "Odd straight-quote count leaves the toggle open");
        assert_eq!(result[0], "Really?\" he asked. Nobody answered.");
    }

    #[test]
    fn test_mixed_cjk_ascii_punctuation() {
        assert_eq!(segment("今天。Really?"), "今天。\n\nReally?");
        assert_eq!(segment("你好！How are you? 很好。"), "你好！\n\nHow are you?\n\n很好。");
    }

    #[test]
    fn test_unterminated_quote_spans_whole_input() {
        let text = "\u{201C}He never stopped. Talking. At all";
        assert_eq!(units(text).len(), 1, "Unterminated quote keeps everything in one unit");
    }

    #[test]
    fn test_trailing_text_after_last_boundary() {
        assert_eq!(segment("Done. and then"), "Done.\n\nand then");
    }

    #[test]
    fn test_interior_blank_lines_never_exceed_separator() {
        let result = segment("He said,\n\n\n\n\"Stop. Wait.\" Done.");
        assert!(!result.contains("\n\n\n"), "Output must never contain 3+ consecutive newlines");
    }

    #[test]
    fn test_stable_under_reapplication() {
        let inputs = [
            "Wow!!! Really? Yes.",
            "He said, \"Stop. Wait.\" Then left.",
            "今天。Really?",
            "no punctuation at all",
        ];
        for input in inputs {
            let once = segment(input);
            let twice = segment(&once);
            assert_eq!(once, twice, "Re-segmenting own output must be stable for: {input}");
        }
    }
}
