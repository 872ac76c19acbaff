// WHY: Strategy selection as a plain sum type with the fallback rule at the
// call site, replacing any notion of swappable service objects

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::segmenter::{count_terminators, segment, SegmentStrategy};
use crate::smart::SmartFormatter;

/// Formatting strategy selected by the caller
///
/// Uniform `text -> formatted text` signature; only the delegated variant can
/// fail. The local variant carries its own splitter choice.
pub enum FormatStrategy {
    Basic(SegmentStrategy),
    Smart(SmartFormatter),
}

impl FormatStrategy {
    /// Format text with the selected strategy
    pub async fn format(&self, text: &str) -> Result<String> {
        match self {
            FormatStrategy::Basic(strategy) => Ok(strategy.segment(text)),
            FormatStrategy::Smart(formatter) => formatter.format(text).await,
        }
    }

    /// Format text, deterministically falling back to local quote-aware
    /// segmentation when the delegated path fails
    pub async fn format_with_fallback(&self, text: &str) -> FormatOutcome {
        match self.format(text).await {
            Ok(formatted) => FormatOutcome {
                text: formatted,
                fell_back: false,
            },
            Err(error) => {
                warn!("Smart formatting failed, falling back to local segmentation: {error:#}");
                FormatOutcome {
                    text: segment(text),
                    fell_back: true,
                }
            }
        }
    }
}

/// Result of a formatting run, recording whether fallback occurred
/// so the shell can surface a user-facing notice
#[derive(Debug, Clone)]
pub struct FormatOutcome {
    pub text: String,
    pub fell_back: bool,
}

/// Display statistics for one formatting invocation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FormatStats {
    /// Characters in the input text
    pub original_chars: u64,
    /// Characters in the formatted text
    pub formatted_chars: u64,
    /// Terminal-punctuation boundaries in the input (cosmetic count)
    pub sentences: u64,
    /// Non-empty blocks in the formatted text, split on the `\n\n` convention
    pub paragraphs: u64,
}

impl FormatStats {
    pub fn compute(original: &str, formatted: &str) -> Self {
        Self {
            original_chars: original.chars().count() as u64,
            formatted_chars: formatted.chars().count() as u64,
            sentences: count_terminators(original) as u64,
            paragraphs: paragraph_count(formatted) as u64,
        }
    }
}

/// Count non-empty blocks separated by the `\n\n` convention
pub fn paragraph_count(text: &str) -> usize {
    text.split("\n\n").filter(|b| !b.trim().is_empty()).count()
}
