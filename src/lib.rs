pub mod formatter;
pub mod segmenter;
pub mod smart;

// Re-export main types for convenient access
pub use segmenter::{
    count_terminators, segment, QuoteAwareSegmenter, SegmentStrategy, SegmenterRules,
};

pub use formatter::{paragraph_count, FormatOutcome, FormatStats, FormatStrategy};

pub use smart::{SmartConfig, SmartFormatter};
