//! Keyword-count sentiment classification.
//!
//! Two fixed keyword lists are matched case-insensitively against the input
//! text. Every non-overlapping occurrence of every keyword counts once; the
//! polarity with the larger total wins and a tie (including no hits at all)
//! is neutral.
//!
//! # Matching
//!
//! The default [`MatchMode::Substring`] counts a keyword wherever it appears,
//! including inside longer words ("war" in "warm", "win" in "wind"). This
//! looseness is kept as the default. [`MatchMode::WordBoundary`] only counts
//! whole-word hits and is opt-in through configuration.

use crate::models::Sentiment;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

pub const POSITIVE_KEYWORDS: [&str; 20] = [
    "breakthrough",
    "success",
    "win",
    "victory",
    "growth",
    "profit",
    "recovery",
    "improve",
    "better",
    "positive",
    "good",
    "great",
    "excellent",
    "amazing",
    "innovation",
    "discovery",
    "achievement",
    "milestone",
    "record",
    "high",
];

pub const NEGATIVE_KEYWORDS: [&str; 20] = [
    "crisis",
    "disaster",
    "crash",
    "fall",
    "decline",
    "loss",
    "failure",
    "negative",
    "bad",
    "terrible",
    "awful",
    "worst",
    "deadly",
    "fatal",
    "attack",
    "war",
    "conflict",
    "protest",
    "strike",
    "bankruptcy",
];

/// How a keyword has to appear in the text to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Substring,
    WordBoundary,
}

/// Per-polarity hit counts for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentimentScore {
    pub positive: usize,
    pub negative: usize,
}

impl SentimentScore {
    pub fn label(&self) -> Sentiment {
        if self.positive > self.negative {
            Sentiment::Positive
        } else if self.negative > self.positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Compiled keyword matchers for one [`MatchMode`].
#[derive(Debug)]
pub struct SentimentScorer {
    mode: MatchMode,
    positive: Vec<Regex>,
    negative: Vec<Regex>,
}

static SUBSTRING_SCORER: Lazy<SentimentScorer> =
    Lazy::new(|| SentimentScorer::build(MatchMode::Substring));
static WORD_SCORER: Lazy<SentimentScorer> =
    Lazy::new(|| SentimentScorer::build(MatchMode::WordBoundary));

impl SentimentScorer {
    /// Shared scorer for `mode`; the matchers are compiled once per process.
    pub fn for_mode(mode: MatchMode) -> &'static SentimentScorer {
        match mode {
            MatchMode::Substring => &*SUBSTRING_SCORER,
            MatchMode::WordBoundary => &*WORD_SCORER,
        }
    }

    fn build(mode: MatchMode) -> Self {
        let compile = |words: &[&str]| -> Vec<Regex> {
            words
                .iter()
                .map(|word| {
                    let escaped = regex::escape(word);
                    let pattern = match mode {
                        MatchMode::Substring => escaped,
                        MatchMode::WordBoundary => format!(r"\b{escaped}\b"),
                    };
                    // Keywords are literal lowercase ASCII, so the pattern is always valid.
                    RegexBuilder::new(&pattern)
                        .case_insensitive(true)
                        .build()
                        .expect("keyword pattern compiles")
                })
                .collect()
        };

        Self {
            mode,
            positive: compile(&POSITIVE_KEYWORDS),
            negative: compile(&NEGATIVE_KEYWORDS),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Count keyword hits per polarity.
    pub fn score(&self, text: &str) -> SentimentScore {
        let count = |set: &[Regex]| set.iter().map(|re| re.find_iter(text).count()).sum();
        SentimentScore {
            positive: count(&self.positive),
            negative: count(&self.negative),
        }
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        self.score(text).label()
    }
}

/// Classify `text` with the default substring matching.
pub fn classify(text: &str) -> Sentiment {
    SentimentScorer::for_mode(MatchMode::Substring).classify(text)
}
