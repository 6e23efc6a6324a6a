// core/src/result.rs
//
// The object handed to the presentation layer after every comparison.

use serde::{Deserialize, Serialize};

use crate::word_align::{MatchStatus, WordMatch};

/// Counts by status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub correct: usize,
    pub misspelled: usize,
    pub missing: usize,
    pub extra: usize,
    /// `correct / reference word count`, 0 without reference words.
    pub accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub words: Vec<WordMatch>,
    pub extra_words: Vec<WordMatch>,
    pub stats: Stats,
    pub input_text: String,
    pub reference_text: String,
    /// Every reference word correct and nothing extra.
    pub is_complete: bool,
    /// Whether the caller may move on to the next segment.
    pub auto_advance: bool,
    /// Caller-supplied sequence number, echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
}

impl ComparisonResult {
    pub fn with_status(&self, status: MatchStatus) -> impl Iterator<Item = &WordMatch> {
        self.words
            .iter()
            .chain(self.extra_words.iter())
            .filter(move |m| m.status == status)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Package word matches into a result and compute the statistics.
pub fn assemble(
    words: Vec<WordMatch>,
    extra_words: Vec<WordMatch>,
    input_text: &str,
    reference_text: &str,
) -> ComparisonResult {
    let mut stats = Stats::default();
    for m in &words {
        match m.status {
            MatchStatus::Correct => stats.correct += 1,
            MatchStatus::Misspelled => stats.misspelled += 1,
            MatchStatus::Missing => stats.missing += 1,
            MatchStatus::Extra => stats.extra += 1,
        }
    }
    stats.extra += extra_words.len();
    stats.accuracy = if words.is_empty() {
        0.0
    } else {
        stats.correct as f64 / words.len() as f64
    };

    let is_complete = !words.is_empty() && stats.correct == words.len() && extra_words.is_empty();

    ComparisonResult {
        words,
        extra_words,
        stats,
        input_text: input_text.to_string(),
        reference_text: reference_text.to_string(),
        is_complete,
        auto_advance: is_complete,
        sequence: None,
    }
}
