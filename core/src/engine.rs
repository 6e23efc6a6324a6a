// core/src/engine.rs
//
// Generic comparison engine that works with any orthography.
// Language crates supply the `Orthography`; everything else is shared.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::char_align::{CharacterAligner, CharacterAlignment};
use crate::orthography::Orthography;
use crate::result::{assemble, ComparisonResult};
use crate::similarity::SimilarityScorer;
use crate::word_align::{MatchStatus, Word, WordAligner};
use crate::CompareConfig;

/// Per-call options supplied by the caller.
///
/// The engine keeps no state between calls; anything that depends on
/// timing (e.g. "the segment only just changed") is decided by the caller
/// and passed in here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallOptions {
    /// Never report `autoAdvance`, even for a complete answer.
    pub suppress_auto_advance: bool,
    /// Echoed into the result so stale results can be discarded.
    pub sequence: Option<u64>,
}

/// Comparison engine combining a configuration with an orthography.
///
/// Type parameter O is the language's orthography (e.g. `German` from
/// libgerman, or `PlainOrthography`).
///
/// Holds no mutable state, so a shared reference can be used from several
/// threads at once.
pub struct Comparator<O> {
    config: CompareConfig,
    orthography: O,
}

impl<O: Orthography> Comparator<O> {
    /// Create an engine. Unusable configuration values are repaired (see
    /// `CompareConfig::sanitized`) rather than rejected.
    pub fn new(config: CompareConfig, orthography: O) -> Self {
        Self {
            config: config.sanitized(),
            orthography,
        }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    pub fn orthography(&self) -> &O {
        &self.orthography
    }

    pub fn scorer(&self) -> SimilarityScorer<'_, O> {
        SimilarityScorer::new(&self.config, &self.orthography)
    }

    /// Split `text` on whitespace, dropping tokens that normalize to nothing
    /// (stray punctuation). Indices count the kept tokens.
    pub fn tokenize(&self, text: &str) -> Vec<Word> {
        text.split_whitespace()
            .filter(|t| !self.orthography.normalize_word(t).is_empty())
            .enumerate()
            .map(|(i, t)| Word::new(t, i))
            .collect()
    }

    /// Compare what was typed against the reference sentence.
    pub fn compare(&self, reference: &str, input: &str) -> ComparisonResult {
        self.compare_with(reference, input, &CallOptions::default())
    }

    /// Compare with explicit per-call options.
    ///
    /// This implements the full pipeline:
    /// 1. Tokenize both texts
    /// 2. Greedy word alignment with the similarity scorer
    /// 3. Character alignment for every misspelled pair
    /// 4. Statistics and completion flags
    pub fn compare_with(
        &self,
        reference: &str,
        input: &str,
        options: &CallOptions,
    ) -> ComparisonResult {
        let reference_words = self.tokenize(reference);
        let input_words = self.tokenize(input);

        let aligner = WordAligner::new(self.scorer());
        let mut alignment = aligner.align(&reference_words, &input_words);

        for m in alignment.words.iter_mut() {
            if m.status != MatchStatus::Misspelled {
                continue;
            }
            if let (Some(expected), Some(actual)) = (&m.expected, &m.actual) {
                m.characters = Some(self.align_characters(&actual.text, &expected.text));
            }
        }

        let mut result = assemble(alignment.words, alignment.extra_words, input, reference);
        result.auto_advance = result.is_complete && !options.suppress_auto_advance;
        result.sequence = options.sequence;

        debug!(
            "compare: {} correct, {} misspelled, {} missing, {} extra (seq {:?})",
            result.stats.correct,
            result.stats.misspelled,
            result.stats.missing,
            result.stats.extra,
            result.sequence
        );

        result
    }

    /// Letter-level alignment of one typed word against its reference word.
    pub fn align_characters(&self, input: &str, reference: &str) -> CharacterAlignment {
        CharacterAligner::new(&self.orthography, self.config.case_sensitive)
            .align_characters(input, reference)
    }
}
