// core/src/word_align.rs
//
// Word-level alignment between the reference sentence and what was typed.
//
// Greedy per reference word: each reference word, in reference order, takes
// the best-scoring input word still in the pool. Typing order does not need
// to follow reference order. The first maximum in pool order wins ties, so
// results are deterministic for a given input, though not globally optimal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::char_align::CharacterAlignment;
use crate::orthography::Orthography;
use crate::similarity::{SimilarityScorer, CASE_INSENSITIVE_SCORE};

/// Score at or above which a matched pair counts as correct.
pub const CORRECT_THRESHOLD: f64 = CASE_INSENSITIVE_SCORE;

/// A word as it appeared in its source sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// 0-based position in the reference or input sequence.
    pub index: usize,
}

impl Word {
    pub fn new<T: Into<String>>(text: T, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }
}

/// Classification of a word pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Correct,
    Misspelled,
    Missing,
    Extra,
}

/// One reference word with the input word it was matched to, or a leftover
/// input word.
///
/// `expected` is absent only for `Extra`; `actual` is absent only for
/// `Missing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMatch {
    pub expected: Option<Word>,
    pub actual: Option<Word>,
    pub status: MatchStatus,
    pub similarity: f64,
    /// Letter-level alignment, present for misspelled words only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<CharacterAlignment>,
}

impl WordMatch {
    /// A matched pair; status follows from the score.
    pub fn matched(expected: Word, actual: Word, similarity: f64) -> Self {
        let status = if similarity >= CORRECT_THRESHOLD {
            MatchStatus::Correct
        } else {
            MatchStatus::Misspelled
        };
        Self {
            expected: Some(expected),
            actual: Some(actual),
            status,
            similarity,
            characters: None,
        }
    }

    pub fn missing(expected: Word) -> Self {
        Self {
            expected: Some(expected),
            actual: None,
            status: MatchStatus::Missing,
            similarity: 0.0,
            characters: None,
        }
    }

    pub fn extra(actual: Word) -> Self {
        Self {
            expected: None,
            actual: Some(actual),
            status: MatchStatus::Extra,
            similarity: 0.0,
            characters: None,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.status == MatchStatus::Correct
    }
}

/// Output of `WordAligner::align`: one entry per reference word, in
/// reference order, plus leftover input words in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordAlignment {
    pub words: Vec<WordMatch>,
    pub extra_words: Vec<WordMatch>,
}

pub struct WordAligner<'a, O: ?Sized> {
    scorer: SimilarityScorer<'a, O>,
}

impl<'a, O: Orthography + ?Sized> WordAligner<'a, O> {
    pub fn new(scorer: SimilarityScorer<'a, O>) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &SimilarityScorer<'a, O> {
        &self.scorer
    }

    /// Match every reference word against the pool of unconsumed input words.
    pub fn align(&self, reference: &[Word], input: &[Word]) -> WordAlignment {
        if reference.is_empty() {
            return WordAlignment::default();
        }

        // (input word, its normalized form); order is the tie-break order
        let mut pool: Vec<(&Word, String)> = input
            .iter()
            .map(|w| (w, self.scorer.normalize(&w.text)))
            .collect();

        let mut words = Vec::with_capacity(reference.len());

        for expected in reference {
            let expected_norm = self.scorer.normalize(&expected.text);

            let mut best: Option<(usize, f64)> = None;
            for (pos, (_, actual_norm)) in pool.iter().enumerate() {
                let score = self.scorer.score_normalized(&expected_norm, actual_norm);
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((pos, score));
                }
            }

            // the scorer reports sub-threshold pairs as 0
            match best {
                Some((pos, score)) if score > 0.0 => {
                    let (actual, _) = pool.remove(pos);
                    debug!(
                        "matched {:?} -> {:?} ({:.3})",
                        expected.text, actual.text, score
                    );
                    words.push(WordMatch::matched(expected.clone(), actual.clone(), score));
                }
                _ => {
                    debug!("no match for {:?}", expected.text);
                    words.push(WordMatch::missing(expected.clone()));
                }
            }
        }

        let extra_words = pool
            .into_iter()
            .map(|(w, _)| WordMatch::extra(w.clone()))
            .collect();

        WordAlignment { words, extra_words }
    }
}
