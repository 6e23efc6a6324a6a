// core/src/orthography.rs
//
// Language seam: everything that depends on the target language's spelling
// conventions sits behind `Orthography`, so the aligners stay generic.

use tracing::warn;

use crate::text::{self, Cells, MappedText};

/// Spelling conventions of a target language.
///
/// Implementations must be pure: the engine calls them from concurrent
/// comparisons and on every keystroke.
pub trait Orthography: Send + Sync {
    /// Canonicalize `text`. Must be idempotent and must never fail; on an
    /// internal problem return `text` unchanged.
    fn normalize(&self, text: &str, preserve_case: bool) -> String;

    /// Same transform as `normalize`, additionally reporting where every
    /// original character ended up.
    fn normalize_mapped(&self, word: &str, preserve_case: bool) -> MappedText;

    /// Lowercased normalization used for scoring.
    fn normalize_word(&self, word: &str) -> String {
        self.normalize(word, false)
    }

    /// Additive bonus for language-specific typo patterns of `actual` versus
    /// `expected` (both already normalized). The scorer caps the total.
    fn typo_bonus(&self, _expected: &str, _actual: &str) -> f64 {
        0.0
    }

    /// When `input` equals `reference` except for a simplified consonant
    /// cluster at the start, return the reference index of the single letter
    /// the learner left out.
    fn leading_cluster_gap(&self, _input: &str, _reference: &str) -> Option<usize> {
        None
    }
}

/// Language-neutral orthography: NFC composition, punctuation stripping,
/// whitespace collapse and case folding. No notation expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainOrthography;

impl PlainOrthography {
    fn pipeline(cells: &Cells, preserve_case: bool) -> Cells {
        let composed = text::compose_marks(cells);
        let stripped = text::strip_punctuation(&composed);
        text::fold_case(&stripped, preserve_case)
    }
}

impl Orthography for PlainOrthography {
    fn normalize(&self, text: &str, preserve_case: bool) -> String {
        self.normalize_mapped(text, preserve_case).text
    }

    fn normalize_mapped(&self, word: &str, preserve_case: bool) -> MappedText {
        let original_len = word.chars().count();
        match text::run_to_fixpoint(Cells::from_text(word), |c| {
            Self::pipeline(c, preserve_case)
        }) {
            Ok(cells) => cells.into_mapped(original_len),
            Err(e) => {
                warn!("normalization fallback for {:?}: {}", word, e);
                MappedText::identity(word)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_normalize_folds_case_and_punctuation() {
        let o = PlainOrthography;
        assert_eq!(o.normalize("Hello, World!", false), "hello world");
        assert_eq!(o.normalize("Hello, World!", true), "Hello World");
        assert_eq!(o.normalize_word("Don't"), "dont");
    }

    #[test]
    fn plain_orthography_has_no_bonus() {
        let o = PlainOrthography;
        assert_eq!(o.typo_bonus("haus", "hause"), 0.0);
        assert_eq!(o.leading_cluster_gap("shule", "schule"), None);
    }
}
