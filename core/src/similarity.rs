//! Word similarity scoring.
//!
//! `SimilarityScorer::score` compares an expected word with a typed word and
//! returns a value in `[0, 1]`. Rules are tried in order and the first that
//! applies decides:
//!
//! 1. exact match after normalization -> 1.0
//! 2. case-insensitive match -> 0.95
//! 3. one word contains the other (compound typed abbreviated) -> ratio-scaled
//! 4. keyboard-aware edit distance, plus a capped language typo bonus
//!
//! Fuzzy scores never reach 1.0, and anything below the length-adjusted
//! threshold is reported as 0 (no match).

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::distance::weighted_levenshtein;
use crate::orthography::Orthography;
use crate::CompareConfig;

pub const EXACT_SCORE: f64 = 1.0;
pub const CASE_INSENSITIVE_SCORE: f64 = 0.95;

/// Ceiling for every score that is not an exact or case-insensitive match.
pub const MAX_FUZZY_SCORE: f64 = 0.99;

/// Cap on the summed language typo bonus.
pub const MAX_TYPO_BONUS: f64 = 0.15;

/// Shortest contained/containing length ratio the substring rule accepts.
pub const MIN_SUBSTRING_RATIO: f64 = 0.3;

/// Lowest score the substring rule may produce; below it the pair falls
/// through to edit distance.
pub const MIN_SUBSTRING_SCORE: f64 = 0.7;

const SUBSTRING_BASE: f64 = 0.5;
const SUBSTRING_WEIGHT: f64 = 0.5;

/// Which scoring rule produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchRule {
    Exact,
    CaseInsensitive,
    Substring,
    EditDistance,
    /// One of the words normalized to nothing.
    Empty,
}

/// Breakdown of a single scoring decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    pub rule: MatchRule,
    /// Score of the rule before any bonus.
    pub raw: f64,
    /// Typo-pattern bonus added (already capped).
    pub bonus: f64,
    /// Length-adjusted threshold that applied.
    pub threshold: f64,
    /// Final score; 0 when below `threshold`.
    pub score: f64,
}

impl ScoreDetail {
    pub fn is_match(&self) -> bool {
        self.score > 0.0
    }
}

/// Scores word pairs under a configuration and an orthography.
pub struct SimilarityScorer<'a, O: ?Sized> {
    config: &'a CompareConfig,
    orthography: &'a O,
}

impl<'a, O: Orthography + ?Sized> SimilarityScorer<'a, O> {
    pub fn new(config: &'a CompareConfig, orthography: &'a O) -> Self {
        Self {
            config,
            orthography,
        }
    }

    pub fn config(&self) -> &CompareConfig {
        self.config
    }

    /// Normalize a word the way scoring sees it.
    pub fn normalize(&self, word: &str) -> String {
        self.orthography.normalize(word, self.config.case_sensitive)
    }

    /// Score raw words (normalized internally).
    pub fn score(&self, expected: &str, actual: &str) -> f64 {
        self.explain(expected, actual).score
    }

    /// Score raw words and report which rule decided.
    pub fn explain(&self, expected: &str, actual: &str) -> ScoreDetail {
        let a = self.normalize(expected);
        let b = self.normalize(actual);
        self.explain_normalized(&a, &b)
    }

    /// Score words that are already normalized.
    pub fn score_normalized(&self, expected: &str, actual: &str) -> f64 {
        self.explain_normalized(expected, actual).score
    }

    pub fn explain_normalized(&self, expected: &str, actual: &str) -> ScoreDetail {
        let threshold = self.config.threshold_for(expected.chars().count());

        if expected.is_empty() || actual.is_empty() {
            return ScoreDetail {
                rule: MatchRule::Empty,
                raw: 0.0,
                bonus: 0.0,
                threshold,
                score: 0.0,
            };
        }

        let (rule, raw, bonus) = if expected == actual {
            (MatchRule::Exact, EXACT_SCORE, 0.0)
        } else if expected.to_lowercase() == actual.to_lowercase() {
            (MatchRule::CaseInsensitive, CASE_INSENSITIVE_SCORE, 0.0)
        } else if let Some(s) = substring_score(expected, actual) {
            (MatchRule::Substring, s, 0.0)
        } else {
            let raw = self.edit_similarity(expected, actual);
            let bonus = if self.config.use_typo_pattern_bonus {
                self.orthography
                    .typo_bonus(expected, actual)
                    .clamp(0.0, MAX_TYPO_BONUS)
            } else {
                0.0
            };
            (MatchRule::EditDistance, raw, bonus)
        };

        let mut score = match rule {
            MatchRule::Exact | MatchRule::CaseInsensitive => raw,
            _ => (raw + bonus).min(MAX_FUZZY_SCORE),
        };
        if score < threshold {
            score = 0.0;
        }

        trace!(
            "score {:?} vs {:?}: {:?} raw={:.3} bonus={:.3} threshold={:.3} -> {:.3}",
            expected,
            actual,
            rule,
            raw,
            bonus,
            threshold,
            score
        );

        ScoreDetail {
            rule,
            raw,
            bonus,
            threshold,
            score,
        }
    }

    /// `1 - distance / max_len`, keyboard-aware when proximity is enabled.
    fn edit_similarity(&self, a: &str, b: &str) -> f64 {
        let max_len = a.chars().count().max(b.chars().count());
        if max_len == 0 {
            return 1.0;
        }
        let distance = match self.config.effective_layout() {
            Some(layout) => weighted_levenshtein(a, b, Some(layout)),
            None => strsim::levenshtein(a, b) as f64,
        };
        (1.0 - distance / max_len as f64).max(0.0)
    }
}

/// Ratio-scaled score when one word fully contains the other.
fn substring_score(a: &str, b: &str) -> Option<f64> {
    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    let (short, short_len, long, long_len) = if a_len <= b_len {
        (a, a_len, b, b_len)
    } else {
        (b, b_len, a, a_len)
    };
    if !long.contains(short) {
        return None;
    }
    let ratio = short_len as f64 / long_len as f64;
    if ratio < MIN_SUBSTRING_RATIO {
        return None;
    }
    let score = SUBSTRING_BASE + SUBSTRING_WEIGHT * ratio;
    (score >= MIN_SUBSTRING_SCORE).then_some(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyboardLayout, PlainOrthography};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn exact_and_case_rules() {
        let cfg = CompareConfig::default();
        let scorer = SimilarityScorer::new(&cfg, &PlainOrthography);
        assert_eq!(scorer.score("Haus", "haus"), 1.0);
        assert_eq!(scorer.explain("Haus", "haus").rule, MatchRule::Exact);

        let mut cs = CompareConfig::default();
        cs.case_sensitive = true;
        let scorer = SimilarityScorer::new(&cs, &PlainOrthography);
        let detail = scorer.explain("Haus", "haus");
        assert_eq!(detail.rule, MatchRule::CaseInsensitive);
        assert_eq!(detail.score, 0.95);
    }

    #[test]
    fn substring_rule_handles_repeated_letters() {
        let cfg = CompareConfig::default();
        let scorer = SimilarityScorer::new(&cfg, &PlainOrthography);
        let d = scorer.explain("es", "esss");
        assert_eq!(d.rule, MatchRule::Substring);
        assert!(approx(d.score, 0.75));
        assert!(approx(scorer.score("gibt", "gibtte"), 0.5 + 0.5 * 4.0 / 6.0));
    }

    #[test]
    fn substring_rule_needs_enough_overlap() {
        // "a" is 1/4 of "haus": below the ratio floor, falls to edit distance
        assert_eq!(substring_score("a", "haus"), None);
        // ratio 0.36 gives 0.68 < 0.7
        assert_eq!(substring_score("bahn", "bahnhofsvor"), None);
        assert!(substring_score("bahn", "bahnhof").is_some());
    }

    #[test]
    fn keyboard_neighbours_score_higher() {
        let cfg = CompareConfig::default();
        let scorer = SimilarityScorer::new(&cfg, &PlainOrthography);
        assert!(approx(scorer.score("haus", "maus"), 0.75));
        assert!(approx(scorer.score("haus", "jaus"), 0.8));

        let mut plain = CompareConfig::default();
        plain.use_keyboard_proximity = false;
        let scorer = SimilarityScorer::new(&plain, &PlainOrthography);
        assert!(approx(scorer.score("haus", "jaus"), 0.75));
    }

    #[test]
    fn keyboard_layout_option_changes_scores() {
        // `t` and `z` are neighbours on QWERTZ only
        let mut qwertz = CompareConfig::default();
        qwertz.keyboard_layout = KeyboardLayout::Qwertz;
        let mut qwerty = CompareConfig::default();
        qwerty.keyboard_layout = KeyboardLayout::Qwerty;

        let german = SimilarityScorer::new(&qwertz, &PlainOrthography).score("tag", "zag");
        let english = SimilarityScorer::new(&qwerty, &PlainOrthography).score("tag", "zag");
        assert!(approx(german, 1.0 - 0.8 / 3.0));
        assert!(approx(english, 1.0 - 1.0 / 3.0));
        assert!(german > english);
    }

    #[test]
    fn below_threshold_is_zero() {
        let cfg = CompareConfig::default();
        let scorer = SimilarityScorer::new(&cfg, &PlainOrthography);
        let d = scorer.explain("viel", "tun");
        assert_eq!(d.rule, MatchRule::EditDistance);
        assert!(d.raw > 0.0);
        assert_eq!(d.score, 0.0);
        assert!(!d.is_match());
    }

    #[test]
    fn fuzzy_scores_stay_below_one() {
        let cfg = CompareConfig::default();
        let scorer = SimilarityScorer::new(&cfg, &PlainOrthography);
        for (a, b) in [("abcdefghijklmnop", "abcdefghijklmnoq"), ("haus", "hause")] {
            let s = scorer.score(a, b);
            assert!(s <= MAX_FUZZY_SCORE, "{} vs {} scored {}", a, b, s);
        }
    }

    #[test]
    fn empty_words_never_match() {
        let cfg = CompareConfig::default();
        let scorer = SimilarityScorer::new(&cfg, &PlainOrthography);
        assert_eq!(scorer.score("", "haus"), 0.0);
        assert_eq!(scorer.explain("!!", "haus").rule, MatchRule::Empty);
    }
}
