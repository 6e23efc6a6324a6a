// core/src/char_align.rs
//
// Letter-level alignment of a misspelled word against its reference word.
//
// Both words are normalized first. A full unit-cost edit matrix over the
// normalized input (rows) and reference (columns) is backtraced from the
// bottom-right corner; every diagonal step pairs a transformed input position
// with a reference position. Steps that only move up are extra letters,
// steps that only move left are missing letters. A second map threads the
// original keystrokes through the orthography's expansions so feedback can be
// shown on what the learner actually typed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::distance::EditMatrix;
use crate::error::{Error, Result};
use crate::orthography::Orthography;

/// Feedback state of one original keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharState {
    /// Aligned with the same reference letter.
    Correct,
    /// Aligned with a different reference letter.
    Wrong,
    /// Not aligned with any reference letter.
    Extra,
    /// Absorbed into the previous keystroke by a notation (`e` of `oe`) or
    /// dropped as punctuation.
    Merged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharFeedback {
    pub input_index: usize,
    pub ch: char,
    pub state: CharState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingKind {
    /// Ordinary deletion found by the backtrace.
    Deletion,
    /// Letter left out of an otherwise correct leading consonant cluster.
    Between,
}

/// A reference position the learner did not type. The letter itself is
/// deliberately not included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingChar {
    pub reference_index: usize,
    /// Transformed input position the gap sits in front of (equal to the
    /// transformed length when the gap is at the end).
    pub before_transformed: usize,
    pub kind: MissingKind,
}

/// Index maps between an original input word, its normalized form and the
/// normalized reference word.
///
/// Every value in `transformed_to_reference` is below the reference length.
/// The default value (all maps empty) renders as "nothing matched".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAlignment {
    pub transformed_input: String,
    pub reference: String,
    pub input_to_transformed: BTreeMap<usize, usize>,
    pub transformed_to_reference: BTreeMap<usize, usize>,
    pub reference_matched: BTreeSet<usize>,
    pub missing: Vec<MissingChar>,
}

impl CharacterAlignment {
    pub fn is_empty(&self) -> bool {
        self.transformed_input.is_empty()
            && self.reference.is_empty()
            && self.input_to_transformed.is_empty()
    }

    /// Transformed positions not aligned with any reference letter.
    pub fn extra_positions(&self) -> Vec<usize> {
        (0..self.transformed_input.chars().count())
            .filter(|t| !self.transformed_to_reference.contains_key(t))
            .collect()
    }

    /// Reference positions with no aligned input letter.
    pub fn unmatched_reference(&self) -> Vec<usize> {
        (0..self.reference.chars().count())
            .filter(|r| !self.reference_matched.contains(r))
            .collect()
    }

    /// Per-keystroke feedback for the original `input` word.
    pub fn input_feedback(&self, input: &str) -> Vec<CharFeedback> {
        let transformed: Vec<char> = self.transformed_input.chars().collect();
        let reference: Vec<char> = self.reference.chars().collect();
        let fallback = self.is_empty();

        input
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                let state = match self.input_to_transformed.get(&i) {
                    None if fallback => CharState::Extra,
                    None => CharState::Merged,
                    Some(t) => match self.transformed_to_reference.get(t) {
                        None => CharState::Extra,
                        Some(r) if transformed.get(*t) == reference.get(*r) => {
                            CharState::Correct
                        }
                        Some(_) => CharState::Wrong,
                    },
                };
                CharFeedback {
                    input_index: i,
                    ch,
                    state,
                }
            })
            .collect()
    }
}

pub struct CharacterAligner<'a, O: ?Sized> {
    orthography: &'a O,
    case_sensitive: bool,
}

impl<'a, O: Orthography + ?Sized> CharacterAligner<'a, O> {
    pub fn new(orthography: &'a O, case_sensitive: bool) -> Self {
        Self {
            orthography,
            case_sensitive,
        }
    }

    /// Align `input` against `reference`. Never fails: a broken backtrace
    /// yields an empty alignment.
    pub fn align_characters(&self, input: &str, reference: &str) -> CharacterAlignment {
        match self.try_align(input, reference) {
            Ok(alignment) => alignment,
            Err(e) => {
                warn!(
                    "character alignment fallback for {:?} vs {:?}: {}",
                    input, reference, e
                );
                CharacterAlignment::default()
            }
        }
    }

    pub fn try_align(&self, input: &str, reference: &str) -> Result<CharacterAlignment> {
        let mapped = self.orthography.normalize_mapped(input, self.case_sensitive);
        let reference_norm = self.orthography.normalize(reference, self.case_sensitive);

        let input_to_transformed: BTreeMap<usize, usize> = mapped
            .input_to_transformed
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (i, t)))
            .collect();

        let source: Vec<char> = mapped.text.chars().collect();
        let target: Vec<char> = reference_norm.chars().collect();

        let (pairs, missing) =
            match self.leading_cluster(&mapped.text, &reference_norm, &source, &target) {
                Some(found) => found,
                None => backtrace(&source, &target)?,
            };

        let mut transformed_to_reference = BTreeMap::new();
        for (t, r) in pairs {
            if t >= source.len() || r >= target.len() {
                return Err(Error::Alignment(format!(
                    "pair ({}, {}) outside {}x{}",
                    t,
                    r,
                    source.len(),
                    target.len()
                )));
            }
            transformed_to_reference.insert(t, r);
        }
        let reference_matched = transformed_to_reference.values().copied().collect();

        Ok(CharacterAlignment {
            transformed_input: mapped.text,
            reference: reference_norm,
            input_to_transformed,
            transformed_to_reference,
            reference_matched,
            missing,
        })
    }

    /// Input equals reference minus one letter of a leading cluster: every
    /// other letter lines up and the gap is reported as `Between`.
    fn leading_cluster(
        &self,
        input: &str,
        reference: &str,
        source: &[char],
        target: &[char],
    ) -> Option<(Vec<(usize, usize)>, Vec<MissingChar>)> {
        let gap = self.orthography.leading_cluster_gap(input, reference)?;
        if gap >= target.len() || source.len() + 1 != target.len() {
            return None;
        }
        let pairs = (0..source.len())
            .map(|t| (t, if t < gap { t } else { t + 1 }))
            .collect();
        let missing = vec![MissingChar {
            reference_index: gap,
            before_transformed: gap,
            kind: MissingKind::Between,
        }];
        trace!("leading cluster gap at {} in {:?}", gap, reference);
        Some((pairs, missing))
    }
}

type Backtrace = (Vec<(usize, usize)>, Vec<MissingChar>);

/// Walk the edit matrix from the bottom-right corner back to the origin.
/// Diagonal steps are preferred, so ties resolve toward substitution.
fn backtrace(source: &[char], target: &[char]) -> Result<Backtrace> {
    let matrix = EditMatrix::build(source, target);
    let cell = |i: usize, j: usize| {
        matrix
            .get(i, j)
            .ok_or_else(|| Error::Alignment(format!("cell ({}, {}) out of range", i, j)))
    };

    let mut pairs = Vec::new();
    let mut missing = Vec::new();
    let (mut i, mut j) = (source.len(), target.len());

    while i > 0 || j > 0 {
        let here = cell(i, j)?;
        if i > 0 && j > 0 {
            let sub = usize::from(source[i - 1] != target[j - 1]);
            if here == cell(i - 1, j - 1)? + sub {
                pairs.push((i - 1, j - 1));
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && here == cell(i - 1, j)? + 1 {
            // extra input letter
            i -= 1;
            continue;
        }
        if j > 0 && here == cell(i, j - 1)? + 1 {
            missing.push(MissingChar {
                reference_index: j - 1,
                before_transformed: i,
                kind: MissingKind::Deletion,
            });
            j -= 1;
            continue;
        }
        return Err(Error::Alignment(format!("no predecessor for cell ({}, {})", i, j)));
    }

    pairs.reverse();
    missing.reverse();
    trace!(
        "backtrace distance={} pairs={} missing={}",
        matrix.distance(),
        pairs.len(),
        missing.len()
    );
    Ok((pairs, missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MappedText;
    use crate::PlainOrthography;

    fn align(input: &str, reference: &str) -> CharacterAlignment {
        CharacterAligner::new(&PlainOrthography, false).align_characters(input, reference)
    }

    fn states(input: &str, reference: &str) -> Vec<CharState> {
        align(input, reference)
            .input_feedback(input)
            .into_iter()
            .map(|f| f.state)
            .collect()
    }

    use CharState::*;

    #[test]
    fn extra_letter_at_end() {
        let a = align("hause", "haus");
        assert_eq!(a.extra_positions(), vec![4]);
        assert!(a.missing.is_empty());
        assert_eq!(states("hause", "haus"), vec![Correct, Correct, Correct, Correct, Extra]);
    }

    #[test]
    fn missing_letter_is_reported_without_the_letter() {
        let a = align("hus", "haus");
        assert_eq!(
            a.missing,
            vec![MissingChar {
                reference_index: 1,
                before_transformed: 1,
                kind: MissingKind::Deletion,
            }]
        );
        assert_eq!(a.unmatched_reference(), vec![1]);
        assert_eq!(a.transformed_to_reference.get(&1), Some(&2));
    }

    #[test]
    fn substitution_is_wrong_not_extra() {
        assert_eq!(states("haud", "haus"), vec![Correct, Correct, Correct, Wrong]);
        let a = align("haud", "haus");
        assert_eq!(a.reference_matched.len(), 4);
    }

    #[test]
    fn stripped_keystrokes_are_merged() {
        assert_eq!(states("Ha-us", "haus"), vec![Correct, Correct, Merged, Correct, Correct]);
    }

    #[test]
    fn empty_input_misses_every_letter() {
        let a = align("", "ab");
        assert_eq!(a.missing.len(), 2);
        assert!(a.missing.iter().all(|m| m.before_transformed == 0));
    }

    #[test]
    fn mapped_reference_indices_stay_in_range() {
        for (input, reference) in [("xyzzy", "x"), ("a", "abcdef"), ("kitten", "sitting")] {
            let a = align(input, reference);
            let len = a.reference.chars().count();
            assert!(a.transformed_to_reference.values().all(|&r| r < len));
        }
    }

    #[test]
    fn default_alignment_reads_as_unmatched() {
        let feedback = CharacterAlignment::default().input_feedback("abc");
        assert!(feedback.iter().all(|f| f.state == Extra));
    }

    struct ClusterOrthography;

    impl Orthography for ClusterOrthography {
        fn normalize(&self, text: &str, preserve_case: bool) -> String {
            PlainOrthography.normalize(text, preserve_case)
        }

        fn normalize_mapped(&self, word: &str, preserve_case: bool) -> MappedText {
            PlainOrthography.normalize_mapped(word, preserve_case)
        }

        fn leading_cluster_gap(&self, input: &str, reference: &str) -> Option<usize> {
            let rest = reference.strip_prefix("sch")?;
            (input.strip_prefix("sh")? == rest).then_some(1)
        }
    }

    #[test]
    fn leading_cluster_gap_is_between() {
        let a = CharacterAligner::new(&ClusterOrthography, false).align_characters("Shule", "Schule");
        assert_eq!(a.missing.len(), 1);
        assert_eq!(a.missing[0].kind, MissingKind::Between);
        assert_eq!(a.missing[0].reference_index, 1);
        assert_eq!(a.transformed_to_reference.get(&1), Some(&2));
        assert!(a
            .input_feedback("Shule")
            .iter()
            .all(|f| f.state == Correct));

        // same pair without the cluster rule is a plain deletion
        let plain = align("Shule", "Schule");
        assert_eq!(plain.missing[0].kind, MissingKind::Deletion);
    }
}
