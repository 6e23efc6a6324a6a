//! German typo patterns.
//!
//! Each pattern compares a lowercased expected word with what was typed and
//! contributes a fixed bonus when the typed word shows that kind of slip.
//! A pattern counts once per word pair; the sum is capped.

use libdiktat_core::weighted_levenshtein;

/// Consonant clusters learners commonly simplify, as `(full, simplified)`.
pub const CLUSTERS: &[(&str, &str)] = &[
    ("sch", "sh"),
    ("sch", "sc"),
    ("ck", "k"),
    ("tz", "z"),
    ("dt", "t"),
    ("th", "t"),
];

pub const CLUSTER_BONUS: f64 = 0.08;
pub const UMLAUT_BONUS: f64 = 0.08;
pub const SHARP_S_BONUS: f64 = 0.1;
pub const DOUBLE_VOWEL_BONUS: f64 = 0.05;
pub const MAX_BONUS: f64 = 0.15;

/// Positions within this distance still count as "the same place".
const NEARBY: usize = 1;

const UMLAUTS: &[(char, char)] = &[('ä', 'a'), ('ö', 'o'), ('ü', 'u')];
const DOUBLE_VOWELS: &[char] = &['a', 'e', 'o'];

/// Summed bonus for every pattern `actual` exhibits versus `expected`.
pub fn bonus(expected: &str, actual: &str) -> f64 {
    let expected = expected.to_lowercase();
    let actual = actual.to_lowercase();

    let mut total = 0.0;
    if simplified_cluster(&expected, &actual) {
        total += CLUSTER_BONUS;
    }
    if umlaut_as_base_vowel(&expected, &actual) {
        total += UMLAUT_BONUS;
    }
    if sharp_s_as_double_s(&expected, &actual) {
        total += SHARP_S_BONUS;
    }
    if double_vowel_as_single(&expected, &actual) {
        total += DOUBLE_VOWEL_BONUS;
    }
    f64::min(total, MAX_BONUS)
}

/// `sch` typed as `sh`, `ck` as `k`, and so on.
pub fn simplified_cluster(expected: &str, actual: &str) -> bool {
    let expected: Vec<char> = expected.chars().collect();
    let actual: Vec<char> = actual.chars().collect();
    CLUSTERS.iter().any(|(full, simple)| {
        let full: Vec<char> = full.chars().collect();
        let simple: Vec<char> = simple.chars().collect();
        let found = occurrences(&expected, &full)
            .any(|i| exhibits(&expected, i, full.len(), &simple, &actual));
        found
    })
}

/// `ä` typed as `a` (and `ö`/`ü` likewise).
pub fn umlaut_as_base_vowel(expected: &str, actual: &str) -> bool {
    let expected: Vec<char> = expected.chars().collect();
    let actual: Vec<char> = actual.chars().collect();
    expected.iter().enumerate().any(|(i, ch)| {
        UMLAUTS
            .iter()
            .find(|(umlaut, _)| umlaut == ch)
            .map_or(false, |(_, base)| exhibits(&expected, i, 1, &[*base], &actual))
    })
}

/// `ß` typed as `ss`.
pub fn sharp_s_as_double_s(expected: &str, actual: &str) -> bool {
    let expected: Vec<char> = expected.chars().collect();
    let actual: Vec<char> = actual.chars().collect();
    expected
        .iter()
        .enumerate()
        .filter(|(_, ch)| **ch == 'ß')
        .any(|(i, _)| exhibits(&expected, i, 1, &['s', 's'], &actual))
}

/// `aa`, `ee` or `oo` typed with a single vowel.
pub fn double_vowel_as_single(expected: &str, actual: &str) -> bool {
    let expected: Vec<char> = expected.chars().collect();
    let actual: Vec<char> = actual.chars().collect();
    DOUBLE_VOWELS.iter().any(|vowel| {
        let double = [*vowel, *vowel];
        let found =
            occurrences(&expected, &double).any(|i| exhibits(&expected, i, 2, &[*vowel], &actual));
        found
    })
}

/// Index of the letter left out when `input` is `reference` with its leading
/// cluster simplified (`Shule` for `Schule` gives 1, the `c`).
pub fn leading_cluster_gap(input: &str, reference: &str) -> Option<usize> {
    let input = input.to_lowercase();
    let reference = reference.to_lowercase();
    CLUSTERS.iter().find_map(|(full, simple)| {
        let rest = reference.strip_prefix(full)?;
        if input.strip_prefix(simple)? != rest {
            return None;
        }
        omitted_index(full, simple)
    })
}

/// First position where `simple` stops agreeing with `full`.
fn omitted_index(full: &str, simple: &str) -> Option<usize> {
    if full.chars().count() != simple.chars().count() + 1 {
        return None;
    }
    let mut simple = simple.chars();
    full.chars()
        .enumerate()
        .find(|(_, c)| simple.next() != Some(*c))
        .map(|(i, _)| i)
}

/// Whether `actual` is `expected` with `expected[at..at + len]` typed as
/// `slip`. The slip must sit at about the same place with the same
/// neighbouring letters, and must bring `expected` strictly closer to
/// `actual`.
fn exhibits(expected: &[char], at: usize, len: usize, slip: &[char], actual: &[char]) -> bool {
    let mut slipped: Vec<char> = expected[..at].to_vec();
    slipped.extend_from_slice(slip);
    slipped.extend_from_slice(&expected[at + len..]);

    let left = at.checked_sub(1).map(|k| slipped[k]);
    let right = slipped.get(at + slip.len()).copied();
    let in_place = (at.saturating_sub(NEARBY)..=at + NEARBY).any(|j| {
        actual.get(j..j + slip.len()) == Some(slip)
            && same_letter(j.checked_sub(1).map(|k| actual[k]), left)
            && same_letter(actual.get(j + slip.len()).copied(), right)
    });

    in_place && unit_distance(&slipped, actual) < unit_distance(expected, actual)
}

/// Neighbours compare with umlauts and ß folded, so two slips side by side
/// (`süß` typed `suss`) each still count.
fn same_letter(a: Option<char>, b: Option<char>) -> bool {
    a.map(fold) == b.map(fold)
}

fn fold(ch: char) -> char {
    match ch {
        'ä' => 'a',
        'ö' => 'o',
        'ü' => 'u',
        'ß' => 's',
        _ => ch,
    }
}

fn occurrences<'a>(haystack: &'a [char], needle: &'a [char]) -> impl Iterator<Item = usize> + 'a {
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(move |(_, w)| *w == needle)
        .map(|(i, _)| i)
}

fn unit_distance(a: &[char], b: &[char]) -> f64 {
    let a: String = a.iter().collect();
    let b: String = b.iter().collect();
    weighted_levenshtein(&a, &b, None)
}
