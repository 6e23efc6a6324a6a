use libdiktat_core::{CompareConfig, Comparator, MatchStatus, PlainOrthography};
use proptest::prelude::*;

fn engine() -> Comparator<PlainOrthography> {
    Comparator::new(CompareConfig::default(), PlainOrthography)
}

fn texts(words: &[libdiktat_core::WordMatch], status: MatchStatus) -> Vec<String> {
    words
        .iter()
        .filter(|m| m.status == status)
        .filter_map(|m| m.expected.as_ref().or(m.actual.as_ref()))
        .map(|w| w.text.clone())
        .collect()
}

#[test]
fn out_of_order_typing_with_omission() {
    let r = engine().compare("the dog ran to the park", "to the dog park");
    assert_eq!(texts(&r.words, MatchStatus::Missing), vec!["ran", "the"]);
    assert_eq!(r.stats.correct, 4);
    assert!(r.extra_words.is_empty());
}

#[test]
fn punctuation_and_case_do_not_matter() {
    let r = engine().compare("Hello, world!", "hello world");
    assert_eq!(r.stats.correct, 2);
    assert_eq!(r.stats.accuracy, 1.0);
    assert!(r.is_complete);
}

#[test]
fn empty_reference_yields_empty_result() {
    let r = engine().compare("", "anything at all");
    assert!(r.words.is_empty());
    assert!(r.extra_words.is_empty());
    assert_eq!(r.stats.accuracy, 0.0);
    assert_eq!(r.input_text, "anything at all");
}

#[test]
fn case_sensitive_config_scores_case_differences() {
    let mut cfg = CompareConfig::default();
    cfg.case_sensitive = true;
    let e = Comparator::new(cfg, PlainOrthography);
    let r = e.compare("Berlin", "berlin");
    assert_eq!(r.words[0].status, MatchStatus::Correct);
    assert_eq!(r.words[0].similarity, 0.95);
}

#[test]
fn plain_edit_distance_when_refinements_disabled() {
    let mut cfg = CompareConfig::default();
    cfg.use_keyboard_proximity = false;
    cfg.use_length_based_thresholds = false;
    cfg.use_typo_pattern_bonus = false;
    let e = Comparator::new(cfg, PlainOrthography);
    let r = e.compare("haus", "jaus");
    assert_eq!(r.words[0].status, MatchStatus::Misspelled);
    assert!((r.words[0].similarity - 0.75).abs() < 1e-9);
}

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

proptest! {
    #[test]
    fn identical_text_is_all_correct(words in prop::collection::vec(word(), 1..8)) {
        let text = words.join(" ");
        let r = engine().compare(&text, &text);
        prop_assert_eq!(r.stats.correct, words.len());
        prop_assert_eq!(r.stats.missing, 0);
        prop_assert_eq!(r.stats.extra, 0);
        prop_assert_eq!(r.stats.accuracy, 1.0);
    }

    #[test]
    fn empty_input_marks_all_missing(words in prop::collection::vec(word(), 1..8)) {
        let r = engine().compare(&words.join(" "), "");
        prop_assert_eq!(r.stats.missing, words.len());
        prop_assert_eq!(r.stats.correct + r.stats.misspelled, 0);
    }

    #[test]
    fn each_input_word_used_at_most_once(
        reference in prop::collection::vec(word(), 0..6),
        input in prop::collection::vec(word(), 0..6),
    ) {
        let r = engine().compare(&reference.join(" "), &input.join(" "));
        let mut used: Vec<usize> = r
            .words
            .iter()
            .chain(r.extra_words.iter())
            .filter_map(|m| m.actual.as_ref().map(|w| w.index))
            .collect();
        let total = used.len();
        used.sort_unstable();
        used.dedup();
        prop_assert_eq!(used.len(), total);
        if !reference.is_empty() {
            prop_assert_eq!(total, input.len());
        }
        prop_assert_eq!(r.words.len(), reference.len());
    }

    #[test]
    fn scores_stay_in_unit_range(a in word(), b in word()) {
        let e = engine();
        let s = e.scorer().score(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
    }
}
