use libgerman::{normalize, normalize_word, German, NotationRules, Orthography};
use proptest::prelude::*;

#[test]
fn sentence_normalization() {
    assert_eq!(
        normalize("  Gru:s/e aus   Koeln, bis Montag!  ", false),
        "grüße aus köln bis montag"
    );
    assert_eq!(normalize("Schoene Gruesse", true), "Schöne Grüsse");
}

#[test]
fn normalize_word_lowercases() {
    assert_eq!(normalize_word("UEBER"), "über");
    assert_eq!(normalize_word("Fuss"), "fuss");
    assert_eq!(normalize_word("FuB"), "fuß");
}

#[test]
fn combining_marks_are_composed() {
    assert_eq!(normalize("Mu\u{308}ller", false), "müller");
}

#[test]
fn notation_after_diphthong_is_kept() {
    assert_eq!(normalize("Bauer Feuer neue", false), "bauer feuer neue");
    assert_eq!(normalize("Quelle", false), "quelle");
}

#[test]
fn mapping_covers_every_original_character() {
    let m = German::default().normalize_mapped("Gru:s/e!", false);
    assert_eq!(m.text, "grüße");
    assert_eq!(m.input_to_transformed.len(), 8);
    assert_eq!(m.transformed_index(2), Some(2));
    assert_eq!(m.transformed_index(3), None);
    assert_eq!(m.transformed_index(4), Some(3));
    assert_eq!(m.transformed_index(5), None);
    assert_eq!(m.transformed_index(6), Some(4));
    assert_eq!(m.transformed_index(7), None);
}

#[test]
fn disabled_rules_leave_notation_alone() {
    let none = German::new(NotationRules {
        vowel_e: false,
        colon_slash: false,
        sharp_s: false,
    });
    assert_eq!(none.normalize("Gruesse", false), "gruesse");
    assert_eq!(none.normalize("groB", true), "groB");
}

proptest! {
    #[test]
    fn idempotent_on_notation_text(s in "[a-zA-ZäöüÄÖÜßB:/ .,!?'-]{0,30}") {
        let once = normalize(&s, false);
        prop_assert_eq!(normalize(&once, false), once.clone());
        let kept = normalize(&s, true);
        prop_assert_eq!(normalize(&kept, true), kept.clone());
    }

    #[test]
    fn idempotent_on_printable_text(s in "\\PC{0,24}") {
        let once = normalize(&s, false);
        prop_assert_eq!(normalize(&once, false), once.clone());
    }

    #[test]
    fn output_has_no_punctuation_or_double_spaces(s in "[a-zA-Z:/ .,!?-]{0,30}") {
        let out = normalize(&s, false);
        prop_assert!(out.chars().all(|c| c.is_alphanumeric() || c == ' '));
        prop_assert!(!out.contains("  "));
        prop_assert_eq!(out.trim(), out.as_str());
    }

    #[test]
    fn mapping_points_inside_output(s in "[a-zA-Z:/ e-]{0,20}") {
        let m = German::default().normalize_mapped(&s, false);
        let len = m.text.chars().count();
        prop_assert_eq!(m.input_to_transformed.len(), s.chars().count());
        prop_assert!(m.input_to_transformed.iter().flatten().all(|&t| t < len));
    }
}
