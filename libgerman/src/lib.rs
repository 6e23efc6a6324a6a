//! libgerman crate root
//!
//! German orthography for the `libdiktat-core` comparison engine: ASCII
//! umlaut and ß notations, German typo patterns, and a `GermanConfig` that
//! extends the core configuration.
//!
//! Public API exported here:
//! - `German` and `NotationRules` from `normalizer`
//! - `GermanConfig` from `config`
//! - `compare` / `compare_with` - one-shot comparison of a typed sentence
//! - `normalize` / `normalize_word` with the default German rules

pub mod config;
pub mod normalizer;
pub mod typos;

// Re-export the engine types callers need to read results.
pub use libdiktat_core::{
    CallOptions, CharFeedback, CharState, CharacterAlignment, Comparator, CompareConfig,
    ComparisonResult, KeyboardLayout, MatchRule, MatchStatus, MissingChar, MissingKind,
    Orthography, ScoreDetail, Stats, Word, WordMatch,
};

pub use config::GermanConfig;
pub use normalizer::{German, NotationRules};

const DEFAULT_GERMAN: German = German::new(NotationRules::ALL);

/// Build an engine for `config`.
pub fn comparator(config: &GermanConfig) -> Comparator<German> {
    Comparator::new(config.base.clone(), German::from_config(config))
}

/// Compare a typed sentence against the reference sentence.
pub fn compare(reference: &str, input: &str, config: &GermanConfig) -> ComparisonResult {
    comparator(config).compare(reference, input)
}

/// `compare` with per-call options (auto-advance suppression, sequence).
pub fn compare_with(
    reference: &str,
    input: &str,
    config: &GermanConfig,
    options: &CallOptions,
) -> ComparisonResult {
    comparator(config).compare_with(reference, input, options)
}

/// Normalize with every German notation enabled.
pub fn normalize(text: &str, preserve_case: bool) -> String {
    DEFAULT_GERMAN.normalize(text, preserve_case)
}

pub fn normalize_word(word: &str) -> String {
    DEFAULT_GERMAN.normalize_word(word)
}
