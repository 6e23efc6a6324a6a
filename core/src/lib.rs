//! libdiktat-core
//!
//! Language-agnostic comparison engine shared by the language crates
//! (libgerman). Given a known-correct reference sentence and what a learner
//! typed, it classifies every word as correct, misspelled, missing or extra
//! and, for misspelled words, maps the typed letters onto the reference.
//!
//! Public API:
//! - `Comparator` - the engine; `compare` is the per-keystroke entry point
//! - `Orthography` - language seam (normalization, typo patterns)
//! - `SimilarityScorer` - 0..1 word similarity
//! - `WordAligner` / `CharacterAligner` - word and letter alignment
//! - `ComparisonResult` - what the presentation layer consumes
//! - `CompareConfig` - configuration and feature flags
use serde::{Deserialize, Serialize};
use tracing::warn;

pub mod error;
pub use error::{Error, Result};

pub mod text;
pub use text::{Cell, Cells, MappedText};

pub mod orthography;
pub use orthography::{Orthography, PlainOrthography};

pub mod keyboard;
pub use keyboard::KeyboardLayout;

pub mod distance;
pub use distance::{weighted_levenshtein, EditMatrix};

pub mod similarity;
pub use similarity::{MatchRule, ScoreDetail, SimilarityScorer};

pub mod word_align;
pub use word_align::{MatchStatus, Word, WordAligner, WordAlignment, WordMatch};

pub mod char_align;
pub use char_align::{
    CharFeedback, CharState, CharacterAligner, CharacterAlignment, MissingChar, MissingKind,
};

pub mod result;
pub use result::{assemble, ComparisonResult, Stats};

pub mod engine;
pub use engine::{CallOptions, Comparator};

/// Words longer than this many characters get a relaxed match threshold.
pub const LONG_WORD_LEN: usize = 10;

/// Threshold reduction per character beyond `LONG_WORD_LEN`.
pub const THRESHOLD_DECAY_PER_CHAR: f64 = 0.05;

/// Lowest relaxed threshold (never above the configured one).
pub const MIN_ADJUSTED_THRESHOLD: f64 = 0.2;

/// Generic comparison configuration.
///
/// Language crates wrap this (see `GermanConfig` in libgerman) and add their
/// own notation toggles. Every field is optional when deserializing; missing
/// fields take the defaults below. Field names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompareConfig {
    /// Floor similarity for a word pair to count as any match.
    pub minimum_match_threshold: f64,

    /// Keep case through normalization when scoring words. When off, words
    /// differing only in case are exact matches.
    pub case_sensitive: bool,

    /// Layout consulted for keyboard-adjacency substitution costs.
    pub keyboard_layout: KeyboardLayout,

    // Feature toggles, so a simpler deployment can fall back to plain
    // edit distance.
    pub use_keyboard_proximity: bool,
    pub use_length_based_thresholds: bool,
    pub use_typo_pattern_bonus: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            minimum_match_threshold: 0.3,
            case_sensitive: false,
            keyboard_layout: KeyboardLayout::Auto,
            use_keyboard_proximity: true,
            use_length_based_thresholds: true,
            use_typo_pattern_bonus: true,
        }
    }
}

impl CompareConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CompareConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot use as given.
    pub fn validate(&self) -> Result<()> {
        let t = self.minimum_match_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(Error::Config(format!(
                "minimumMatchThreshold must be within 0.0..=1.0, got {}",
                t
            )));
        }
        Ok(())
    }

    /// Copy of this config with unusable values replaced, so the engine can
    /// run on anything a caller hands it.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        let t = out.minimum_match_threshold;
        if !t.is_finite() {
            warn!("minimumMatchThreshold {} is not finite, using default", t);
            out.minimum_match_threshold = Self::default().minimum_match_threshold;
        } else if !(0.0..=1.0).contains(&t) {
            warn!("minimumMatchThreshold {} out of range, clamping", t);
            out.minimum_match_threshold = t.clamp(0.0, 1.0);
        }
        out
    }

    /// Layout used for substitution costs, or `None` when keyboard proximity
    /// is switched off.
    pub fn effective_layout(&self) -> Option<KeyboardLayout> {
        self.use_keyboard_proximity.then_some(self.keyboard_layout)
    }

    /// Minimum score for an expected word of `expected_len` characters.
    ///
    /// Past `LONG_WORD_LEN` the threshold shrinks linearly, bottoming out at
    /// half the configured value and never below `MIN_ADJUSTED_THRESHOLD`
    /// (unless the configured value is itself lower).
    pub fn threshold_for(&self, expected_len: usize) -> f64 {
        let base = self.minimum_match_threshold;
        if !self.use_length_based_thresholds || expected_len <= LONG_WORD_LEN {
            return base;
        }
        let excess = (expected_len - LONG_WORD_LEN) as f64;
        let factor = (1.0 - excess * THRESHOLD_DECAY_PER_CHAR).max(0.5);
        (base * factor).max(MIN_ADJUSTED_THRESHOLD.min(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = CompareConfig::default();
        assert_eq!(cfg.minimum_match_threshold, 0.3);
        assert!(!cfg.case_sensitive);
        assert_eq!(cfg.keyboard_layout, KeyboardLayout::Auto);
        assert!(cfg.use_keyboard_proximity);
        assert!(cfg.use_length_based_thresholds);
        assert!(cfg.use_typo_pattern_bonus);
    }

    #[test]
    fn threshold_relaxes_for_long_words() {
        let cfg = CompareConfig::default();
        assert_eq!(cfg.threshold_for(5), 0.3);
        assert_eq!(cfg.threshold_for(10), 0.3);
        assert!((cfg.threshold_for(12) - 0.27).abs() < 1e-9);
        // floor at 0.2 even though half of 0.3 would be 0.15
        assert!((cfg.threshold_for(40) - 0.2).abs() < 1e-9);

        let mut high = CompareConfig::default();
        high.minimum_match_threshold = 0.6;
        assert!((high.threshold_for(40) - 0.3).abs() < 1e-9);

        let mut flat = CompareConfig::default();
        flat.use_length_based_thresholds = false;
        assert_eq!(flat.threshold_for(40), 0.3);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = CompareConfig::from_toml_str("keyboardLayout = \"qwertz\"\n").unwrap();
        assert_eq!(cfg.keyboard_layout, KeyboardLayout::Qwertz);
        assert_eq!(cfg.minimum_match_threshold, 0.3);
    }

    #[test]
    fn toml_round_trip_and_validation() {
        let mut cfg = CompareConfig::default();
        cfg.case_sensitive = true;
        let s = cfg.to_toml_string().unwrap();
        assert!(s.contains("caseSensitive = true"));
        assert_eq!(CompareConfig::from_toml_str(&s).unwrap(), cfg);

        assert!(CompareConfig::from_toml_str("minimumMatchThreshold = 1.5").is_err());
    }

    #[test]
    fn sanitized_repairs_bad_threshold() {
        let mut cfg = CompareConfig::default();
        cfg.minimum_match_threshold = f64::NAN;
        assert_eq!(cfg.sanitized().minimum_match_threshold, 0.3);
        cfg.minimum_match_threshold = -2.0;
        assert_eq!(cfg.sanitized().minimum_match_threshold, 0.0);
    }

    #[test]
    fn proximity_toggle_controls_layout() {
        let mut cfg = CompareConfig::default();
        assert_eq!(cfg.effective_layout(), Some(KeyboardLayout::Auto));
        cfg.use_keyboard_proximity = false;
        assert_eq!(cfg.effective_layout(), None);
    }
}
