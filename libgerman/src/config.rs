use std::path::Path;

use serde::{Deserialize, Serialize};

use libdiktat_core::{CompareConfig, Result};

use crate::normalizer::NotationRules;

/// German-specific configuration that extends the base `CompareConfig` from core.
///
/// This configuration includes:
/// - All generic options from `libdiktat_core::CompareConfig` (flattened via serde)
/// - Toggles for the ASCII umlaut and ß notations
///
/// # Example
///
/// ```rust
/// use libgerman::GermanConfig;
///
/// let config = GermanConfig::default();
/// let base_config = config.into_base();
/// assert_eq!(base_config.minimum_match_threshold, 0.3);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GermanConfig {
    /// Base configuration fields (threshold, keyboard, feature toggles)
    #[serde(flatten)]
    pub base: CompareConfig,

    pub expand_vowel_e: bool,     // schoen -> schön
    pub expand_colon_slash: bool, // scho:n, scho/n -> schön
    pub expand_sharp_s: bool,     // Stras:e, StraBe -> Straße
}

impl Default for GermanConfig {
    fn default() -> Self {
        Self {
            base: CompareConfig::default(),
            expand_vowel_e: true,
            expand_colon_slash: true,
            expand_sharp_s: true,
        }
    }
}

impl GermanConfig {
    /// Convert this German config into the base config for use with `Comparator::new()`
    pub fn into_base(self) -> CompareConfig {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &CompareConfig {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut CompareConfig {
        &mut self.base
    }

    pub fn notation_rules(&self) -> NotationRules {
        NotationRules {
            vowel_e: self.expand_vowel_e,
            colon_slash: self.expand_colon_slash,
            sharp_s: self.expand_sharp_s,
        }
    }

    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GermanConfig = toml::from_str(content)?;
        config.base.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libdiktat_core::KeyboardLayout;

    #[test]
    fn flattened_fields_parse() {
        let cfg = GermanConfig::from_toml_str(
            "keyboardLayout = \"qwertz\"\nexpandSharpS = false\nminimumMatchThreshold = 0.4\n",
        )
        .unwrap();
        assert_eq!(cfg.base.keyboard_layout, KeyboardLayout::Qwertz);
        assert_eq!(cfg.base.minimum_match_threshold, 0.4);
        assert!(!cfg.expand_sharp_s);
        assert!(cfg.expand_vowel_e);
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        assert!(GermanConfig::from_toml_str("minimumMatchThreshold = -1.0").is_err());
    }

    #[test]
    fn notation_rules_follow_toggles() {
        let mut cfg = GermanConfig::default();
        cfg.expand_colon_slash = false;
        let rules = cfg.notation_rules();
        assert!(rules.vowel_e);
        assert!(!rules.colon_slash);
        assert!(rules.sharp_s);
    }
}
