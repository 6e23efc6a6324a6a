//! Keyboard adjacency tables.
//!
//! A substitution between two keys that sit next to each other in the same
//! key row is a likely slip of the finger and is charged less than an
//! arbitrary substitution. Three physical layouts are supported; `Auto`
//! accepts a pair that is adjacent on any of them.

use ahash::AHashSet;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Supported keyboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardLayout {
    /// Check every supported layout.
    #[default]
    Auto,
    /// German layout.
    Qwertz,
    /// US/UK layout.
    Qwerty,
    /// French/Belgian layout.
    Azerty,
}

const QWERTZ_ROWS: &[&str] = &["1234567890ß", "qwertzuiopü", "asdfghjklöä", "yxcvbnm"];
const QWERTY_ROWS: &[&str] = &["1234567890", "qwertyuiop", "asdfghjkl", "zxcvbnm"];
const AZERTY_ROWS: &[&str] = &["azertyuiop", "qsdfghjklmù", "wxcvbn"];

fn adjacency(rows: &[&str]) -> AHashSet<(char, char)> {
    let mut set = AHashSet::new();
    for row in rows {
        let keys: Vec<char> = row.chars().collect();
        for pair in keys.windows(2) {
            set.insert((pair[0], pair[1]));
            set.insert((pair[1], pair[0]));
        }
    }
    set
}

static QWERTZ: Lazy<AHashSet<(char, char)>> = Lazy::new(|| adjacency(QWERTZ_ROWS));
static QWERTY: Lazy<AHashSet<(char, char)>> = Lazy::new(|| adjacency(QWERTY_ROWS));
static AZERTY: Lazy<AHashSet<(char, char)>> = Lazy::new(|| adjacency(AZERTY_ROWS));

impl KeyboardLayout {
    /// Every concrete layout, in the order `Auto` consults them.
    pub const CONCRETE: [KeyboardLayout; 3] = [Self::Qwertz, Self::Qwerty, Self::Azerty];

    /// Whether `a` and `b` are neighbouring keys. Case-insensitive.
    pub fn are_adjacent(self, a: char, b: char) -> bool {
        let a = a.to_lowercase().next().unwrap_or(a);
        let b = b.to_lowercase().next().unwrap_or(b);
        if a == b {
            return false;
        }
        match self {
            Self::Auto => Self::CONCRETE.iter().any(|l| l.are_adjacent(a, b)),
            Self::Qwertz => QWERTZ.contains(&(a, b)),
            Self::Qwerty => QWERTY.contains(&(a, b)),
            Self::Azerty => AZERTY.contains(&(a, b)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Qwertz => "qwertz",
            Self::Qwerty => "qwerty",
            Self::Azerty => "azerty",
        }
    }
}

impl std::str::FromStr for KeyboardLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "qwertz" => Ok(Self::Qwertz),
            "qwerty" => Ok(Self::Qwerty),
            "azerty" => Ok(Self::Azerty),
            other => Err(format!("unknown keyboard layout: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qwertz_and_qwerty_differ_on_z() {
        assert!(KeyboardLayout::Qwertz.are_adjacent('t', 'z'));
        assert!(!KeyboardLayout::Qwerty.are_adjacent('t', 'z'));
        assert!(KeyboardLayout::Qwerty.are_adjacent('t', 'y'));
        assert!(KeyboardLayout::Qwerty.are_adjacent('z', 'x'));
    }

    #[test]
    fn auto_accepts_any_layout() {
        assert!(KeyboardLayout::Auto.are_adjacent('t', 'z'));
        assert!(KeyboardLayout::Auto.are_adjacent('t', 'y'));
        assert!(KeyboardLayout::Auto.are_adjacent('z', 'e')); // azerty
        assert!(!KeyboardLayout::Auto.are_adjacent('a', 'p'));
    }

    #[test]
    fn adjacency_is_symmetric_and_case_insensitive() {
        assert!(KeyboardLayout::Qwertz.are_adjacent('Ö', 'l'));
        assert!(KeyboardLayout::Qwertz.are_adjacent('l', 'ö'));
        assert!(!KeyboardLayout::Qwertz.are_adjacent('e', 'e'));
    }

    #[test]
    fn parse_layout_names() {
        assert_eq!("QWERTZ".parse::<KeyboardLayout>().unwrap(), KeyboardLayout::Qwertz);
        assert!("dvorak".parse::<KeyboardLayout>().is_err());
    }
}
