//! German normalization.
//!
//! Learners on keyboards without German keys write umlauts and ß with ASCII
//! notations. One normalization pass, applied per whitespace-separated token:
//!
//! 1. whole-word overrides (`groB` -> `groß`, `eBay` stays `eBay`)
//! 2. umlauts: `ae`/`a:`/`a/` -> `ä`, likewise for `o` and `u`, any case
//! 3. sharp s: `s:`/`s/` -> `ß`, and a capital `B` between two lowercase
//!    letters -> `ß`
//! 4. NFC composition, punctuation strip, whitespace collapse
//! 5. lowercase unless case is preserved
//!
//! Passes repeat until the text stops changing, so a notation split by
//! punctuation (`Auto-Export`) is still collapsed.
//!
//! The vowel+`e` notation does not fire right after a vowel, an umlaut or a
//! `q`, which keeps diphthongs intact (`Feuer`, `Mauer`, `Quelle`). The
//! explicit `:` and `/` notations always fire.

use phf::phf_map;
use tracing::warn;

use libdiktat_core::text::{self, Cell, Cells};
use libdiktat_core::{MappedText, Orthography};

use crate::config::GermanConfig;
use crate::typos;

/// Whole words the generic ß rule gets wrong. Replacements keep the length.
static SHARP_S_OVERRIDES: phf::Map<&'static str, &'static str> = phf_map! {
    "StraBe" => "Straße",
    "groB" => "groß",
    "GroB" => "Groß",
    "weiB" => "weiß",
    "WeiB" => "Weiß",
    "heiB" => "heiß",
    "FuB" => "Fuß",
    "SpaB" => "Spaß",
    "GruB" => "Gruß",
    "süB" => "süß",
    "bloB" => "bloß",
    "eBay" => "eBay",
};

/// Which ASCII notations are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotationRules {
    pub vowel_e: bool,
    pub colon_slash: bool,
    pub sharp_s: bool,
}

impl NotationRules {
    pub const ALL: NotationRules = NotationRules {
        vowel_e: true,
        colon_slash: true,
        sharp_s: true,
    };
}

impl Default for NotationRules {
    fn default() -> Self {
        Self::ALL
    }
}

/// German orthography.
#[derive(Debug, Clone, Copy, Default)]
pub struct German {
    rules: NotationRules,
}

impl German {
    pub const fn new(rules: NotationRules) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &GermanConfig) -> Self {
        Self::new(config.notation_rules())
    }

    pub fn rules(&self) -> NotationRules {
        self.rules
    }

    fn pass(&self, cells: &Cells, preserve_case: bool) -> Cells {
        let expanded = self.expand_notations(cells);
        let composed = text::compose_marks(&expanded);
        let stripped = text::strip_punctuation(&composed);
        text::fold_case(&stripped, preserve_case)
    }

    fn expand_notations(&self, cells: &Cells) -> Cells {
        let slice = cells.as_slice();
        let mut out = Cells::with_capacity(slice.len());
        let mut start = 0;
        while start < slice.len() {
            if slice[start].ch.is_whitespace() {
                out.push(slice[start]);
                start += 1;
                continue;
            }
            let end = slice[start..]
                .iter()
                .position(|c| c.ch.is_whitespace())
                .map_or(slice.len(), |p| start + p);
            for cell in self.expand_token(&slice[start..end]) {
                out.push(cell);
            }
            start = end;
        }
        out
    }

    fn expand_token(&self, token: &[Cell]) -> Vec<Cell> {
        if self.rules.sharp_s {
            if let Some(replaced) = apply_override(token) {
                return replaced;
            }
        }
        let umlauts = expand_umlauts(token, self.rules);
        if self.rules.sharp_s {
            expand_sharp_s(&umlauts)
        } else {
            umlauts
        }
    }
}

impl Orthography for German {
    fn normalize(&self, text: &str, preserve_case: bool) -> String {
        self.normalize_mapped(text, preserve_case).text
    }

    fn normalize_mapped(&self, word: &str, preserve_case: bool) -> MappedText {
        let original_len = word.chars().count();
        match text::run_to_fixpoint(Cells::from_text(word), |c| self.pass(c, preserve_case)) {
            Ok(cells) => cells.into_mapped(original_len),
            Err(e) => {
                warn!("normalization fallback for {:?}: {}", word, e);
                MappedText::identity(word)
            }
        }
    }

    fn typo_bonus(&self, expected: &str, actual: &str) -> f64 {
        typos::bonus(expected, actual)
    }

    fn leading_cluster_gap(&self, input: &str, reference: &str) -> Option<usize> {
        typos::leading_cluster_gap(input, reference)
    }
}

/// Replace a token found in the override table, leaving surrounding
/// punctuation cells alone.
fn apply_override(token: &[Cell]) -> Option<Vec<Cell>> {
    let first = token.iter().position(|c| c.ch.is_alphanumeric())?;
    let last = token.iter().rposition(|c| c.ch.is_alphanumeric())?;
    let core = &token[first..=last];
    let key: String = core.iter().map(|c| c.ch).collect();
    let replacement = SHARP_S_OVERRIDES.get(key.as_str())?;
    if replacement.chars().count() != core.len() {
        return None;
    }

    let mut out = Vec::with_capacity(token.len());
    out.extend_from_slice(&token[..first]);
    out.extend(
        replacement
            .chars()
            .zip(core)
            .map(|(ch, cell)| Cell::new(ch, cell.origin)),
    );
    out.extend_from_slice(&token[last + 1..]);
    Some(out)
}

fn umlaut_of(ch: char) -> Option<char> {
    match ch {
        'a' => Some('ä'),
        'o' => Some('ö'),
        'u' => Some('ü'),
        'A' => Some('Ä'),
        'O' => Some('Ö'),
        'U' => Some('Ü'),
        _ => None,
    }
}

/// Letters after which a vowel+`e` pair is read as a diphthong, not an
/// umlaut.
fn blocks_vowel_e(ch: char) -> bool {
    matches!(
        ch.to_lowercase().next().unwrap_or(ch),
        'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'ä' | 'ö' | 'ü' | 'q'
    )
}

fn expand_umlauts(token: &[Cell], rules: NotationRules) -> Vec<Cell> {
    let mut out: Vec<Cell> = Vec::with_capacity(token.len());
    let mut i = 0;
    while i < token.len() {
        let cell = token[i];
        if let (Some(umlaut), Some(next)) = (umlaut_of(cell.ch), token.get(i + 1)) {
            let explicit = rules.colon_slash && matches!(next.ch, ':' | '/');
            let spelled = rules.vowel_e
                && matches!(next.ch, 'e' | 'E')
                && !out.last().map_or(false, |prev| blocks_vowel_e(prev.ch));
            if explicit || spelled {
                out.push(Cell::new(umlaut, cell.origin));
                i += 2;
                continue;
            }
        }
        out.push(cell);
        i += 1;
    }
    out
}

fn expand_sharp_s(token: &[Cell]) -> Vec<Cell> {
    let mut out: Vec<Cell> = Vec::with_capacity(token.len());
    let mut i = 0;
    while i < token.len() {
        let cell = token[i];
        let next = token.get(i + 1).map(|c| c.ch);

        if matches!(cell.ch, 's' | 'S') && matches!(next, Some(':' | '/')) {
            out.push(Cell::new('ß', cell.origin));
            i += 2;
            continue;
        }

        let between_lowercase = out.last().map_or(false, |p| p.ch.is_lowercase())
            && next.map_or(false, char::is_lowercase);
        if cell.ch == 'B' && between_lowercase {
            out.push(Cell::new('ß', cell.origin));
        } else {
            out.push(cell);
        }
        i += 1;
    }
    out
}
