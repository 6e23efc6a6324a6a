// core/src/text.rs
//
// Index-tracking text transforms shared by every orthography.
//
// Text is carried as a sequence of cells, each remembering the position of the
// original character it came from. Stages may drop cells (punctuation, the
// second half of a two-letter notation) or rewrite them in place, so the final
// cell list yields both the normalized string and the map from original
// keystroke to normalized position.

use unicode_normalization::char::{compose, is_combining_mark};

use crate::error::{Error, Result};

/// Upper bound on full pipeline passes before giving up on a fixpoint.
pub const MAX_PASSES: usize = 8;

/// A single character together with the index of the original character it
/// was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub origin: usize,
}

impl Cell {
    pub fn new(ch: char, origin: usize) -> Self {
        Self { ch, origin }
    }
}

/// An ordered list of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cells(Vec<Cell>);

impl Cells {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    /// Seed cells from raw text; every character is its own origin.
    pub fn from_text(text: &str) -> Self {
        Self(
            text.chars()
                .enumerate()
                .map(|(i, ch)| Cell::new(ch, i))
                .collect(),
        )
    }

    pub fn push(&mut self, cell: Cell) {
        self.0.push(cell);
    }

    pub fn last_mut(&mut self) -> Option<&mut Cell> {
        self.0.last_mut()
    }

    pub fn last(&self) -> Option<&Cell> {
        self.0.last()
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The current text.
    pub fn text(&self) -> String {
        self.0.iter().map(|c| c.ch).collect()
    }

    /// Consume the cells into a normalized string plus the original-to-
    /// transformed index map. `original_len` is the character count of the
    /// text the cells were seeded from.
    pub fn into_mapped(self, original_len: usize) -> MappedText {
        let mut input_to_transformed = vec![None; original_len];
        for (pos, cell) in self.0.iter().enumerate() {
            if let Some(slot) = input_to_transformed.get_mut(cell.origin) {
                if slot.is_none() {
                    *slot = Some(pos);
                }
            }
        }
        MappedText {
            text: self.text(),
            input_to_transformed,
        }
    }
}

impl FromIterator<Cell> for Cells {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A normalized word together with the position each original character
/// landed on. `None` marks characters that produced no output of their own
/// (stripped punctuation, the trailing half of a notation such as `oe`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedText {
    pub text: String,
    pub input_to_transformed: Vec<Option<usize>>,
}

impl MappedText {
    /// Map that leaves `text` untouched, one position per character.
    pub fn identity(text: &str) -> Self {
        let n = text.chars().count();
        Self {
            text: text.to_string(),
            input_to_transformed: (0..n).map(Some).collect(),
        }
    }

    pub fn transformed_index(&self, original: usize) -> Option<usize> {
        self.input_to_transformed.get(original).copied().flatten()
    }
}

/// Compose base letters with following combining marks (NFC for the cases
/// that matter to typed text, e.g. `u` + U+0308 becomes `ü`).
pub fn compose_marks(cells: &Cells) -> Cells {
    let mut out = Cells::with_capacity(cells.len());
    for cell in cells.as_slice() {
        if is_combining_mark(cell.ch) {
            if let Some(prev) = out.last_mut() {
                if let Some(composed) = compose(prev.ch, cell.ch) {
                    prev.ch = composed;
                    continue;
                }
            }
        }
        out.push(*cell);
    }
    out
}

/// Drop everything that is not a letter, digit or whitespace, collapse
/// whitespace runs to a single space and trim both ends.
pub fn strip_punctuation(cells: &Cells) -> Cells {
    let mut out = Cells::with_capacity(cells.len());
    let mut pending_space: Option<usize> = None;
    for cell in cells.as_slice() {
        if cell.ch.is_whitespace() {
            if pending_space.is_none() {
                pending_space = Some(cell.origin);
            }
            continue;
        }
        if !cell.ch.is_alphanumeric() {
            continue;
        }
        if let Some(origin) = pending_space.take() {
            if !out.is_empty() {
                out.push(Cell::new(' ', origin));
            }
        }
        out.push(*cell);
    }
    out
}

/// Lowercase every cell unless `preserve_case` is set. A character whose
/// lowercase form is longer than one char keeps the same origin for all parts.
pub fn fold_case(cells: &Cells, preserve_case: bool) -> Cells {
    if preserve_case {
        return cells.clone();
    }
    let mut out = Cells::with_capacity(cells.len());
    for cell in cells.as_slice() {
        for lc in cell.ch.to_lowercase() {
            out.push(Cell::new(lc, cell.origin));
        }
    }
    out
}

/// Apply `pass` until the cells stop changing.
pub fn run_to_fixpoint<F>(seed: Cells, pass: F) -> Result<Cells>
where
    F: Fn(&Cells) -> Cells,
{
    let mut current = seed;
    for _ in 0..MAX_PASSES {
        let next = pass(&current);
        if next == current {
            return Ok(next);
        }
        current = next;
    }
    Err(Error::NormalizationDiverged(MAX_PASSES))
}
