// core/src/distance.rs
//
// Edit-distance primitives.
//
// - `weighted_levenshtein`: two-row DP where substituting neighbouring keys
//   costs `ADJACENT_KEY_COST` instead of 1.0
// - `EditMatrix`: full unit-cost matrix kept for backtracing in the
//   character aligner

use crate::keyboard::KeyboardLayout;

/// Substitution cost between keys that are neighbours on the active layout.
pub const ADJACENT_KEY_COST: f64 = 0.8;

/// Levenshtein distance with keyboard-aware substitution cost.
///
/// Insertions and deletions cost 1.0. Substitutions cost 1.0, or
/// `ADJACENT_KEY_COST` when `layout` is given and the two characters are
/// neighbours on it.
pub fn weighted_levenshtein(a: &str, b: &str, layout: Option<KeyboardLayout>) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len() as f64;
    }
    if b.is_empty() {
        return a.len() as f64;
    }

    let mut prev: Vec<f64> = (0..=b.len()).map(|j| j as f64).collect();
    let mut curr = vec![0.0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i as f64;
        for j in 1..=b.len() {
            let sub = if a[i - 1] == b[j - 1] {
                0.0
            } else {
                substitution_cost(a[i - 1], b[j - 1], layout)
            };
            curr[j] = (prev[j] + 1.0) // deletion
                .min(curr[j - 1] + 1.0) // insertion
                .min(prev[j - 1] + sub); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn substitution_cost(a: char, b: char, layout: Option<KeyboardLayout>) -> f64 {
    match layout {
        Some(l) if l.are_adjacent(a, b) => ADJACENT_KEY_COST,
        _ => 1.0,
    }
}

/// Full unit-cost edit-distance matrix between a `source` (rows) and a
/// `target` (columns) character sequence.
#[derive(Debug, Clone)]
pub struct EditMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<usize>,
}

impl EditMatrix {
    pub fn build(source: &[char], target: &[char]) -> Self {
        let rows = source.len() + 1;
        let cols = target.len() + 1;
        let mut cells = vec![0usize; rows * cols];

        for i in 0..rows {
            cells[i * cols] = i;
        }
        for j in 0..cols {
            cells[j] = j;
        }

        for i in 1..rows {
            for j in 1..cols {
                let sub = usize::from(source[i - 1] != target[j - 1]);
                let best = (cells[(i - 1) * cols + j] + 1)
                    .min(cells[i * cols + j - 1] + 1)
                    .min(cells[(i - 1) * cols + j - 1] + sub);
                cells[i * cols + j] = best;
            }
        }

        Self { rows, cols, cells }
    }

    /// Cost at cell `(i, j)`; `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        if i < self.rows && j < self.cols {
            Some(self.cells[i * self.cols + j])
        } else {
            None
        }
    }

    /// Total distance.
    pub fn distance(&self) -> usize {
        self.cells[self.rows * self.cols - 1]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}
