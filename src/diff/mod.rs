//! Sequence diff
//!
//! Longest-common-subsequence diff over arbitrary token sequences. Used to
//! show how the text of a page changed between two versions of a document.
//!
//! The DP table is a single flat allocation of `(n + 1) * (m + 1)` cells, so
//! time and memory are both `O(n * m)`.

mod text;

use serde::{Deserialize, Serialize};

pub use text::{diff_runs, diff_words, DiffSummary};

/// What happened to a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Only in the second sequence
    Add,
    /// Only in the first sequence
    Remove,
    /// In both sequences
    Keep,
}

/// One step of a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult<T> {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub value: T,
}

impl<T> DiffResult<T> {
    fn new(kind: DiffKind, value: T) -> Self {
        Self { kind, value }
    }
}

/// LCS length table, row-major
struct LcsTable {
    cells: Vec<u32>,
    width: usize,
}

impl LcsTable {
    fn build<T, F>(seq1: &[T], seq2: &[T], equal: &F) -> Self
    where
        F: Fn(&T, &T) -> bool,
    {
        let width = seq2.len() + 1;
        let mut cells = vec![0u32; (seq1.len() + 1) * width];
        for i in 1..=seq1.len() {
            for j in 1..=seq2.len() {
                cells[i * width + j] = if equal(&seq1[i - 1], &seq2[j - 1]) {
                    cells[(i - 1) * width + (j - 1)] + 1
                } else {
                    cells[(i - 1) * width + j].max(cells[i * width + (j - 1)])
                };
            }
        }
        Self { cells, width }
    }

    fn at(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.width + j]
    }
}

/// Diff two sequences under a caller-supplied equality.
///
/// On ties the backtrack prefers emitting an addition, so a replaced token
/// comes out as `remove` followed by `add`.
pub fn compute_diff<T, F>(seq1: &[T], seq2: &[T], equal: F) -> Vec<DiffResult<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let table = LcsTable::build(seq1, seq2, &equal);
    let mut result = Vec::with_capacity(seq1.len().max(seq2.len()));

    let (mut i, mut j) = (seq1.len(), seq2.len());
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && equal(&seq1[i - 1], &seq2[j - 1]) {
            result.push(DiffResult::new(DiffKind::Keep, seq1[i - 1].clone()));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table.at(i, j - 1) >= table.at(i - 1, j)) {
            result.push(DiffResult::new(DiffKind::Add, seq2[j - 1].clone()));
            j -= 1;
        } else {
            result.push(DiffResult::new(DiffKind::Remove, seq1[i - 1].clone()));
            i -= 1;
        }
    }

    result.reverse();
    result
}

/// Diff two sequences using `PartialEq`.
pub fn compute_generic_diff<T>(seq1: &[T], seq2: &[T]) -> Vec<DiffResult<T>>
where
    T: Clone + PartialEq,
{
    compute_diff(seq1, seq2, |a, b| a == b)
}

/// The first sequence, rebuilt from keeps and removals.
pub fn reconstruct_old<T: Clone>(diff: &[DiffResult<T>]) -> Vec<T> {
    diff.iter()
        .filter(|d| d.kind != DiffKind::Add)
        .map(|d| d.value.clone())
        .collect()
}

/// The second sequence, rebuilt from keeps and additions.
pub fn reconstruct_new<T: Clone>(diff: &[DiffResult<T>]) -> Vec<T> {
    diff.iter()
        .filter(|d| d.kind != DiffKind::Remove)
        .map(|d| d.value.clone())
        .collect()
}
