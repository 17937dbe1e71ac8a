//! Text-level diff helpers

use serde::Serialize;

use super::{compute_diff, DiffKind, DiffResult};
use crate::extract::TextRun;

/// Token counts of a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub kept: usize,
}

impl DiffSummary {
    pub fn of<T>(diff: &[DiffResult<T>]) -> Self {
        diff.iter().fold(Self::default(), |mut acc, d| {
            match d.kind {
                DiffKind::Add => acc.added += 1,
                DiffKind::Remove => acc.removed += 1,
                DiffKind::Keep => acc.kept += 1,
            }
            acc
        })
    }

    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Word diff of two texts, split on whitespace.
pub fn diff_words(old: &str, new: &str) -> Vec<DiffResult<String>> {
    let old: Vec<String> = old.split_whitespace().map(str::to_string).collect();
    let new: Vec<String> = new.split_whitespace().map(str::to_string).collect();
    compute_diff(&old, &new, |a, b| a == b)
}

/// Diff two pages' text runs by their text alone, ignoring surrounding
/// whitespace.
pub fn diff_runs(old: &[TextRun], new: &[TextRun]) -> Vec<DiffResult<TextRun>> {
    compute_diff(old, new, |a, b| a.text.trim() == b.text.trim())
}
