//! Text run extraction
//!
//! Turns a page's text content stream into [`TextRun`]s in native space.
//!
//! Geometry comes straight from each item's transform `[a, b, c, d, e, f]`:
//! position is `(e, f)` and the font size is `|d|`. The vertical scale is only
//! an approximation of the font size for rotated or skewed text. Runs come out
//! in stream order, which is not necessarily visual reading order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{PageHandle, TextItem};
use crate::error::{EditorError, Result};

/// A text run in native coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub font_name: Option<String>,
    pub transform: [f64; 6],
}

impl TextRun {
    /// Build a run from a stream item. Blank items yield `None`.
    pub fn from_item(item: &TextItem) -> Option<Self> {
        if item.text.trim().is_empty() {
            return None;
        }

        let [_, _, _, d, e, f] = item.transform;
        let font_size = d.abs();

        Some(Self {
            text: item.text.clone(),
            x: e,
            y: f,
            width: non_zero(item.width).unwrap_or(0.0),
            height: non_zero(item.height).unwrap_or(font_size),
            font_size,
            font_name: item.font_name.clone(),
            transform: item.transform,
        })
    }
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Lazy adapter from text items to text runs
///
/// Skips blank items and preserves stream order.
#[derive(Debug, Clone)]
pub struct TextRuns<I> {
    items: I,
}

impl<I> Iterator for TextRuns<I>
where
    I: Iterator<Item = TextItem>,
{
    type Item = TextRun;

    fn next(&mut self) -> Option<TextRun> {
        self.items.by_ref().find_map(|item| TextRun::from_item(&item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

/// Adapt any sequence of text items into text runs.
pub fn text_runs<I>(items: I) -> TextRuns<I::IntoIter>
where
    I: IntoIterator<Item = TextItem>,
{
    TextRuns {
        items: items.into_iter(),
    }
}

/// Reads text runs from a page
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRunExtractor;

impl TextRunExtractor {
    /// Query the page's text stream.
    ///
    /// Each call re-queries the page, so calling again restarts the sequence.
    pub async fn extract(
        &self,
        page: &dyn PageHandle,
    ) -> Result<TextRuns<std::vec::IntoIter<TextItem>>> {
        let content = page
            .text_content()
            .await
            .map_err(|e| EditorError::ExtractionFailure(e.to_string()))?;

        debug!("Text stream has {} items", content.items.len());
        Ok(text_runs(content.items))
    }
}
