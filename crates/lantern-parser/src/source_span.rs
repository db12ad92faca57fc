use crate::SourcePosition;
use std::path::Path;
use std::sync::Arc;

/// Represents a span of source text from start to end position.
///
/// The span is a half-open interval: `[start_inclusive, end_exclusive)`.
///
/// Optionally includes the path of the source the span refers to. The path is
/// reference counted since every token of a source shares it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceSpan {
    pub start_inclusive: SourcePosition,
    pub end_exclusive: SourcePosition,
    pub file_path: Option<Arc<Path>>,
}

impl SourceSpan {
    /// Creates a span without file path information.
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
            file_path: None,
        }
    }

    /// Creates a span with file path information.
    pub fn with_file(
        start: SourcePosition,
        end: SourcePosition,
        file_path: Arc<Path>,
    ) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
            file_path: Some(file_path),
        }
    }

    /// A zero-width span at the very start of an unnamed source.
    pub fn zero() -> Self {
        let zero = SourcePosition::new(0, 0, 0);
        Self::new(zero.clone(), zero)
    }

    /// Renders the file path for diagnostics, `<input>` when there is none.
    pub fn file_display(&self) -> String {
        self.file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<input>".to_string())
    }

    /// Returns the 1-based `(line, column)` of the span's start.
    pub fn start_line_col(&self) -> (usize, usize) {
        self.start_inclusive.to_line_col()
    }
}
