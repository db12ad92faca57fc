use crate::SourceSpan;

/// An error produced while turning source text into tokens.
///
/// Carries the offending character (when there is a single one to blame) and
/// the span it was found at, which in turn carries the source path.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct LexError {
    message: String,
    character: Option<char>,
    span: SourceSpan,
}

impl LexError {
    pub fn new(
        message: impl Into<String>,
        character: Option<char>,
        span: SourceSpan,
    ) -> Self {
        Self {
            message: message.into(),
            character,
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The character that could not be lexed, if the error is about one.
    pub fn character(&self) -> Option<char> {
        self.character
    }

    pub fn span(&self) -> &SourceSpan {
        &self.span
    }

    /// 1-based line of the error.
    pub fn line(&self) -> usize {
        self.span.start_line_col().0
    }

    /// 1-based column of the error.
    pub fn column(&self) -> usize {
        self.span.start_line_col().1
    }

    /// Formats this error as `path:line:col: error: message`.
    pub fn format_oneline(&self) -> String {
        let (line, column) = self.span.start_line_col();
        format!(
            "{}:{line}:{column}: error: {}",
            self.span.file_display(),
            self.message,
        )
    }
}
