use crate::LexError;
use crate::ParseErrorKind;
use crate::SourceSpan;

/// A parse error with location information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct ParseError {
    /// Human-readable error message, e.g. "expected `:`, found `String`".
    message: String,

    /// Where the error was detected. For "expected X" errors this is where X
    /// should have appeared.
    span: SourceSpan,

    kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: SourceSpan, kind: ParseErrorKind) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
        }
    }

    /// Wraps a lexer error surfaced through the token stream.
    pub fn from_lex_error(error: LexError) -> Self {
        Self {
            message: error.message().to_string(),
            span: error.span().clone(),
            kind: ParseErrorKind::Lex(error),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> &SourceSpan {
        &self.span
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// 1-based `(line, column)` of the error.
    pub fn line_col(&self) -> (usize, usize) {
        self.span.start_line_col()
    }

    /// Formats this error as a single-line summary:
    ///
    /// ```text
    /// schema.graphql:5:12: error: expected `:`, found `String`
    /// ```
    pub fn format_oneline(&self) -> String {
        let (line, column) = self.line_col();
        format!(
            "{}:{line}:{column}: error: {}",
            self.span.file_display(),
            self.message,
        )
    }

    /// Formats this error with the offending source line and a caret
    /// underline when `source` is given:
    ///
    /// ```text
    /// error: expected `:`, found `String`
    ///   --> schema.graphql:5:12
    ///    |
    ///  5 |     userName String
    ///    |              ^^^^^^
    /// ```
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        let (line, column) = self.line_col();
        let mut output = format!(
            "error: {}\n  --> {}:{line}:{column}\n",
            self.message,
            self.span.file_display(),
        );

        if let Some(line_content) = source.and_then(|src| src.lines().nth(line - 1)) {
            let width = line.to_string().len().max(2);
            let start_col = self.span.start_inclusive.col();
            let end_col = self.span.end_exclusive.col();
            let underline_len = if self.span.end_exclusive.line() == self.span.start_inclusive.line()
                && end_col > start_col
            {
                end_col - start_col
            } else {
                1
            };
            output.push_str(&format!("{:>width$} |\n", ""));
            output.push_str(&format!("{line:>width$} | {line_content}\n"));
            output.push_str(&format!(
                "{:>width$} | {}{}\n",
                "",
                " ".repeat(start_col),
                "^".repeat(underline_len),
            ));
        }

        output
    }
}
