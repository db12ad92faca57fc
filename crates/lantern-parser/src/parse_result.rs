//! Parse output that keeps a recovered document next to its errors.

use crate::ParseError;

/// A parsed document plus every error met on the way.
///
/// The parser skips to the next definition after an error, so one pass
/// reports all of a file's problems. Convert into a `Result` to treat any
/// error as fatal.
#[derive(Debug)]
pub struct ParseResult<TAst> {
    ast: Option<TAst>,

    /// Empty on a clean parse.
    pub errors: Vec<ParseError>,
}

impl<TAst> ParseResult<TAst> {
    pub(crate) fn ok(ast: TAst) -> Self {
        Self {
            ast: Some(ast),
            errors: Vec::new(),
        }
    }

    pub(crate) fn recovered(ast: TAst, errors: Vec<ParseError>) -> Self {
        Self {
            ast: Some(ast),
            errors,
        }
    }

    /// The document, if it parsed without errors.
    pub fn valid_ast(&self) -> Option<&TAst> {
        if self.errors.is_empty() {
            self.ast.as_ref()
        } else {
            None
        }
    }

    /// The document, recovered or not.
    pub fn ast(&self) -> Option<&TAst> {
        self.ast.as_ref()
    }

    pub fn into_ast(self) -> Option<TAst> {
        self.ast
    }

    pub fn is_ok(&self) -> bool {
        self.ast.is_some() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Formats all errors, one per line.
    pub fn format_errors(&self) -> String {
        self.errors
            .iter()
            .map(ParseError::format_oneline)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<TAst> From<ParseResult<TAst>> for Result<TAst, Vec<ParseError>> {
    /// Treats a recovered AST as a failure.
    fn from(result: ParseResult<TAst>) -> Self {
        if result.errors.is_empty() {
            match result.ast {
                Some(ast) => Ok(ast),
                None => Err(Vec::new()),
            }
        } else {
            Err(result.errors)
        }
    }
}
