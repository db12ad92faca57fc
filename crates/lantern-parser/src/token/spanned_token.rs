use crate::token::TokenKind;
use crate::token::TriviaToken;
use crate::SourceSpan;
use smallvec::SmallVec;

/// Trivia storage. Most tokens carry zero to two trivia items.
pub type TriviaTokenVec<'src> = SmallVec<[TriviaToken<'src>; 2]>;

/// A token with its span and an ordered list of any preceding trivia
/// (comments, commas).
#[derive(Clone, Debug, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub preceding_trivia: TriviaTokenVec<'src>,
    pub span: SourceSpan,
}

impl<'src> Token<'src> {
    /// Convenience constructor for a token with no preceding trivia.
    pub fn new(kind: TokenKind<'src>, span: SourceSpan) -> Self {
        Self {
            kind,
            preceding_trivia: SmallVec::new(),
            span,
        }
    }

    /// The literal source text this token stands for, as shown in
    /// diagnostics.
    pub fn literal(&self) -> String {
        self.kind.display()
    }
}
