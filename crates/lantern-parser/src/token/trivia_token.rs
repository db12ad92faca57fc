use crate::SourceSpan;
use std::borrow::Cow;

/// A token that doesn't affect parsing but is still preserved.
///
/// Trivia is attached to the *following* token as "preceding trivia".
#[derive(Clone, Debug, PartialEq)]
pub enum TriviaToken<'src> {
    /// A `#` comment. The value excludes the leading `#`.
    Comment {
        value: Cow<'src, str>,
        span: SourceSpan,
    },

    /// A comma separator. Commas are insignificant in both the schema and
    /// query languages.
    Comma { span: SourceSpan },
}
