/// Error returned when decoding a string literal fails.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StringParsingError {
    /// An invalid escape sequence was encountered (e.g. `\q`).
    #[error("invalid escape sequence: `{0}`")]
    InvalidEscapeSequence(String),

    /// The string was not properly terminated.
    #[error("unterminated string: missing closing quote")]
    UnterminatedString,

    /// An invalid unicode escape sequence was encountered (e.g. `\u{ZZZZ}`).
    #[error("invalid unicode escape: `{0}`")]
    InvalidUnicodeEscape(String),
}
