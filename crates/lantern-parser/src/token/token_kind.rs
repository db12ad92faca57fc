use crate::LexError;
use crate::StringParsingError;
use std::borrow::Cow;
use std::num::ParseFloatError;
use std::num::ParseIntError;

/// The kind of a token.
///
/// Literal values (`IntValue`, `FloatValue`, `StringValue`) store only the raw
/// source text. `StringValue` keeps its surrounding quotes so block strings
/// can be told apart from single-line strings when decoding.
///
/// # Negative Numeric Literals
///
/// Negative numbers like `-123` are lexed as single tokens (e.g.
/// `IntValue("-123")`), not as separate minus and number tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind<'src> {
    // =========================================================================
    // Punctuators
    // =========================================================================
    /// `&`
    Ampersand,
    /// `@`
    At,
    /// `!`
    Bang,
    /// `:`
    Colon,
    /// `}`
    CurlyBraceClose,
    /// `{`
    CurlyBraceOpen,
    /// A lone `.`
    Dot,
    /// `...`
    Ellipsis,
    /// `=`
    Equals,
    /// `)`
    ParenClose,
    /// `(`
    ParenOpen,
    /// `|`
    Pipe,
    /// `]`
    SquareBracketClose,
    /// `[`
    SquareBracketOpen,

    // =========================================================================
    // Names, variables and literals
    // =========================================================================
    /// A name/identifier. Structural keywords (`type`, `query`, ...) are
    /// names too; the parser matches them by text.
    Name(Cow<'src, str>),

    /// A `$name` variable reference. Holds the name without the `$`.
    Variable(Cow<'src, str>),

    /// Raw source text of an integer literal, including any negative sign.
    IntValue(Cow<'src, str>),

    /// Raw source text of a float literal, including any negative sign.
    FloatValue(Cow<'src, str>),

    /// Raw source text of a string literal, including its quotes.
    StringValue(Cow<'src, str>),

    /// The `true` literal.
    True,
    /// The `false` literal.
    False,
    /// The `null` literal.
    Null,

    /// End of input. The owning `Token` may carry trailing trivia.
    Eof,

    /// A lexer error, surfaced in-band so the parser can keep going and
    /// collect further errors.
    Error(Box<LexError>),
}

impl<'src> TokenKind<'src> {
    #[inline]
    pub fn name_borrowed(s: &'src str) -> Self {
        TokenKind::Name(Cow::Borrowed(s))
    }

    #[inline]
    pub fn name_owned(s: String) -> Self {
        TokenKind::Name(Cow::Owned(s))
    }

    /// Returns `true` if this token is a punctuator.
    pub fn is_punctuator(&self) -> bool {
        self.as_punctuator_str().is_some()
    }

    /// Returns the string representation of this token if it is a punctuator.
    pub fn as_punctuator_str(&self) -> Option<&'static str> {
        match self {
            TokenKind::Ampersand => Some("&"),
            TokenKind::At => Some("@"),
            TokenKind::Bang => Some("!"),
            TokenKind::Colon => Some(":"),
            TokenKind::CurlyBraceClose => Some("}"),
            TokenKind::CurlyBraceOpen => Some("{"),
            TokenKind::Dot => Some("."),
            TokenKind::Ellipsis => Some("..."),
            TokenKind::Equals => Some("="),
            TokenKind::ParenClose => Some(")"),
            TokenKind::ParenOpen => Some("("),
            TokenKind::Pipe => Some("|"),
            TokenKind::SquareBracketClose => Some("]"),
            TokenKind::SquareBracketOpen => Some("["),

            TokenKind::Name(_)
            | TokenKind::Variable(_)
            | TokenKind::IntValue(_)
            | TokenKind::FloatValue(_)
            | TokenKind::StringValue(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Eof
            | TokenKind::Error(_) => None,
        }
    }

    /// Returns `true` if this token represents a lexer error.
    pub fn is_error(&self) -> bool {
        matches!(self, TokenKind::Error(_))
    }

    /// A short human-readable rendering used in diagnostics.
    pub fn display(&self) -> String {
        if let Some(punct) = self.as_punctuator_str() {
            return punct.to_string();
        }
        match self {
            TokenKind::Name(s) => s.to_string(),
            TokenKind::Variable(s) => format!("${s}"),
            TokenKind::IntValue(s) | TokenKind::FloatValue(s) => s.to_string(),
            TokenKind::StringValue(_) => "string".to_string(),
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Error(err) => format!("tokenization error: {}", err.message()),
            _ => String::new(),
        }
    }

    /// Parse an `IntValue`'s raw text to `i64`.
    pub fn parse_int_value(&self) -> Option<Result<i64, ParseIntError>> {
        match self {
            TokenKind::IntValue(raw) => Some(raw.parse()),
            _ => None,
        }
    }

    /// Parse a `FloatValue`'s raw text to `f64`.
    pub fn parse_float_value(&self) -> Option<Result<f64, ParseFloatError>> {
        match self {
            TokenKind::FloatValue(raw) => Some(raw.parse()),
            _ => None,
        }
    }

    /// Decode a `StringValue`'s raw text.
    ///
    /// Single-line strings have their escape sequences processed and stay
    /// borrowed from the source when they contain none. Block strings are
    /// dedented and only `\"""` is treated as an escape.
    pub fn parse_string_value(&self) -> Option<Result<Cow<'src, str>, StringParsingError>> {
        match self {
            TokenKind::StringValue(raw) => Some(decode_string_literal(raw)),
            _ => None,
        }
    }
}

fn decode_string_literal<'src>(
    raw: &Cow<'src, str>,
) -> Result<Cow<'src, str>, StringParsingError> {
    if raw.starts_with("\"\"\"") {
        return decode_block_string(raw).map(Cow::Owned);
    }
    if raw.len() < 2 || !raw.starts_with('"') || !raw.ends_with('"') {
        return Err(StringParsingError::UnterminatedString);
    }
    match raw {
        Cow::Borrowed(s) if !s.contains('\\') => Ok(Cow::Borrowed(&s[1..s.len() - 1])),
        _ => decode_escapes(&raw[1..raw.len() - 1]).map(Cow::Owned),
    }
}

fn decode_escapes(content: &str) -> Result<String, StringParsingError> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('/') => result.push('/'),
            Some('b') => result.push('\u{0008}'),
            Some('f') => result.push('\u{000C}'),
            Some('u') => result.push(decode_unicode_escape(&mut chars)?),
            Some(other) => {
                return Err(StringParsingError::InvalidEscapeSequence(format!(
                    "\\{other}"
                )));
            },
            None => {
                return Err(StringParsingError::InvalidEscapeSequence(
                    "\\".to_string(),
                ));
            },
        }
    }

    Ok(result)
}

/// Decodes the part of a unicode escape after `\u`: either four hex digits or
/// a braced variable-length sequence.
fn decode_unicode_escape(
    chars: &mut std::iter::Peekable<std::str::Chars>,
) -> Result<char, StringParsingError> {
    let mut hex = String::with_capacity(4);
    let braced = chars.peek() == Some(&'{');
    if braced {
        chars.next();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) => {
                    return Err(StringParsingError::InvalidUnicodeEscape(format!(
                        "\\u{{{hex}{c}"
                    )));
                },
                None => {
                    return Err(StringParsingError::InvalidUnicodeEscape(format!(
                        "\\u{{{hex}"
                    )));
                },
            }
        }
    } else {
        for _ in 0..4 {
            match chars.next() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) => {
                    return Err(StringParsingError::InvalidUnicodeEscape(format!(
                        "\\u{hex}{c}"
                    )));
                },
                None => {
                    return Err(StringParsingError::InvalidUnicodeEscape(format!(
                        "\\u{hex}"
                    )));
                },
            }
        }
    }

    let invalid = || StringParsingError::InvalidUnicodeEscape(format!("\\u{hex}"));
    if hex.is_empty() {
        return Err(invalid());
    }
    let code_point = u32::from_str_radix(&hex, 16).map_err(|_| invalid())?;
    char::from_u32(code_point).ok_or_else(invalid)
}

/// Strips the triple quotes from a block string and removes the common
/// indentation of every line after the first, along with leading and trailing
/// blank lines.
fn decode_block_string(raw: &str) -> Result<String, StringParsingError> {
    if raw.len() < 6 || !raw.ends_with("\"\"\"") {
        return Err(StringParsingError::UnterminatedString);
    }
    let content = raw[3..raw.len() - 3].replace("\\\"\"\"", "\"\"\"");
    let lines: Vec<&str> = content.lines().collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut result_lines: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i > 0 && line.len() >= common_indent {
                &line[common_indent..]
            } else {
                line
            }
        })
        .collect();

    while result_lines.first().is_some_and(|l| l.trim().is_empty()) {
        result_lines.remove(0);
    }
    while result_lines.last().is_some_and(|l| l.trim().is_empty()) {
        result_lines.pop();
    }

    Ok(result_lines.join("\n"))
}
