//! A token source that lexes from one or more `&str` inputs.
//!
//! Token values borrow directly from the source text using `Cow::Borrowed`.
//! Comments and commas are captured as trivia on the following token.
//!
//! # Usage
//!
//! ```rust
//! use lantern_parser::token_source::StrTokenSource;
//!
//! let mut lexer = StrTokenSource::new("{ name }");
//! while let Some(token) = lexer.next() {
//!     let token = token.unwrap();
//!     println!("{:?}", token.kind);
//! }
//! ```

use crate::token::Token;
use crate::token::TokenKind;
use crate::token::TriviaToken;
use crate::token::TriviaTokenVec;
use crate::LexError;
use crate::Source;
use crate::SourcePosition;
use crate::SourceSpan;
use smallvec::smallvec;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

/// Lexes a sequence of inputs as one token stream.
///
/// Positions restart at line 0, column 0 for every input, and each token's
/// span carries the path of the input it came from.
pub struct StrTokenSource<'src> {
    /// All inputs, in lexing order.
    inputs: Vec<(&'src str, Option<Arc<Path>>)>,

    /// Index into `inputs` of the input currently being lexed.
    input_index: usize,

    /// Text of the current input.
    source: &'src str,

    /// Path of the current input, if any.
    file_path: Option<Arc<Path>>,

    /// Current byte offset from the start of `source`.
    curr_byte_offset: usize,

    /// Current 0-based line number.
    curr_line: usize,

    /// Current 0-based character column.
    curr_col: usize,

    /// Whether the previous character was `\r`, so that `\r\n` counts as a
    /// single line break.
    last_char_was_cr: bool,

    /// Trivia accumulated before the next token.
    pending_trivia: TriviaTokenVec<'src>,

    /// Whether the EOF token has been emitted.
    finished: bool,
}

impl<'src> StrTokenSource<'src> {
    /// Creates a token source over a single unnamed input.
    pub fn new(source: &'src str) -> Self {
        Self::from_inputs(vec![(source, None)])
    }

    /// Creates a token source over a single input attributed to `path`.
    pub fn with_file_path(source: &'src str, path: &Path) -> Self {
        Self::from_inputs(vec![(source, Some(Arc::from(path)))])
    }

    /// Creates a token source that lexes every source in order, as if they
    /// were one document.
    pub fn from_sources(sources: &'src [Source]) -> Self {
        Self::from_inputs(
            sources
                .iter()
                .map(|s| (s.text(), s.path().cloned()))
                .collect(),
        )
    }

    fn from_inputs(inputs: Vec<(&'src str, Option<Arc<Path>>)>) -> Self {
        let (source, file_path) = inputs
            .first()
            .map(|(text, path)| (*text, path.clone()))
            .unwrap_or(("", None));
        Self {
            inputs,
            input_index: 0,
            source,
            file_path,
            curr_byte_offset: 0,
            curr_line: 0,
            curr_col: 0,
            last_char_was_cr: false,
            pending_trivia: smallvec![],
            finished: false,
        }
    }

    // =========================================================================
    // Position and scanning helpers
    // =========================================================================

    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    fn curr_position(&self) -> SourcePosition {
        SourcePosition::new(self.curr_line, self.curr_col, self.curr_byte_offset)
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes the next character, updating line/column tracking.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;

        if ch == '\n' {
            if self.last_char_was_cr {
                self.last_char_was_cr = false;
            } else {
                self.curr_line += 1;
                self.curr_col = 0;
            }
        } else if ch == '\r' {
            self.curr_line += 1;
            self.curr_col = 0;
            self.last_char_was_cr = true;
        } else {
            self.curr_col += 1;
            self.last_char_was_cr = false;
        }

        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    /// Advances over `byte_len` bytes known to contain no line terminators.
    fn consume_within_line(&mut self, byte_len: usize) {
        let text = &self.remaining()[..byte_len];
        self.curr_col += text.chars().count();
        self.curr_byte_offset += byte_len;
        self.last_char_was_cr = false;
    }

    fn make_span(&self, start: SourcePosition) -> SourceSpan {
        let end = self.curr_position();
        match &self.file_path {
            Some(path) => SourceSpan::with_file(start, end, path.clone()),
            None => SourceSpan::new(start, end),
        }
    }

    fn make_token(&mut self, kind: TokenKind<'src>, span: SourceSpan) -> Token<'src> {
        Token {
            kind,
            preceding_trivia: std::mem::take(&mut self.pending_trivia),
            span,
        }
    }

    fn punctuator(&mut self, kind: TokenKind<'src>, start: SourcePosition) -> Token<'src> {
        self.consume();
        let span = self.make_span(start);
        self.make_token(kind, span)
    }

    /// Moves on to the next input, if there is one.
    fn advance_input(&mut self) -> bool {
        if self.input_index + 1 >= self.inputs.len() {
            return false;
        }
        self.input_index += 1;
        let (text, path) = &self.inputs[self.input_index];
        self.source = *text;
        self.file_path = path.clone();
        self.curr_byte_offset = 0;
        self.curr_line = 0;
        self.curr_col = 0;
        self.last_char_was_cr = false;
        true
    }

    // =========================================================================
    // Lexer main loop
    // =========================================================================

    /// Lexes the next token.
    ///
    /// On error the offending input has already been consumed, so calling
    /// this again continues with whatever follows it.
    pub fn next_token(&mut self) -> Result<Token<'src>, LexError> {
        loop {
            self.skip_whitespace();

            let start = self.curr_position();

            let ch = match self.peek_char() {
                Some(ch) => ch,
                None => {
                    if self.advance_input() {
                        continue;
                    }
                    self.finished = true;
                    let span = self.make_span(start);
                    return Ok(self.make_token(TokenKind::Eof, span));
                },
            };

            return match ch {
                '#' => {
                    self.lex_comment(start);
                    continue;
                },
                ',' => {
                    self.consume();
                    let span = self.make_span(start);
                    self.pending_trivia.push(TriviaToken::Comma { span });
                    continue;
                },

                '!' => Ok(self.punctuator(TokenKind::Bang, start)),
                '&' => Ok(self.punctuator(TokenKind::Ampersand, start)),
                '(' => Ok(self.punctuator(TokenKind::ParenOpen, start)),
                ')' => Ok(self.punctuator(TokenKind::ParenClose, start)),
                ':' => Ok(self.punctuator(TokenKind::Colon, start)),
                '=' => Ok(self.punctuator(TokenKind::Equals, start)),
                '@' => Ok(self.punctuator(TokenKind::At, start)),
                '[' => Ok(self.punctuator(TokenKind::SquareBracketOpen, start)),
                ']' => Ok(self.punctuator(TokenKind::SquareBracketClose, start)),
                '{' => Ok(self.punctuator(TokenKind::CurlyBraceOpen, start)),
                '}' => Ok(self.punctuator(TokenKind::CurlyBraceClose, start)),
                '|' => Ok(self.punctuator(TokenKind::Pipe, start)),

                '.' => Ok(self.lex_dot_or_ellipsis(start)),
                '"' => self.lex_string(start),
                '$' => self.lex_variable(start),
                c if is_name_start(c) => Ok(self.lex_name(start)),
                c if c == '-' || c.is_ascii_digit() => self.lex_number(start),

                other => {
                    self.consume();
                    Err(LexError::new(
                        format!("unrecognized character: {other:?}"),
                        Some(other),
                        self.make_span(start),
                    ))
                },
            };
        }
    }

    // =========================================================================
    // Whitespace and comments
    // =========================================================================

    /// Skips spaces, tabs, line terminators and the unicode BOM.
    ///
    /// Commas are insignificant too, but are kept as trivia instead.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | '\u{FEFF}' => {
                    self.consume();
                },
                _ => break,
            }
        }
    }

    /// Lexes a `#` comment up to the end of the line into pending trivia.
    fn lex_comment(&mut self, start: SourcePosition) {
        self.consume();
        let content_start = self.curr_byte_offset;
        let rest = self.remaining().as_bytes();
        let len = memchr::memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
        self.consume_within_line(len);

        let content = &self.source[content_start..content_start + len];
        let span = self.make_span(start);
        self.pending_trivia.push(TriviaToken::Comment {
            value: Cow::Borrowed(content),
            span,
        });
    }

    // =========================================================================
    // Punctuation with lookahead
    // =========================================================================

    /// Three adjacent dots form a spread; anything else is a single dot.
    fn lex_dot_or_ellipsis(&mut self, start: SourcePosition) -> Token<'src> {
        if self.remaining().starts_with("...") {
            self.consume_within_line(3);
            let span = self.make_span(start);
            return self.make_token(TokenKind::Ellipsis, span);
        }
        self.punctuator(TokenKind::Dot, start)
    }

    // =========================================================================
    // Names and variables
    // =========================================================================

    /// Lexes a name. `true`, `false` and `null` get distinct token kinds.
    fn lex_name(&mut self, start: SourcePosition) -> Token<'src> {
        let name = self.scan_name();
        let span = self.make_span(start);
        let kind = match name {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::name_borrowed(name),
        };
        self.make_token(kind, span)
    }

    fn scan_name(&mut self) -> &'src str {
        let name_start = self.curr_byte_offset;
        let len = self
            .remaining()
            .bytes()
            .position(|b| !is_name_continue(b as char))
            .unwrap_or(self.remaining().len());
        self.consume_within_line(len);
        &self.source[name_start..name_start + len]
    }

    fn lex_variable(&mut self, start: SourcePosition) -> Result<Token<'src>, LexError> {
        self.consume();
        match self.peek_char() {
            Some(c) if is_name_start(c) => {
                let name = self.scan_name();
                let span = self.make_span(start);
                Ok(self.make_token(TokenKind::Variable(Cow::Borrowed(name)), span))
            },
            _ => Err(LexError::new(
                "expected a variable name after `$`",
                Some('$'),
                self.make_span(start),
            )),
        }
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    /// Lexes an integer or float literal.
    ///
    /// A literal is a float when it has a `.digits` fraction or an exponent.
    fn lex_number(&mut self, start: SourcePosition) -> Result<Token<'src>, LexError> {
        let num_start = self.curr_byte_offset;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            self.consume();
        }

        match self.peek_char() {
            Some('0') => {
                self.consume();
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.number_error(
                        start,
                        num_start,
                        "invalid number: leading zeros are not allowed",
                    ));
                }
            },
            Some(c) if c.is_ascii_digit() => self.consume_digits(),
            _ => {
                return Err(LexError::new(
                    "unexpected `-`",
                    Some('-'),
                    self.make_span(start),
                ));
            },
        }

        if self.peek_char() == Some('.')
            && self.peek_char_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.consume();
            self.consume_digits();
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_float = true;
            self.consume();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.consume();
            }
            if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.number_error(
                    start,
                    num_start,
                    "invalid number: exponent must have at least one digit",
                ));
            }
            self.consume_digits();
        }

        let text = &self.source[num_start..self.curr_byte_offset];
        let span = self.make_span(start);
        let kind = if is_float {
            TokenKind::FloatValue(Cow::Borrowed(text))
        } else {
            TokenKind::IntValue(Cow::Borrowed(text))
        };
        Ok(self.make_token(kind, span))
    }

    fn consume_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.consume();
        }
    }

    /// Builds an error for a malformed number, first consuming the rest of
    /// the number-like run so lexing resumes after it.
    fn number_error(
        &mut self,
        start: SourcePosition,
        num_start: usize,
        message: &str,
    ) -> LexError {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-') {
                self.consume();
            } else {
                break;
            }
        }
        let text = &self.source[num_start..self.curr_byte_offset];
        LexError::new(
            format!("{message}: `{text}`"),
            text.chars().next(),
            self.make_span(start),
        )
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Lexes a single-line or block string literal.
    ///
    /// A backslash skips the character after it, so `\"` never terminates a
    /// single-line string. Escapes are decoded later by
    /// [`TokenKind::parse_string_value`].
    fn lex_string(&mut self, start: SourcePosition) -> Result<Token<'src>, LexError> {
        let str_start = self.curr_byte_offset;

        if self.remaining().starts_with("\"\"\"") {
            return self.lex_block_string(start, str_start);
        }

        self.consume();
        loop {
            match self.peek_char() {
                None | Some('\n') | Some('\r') => {
                    return Err(LexError::new(
                        "unterminated string literal",
                        Some('"'),
                        self.make_span(start),
                    ));
                },
                Some('\\') => {
                    self.consume();
                    self.consume();
                },
                Some('"') => {
                    self.consume();
                    break;
                },
                Some(_) => {
                    self.consume();
                },
            }
        }

        let text = &self.source[str_start..self.curr_byte_offset];
        let span = self.make_span(start);
        Ok(self.make_token(TokenKind::StringValue(Cow::Borrowed(text)), span))
    }

    fn lex_block_string(
        &mut self,
        start: SourcePosition,
        str_start: usize,
    ) -> Result<Token<'src>, LexError> {
        self.consume_within_line(3);
        loop {
            let rest = self.remaining();
            if rest.starts_with("\\\"\"\"") {
                self.consume_within_line(4);
            } else if rest.starts_with("\"\"\"") {
                self.consume_within_line(3);
                break;
            } else if self.consume().is_none() {
                return Err(LexError::new(
                    "unterminated block string",
                    Some('"'),
                    self.make_span(start),
                ));
            }
        }

        let text = &self.source[str_start..self.curr_byte_offset];
        let span = self.make_span(start);
        Ok(self.make_token(TokenKind::StringValue(Cow::Borrowed(text)), span))
    }
}

impl<'src> Iterator for StrTokenSource<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            None
        } else {
            Some(self.next_token())
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
