//! Buffered lookahead over a [`StrTokenSource`].

use crate::token::Token;
use crate::token::TokenKind;
use crate::token_source::StrTokenSource;
use std::collections::VecDeque;

/// Provides `peek`/`peek_nth`/`consume` over the tokens of a
/// [`StrTokenSource`].
///
/// Lexer errors are folded into the stream as [`TokenKind::Error`] tokens, so
/// the parser can report them where they occur and keep going.
pub struct TokenStream<'src> {
    token_source: StrTokenSource<'src>,
    /// Unconsumed tokens. Grows at the back, consumed from the front.
    buffer: VecDeque<Token<'src>>,
}

impl<'src> TokenStream<'src> {
    pub fn new(token_source: StrTokenSource<'src>) -> Self {
        Self {
            token_source,
            buffer: VecDeque::new(),
        }
    }

    /// Advance to the next token and return it.
    ///
    /// Returns `None` once the stream is exhausted.
    pub fn consume(&mut self) -> Option<Token<'src>> {
        self.ensure_buffer_has(1);
        self.buffer.pop_front()
    }

    /// Returns the number of tokens currently buffered.
    pub fn current_buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn ensure_buffer_has(&mut self, count: usize) {
        while self.buffer.len() < count {
            match self.token_source.next() {
                Some(Ok(token)) => self.buffer.push_back(token),
                Some(Err(error)) => {
                    let span = error.span().clone();
                    self.buffer
                        .push_back(Token::new(TokenKind::Error(Box::new(error)), span));
                },
                None => break,
            }
        }
    }

    /// Returns `true` if there are no more tokens to consume, or if the next
    /// token is `Eof`.
    pub fn is_at_end(&mut self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => matches!(token.kind, TokenKind::Eof),
        }
    }

    #[inline]
    pub fn peek(&mut self) -> Option<&Token<'src>> {
        self.peek_nth(0)
    }

    /// Peek at the nth token ahead (0-indexed from the next unconsumed token).
    pub fn peek_nth(&mut self, n: usize) -> Option<&Token<'src>> {
        self.ensure_buffer_has(n + 1);
        self.buffer.get(n)
    }
}
