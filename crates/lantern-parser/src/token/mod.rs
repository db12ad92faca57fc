mod spanned_token;
mod token_kind;
mod trivia_token;

pub use spanned_token::Token;
pub use spanned_token::TriviaTokenVec;
pub use token_kind::TokenKind;
pub use trivia_token::TriviaToken;
