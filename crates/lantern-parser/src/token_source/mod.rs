mod str_token_source;

pub use str_token_source::StrTokenSource;
