//! Recursive-descent parser for schema and query documents.
//!
//! The parser pulls tokens from a [`TokenStream`] with one token of
//! lookahead (occasionally two, via `peek_nth`). Each top-level keyword has
//! its own sub-parser. Errors are recorded rather than returned, and the
//! parser resynchronises at the next definition so a single pass reports
//! every error in a document.
//!
//! Internal helpers return `Result<T, ()>`: the `Err` side only signals that
//! an error has already been recorded and the caller should unwind to a
//! recovery point.

use crate::ast;
use crate::ast::DirectiveLocation;
use crate::ast::OperationKind;
use crate::token::Token;
use crate::token::TokenKind;
use crate::token_source::StrTokenSource;
use crate::ParseError;
use crate::ParseErrorKind;
use crate::ParseResult;
use crate::Source;
use crate::SourcePosition;
use crate::SourceSpan;
use crate::TokenStream;
use crate::Value;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Maximum nesting depth for values, type annotations and selection sets.
const MAX_RECURSION_DEPTH: usize = 64;

/// Keywords that start a definition in a schema document.
const SCHEMA_KEYWORDS: [&str; 8] = [
    "type",
    "interface",
    "union",
    "enum",
    "scalar",
    "input",
    "directive",
    "extend",
];

#[derive(Clone, Copy, Debug, PartialEq)]
enum DocumentKind {
    Schema,
    Executable,
}

/// Parses schema (SDL) and query documents.
///
/// # Example
///
/// ```
/// use lantern_parser::Parser;
///
/// let result = Parser::new("type Query { hello: String }").parse_schema_document();
/// assert!(result.is_ok());
/// ```
pub struct Parser<'src> {
    token_stream: TokenStream<'src>,

    errors: Vec<ParseError>,

    /// Shared nesting counter for `parse_value`, `parse_type_annotation` and
    /// `parse_selection_set`.
    recursion_depth: usize,

    /// End position (and path) of the most recently consumed token, used to
    /// anchor spans and end-of-input errors.
    last_end_position: Option<SourcePosition>,
    last_file_path: Option<Arc<Path>>,

    /// Number of tokens consumed so far. Recovery loops use it to guarantee
    /// forward progress.
    consumed: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::from_token_source(StrTokenSource::new(source))
    }

    pub fn with_file_path(source: &'src str, path: &Path) -> Self {
        Self::from_token_source(StrTokenSource::with_file_path(source, path))
    }

    /// Parses several sources as one document.
    pub fn from_sources(sources: &'src [Source]) -> Self {
        Self::from_token_source(StrTokenSource::from_sources(sources))
    }

    pub fn from_token_source(token_source: StrTokenSource<'src>) -> Self {
        Self {
            token_stream: TokenStream::new(token_source),
            errors: Vec::new(),
            recursion_depth: 0,
            last_end_position: None,
            last_file_path: None,
            consumed: 0,
        }
    }

    // =========================================================================
    // Document entry points
    // =========================================================================

    /// Parses a document of type definitions, type extensions and directive
    /// definitions.
    pub fn parse_schema_document(mut self) -> ParseResult<ast::SchemaDocument> {
        let mut document = ast::SchemaDocument::default();

        while !self.token_stream.is_at_end() {
            let before = self.consumed;
            match self.parse_schema_definition_item() {
                Ok(definition) => document.definitions.push(definition),
                Err(()) => self.recover_to_next_definition(DocumentKind::Schema, before),
            }
        }
        self.finish_trailing_lex_errors();

        if self.errors.is_empty() {
            ParseResult::ok(document)
        } else {
            ParseResult::recovered(document, self.errors)
        }
    }

    /// Parses a document of operations and fragments.
    pub fn parse_executable_document(mut self) -> ParseResult<ast::ExecutableDocument> {
        let mut document = ast::ExecutableDocument::default();

        while !self.token_stream.is_at_end() {
            let before = self.consumed;
            match self.parse_executable_definition_item() {
                Ok(ExecutableItem::Operation(op)) => document.operations.push(op),
                Ok(ExecutableItem::Fragment(fragment)) => {
                    if document.fragment(&fragment.name).is_some() {
                        self.record_error(ParseError::new(
                            format!("fragment `{}` is defined more than once", fragment.name),
                            fragment.span.clone(),
                            ParseErrorKind::DuplicateName(fragment.name.clone()),
                        ));
                    } else {
                        document.fragments.push(fragment);
                    }
                },
                Err(()) => self.recover_to_next_definition(DocumentKind::Executable, before),
            }
        }
        self.finish_trailing_lex_errors();

        if document.operations.is_empty() && self.errors.is_empty() {
            let span = self.eof_span();
            self.record_error(ParseError::new(
                "document contains no operation",
                span,
                ParseErrorKind::UnexpectedEof {
                    expected: vec!["query".to_string(), "{".to_string()],
                },
            ));
        }

        if self.errors.is_empty() {
            ParseResult::ok(document)
        } else {
            ParseResult::recovered(document, self.errors)
        }
    }

    fn finish_trailing_lex_errors(&mut self) {
        while let Some(token) = self.token_stream.peek() {
            if !token.kind.is_error() {
                break;
            }
            self.unexpected(&[]);
        }
    }

    // =========================================================================
    // Error recording and recovery
    // =========================================================================

    fn record_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Records an error for the next token not being one of `expected`.
    ///
    /// Lexer error tokens are consumed and reported as lexer errors.
    fn unexpected(&mut self, expected: &[&str]) {
        let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        let expected_display = expected
            .iter()
            .map(|e| format!("`{e}`"))
            .collect::<Vec<_>>()
            .join(" or ");

        let is_lex_error = self.token_stream.peek().is_some_and(|t| t.kind.is_error());
        if is_lex_error {
            if let Some(Token {
                kind: TokenKind::Error(error),
                ..
            }) = self.consume_token()
            {
                self.record_error(ParseError::from_lex_error(*error));
            }
            return;
        }

        let found = self.token_stream.peek().map(|t| (t.kind.clone(), t.span.clone()));
        match found {
            None | Some((TokenKind::Eof, _)) => {
                let span = self.eof_span();
                self.record_error(ParseError::new(
                    format!("expected {expected_display}, found end of input"),
                    span,
                    ParseErrorKind::UnexpectedEof { expected },
                ));
            },
            Some((kind, span)) => {
                let found = kind.display();
                self.record_error(ParseError::new(
                    format!("expected {expected_display}, found `{found}`"),
                    span,
                    ParseErrorKind::UnexpectedToken { expected, found },
                ));
            },
        }
    }

    /// Skips tokens until something that looks like the start of a new
    /// definition.
    ///
    /// `before` is the consumed-token count when the failed definition
    /// started; at least one token is skipped past it so recovery always
    /// makes progress.
    fn recover_to_next_definition(&mut self, document_kind: DocumentKind, before: usize) {
        if self.consumed == before {
            self.consume_token();
        }
        loop {
            let Some(kind) = self.token_stream.peek().map(|t| t.kind.clone()) else {
                break;
            };
            let stop = match kind {
                TokenKind::Eof => true,
                TokenKind::CurlyBraceOpen => document_kind == DocumentKind::Executable,
                TokenKind::Name(name) => {
                    self.looks_like_definition_start(document_kind, &name, 1)
                },
                TokenKind::StringValue(_) => {
                    document_kind == DocumentKind::Schema && self.next_is_schema_keyword(1)
                },
                _ => false,
            };
            if stop {
                break;
            }
            self.consume_token();
        }
    }

    fn next_is_schema_keyword(&mut self, offset: usize) -> bool {
        match self.token_stream.peek_nth(offset).map(|t| &t.kind) {
            Some(TokenKind::Name(name)) => SCHEMA_KEYWORDS.contains(&name.as_ref()),
            _ => false,
        }
    }

    /// Whether `keyword` (at lookahead position `offset - 1`) starts a
    /// definition, judged by the token after it.
    fn looks_like_definition_start(
        &mut self,
        document_kind: DocumentKind,
        keyword: &str,
        offset: usize,
    ) -> bool {
        let next = self.token_stream.peek_nth(offset).map(|t| t.kind.clone());
        match (document_kind, keyword) {
            (
                DocumentKind::Schema,
                "type" | "interface" | "union" | "enum" | "scalar" | "input",
            ) => matches!(next, Some(TokenKind::Name(_))),
            (DocumentKind::Schema, "directive") => matches!(next, Some(TokenKind::At)),
            (DocumentKind::Schema, "extend") => match next {
                Some(TokenKind::Name(n)) => SCHEMA_KEYWORDS[..6].contains(&n.as_ref()),
                _ => false,
            },
            (DocumentKind::Executable, "query" | "mutation" | "subscription") => matches!(
                next,
                Some(
                    TokenKind::Name(_)
                        | TokenKind::CurlyBraceOpen
                        | TokenKind::ParenOpen
                        | TokenKind::At
                )
            ),
            (DocumentKind::Executable, "fragment") => {
                matches!(next, Some(TokenKind::Name(n)) if n.as_ref() != "on")
            },
            _ => false,
        }
    }

    /// Skips tokens inside a braced body until the next member can start or
    /// the body closes.
    fn skip_to_member_recovery_point(&mut self, before: usize) {
        if self.consumed == before {
            self.consume_token();
        }
        while let Some(token) = self.token_stream.peek() {
            match &token.kind {
                TokenKind::CurlyBraceClose
                | TokenKind::Eof
                | TokenKind::Name(_)
                | TokenKind::StringValue(_)
                | TokenKind::Ellipsis => break,
                _ => {
                    self.consume_token();
                },
            }
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn consume_token(&mut self) -> Option<Token<'src>> {
        let token = self.token_stream.consume();
        if let Some(t) = &token {
            self.last_end_position = Some(t.span.end_exclusive.clone());
            self.last_file_path = t.span.file_path.clone();
            self.consumed += 1;
        }
        token
    }

    fn expect(&mut self, expected_kind: &TokenKind) -> Result<Token<'src>, ()> {
        if self.peek_is(expected_kind) {
            return self.consume_token().ok_or(());
        }
        let display = expected_kind.display();
        self.unexpected(&[display.as_str()]);
        Err(())
    }

    /// Expects a name. `true`, `false` and `null` are accepted as names
    /// here; callers that must reject them check separately.
    fn expect_name(&mut self) -> Result<(String, SourceSpan), ()> {
        let is_name = matches!(
            self.token_stream.peek().map(|t| &t.kind),
            Some(TokenKind::Name(_) | TokenKind::True | TokenKind::False | TokenKind::Null)
        );
        if !is_name {
            self.unexpected(&["name"]);
            return Err(());
        }
        let token = self.consume_token().ok_or(())?;
        let name = match token.kind {
            TokenKind::Name(s) => s.into_owned(),
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            _ => "null".to_string(),
        };
        Ok((name, token.span))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<SourceSpan, ()> {
        if self.peek_is_keyword(keyword) {
            return self.consume_token().map(|t| t.span).ok_or(());
        }
        self.unexpected(&[keyword]);
        Err(())
    }

    fn expect_variable(&mut self) -> Result<(String, SourceSpan), ()> {
        if !self.peek_is(&TokenKind::Variable(Default::default())) {
            self.unexpected(&["$variable"]);
            return Err(());
        }
        let token = self.consume_token().ok_or(())?;
        match token.kind {
            TokenKind::Variable(name) => Ok((name.into_owned(), token.span)),
            _ => Err(()),
        }
    }

    fn peek_is_keyword(&mut self, keyword: &str) -> bool {
        matches!(
            self.token_stream.peek().map(|t| &t.kind),
            Some(TokenKind::Name(name)) if name.as_ref() == keyword
        )
    }

    fn peek_keyword(&mut self) -> Option<String> {
        match self.token_stream.peek().map(|t| &t.kind) {
            Some(TokenKind::Name(name)) => Some(name.to_string()),
            _ => None,
        }
    }

    fn peek_is(&mut self, kind: &TokenKind) -> bool {
        match self.token_stream.peek() {
            Some(token) => Self::token_kinds_match(&token.kind, kind),
            None => false,
        }
    }

    fn peek_span(&mut self) -> SourceSpan {
        match self.token_stream.peek() {
            Some(token) => token.span.clone(),
            None => self.eof_span(),
        }
    }

    /// A zero-width span just after the last consumed token.
    fn eof_span(&self) -> SourceSpan {
        let pos = self
            .last_end_position
            .clone()
            .unwrap_or_else(|| SourcePosition::new(0, 0, 0));
        SourceSpan {
            start_inclusive: pos.clone(),
            end_exclusive: pos,
            file_path: self.last_file_path.clone(),
        }
    }

    /// A span from the start of `start` to the end of the last consumed
    /// token.
    fn make_span(&self, start: &SourceSpan) -> SourceSpan {
        let end = self
            .last_end_position
            .clone()
            .unwrap_or_else(|| start.end_exclusive.clone());
        SourceSpan {
            start_inclusive: start.start_inclusive.clone(),
            end_exclusive: end,
            file_path: start.file_path.clone(),
        }
    }

    /// Payload-carrying kinds match on variant only.
    fn token_kinds_match(actual: &TokenKind, expected: &TokenKind) -> bool {
        match (actual, expected) {
            (TokenKind::Name(_), TokenKind::Name(_))
            | (TokenKind::Variable(_), TokenKind::Variable(_))
            | (TokenKind::IntValue(_), TokenKind::IntValue(_))
            | (TokenKind::FloatValue(_), TokenKind::FloatValue(_))
            | (TokenKind::StringValue(_), TokenKind::StringValue(_))
            | (TokenKind::Error(_), TokenKind::Error(_)) => true,
            _ => actual == expected,
        }
    }

    fn enter_recursion(&mut self) -> Result<(), ()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.recursion_depth -= 1;
            let span = self.peek_span();
            self.record_error(ParseError::new(
                format!("nesting exceeds the maximum depth of {MAX_RECURSION_DEPTH}"),
                span,
                ParseErrorKind::DepthExceeded,
            ));
            return Err(());
        }
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    fn duplicate_name_error(&mut self, what: &str, name: &str, span: SourceSpan) {
        self.record_error(ParseError::new(
            format!("{what} `{name}` is declared more than once"),
            span,
            ParseErrorKind::DuplicateName(name.to_string()),
        ));
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Parses a value. Variables are only allowed when `is_const` is false.
    fn parse_value(&mut self, is_const: bool) -> Result<Value, ()> {
        self.enter_recursion()?;
        let result = self.parse_value_impl(is_const);
        self.exit_recursion();
        result
    }

    fn parse_value_impl(&mut self, is_const: bool) -> Result<Value, ()> {
        let Some(kind) = self.token_stream.peek().map(|t| t.kind.clone()) else {
            self.unexpected(&["value"]);
            return Err(());
        };

        match kind {
            TokenKind::SquareBracketOpen => self.parse_list_value(is_const),
            TokenKind::CurlyBraceOpen => self.parse_object_value(is_const),
            TokenKind::Variable(name) => {
                let token = self.consume_token().ok_or(())?;
                if is_const {
                    self.record_error(ParseError::new(
                        format!("variable `${name}` is not allowed in a constant value"),
                        token.span,
                        ParseErrorKind::InvalidSyntax,
                    ));
                    return Err(());
                }
                Ok(Value::Variable(name.into_owned()))
            },
            TokenKind::IntValue(raw) => {
                let token = self.consume_token().ok_or(())?;
                match token.kind.parse_int_value() {
                    Some(Ok(i)) => Ok(Value::Int(i)),
                    _ => {
                        self.record_error(ParseError::new(
                            format!("integer `{raw}` overflows a 64-bit integer"),
                            token.span,
                            ParseErrorKind::InvalidValue(raw.into_owned()),
                        ));
                        Err(())
                    },
                }
            },
            TokenKind::FloatValue(raw) => {
                let token = self.consume_token().ok_or(())?;
                match token.kind.parse_float_value() {
                    Some(Ok(f)) if f.is_finite() => Ok(Value::Float(f)),
                    _ => {
                        self.record_error(ParseError::new(
                            format!("float `{raw}` is not a finite number"),
                            token.span,
                            ParseErrorKind::InvalidValue(raw.into_owned()),
                        ));
                        Err(())
                    },
                }
            },
            TokenKind::StringValue(_) => {
                let token = self.consume_token().ok_or(())?;
                match token.kind.parse_string_value() {
                    Some(Ok(s)) => Ok(Value::String(s.into_owned())),
                    Some(Err(err)) => {
                        self.record_error(ParseError::new(
                            format!("invalid string: {err}"),
                            token.span,
                            ParseErrorKind::InvalidValue(token.kind.display()),
                        ));
                        Err(())
                    },
                    None => Err(()),
                }
            },
            TokenKind::True => {
                self.consume_token();
                Ok(Value::Boolean(true))
            },
            TokenKind::False => {
                self.consume_token();
                Ok(Value::Boolean(false))
            },
            TokenKind::Null => {
                self.consume_token();
                Ok(Value::Null)
            },
            TokenKind::Name(name) => {
                self.consume_token();
                Ok(Value::Enum(name.into_owned()))
            },
            _ => {
                self.unexpected(&["value"]);
                Err(())
            },
        }
    }

    fn parse_list_value(&mut self, is_const: bool) -> Result<Value, ()> {
        self.expect(&TokenKind::SquareBracketOpen)?;
        let mut values = Vec::new();
        while !self.peek_is(&TokenKind::SquareBracketClose) {
            if self.token_stream.is_at_end() {
                self.unexpected(&["]"]);
                return Err(());
            }
            values.push(self.parse_value(is_const)?);
        }
        self.expect(&TokenKind::SquareBracketClose)?;
        Ok(Value::List(values))
    }

    fn parse_object_value(&mut self, is_const: bool) -> Result<Value, ()> {
        self.expect(&TokenKind::CurlyBraceOpen)?;
        let mut fields = IndexMap::new();
        while !self.peek_is(&TokenKind::CurlyBraceClose) {
            if self.token_stream.is_at_end() {
                self.unexpected(&["}"]);
                return Err(());
            }
            let (name, span) = self.expect_name()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_value(is_const)?;
            if fields.contains_key(&name) {
                self.duplicate_name_error("object field", &name, span);
                continue;
            }
            fields.insert(name, value);
        }
        self.expect(&TokenKind::CurlyBraceClose)?;
        Ok(Value::Object(fields))
    }

    // =========================================================================
    // Type annotations
    // =========================================================================

    /// Parses `Name`, `[Type]`, and either followed by `!`.
    fn parse_type_annotation(&mut self) -> Result<ast::TypeAnnotation, ()> {
        self.enter_recursion()?;
        let result = self.parse_type_annotation_impl();
        self.exit_recursion();
        result
    }

    fn parse_type_annotation_impl(&mut self) -> Result<ast::TypeAnnotation, ()> {
        let inner = if self.peek_is(&TokenKind::SquareBracketOpen) {
            let open = self.expect(&TokenKind::SquareBracketOpen)?;
            let item = self.parse_type_annotation()?;
            self.expect(&TokenKind::SquareBracketClose)?;
            ast::TypeAnnotation::List {
                inner: Box::new(item),
                span: self.make_span(&open.span),
            }
        } else {
            let (name, span) = self.expect_name()?;
            ast::TypeAnnotation::Named { name, span }
        };

        if self.peek_is(&TokenKind::Bang) {
            self.consume_token();
            let span = self.make_span(inner.span());
            return Ok(ast::TypeAnnotation::NonNull {
                inner: Box::new(inner),
                span,
            });
        }
        Ok(inner)
    }

    // =========================================================================
    // Directive annotations and arguments
    // =========================================================================

    fn parse_directive_annotations(
        &mut self,
        is_const: bool,
    ) -> Result<Vec<ast::DirectiveAnnotation>, ()> {
        let mut directives = Vec::new();
        while self.peek_is(&TokenKind::At) {
            let at = self.expect(&TokenKind::At)?;
            let (name, _) = self.expect_name()?;
            let arguments = if self.peek_is(&TokenKind::ParenOpen) {
                self.parse_arguments(is_const)?
            } else {
                IndexMap::new()
            };
            directives.push(ast::DirectiveAnnotation {
                span: self.make_span(&at.span),
                name,
                arguments,
            });
        }
        Ok(directives)
    }

    /// Parses `(name: value, ...)`.
    fn parse_arguments(&mut self, is_const: bool) -> Result<IndexMap<String, Value>, ()> {
        self.expect(&TokenKind::ParenOpen)?;
        let mut arguments = IndexMap::new();
        while !self.peek_is(&TokenKind::ParenClose) {
            if self.token_stream.is_at_end() {
                self.unexpected(&[")"]);
                return Err(());
            }
            let (name, span) = self.expect_name()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_value(is_const)?;
            if arguments.contains_key(&name) {
                self.duplicate_name_error("argument", &name, span);
                continue;
            }
            arguments.insert(name, value);
        }
        self.expect(&TokenKind::ParenClose)?;
        Ok(arguments)
    }

    // =========================================================================
    // Schema definitions
    // =========================================================================

    /// Parses an optional description: a string literal immediately before
    /// a definition.
    fn parse_description(&mut self) -> Option<String> {
        if !self.peek_is(&TokenKind::StringValue(Default::default())) {
            return None;
        }
        let token = self.consume_token()?;
        match token.kind.parse_string_value() {
            Some(Ok(s)) => Some(s.into_owned()),
            Some(Err(err)) => {
                self.record_error(ParseError::new(
                    format!("invalid string in description: {err}"),
                    token.span,
                    ParseErrorKind::InvalidValue(token.kind.display()),
                ));
                None
            },
            None => None,
        }
    }

    fn parse_schema_definition_item(&mut self) -> Result<ast::SchemaDefinition, ()> {
        let description = self.parse_description();
        match self.peek_keyword().as_deref() {
            Some("directive") => self
                .parse_directive_definition(description)
                .map(ast::SchemaDefinition::Directive),
            Some("extend") => {
                let extend_span = self.expect_keyword("extend")?;
                let mut definition = self.parse_type_definition(None)?;
                set_definition_start(&mut definition, &extend_span);
                Ok(ast::SchemaDefinition::TypeExtension(definition))
            },
            Some("schema") => {
                let span = self.peek_span();
                self.record_error(ParseError::new(
                    "`schema` definitions are not supported; root types are the types \
                     named `Query`, `Mutation` and `Subscription`",
                    span,
                    ParseErrorKind::InvalidSyntax,
                ));
                Err(())
            },
            _ => self
                .parse_type_definition(description)
                .map(ast::SchemaDefinition::Type),
        }
    }

    fn parse_type_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::TypeDefinition, ()> {
        match self.peek_keyword().as_deref() {
            Some("type") => self
                .parse_object_type_definition(description)
                .map(ast::TypeDefinition::Object),
            Some("interface") => self
                .parse_interface_type_definition(description)
                .map(ast::TypeDefinition::Interface),
            Some("union") => self
                .parse_union_type_definition(description)
                .map(ast::TypeDefinition::Union),
            Some("enum") => self
                .parse_enum_type_definition(description)
                .map(ast::TypeDefinition::Enum),
            Some("input") => self
                .parse_input_object_type_definition(description)
                .map(ast::TypeDefinition::InputObject),
            Some("scalar") => self
                .parse_scalar_type_definition(description)
                .map(ast::TypeDefinition::Scalar),
            _ => {
                self.unexpected(&SCHEMA_KEYWORDS);
                Err(())
            },
        }
    }

    /// `type Name implements A & B @directives { fields }`
    fn parse_object_type_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::ObjectTypeDefinition, ()> {
        let start = self.expect_keyword("type")?;
        let (name, _) = self.expect_name()?;
        let interfaces = self.parse_implements_interfaces()?;
        let directives = self.parse_directive_annotations(true)?;
        let fields = self.parse_fields_definition()?;
        Ok(ast::ObjectTypeDefinition {
            span: self.make_span(&start),
            description,
            name,
            interfaces,
            directives,
            fields,
        })
    }

    /// `interface Name implements A & B @directives { fields }`
    fn parse_interface_type_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::InterfaceTypeDefinition, ()> {
        let start = self.expect_keyword("interface")?;
        let (name, _) = self.expect_name()?;
        let interfaces = self.parse_implements_interfaces()?;
        let directives = self.parse_directive_annotations(true)?;
        let fields = self.parse_fields_definition()?;
        Ok(ast::InterfaceTypeDefinition {
            span: self.make_span(&start),
            description,
            name,
            interfaces,
            directives,
            fields,
        })
    }

    /// `union Name @directives = A | B`
    fn parse_union_type_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::UnionTypeDefinition, ()> {
        let start = self.expect_keyword("union")?;
        let (name, _) = self.expect_name()?;
        let directives = self.parse_directive_annotations(true)?;
        let mut members = Vec::new();
        if self.peek_is(&TokenKind::Equals) {
            self.consume_token();
            if self.peek_is(&TokenKind::Pipe) {
                self.consume_token();
            }
            loop {
                let (member, span) = self.expect_name()?;
                if members.contains(&member) {
                    self.duplicate_name_error("union member", &member, span);
                } else {
                    members.push(member);
                }
                if !self.peek_is(&TokenKind::Pipe) {
                    break;
                }
                self.consume_token();
            }
        }
        Ok(ast::UnionTypeDefinition {
            span: self.make_span(&start),
            description,
            name,
            directives,
            members,
        })
    }

    /// `enum Name @directives { A B @deprecated }`
    fn parse_enum_type_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::EnumTypeDefinition, ()> {
        let start = self.expect_keyword("enum")?;
        let (name, _) = self.expect_name()?;
        let directives = self.parse_directive_annotations(true)?;
        let mut values = Vec::new();

        if self.peek_is(&TokenKind::CurlyBraceOpen) {
            self.expect(&TokenKind::CurlyBraceOpen)?;
            let mut seen = HashSet::new();
            while !self.peek_is(&TokenKind::CurlyBraceClose) {
                if self.token_stream.is_at_end() {
                    self.unexpected(&["}"]);
                    return Err(());
                }
                let before = self.consumed;
                match self.parse_enum_value_definition() {
                    Ok(value) => {
                        if seen.insert(value.name.clone()) {
                            values.push(value);
                        } else {
                            self.duplicate_name_error("enum value", &value.name, value.span);
                        }
                    },
                    Err(()) => self.skip_to_member_recovery_point(before),
                }
            }
            self.expect(&TokenKind::CurlyBraceClose)?;
        }

        Ok(ast::EnumTypeDefinition {
            span: self.make_span(&start),
            description,
            name,
            directives,
            values,
        })
    }

    fn parse_enum_value_definition(&mut self) -> Result<ast::EnumValueDefinition, ()> {
        let description = self.parse_description();
        let (name, span) = self.expect_name()?;
        if matches!(name.as_str(), "true" | "false" | "null") {
            self.record_error(ParseError::new(
                format!("`{name}` cannot be used as an enum value"),
                span.clone(),
                ParseErrorKind::InvalidSyntax,
            ));
            return Err(());
        }
        let directives = self.parse_directive_annotations(true)?;
        Ok(ast::EnumValueDefinition {
            span: self.make_span(&span),
            description,
            name,
            directives,
        })
    }

    /// `input Name @directives { fields }`
    fn parse_input_object_type_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::InputObjectTypeDefinition, ()> {
        let start = self.expect_keyword("input")?;
        let (name, _) = self.expect_name()?;
        let directives = self.parse_directive_annotations(true)?;
        let fields = if self.peek_is(&TokenKind::CurlyBraceOpen) {
            self.parse_input_values(TokenKind::CurlyBraceOpen, TokenKind::CurlyBraceClose, "input field")?
        } else {
            Vec::new()
        };
        Ok(ast::InputObjectTypeDefinition {
            span: self.make_span(&start),
            description,
            name,
            directives,
            fields,
        })
    }

    /// `scalar Name @directives`
    fn parse_scalar_type_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::ScalarTypeDefinition, ()> {
        let start = self.expect_keyword("scalar")?;
        let (name, _) = self.expect_name()?;
        let directives = self.parse_directive_annotations(true)?;
        Ok(ast::ScalarTypeDefinition {
            span: self.make_span(&start),
            description,
            name,
            directives,
        })
    }

    /// `directive @name(args) repeatable on LOCATION | LOCATION`
    fn parse_directive_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::DirectiveDefinition, ()> {
        let start = self.expect_keyword("directive")?;
        self.expect(&TokenKind::At)?;
        let (name, _) = self.expect_name()?;
        let arguments = if self.peek_is(&TokenKind::ParenOpen) {
            self.parse_input_values(TokenKind::ParenOpen, TokenKind::ParenClose, "argument")?
        } else {
            Vec::new()
        };
        let repeatable = if self.peek_is_keyword("repeatable") {
            self.consume_token();
            true
        } else {
            false
        };
        self.expect_keyword("on")?;
        if self.peek_is(&TokenKind::Pipe) {
            self.consume_token();
        }

        let mut locations = Vec::new();
        loop {
            let (location_name, span) = self.expect_name()?;
            match DirectiveLocation::parse(&location_name) {
                Some(location) => locations.push(location),
                None => self.record_error(ParseError::new(
                    format!("unknown directive location `{location_name}`"),
                    span,
                    ParseErrorKind::InvalidSyntax,
                )),
            }
            if !self.peek_is(&TokenKind::Pipe) {
                break;
            }
            self.consume_token();
        }

        Ok(ast::DirectiveDefinition {
            span: self.make_span(&start),
            description,
            name,
            arguments,
            repeatable,
            locations,
        })
    }

    /// `implements A & B`, with an optional leading `&`.
    fn parse_implements_interfaces(&mut self) -> Result<Vec<String>, ()> {
        let mut interfaces = Vec::new();
        if !self.peek_is_keyword("implements") {
            return Ok(interfaces);
        }
        self.consume_token();
        if self.peek_is(&TokenKind::Ampersand) {
            self.consume_token();
        }
        loop {
            let (name, span) = self.expect_name()?;
            if interfaces.contains(&name) {
                self.duplicate_name_error("interface", &name, span);
            } else {
                interfaces.push(name);
            }
            if !self.peek_is(&TokenKind::Ampersand) {
                break;
            }
            self.consume_token();
        }
        Ok(interfaces)
    }

    /// `{ field... }`. The body is optional, e.g. for `extend type Foo
    /// @directive`.
    fn parse_fields_definition(&mut self) -> Result<Vec<ast::FieldDefinition>, ()> {
        let mut fields: Vec<ast::FieldDefinition> = Vec::new();
        if !self.peek_is(&TokenKind::CurlyBraceOpen) {
            return Ok(fields);
        }
        self.expect(&TokenKind::CurlyBraceOpen)?;
        while !self.peek_is(&TokenKind::CurlyBraceClose) {
            if self.token_stream.is_at_end() {
                self.unexpected(&["}"]);
                return Err(());
            }
            let before = self.consumed;
            match self.parse_field_definition() {
                Ok(field) => {
                    if fields.iter().any(|f| f.name == field.name) {
                        self.duplicate_name_error("field", &field.name, field.span);
                    } else {
                        fields.push(field);
                    }
                },
                Err(()) => self.skip_to_member_recovery_point(before),
            }
        }
        self.expect(&TokenKind::CurlyBraceClose)?;
        Ok(fields)
    }

    /// `"description" name(args): Type @directives`
    fn parse_field_definition(&mut self) -> Result<ast::FieldDefinition, ()> {
        let description = self.parse_description();
        let (name, start) = self.expect_name()?;
        let arguments = if self.peek_is(&TokenKind::ParenOpen) {
            self.parse_input_values(TokenKind::ParenOpen, TokenKind::ParenClose, "argument")?
        } else {
            Vec::new()
        };
        self.expect(&TokenKind::Colon)?;
        let type_annotation = self.parse_type_annotation()?;
        let directives = self.parse_directive_annotations(true)?;
        Ok(ast::FieldDefinition {
            span: self.make_span(&start),
            description,
            name,
            arguments,
            type_annotation,
            directives,
        })
    }

    /// A delimited list of input value definitions, used for argument lists
    /// and input object bodies.
    fn parse_input_values(
        &mut self,
        open: TokenKind<'static>,
        close: TokenKind<'static>,
        what: &str,
    ) -> Result<Vec<ast::InputValueDefinition>, ()> {
        self.expect(&open)?;
        let mut values: Vec<ast::InputValueDefinition> = Vec::new();
        while !self.peek_is(&close) {
            if self.token_stream.is_at_end() {
                let display = close.display();
                self.unexpected(&[display.as_str()]);
                return Err(());
            }
            let value = self.parse_input_value_definition()?;
            if values.iter().any(|v| v.name == value.name) {
                self.duplicate_name_error(what, &value.name, value.span);
            } else {
                values.push(value);
            }
        }
        self.expect(&close)?;
        Ok(values)
    }

    /// `"description" name: Type = default @directives`
    fn parse_input_value_definition(&mut self) -> Result<ast::InputValueDefinition, ()> {
        let description = self.parse_description();
        let (name, start) = self.expect_name()?;
        self.expect(&TokenKind::Colon)?;
        let type_annotation = self.parse_type_annotation()?;
        let default_value = if self.peek_is(&TokenKind::Equals) {
            self.consume_token();
            Some(self.parse_value(true)?)
        } else {
            None
        };
        let directives = self.parse_directive_annotations(true)?;
        Ok(ast::InputValueDefinition {
            span: self.make_span(&start),
            description,
            name,
            type_annotation,
            default_value,
            directives,
        })
    }

    // =========================================================================
    // Executable definitions
    // =========================================================================

    fn parse_executable_definition_item(&mut self) -> Result<ExecutableItem, ()> {
        if self.peek_is(&TokenKind::CurlyBraceOpen) {
            let start = self.peek_span();
            let selection_set = self.parse_selection_set()?;
            return Ok(ExecutableItem::Operation(ast::OperationDefinition {
                span: self.make_span(&start),
                kind: OperationKind::Query,
                name: None,
                variable_definitions: Vec::new(),
                directives: Vec::new(),
                selection_set,
            }));
        }
        match self.peek_keyword().as_deref() {
            Some("query") => self
                .parse_operation_definition(OperationKind::Query)
                .map(ExecutableItem::Operation),
            Some("mutation") => self
                .parse_operation_definition(OperationKind::Mutation)
                .map(ExecutableItem::Operation),
            Some("subscription") => self
                .parse_operation_definition(OperationKind::Subscription)
                .map(ExecutableItem::Operation),
            Some("fragment") => self
                .parse_fragment_definition()
                .map(ExecutableItem::Fragment),
            _ => {
                self.unexpected(&["query", "mutation", "subscription", "fragment", "{"]);
                Err(())
            },
        }
    }

    /// `query Name($var: Type = default) @directives { selections }`
    fn parse_operation_definition(
        &mut self,
        kind: OperationKind,
    ) -> Result<ast::OperationDefinition, ()> {
        let start = self.expect_keyword(kind.as_str())?;
        let name = if matches!(
            self.token_stream.peek().map(|t| &t.kind),
            Some(TokenKind::Name(_))
        ) {
            Some(self.expect_name()?.0)
        } else {
            None
        };
        let variable_definitions = if self.peek_is(&TokenKind::ParenOpen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };
        let directives = self.parse_directive_annotations(false)?;
        let selection_set = self.parse_selection_set()?;
        Ok(ast::OperationDefinition {
            span: self.make_span(&start),
            kind,
            name,
            variable_definitions,
            directives,
            selection_set,
        })
    }

    fn parse_variable_definitions(&mut self) -> Result<Vec<ast::VariableDefinition>, ()> {
        self.expect(&TokenKind::ParenOpen)?;
        let mut definitions: Vec<ast::VariableDefinition> = Vec::new();
        while !self.peek_is(&TokenKind::ParenClose) {
            if self.token_stream.is_at_end() {
                self.unexpected(&[")"]);
                return Err(());
            }
            let (name, start) = self.expect_variable()?;
            self.expect(&TokenKind::Colon)?;
            let type_annotation = self.parse_type_annotation()?;
            let default_value = if self.peek_is(&TokenKind::Equals) {
                self.consume_token();
                Some(self.parse_value(true)?)
            } else {
                None
            };
            let directives = self.parse_directive_annotations(true)?;
            let definition = ast::VariableDefinition {
                span: self.make_span(&start),
                name,
                type_annotation,
                default_value,
                directives,
            };
            if definitions.iter().any(|d| d.name == definition.name) {
                let label = format!("${}", definition.name);
                self.duplicate_name_error("variable", &label, definition.span);
            } else {
                definitions.push(definition);
            }
        }
        self.expect(&TokenKind::ParenClose)?;
        Ok(definitions)
    }

    /// `fragment Name on Type @directives { selections }`
    fn parse_fragment_definition(&mut self) -> Result<ast::FragmentDefinition, ()> {
        let start = self.expect_keyword("fragment")?;
        let (name, name_span) = self.expect_name()?;
        if name == "on" {
            self.record_error(ParseError::new(
                "a fragment cannot be named `on`",
                name_span,
                ParseErrorKind::InvalidSyntax,
            ));
            return Err(());
        }
        self.expect_keyword("on")?;
        let (type_condition, _) = self.expect_name()?;
        let directives = self.parse_directive_annotations(false)?;
        let selection_set = self.parse_selection_set()?;
        Ok(ast::FragmentDefinition {
            span: self.make_span(&start),
            name,
            type_condition,
            directives,
            selection_set,
        })
    }

    fn parse_selection_set(&mut self) -> Result<ast::SelectionSet, ()> {
        self.enter_recursion()?;
        let result = self.parse_selection_set_impl();
        self.exit_recursion();
        result
    }

    fn parse_selection_set_impl(&mut self) -> Result<ast::SelectionSet, ()> {
        let open = self.expect(&TokenKind::CurlyBraceOpen)?;
        if self.peek_is(&TokenKind::CurlyBraceClose) {
            self.record_error(ParseError::new(
                "selection set cannot be empty",
                open.span.clone(),
                ParseErrorKind::InvalidSyntax,
            ));
        }

        let mut selections: Vec<ast::Selection> = Vec::new();
        let mut response_keys = HashSet::new();
        while !self.peek_is(&TokenKind::CurlyBraceClose) {
            if self.token_stream.is_at_end() {
                self.unexpected(&["}"]);
                return Err(());
            }
            let before = self.consumed;
            match self.parse_selection() {
                Ok(ast::Selection::Field(field)) => {
                    if response_keys.insert(field.response_key().to_string()) {
                        selections.push(ast::Selection::Field(field));
                    } else {
                        let key = field.response_key().to_string();
                        self.duplicate_name_error("field", &key, field.span);
                    }
                },
                Ok(selection) => selections.push(selection),
                Err(()) => self.skip_to_member_recovery_point(before),
            }
        }
        self.expect(&TokenKind::CurlyBraceClose)?;

        Ok(ast::SelectionSet {
            span: self.make_span(&open.span),
            selections,
        })
    }

    fn parse_selection(&mut self) -> Result<ast::Selection, ()> {
        if !self.peek_is(&TokenKind::Ellipsis) {
            return self.parse_field().map(ast::Selection::Field);
        }

        let ellipsis = self.expect(&TokenKind::Ellipsis)?;
        let is_inline = self.peek_is_keyword("on")
            || self.peek_is(&TokenKind::At)
            || self.peek_is(&TokenKind::CurlyBraceOpen);

        if is_inline {
            let type_condition = if self.peek_is_keyword("on") {
                self.consume_token();
                Some(self.expect_name()?.0)
            } else {
                None
            };
            let directives = self.parse_directive_annotations(false)?;
            let selection_set = self.parse_selection_set()?;
            Ok(ast::Selection::InlineFragment(ast::InlineFragment {
                span: self.make_span(&ellipsis.span),
                type_condition,
                directives,
                selection_set,
            }))
        } else {
            let (name, _) = self.expect_name()?;
            let directives = self.parse_directive_annotations(false)?;
            Ok(ast::Selection::FragmentSpread(ast::FragmentSpread {
                span: self.make_span(&ellipsis.span),
                name,
                directives,
            }))
        }
    }

    /// `alias: name(args) @directives { selections }`
    fn parse_field(&mut self) -> Result<ast::Field, ()> {
        let (first_name, start) = self.expect_name()?;
        let (alias, name) = if self.peek_is(&TokenKind::Colon) {
            self.consume_token();
            let (field_name, _) = self.expect_name()?;
            (Some(first_name), field_name)
        } else {
            (None, first_name)
        };

        let arguments = if self.peek_is(&TokenKind::ParenOpen) {
            self.parse_arguments(false)?
        } else {
            IndexMap::new()
        };
        let directives = self.parse_directive_annotations(false)?;
        let selection_set = if self.peek_is(&TokenKind::CurlyBraceOpen) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Ok(ast::Field {
            span: self.make_span(&start),
            alias,
            name,
            arguments,
            directives,
            selection_set,
        })
    }
}

enum ExecutableItem {
    Operation(ast::OperationDefinition),
    Fragment(ast::FragmentDefinition),
}

/// Moves the start of an extension's span back to its `extend` keyword.
fn set_definition_start(definition: &mut ast::TypeDefinition, extend_span: &SourceSpan) {
    let span = match definition {
        ast::TypeDefinition::Enum(d) => &mut d.span,
        ast::TypeDefinition::InputObject(d) => &mut d.span,
        ast::TypeDefinition::Interface(d) => &mut d.span,
        ast::TypeDefinition::Object(d) => &mut d.span,
        ast::TypeDefinition::Scalar(d) => &mut d.span,
        ast::TypeDefinition::Union(d) => &mut d.span,
    };
    span.start_inclusive = extend_span.start_inclusive.clone();
}
