use crate::directives::runtime::FieldContext;
use crate::directives::runtime::FieldDirective;
use crate::error::ExecutionError;
use async_trait::async_trait;
use lantern_parser::Value;
use lantern_parser::ast::DirectiveAnnotation;

/// `@auth(msg:)`: rejects requests that carry no user identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthDirective;

#[async_trait]
impl FieldDirective for AuthDirective {
    async fn before(
        &self,
        ctx: &FieldContext<'_>,
        invocation: &DirectiveAnnotation,
    ) -> Result<Option<Value>, ExecutionError> {
        if ctx.request.user_id().is_some() {
            return Ok(None);
        }
        let message = invocation
            .string_argument("msg")
            .unwrap_or(ctx.config.unauthorized_message.as_str());
        tracing::debug!(field = %ctx.field.name, "rejecting unauthenticated request");
        Err(ExecutionError::rejected(message))
    }
}
