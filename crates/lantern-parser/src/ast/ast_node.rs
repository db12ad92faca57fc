use crate::SourceSpan;

/// Behavior shared by every syntax tree node.
pub trait AstNode {
    /// The source span this node was parsed from.
    fn span(&self) -> &SourceSpan;

    /// 1-based `(line, column)` of the node's first character.
    fn line_col(&self) -> (usize, usize) {
        self.span().start_line_col()
    }
}
