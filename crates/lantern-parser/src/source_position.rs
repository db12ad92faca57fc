/// Source position information for lexing and parsing.
///
/// This is a pure data struct with no mutation methods. Token sources are
/// responsible for computing position values as they scan input.
///
/// # Indexing Convention
///
/// **All position values are 0-based:**
/// - `line`: 0 = first line of the source
/// - `col`: character count within the current line
/// - `byte_offset`: byte offset within the current source
///
/// When several sources are lexed as one stream, positions restart at zero
/// for each source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourcePosition {
    line: usize,
    col: usize,
    byte_offset: usize,
}

impl SourcePosition {
    /// Create a new SourcePosition from 0-based values.
    pub fn new(line: usize, col: usize, byte_offset: usize) -> Self {
        Self {
            line,
            col,
            byte_offset,
        }
    }

    /// Returns the 0-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 0-based character count within the current line.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the 0-based byte offset from the start of the source.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Returns the 1-based `(line, column)` pair used in diagnostics and in
    /// wire error locations.
    pub fn to_line_col(&self) -> (usize, usize) {
        (self.line + 1, self.col + 1)
    }
}
