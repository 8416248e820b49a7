use std::fmt;

/// Source range of a debug sequence point.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub document: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceLocation {
    /// A location covering a single point.
    pub fn at(document: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            document: document.into(),
            start_line: line,
            start_column: column,
            end_line: line,
            end_column: column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{})",
            self.document, self.start_line, self.start_column
        )
    }
}
