use std::fmt;

/// A literal operand as it appeared in the command.
///
/// Literals keep their source text; conversion to a [`Value`](crate::Value)
/// happens against a column's declared type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'src> {
    /// Decimal digits with an optional leading `-`.
    Integer(&'src str),

    /// Contents of a double-quoted string.
    Text(&'src str),

    /// A bare word, only accepted as a WHERE operand.
    Word(&'src str),
}

impl<'src> Literal<'src> {
    /// The literal's text with any quotes removed.
    pub fn text(&self) -> &'src str {
        match self {
            Literal::Integer(s) | Literal::Text(s) | Literal::Word(s) => s,
        }
    }
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => write!(f, "\"{s}\""),
            Literal::Integer(s) | Literal::Word(s) => write!(f, "{s}"),
        }
    }
}
