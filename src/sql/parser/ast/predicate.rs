use crate::sql::parser::Literal;

/// Comparison operator of a WHERE condition.
///
/// Any run of `=`, `!`, `<` and `>` parses; the ones without a meaning are
/// kept as [`Comparator::Other`] and never match a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparator {
    /// Equality (=)
    Equal,
    /// Inequality (!=)
    NotEqual,
    /// Less than (<)
    LessThan,
    /// Greater than (>)
    GreaterThan,
    Other(String),
}

impl Comparator {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "=" => Comparator::Equal,
            "!=" => Comparator::NotEqual,
            "<" => Comparator::LessThan,
            ">" => Comparator::GreaterThan,
            other => Comparator::Other(other.to_string()),
        }
    }
}

/// A single `column <op> literal` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<'src> {
    pub column: &'src str,
    pub comparator: Comparator,
    pub value: Literal<'src>,
}

/// A `column=literal` pair from an UPDATE's SET list.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'src> {
    pub column: &'src str,
    pub value: Literal<'src>,
}
