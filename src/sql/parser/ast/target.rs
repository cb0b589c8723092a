/// Column list of a SELECT.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectList<'src> {
    /// SELECT * (all columns, in declared order)
    Star,

    /// SELECT col1, col2, ...
    Columns(Vec<&'src str>),
}
