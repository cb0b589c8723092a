use super::{Assignment, Condition, SelectList};
use crate::sql::parser::Literal;

/// A parsed command (top-level AST node).
///
/// Operands borrow from the command line they were parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'src> {
    Create(CreateStatement<'src>),
    Insert(InsertStatement<'src>),
    Select(SelectStatement<'src>),
    Delete(DeleteStatement<'src>),
    AddColumn(AddColumnStatement<'src>),
    Save(SaveStatement<'src>),
    Load(LoadStatement<'src>),
    Update(UpdateStatement<'src>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateStatement<'src> {
    pub table_name: &'src str,
    pub columns: Vec<ColumnDefinition<'src>>,
}

/// A column as declared in CREATE TABLE or ADD COLUMN.
///
/// The type token is kept as written and resolved by the engine, so an
/// unknown type is reported as an error rather than an unrecognized command.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition<'src> {
    pub name: &'src str,
    pub type_name: &'src str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement<'src> {
    pub table_name: &'src str,
    pub values: Vec<Literal<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement<'src> {
    pub select_list: SelectList<'src>,
    pub table_name: &'src str,
    pub where_clause: Option<Condition<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement<'src> {
    pub table_name: &'src str,
    pub where_clause: Condition<'src>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddColumnStatement<'src> {
    pub table_name: &'src str,
    pub column: ColumnDefinition<'src>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveStatement<'src> {
    pub path: &'src str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadStatement<'src> {
    pub path: &'src str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement<'src> {
    pub table_name: &'src str,
    pub assignments: Vec<Assignment<'src>>,
    /// Conditions joined by AND; all must hold.
    pub conditions: Vec<Condition<'src>>,
}
