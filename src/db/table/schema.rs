use super::column_def::ColumnDef;
use crate::DatabaseError;

/// A table schema defining the structure of rows.
///
/// A schema is an ordered list of column definitions. Column order is the
/// positional layout of every row in the table. Duplicate names are allowed;
/// lookups resolve to the first match.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// The ordered list of column definitions.
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Creates a new schema from a vector of column definitions.
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Finds the index of a column by name.
    pub fn get_column_index(&self, name: &str) -> Result<usize, DatabaseError> {
        self.columns
            .iter()
            .position(|col| col.name == name)
            .ok_or_else(|| DatabaseError::ColumnNotFound(name.to_string()))
    }

    pub(crate) fn len(&self) -> usize {
        self.columns.len()
    }
}
