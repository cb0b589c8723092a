use crate::DatabaseError;

pub mod column_def;
pub mod row;
pub mod schema;

pub use column_def::ColumnDef;
pub use row::Row;
pub use schema::Schema;

/// A named table holding its schema and rows in insertion order.
///
/// Every row has exactly one value per column. [`Table::add_column`] keeps
/// that true by back-filling existing rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// The table name.
    pub(crate) name: String,

    /// The table's schema defining its columns.
    pub(crate) schema: Schema,

    /// Stored rows, oldest first.
    pub(crate) rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given name and schema.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Appends a row.
    ///
    /// Only the value count is checked. Value kinds are taken as given, so a
    /// text value can end up in an integer column.
    pub fn insert_row(&mut self, row: Row) -> Result<(), DatabaseError> {
        if row.values.len() != self.schema.len() {
            return Err(DatabaseError::ColumnCountMismatch {
                table: self.name.clone(),
                expected: self.schema.len(),
                actual: row.values.len(),
            });
        }

        self.rows.push(row);
        Ok(())
    }

    /// Appends a column and gives every existing row the type's zero value.
    pub fn add_column(&mut self, column: ColumnDef) {
        let fill = column.data_type.zero_value();
        for row in &mut self.rows {
            row.values.push(fill.clone());
        }
        self.schema.columns.push(column);
    }

    /// Removes the rows whose entry in `mask` is `true`, keeping the order of
    /// the rest. Returns how many were removed.
    pub(crate) fn remove_rows(&mut self, mask: &[bool]) -> usize {
        let before = self.rows.len();
        let mut flags = mask.iter();
        self.rows.retain(|_| !flags.next().copied().unwrap_or(false));
        before - self.rows.len()
    }
}
