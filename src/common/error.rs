use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::db::database::Outcome;

/// Errors raised while executing a single command.
///
/// Every error is local to the command that produced it. Apart from LOAD,
/// which keeps the lines it replayed before failing, the database is left as
/// it was before that command started.
#[derive(Debug, Error, Diagnostic)]
pub enum DatabaseError {
    #[error("Unknown type: {0}")]
    #[diagnostic(code(rowboat::unknown_type), help("column types are INT or STRING"))]
    UnknownType(String),

    #[error("Table not found: {0}")]
    #[diagnostic(code(rowboat::table_not_found))]
    TableNotFound(String),

    #[error("Column not found: {0}")]
    #[diagnostic(code(rowboat::column_not_found))]
    ColumnNotFound(String),

    #[error("Column count mismatch: table {table} has {expected} columns, got {actual} values")]
    #[diagnostic(code(rowboat::column_count_mismatch))]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid literal {literal} for {data_type} column {column}")]
    #[diagnostic(code(rowboat::invalid_literal))]
    InvalidLiteral {
        column: String,
        data_type: String,
        literal: String,
    },

    #[error("Type mismatch in column {column}: stored {found} value where {expected} was declared")]
    #[diagnostic(
        code(rowboat::type_mismatch),
        help("INSERT stores literals by their lexical form, not the declared column type")
    )]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    #[error("Cannot open file {} for {operation}", .path.display())]
    #[diagnostic(code(rowboat::io))]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("LOAD nested deeper than {0} levels")]
    #[diagnostic(
        code(rowboat::load_depth_exceeded),
        help("a script probably loads itself, directly or through another file")
    )]
    LoadDepthExceeded(usize),

    /// A line of a LOADed script failed. `replayed` holds the outcomes of the
    /// lines before it, which stay applied.
    #[error("LOAD from {path} stopped after {} line(s)", .replayed.len())]
    #[diagnostic(code(rowboat::load_failed))]
    LoadFailed {
        path: String,
        replayed: Vec<Outcome>,
        #[source]
        source: Box<DatabaseError>,
    },
}

impl DatabaseError {
    /// Builds a `map_err` adapter tagging an I/O failure with its path.
    pub(crate) fn io(
        path: impl Into<PathBuf>,
        operation: &'static str,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            path,
            operation,
            source,
        }
    }

    /// Splits a failed LOAD into the outcomes of every line replayed before
    /// the failure, nested LOADs included, and the error that stopped it.
    ///
    /// Any other error comes back unchanged with no outcomes.
    pub fn into_load_parts(self) -> (Vec<Outcome>, DatabaseError) {
        match self {
            DatabaseError::LoadFailed {
                mut replayed,
                source,
                ..
            } => {
                let (nested, cause) = (*source).into_load_parts();
                replayed.extend(nested);
                (replayed, cause)
            }
            other => (Vec::new(), other),
        }
    }
}
