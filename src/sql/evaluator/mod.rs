use crate::{
    DatabaseError, Row, Value,
    core::types::DataType,
    db::table::ColumnDef,
    sql::parser::Literal,
};

pub mod predicate;

pub use predicate::PredicateEvaluator;

/// Evaluates something against a single stored row.
pub trait Evaluator<T> {
    fn evaluate(&self, row: &Row) -> Result<T, DatabaseError>;
}

/// Converts a literal to a value of the column's declared type.
///
/// Integer columns accept digits (or a bare word holding digits); a quoted
/// literal is rejected. Text columns take the literal's text whatever its
/// form, with the quotes stripped.
pub fn coerce_literal(literal: &Literal, column: &ColumnDef) -> Result<Value, DatabaseError> {
    match column.data_type {
        DataType::Integer => match literal {
            Literal::Integer(s) | Literal::Word(s) => {
                s.parse::<i64>().map(Value::Integer).map_err(|_| invalid(literal, column))
            }
            Literal::Text(_) => Err(invalid(literal, column)),
        },
        DataType::Text => Ok(Value::Text(literal.text().to_string())),
    }
}

fn invalid(literal: &Literal, column: &ColumnDef) -> DatabaseError {
    DatabaseError::InvalidLiteral {
        column: column.name.clone(),
        data_type: column.data_type.to_string(),
        literal: literal.to_string(),
    }
}
