use crate::{
    DatabaseError, Row, Value,
    db::table::Schema,
    sql::{
        evaluator::{Evaluator, coerce_literal},
        parser::{Comparator, Condition},
    },
};

/// A condition resolved against a schema: column position and typed operand.
#[derive(Debug, Clone)]
struct BoundCondition {
    column_index: usize,
    column_name: String,
    comparator: Comparator,
    operand: Value,
}

/// Evaluates a conjunction of WHERE conditions against rows of one table.
///
/// Columns and operands are resolved once, when the evaluator is built, so a
/// missing column or a bad literal fails the command before any row is read.
/// With no conditions every row matches.
#[derive(Debug, Clone, Default)]
pub struct PredicateEvaluator {
    conditions: Vec<BoundCondition>,
}

impl PredicateEvaluator {
    pub fn new(schema: &Schema, conditions: &[Condition]) -> Result<Self, DatabaseError> {
        let conditions = conditions
            .iter()
            .map(|condition| {
                let column_index = schema.get_column_index(condition.column)?;
                let column = &schema.columns[column_index];

                Ok(BoundCondition {
                    column_index,
                    column_name: column.name.clone(),
                    comparator: condition.comparator.clone(),
                    operand: coerce_literal(&condition.value, column)?,
                })
            })
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        Ok(Self { conditions })
    }

    /// Builds an evaluator for an optional single condition.
    pub fn from_optional(
        schema: &Schema,
        condition: Option<&Condition>,
    ) -> Result<Self, DatabaseError> {
        match condition {
            Some(condition) => Self::new(schema, std::slice::from_ref(condition)),
            None => Ok(Self::default()),
        }
    }
}

impl Evaluator<bool> for PredicateEvaluator {
    fn evaluate(&self, row: &Row) -> Result<bool, DatabaseError> {
        for condition in &self.conditions {
            if !condition.matches(row)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl BoundCondition {
    /// Integers support `=`, `!=`, `<` and `>`; text only `=` and `!=`.
    /// Any other pairing is simply false.
    fn matches(&self, row: &Row) -> Result<bool, DatabaseError> {
        let stored = row
            .get_value(self.column_index)
            .ok_or_else(|| DatabaseError::ColumnNotFound(self.column_name.clone()))?;

        let result = match (stored, &self.operand) {
            (Value::Integer(a), Value::Integer(b)) => match self.comparator {
                Comparator::Equal => a == b,
                Comparator::NotEqual => a != b,
                Comparator::LessThan => a < b,
                Comparator::GreaterThan => a > b,
                Comparator::Other(_) => false,
            },
            (Value::Text(a), Value::Text(b)) => match self.comparator {
                Comparator::Equal => a == b,
                Comparator::NotEqual => a != b,
                Comparator::LessThan | Comparator::GreaterThan | Comparator::Other(_) => false,
            },
            (Value::Integer(_), Value::Text(_)) | (Value::Text(_), Value::Integer(_)) => {
                return Err(DatabaseError::TypeMismatch {
                    column: self.column_name.clone(),
                    expected: self.operand.data_type().to_string(),
                    found: stored.data_type().to_string(),
                });
            }
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DataType,
        db::table::ColumnDef,
        sql::parser::{Literal, SqlParser, Statement},
    };

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDef::new("a", DataType::Integer),
            ColumnDef::new("b", DataType::Text),
        ])
    }

    fn row(a: i64, b: &str) -> Row {
        Row::new(vec![Value::Integer(a), Value::Text(b.to_string())])
    }

    fn condition<'a>(column: &'a str, op: &str, value: Literal<'a>) -> Condition<'a> {
        Condition {
            column,
            comparator: Comparator::from_symbol(op),
            value,
        }
    }

    fn check(cond: Condition, row: &Row) -> bool {
        PredicateEvaluator::new(&schema(), &[cond])
            .unwrap()
            .evaluate(row)
            .unwrap()
    }

    #[test]
    fn test_integer_comparisons() {
        let r = row(5, "x");

        assert!(check(condition("a", "=", Literal::Integer("5")), &r));
        assert!(!check(condition("a", "!=", Literal::Integer("5")), &r));
        assert!(check(condition("a", "<", Literal::Integer("6")), &r));
        assert!(!check(condition("a", "<", Literal::Integer("5")), &r));
        assert!(check(condition("a", ">", Literal::Integer("-1")), &r));
        assert!(check(condition("a", "=", Literal::Word("5")), &r));
    }

    #[test]
    fn test_text_comparisons() {
        let r = row(5, "x");

        assert!(check(condition("b", "=", Literal::Text("x")), &r));
        assert!(check(condition("b", "!=", Literal::Text("y")), &r));
        assert!(check(condition("b", "=", Literal::Word("x")), &r));
    }

    #[test]
    fn test_unsupported_operators_are_false() {
        let r = row(5, "x");

        // ordering is not defined on text
        assert!(!check(condition("b", "<", Literal::Text("z")), &r));
        assert!(!check(condition("b", ">", Literal::Text("a")), &r));
        // unknown comparator runs never match
        assert!(!check(condition("a", ">=", Literal::Integer("5")), &r));
        assert!(!check(condition("b", "==", Literal::Text("x")), &r));
    }

    #[test]
    fn test_missing_column() {
        let err = PredicateEvaluator::new(&schema(), &[condition("c", "=", Literal::Integer("1"))])
            .unwrap_err();
        assert!(matches!(err, DatabaseError::ColumnNotFound(name) if name == "c"));
    }

    #[test]
    fn test_invalid_integer_operand() {
        let err = PredicateEvaluator::new(&schema(), &[condition("a", "=", Literal::Word("x"))])
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidLiteral { .. }));
    }

    #[test]
    fn test_conjunction() {
        let evaluator = PredicateEvaluator::new(
            &schema(),
            &[
                condition("a", "=", Literal::Integer("1")),
                condition("b", "=", Literal::Text("x")),
            ],
        )
        .unwrap();

        assert!(evaluator.evaluate(&row(1, "x")).unwrap());
        assert!(!evaluator.evaluate(&row(1, "y")).unwrap());
        assert!(!evaluator.evaluate(&row(2, "x")).unwrap());
    }

    #[test]
    fn test_no_conditions_match_everything() {
        let evaluator = PredicateEvaluator::from_optional(&schema(), None).unwrap();
        assert!(evaluator.evaluate(&row(1, "x")).unwrap());
    }

    #[test]
    fn test_stored_kind_mismatch_is_an_error() {
        // INSERT may store text in an integer column
        let r = Row::new(vec![Value::Text("oops".to_string()), Value::Text("x".to_string())]);
        let evaluator =
            PredicateEvaluator::new(&schema(), &[condition("a", "=", Literal::Integer("1"))])
                .unwrap();

        assert!(matches!(
            evaluator.evaluate(&r),
            Err(DatabaseError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_parsed_where_clause() {
        let Statement::Select(select) = SqlParser::new("SELECT * FROM t WHERE a > 3")
            .parse()
            .unwrap()
        else {
            panic!("Expected SELECT");
        };

        let evaluator =
            PredicateEvaluator::from_optional(&schema(), select.where_clause.as_ref()).unwrap();
        assert!(evaluator.evaluate(&row(4, "x")).unwrap());
        assert!(!evaluator.evaluate(&row(3, "x")).unwrap());
    }
}
