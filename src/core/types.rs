use std::str::FromStr;

use strum::{Display, EnumString};

use crate::DatabaseError;

/// Column types supported by Rowboat.
///
/// The `Display` form is the type token used by the command language, so a
/// schema can be written back out exactly as it was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum DataType {
    /// 64-bit signed integer.
    #[strum(serialize = "INT")]
    Integer,

    /// UTF-8 text.
    #[strum(serialize = "STRING")]
    Text,
}

impl DataType {
    /// Resolves a type token (`INT` or `STRING`) to a [`DataType`].
    pub fn from_type_name(name: &str) -> Result<Self, DatabaseError> {
        Self::from_str(name).map_err(|_| DatabaseError::UnknownType(name.to_string()))
    }

    /// The value an existing row receives when a column of this type is added.
    pub fn zero_value(self) -> Value {
        match self {
            DataType::Integer => Value::Integer(0),
            DataType::Text => Value::Text(String::new()),
        }
    }
}

/// A value stored in a table cell.
///
/// There is no NULL: every cell holds exactly one integer or one string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    /// A 64-bit signed integer value.
    Integer(i64),

    /// A UTF-8 text string.
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Value {
    /// Returns the data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Text(_) => DataType::Text,
        }
    }

    /// Renders the value as a literal of the command language.
    ///
    /// Integers are bare, text is wrapped in double quotes.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Text(s) => format!("\"{s}\""),
        }
    }
}
