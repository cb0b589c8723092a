use std::{collections::BTreeMap, fmt, path::Path};

use log::{debug, info, trace};

use crate::{
    DatabaseError,
    core::types::{DataType, Value},
    db::table::{ColumnDef, Row, Schema, Table},
    sql::{
        evaluator::{Evaluator, PredicateEvaluator, coerce_literal},
        parser::{
            AddColumnStatement, ColumnDefinition, CreateStatement, DeleteStatement,
            InsertStatement, Literal, LoadStatement, SaveStatement, SelectList, SelectStatement,
            SqlParser, Statement, UpdateStatement,
        },
    },
    storage::script,
};

/// How deep `LOAD` commands may nest before the innermost one is refused.
///
/// A script that loads itself, directly or through other scripts, would
/// otherwise recurse forever.
pub const DEFAULT_MAX_LOAD_DEPTH: usize = 16;

/// Rows produced by a SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    /// Names of the projected columns, in output order.
    pub columns: Vec<String>,

    /// The rows returned by the query, already projected.
    pub rows: Vec<Row>,
}

impl fmt::Display for QueryResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.columns.join("\t"))?;

        for row in &self.rows {
            let values = row
                .values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            write!(f, "\n{}", values.join("\t"))?;
        }

        Ok(())
    }
}

/// Result of executing one command line.
///
/// `Display` renders the text shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The line was blank.
    Empty,

    /// A one-line confirmation.
    Message(String),

    /// SELECT output.
    Rows(QueryResponse),

    /// A replayed script, with the outcome of each of its lines.
    Loaded { path: String, replayed: Vec<Outcome> },

    /// The line matched no command. Nothing was changed.
    Unrecognized(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Empty => Ok(()),
            Outcome::Message(message) => write!(f, "{message}"),
            Outcome::Rows(response) => write!(f, "{response}"),
            Outcome::Loaded { path, replayed } => {
                for outcome in replayed {
                    writeln!(f, "{outcome}")?;
                }
                write!(f, "Database loaded from {path}.")
            }
            Outcome::Unrecognized(line) => write!(f, "Unrecognized query: {line}"),
        }
    }
}

/// The main database handle.
///
/// `Database` owns every table and is the single entry point of the command
/// language: each call to [`Database::execute`] parses one line, runs it, and
/// returns its [`Outcome`]. Nothing is kept between calls apart from the
/// tables themselves, so independent instances never interfere.
///
/// # Example
///
/// ```
/// use rowboat_db::Database;
///
/// let mut db = Database::new();
/// db.execute("CREATE TABLE t (a INT, b STRING)").unwrap();
/// db.execute("INSERT INTO t VALUES (1, \"x\")").unwrap();
///
/// let out = db.execute("SELECT * FROM t").unwrap();
/// assert_eq!(out.to_string(), "a\tb\n1\tx");
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// All tables, keyed by name.
    tables: BTreeMap<String, Table>,

    max_load_depth: usize,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::with_max_load_depth(DEFAULT_MAX_LOAD_DEPTH)
    }

    /// Creates an empty database that refuses `LOAD`s nested deeper than
    /// `max_load_depth`.
    pub fn with_max_load_depth(max_load_depth: usize) -> Self {
        Self {
            tables: BTreeMap::new(),
            max_load_depth,
        }
    }

    /// Creates a table, replacing any table of the same name.
    pub fn create_table(&mut self, name: &str, schema: Schema) {
        if self.tables.contains_key(name) {
            debug!("replacing existing table {name}");
        }

        self.tables.insert(name.to_string(), Table::new(name, schema));
    }

    /// Gets an immutable reference to a table.
    pub fn get_table(&self, name: &str) -> Result<&Table, DatabaseError> {
        self.tables
            .get(name)
            .ok_or_else(|| DatabaseError::TableNotFound(name.to_string()))
    }

    /// Gets a mutable reference to a table.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table, DatabaseError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DatabaseError::TableNotFound(name.to_string()))
    }

    /// All tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Executes one command line.
    ///
    /// A line that is not a command yields [`Outcome::Unrecognized`] rather
    /// than an error. Errors abort only the command that raised them.
    pub fn execute(&mut self, line: &str) -> Result<Outcome, DatabaseError> {
        self.execute_at_depth(line, 0)
    }

    fn execute_at_depth(&mut self, line: &str, depth: usize) -> Result<Outcome, DatabaseError> {
        if line.trim().is_empty() {
            return Ok(Outcome::Empty);
        }

        let statement = match SqlParser::new(line).parse() {
            Ok(statement) => statement,
            Err(report) => {
                debug!("unrecognized command {line:?}: {report}");
                return Ok(Outcome::Unrecognized(line.to_string()));
            }
        };

        debug!("executing {statement:?}");

        match statement {
            Statement::Create(create) => self.execute_create(create),
            Statement::Insert(insert) => self.execute_insert(insert),
            Statement::Select(select) => self.execute_select(select).map(Outcome::Rows),
            Statement::Delete(delete) => self.execute_delete(delete),
            Statement::AddColumn(add) => self.execute_add_column(add),
            Statement::Save(save) => self.execute_save(save),
            Statement::Load(load) => self.execute_load(load, depth),
            Statement::Update(update) => self.execute_update(update),
        }
    }

    fn execute_create(&mut self, create: CreateStatement) -> Result<Outcome, DatabaseError> {
        let columns = create
            .columns
            .iter()
            .map(column_def)
            .collect::<Result<Vec<_>, _>>()?;

        self.create_table(create.table_name, Schema::new(columns));

        Ok(Outcome::Message(format!("Table {} created.", create.table_name)))
    }

    /// Values take their type from how they are written, not from the
    /// column they land in.
    fn execute_insert(&mut self, insert: InsertStatement) -> Result<Outcome, DatabaseError> {
        let table = self.get_table_mut(insert.table_name)?;

        if insert.values.len() != table.schema().len() {
            return Err(DatabaseError::ColumnCountMismatch {
                table: table.name().to_string(),
                expected: table.schema().len(),
                actual: insert.values.len(),
            });
        }

        let values = insert
            .values
            .iter()
            .zip(&table.schema().columns)
            .map(|(literal, column)| lexical_value(literal, column))
            .collect::<Result<Vec<_>, _>>()?;

        table.insert_row(Row::new(values))?;

        Ok(Outcome::Message(format!("Row inserted into {}.", insert.table_name)))
    }

    fn execute_select(&self, select: SelectStatement) -> Result<QueryResponse, DatabaseError> {
        let table = self.get_table(select.table_name)?;
        let schema = table.schema();

        let indices: Vec<usize> = match &select.select_list {
            SelectList::Star => (0..schema.len()).collect(),
            SelectList::Columns(names) => names
                .iter()
                .map(|name| schema.get_column_index(name))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let predicate = PredicateEvaluator::from_optional(schema, select.where_clause.as_ref())?;

        let mut rows = Vec::new();
        for row in table.rows() {
            if predicate.evaluate(row)? {
                rows.push(Row::new(
                    indices.iter().map(|&i| row.values[i].clone()).collect(),
                ));
            }
        }

        Ok(QueryResponse {
            columns: indices
                .iter()
                .map(|&i| schema.columns[i].name.clone())
                .collect(),
            rows,
        })
    }

    fn execute_delete(&mut self, delete: DeleteStatement) -> Result<Outcome, DatabaseError> {
        let table = self.get_table_mut(delete.table_name)?;
        let predicate =
            PredicateEvaluator::new(table.schema(), std::slice::from_ref(&delete.where_clause))?;

        let mask = matching_rows(table, &predicate)?;
        let removed = table.remove_rows(&mask);

        Ok(Outcome::Message(format!(
            "{removed} row(s) deleted from {}",
            delete.table_name
        )))
    }

    fn execute_add_column(&mut self, add: AddColumnStatement) -> Result<Outcome, DatabaseError> {
        let column = column_def(&add.column)?;
        self.get_table_mut(add.table_name)?.add_column(column);

        Ok(Outcome::Message(format!(
            "Column {} added to table {}",
            add.column.name, add.table_name
        )))
    }

    fn execute_save(&self, save: SaveStatement) -> Result<Outcome, DatabaseError> {
        script::save_to_path(self, Path::new(save.path))?;
        info!("saved {} table(s) to {}", self.tables.len(), save.path);

        Ok(Outcome::Message(format!("Database saved to {}.", save.path)))
    }

    /// Replays every line of the script through [`Database::execute`]. The
    /// first failing line aborts the load with [`DatabaseError::LoadFailed`],
    /// which carries the outcomes of the lines before it; those stay applied.
    fn execute_load(
        &mut self,
        load: LoadStatement,
        depth: usize,
    ) -> Result<Outcome, DatabaseError> {
        if depth >= self.max_load_depth {
            return Err(DatabaseError::LoadDepthExceeded(self.max_load_depth));
        }

        let lines = script::read_script(Path::new(load.path))?;

        let mut replayed = Vec::with_capacity(lines.len());
        for line in &lines {
            trace!("replaying {line:?}");
            match self.execute_at_depth(line, depth + 1) {
                Ok(Outcome::Empty) => {}
                Ok(outcome) => replayed.push(outcome),
                Err(err) => {
                    debug!("LOAD from {} failed at {line:?}: {err}", load.path);
                    return Err(DatabaseError::LoadFailed {
                        path: load.path.to_string(),
                        replayed,
                        source: Box::new(err),
                    });
                }
            }
        }

        info!("loaded {} line(s) from {}", lines.len(), load.path);

        Ok(Outcome::Loaded {
            path: load.path.to_string(),
            replayed,
        })
    }

    fn execute_update(&mut self, update: UpdateStatement) -> Result<Outcome, DatabaseError> {
        let table = self.get_table_mut(update.table_name)?;
        let schema = table.schema();

        let assignments = update
            .assignments
            .iter()
            .map(|assignment| {
                let index = schema.get_column_index(assignment.column)?;
                let value = coerce_literal(&assignment.value, &schema.columns[index])?;
                Ok((index, value))
            })
            .collect::<Result<Vec<(usize, Value)>, DatabaseError>>()?;

        let predicate = PredicateEvaluator::new(schema, &update.conditions)?;
        let mask = matching_rows(table, &predicate)?;

        let mut updated = 0;
        for (row, _) in table.rows.iter_mut().zip(&mask).filter(|(_, hit)| **hit) {
            for (index, value) in &assignments {
                row.values[*index] = value.clone();
            }
            updated += 1;
        }

        Ok(Outcome::Message(format!(
            "{updated} row(s) updated in {}",
            update.table_name
        )))
    }
}

fn column_def(definition: &ColumnDefinition) -> Result<ColumnDef, DatabaseError> {
    let data_type = DataType::from_type_name(definition.type_name)?;
    Ok(ColumnDef::new(definition.name, data_type))
}

/// Evaluates the predicate on every row before anything is changed, so a
/// failing row leaves the table untouched.
fn matching_rows(
    table: &Table,
    predicate: &PredicateEvaluator,
) -> Result<Vec<bool>, DatabaseError> {
    table
        .rows()
        .iter()
        .map(|row| predicate.evaluate(row))
        .collect()
}

fn lexical_value(literal: &Literal, column: &ColumnDef) -> Result<Value, DatabaseError> {
    match literal {
        Literal::Integer(s) => s.parse::<i64>().map(Value::Integer).map_err(|_| {
            DatabaseError::InvalidLiteral {
                column: column.name.clone(),
                data_type: column.data_type.to_string(),
                literal: literal.to_string(),
            }
        }),
        Literal::Text(s) | Literal::Word(s) => Ok(Value::Text(s.to_string())),
    }
}
