//! Persistence as a command script.
//!
//! A saved database is a text file of commands in the same language the
//! engine executes: one `CREATE TABLE` per table followed by one
//! `INSERT INTO` per row. Restoring is replaying that file line by line.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Database, DatabaseError, db::table::Table};

/// The `CREATE TABLE` command that rebuilds `table`'s schema.
pub fn create_command(table: &Table) -> String {
    let columns = table
        .schema()
        .columns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!("CREATE TABLE {} ({columns})", table.name())
}

/// One `INSERT INTO` command per stored row, in storage order.
pub fn insert_commands(table: &Table) -> impl Iterator<Item = String> + '_ {
    table.rows().iter().map(|row| {
        let values = row
            .values
            .iter()
            .map(|value| value.to_literal())
            .collect::<Vec<_>>()
            .join(", ");

        format!("INSERT INTO {} VALUES ({values})", table.name())
    })
}

/// Every command needed to rebuild `table`.
pub fn encode_table(table: &Table) -> impl Iterator<Item = String> + '_ {
    std::iter::once(create_command(table)).chain(insert_commands(table))
}

/// Writes the whole database as a command script.
pub fn write_script<W: Write>(database: &Database, writer: W) -> std::io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for table in database.tables() {
        for command in encode_table(table) {
            writeln!(writer, "{command}")?;
        }
    }

    writer.flush()
}

/// Saves the database to `path`, replacing any existing file.
pub fn save_to_path(database: &Database, path: &Path) -> Result<(), DatabaseError> {
    let file = File::create(path).map_err(DatabaseError::io(path, "writing"))?;
    write_script(database, file).map_err(DatabaseError::io(path, "writing"))
}

/// Reads the lines of a command script.
pub fn read_script(path: &Path) -> Result<Vec<String>, DatabaseError> {
    let file = File::open(path).map_err(DatabaseError::io(path, "reading"))?;

    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::io(path, "reading"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnDef, DataType, Row, Schema, Value};

    fn sample_table() -> Table {
        let mut table = Table::new(
            "people",
            Schema::new(vec![
                ColumnDef::new("id", DataType::Integer),
                ColumnDef::new("name", DataType::Text),
            ]),
        );
        table
            .insert_row(Row::new(vec![
                Value::Integer(1),
                Value::Text("Ada Lovelace".to_string()),
            ]))
            .unwrap();
        table
            .insert_row(Row::new(vec![Value::Integer(-2), Value::Text(String::new())]))
            .unwrap();
        table
    }

    #[test]
    fn test_encode_table() {
        let table = sample_table();
        let commands: Vec<_> = encode_table(&table).collect();

        assert_eq!(
            commands,
            vec![
                "CREATE TABLE people (id INT, name STRING)",
                "INSERT INTO people VALUES (1, \"Ada Lovelace\")",
                "INSERT INTO people VALUES (-2, \"\")",
            ]
        );
    }

    #[test]
    fn test_encode_empty_table() {
        let table = Table::new(
            "empty",
            Schema::new(vec![ColumnDef::new("x", DataType::Integer)]),
        );
        let commands: Vec<_> = encode_table(&table).collect();

        assert_eq!(commands, vec!["CREATE TABLE empty (x INT)"]);
    }

    #[test]
    fn test_save_and_read_script() {
        let mut db = Database::new();
        db.execute("CREATE TABLE b (x INT)").unwrap();
        db.execute("CREATE TABLE a (s STRING)").unwrap();
        db.execute("INSERT INTO a VALUES (\"hi\")").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        save_to_path(&db, &path).unwrap();

        // tables are written in name order
        assert_eq!(
            read_script(&path).unwrap(),
            vec![
                "CREATE TABLE a (s STRING)",
                "INSERT INTO a VALUES (\"hi\")",
                "CREATE TABLE b (x INT)",
            ]
        );
    }

    #[test]
    fn test_read_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_script(&dir.path().join("missing.txt")).unwrap_err();

        assert!(matches!(
            err,
            DatabaseError::Io {
                operation: "reading",
                ..
            }
        ));
    }

    #[test]
    fn test_save_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("dump.txt");

        let err = save_to_path(&Database::new(), &path).unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Io {
                operation: "writing",
                ..
            }
        ));
    }
}
