//! Rowboat: an in-memory relational store driven by a line-oriented command
//! language.
//!
//! Every interaction goes through [`Database::execute`], one line at a time.
//! The same language doubles as the on-disk format: `SAVE TO` writes a
//! script of `CREATE TABLE` and `INSERT INTO` commands, and `LOAD FROM`
//! replays one.

pub(crate) mod common;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod sql;
pub mod storage;

pub use crate::common::error::DatabaseError;
pub use crate::core::types::{DataType, Value};
pub use crate::db::{
    database::{DEFAULT_MAX_LOAD_DEPTH, Database, Outcome, QueryResponse},
    table::*,
};
