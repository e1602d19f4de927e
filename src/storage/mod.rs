//! Storage layer for opdir
//!
//! A single SQLite database holds the cluster tables; schema changes ship as
//! embedded migrations.

pub mod migrations;
pub mod sqlite;

pub use sqlite::Database;
