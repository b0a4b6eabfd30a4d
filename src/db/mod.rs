//! Database module: SQLite access to the taxonomy database.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial module structure

pub mod connection;
pub mod dump;
pub mod error;
pub mod helper;
pub mod query;
pub mod schema;

pub use error::{DbError, DbResult};
pub use helper::{Row, SqlHelper};
pub use query::{get_columns, placeholders, Conjunction, Filter, Modifier, Op};
