//! Infrastructure: SQLite connection, migrations, seed data, session timer.

pub mod db;
pub mod migrations;
pub mod seed;
pub mod timer;

pub use db::{init_db, DbPool};
