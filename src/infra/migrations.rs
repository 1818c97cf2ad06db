//! Versioned, reversible schema migrations over the embedded store.
//!
//! Each unit carries an `up`/`down` pair and runs in its own transaction
//! together with its bookkeeping row, so the schema and the tracking table
//! can never disagree. The first failing unit halts the run.

use crate::error::AppError;
use crate::infra::db::{self, DbPool};
use chrono::Utc;
use rusqlite::{params, Transaction};
use serde::Serialize;
use std::time::Instant;

/// A single versioned, reversible schema change.
pub struct Migration {
    pub version: &'static str,
    pub description: &'static str,
    up: fn(&Transaction<'_>) -> rusqlite::Result<()>,
    down: fn(&Transaction<'_>) -> rusqlite::Result<()>,
}

/// Registration order doubles as version order.
static MIGRATIONS: &[Migration] = &[
    Migration {
        version: "001",
        description: "Create initial schema with questions and users tables",
        up: initial_schema_up,
        down: initial_schema_down,
    },
    Migration {
        version: "002",
        description: "Add indexes for better query performance",
        up: add_indexes_up,
        down: add_indexes_down,
    },
    Migration {
        version: "003",
        description: "Add tags column to questions table",
        up: add_tags_up,
        down: add_tags_down,
    },
    Migration {
        version: "004",
        description: "Add difficulty levels to questions",
        up: add_difficulty_up,
        down: add_difficulty_down,
    },
    Migration {
        version: "005",
        description: "Add quiz results tracking system",
        up: quiz_results_up,
        down: quiz_results_down,
    },
];

pub fn registry() -> &'static [Migration] {
    MIGRATIONS
}

#[derive(Debug, Serialize)]
pub struct MigrationStatus {
    pub total_migrations: usize,
    pub applied_count: usize,
    pub pending_count: usize,
    pub applied_versions: Vec<String>,
    pub pending_versions: Vec<String>,
    pub latest_version: Option<String>,
    pub is_up_to_date: bool,
}

fn ensure_tracking_table(pool: &DbPool) -> Result<(), AppError> {
    db::execute(
        pool,
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL,
            execution_time_ms INTEGER NOT NULL DEFAULT 0
        )",
        &[],
    )?;
    Ok(())
}

/// Applied versions in order. A missing tracking table means a fresh store:
/// the applied set is simply empty, never an error.
pub fn applied_versions(pool: &DbPool) -> Vec<String> {
    match db::query_rows(
        pool,
        "SELECT version FROM schema_migrations ORDER BY version",
        &[],
        |r| r.get(0),
    ) {
        Ok(versions) => versions,
        Err(AppError::Db(msg)) if msg.contains("no such table") => Vec::new(),
        Err(e) => {
            log::error!("failed to read applied migrations: {}", e);
            Vec::new()
        }
    }
}

/// Units not yet recorded as applied, in version order. A reverted middle
/// version shows up here again and is re-applied by the next `apply_all`.
pub fn pending(pool: &DbPool) -> Vec<&'static Migration> {
    let applied = applied_versions(pool);
    MIGRATIONS
        .iter()
        .filter(|m| !applied.iter().any(|v| v == m.version))
        .collect()
}

/// Apply every pending unit in order, one transaction each. Stops at the
/// first failure, leaving earlier units committed. Returns how many ran.
pub fn apply_all(pool: &DbPool) -> Result<usize, AppError> {
    ensure_tracking_table(pool)?;

    let units = pending(pool);
    if units.is_empty() {
        log::info!("no pending migrations");
        return Ok(0);
    }
    log::info!("applying {} pending migrations", units.len());

    for m in &units {
        let started = Instant::now();
        db::with_tx(pool, |tx| {
            (m.up)(tx).map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
            let elapsed_ms = started.elapsed().as_millis() as i64;
            tx.execute(
                "INSERT INTO schema_migrations (version, description, applied_at, execution_time_ms)
                 VALUES (?1, ?2, ?3, ?4)",
                params![m.version, m.description, Utc::now().to_rfc3339(), elapsed_ms],
            )
            .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
            Ok(())
        })
        .map_err(|e| {
            log::error!("migration {} failed, halting: {}", m.version, e);
            e
        })?;
        log::info!("applied migration {}: {}", m.version, m.description);
    }

    Ok(units.len())
}

/// Reverse one unit and delete its record in the same transaction. Does not
/// cascade to other units.
pub fn revert(pool: &DbPool, version: &str) -> Result<(), AppError> {
    let m = MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .ok_or_else(|| AppError::NotFound(format!("migration {}", version)))?;

    db::with_tx(pool, |tx| {
        (m.down)(tx).map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
        tx.execute(
            "DELETE FROM schema_migrations WHERE version = ?1",
            [m.version],
        )
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
        Ok(())
    })
    .map_err(|e| {
        log::error!("rollback of migration {} failed: {}", version, e);
        e
    })?;

    log::info!("rolled back migration {}", version);
    Ok(())
}

pub fn status(pool: &DbPool) -> MigrationStatus {
    let applied = applied_versions(pool);
    let pending_versions: Vec<String> = pending(pool)
        .iter()
        .map(|m| m.version.to_string())
        .collect();
    MigrationStatus {
        total_migrations: MIGRATIONS.len(),
        applied_count: applied.len(),
        pending_count: pending_versions.len(),
        latest_version: applied.last().cloned(),
        is_up_to_date: pending_versions.is_empty(),
        applied_versions: applied,
        pending_versions,
    }
}

/// Drop every table except the tracking table, clear the tracking rows, then
/// rebuild from scratch. Destructive; confirmation is the caller's concern.
pub fn reset(pool: &DbPool) -> Result<(), AppError> {
    log::warn!("resetting database, all data will be lost");
    ensure_tracking_table(pool)?;

    // sqlite_master lists tables in creation order, which drops users before
    // the quiz_results rows that reference them. Enforcement is suspended for
    // the drop pass and restored before anything is rebuilt.
    db::execute(pool, "PRAGMA foreign_keys = OFF", &[])?;
    let dropped = drop_user_tables(pool);
    db::execute(pool, "PRAGMA foreign_keys = ON", &[])?;
    dropped?;

    db::execute(pool, "DELETE FROM schema_migrations", &[])?;

    apply_all(pool)?;
    Ok(())
}

fn drop_user_tables(pool: &DbPool) -> Result<(), AppError> {
    let tables: Vec<String> = db::query_rows(
        pool,
        "SELECT name FROM sqlite_master WHERE type = 'table'",
        &[],
        |r| r.get(0),
    )?;
    for table in tables {
        if table == "sqlite_sequence" || table == "schema_migrations" {
            continue;
        }
        db::execute(pool, &format!("DROP TABLE IF EXISTS \"{}\"", table), &[])?;
    }
    Ok(())
}

// ===========================================
// Migration units
// ===========================================

fn column_exists(tx: &Transaction<'_>, table: &str, column: &str) -> rusqlite::Result<bool> {
    let sql = format!(
        "SELECT COUNT(*) FROM pragma_table_info('{}') WHERE name = ?1",
        table
    );
    let n: i64 = tx.query_row(&sql, [column], |r| r.get(0))?;
    Ok(n > 0)
}

fn initial_schema_up(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            prompt TEXT NOT NULL,
            option_a TEXT NOT NULL,
            option_b TEXT NOT NULL,
            option_c TEXT NOT NULL,
            answer TEXT NOT NULL CHECK(answer IN ('A', 'B', 'C')),
            category TEXT NOT NULL DEFAULT 'General',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user' CHECK(role IN ('user', 'admin')),
            created_at TEXT NOT NULL,
            last_login TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );",
    )
}

fn initial_schema_down(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        "DROP TABLE IF EXISTS questions;
         DROP TABLE IF EXISTS users;",
    )
}

fn add_indexes_up(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category);
         CREATE INDEX IF NOT EXISTS idx_questions_created_at ON questions(created_at);
         CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
         CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);",
    )
}

fn add_indexes_down(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        "DROP INDEX IF EXISTS idx_questions_category;
         DROP INDEX IF EXISTS idx_questions_created_at;
         DROP INDEX IF EXISTS idx_users_username;
         DROP INDEX IF EXISTS idx_users_role;",
    )
}

fn add_tags_up(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    // Guarded: the column survives a revert (see add_tags_down), so a
    // reverted-then-reapplied unit must not trip over a duplicate column.
    if !column_exists(tx, "questions", "tags")? {
        tx.execute("ALTER TABLE questions ADD COLUMN tags TEXT NOT NULL DEFAULT ''", [])?;
    }
    Ok(())
}

fn add_tags_down(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    // SQLite can't drop the column cheaply; clearing the data reverses the
    // migration's observable effect.
    tx.execute("UPDATE questions SET tags = ''", [])?;
    Ok(())
}

fn add_difficulty_up(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    if !column_exists(tx, "questions", "difficulty")? {
        tx.execute(
            "ALTER TABLE questions ADD COLUMN difficulty TEXT NOT NULL DEFAULT 'Medium'
             CHECK(difficulty IN ('Easy', 'Medium', 'Hard'))",
            [],
        )?;
    }
    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_questions_difficulty ON questions(difficulty)",
        [],
    )?;
    Ok(())
}

fn add_difficulty_down(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        "DROP INDEX IF EXISTS idx_questions_difficulty;
         UPDATE questions SET difficulty = 'Medium';",
    )
}

fn quiz_results_up(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS quiz_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            score INTEGER NOT NULL,
            total_questions INTEGER NOT NULL,
            time_taken INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT NOT NULL,
            questions_attempted TEXT NOT NULL DEFAULT '',
            FOREIGN KEY (user_id) REFERENCES users (id)
        );
        CREATE INDEX IF NOT EXISTS idx_quiz_results_user ON quiz_results(user_id);
        CREATE INDEX IF NOT EXISTS idx_quiz_results_completed ON quiz_results(completed_at);",
    )
}

fn quiz_results_down(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute("DROP TABLE IF EXISTS quiz_results", [])?;
    Ok(())
}
