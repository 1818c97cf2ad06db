//! SQLite connection management and scoped transactional access.

use crate::error::AppError;
use rusqlite::{Connection, Row, ToSql, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Single shared handle to the embedded store. One pool per process is a
/// caller convention, not a language-level singleton: everything downstream
/// takes `&DbPool`.
pub struct DbPool(pub Mutex<Connection>);

/// Initialize DB at path, run migrations, seed sample data, return the pool.
pub fn init_db(db_path: &Path) -> Result<DbPool, AppError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AppError::Db(e.to_string()))?;
    }
    let conn = Connection::open(db_path).map_err(|e| AppError::Db(e.to_string()))?;
    let pool = open_pool(conn)?;
    crate::infra::migrations::apply_all(&pool)?;
    crate::infra::seed::insert_sample_data(&pool)?;
    log::info!("database ready at {:?}", db_path);
    Ok(pool)
}

fn open_pool(conn: Connection) -> Result<DbPool, AppError> {
    conn.execute_batch("PRAGMA foreign_keys = ON")
        .map_err(|e| AppError::Db(e.to_string()))?;
    Ok(DbPool(Mutex::new(conn)))
}

/// In-memory DB with the full schema applied and no data. For tests.
pub fn init_test_db() -> DbPool {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    let pool = open_pool(conn).expect("configure in-memory db");
    crate::infra::migrations::apply_all(&pool).expect("migrate in-memory db");
    pool
}

/// In-memory DB with schema plus the shipped sample data. For tests.
pub fn init_seeded_test_db() -> DbPool {
    let pool = init_test_db();
    crate::infra::seed::insert_sample_data(&pool).expect("seed in-memory db");
    pool
}

/// Get connection from pool (serialized access; no concurrent writers).
pub fn get_connection(pool: &DbPool) -> MutexGuard<'_, Connection> {
    pool.0.lock().expect("db lock")
}

/// Scoped transaction: commit on `Ok`, rollback (via drop) on `Err`. The
/// connection guard is released on every exit path.
pub fn with_tx<T, F>(pool: &DbPool, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, AppError>,
{
    let conn = get_connection(pool);
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| AppError::Db(e.to_string()))?;
    let out = f(&tx)?;
    tx.commit().map_err(|e| AppError::Db(e.to_string()))?;
    Ok(out)
}

/// SELECT returning mapped rows.
pub fn query_rows<T, F>(
    pool: &DbPool,
    sql: &str,
    params: &[&dyn ToSql],
    mut map: F,
) -> Result<Vec<T>, AppError>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let conn = get_connection(pool);
    let mut stmt = conn.prepare(sql).map_err(|e| AppError::Db(e.to_string()))?;
    let rows = stmt
        .query_map(params, |r| map(r))
        .map_err(|e| AppError::Db(e.to_string()))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| AppError::Db(e.to_string()))?);
    }
    Ok(out)
}

/// SELECT expecting at most one row.
pub fn query_one<T, F>(
    pool: &DbPool,
    sql: &str,
    params: &[&dyn ToSql],
    map: F,
) -> Result<Option<T>, AppError>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut rows = query_rows(pool, sql, params, map)?;
    if rows.is_empty() {
        Ok(None)
    } else {
        Ok(Some(rows.swap_remove(0)))
    }
}

/// INSERT/UPDATE/DELETE returning the affected row count.
pub fn execute(pool: &DbPool, sql: &str, params: &[&dyn ToSql]) -> Result<usize, AppError> {
    let conn = get_connection(pool);
    conn.execute(sql, params)
        .map_err(|e| AppError::Db(e.to_string()))
}

/// INSERT returning the new rowid.
pub fn insert(pool: &DbPool, sql: &str, params: &[&dyn ToSql]) -> Result<i64, AppError> {
    let conn = get_connection(pool);
    conn.execute(sql, params)
        .map_err(|e| AppError::Db(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}
