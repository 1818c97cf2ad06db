//! User storage and credential checks.

use crate::domain::{NewUser, Role, User};
use crate::error::AppError;
use crate::infra::db::{self, DbPool};
use chrono::Utc;
use rusqlite::{params, Row};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const COLS: &str = "id, username, password_hash, role, created_at, last_login, is_active";

fn from_row(r: &Row<'_>) -> rusqlite::Result<User> {
    let role_raw: String = r.get(3)?;
    let role = Role::from_str(&role_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("invalid role token: {}", role_raw).into(),
        )
    })?;
    Ok(User {
        id: r.get(0)?,
        username: r.get(1)?,
        password_hash: r.get(2)?,
        role,
        created_at: r.get(4)?,
        last_login: r.get(5)?,
        is_active: r.get(6)?,
    })
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Salted one-way hash; stored as `salt$digest`.
fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

fn verify_password(stored: &str, password: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

pub fn create(pool: &DbPool, user: &NewUser) -> Result<i64, AppError> {
    let now = Utc::now().to_rfc3339();
    let id = db::insert(
        pool,
        "INSERT INTO users (username, password_hash, role, created_at, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.username,
            hash_password(&user.password),
            user.role.as_str(),
            &now,
            user.is_active
        ],
    )
    .map_err(|e| {
        log::error!("failed to create user {}: {}", user.username, e);
        e
    })?;
    log::info!("created user {} ({})", id, user.username);
    Ok(id)
}

pub fn get_by_username(pool: &DbPool, username: &str) -> Option<User> {
    let sql = format!("SELECT {} FROM users WHERE username = ?1", COLS);
    match db::query_one(pool, &sql, params![username], from_row) {
        Ok(user) => user,
        Err(e) => {
            log::error!("failed to load user {}: {}", username, e);
            None
        }
    }
}

/// Username + secret + active flag, or nothing. `last_login` is bumped only
/// on success.
pub fn authenticate(pool: &DbPool, username: &str, password: &str) -> Option<User> {
    let user = get_by_username(pool, username)?;
    if !user.is_active || !verify_password(&user.password_hash, password) {
        log::warn!("failed authentication for {}", username);
        return None;
    }
    update_last_login(pool, user.id);
    Some(user)
}

pub fn update_last_login(pool: &DbPool, user_id: i64) -> bool {
    let now = Utc::now().to_rfc3339();
    match db::execute(
        pool,
        "UPDATE users SET last_login = ?1 WHERE id = ?2",
        params![&now, user_id],
    ) {
        Ok(affected) => affected > 0,
        Err(e) => {
            log::error!("failed to update last_login for user {}: {}", user_id, e);
            false
        }
    }
}
