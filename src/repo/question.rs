//! Question storage: CRUD, search, random selection.

use crate::domain::{join_tags, parse_tags, Choice, Difficulty, NewQuestion, Question};
use crate::error::AppError;
use crate::infra::db::{self, DbPool};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, Row, ToSql};

const COLS: &str =
    "id, prompt, option_a, option_b, option_c, answer, category, difficulty, tags, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Question> {
    let answer_raw: String = r.get(5)?;
    let answer = Choice::from_str(&answer_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("invalid answer token: {}", answer_raw).into(),
        )
    })?;
    let difficulty_raw: String = r.get(7)?;
    let difficulty = Difficulty::from_str(&difficulty_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            rusqlite::types::Type::Text,
            format!("invalid difficulty token: {}", difficulty_raw).into(),
        )
    })?;
    let tags_raw: String = r.get(8)?;
    Ok(Question {
        id: r.get(0)?,
        prompt: r.get(1)?,
        option_a: r.get(2)?,
        option_b: r.get(3)?,
        option_c: r.get(4)?,
        answer,
        category: r.get(6)?,
        difficulty,
        tags: parse_tags(&tags_raw),
        created_at: r.get(9)?,
        updated_at: r.get(10)?,
    })
}

pub fn create(pool: &DbPool, q: &NewQuestion) -> Result<i64, AppError> {
    let now = Utc::now().to_rfc3339();
    let id = db::insert(
        pool,
        "INSERT INTO questions (prompt, option_a, option_b, option_c, answer, category, difficulty, tags, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        params![
            q.prompt,
            q.option_a,
            q.option_b,
            q.option_c,
            q.answer.as_str(),
            q.category,
            q.difficulty.as_str(),
            join_tags(&q.tags),
            &now
        ],
    )
    .map_err(|e| {
        log::error!("failed to create question: {}", e);
        e
    })?;
    log::info!("created question {}", id);
    Ok(id)
}

pub fn get_by_id(pool: &DbPool, id: i64) -> Option<Question> {
    let sql = format!("SELECT {} FROM questions WHERE id = ?1", COLS);
    match db::query_one(pool, &sql, params![id], from_row) {
        Ok(q) => q,
        Err(e) => {
            log::error!("failed to load question {}: {}", id, e);
            None
        }
    }
}

/// Newest first; `limit = None` returns everything.
pub fn get_all(pool: &DbPool, limit: Option<i64>, offset: i64) -> Vec<Question> {
    let res = match limit {
        Some(limit) => db::query_rows(
            pool,
            &format!(
                "SELECT {} FROM questions ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
                COLS
            ),
            params![limit, offset],
            from_row,
        ),
        None => db::query_rows(
            pool,
            &format!("SELECT {} FROM questions ORDER BY created_at DESC, id DESC", COLS),
            &[],
            from_row,
        ),
    };
    res.unwrap_or_else(|e| {
        log::error!("failed to list questions: {}", e);
        Vec::new()
    })
}

/// Substring match across prompt and all three options, with optional
/// category/difficulty filters. Empty term matches everything.
pub fn search(
    pool: &DbPool,
    term: &str,
    category: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Vec<Question> {
    let mut sql = format!(
        "SELECT {} FROM questions
         WHERE (prompt LIKE ?1 OR option_a LIKE ?1 OR option_b LIKE ?1 OR option_c LIKE ?1)",
        COLS
    );
    let mut binds: Vec<Value> = vec![Value::Text(format!("%{}%", term))];

    if let Some(category) = category {
        binds.push(Value::Text(category.to_string()));
        sql.push_str(&format!(" AND category = ?{}", binds.len()));
    }
    if let Some(difficulty) = difficulty {
        binds.push(Value::Text(difficulty.as_str().to_string()));
        sql.push_str(&format!(" AND difficulty = ?{}", binds.len()));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let refs: Vec<&dyn ToSql> = binds.iter().map(|v| v as &dyn ToSql).collect();
    db::query_rows(pool, &sql, refs.as_slice(), from_row).unwrap_or_else(|e| {
        log::error!("question search failed: {}", e);
        Vec::new()
    })
}

/// Store-native random order with a hard limit; never returns duplicates
/// within one call.
pub fn get_random(
    pool: &DbPool,
    count: i64,
    category: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Vec<Question> {
    let mut sql = format!("SELECT {} FROM questions", COLS);
    let mut binds: Vec<Value> = Vec::new();
    let mut conditions: Vec<String> = Vec::new();

    if let Some(category) = category {
        binds.push(Value::Text(category.to_string()));
        conditions.push(format!("category = ?{}", binds.len()));
    }
    if let Some(difficulty) = difficulty {
        binds.push(Value::Text(difficulty.as_str().to_string()));
        conditions.push(format!("difficulty = ?{}", binds.len()));
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    binds.push(Value::Integer(count));
    sql.push_str(&format!(" ORDER BY RANDOM() LIMIT ?{}", binds.len()));

    let refs: Vec<&dyn ToSql> = binds.iter().map(|v| v as &dyn ToSql).collect();
    db::query_rows(pool, &sql, refs.as_slice(), from_row).unwrap_or_else(|e| {
        log::error!("random question selection failed: {}", e);
        Vec::new()
    })
}

pub fn get_count(pool: &DbPool) -> i64 {
    match db::query_one(pool, "SELECT COUNT(*) FROM questions", &[], |r| r.get(0)) {
        Ok(Some(n)) => n,
        Ok(None) => 0,
        Err(e) => {
            log::error!("failed to count questions: {}", e);
            0
        }
    }
}

pub fn get_categories(pool: &DbPool) -> Vec<String> {
    db::query_rows(
        pool,
        "SELECT DISTINCT category FROM questions ORDER BY category",
        &[],
        |r| r.get(0),
    )
    .unwrap_or_else(|e| {
        log::error!("failed to list categories: {}", e);
        Vec::new()
    })
}

/// Full-row replace; bumps `updated_at`. False when the id does not exist
/// or the write fails.
pub fn update(pool: &DbPool, id: i64, q: &NewQuestion) -> bool {
    let now = Utc::now().to_rfc3339();
    let res = db::execute(
        pool,
        "UPDATE questions
         SET prompt = ?1, option_a = ?2, option_b = ?3, option_c = ?4,
             answer = ?5, category = ?6, difficulty = ?7, tags = ?8, updated_at = ?9
         WHERE id = ?10",
        params![
            q.prompt,
            q.option_a,
            q.option_b,
            q.option_c,
            q.answer.as_str(),
            q.category,
            q.difficulty.as_str(),
            join_tags(&q.tags),
            &now,
            id
        ],
    );
    match res {
        Ok(affected) => {
            if affected > 0 {
                log::info!("updated question {}", id);
            }
            affected > 0
        }
        Err(e) => {
            log::error!("failed to update question {}: {}", id, e);
            false
        }
    }
}

pub fn delete(pool: &DbPool, id: i64) -> bool {
    match db::execute(pool, "DELETE FROM questions WHERE id = ?1", params![id]) {
        Ok(affected) => {
            if affected > 0 {
                log::info!("deleted question {}", id);
            }
            affected > 0
        }
        Err(e) => {
            log::error!("failed to delete question {}: {}", id, e);
            false
        }
    }
}
