//! Quiz result storage and aggregate statistics.

use crate::domain::{join_ids, parse_ids, NewQuizResult, QuizResult};
use crate::error::AppError;
use crate::infra::db::{self, DbPool};
use chrono::Utc;
use rusqlite::{params, Row};
use serde::Serialize;

const COLS: &str =
    "id, user_id, score, total_questions, time_taken, completed_at, questions_attempted";

fn from_row(r: &Row<'_>) -> rusqlite::Result<QuizResult> {
    let attempted_raw: String = r.get(6)?;
    Ok(QuizResult {
        id: r.get(0)?,
        user_id: r.get(1)?,
        score: r.get(2)?,
        total_questions: r.get(3)?,
        time_taken: r.get(4)?,
        completed_at: r.get(5)?,
        questions_attempted: parse_ids(&attempted_raw),
    })
}

pub fn create(pool: &DbPool, result: &NewQuizResult) -> Result<i64, AppError> {
    let now = Utc::now().to_rfc3339();
    let id = db::insert(
        pool,
        "INSERT INTO quiz_results (user_id, score, total_questions, time_taken, completed_at, questions_attempted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            result.user_id,
            result.score,
            result.total_questions,
            result.time_taken,
            &now,
            join_ids(&result.questions_attempted)
        ],
    )
    .map_err(|e| {
        log::error!("failed to save quiz result: {}", e);
        e
    })?;
    log::info!("saved quiz result {}", id);
    Ok(id)
}

pub fn get_user_results(pool: &DbPool, user_id: i64, limit: i64) -> Vec<QuizResult> {
    let sql = format!(
        "SELECT {} FROM quiz_results WHERE user_id = ?1 ORDER BY completed_at DESC, id DESC LIMIT ?2",
        COLS
    );
    db::query_rows(pool, &sql, params![user_id, limit], from_row).unwrap_or_else(|e| {
        log::error!("failed to load results for user {}: {}", user_id, e);
        Vec::new()
    })
}

/// Most recent result; global latest when no user is given.
pub fn get_latest_result(pool: &DbPool, user_id: Option<i64>) -> Option<QuizResult> {
    let res = match user_id {
        Some(user_id) => db::query_one(
            pool,
            &format!(
                "SELECT {} FROM quiz_results WHERE user_id = ?1 ORDER BY completed_at DESC, id DESC LIMIT 1",
                COLS
            ),
            params![user_id],
            from_row,
        ),
        None => db::query_one(
            pool,
            &format!(
                "SELECT {} FROM quiz_results ORDER BY completed_at DESC, id DESC LIMIT 1",
                COLS
            ),
            &[],
            from_row,
        ),
    };
    match res {
        Ok(result) => result,
        Err(e) => {
            log::error!("failed to load latest result: {}", e);
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuizStatistics {
    pub total_quizzes: i64,
    /// Mean percentage across all recorded attempts, two decimals.
    pub average_score: f64,
    pub best_score: f64,
}

pub fn get_statistics(pool: &DbPool) -> QuizStatistics {
    let res = db::query_one(
        pool,
        "SELECT COUNT(*),
                COALESCE(AVG(CAST(score AS REAL) / total_questions * 100), 0),
                COALESCE(MAX(CAST(score AS REAL) / total_questions * 100), 0)
         FROM quiz_results",
        &[],
        |r| {
            Ok(QuizStatistics {
                total_quizzes: r.get(0)?,
                average_score: r.get(1)?,
                best_score: r.get(2)?,
            })
        },
    );
    match res {
        Ok(Some(mut stats)) => {
            stats.average_score = round2(stats.average_score);
            stats.best_score = round2(stats.best_score);
            stats
        }
        Ok(None) => QuizStatistics::default(),
        Err(e) => {
            log::error!("failed to compute quiz statistics: {}", e);
            QuizStatistics::default()
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
