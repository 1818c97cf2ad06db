//! Quiz-taking use cases: settings checks, session start/completion,
//! score history.

use crate::config::QuizConfig;
use crate::domain::{Difficulty, NewQuizResult, Question, QuizSession, ScoreReport};
use crate::error::AppError;
use crate::infra::db::DbPool;
use crate::repo;
use crate::repo::result::QuizStatistics;
use serde::Serialize;
use std::collections::BTreeMap;

/// Hard cap on questions per session, regardless of configuration.
pub const MAX_QUIZ_QUESTIONS: i64 = 50;

#[derive(Debug, Clone, Serialize)]
pub struct LatestScore {
    pub has_result: bool,
    pub score: i64,
    pub total: i64,
    pub percentage: f64,
    pub grade: String,
    pub time_taken: i64,
    pub completed_at: Option<String>,
}

impl Default for LatestScore {
    fn default() -> Self {
        Self {
            has_result: false,
            score: 0,
            total: 0,
            percentage: 0.0,
            grade: "N/A".into(),
            time_taken: 0,
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionCounts {
    pub total: i64,
    pub by_category: BTreeMap<String, i64>,
    pub by_difficulty: BTreeMap<String, i64>,
}

pub fn available_categories(pool: &DbPool) -> Vec<String> {
    repo::question::get_categories(pool)
}

/// Check that the requested quiz shape can actually be served before a
/// session is created.
pub fn validate_settings(
    pool: &DbPool,
    count: i64,
    category: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Result<(), AppError> {
    if count < 1 {
        return Err(AppError::Validation(
            "at least one question is required".into(),
        ));
    }
    if count > MAX_QUIZ_QUESTIONS {
        return Err(AppError::Validation(format!(
            "at most {} questions per quiz",
            MAX_QUIZ_QUESTIONS
        )));
    }
    let matching = repo::question::search(pool, "", category, difficulty).len() as i64;
    if matching < count {
        return Err(AppError::Validation(format!(
            "only {} questions match the selected filters, {} requested",
            matching, count
        )));
    }
    Ok(())
}

/// Random question draw for one session; no duplicates within a draw.
pub fn quiz_questions(
    pool: &DbPool,
    count: i64,
    category: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Vec<Question> {
    repo::question::get_random(pool, count, category, difficulty)
}

pub fn start_session(
    pool: &DbPool,
    config: &QuizConfig,
    count: i64,
    category: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Result<QuizSession, AppError> {
    validate_settings(pool, count, category, difficulty)?;
    let questions = quiz_questions(pool, count, category, difficulty);
    let session = QuizSession::new(questions, config)?;
    log::info!(
        "started quiz session: {} questions, {} seconds",
        session.total_questions(),
        session.remaining_secs()
    );
    Ok(session)
}

/// Persist the completed session's result and claim its report. Fails when
/// the session is not completed or its result was already saved. The report
/// is claimed only after the write lands, so a storage failure leaves the
/// session completable again on retry.
pub fn complete_session(
    pool: &DbPool,
    session: &mut QuizSession,
    user_id: Option<i64>,
) -> Result<ScoreReport, AppError> {
    let report = session
        .report()
        .ok_or_else(|| AppError::Validation("session has no unreported result".into()))?;
    repo::result::create(
        pool,
        &NewQuizResult {
            user_id,
            score: report.score,
            total_questions: report.total_questions,
            time_taken: report.time_taken,
            questions_attempted: report.question_ids.clone(),
        },
    )?;
    session.mark_reported();
    Ok(report)
}

pub fn quiz_statistics(pool: &DbPool) -> QuizStatistics {
    repo::result::get_statistics(pool)
}

/// Most recent recorded score, or a "no result yet" placeholder.
pub fn latest_score(pool: &DbPool, user_id: Option<i64>) -> LatestScore {
    match repo::result::get_latest_result(pool, user_id) {
        Some(result) => {
            let percentage = result.percentage();
            LatestScore {
                has_result: true,
                score: result.score,
                total: result.total_questions,
                percentage,
                grade: result.grade().to_string(),
                time_taken: result.time_taken,
                completed_at: Some(result.completed_at),
            }
        }
        None => LatestScore::default(),
    }
}

/// Question pool breakdown shown on the quiz setup screen.
pub fn question_counts(pool: &DbPool) -> QuestionCounts {
    let mut by_category = BTreeMap::new();
    for category in repo::question::get_categories(pool) {
        let count = repo::question::search(pool, "", Some(&category), None).len() as i64;
        by_category.insert(category, count);
    }
    let mut by_difficulty = BTreeMap::new();
    for d in Difficulty::all() {
        let count = repo::question::search(pool, "", None, Some(*d)).len() as i64;
        by_difficulty.insert(d.as_str().to_string(), count);
    }
    QuestionCounts {
        total: repo::question::get_count(pool),
        by_category,
        by_difficulty,
    }
}
