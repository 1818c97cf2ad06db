//! Quiz-taking service integration tests: session lifecycle end to end

use quizdesk::app::{
    available_categories, complete_session, latest_score, question_counts, quiz_statistics,
    start_session, validate_settings, MAX_QUIZ_QUESTIONS,
};
use quizdesk::config::QuizConfig;
use quizdesk::domain::{Choice, Difficulty, SessionState};
use quizdesk::infra::db::init_seeded_test_db;
use quizdesk::infra::migrations;
use quizdesk::repo;

// ──────────────────────── Helper ────────────────────────

fn config(total_quiz_time: u32, auto_submit: bool) -> QuizConfig {
    QuizConfig {
        total_quiz_time,
        auto_submit,
        ..QuizConfig::default()
    }
}

// ══════════════════════════════════════════════════════════
//  validate_settings
// ══════════════════════════════════════════════════════════

#[test]
fn settings_bounds_are_enforced() {
    let pool = init_seeded_test_db();
    assert!(validate_settings(&pool, 0, None, None).is_err());
    assert!(validate_settings(&pool, MAX_QUIZ_QUESTIONS + 1, None, None).is_err());
    assert!(validate_settings(&pool, 5, None, None).is_ok());
}

#[test]
fn settings_require_enough_matching_questions() {
    let pool = init_seeded_test_db();
    // seed ships 8 Python questions
    assert!(validate_settings(&pool, 8, Some("Python"), None).is_ok());
    assert!(validate_settings(&pool, 9, Some("Python"), None).is_err());
    assert!(validate_settings(&pool, 1, Some("History"), None).is_err());
    assert!(validate_settings(&pool, 1, None, Some(Difficulty::Hard)).is_err());
}

// ══════════════════════════════════════════════════════════
//  session lifecycle
// ══════════════════════════════════════════════════════════

#[test]
fn start_session_draws_requested_count() {
    let pool = init_seeded_test_db();
    let session = start_session(&pool, &config(60, true), 3, None, None).unwrap();
    assert_eq!(session.total_questions(), 3);
    assert_eq!(session.state(), SessionState::InProgress);
    assert_eq!(session.remaining_secs(), 60);
}

#[test]
fn completed_session_persists_one_result() {
    let pool = init_seeded_test_db();
    let mut session = start_session(&pool, &config(60, true), 2, None, None).unwrap();
    session.answer(Choice::A).unwrap();
    session.next().unwrap();
    session.next().unwrap();
    assert_eq!(session.state(), SessionState::Completed);

    let report = complete_session(&pool, &mut session, None).unwrap();
    assert_eq!(report.total_questions, 2);
    assert_eq!(report.question_ids.len(), 2);

    let saved = repo::result::get_latest_result(&pool, None).unwrap();
    assert_eq!(saved.score, report.score);
    assert_eq!(saved.questions_attempted, report.question_ids);

    // the one report is gone; a second persist attempt fails
    let err = complete_session(&pool, &mut session, None).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert_eq!(repo::result::get_statistics(&pool).total_quizzes, 1);
}

#[test]
fn failed_result_write_leaves_session_completable() {
    let pool = init_seeded_test_db();
    let mut session = start_session(&pool, &config(60, true), 2, None, None).unwrap();
    session.answer(Choice::A).unwrap();
    session.next().unwrap();
    session.next().unwrap();
    assert_eq!(session.state(), SessionState::Completed);

    // knock the results table out from under the write
    migrations::revert(&pool, "005").unwrap();
    let err = complete_session(&pool, &mut session, None).unwrap_err();
    assert_eq!(err.code(), "DB_ERROR");

    // the score is not consumed by the failure; a retry lands it
    migrations::apply_all(&pool).unwrap();
    let report = complete_session(&pool, &mut session, None).unwrap();
    assert_eq!(report.total_questions, 2);
    assert_eq!(repo::result::get_statistics(&pool).total_quizzes, 1);

    // and still only once
    assert!(complete_session(&pool, &mut session, None).is_err());
    assert_eq!(repo::result::get_statistics(&pool).total_quizzes, 1);
}

#[test]
fn in_progress_session_cannot_be_completed() {
    let pool = init_seeded_test_db();
    let mut session = start_session(&pool, &config(60, true), 2, None, None).unwrap();
    assert!(complete_session(&pool, &mut session, None).is_err());
    assert_eq!(repo::result::get_statistics(&pool).total_quizzes, 0);
}

#[test]
fn timeout_with_auto_submit_persists_blank_score() {
    let pool = init_seeded_test_db();
    let mut session = start_session(&pool, &config(3, true), 2, None, None).unwrap();
    for _ in 0..3 {
        session.tick();
    }
    assert_eq!(session.state(), SessionState::Completed);

    let report = complete_session(&pool, &mut session, None).unwrap();
    assert_eq!(report.score, 0);
    assert_eq!(report.time_taken, 3);
    assert_eq!(repo::result::get_statistics(&pool).total_quizzes, 1);
}

#[test]
fn timeout_without_auto_submit_persists_nothing() {
    let pool = init_seeded_test_db();
    let mut session = start_session(&pool, &config(2, false), 2, None, None).unwrap();
    session.tick();
    session.tick();
    assert_eq!(session.state(), SessionState::Expired);

    assert!(complete_session(&pool, &mut session, None).is_err());
    assert_eq!(repo::result::get_statistics(&pool).total_quizzes, 0);
}

#[test]
fn abandoned_session_leaves_no_trace() {
    let pool = init_seeded_test_db();
    {
        let mut session = start_session(&pool, &config(60, true), 2, None, None).unwrap();
        session.answer(Choice::B).unwrap();
        // dropped without completing
    }
    assert_eq!(repo::result::get_statistics(&pool).total_quizzes, 0);
}

// ══════════════════════════════════════════════════════════
//  history and pool breakdown
// ══════════════════════════════════════════════════════════

#[test]
fn latest_score_reflects_history() {
    let pool = init_seeded_test_db();
    let empty = latest_score(&pool, None);
    assert!(!empty.has_result);
    assert_eq!(empty.grade, "N/A");

    let mut session = start_session(&pool, &config(60, true), 1, None, None).unwrap();
    session.next().unwrap();
    complete_session(&pool, &mut session, None).unwrap();

    let latest = latest_score(&pool, None);
    assert!(latest.has_result);
    assert_eq!(latest.total, 1);
    assert!(latest.completed_at.is_some());
}

#[test]
fn question_counts_break_down_the_pool() {
    let pool = init_seeded_test_db();
    let counts = question_counts(&pool);
    assert_eq!(counts.total, 8);
    assert_eq!(counts.by_category.get("Python"), Some(&8));
    assert_eq!(counts.by_difficulty.get("Easy"), Some(&5));
    assert_eq!(counts.by_difficulty.get("Medium"), Some(&3));
    assert_eq!(counts.by_difficulty.get("Hard"), Some(&0));
}

#[test]
fn categories_and_statistics_are_exposed() {
    let pool = init_seeded_test_db();
    assert_eq!(available_categories(&pool), vec!["Python"]);
    assert_eq!(quiz_statistics(&pool).total_quizzes, 0);
}
