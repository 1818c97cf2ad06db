//! Quiz result repository integration tests

use quizdesk::domain::NewQuizResult;
use quizdesk::infra::db::{init_seeded_test_db, init_test_db, DbPool};
use quizdesk::repo::result;

// ──────────────────────── Helper ────────────────────────

fn save(pool: &DbPool, user_id: Option<i64>, score: i64, total: i64) -> i64 {
    result::create(
        pool,
        &NewQuizResult {
            user_id,
            score,
            total_questions: total,
            time_taken: 42,
            questions_attempted: vec![1, 2, 3],
        },
    )
    .unwrap()
}

// ══════════════════════════════════════════════════════════
//  create / fetch
// ══════════════════════════════════════════════════════════

#[test]
fn create_then_latest_round_trips() {
    let pool = init_test_db();
    let id = save(&pool, None, 4, 5);

    let latest = result::get_latest_result(&pool, None).unwrap();
    assert_eq!(latest.id, id);
    assert_eq!(latest.score, 4);
    assert_eq!(latest.total_questions, 5);
    assert_eq!(latest.time_taken, 42);
    assert_eq!(latest.questions_attempted, vec![1, 2, 3]);
    assert!(!latest.completed_at.is_empty());
    assert_eq!(latest.percentage(), 80.0);
    assert_eq!(latest.grade(), "B");
}

#[test]
fn anonymous_results_are_allowed() {
    let pool = init_test_db();
    save(&pool, None, 1, 5);
    let latest = result::get_latest_result(&pool, None).unwrap();
    assert_eq!(latest.user_id, None);
}

#[test]
fn user_results_are_scoped_and_newest_first() {
    let pool = init_seeded_test_db();
    let admin_id = quizdesk::repo::user::get_by_username(&pool, "admin").unwrap().id;

    let first = save(&pool, Some(admin_id), 2, 5);
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = save(&pool, Some(admin_id), 5, 5);
    save(&pool, None, 1, 5);

    let mine = result::get_user_results(&pool, admin_id, 10);
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id, second);
    assert_eq!(mine[1].id, first);

    let limited = result::get_user_results(&pool, admin_id, 1);
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, second);

    // per-user latest vs global latest
    assert_eq!(result::get_latest_result(&pool, Some(admin_id)).unwrap().id, second);
    assert_eq!(result::get_latest_result(&pool, None).unwrap().user_id, None);
}

#[test]
fn empty_store_has_no_latest() {
    let pool = init_test_db();
    assert!(result::get_latest_result(&pool, None).is_none());
    assert!(result::get_user_results(&pool, 1, 10).is_empty());
}

// ══════════════════════════════════════════════════════════
//  statistics
// ══════════════════════════════════════════════════════════

#[test]
fn statistics_default_to_zero() {
    let pool = init_test_db();
    let stats = result::get_statistics(&pool);
    assert_eq!(stats.total_quizzes, 0);
    assert_eq!(stats.average_score, 0.0);
    assert_eq!(stats.best_score, 0.0);
}

#[test]
fn statistics_aggregate_percentages() {
    let pool = init_test_db();
    save(&pool, None, 5, 5); // 100%
    save(&pool, None, 2, 5); // 40%
    save(&pool, None, 3, 5); // 60%

    let stats = result::get_statistics(&pool);
    assert_eq!(stats.total_quizzes, 3);
    assert_eq!(stats.best_score, 100.0);
    assert!((stats.average_score - 66.67).abs() < 0.01);
}
