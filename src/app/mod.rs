//! Application use cases: the boundary the presentation layer calls.

mod admin;
mod maintenance;
mod quiz;
mod validate;

pub use admin::{
    authenticate_admin, create_question, dashboard_stats, delete_question, delete_questions,
    duplicate_question, get_categories, list_questions, search_questions, update_question,
    ActionOutcome, BulkDeleteOutcome, DashboardStats, QuestionInput, QuestionPage,
    QuestionWriteOutcome,
};
pub use maintenance::{
    migration_report, migration_status, reset_database, run_migrations, MaintenanceOutcome,
};
pub use quiz::{
    available_categories, complete_session, latest_score, question_counts, quiz_questions,
    quiz_statistics, start_session, validate_settings, LatestScore, QuestionCounts,
    MAX_QUIZ_QUESTIONS,
};
pub use validate::{clean_search_term, sanitize, validate_credentials, validate_question};
