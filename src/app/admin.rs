//! Administration use cases: question management, dashboard figures, admin
//! sign-in. Write operations report success/failure as outcome values rather
//! than errors so the caller can surface the message verbatim.

use crate::app::validate::{clean_search_term, sanitize, validate_credentials, validate_question};
use crate::domain::{Choice, Difficulty, NewQuestion, Question, User};
use crate::error::AppError;
use crate::infra::db::DbPool;
use crate::repo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw question form data as the presentation layer collects it. Fields are
/// sanitized and validated here before anything is persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionWriteOutcome {
    pub success: bool,
    pub message: String,
    pub question_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteOutcome {
    pub success: bool,
    pub message: String,
    pub deleted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_questions: i64,
    pub total_categories: i64,
    pub total_quizzes: i64,
    pub average_score: f64,
    pub best_score: f64,
    pub by_category: BTreeMap<String, i64>,
    pub by_difficulty: BTreeMap<String, i64>,
}

fn to_new_question(input: &QuestionInput) -> Result<NewQuestion, AppError> {
    let prompt = sanitize(&input.prompt);
    let options: Vec<String> = input.options.iter().map(|o| sanitize(o)).collect();
    let category = input
        .category
        .as_deref()
        .map(sanitize)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "General".to_string());

    validate_question(&prompt, &options, &input.answer, &category)?;

    // validate_question guarantees exactly three options and an A/B/C answer
    let answer = Choice::from_str(&input.answer)
        .ok_or_else(|| AppError::Validation("answer must be A, B or C".into()))?;
    let difficulty = match input.difficulty.as_deref() {
        None | Some("") => Difficulty::Medium,
        Some(raw) => Difficulty::from_str(raw).ok_or_else(|| {
            AppError::Validation("difficulty must be Easy, Medium or Hard".into())
        })?,
    };
    let tags = input
        .tags
        .clone()
        .unwrap_or_default()
        .iter()
        .map(|t| sanitize(t))
        .filter(|t| !t.is_empty())
        .collect();

    Ok(NewQuestion {
        prompt,
        option_a: options[0].clone(),
        option_b: options[1].clone(),
        option_c: options[2].clone(),
        answer,
        category,
        difficulty,
        tags,
    })
}

pub fn create_question(pool: &DbPool, input: &QuestionInput) -> QuestionWriteOutcome {
    let q = match to_new_question(input) {
        Ok(q) => q,
        Err(e) => {
            return QuestionWriteOutcome {
                success: false,
                message: e.to_string(),
                question_id: None,
            }
        }
    };
    match repo::question::create(pool, &q) {
        Ok(id) => QuestionWriteOutcome {
            success: true,
            message: "Question added successfully.".into(),
            question_id: Some(id),
        },
        Err(e) => QuestionWriteOutcome {
            success: false,
            message: e.to_string(),
            question_id: None,
        },
    }
}

pub fn update_question(pool: &DbPool, id: i64, input: &QuestionInput) -> QuestionWriteOutcome {
    let q = match to_new_question(input) {
        Ok(q) => q,
        Err(e) => {
            return QuestionWriteOutcome {
                success: false,
                message: e.to_string(),
                question_id: None,
            }
        }
    };
    if repo::question::update(pool, id, &q) {
        QuestionWriteOutcome {
            success: true,
            message: "Question updated successfully.".into(),
            question_id: Some(id),
        }
    } else {
        QuestionWriteOutcome {
            success: false,
            message: "Question not found.".into(),
            question_id: None,
        }
    }
}

pub fn delete_question(pool: &DbPool, id: i64) -> ActionOutcome {
    if repo::question::delete(pool, id) {
        ActionOutcome {
            success: true,
            message: "Question deleted successfully.".into(),
        }
    } else {
        ActionOutcome {
            success: false,
            message: "Question not found.".into(),
        }
    }
}

/// Delete many questions; missing ids do not stop the rest.
pub fn delete_questions(pool: &DbPool, ids: &[i64]) -> BulkDeleteOutcome {
    let mut deleted = 0usize;
    let mut failed: Vec<i64> = Vec::new();
    for &id in ids {
        if repo::question::delete(pool, id) {
            deleted += 1;
        } else {
            failed.push(id);
        }
    }
    if failed.is_empty() {
        BulkDeleteOutcome {
            success: true,
            message: format!("Deleted {} questions.", deleted),
            deleted,
        }
    } else {
        BulkDeleteOutcome {
            success: false,
            message: format!(
                "Deleted {} questions; {} not found: {:?}.",
                deleted,
                failed.len(),
                failed
            ),
            deleted,
        }
    }
}

/// Insert a copy of an existing question with a marked prompt.
pub fn duplicate_question(pool: &DbPool, id: i64) -> QuestionWriteOutcome {
    let original = match repo::question::get_by_id(pool, id) {
        Some(q) => q,
        None => {
            return QuestionWriteOutcome {
                success: false,
                message: "Question not found.".into(),
                question_id: None,
            }
        }
    };
    let copy = NewQuestion {
        prompt: format!("[Copy] {}", original.prompt),
        option_a: original.option_a,
        option_b: original.option_b,
        option_c: original.option_c,
        answer: original.answer,
        category: original.category,
        difficulty: original.difficulty,
        tags: original.tags,
    };
    match repo::question::create(pool, &copy) {
        Ok(new_id) => QuestionWriteOutcome {
            success: true,
            message: "Question duplicated successfully.".into(),
            question_id: Some(new_id),
        },
        Err(e) => QuestionWriteOutcome {
            success: false,
            message: e.to_string(),
            question_id: None,
        },
    }
}

/// Newest-first page of questions. Pages are 1-based; out-of-range pages
/// return an empty list, not an error.
pub fn list_questions(pool: &DbPool, page: i64, per_page: i64) -> QuestionPage {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_count = repo::question::get_count(pool);
    let total_pages = ((total_count + per_page - 1) / per_page).max(1);
    let offset = (page - 1) * per_page;
    QuestionPage {
        questions: repo::question::get_all(pool, Some(per_page), offset),
        current_page: page,
        total_pages,
        total_count,
        per_page,
    }
}

pub fn search_questions(
    pool: &DbPool,
    term: &str,
    category: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Vec<Question> {
    let term = clean_search_term(term);
    repo::question::search(pool, &term, category, difficulty)
}

pub fn get_categories(pool: &DbPool) -> Vec<String> {
    repo::question::get_categories(pool)
}

/// Aggregate figures for the admin dashboard.
pub fn dashboard_stats(pool: &DbPool) -> DashboardStats {
    let categories = repo::question::get_categories(pool);
    let mut by_category = BTreeMap::new();
    for category in &categories {
        let count = repo::question::search(pool, "", Some(category), None).len() as i64;
        by_category.insert(category.clone(), count);
    }
    let mut by_difficulty = BTreeMap::new();
    for d in Difficulty::all() {
        let count = repo::question::search(pool, "", None, Some(*d)).len() as i64;
        by_difficulty.insert(d.as_str().to_string(), count);
    }
    let quiz_stats = repo::result::get_statistics(pool);
    DashboardStats {
        total_questions: repo::question::get_count(pool),
        total_categories: categories.len() as i64,
        total_quizzes: quiz_stats.total_quizzes,
        average_score: quiz_stats.average_score,
        best_score: quiz_stats.best_score,
        by_category,
        by_difficulty,
    }
}

/// Credential check for the admin area. Regular users authenticate but are
/// turned away here.
pub fn authenticate_admin(
    pool: &DbPool,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    validate_credentials(username, password)?;
    let user = repo::user::authenticate(pool, username, password)
        .ok_or_else(|| AppError::Validation("Invalid username or password.".into()))?;
    if !user.is_admin() {
        log::warn!("non-admin {} attempted admin sign-in", username);
        return Err(AppError::Validation("Admin access required.".into()));
    }
    Ok(user)
}
