//! Sample data for a fresh store: starter questions and the admin account.

use crate::domain::{Choice, Difficulty, NewQuestion, NewUser, Role};
use crate::error::AppError;
use crate::infra::db::DbPool;
use crate::repo;

/// Idempotent: questions are only inserted into an empty table, the admin
/// user only when absent.
pub fn insert_sample_data(pool: &DbPool) -> Result<(), AppError> {
    if repo::question::get_count(pool) == 0 {
        for q in sample_questions() {
            repo::question::create(pool, &q)?;
        }
        log::info!("seeded sample questions");
    }

    if repo::user::get_by_username(pool, "admin").is_none() {
        repo::user::create(
            pool,
            &NewUser {
                username: "admin".to_string(),
                password: "admin123".to_string(),
                role: Role::Admin,
                is_active: true,
            },
        )?;
        log::info!("seeded admin user");
    }

    Ok(())
}

fn sample_questions() -> Vec<NewQuestion> {
    let q = |prompt: &str, a: &str, b: &str, c: &str, answer, difficulty, tags: &str| NewQuestion {
        prompt: prompt.to_string(),
        option_a: a.to_string(),
        option_b: b.to_string(),
        option_c: c.to_string(),
        answer,
        category: "Python".to_string(),
        difficulty,
        tags: tags.split(',').map(|t| t.to_string()).collect(),
    };

    vec![
        q(
            "In which year was Python first released?",
            "A. 1989",
            "B. 1991",
            "C. 1995",
            Choice::B,
            Difficulty::Easy,
            "python,history",
        ),
        q(
            "Who created the Python language?",
            "A. Guido van Rossum",
            "B. Bill Gates",
            "C. Linus Torvalds",
            Choice::A,
            Difficulty::Easy,
            "python,creator",
        ),
        q(
            "Which library is commonly used for array computing in Python?",
            "A. Pandas",
            "B. NumPy",
            "C. Matplotlib",
            Choice::B,
            Difficulty::Medium,
            "python,libraries",
        ),
        q(
            "Which method adds an element to the end of a list?",
            "A. append()",
            "B. insert()",
            "C. extend()",
            Choice::A,
            Difficulty::Easy,
            "python,list",
        ),
        q(
            "Which keyword defines a function in Python?",
            "A. function",
            "B. def",
            "C. func",
            Choice::B,
            Difficulty::Easy,
            "python,syntax",
        ),
        q(
            "Which Python data structure is ordered and mutable?",
            "A. tuple",
            "B. set",
            "C. list",
            Choice::C,
            Difficulty::Medium,
            "python,data-structures",
        ),
        q(
            "Which method converts a string to upper case?",
            "A. upper()",
            "B. capitalize()",
            "C. title()",
            Choice::A,
            Difficulty::Easy,
            "python,string",
        ),
        q(
            "Which keyword starts an exception handler in Python?",
            "A. catch",
            "B. except",
            "C. handle",
            Choice::B,
            Difficulty::Medium,
            "python,exception",
        ),
    ]
}
