//! Pure domain types and the quiz session state machine.

mod question;
mod result;
mod session;
mod user;

pub use question::{Choice, Difficulty, NewQuestion, Question};
pub(crate) use question::{join_tags, parse_tags};
pub use result::{grade_for, join_ids, parse_ids, NewQuizResult, QuizResult};
pub use session::{QuizSession, ScoreReport, SessionState};
pub use user::{NewUser, Role, User};
