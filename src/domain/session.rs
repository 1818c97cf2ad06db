//! Quiz session state machine: navigation, countdown, scoring.

use crate::config::QuizConfig;
use crate::domain::result::grade_for;
use crate::domain::{Choice, Question};
use crate::error::AppError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    InProgress,
    /// Time ran out with auto-submit off: navigation is frozen, nothing is
    /// scored or persisted.
    Expired,
    Completed,
}

/// One quiz attempt over a fixed, pre-selected question list with a single
/// shared time budget. The hosting layer drives `tick()` once per elapsed
/// second (see `infra::timer`). Abandoning the session is just dropping it.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<Question>,
    answers: Vec<Option<Choice>>,
    index: usize,
    state: SessionState,
    remaining_secs: u32,
    total_time_secs: u32,
    auto_submit: bool,
    report_taken: bool,
}

/// Scoring summary produced once per completed session.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub grade: &'static str,
    /// Seconds spent, i.e. budget minus what was left on the clock.
    pub time_taken: i64,
    pub avg_time_per_question: i64,
    pub correct_results: Vec<bool>,
    pub user_answers: Vec<Option<Choice>>,
    pub question_ids: Vec<i64>,
}

impl QuizSession {
    /// Config is read once here and stays fixed for the session's lifetime.
    pub fn new(questions: Vec<Question>, config: &QuizConfig) -> Result<Self, AppError> {
        if questions.is_empty() {
            return Err(AppError::Validation("quiz has no questions".into()));
        }
        let n = questions.len();
        Ok(Self {
            questions,
            answers: vec![None; n],
            index: 0,
            state: SessionState::InProgress,
            remaining_secs: config.total_quiz_time,
            total_time_secs: config.total_quiz_time,
            auto_submit: config.auto_submit,
            report_taken: false,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    pub fn current_answer(&self) -> Option<Choice> {
        self.answers[self.index]
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn time_taken_secs(&self) -> u32 {
        self.total_time_secs - self.remaining_secs
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    fn ensure_in_progress(&self) -> Result<(), AppError> {
        match self.state {
            SessionState::InProgress => Ok(()),
            SessionState::Expired => Err(AppError::Validation("time is up".into())),
            SessionState::Completed => {
                Err(AppError::Validation("quiz already submitted".into()))
            }
        }
    }

    /// Record (or overwrite) the answer for the current question.
    pub fn answer(&mut self, choice: Choice) -> Result<(), AppError> {
        self.ensure_in_progress()?;
        self.answers[self.index] = Some(choice);
        Ok(())
    }

    /// Advance one question; on the last question this completes the session.
    pub fn next(&mut self) -> Result<(), AppError> {
        self.ensure_in_progress()?;
        if self.index == self.questions.len() - 1 {
            self.state = SessionState::Completed;
        } else {
            self.index += 1;
        }
        Ok(())
    }

    pub fn previous(&mut self) -> Result<(), AppError> {
        self.ensure_in_progress()?;
        if self.index == 0 {
            return Err(AppError::Validation("already at the first question".into()));
        }
        self.index -= 1;
        Ok(())
    }

    /// One countdown step. At zero the session either force-submits with
    /// whatever answers are recorded, or freezes. Ticks arriving after a
    /// terminal state (a late timer message) are inert.
    pub fn tick(&mut self) -> SessionState {
        if self.state == SessionState::InProgress {
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                self.state = if self.auto_submit {
                    SessionState::Completed
                } else {
                    SessionState::Expired
                };
            }
        }
        self.state
    }

    /// Scoring summary for a completed session, recomputable until
    /// `mark_reported` claims it. Callers store the result first and mark
    /// afterwards, so a failed write leaves the report claimable for a retry.
    pub fn report(&self) -> Option<ScoreReport> {
        if self.state != SessionState::Completed || self.report_taken {
            return None;
        }

        let correct_results: Vec<bool> = self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(q, a)| *a == Some(q.answer))
            .collect();
        let score = correct_results.iter().filter(|c| **c).count() as i64;
        let total = self.questions.len() as i64;
        let percentage = score as f64 / total as f64 * 100.0;
        let time_taken = self.time_taken_secs() as i64;

        Some(ScoreReport {
            score,
            total_questions: total,
            percentage,
            grade: grade_for(percentage),
            time_taken,
            avg_time_per_question: time_taken / total,
            correct_results,
            user_answers: self.answers.clone(),
            question_ids: self.questions.iter().map(|q| q.id).collect(),
        })
    }

    /// Claim the report once its result is safely stored; `report()` returns
    /// `None` from here on, so at most one result is persisted per attempt.
    pub fn mark_reported(&mut self) {
        self.report_taken = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;

    fn question(id: i64, answer: Choice) -> Question {
        Question {
            id,
            prompt: format!("question {}", id),
            option_a: "a".into(),
            option_b: "b".into(),
            option_c: "c".into(),
            answer,
            category: "General".into(),
            difficulty: Difficulty::Medium,
            created_at: String::new(),
            updated_at: String::new(),
            tags: vec![],
        }
    }

    fn config(total: u32, auto_submit: bool) -> QuizConfig {
        QuizConfig {
            total_quiz_time: total,
            auto_submit,
            ..QuizConfig::default()
        }
    }

    #[test]
    fn empty_question_list_rejected() {
        let err = QuizSession::new(vec![], &config(60, true)).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn scoring_counts_matches_only() {
        let questions = vec![
            question(1, Choice::A),
            question(2, Choice::C),
            question(3, Choice::B),
        ];
        let mut s = QuizSession::new(questions, &config(60, true)).unwrap();
        s.answer(Choice::A).unwrap();
        s.next().unwrap();
        s.answer(Choice::B).unwrap();
        s.next().unwrap();
        s.answer(Choice::B).unwrap();
        s.next().unwrap();

        assert_eq!(s.state(), SessionState::Completed);
        let report = s.report().unwrap();
        assert_eq!(report.score, 2);
        assert_eq!(report.correct_results, vec![true, false, true]);
        assert!((report.percentage - 66.7).abs() < 0.1);
        assert_eq!(report.grade, "D");
    }

    #[test]
    fn navigation_is_bidirectional_and_answers_stick() {
        let questions = vec![question(1, Choice::A), question(2, Choice::B)];
        let mut s = QuizSession::new(questions, &config(60, true)).unwrap();
        s.answer(Choice::C).unwrap();
        s.next().unwrap();
        s.previous().unwrap();
        assert_eq!(s.current_answer(), Some(Choice::C));
        assert!(s.previous().is_err());
    }

    #[test]
    fn tick_expires_without_auto_submit() {
        let mut s =
            QuizSession::new(vec![question(1, Choice::A)], &config(2, false)).unwrap();
        assert_eq!(s.tick(), SessionState::InProgress);
        assert_eq!(s.tick(), SessionState::Expired);
        assert!(s.answer(Choice::A).is_err());
        assert!(s.next().is_err());
        assert!(s.report().is_none());
        // late ticks change nothing
        assert_eq!(s.tick(), SessionState::Expired);
    }

    #[test]
    fn tick_auto_submits_blank_answers() {
        let questions = vec![question(1, Choice::A), question(2, Choice::B)];
        let mut s = QuizSession::new(questions, &config(5, true)).unwrap();
        for _ in 0..5 {
            s.tick();
        }
        assert_eq!(s.state(), SessionState::Completed);
        let report = s.report().unwrap();
        assert_eq!(report.score, 0);
        assert_eq!(report.time_taken, 5);
        assert_eq!(report.user_answers, vec![None, None]);
    }

    #[test]
    fn report_stays_claimable_until_marked() {
        let mut s =
            QuizSession::new(vec![question(1, Choice::A)], &config(60, true)).unwrap();
        assert!(s.report().is_none());
        s.next().unwrap();
        // recomputable until the caller claims it
        assert!(s.report().is_some());
        assert!(s.report().is_some());
        s.mark_reported();
        assert!(s.report().is_none());
    }
}
