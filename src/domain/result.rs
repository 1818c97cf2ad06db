//! Quiz result entity and derived scoring metrics.

use serde::{Deserialize, Serialize};

/// Letter grade for a percentage score.
pub fn grade_for(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A"
    } else if percentage >= 80.0 {
        "B"
    } else if percentage >= 70.0 {
        "C"
    } else if percentage >= 60.0 {
        "D"
    } else {
        "F"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    /// None for anonymous attempts.
    pub user_id: Option<i64>,
    pub score: i64,
    pub total_questions: i64,
    /// Seconds.
    pub time_taken: i64,
    pub completed_at: String,
    pub questions_attempted: Vec<i64>,
}

impl QuizResult {
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.score as f64 / self.total_questions as f64 * 100.0
    }

    pub fn grade(&self) -> &'static str {
        grade_for(self.percentage())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuizResult {
    pub user_id: Option<i64>,
    pub score: i64,
    pub total_questions: i64,
    pub time_taken: i64,
    pub questions_attempted: Vec<i64>,
}

/// Attempted question ids live in a single comma-delimited TEXT column.
pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn parse_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<i64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_thresholds() {
        assert_eq!(grade_for(95.0), "A");
        assert_eq!(grade_for(90.0), "A");
        assert_eq!(grade_for(89.9), "B");
        assert_eq!(grade_for(70.0), "C");
        assert_eq!(grade_for(66.7), "D");
        assert_eq!(grade_for(59.9), "F");
        assert_eq!(grade_for(0.0), "F");
    }

    #[test]
    fn percentage_handles_empty_quiz() {
        let r = QuizResult {
            id: 1,
            user_id: None,
            score: 0,
            total_questions: 0,
            time_taken: 0,
            completed_at: String::new(),
            questions_attempted: vec![],
        };
        assert_eq!(r.percentage(), 0.0);
        assert_eq!(r.grade(), "F");
    }

    #[test]
    fn id_list_round_trip() {
        assert_eq!(parse_ids("1,2,3"), vec![1, 2, 3]);
        assert_eq!(parse_ids(""), Vec::<i64>::new());
        assert_eq!(parse_ids("4, x, 6"), vec![4, 6]);
        assert_eq!(join_ids(&[7, 8]), "7,8");
    }
}
