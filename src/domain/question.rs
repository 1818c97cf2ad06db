//! Question entity plus the answer/difficulty enums.

use serde::{Deserialize, Serialize};

/// One of the three answer options a question offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::A, Self::B, Self::C]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Easy" => Some(Self::Easy),
            "Medium" => Some(Self::Medium),
            "Hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Easy, Self::Medium, Self::Hard]
    }
}

/// A stored multiple-choice question. Rows are mutated only through
/// `repo::question::update`, never by editing a loaded value in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub answer: Choice,
    pub category: String,
    pub difficulty: Difficulty,
    pub created_at: String,
    pub updated_at: String,
    pub tags: Vec<String>,
}

impl Question {
    pub fn options(&self) -> [&str; 3] {
        [&self.option_a, &self.option_b, &self.option_c]
    }

    /// Text of the option the answer points at.
    pub fn correct_option(&self) -> &str {
        match self.answer {
            Choice::A => &self.option_a,
            Choice::B => &self.option_b,
            Choice::C => &self.option_c,
        }
    }
}

/// Input form for create/update; id and timestamps are the store's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub answer: Choice,
    pub category: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

/// Tags live in a single comma-delimited TEXT column.
pub(crate) fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

pub(crate) fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_round_trip() {
        for c in Choice::all() {
            assert_eq!(Choice::from_str(c.as_str()), Some(*c));
        }
        assert_eq!(Choice::from_str("D"), None);
    }

    #[test]
    fn difficulty_round_trip() {
        for d in Difficulty::all() {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(*d));
        }
        assert_eq!(Difficulty::from_str("easy"), None);
    }

    #[test]
    fn tags_skip_blanks() {
        assert_eq!(parse_tags("a, b,,  ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags(""), Vec::<String>::new());
        assert_eq!(join_tags(&["x".to_string(), "y".to_string()]), "x,y");
    }

    #[test]
    fn correct_option_follows_answer() {
        let q = Question {
            id: 1,
            prompt: "p".into(),
            option_a: "first".into(),
            option_b: "second".into(),
            option_c: "third".into(),
            answer: Choice::B,
            category: "General".into(),
            difficulty: Difficulty::Medium,
            created_at: String::new(),
            updated_at: String::new(),
            tags: vec![],
        };
        assert_eq!(q.correct_option(), "second");
    }
}
