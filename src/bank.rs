use std::collections::HashSet;
use std::path::Path;

use crate::error::BankError;
use crate::models::{CategoryFilter, Difficulty, Question};

pub const OPTIONS_PER_QUESTION: usize = 4;

/// Immutable, validated set of questions a quiz draws from.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        validate(&questions)?;
        Ok(Self { questions })
    }

    pub fn builtin() -> Self {
        Self {
            questions: builtin_questions(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let bank = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            questions = bank.len(),
            "loaded question bank"
        );
        Ok(bank)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    // Distinct categories, first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.questions()
            .iter()
            .map(|q| q.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    pub fn counts_by_category(&self) -> Vec<(&str, usize)> {
        self.categories()
            .into_iter()
            .map(|c| (c, self.questions.iter().filter(|q| q.category == c).count()))
            .collect()
    }

    /// Questions matching both filters, in bank order.
    pub fn filter(
        &self,
        category: &CategoryFilter,
        difficulty: Option<Difficulty>,
    ) -> Vec<&Question> {
        self.questions()
            .iter()
            .filter(|q| category.matches(&q.category))
            .filter(|q| difficulty.map_or(true, |d| q.difficulty == d))
            .collect()
    }
}

fn validate(questions: &[Question]) -> Result<(), BankError> {
    if questions.is_empty() {
        return Err(BankError::Empty);
    }

    let mut ids = HashSet::new();
    for q in questions {
        if !ids.insert(q.id) {
            return Err(BankError::DuplicateId(q.id));
        }
        if q.category.trim().is_empty() {
            return Err(BankError::Blank {
                id: q.id,
                field: "category",
            });
        }
        if q.prompt.trim().is_empty() {
            return Err(BankError::Blank {
                id: q.id,
                field: "prompt",
            });
        }
        if q.options.len() != OPTIONS_PER_QUESTION {
            return Err(BankError::OptionCount {
                id: q.id,
                found: q.options.len(),
                expected: OPTIONS_PER_QUESTION,
            });
        }
        if q.answer_index >= OPTIONS_PER_QUESTION {
            return Err(BankError::AnswerOutOfRange {
                id: q.id,
                index: q.answer_index,
            });
        }
    }
    Ok(())
}

fn q(
    id: u32,
    category: &str,
    difficulty: Difficulty,
    prompt: &str,
    options: [&str; OPTIONS_PER_QUESTION],
    answer_index: usize,
) -> Question {
    Question {
        id,
        category: category.to_string(),
        difficulty,
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer_index,
    }
}

#[rustfmt::skip]
fn builtin_questions() -> Vec<Question> {
    use Difficulty::*;

    vec![
        q(1, "General", Easy, "What is the capital of France?", ["Berlin", "Madrid", "Paris", "Lisbon"], 2),
        q(2, "Science", Medium, "What planet is known as the Red Planet?", ["Earth", "Mars", "Jupiter", "Venus"], 1),
        q(3, "Math", Hard, "What is the derivative of sin(x)?", ["cos(x)", "-cos(x)", "sin(x)", "-sin(x)"], 0),
        q(4, "Science", Easy, "Water freezes at what temperature (°C)?", ["0", "100", "-1", "32"], 0),
        q(5, "General", Medium, "Which language runs in a web browser?", ["Python", "C++", "JavaScript", "Java"], 2),
        q(6, "Math", Medium, "What is 12 * 8?", ["96", "86", "108", "92"], 0),
        q(7, "History", Hard, "Who was the first emperor of Rome?", ["Julius Caesar", "Augustus", "Nero", "Tiberius"], 1),
        q(8, "General", Easy, "Which color is a mix of red and white?", ["Pink", "Purple", "Orange", "Brown"], 0),
        q(9, "Science", Hard, "What is the chemical symbol for Gold?", ["Au", "Ag", "Gd", "Go"], 0),
        q(10, "History", Medium, "In which year did World War II end?", ["1945", "1939", "1918", "1963"], 0),
    ]
}
