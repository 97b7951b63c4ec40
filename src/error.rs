use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("No questions match selection (category: {category}, difficulty: {difficulty}).")]
    EmptyPool {
        category: String,
        difficulty: String,
    },

    #[error("cannot do that while {actual} (expected {expected})")]
    WrongPhase {
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid question bank JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank is empty")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateId(u32),

    #[error("question {id} has {found} options, expected {expected}")]
    OptionCount {
        id: u32,
        found: usize,
        expected: usize,
    },

    #[error("question {id} answer index {index} is out of range")]
    AnswerOutOfRange { id: u32, index: usize },

    #[error("question {id} has a blank {field}")]
    Blank { id: u32, field: &'static str },
}
