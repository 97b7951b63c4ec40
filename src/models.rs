use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 20;
pub const DEFAULT_QUESTIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "medium" | "m" => Some(Difficulty::Medium),
            "hard" | "h" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Label for an optional difficulty filter; `None` means any difficulty.
pub fn difficulty_label(difficulty: Option<Difficulty>) -> &'static str {
    difficulty.map(|d| d.label()).unwrap_or("Any")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub category: String,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: usize,
}

impl Question {
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn correct_option(&self) -> &str {
        self.option(self.answer_index).unwrap_or_default()
    }
}

// Category part of the setup filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn from_str(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(trimmed.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Named(name) => name,
        }
    }
}

/// Parameters chosen on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSetup {
    pub category: CategoryFilter,
    pub difficulty: Option<Difficulty>,
    pub count: usize,
}

impl QuizSetup {
    pub fn new(category: CategoryFilter, difficulty: Option<Difficulty>, count: usize) -> Self {
        Self {
            category,
            difficulty,
            count: Self::clamp_count(count),
        }
    }

    pub fn clamp_count(count: usize) -> usize {
        count.clamp(MIN_QUESTIONS, MAX_QUESTIONS)
    }

    /// Reads a question count typed by the user.
    ///
    /// Only the leading integer is considered ("12abc" is 12). Text without
    /// one, or a literal zero, falls back to [`DEFAULT_QUESTIONS`]; anything
    /// else is clamped into `[MIN_QUESTIONS, MAX_QUESTIONS]`.
    pub fn parse_count(raw: &str) -> usize {
        let trimmed = raw.trim_start();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let mut seen_digit = false;
        let mut value: u64 = 0;
        for c in digits.chars() {
            let Some(d) = c.to_digit(10) else { break };
            seen_digit = true;
            value = value.saturating_mul(10).saturating_add(d as u64);
        }

        if !seen_digit || value == 0 {
            return DEFAULT_QUESTIONS;
        }
        if negative {
            return MIN_QUESTIONS;
        }
        usize::try_from(value)
            .map(Self::clamp_count)
            .unwrap_or(MAX_QUESTIONS)
    }
}

impl Default for QuizSetup {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            difficulty: None,
            count: DEFAULT_QUESTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: u32,
    pub selected: Option<usize>,
    pub correct: usize,
    pub time_secs: u64,
}

impl AnswerRecord {
    pub fn for_question(question: &Question) -> Self {
        Self {
            question_id: question.id,
            selected: None,
            correct: question.answer_index,
            time_secs: 0,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.selected == Some(self.correct)
    }
}

// One row of the results table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub number: usize,
    pub prompt: String,
    pub selected: Option<String>,
    pub correct: String,
    pub time_secs: u64,
    pub is_correct: bool,
}

impl DetailRow {
    pub fn selected_label(&self) -> &str {
        self.selected.as_deref().unwrap_or("-")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub seconds: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub category: String,
    pub difficulty: Option<Difficulty>,
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub percent: u32,
    pub total_time_secs: u64,
    pub rows: Vec<DetailRow>,
    pub time_chart: Vec<ChartPoint>,
    pub finished_at: DateTime<Utc>,
}

impl ResultSummary {
    pub fn from_records(
        setup: &QuizSetup,
        questions: &[Question],
        records: &[AnswerRecord],
        finished_at: DateTime<Utc>,
    ) -> Self {
        let mut rows = Vec::with_capacity(records.len());
        let mut time_chart = Vec::with_capacity(records.len());

        for (i, (question, record)) in questions.iter().zip(records).enumerate() {
            rows.push(DetailRow {
                number: i + 1,
                prompt: question.prompt.clone(),
                selected: record
                    .selected
                    .and_then(|idx| question.option(idx))
                    .map(str::to_string),
                correct: question.correct_option().to_string(),
                time_secs: record.time_secs,
                is_correct: record.is_correct(),
            });
            // Chart bars floor at one second
            time_chart.push(ChartPoint {
                label: format!("#{}", i + 1),
                seconds: record.time_secs.max(1),
            });
        }

        let total = rows.len();
        let correct = rows.iter().filter(|r| r.is_correct).count();

        Self {
            category: setup.category.label().to_string(),
            difficulty: setup.difficulty,
            total,
            correct,
            incorrect: total - correct,
            percent: percent(correct, total),
            total_time_secs: records.iter().map(|r| r.time_secs).sum(),
            rows,
            time_chart,
            finished_at,
        }
    }

    pub fn outcome_chart(&self) -> [(&'static str, u64); 2] {
        [
            ("Correct", self.correct as u64),
            ("Incorrect", self.incorrect as u64),
        ]
    }
}

/// `round(100 * correct / total)` with halves rounding up.
pub fn percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as u32
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, answer_index: usize) -> Question {
        Question {
            id,
            category: "General".to_string(),
            difficulty: Difficulty::Easy,
            prompt: format!("Question {}", id),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            answer_index,
        }
    }

    mod difficulty_tests {
        use super::*;

        #[test]
        fn from_str_variants() {
            assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
            assert_eq!(Difficulty::from_str("E"), Some(Difficulty::Easy));
            assert_eq!(Difficulty::from_str(" Medium "), Some(Difficulty::Medium));
            assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
            assert_eq!(Difficulty::from_str(""), None);
            assert_eq!(Difficulty::from_str("extreme"), None);
        }

        #[test]
        fn as_str_matches_serde() {
            for d in Difficulty::ALL {
                let json = serde_json::to_string(&d).unwrap();
                assert_eq!(json, format!("\"{}\"", d.as_str()));
            }
        }

        #[test]
        fn any_label_for_unset_filter() {
            assert_eq!(difficulty_label(None), "Any");
            assert_eq!(difficulty_label(Some(Difficulty::Hard)), "Hard");
        }
    }

    mod category_filter_tests {
        use super::*;

        #[test]
        fn all_matches_everything() {
            assert!(CategoryFilter::All.matches("Science"));
            assert!(CategoryFilter::All.matches(""));
        }

        #[test]
        fn named_matches_exactly() {
            let filter = CategoryFilter::Named("Science".to_string());
            assert!(filter.matches("Science"));
            assert!(!filter.matches("science"));
            assert!(!filter.matches("Math"));
        }

        #[test]
        fn from_str_wildcards() {
            assert_eq!(CategoryFilter::from_str("all"), CategoryFilter::All);
            assert_eq!(CategoryFilter::from_str("ALL"), CategoryFilter::All);
            assert_eq!(CategoryFilter::from_str("  "), CategoryFilter::All);
            assert_eq!(
                CategoryFilter::from_str("History"),
                CategoryFilter::Named("History".to_string())
            );
        }
    }

    mod count_tests {
        use super::*;

        #[test]
        fn parse_count_in_range() {
            assert_eq!(QuizSetup::parse_count("5"), 5);
            assert_eq!(QuizSetup::parse_count("20"), 20);
            assert_eq!(QuizSetup::parse_count(" 12"), 12);
        }

        #[test]
        fn parse_count_clamps() {
            assert_eq!(QuizSetup::parse_count("1"), 3);
            assert_eq!(QuizSetup::parse_count("21"), 20);
            assert_eq!(QuizSetup::parse_count("-4"), 3);
            assert_eq!(QuizSetup::parse_count("99999999999999999999999"), 20);
        }

        #[test]
        fn parse_count_defaults() {
            assert_eq!(QuizSetup::parse_count(""), DEFAULT_QUESTIONS);
            assert_eq!(QuizSetup::parse_count("abc"), DEFAULT_QUESTIONS);
            assert_eq!(QuizSetup::parse_count("0"), DEFAULT_QUESTIONS);
            assert_eq!(QuizSetup::parse_count("-"), DEFAULT_QUESTIONS);
        }

        #[test]
        fn parse_count_leading_integer() {
            assert_eq!(QuizSetup::parse_count("12abc"), 12);
            assert_eq!(QuizSetup::parse_count("4.9"), 4);
        }

        #[test]
        fn new_clamps_count() {
            assert_eq!(QuizSetup::new(CategoryFilter::All, None, 0).count, 3);
            assert_eq!(QuizSetup::new(CategoryFilter::All, None, 50).count, 20);
        }
    }

    mod summary_tests {
        use super::*;

        #[test]
        fn percent_rounding() {
            assert_eq!(percent(3, 4), 75);
            assert_eq!(percent(1, 3), 33);
            assert_eq!(percent(2, 3), 67);
            assert_eq!(percent(1, 8), 13);
            assert_eq!(percent(0, 5), 0);
            assert_eq!(percent(5, 5), 100);
            assert_eq!(percent(0, 0), 0);
        }

        #[test]
        fn from_records_counts_and_rows() {
            let questions = vec![question(1, 2), question(2, 0)];
            let records = vec![
                AnswerRecord {
                    question_id: 1,
                    selected: Some(2),
                    correct: 2,
                    time_secs: 3,
                },
                AnswerRecord {
                    question_id: 2,
                    selected: None,
                    correct: 0,
                    time_secs: 0,
                },
            ];

            let summary = ResultSummary::from_records(
                &QuizSetup::default(),
                &questions,
                &records,
                Utc::now(),
            );

            assert_eq!(summary.total, 2);
            assert_eq!(summary.correct, 1);
            assert_eq!(summary.incorrect, 1);
            assert_eq!(summary.percent, 50);
            assert_eq!(summary.total_time_secs, 3);
            assert_eq!(summary.category, "All");

            assert_eq!(summary.rows[0].selected_label(), "C");
            assert_eq!(summary.rows[0].correct, "C");
            assert!(summary.rows[0].is_correct);
            assert_eq!(summary.rows[1].selected_label(), "-");
            assert_eq!(summary.rows[1].correct, "A");
            assert_eq!(summary.rows[1].time_secs, 0);
        }

        #[test]
        fn chart_floors_at_one_second() {
            let questions = vec![question(1, 0)];
            let records = vec![AnswerRecord::for_question(&questions[0])];
            let summary = ResultSummary::from_records(
                &QuizSetup::default(),
                &questions,
                &records,
                Utc::now(),
            );

            assert_eq!(summary.rows[0].time_secs, 0);
            assert_eq!(
                summary.time_chart,
                vec![ChartPoint {
                    label: "#1".to_string(),
                    seconds: 1
                }]
            );
            assert_eq!(summary.outcome_chart(), [("Correct", 0), ("Incorrect", 1)]);
        }
    }

    mod json_output_tests {
        use super::*;

        #[test]
        fn ok_with_unit() {
            let output = JsonOutput::<()>::ok(());
            assert!(output.success);
            assert_eq!(output.data, Some(()));
            assert!(output.error.is_none());
        }

        #[test]
        fn serializes_err_correctly() {
            let output = JsonOutput::<()>::err("error");
            let json = serde_json::to_string(&output).unwrap();
            assert!(json.contains("\"success\":false"));
            assert!(json.contains("\"data\":null"));
            assert!(json.contains("\"error\":\"error\""));
        }

        #[test]
        fn question_uses_bank_field_names() {
            let json = serde_json::to_string(&question(7, 1)).unwrap();
            assert!(json.contains("\"answerIndex\":1"));
            assert!(json.contains("\"difficulty\":\"easy\""));
        }
    }
}
