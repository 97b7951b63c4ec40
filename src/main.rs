mod bank;
mod clock;
mod error;
mod models;
mod session;
mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;

use bank::QuestionBank;
use models::{difficulty_label, CategoryFilter, Difficulty, JsonOutput, QuizSetup};

const BANK_ENV: &str = "QUICKQUIZ_BANK";
const LOG_ENV: &str = "QUICKQUIZ_LOG";
const DEFAULT_BANK_NAME: &str = "questions.json";
const LOG_FILE_NAME: &str = "quickquiz.log";

#[derive(Parser)]
#[command(name = "quickquiz")]
#[command(about = "A timed multiple-choice quiz runner for the terminal")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Question bank JSON file (defaults to the built-in bank)
    #[arg(long, global = true)]
    bank: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories with question counts
    Categories,

    /// List questions in the bank
    Questions {
        /// Filter by category ("all" for every category)
        #[arg(long, short)]
        category: Option<String>,

        /// Filter by difficulty: easy/medium/hard
        #[arg(long, short)]
        difficulty: Option<String>,
    },

    /// Launch interactive terminal quiz
    Tui {
        /// Preselected category
        #[arg(long, short)]
        category: Option<String>,

        /// Preselected difficulty: easy/medium/hard
        #[arg(long, short)]
        difficulty: Option<String>,

        /// Number of questions (3-20)
        #[arg(long, short = 'n')]
        count: Option<String>,
    },
}

fn get_bank_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    if flag.is_some() {
        return flag;
    }

    if let Ok(path) = std::env::var(BANK_ENV) {
        return Some(PathBuf::from(path));
    }

    let default = dirs::config_dir()?.join("quickquiz").join(DEFAULT_BANK_NAME);
    default.exists().then_some(default)
}

fn load_bank(flag: Option<PathBuf>) -> Result<QuestionBank, Box<dyn std::error::Error>> {
    match get_bank_path(flag) {
        Some(path) => Ok(QuestionBank::load(path)?),
        None => {
            tracing::debug!("using built-in question bank");
            Ok(QuestionBank::builtin())
        }
    }
}

// Logs go to a file: stdout belongs to the terminal UI
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return Ok(());
    };

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quickquiz");
    std::fs::create_dir_all(&log_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn parse_difficulty(raw: Option<&str>) -> Result<Option<Difficulty>, String> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() || s.eq_ignore_ascii_case("any") => Ok(None),
        Some(s) => Difficulty::from_str(s).map(Some).ok_or_else(|| {
            format!(
                "Invalid difficulty '{}'. Use: easy, medium, hard, or any",
                s
            )
        }),
    }
}

fn parse_category(bank: &QuestionBank, raw: Option<&str>) -> Result<CategoryFilter, String> {
    let filter = raw.map(CategoryFilter::from_str).unwrap_or_default();
    match &filter {
        CategoryFilter::Named(name) if !bank.categories().contains(&name.as_str()) => Err(format!(
            "Unknown category '{}'. Available: all, {}",
            name,
            bank.categories().join(", ")
        )),
        _ => Ok(filter),
    }
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            let output = JsonOutput::<()>::err(e.to_string());
            println!("{}", serde_json::to_string(&output).unwrap_or_default());
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let bank = load_bank(cli.bank)?;

    match cli.command {
        Commands::Categories => {
            let counts = bank.counts_by_category();
            if cli.json {
                let data: Vec<_> = counts
                    .iter()
                    .map(|(name, count)| serde_json::json!({ "name": name, "questions": count }))
                    .collect();
                println!("{}", serde_json::to_string(&JsonOutput::ok(data))?);
            } else {
                println!("{:<20} QUESTIONS", "CATEGORY");
                println!("{}", "-".repeat(32));
                for (name, count) in counts {
                    println!("{:<20} {}", truncate(name, 18), count);
                }
            }
        }

        Commands::Questions {
            category,
            difficulty,
        } => {
            let category = parse_category(&bank, category.as_deref())?;
            let difficulty = parse_difficulty(difficulty.as_deref())?;
            let questions = bank.filter(&category, difficulty);

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&questions))?);
            } else if questions.is_empty() {
                println!("No questions match selection.");
            } else {
                println!("{:<5} {:<12} {:<8} PROMPT", "ID", "CATEGORY", "LEVEL");
                println!("{}", "-".repeat(70));
                for q in questions {
                    println!(
                        "{:<5} {:<12} {:<8} {}",
                        q.id,
                        truncate(&q.category, 10),
                        q.difficulty.as_str(),
                        truncate(&q.prompt, 44)
                    );
                }
            }
        }

        Commands::Tui {
            category,
            difficulty,
            count,
        } => {
            let preset = QuizSetup::new(
                parse_category(&bank, category.as_deref())?,
                parse_difficulty(difficulty.as_deref())?,
                count
                    .as_deref()
                    .map_or(models::DEFAULT_QUESTIONS, QuizSetup::parse_count),
            );
            tracing::debug!(
                category = preset.category.label(),
                difficulty = difficulty_label(preset.difficulty),
                count = preset.count,
                "launching tui"
            );
            tui::run(bank, preset)?;
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    mod truncate_tests {
        use super::*;

        #[test]
        fn truncate_short_string() {
            assert_eq!(truncate("hello", 10), "hello");
        }

        #[test]
        fn truncate_exact_length() {
            assert_eq!(truncate("hello", 5), "hello");
        }

        #[test]
        fn truncate_long_string() {
            assert_eq!(truncate("hello world", 8), "hello...");
        }

        #[test]
        fn truncate_empty_string() {
            assert_eq!(truncate("", 10), "");
        }

        #[test]
        fn truncate_multibyte() {
            assert_eq!(truncate("Water freezes at °C", 18), "Water freezes a...");
            assert_eq!(truncate("°C°C", 4), "°C°C");
        }

        #[test]
        fn truncate_tiny_width() {
            assert_eq!(truncate("hello", 2), "...");
        }
    }

    mod cli_parsing_tests {
        use super::*;

        #[test]
        fn parse_categories_command() {
            let cli = Cli::try_parse_from(["quickquiz", "categories"]).unwrap();
            assert!(!cli.json);
            assert!(cli.bank.is_none());
            assert!(matches!(cli.command, Commands::Categories));
        }

        #[test]
        fn parse_questions_with_filters() {
            let cli = Cli::try_parse_from([
                "quickquiz",
                "questions",
                "--category",
                "Science",
                "-d",
                "hard",
            ])
            .unwrap();
            match cli.command {
                Commands::Questions {
                    category,
                    difficulty,
                } => {
                    assert_eq!(category, Some("Science".to_string()));
                    assert_eq!(difficulty, Some("hard".to_string()));
                }
                _ => panic!("Expected Questions command"),
            }
        }

        #[test]
        fn parse_tui_with_presets() {
            let cli = Cli::try_parse_from([
                "quickquiz",
                "tui",
                "-c",
                "Math",
                "--difficulty",
                "easy",
                "-n",
                "12",
            ])
            .unwrap();
            match cli.command {
                Commands::Tui {
                    category,
                    difficulty,
                    count,
                } => {
                    assert_eq!(category, Some("Math".to_string()));
                    assert_eq!(difficulty, Some("easy".to_string()));
                    assert_eq!(count, Some("12".to_string()));
                }
                _ => panic!("Expected Tui command"),
            }
        }

        #[test]
        fn parse_tui_bare() {
            let cli = Cli::try_parse_from(["quickquiz", "tui"]).unwrap();
            match cli.command {
                Commands::Tui {
                    category,
                    difficulty,
                    count,
                } => {
                    assert!(category.is_none());
                    assert!(difficulty.is_none());
                    assert!(count.is_none());
                }
                _ => panic!("Expected Tui command"),
            }
        }

        #[test]
        fn parse_global_flags_any_position() {
            let cli = Cli::try_parse_from(["quickquiz", "--json", "categories"]).unwrap();
            assert!(cli.json);

            let cli =
                Cli::try_parse_from(["quickquiz", "questions", "--bank", "/tmp/q.json"]).unwrap();
            assert_eq!(cli.bank, Some(PathBuf::from("/tmp/q.json")));
        }

        #[test]
        fn parse_invalid_command_fails() {
            assert!(Cli::try_parse_from(["quickquiz", "invalid"]).is_err());
            assert!(Cli::try_parse_from(["quickquiz"]).is_err());
        }
    }

    mod filter_arg_tests {
        use super::*;

        #[test]
        fn difficulty_any_or_missing() {
            assert_eq!(parse_difficulty(None), Ok(None));
            assert_eq!(parse_difficulty(Some("any")), Ok(None));
            assert_eq!(parse_difficulty(Some("")), Ok(None));
        }

        #[test]
        fn difficulty_valid_and_invalid() {
            assert_eq!(parse_difficulty(Some("Hard")), Ok(Some(Difficulty::Hard)));
            assert!(parse_difficulty(Some("brutal"))
                .unwrap_err()
                .contains("Invalid difficulty"));
        }

        #[test]
        fn category_known_unknown_and_wildcard() {
            let bank = QuestionBank::builtin();
            assert_eq!(parse_category(&bank, None), Ok(CategoryFilter::All));
            assert_eq!(parse_category(&bank, Some("all")), Ok(CategoryFilter::All));
            assert_eq!(
                parse_category(&bank, Some("Math")),
                Ok(CategoryFilter::Named("Math".to_string()))
            );
            let err = parse_category(&bank, Some("Art")).unwrap_err();
            assert!(err.contains("Unknown category 'Art'"));
            assert!(err.contains("General, Science, Math, History"));
        }
    }

    mod bank_path_tests {
        use super::*;

        #[test]
        fn flag_wins() {
            let path = get_bank_path(Some(PathBuf::from("/tmp/flag.json")));
            assert_eq!(path, Some(PathBuf::from("/tmp/flag.json")));
        }

        #[test]
        fn env_var_then_default() {
            std::env::set_var(BANK_ENV, "/tmp/env_bank.json");
            assert_eq!(get_bank_path(None), Some(PathBuf::from("/tmp/env_bank.json")));
            std::env::remove_var(BANK_ENV);

            // Without a flag or env var only an existing default file is used
            if let Some(path) = get_bank_path(None) {
                assert!(path.ends_with("quickquiz/questions.json"));
                assert!(path.exists());
            }
        }

        #[test]
        fn load_bank_reports_missing_file() {
            let result = load_bank(Some(PathBuf::from("/definitely/missing/bank.json")));
            assert!(result.is_err());
        }
    }
}
