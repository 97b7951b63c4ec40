mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::bank::QuestionBank;
use crate::clock::{Clock, SystemClock};
use crate::models::{CategoryFilter, Difficulty, QuizSetup};
use crate::session::{Phase, QuizController, Step, TickOutcome};

// Upper bound on how long the loop sleeps waiting for input
const MAX_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Setup,
    Quiz,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Category,
    Difficulty,
    Count,
}

impl SetupField {
    fn next(&self) -> Self {
        match self {
            SetupField::Category => SetupField::Difficulty,
            SetupField::Difficulty => SetupField::Count,
            SetupField::Count => SetupField::Category,
        }
    }

    fn prev(&self) -> Self {
        match self {
            SetupField::Category => SetupField::Count,
            SetupField::Difficulty => SetupField::Category,
            SetupField::Count => SetupField::Difficulty,
        }
    }
}

/// State of the setup screen. Index 0 of both pickers is the wildcard.
pub struct SetupForm {
    pub categories: Vec<String>,
    pub category_index: usize,
    pub difficulty_index: usize,
    pub count_input: String,
    pub field: SetupField,
}

impl SetupForm {
    pub fn new(bank: &QuestionBank, preset: &QuizSetup) -> Self {
        let categories: Vec<String> = bank.categories().into_iter().map(String::from).collect();

        let category_index = match &preset.category {
            CategoryFilter::All => 0,
            CategoryFilter::Named(name) => categories
                .iter()
                .position(|c| c == name)
                .map_or(0, |i| i + 1),
        };
        let difficulty_index = preset
            .difficulty
            .and_then(|d| Difficulty::ALL.iter().position(|x| *x == d))
            .map_or(0, |i| i + 1);

        Self {
            categories,
            category_index,
            difficulty_index,
            count_input: preset.count.to_string(),
            field: SetupField::Category,
        }
    }

    pub fn category(&self) -> CategoryFilter {
        match self.category_index {
            0 => CategoryFilter::All,
            i => self
                .categories
                .get(i - 1)
                .map(|c| CategoryFilter::Named(c.clone()))
                .unwrap_or_default(),
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty_index
            .checked_sub(1)
            .and_then(|i| Difficulty::ALL.get(i).copied())
    }

    pub fn count(&self) -> usize {
        QuizSetup::parse_count(&self.count_input)
    }

    pub fn to_setup(&self) -> QuizSetup {
        QuizSetup::new(self.category(), self.difficulty(), self.count())
    }

    fn cycle(&mut self, forward: bool) {
        match self.field {
            SetupField::Category => {
                self.category_index =
                    step_wrapping(self.category_index, self.categories.len() + 1, forward);
            }
            SetupField::Difficulty => {
                self.difficulty_index =
                    step_wrapping(self.difficulty_index, Difficulty::ALL.len() + 1, forward);
            }
            SetupField::Count => {
                let count = self.count();
                let next = if forward { count + 1 } else { count.saturating_sub(1) };
                self.count_input = QuizSetup::clamp_count(next).to_string();
            }
        }
    }
}

fn step_wrapping(i: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (i + 1) % len
    } else {
        (i + len - 1) % len
    }
}

pub struct App<C: Clock = SystemClock> {
    pub quiz: QuizController<C>,
    pub form: SetupForm,
    pub highlighted: usize,
    pub confirm_submit: bool,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl<C: Clock> App<C> {
    pub fn new(quiz: QuizController<C>, preset: &QuizSetup) -> Self {
        let form = SetupForm::new(quiz.bank(), preset);
        Self {
            quiz,
            form,
            highlighted: 0,
            confirm_submit: false,
            status: None,
            should_quit: false,
        }
    }

    pub fn view(&self) -> View {
        match self.quiz.phase() {
            Phase::Setup => View::Setup,
            Phase::InProgress(_) => View::Quiz,
            Phase::Finished(_) => View::Results,
        }
    }

    fn start(&mut self) {
        match self.quiz.start(self.form.to_setup()) {
            Ok(()) => {
                self.status = None;
                self.sync_highlight();
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    // Highlight follows the saved answer when a question comes into view
    fn sync_highlight(&mut self) {
        self.highlighted = self
            .quiz
            .session()
            .and_then(|s| s.current_answer().selected)
            .unwrap_or(0);
    }

    fn select(&mut self, index: usize) {
        self.status = None;
        self.quiz.select_option(index);
        self.sync_highlight();
    }

    fn navigate(&mut self, step: Step) {
        self.status = None;
        self.quiz.navigate(step);
        self.sync_highlight();
    }

    fn option_count(&self) -> usize {
        self.quiz
            .session()
            .map(|s| s.current_question().options.len())
            .unwrap_or(0)
    }

    pub fn poll_timeout(&self) -> Duration {
        self.quiz
            .until_next_tick()
            .map_or(MAX_POLL, |d| d.min(MAX_POLL))
    }

    pub fn on_tick(&mut self) {
        for outcome in self.quiz.tick_if_due() {
            match outcome {
                TickOutcome::Advanced(cursor) => {
                    // A pending submit prompt belonged to the previous question
                    self.confirm_submit = false;
                    self.status = Some(format!("Time's up! Moved to question {}.", cursor + 1));
                    self.sync_highlight();
                }
                TickOutcome::Finished => {
                    self.confirm_submit = false;
                    self.status = Some("Time's up! Quiz submitted.".to_string());
                }
                TickOutcome::Counting(remaining) => tracing::trace!(remaining, "tick"),
                TickOutcome::Idle => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.view() {
            View::Setup => self.handle_setup_key(key),
            View::Quiz => self.handle_quiz_key(key),
            View::Results => self.handle_results_key(key),
        }
    }

    fn handle_setup_key(&mut self, key: KeyCode) {
        if key != KeyCode::Enter {
            self.status = None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                self.form.field = self.form.field.next();
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                self.form.field = self.form.field.prev();
            }

            KeyCode::Char('h') | KeyCode::Left => self.form.cycle(false),
            KeyCode::Char('l') | KeyCode::Right => self.form.cycle(true),

            // Count accepts raw text; it is parsed on start
            KeyCode::Char(c) if self.form.field == SetupField::Count && c.is_ascii_digit() => {
                if self.form.count_input.len() < 3 {
                    self.form.count_input.push(c);
                }
            }
            KeyCode::Backspace if self.form.field == SetupField::Count => {
                self.form.count_input.pop();
            }

            KeyCode::Enter => self.start(),

            _ => {}
        }
    }

    fn handle_quiz_key(&mut self, key: KeyCode) {
        if self.confirm_submit {
            self.confirm_submit = false;
            if matches!(key, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) {
                self.quiz.finish();
                self.status = None;
            }
            return;
        }

        let Some(session) = self.quiz.session() else {
            return;
        };
        let (is_first, is_last) = (session.is_first(), session.is_last());

        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char(c @ '1'..='4') => self.select(c as usize - '1' as usize),
            KeyCode::Char(c @ 'a'..='d') => self.select(c as usize - 'a' as usize),

            KeyCode::Char('j') | KeyCode::Down => {
                self.highlighted = step_wrapping(self.highlighted, self.option_count(), true);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.highlighted = step_wrapping(self.highlighted, self.option_count(), false);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select(self.highlighted),

            // Prev/next are unavailable at the ends of the session
            KeyCode::Char('h') | KeyCode::Left if !is_first => self.navigate(Step::Prev),
            KeyCode::Char('l') | KeyCode::Right if !is_last => self.navigate(Step::Next),

            KeyCode::Char('s') => {
                self.status = None;
                self.confirm_submit = true;
            }

            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => {
                self.quiz.retake();
                self.status = None;
                self.highlighted = 0;
            }
            _ => {}
        }
    }
}

pub fn run(bank: QuestionBank, preset: QuizSetup) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(QuizController::new(bank), &preset);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers);
                }
            }
        }

        app.on_tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
