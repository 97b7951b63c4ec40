use std::time::{Duration, Instant};

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::QuestionBank;
use crate::clock::{Clock, SystemClock};
use crate::error::QuizError;
use crate::models::{
    difficulty_label, AnswerRecord, Difficulty, Question, QuizSetup, ResultSummary,
};

pub const TICK: Duration = Duration::from_secs(1);

/// Seconds allowed per question, chosen by the setup's difficulty filter
/// rather than by each question's own difficulty.
pub fn budget_for(difficulty: Option<Difficulty>) -> u64 {
    match difficulty {
        Some(Difficulty::Easy) => 20,
        Some(Difficulty::Hard) => 10,
        Some(Difficulty::Medium) | None => 15,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prev,
    Next,
}

impl Step {
    // No wraparound at either end
    fn apply(self, cursor: usize, len: usize) -> usize {
        let last = len.saturating_sub(1);
        match self {
            Step::Prev => cursor.saturating_sub(1),
            Step::Next => (cursor + 1).min(last),
        }
    }
}

/// Per-question countdown. Holds the only tick handle a session has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    budget_secs: u64,
    remaining_secs: u64,
    visible_since: Instant,
    next_tick: Option<Instant>,
}

impl Countdown {
    fn arm(budget_secs: u64, accumulated_secs: u64, now: Instant) -> Self {
        Self {
            budget_secs,
            remaining_secs: budget_secs.saturating_sub(accumulated_secs),
            visible_since: now,
            next_tick: Some(now + TICK),
        }
    }

    pub fn budget_secs(&self) -> u64 {
        self.budget_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn ratio(&self) -> f64 {
        if self.budget_secs == 0 {
            return 0.0;
        }
        (self.remaining_secs as f64 / self.budget_secs as f64).clamp(0.0, 1.0)
    }

    fn elapsed_secs(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.visible_since).as_secs()
    }

    fn tick(&mut self) -> u64 {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.next_tick = self.next_tick.map(|t| t + TICK);
        self.remaining_secs
    }

    fn clear(&mut self) {
        self.next_tick = None;
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    setup: QuizSetup,
    questions: Vec<Question>,
    answers: Vec<AnswerRecord>,
    cursor: usize,
    countdown: Countdown,
}

impl Session {
    pub fn setup(&self) -> &QuizSetup {
        &self.setup
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.questions().len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.cursor]
    }

    pub fn current_answer(&self) -> &AnswerRecord {
        &self.answers[self.cursor]
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn answered_count(&self) -> usize {
        self.answers()
            .iter()
            .filter(|a| a.selected.is_some())
            .count()
    }

    // Adds whole seconds since the question became visible, then restarts
    // the view timestamp so a second commit cannot count them again.
    fn commit_elapsed(&mut self, now: Instant) {
        let secs = self.countdown.elapsed_secs(now);
        self.answers[self.cursor].time_secs += secs;
        self.countdown.visible_since = now;
    }

    fn move_to(&mut self, cursor: usize, now: Instant) {
        self.cursor = cursor.min(self.questions.len().saturating_sub(1));
        self.countdown = Countdown::arm(
            self.countdown.budget_secs,
            self.answers[self.cursor].time_secs,
            now,
        );
    }
}

#[derive(Debug, Clone)]
pub enum Phase {
    Setup,
    InProgress(Session),
    Finished(ResultSummary),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::InProgress(_) => "in progress",
            Phase::Finished(_) => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Counting(u64),
    Advanced(usize),
    Finished,
}

/// Owns the bank and the single quiz run built from it.
pub struct QuizController<C: Clock = SystemClock> {
    bank: QuestionBank,
    clock: C,
    phase: Phase,
}

impl QuizController<SystemClock> {
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_clock(bank, SystemClock)
    }
}

impl<C: Clock> QuizController<C> {
    pub fn with_clock(bank: QuestionBank, clock: C) -> Self {
        Self {
            bank,
            clock,
            phase: Phase::Setup,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::InProgress(session) => Some(session),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&ResultSummary> {
        match &self.phase {
            Phase::Finished(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn start(&mut self, setup: QuizSetup) -> Result<(), QuizError> {
        self.start_with_rng(setup, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        setup: QuizSetup,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        if !matches!(self.phase, Phase::Setup) {
            return Err(QuizError::WrongPhase {
                expected: Phase::Setup.name(),
                actual: self.phase.name(),
            });
        }

        let mut questions: Vec<Question> = self
            .bank
            .filter(&setup.category, setup.difficulty)
            .into_iter()
            .cloned()
            .collect();

        if questions.is_empty() {
            tracing::warn!(
                category = setup.category.label(),
                difficulty = difficulty_label(setup.difficulty),
                "no questions match selection"
            );
            return Err(QuizError::EmptyPool {
                category: setup.category.label().to_string(),
                difficulty: difficulty_label(setup.difficulty).to_string(),
            });
        }

        let pool_size = questions.len();
        questions.shuffle(rng);
        questions.truncate(QuizSetup::clamp_count(setup.count));

        let answers = questions.iter().map(AnswerRecord::for_question).collect();
        let budget_secs = budget_for(setup.difficulty);

        tracing::info!(
            category = setup.category.label(),
            difficulty = difficulty_label(setup.difficulty),
            pool = pool_size,
            questions = questions.len(),
            budget_secs,
            "quiz started"
        );

        self.phase = Phase::InProgress(Session {
            setup,
            questions,
            answers,
            cursor: 0,
            countdown: Countdown::arm(budget_secs, 0, self.clock.now()),
        });
        Ok(())
    }

    pub fn select_option(&mut self, index: usize) {
        let Phase::InProgress(session) = &mut self.phase else {
            return;
        };
        let last = session.current_question().options.len().saturating_sub(1);
        let cursor = session.cursor;
        session.answers[cursor].selected = Some(index.min(last));
    }

    /// Moves one question back or forward, returning the new cursor.
    pub fn navigate(&mut self, step: Step) -> Option<usize> {
        let now = self.clock.now();
        let Phase::InProgress(session) = &mut self.phase else {
            return None;
        };

        session.commit_elapsed(now);
        let target = step.apply(session.cursor, session.len());
        session.move_to(target, now);

        tracing::debug!(cursor = session.cursor, "navigated");
        Some(session.cursor)
    }

    pub fn next_tick_at(&self) -> Option<Instant> {
        self.session().and_then(|s| s.countdown.next_tick)
    }

    pub fn until_next_tick(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_tick_at()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Handles one elapsed second of the countdown for whichever question
    /// is current when the tick arrives.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let Phase::InProgress(session) = &mut self.phase else {
            return TickOutcome::Idle;
        };

        let remaining = session.countdown.tick();
        if remaining > 0 {
            return TickOutcome::Counting(remaining);
        }

        session.commit_elapsed(now);
        tracing::info!(cursor = session.cursor, "question timed out");

        if session.is_last() {
            self.finish();
            return TickOutcome::Finished;
        }

        let next = session.cursor + 1;
        session.move_to(next, now);
        TickOutcome::Advanced(next)
    }

    /// Fires every tick whose deadline has passed.
    pub fn tick_if_due(&mut self) -> Vec<TickOutcome> {
        let now = self.clock.now();
        let mut fired = Vec::new();
        while let Some(deadline) = self.next_tick_at() {
            if deadline > now {
                break;
            }
            fired.push(self.tick());
        }
        fired
    }

    /// Ends the run and computes the summary. Only the first call in a run
    /// has any effect; later calls return `false`.
    pub fn finish(&mut self) -> bool {
        let now = self.clock.now();
        let phase = self.phase.name();
        let Phase::InProgress(session) = &mut self.phase else {
            tracing::debug!(phase, "finish ignored");
            return false;
        };

        session.commit_elapsed(now);
        session.countdown.clear();

        let summary = ResultSummary::from_records(
            &session.setup,
            &session.questions,
            &session.answers,
            Utc::now(),
        );
        tracing::info!(
            total = summary.total,
            correct = summary.correct,
            percent = summary.percent,
            total_time_secs = summary.total_time_secs,
            "quiz finished"
        );

        self.phase = Phase::Finished(summary);
        true
    }

    pub fn retake(&mut self) {
        tracing::info!(from = self.phase.name(), "retake");
        self.phase = Phase::Setup;
    }
}
