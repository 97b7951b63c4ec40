use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::clock::Clock;
use crate::models::difficulty_label;
use crate::session::{Countdown, Session};
use crate::tui::App;

pub fn draw<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    let Some(session) = app.quiz.session() else {
        let block = Block::default().borders(Borders::ALL).title(" Quiz ");
        let paragraph = Paragraph::new("No quiz in progress").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Progress + timer
            Constraint::Length(5), // Prompt
            Constraint::Min(0),    // Options
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_progress(f, session, top[0]);
    draw_timer(f, session.countdown(), top[1]);
    draw_prompt(f, session, chunks[1]);
    draw_options(f, app, session, chunks[2]);
}

fn draw_progress(f: &mut Frame, session: &Session, area: Rect) {
    let question = session.current_question();

    let text = Line::from(vec![
        Span::styled(
            format!("Question {} / {}", session.cursor() + 1, session.len()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} · {}", question.category, question.difficulty.label()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("  answered {}", session.answered_count()),
            Style::default().fg(Color::Green),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            " {} / {} ",
            session.setup().category.label(),
            difficulty_label(session.setup().difficulty)
        ))
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_timer(f: &mut Frame, countdown: &Countdown, area: Rect) {
    let remaining = countdown.remaining_secs();
    let color = match remaining {
        0..=3 => Color::Red,
        4..=7 => Color::Yellow,
        _ => Color::Green,
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Time ({}s per question) ", countdown.budget_secs()))
                .title_style(Style::default().fg(Color::Yellow)),
        )
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(countdown.ratio())
        .label(format_clock(remaining));

    f.render_widget(gauge, area);
}

fn draw_prompt(f: &mut Frame, session: &Session, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Question ")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(session.current_question().prompt.as_str())
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_options<C: Clock>(f: &mut Frame, app: &App<C>, session: &Session, area: Rect) {
    let selected = session.current_answer().selected;

    let items: Vec<ListItem> = session
        .current_question()
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let chosen = selected == Some(i);
            let (marker, style) = if chosen {
                (
                    "●",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("○", Style::default().fg(Color::White))
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), style),
                Span::styled(format!("{}) ", option_label(i)), Style::default().fg(Color::Cyan)),
                Span::styled(option.as_str(), style),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Options ")
        .title_style(Style::default().fg(Color::Cyan));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.highlighted));

    f.render_stateful_widget(list, area, &mut state);
}

pub fn option_label(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// `MM:SS` rendering of a second count.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
