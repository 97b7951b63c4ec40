use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::clock::Clock;
use crate::models::difficulty_label;
use crate::session::budget_for;
use crate::tui::{App, SetupField};

pub fn draw<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Form
            Constraint::Min(0),    // Preview
        ])
        .split(area);

    draw_form(f, app, chunks[0]);
    draw_preview(f, app, chunks[1]);
}

fn draw_form<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    let form = &app.form;
    let category = form.category();

    let fields = [
        (SetupField::Category, "Category", category.label().to_string()),
        (
            SetupField::Difficulty,
            "Difficulty",
            difficulty_label(form.difficulty()).to_string(),
        ),
        (SetupField::Count, "Questions", form.count_input.clone()),
    ];

    let text: Vec<Line> = fields
        .into_iter()
        .map(|(field, label, value)| {
            let active = field == form.field;
            let marker = if active { "> " } else { "  " };
            let value_style = if active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(format!("{:<12}", label), Style::default().fg(Color::Gray)),
                Span::styled(format!("< {} >", value), value_style),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" New Quiz ")
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text).block(block);
    f.render_widget(paragraph, area);
}

fn draw_preview<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    let setup = app.form.to_setup();
    let matching = app
        .quiz
        .bank()
        .filter(&setup.category, setup.difficulty)
        .len();
    let questions = matching.min(setup.count);

    let (match_text, match_color) = if matching == 0 {
        ("No questions match selection".to_string(), Color::Red)
    } else {
        (format!("{} matching", matching), Color::Green)
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Pool: ", Style::default().fg(Color::Gray)),
            Span::styled(match_text, Style::default().fg(match_color)),
        ]),
        Line::from(vec![
            Span::styled("Session: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} questions", questions),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Time per question: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}s", budget_for(setup.difficulty)),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Preview ")
        .title_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(text).block(block);
    f.render_widget(paragraph, area);
}
