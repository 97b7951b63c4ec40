use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{question, results, setup};
use super::{App, View};
use crate::clock::Clock;

pub fn draw<C: Clock>(f: &mut Frame, app: &App<C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_tabs<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    let tab_titles = vec!["Setup", "Quiz", "Results"];
    let selected = match app.view() {
        View::Setup => 0,
        View::Quiz => 1,
        View::Results => 2,
    };

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" QuickQuiz "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    match app.view() {
        View::Setup => setup::draw(f, app, area),
        View::Quiz => question::draw(f, app, area),
        View::Results => results::draw(f, app, area),
    }
}

fn key(k: &str) -> Span<'_> {
    Span::styled(k, Style::default().fg(Color::Cyan))
}

fn draw_help_bar<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    let help_text = if let Some(status) = &app.status {
        vec![Span::styled(
            status.as_str(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]
    } else if app.confirm_submit {
        vec![
            Span::styled("Submit quiz now? ", Style::default().fg(Color::Yellow)),
            key("y"),
            Span::raw(" Yes  "),
            key("any"),
            Span::raw(" No"),
        ]
    } else {
        let mut spans = Vec::new();

        match app.view() {
            View::Setup => {
                spans.extend(vec![
                    key("j/k"),
                    Span::raw(" Field  "),
                    key("h/l"),
                    Span::raw(" Change  "),
                    key("0-9"),
                    Span::raw(" Count  "),
                    key("<CR>"),
                    Span::raw(" Start  "),
                ]);
            }
            View::Quiz => {
                spans.extend(vec![
                    key("1-4/a-d"),
                    Span::raw(" Answer  "),
                    key("j/k <CR>"),
                    Span::raw(" Pick  "),
                    key("h/l"),
                    Span::raw(" Prev/Next  "),
                    key("s"),
                    Span::raw(" Submit  "),
                ]);
            }
            View::Results => {
                spans.extend(vec![key("r"), Span::raw(" Retake  ")]);
            }
        }

        spans.extend(vec![key("q"), Span::raw(" Quit")]);

        spans
    };

    let help = Paragraph::new(Line::from(help_text)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
