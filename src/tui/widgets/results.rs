use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::clock::Clock;
use crate::models::{difficulty_label, ResultSummary};
use crate::tui::App;
use crate::truncate;

pub fn draw<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    let Some(summary) = app.quiz.summary() else {
        let block = Block::default().borders(Borders::ALL).title(" Results ");
        let paragraph = Paragraph::new("No results yet").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Totals + charts
            Constraint::Min(0),     // Detail table
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(45),
        ])
        .split(chunks[0]);

    draw_totals(f, summary, top[0]);
    draw_outcome_chart(f, summary, top[1]);
    draw_time_chart(f, summary, top[2]);
    draw_details(f, summary, chunks[1]);
}

fn draw_totals(f: &mut Frame, summary: &ResultSummary, area: Rect) {
    let score_color = match summary.percent {
        80..=100 => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}%", summary.percent),
                Style::default()
                    .fg(score_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Total: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", summary.total),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Correct: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", summary.correct),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Incorrect: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", summary.incorrect),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(vec![
            Span::styled("Time: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}s", summary.total_time_secs),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("Finished: ", Style::default().fg(Color::Gray)),
            Span::styled(
                summary.finished_at.format("%H:%M:%S").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            " {} / {} ",
            summary.category,
            difficulty_label(summary.difficulty)
        ))
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_outcome_chart(f: &mut Frame, summary: &ResultSummary, area: Rect) {
    let colors = [Color::Green, Color::Red];
    let bars: Vec<Bar> = summary
        .outcome_chart()
        .into_iter()
        .zip(colors)
        .map(|((label, value), color)| {
            Bar::default()
                .value(value)
                .label(Line::from(label))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Correct vs Incorrect ")
                .title_style(Style::default().fg(Color::Yellow)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2);

    f.render_widget(chart, area);
}

fn draw_time_chart(f: &mut Frame, summary: &ResultSummary, area: Rect) {
    let data: Vec<(&str, u64)> = summary
        .time_chart
        .iter()
        .map(|p| (p.label.as_str(), p.seconds))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Time per question (s) ")
                .title_style(Style::default().fg(Color::Magenta)),
        )
        .data(data.as_slice())
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Blue));

    f.render_widget(chart, area);
}

fn draw_details(f: &mut Frame, summary: &ResultSummary, area: Rect) {
    let header = Row::new(vec!["#", "Question", "Your answer", "Correct", "Time"]).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = summary
        .rows
        .iter()
        .map(|row| {
            let answer_color = if row.is_correct {
                Color::Green
            } else {
                Color::Red
            };

            Row::new(vec![
                format!("{}", row.number),
                truncate(&row.prompt, 44),
                truncate(row.selected_label(), 18),
                truncate(&row.correct, 18),
                format!("{}s", row.time_secs),
            ])
            .style(Style::default().fg(answer_color))
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Details ")
            .title_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(table, area);
}
