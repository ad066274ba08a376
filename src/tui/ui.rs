//! Stateless rendering of the state machine snapshot.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use strum::IntoEnumIterator;

use crate::machine::{Phase, Snapshot};
use crate::protocol::Answer;
use crate::submission::FEATURE_QUESTIONS;

use super::form::FormState;

/// Renders the whole screen for the current phase.
pub fn draw(frame: &mut Frame, snapshot: &Snapshot, form: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Body
            Constraint::Length(3), // Status
        ])
        .split(frame.area());

    let title = Paragraph::new("twentyq — think of a character, I'll guess it")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match snapshot.phase() {
        Phase::Idle => draw_idle(frame, chunks[1]),
        Phase::Playing => draw_playing(frame, chunks[1], snapshot),
        Phase::Guessing => draw_guessing(frame, chunks[1], snapshot),
        Phase::Adding => draw_adding(frame, chunks[1], form),
    }

    draw_status(frame, chunks[2], snapshot);
}

fn draw_idle(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("Think of any character — movies, TV, comics, games, history."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to start",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("q to quit", Style::default().fg(Color::DarkGray))),
    ];
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn draw_playing(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Progress
            Constraint::Length(4), // Top candidates
            Constraint::Min(7),    // Question and answers
        ])
        .split(area);

    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(snapshot.progress())
        .label(format!(
            "Question {} of {}",
            snapshot.questions_asked(),
            snapshot.max_questions()
        ));
    frame.render_widget(progress, chunks[0]);

    // Candidate order comes straight from the engine; render as given.
    let candidate_line = if snapshot.top_candidates().is_empty() {
        Line::from(Span::styled(
            "No guesses yet",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let text = snapshot
            .top_candidates()
            .iter()
            .map(|c| format!("{} ({}%)", c.name, (c.probability * 100.0).round()))
            .collect::<Vec<_>>()
            .join("   ");
        Line::from(text)
    };
    let candidates = Paragraph::new(candidate_line)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Top guesses"));
    frame.render_widget(candidates, chunks[1]);

    let question_text = snapshot
        .question()
        .as_ref()
        .map(|q| q.text.clone())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            question_text,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (i, answer) in Answer::iter().enumerate() {
        lines.push(Line::from(format!("  {}. {}", i + 1, answer.label())));
    }
    let question = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(question, chunks[2]);
}

fn draw_guessing(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "I'm thinking of...",
            Style::default().fg(Color::Magenta),
        )),
        Line::from(""),
    ];

    if let Some(character) = snapshot.guessed_character() {
        lines.push(Line::from(Span::styled(
            character.name.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        if let Some(description) = &character.description {
            lines.push(Line::from(Span::styled(
                description.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        if let Some(url) = &character.image_url {
            lines.push(Line::from(Span::styled(
                url.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if !snapshot.alternatives().is_empty() {
        lines.push(Line::from(""));
        let names = snapshot
            .alternatives()
            .iter()
            .map(|a| a.name.clone())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(format!("Or maybe: {}", names)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y — correct    n — wrong    r — play again",
        Style::default().fg(Color::Green),
    )));

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn draw_adding(frame: &mut Frame, area: Rect, form: &FormState) {
    let sheet = form.sheet();
    let mut lines = Vec::with_capacity(FormState::rows() + 2);

    let text_rows = [
        ("Name*", sheet.name.as_str()),
        ("Image URL", sheet.image_url.as_str()),
        ("Description", sheet.description.as_str()),
    ];
    for (row, (label, value)) in text_rows.iter().enumerate() {
        lines.push(form_row(form.cursor() == row, label, value));
    }
    lines.push(Line::from(""));

    for (i, question) in FEATURE_QUESTIONS.iter().enumerate() {
        let row = i + text_rows.len();
        let value = form
            .feature_value(row)
            .map(|v| v.label())
            .unwrap_or("—");
        lines.push(form_row(form.cursor() == row, question.text, value));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑/↓ move    y/n/u or Space set feature    Enter submit    Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Who were you thinking of?"),
        );
    frame.render_widget(body, area);
}

fn form_row(selected: bool, label: &str, value: &str) -> Line<'static> {
    let style = if selected {
        Style::default().bg(Color::White).fg(Color::Black)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("{}: {}", label, value), style))
}

fn draw_status(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let (text, style) = if *snapshot.busy() {
        ("Thinking...".to_string(), Style::default().fg(Color::Yellow))
    } else if let Some(error) = snapshot.last_error() {
        (error.clone(), Style::default().fg(Color::Red))
    } else {
        let hint = match snapshot.phase() {
            Phase::Idle => "Enter — start    q — quit",
            Phase::Playing => "1-5 — answer    r — reset    q — quit",
            Phase::Guessing => "y — correct    n — wrong    r — play again",
            Phase::Adding => "Enter — submit    Esc — cancel",
        };
        (hint.to_string(), Style::default().fg(Color::DarkGray))
    };

    let status = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}
