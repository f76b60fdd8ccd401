use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::calculator::format_amount;
use crate::form::{FieldSpec, FIELDS};

// Input box plus one line for its error.
const FIELD_HEIGHT: u16 = 4;

pub fn ui(f: &mut Frame, app: &App) {
    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(FIELDS.iter().map(|_| Constraint::Length(FIELD_HEIGHT)));
    constraints.push(Constraint::Length(5));
    constraints.push(Constraint::Min(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(f.size());

    let title = Paragraph::new("Calculator")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    for (i, spec) in FIELDS.iter().enumerate() {
        render_field(f, app, spec, chunks[i + 1]);
    }

    render_result(f, app, chunks[FIELDS.len() + 1]);

    let help = Paragraph::new(
        "Tab/↓ next | Shift-Tab/↑ prev | PgUp/PgDn step | Enter/Ctrl-S calculate | Esc/q/Ctrl-C quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[FIELDS.len() + 2]);
}

fn render_field(f: &mut Frame, app: &App, spec: &FieldSpec, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let focused = app.focused == spec.id;
    let border_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Blue)
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(spec.label);

    let cursor = if focused { "_" } else { "" };
    let input = Paragraph::new(format!("{}{}", app.form.value(spec.id), cursor))
        .style(Style::default().fg(Color::Yellow))
        .block(input_block);
    f.render_widget(input, parts[0]);

    if let Some(error) = app.form.errors().get(spec.id) {
        let message = Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red));
        f.render_widget(message, parts[1]);
    }
}

fn render_result(f: &mut Frame, app: &App, area: Rect) {
    let Some(result) = &app.result else {
        return;
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Monthly Payment: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format_amount(result.monthly_payment),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Total Loan Payment: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format_amount(result.total_payable)),
        ]),
        Line::from(vec![
            Span::styled(
                "Total Interest Payment: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format_amount(result.total_interest),
                Style::default().fg(Color::Red),
            ),
        ]),
    ];

    let widget = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Result"));
    f.render_widget(widget, area);
}
