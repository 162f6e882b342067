use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::App;
use super::views::draw_timer;
use super::views::timer::theme_color;
use crate::assets::icon;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Status/help bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_timer(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);

    if app.show_help {
        draw_help_overlay(frame, app);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let title = format!(" {} HOURGLASS ", icon("hourglass"));

    let header = Paragraph::new(Line::from(Span::styled(
        format!(" Preset: {}", state.preset.label()),
        Style::default().fg(Color::White),
    )))
    .block(Block::default().borders(Borders::ALL).title(title))
    .style(Style::default().fg(theme_color(&state)));

    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = "[1-3] Preset  [space] Start/Pause  [r] Reset  [?] Help  [q] Quit";

    let status = if let Some(msg) = &app.status_message {
        Line::from(vec![
            Span::styled(msg, Style::default().fg(theme_color(&app.state()))),
            Span::raw("  |  "),
            Span::styled(help_text, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(Span::styled(
            help_text,
            Style::default().fg(Color::DarkGray),
        ))
    };

    let footer = Paragraph::new(status).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn draw_help_overlay(frame: &mut Frame, _app: &App) {
    let area = centered_rect(60, 70, frame.area());

    let help_text = vec![
        Line::from(Span::styled(
            "HOURGLASS - Help",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Presets",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  1        - 5 minutes"),
        Line::from("  2        - 30 minutes"),
        Line::from("  3        - 1 hour"),
        Line::from(""),
        Line::from(Span::styled(
            "Timer",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  Space/s  - Start or pause"),
        Line::from("  r        - Reset to the preset"),
        Line::from(""),
        Line::from(Span::styled(
            "General",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  Esc      - Clear status message"),
        Line::from("  ?        - Toggle this help"),
        Line::from("  q        - Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Helper to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
