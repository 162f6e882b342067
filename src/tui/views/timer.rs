use chrono::{Duration, Local};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::clock::{GLYPH_HEIGHT, big_lines, big_width};
use crate::assets::icon;
use crate::models::{Phase, Preset, TimerState, format_time};
use crate::tui::app::App;

/// Foreground color for the current phase: red once the countdown is done
pub fn theme_color(state: &TimerState) -> Color {
    if state.complete {
        Color::LightRed
    } else {
        Color::LightBlue
    }
}

pub fn draw_timer(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                   // Spacer
            Constraint::Length(GLYPH_HEIGHT + 2), // Readout
            Constraint::Length(1),                // Status line
            Constraint::Min(0),                   // Spacer
            Constraint::Length(3),                // Controls
        ])
        .split(area);

    draw_readout(frame, &state, chunks[1]);
    draw_status_line(frame, &state, chunks[2]);
    draw_controls(frame, &state, chunks[4]);
}

fn draw_readout(frame: &mut Frame, state: &TimerState, area: Rect) {
    let text = format_time(state.remaining_seconds);
    let style = Style::default()
        .fg(theme_color(state))
        .add_modifier(Modifier::BOLD);

    // Fall back to plain digits on narrow terminals
    let lines = if big_width(&text) + 2 <= area.width {
        let mut lines = vec![Line::from("")];
        lines.extend(big_lines(&text, style));
        lines
    } else {
        vec![Line::from(Span::styled(text, style))]
    };

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn status_text(state: &TimerState) -> String {
    match state.phase() {
        Phase::Complete => "Timer Complete!".to_string(),
        Phase::Running => {
            let ends = Local::now() + Duration::seconds(i64::from(state.remaining_seconds));
            format!("Ends at {}", ends.format("%H:%M"))
        }
        Phase::Idle if state.remaining_seconds < state.preset.seconds() => "Paused".to_string(),
        Phase::Idle => "Ready".to_string(),
    }
}

fn draw_status_line(frame: &mut Frame, state: &TimerState, area: Rect) {
    let line = Line::from(Span::styled(
        status_text(state),
        Style::default().fg(theme_color(state)),
    ));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_controls(frame: &mut Frame, state: &TimerState, area: Rect) {
    let accent = theme_color(state);
    let mut spans = Vec::new();

    for (key, preset) in ['1', '2', '3'].into_iter().zip(Preset::ALL) {
        let style = if state.preset == preset {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(
            format!(" [{}] {} {} ", key, icon("hourglass"), preset.label()),
            style,
        ));
    }

    spans.push(Span::raw("  "));
    spans.push(toggle_span(state, accent));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("[r] {} Reset ", icon("refresh")),
        Style::default().fg(accent),
    ));

    let controls = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(accent)),
        );

    frame.render_widget(controls, area);
}

/// Start when time remains and the timer is stopped, pause otherwise;
/// greyed out when there is no time left
fn toggle_span(state: &TimerState, accent: Color) -> Span<'static> {
    if state.can_start() {
        Span::styled(
            format!("[space] {} Start", icon("play")),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )
    } else if state.remaining_seconds == 0 {
        Span::styled(
            format!("[space] {} Pause", icon("pause")),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            format!("[space] {} Pause", icon("pause")),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_by_phase() {
        let mut state = TimerState::new(Preset::FiveMinutes);
        assert_eq!(status_text(&state), "Ready");

        state.remaining_seconds = 120;
        assert_eq!(status_text(&state), "Paused");

        state.running = true;
        assert!(status_text(&state).starts_with("Ends at "));

        state.running = false;
        state.remaining_seconds = 0;
        state.complete = true;
        assert_eq!(status_text(&state), "Timer Complete!");
        assert_eq!(theme_color(&state), Color::LightRed);
    }

    #[test]
    fn toggle_is_disabled_at_zero() {
        let mut state = TimerState::new(Preset::FiveMinutes);
        assert!(toggle_span(&state, Color::Blue).content.contains("Start"));

        state.remaining_seconds = 0;
        let span = toggle_span(&state, Color::Blue);
        assert!(span.content.contains("Pause"));
        assert_eq!(span.style.fg, Some(Color::DarkGray));
    }
}
