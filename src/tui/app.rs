use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::engine::TimerEngine;
use crate::models::{Preset, TimerState};
use crate::notification::{self, NotificationPlayer};

/// Longest the event loop waits for input before re-checking the engine
pub const MAX_POLL_WAIT: Duration = Duration::from_millis(250);

/// Running state of the application
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RunningState {
    #[default]
    Running,
    Done,
}

/// All possible application messages/events
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Timer commands
    SelectPreset(Preset),
    Start,
    Pause,
    Reset,

    // Time passing (ticks, cue playback)
    Tick,

    // UI
    ToggleHelp,
    ClearStatus,
    Quit,
}

/// Main application state
pub struct App {
    pub running_state: RunningState,
    pub engine: TimerEngine<Box<dyn NotificationPlayer>>,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub desktop_notify: bool,

    /// Title shown by the terminal when the timer has nothing to say
    pub original_title: String,
    current_title: String,
    pending_title: Option<String>,

    changes: Rc<RefCell<Vec<TimerState>>>,
    last_seen: TimerState,
}

impl App {
    pub fn new(
        mut engine: TimerEngine<Box<dyn NotificationPlayer>>,
        original_title: String,
        desktop_notify: bool,
    ) -> Self {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        engine.subscribe(move |state| sink.borrow_mut().push(*state));

        let last_seen = engine.state();
        let current_title = engine
            .title_hint()
            .unwrap_or_else(|| original_title.clone());

        App {
            running_state: RunningState::default(),
            engine,
            show_help: false,
            status_message: None,
            desktop_notify,
            pending_title: Some(current_title.clone()),
            current_title,
            original_title,
            changes,
            last_seen,
        }
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    /// Core update function
    pub fn update(&mut self, msg: Message, now: Instant) {
        match msg {
            Message::SelectPreset(preset) => {
                self.engine.select_preset(preset);
                self.status_message = Some(format!("Preset: {}", preset.label()));
            }
            Message::Start => {
                if self.engine.start(now) {
                    self.status_message = Some("Timer started".to_string());
                }
            }
            Message::Pause => {
                if self.engine.pause() {
                    self.status_message = Some("Timer paused".to_string());
                }
            }
            Message::Reset => {
                self.engine.reset();
                self.status_message = Some("Timer reset".to_string());
            }
            Message::Tick => {
                self.engine.advance(now);
            }
            Message::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            Message::ClearStatus => {
                self.status_message = None;
            }
            Message::Quit => {
                self.running_state = RunningState::Done;
            }
        }

        self.observe_changes();
    }

    /// How long the event loop may block waiting for a key
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.engine.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(MAX_POLL_WAIT),
            None => MAX_POLL_WAIT,
        }
    }

    /// Terminal title to apply, if it changed since the last call
    pub fn take_title(&mut self) -> Option<String> {
        self.pending_title.take()
    }

    fn observe_changes(&mut self) {
        let changes: Vec<TimerState> = self.changes.borrow_mut().drain(..).collect();
        for state in changes {
            if state.complete && !self.last_seen.complete {
                self.on_complete(state.preset);
            }
            self.last_seen = state;

            let title = state
                .title_hint()
                .unwrap_or_else(|| self.original_title.clone());
            if title != self.current_title {
                self.current_title = title.clone();
                self.pending_title = Some(title);
            }
        }
    }

    fn on_complete(&mut self, preset: Preset) {
        info!(preset = %preset, "Showing completion notice");
        self.status_message = Some("Time's up!".to_string());
        if self.desktop_notify {
            notification::notify_timer_complete(preset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phase;
    use crate::notification::testing::ScriptedPlayer;

    fn app_with(preset: Preset) -> (App, ScriptedPlayer) {
        let player = ScriptedPlayer::default();
        let engine: TimerEngine<Box<dyn NotificationPlayer>> =
            TimerEngine::new(Box::new(player.clone()), preset);
        (App::new(engine, "hourglass".to_string(), false), player)
    }

    #[test]
    fn initial_title_is_the_original() {
        let (mut app, _) = app_with(Preset::ThirtyMinutes);
        assert_eq!(app.take_title().as_deref(), Some("hourglass"));
        assert_eq!(app.take_title(), None);
    }

    #[test]
    fn commands_drive_the_engine_and_title() {
        let t0 = Instant::now();
        let (mut app, _) = app_with(Preset::FiveMinutes);
        app.take_title();

        app.update(Message::Start, t0);
        assert_eq!(app.state().phase(), Phase::Running);
        assert_eq!(app.take_title().as_deref(), Some("⏳ 05:00 - Running"));

        app.update(Message::Tick, t0 + Duration::from_secs(1));
        assert_eq!(app.state().remaining_seconds, 299);
        assert_eq!(app.take_title().as_deref(), Some("⏳ 04:59 - Running"));

        app.update(Message::Pause, t0 + Duration::from_millis(1200));
        assert_eq!(app.status_message.as_deref(), Some("Timer paused"));
        // Paused with more than a minute left shows the original title
        assert_eq!(app.take_title().as_deref(), Some("hourglass"));

        app.update(Message::Reset, t0 + Duration::from_secs(2));
        assert_eq!(app.state().remaining_seconds, 300);
        assert_eq!(app.take_title(), None);
    }

    #[test]
    fn completion_sets_status_and_title() {
        let t0 = Instant::now();
        let (mut app, player) = app_with(Preset::FiveMinutes);
        app.update(Message::Start, t0);
        app.update(Message::Tick, t0 + Duration::from_secs(300));

        assert_eq!(app.state().phase(), Phase::Complete);
        assert_eq!(app.status_message.as_deref(), Some("Time's up!"));
        assert_eq!(app.take_title().as_deref(), Some("⏰ Timer Complete!"));
        assert_eq!(player.plays(), 1);

        for i in 1..=3 {
            player.finish_playback();
            app.update(Message::Tick, t0 + Duration::from_secs(300 + i));
        }
        assert_eq!(app.state().phase(), Phase::Idle);
        assert_eq!(app.take_title().as_deref(), Some("hourglass"));
    }

    #[test]
    fn poll_timeout_shrinks_towards_next_tick() {
        let t0 = Instant::now();
        let (mut app, _) = app_with(Preset::FiveMinutes);
        assert_eq!(app.poll_timeout(t0), MAX_POLL_WAIT);

        app.update(Message::Start, t0);
        assert_eq!(
            app.poll_timeout(t0 + Duration::from_millis(900)),
            Duration::from_millis(100)
        );
        assert_eq!(app.poll_timeout(t0 + Duration::from_secs(2)), Duration::ZERO);
    }

    #[test]
    fn quit_and_help() {
        let now = Instant::now();
        let (mut app, _) = app_with(Preset::OneHour);
        app.update(Message::ToggleHelp, now);
        assert!(app.show_help);
        app.update(Message::Quit, now);
        assert_eq!(app.running_state, RunningState::Done);
    }
}
