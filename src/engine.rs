//! Countdown state machine
//!
//! `TimerEngine` owns the single `TimerState` of the session. It is driven
//! by user commands and by `advance`, which the event loop calls with the
//! current instant; ticks and playback-ended events are only read through
//! the two subscriptions the engine holds (`Ticker` while running, the
//! playback watch while complete), so pausing or resetting cancels both.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::models::{Phase, Preset, TimerState};
use crate::notification::NotificationPlayer;
use crate::ticker::Ticker;

/// How many times the completion cue plays before the timer resets itself
pub const MAX_NOTIFICATION_PLAYS: u8 = 3;

pub const DEFAULT_SILENT_HOLD: Duration = Duration::from_secs(5);

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TimerState)>;

/// What the engine is waiting for from the cue player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackWatch {
    Detached,
    Listening,
    /// Playback could not start; reset once the hold period is over
    Silent { reset_at: Instant },
}

pub struct TimerEngine<P: NotificationPlayer> {
    state: TimerState,
    player: P,
    ticker: Ticker,
    playback: PlaybackWatch,
    silent_hold: Duration,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<P: NotificationPlayer> TimerEngine<P> {
    pub fn new(player: P, preset: Preset) -> Self {
        Self {
            state: TimerState::new(preset),
            player,
            ticker: Ticker::default(),
            playback: PlaybackWatch::Detached,
            silent_hold: DEFAULT_SILENT_HOLD,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn with_silent_hold(mut self, hold: Duration) -> Self {
        self.silent_hold = hold;
        self
    }

    /// Current snapshot
    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn title_hint(&self) -> Option<String> {
        self.state.title_hint()
    }

    /// Register an observer called with every new snapshot
    pub fn subscribe(&mut self, listener: impl FnMut(&TimerState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Earliest instant at which `advance` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let silent = match self.playback {
            PlaybackWatch::Silent { reset_at } => Some(reset_at),
            _ => None,
        };
        match (self.ticker.next_due(), silent) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Choose a preset. Remaining time is overwritten even while running;
    /// the countdown keeps going from the new value.
    pub fn select_preset(&mut self, preset: Preset) {
        let before = self.state;
        self.state.preset = preset;
        if self.state.complete {
            self.reset_inner();
        } else {
            self.state.remaining_seconds = preset.seconds();
        }
        info!(preset = %preset, running = self.state.running, "Preset selected");
        self.publish_if_changed(before);
    }

    /// Begin counting down. Refused at zero and while already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state.running || self.state.remaining_seconds == 0 {
            debug!(
                running = self.state.running,
                remaining = self.state.remaining_seconds,
                "Start ignored"
            );
            return false;
        }
        let before = self.state;
        self.state.running = true;
        self.state.complete = false;
        self.ticker.start(now);
        info!(remaining = self.state.remaining_seconds, "Countdown started");
        self.publish_if_changed(before);
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        let before = self.state;
        self.state.running = false;
        self.ticker.cancel();
        info!(remaining = self.state.remaining_seconds, "Countdown paused");
        self.publish_if_changed(before);
        true
    }

    /// Back to Idle with the full duration of the selected preset
    pub fn reset(&mut self) {
        let before = self.state;
        self.reset_inner();
        info!(preset = %self.state.preset, "Timer reset");
        self.publish_if_changed(before);
    }

    /// One countdown step. Has no effect unless running, so a tick that
    /// lands after a pause changes nothing.
    pub fn tick(&mut self, now: Instant) {
        if !self.state.running {
            return;
        }
        let before = self.state;
        if self.state.remaining_seconds > 1 {
            self.state.remaining_seconds -= 1;
            debug!(remaining = self.state.remaining_seconds, "Tick");
        } else {
            self.complete(now);
        }
        self.publish_if_changed(before);
    }

    /// One play-through of the cue finished
    pub fn on_playback_ended(&mut self, now: Instant) {
        if self.playback != PlaybackWatch::Listening || !self.state.complete {
            debug!("Ignoring playback-ended event outside of completion");
            return;
        }
        let before = self.state;
        if self.state.notification_plays < MAX_NOTIFICATION_PLAYS {
            self.state.notification_plays += 1;
            debug!(plays = self.state.notification_plays, "Replaying completion cue");
            self.play_cue(now);
        } else {
            info!("Completion cue finished, resetting");
            self.reset_inner();
        }
        self.publish_if_changed(before);
    }

    /// Deliver everything that became due by `now`: ticks, playback-ended
    /// events and the silent-hold deadline. Returns true if state changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let before = self.state;

        while self.ticker.fire(now) {
            self.tick(now);
        }

        match self.playback {
            PlaybackWatch::Listening => {
                if self.player.take_ended() {
                    self.on_playback_ended(now);
                }
            }
            PlaybackWatch::Silent { reset_at } if now >= reset_at => {
                info!("Silent completion hold elapsed, resetting");
                self.reset();
            }
            _ => {}
        }

        self.state != before
    }

    fn complete(&mut self, now: Instant) {
        self.state.remaining_seconds = 0;
        self.state.running = false;
        self.state.complete = true;
        self.ticker.cancel();
        info!(preset = %self.state.preset, "Countdown complete");

        self.state.notification_plays = 1;
        self.play_cue(now);
    }

    fn play_cue(&mut self, now: Instant) {
        match self.player.play() {
            Ok(()) => self.playback = PlaybackWatch::Listening,
            Err(e) => {
                warn!(error = %e, "Completion cue failed, holding silently");
                self.state.notification_plays = MAX_NOTIFICATION_PLAYS;
                self.playback = PlaybackWatch::Silent {
                    reset_at: now + self.silent_hold,
                };
            }
        }
    }

    fn reset_inner(&mut self) {
        self.ticker.cancel();
        if self.playback != PlaybackWatch::Detached {
            self.playback = PlaybackWatch::Detached;
            self.player.stop();
        }
        self.state.remaining_seconds = self.state.preset.seconds();
        self.state.running = false;
        self.state.complete = false;
        self.state.notification_plays = 0;
    }

    fn publish_if_changed(&mut self, before: TimerState) {
        if self.state == before {
            return;
        }
        let snapshot = self.state;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }
}
