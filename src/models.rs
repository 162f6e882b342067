use std::fmt;

/// Fixed countdown durations offered on the preset selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    FiveMinutes,
    #[default]
    ThirtyMinutes,
    OneHour,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::FiveMinutes, Preset::ThirtyMinutes, Preset::OneHour];

    pub fn seconds(self) -> u32 {
        self.minutes() * 60
    }

    pub fn minutes(self) -> u32 {
        match self {
            Preset::FiveMinutes => 5,
            Preset::ThirtyMinutes => 30,
            Preset::OneHour => 60,
        }
    }

    /// Label shown on the selector (e.g., "30 min")
    pub fn label(self) -> &'static str {
        match self {
            Preset::FiveMinutes => "5 min",
            Preset::ThirtyMinutes => "30 min",
            Preset::OneHour => "1 hr",
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Preset> {
        Preset::ALL.into_iter().find(|p| p.minutes() == minutes)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse state derived from the timer flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Complete,
}

/// Snapshot of the countdown, owned by the engine and copied out to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub preset: Preset,
    pub running: bool,
    pub complete: bool,
    pub notification_plays: u8,
}

impl TimerState {
    pub fn new(preset: Preset) -> Self {
        Self {
            remaining_seconds: preset.seconds(),
            preset,
            running: false,
            complete: false,
            notification_plays: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.running {
            Phase::Running
        } else if self.complete {
            Phase::Complete
        } else {
            Phase::Idle
        }
    }

    /// The start affordance is offered when not running and time remains
    pub fn can_start(&self) -> bool {
        !self.running && self.remaining_seconds > 0
    }

    /// Hint for the host window title. `None` means "show the original title".
    pub fn title_hint(&self) -> Option<String> {
        match self.phase() {
            Phase::Complete => Some("⏰ Timer Complete!".to_string()),
            Phase::Running => Some(format!("⏳ {} - Running", format_time(self.remaining_seconds))),
            Phase::Idle if self.remaining_seconds < 60 => {
                Some(format!("⏸️ {} - Paused", format_time(self.remaining_seconds)))
            }
            Phase::Idle => None,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(Preset::default())
    }
}

/// Format seconds as MM:SS. Minutes are not wrapped into hours.
pub fn format_time(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
