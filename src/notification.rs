//! Completion cue playback and desktop notifications

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use notify_rust::Notification;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::SineWave};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::assets::{self, Sound};
use crate::models::Preset;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(#[from] rodio::StreamError),
    #[error("failed to create audio sink: {0}")]
    Sink(#[from] rodio::PlayError),
    #[error("failed to open sound file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode sound file: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("unknown sound resource '{0}'")]
    UnknownSound(String),
    #[error("audio is muted")]
    Muted,
}

/// Plays the completion cue and reports when a play-through has finished.
///
/// The engine only reads `take_ended` while it is waiting on the cue;
/// `stop` must also discard an ended event that was not read yet.
pub trait NotificationPlayer {
    /// Start one play-through from the beginning
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Stop playback and rewind
    fn stop(&mut self);

    /// Returns true once for every play-through that ran to the end
    fn take_ended(&mut self) -> bool;
}

impl<P: NotificationPlayer + ?Sized> NotificationPlayer for Box<P> {
    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn take_ended(&mut self) -> bool {
        (**self).take_ended()
    }
}

/// Where the cue audio comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CueSource {
    Builtin(Sound),
    File(PathBuf),
}

impl CueSource {
    pub fn builtin(name: &str) -> Result<Self, PlaybackError> {
        assets::sound(name)
            .map(CueSource::Builtin)
            .ok_or_else(|| PlaybackError::UnknownSound(name.to_string()))
    }
}

/// Cue player backed by the default rodio output device.
///
/// The output stream is opened on the first `play` and kept for the session.
/// Every play-through gets its own sink; dropping the sink stops it.
pub struct RodioPlayer {
    source: CueSource,
    volume: f32,
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl RodioPlayer {
    pub fn new(source: CueSource, volume_percent: u8) -> Self {
        Self {
            source,
            volume: f32::from(volume_percent.min(100)) / 100.0,
            output: None,
            sink: None,
        }
    }

    fn open_sink(&mut self) -> Result<Sink, PlaybackError> {
        let output = match self.output.take() {
            Some(output) => output,
            None => {
                let output = OutputStream::try_default()?;
                info!("Opened default audio output");
                output
            }
        };
        let sink = Sink::try_new(&output.1);
        self.output = Some(output);
        Ok(sink?)
    }

    /// Block until the current play-through finishes
    pub fn wait(&self) {
        if let Some(sink) = &self.sink {
            sink.sleep_until_end();
        }
    }
}

impl NotificationPlayer for RodioPlayer {
    fn play(&mut self) -> Result<(), PlaybackError> {
        self.stop();
        let sink = self.open_sink()?;
        sink.set_volume(self.volume);

        match &self.source {
            CueSource::Builtin(Sound::Tones(notes)) => {
                for note in notes.iter() {
                    sink.append(
                        SineWave::new(note.frequency)
                            .take_duration(Duration::from_millis(note.millis))
                            .amplify(0.25),
                    );
                }
            }
            CueSource::File(path) => {
                let file = File::open(path).map_err(|source| PlaybackError::Open {
                    path: path.clone(),
                    source,
                })?;
                sink.append(Decoder::new(BufReader::new(file))?);
            }
        }

        debug!("Completion cue started");
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("Completion cue stopped");
        }
    }

    fn take_ended(&mut self) -> bool {
        if self.sink.as_ref().is_some_and(Sink::empty) {
            self.sink = None;
            return true;
        }
        false
    }
}

/// Player used with `--mute`: every cue fails so the engine falls back to
/// its silent hold.
#[derive(Debug, Default)]
pub struct MutedPlayer;

impl NotificationPlayer for MutedPlayer {
    fn play(&mut self) -> Result<(), PlaybackError> {
        Err(PlaybackError::Muted)
    }

    fn stop(&mut self) {}

    fn take_ended(&mut self) -> bool {
        false
    }
}

/// Send a desktop notification when the countdown reaches zero.
///
/// `show()` blocks on the notification daemon, so it runs on its own thread
/// and the event loop keeps ticking.
pub fn notify_timer_complete(preset: Preset) {
    std::thread::spawn(move || {
        let result = Notification::new()
            .summary("Hourglass")
            .body(&completion_body(preset))
            .appname("hourglass")
            .show();

        if let Err(e) = result {
            warn!(error = %e, "Failed to send desktop notification");
        }
    });
}

fn completion_body(preset: Preset) -> String {
    format!("{} timer complete!", preset.label())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{NotificationPlayer, PlaybackError};

    #[derive(Debug, Default)]
    pub struct Script {
        pub plays: u32,
        pub stops: u32,
        pub playing: bool,
        pub ended_pending: bool,
        /// Every play fails once this many have succeeded
        pub fail_after: Option<u32>,
    }

    /// In-memory player; clones share the same script so tests can keep a
    /// handle after moving one into the engine.
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedPlayer {
        script: Rc<RefCell<Script>>,
    }

    impl ScriptedPlayer {
        pub fn failing() -> Self {
            Self::failing_after(0)
        }

        pub fn failing_after(plays: u32) -> Self {
            let player = Self::default();
            player.script.borrow_mut().fail_after = Some(plays);
            player
        }

        /// Simulate the current play-through reaching its end
        pub fn finish_playback(&self) {
            let mut script = self.script.borrow_mut();
            if script.playing {
                script.playing = false;
                script.ended_pending = true;
            }
        }

        pub fn plays(&self) -> u32 {
            self.script.borrow().plays
        }

        pub fn stops(&self) -> u32 {
            self.script.borrow().stops
        }

        pub fn is_playing(&self) -> bool {
            self.script.borrow().playing
        }
    }

    impl NotificationPlayer for ScriptedPlayer {
        fn play(&mut self) -> Result<(), PlaybackError> {
            let mut script = self.script.borrow_mut();
            if script.fail_after.is_some_and(|n| script.plays >= n) {
                return Err(PlaybackError::UnknownSound("scripted".to_string()));
            }
            script.plays += 1;
            script.playing = true;
            script.ended_pending = false;
            Ok(())
        }

        fn stop(&mut self) {
            let mut script = self.script.borrow_mut();
            script.stops += 1;
            script.playing = false;
            script.ended_pending = false;
        }

        fn take_ended(&mut self) -> bool {
            std::mem::take(&mut self.script.borrow_mut().ended_pending)
        }
    }
}
