//! Static resource tables for icons and sounds, keyed by name

use phf::phf_map;

/// One tone of a synthesized cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency: f32,
    pub millis: u64,
}

/// A playable sound resource
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sound {
    /// Sequence of sine tones generated at play time
    Tones(&'static [Note]),
}

const CHIMES: &[Note] = &[
    Note { frequency: 1046.5, millis: 220 },
    Note { frequency: 1318.5, millis: 220 },
    Note { frequency: 1568.0, millis: 220 },
    Note { frequency: 2093.0, millis: 600 },
];

pub const COMPLETION_SOUND: &str = "chimes";

pub static SOUNDS: phf::Map<&'static str, Sound> = phf_map! {
    "chimes" => Sound::Tones(CHIMES),
};

pub static ICONS: phf::Map<&'static str, &'static str> = phf_map! {
    "play" => "▶",
    "pause" => "⏸",
    "stop" => "■",
    "refresh" => "↻",
    "hourglass" => "⧗",
};

/// Look up an icon glyph, falling back to a blank so views never fail
pub fn icon(name: &str) -> &'static str {
    ICONS.get(name).copied().unwrap_or(" ")
}

pub fn sound(name: &str) -> Option<Sound> {
    SOUNDS.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_sound_is_registered() {
        match sound(COMPLETION_SOUND) {
            Some(Sound::Tones(notes)) => assert!(!notes.is_empty()),
            None => panic!("missing completion sound"),
        }
        assert!(sound("klaxon").is_none());
    }

    #[test]
    fn unknown_icon_is_blank() {
        assert_eq!(icon("play"), "▶");
        assert_eq!(icon("nope"), " ");
    }
}
