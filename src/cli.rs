use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::models::Preset;

#[derive(Parser)]
#[command(name = "hourglass")]
#[command(about = "Single-screen countdown timer with an audible alarm", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Initial preset in minutes (5, 30 or 60)
    #[arg(short, long, default_value_t = 30, value_parser = parse_preset_minutes)]
    pub preset: u32,

    /// Audio file to play on completion instead of the built-in chimes
    #[arg(long)]
    pub sound: Option<PathBuf>,

    /// Cue volume in percent
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: u8,

    /// Never play audio
    #[arg(long)]
    pub mute: bool,

    /// Skip the desktop notification on completion
    #[arg(long)]
    pub no_notify: bool,

    /// Seconds a completion without audio stays on screen before resetting
    #[arg(long, default_value_t = 5)]
    pub hold: u64,

    /// Terminal title restored on exit
    #[arg(long, default_value = "hourglass")]
    pub title: String,

    /// Log file path (defaults to ~/.hourglass/hourglass.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Launch the countdown screen (default)
    Run,

    /// Play the completion cue once and exit
    Chime,
}

fn parse_preset_minutes(value: &str) -> Result<u32, String> {
    let minutes: u32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of minutes"))?;
    Preset::from_minutes(minutes)
        .map(Preset::minutes)
        .ok_or_else(|| format!("no {minutes} minute preset (choose 5, 30 or 60)"))
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }

    pub fn initial_preset(&self) -> Preset {
        Preset::from_minutes(self.preset).unwrap_or_default()
    }

    pub fn silent_hold(&self) -> Duration {
        Duration::from_secs(self.hold)
    }

    /// Log file location; logs live next to the user's home like other dotfiles
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".hourglass").join("hourglass.log")
        })
    }

    /// Tracing filter directive based on the verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["hourglass"]).unwrap();
        assert!(cli.command() == Commands::Run);
        assert_eq!(cli.initial_preset(), Preset::ThirtyMinutes);
        assert_eq!(cli.volume, 80);
        assert_eq!(cli.silent_hold(), Duration::from_secs(5));
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn preset_must_be_one_of_the_fixed_durations() {
        let cli = Cli::try_parse_from(["hourglass", "--preset", "5"]).unwrap();
        assert_eq!(cli.initial_preset(), Preset::FiveMinutes);
        assert!(Cli::try_parse_from(["hourglass", "--preset", "45"]).is_err());
        assert!(Cli::try_parse_from(["hourglass", "-p", "soon"]).is_err());
    }

    #[test]
    fn volume_is_bounded() {
        assert!(Cli::try_parse_from(["hourglass", "--volume", "101"]).is_err());
    }

    #[test]
    fn chime_subcommand() {
        let cli = Cli::try_parse_from(["hourglass", "--mute", "chime"]).unwrap();
        assert!(cli.command() == Commands::Chime);
        assert!(cli.mute);
    }

    #[test]
    fn explicit_log_file_wins() {
        let cli = Cli::try_parse_from(["hourglass", "--log-file", "/tmp/h.log", "-v"]).unwrap();
        assert_eq!(cli.log_path(), PathBuf::from("/tmp/h.log"));
        assert_eq!(cli.log_level(), "debug");
    }
}
