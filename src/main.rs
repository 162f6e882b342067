use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

mod assets;
mod cli;
mod engine;
mod logging;
mod models;
mod notification;
mod ticker;
mod tui;

use cli::{Cli, Commands};
use engine::TimerEngine;
use notification::{CueSource, MutedPlayer, NotificationPlayer, RodioPlayer};
use tui::app::App;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let _log_guard = logging::init(&cli.log_path(), cli.log_level());
    info!(
        version = env!("CARGO_PKG_VERSION"),
        preset = %cli.initial_preset(),
        "Starting hourglass"
    );

    match cli.command() {
        Commands::Run => {
            let engine = TimerEngine::new(build_player(&cli)?, cli.initial_preset())
                .with_silent_hold(cli.silent_hold());
            let app = App::new(engine, cli.title.clone(), !cli.no_notify);
            tui::run_tui(app).context("terminal UI failed")?;
        }
        Commands::Chime => {
            if cli.mute {
                anyhow::bail!("audio is muted, nothing to play");
            }
            let source = cue_source(&cli)?;
            let mut player = RodioPlayer::new(source, cli.volume);
            player.play().context("failed to play completion cue")?;
            player.wait();
            println!("Chime played");
        }
    }

    info!("Exiting");
    Ok(())
}

fn cue_source(cli: &Cli) -> anyhow::Result<CueSource> {
    match &cli.sound {
        Some(path) => Ok(CueSource::File(path.clone())),
        None => CueSource::builtin(assets::COMPLETION_SOUND).context("built-in cue missing"),
    }
}

fn build_player(cli: &Cli) -> anyhow::Result<Box<dyn NotificationPlayer>> {
    if cli.mute {
        warn!("Audio muted, completion will be silent");
        return Ok(Box::new(MutedPlayer));
    }
    Ok(Box::new(RodioPlayer::new(cue_source(cli)?, cli.volume)))
}
