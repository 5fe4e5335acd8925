//! swipe-deck-replay - drive a scripted tracking session through the gesture pipeline

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use swipe_deck::integration::scripted::{ScriptedClassifier, SessionScript};
use swipe_deck::{ChannelSink, GestureService, PipelineBuilder, PipelineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Session script (TOML) listing frames and gesture observations.
    #[arg(long)]
    script: PathBuf,
    /// Pipeline configuration (TOML). Defaults apply when omitted.
    #[arg(long, env = "SWIPE_DECK_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::from_env()?,
    };
    let script = SessionScript::load(&args.script)?;
    let (source, observations) = script
        .compile()
        .with_context(|| format!("compiling {}", args.script.display()))?;

    let (commands_tx, commands_rx) = crossbeam_channel::unbounded();
    let pipeline = PipelineBuilder::from_config(config.clone()).build(
        |_| ScriptedClassifier::new(observations.clone()),
        ChannelSink::new(commands_tx),
    )?;

    let service = GestureService::start(source.lossless(), pipeline, config.queue_capacity)?;
    let summary = service.shutdown();

    for command in commands_rx.try_iter() {
        println!("{command}");
    }
    eprintln!(
        "{} frames, {} missed, {} commands",
        summary.frames, summary.missed_frames, summary.commands
    );
    Ok(())
}
