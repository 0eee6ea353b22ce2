use anyhow::{Context, Error, Result};
use fix2pose_core::node::{params_file_from_args, read_events, write_outputs};
use fix2pose_core::{ChannelEmitter, Dispatcher, Emitters, FusionConfig, FusionService};
use log::info;
use tokio::io::BufReader;
use tokio::sync::mpsc;

/// Queue depth of the inbound event channel
const EVENT_QUEUE_DEPTH: usize = 1000;

fn load_config() -> Result<FusionConfig> {
    match params_file_from_args(std::env::args().skip(1))? {
        Some(path) => FusionConfig::from_file(&path)
            .with_context(|| format!("loading parameters from {}", path.display())),
        None => {
            info!("no parameter file given, using defaults");
            Ok(FusionConfig::default())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Initializing fix2pose node...");
    let config = load_config()?;
    config.log_parameters();

    let (pose_tx, pose_rx) = mpsc::unbounded_channel();
    let (tf_tx, tf_rx) = mpsc::unbounded_channel();
    let service = FusionService::from_config(
        &config,
        Emitters::from_channels(ChannelEmitter::new(pose_tx, tf_tx)),
    )
    .context("building fusion service")?;

    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let writer = tokio::spawn(write_outputs(tokio::io::stdout(), pose_rx, tf_rx));
    let reader = tokio::spawn(read_events(BufReader::new(tokio::io::stdin()), event_tx));

    info!("fix2pose node initialized, reading events from stdin");
    let stats = Dispatcher::new(service, event_rx).run().await;

    // The dispatcher has dropped the emitters, so the writer drains and stops
    let read = reader.await.context("input task panicked")?;
    let written = writer.await.context("output task panicked")?;
    let input = read.context("reading events from stdin")?;
    let lines = written.context("writing outputs to stdout")?;

    info!(
        "fix2pose node finished after {} fixes ({} events read, {} lines skipped, {} lines written)",
        stats.fixes, input.events, input.skipped, lines
    );
    Ok(())
}
