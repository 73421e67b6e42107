//! `genload` — run one synthetic-traffic simulation and write its report.
//!
//! Emitters publish into an in-process relay queue (see [`relay`]), so a run
//! needs nothing outside this process.  Ctrl-C stops the emitters early; the
//! partial report is still written.

mod cli;
mod relay;

#[cfg(test)]
mod tests;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gl_core::RunConfig;
use gl_emitter::ChannelPublisher;
use gl_output::ReportOutputObserver;
use gl_sim::CoordinatorBuilder;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = RunConfig::try_from(cli.resolve_settings()?).context("invalid run configuration")?;
    info!(%config, participants = cli.participants, "configuration resolved");

    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("creating output directory {}", cli.output_dir.display()))?;
    let writers = cli::writers(cli.format, &cli.output_dir)?;

    let (tx, relay) = relay::spawn_relay(cli.relay_capacity);
    let coordinator =
        CoordinatorBuilder::new(config, cli.participants, ChannelPublisher::factory(tx)).build()?;

    let stop = coordinator.stop_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; stopping emitters");
            stop.stop();
        }
    });

    let mut observer = ReportOutputObserver::new(writers);
    let report = coordinator.run(&mut observer).await?;
    ctrl_c.abort();

    let relayed = relay.await.context("relay task failed")?;
    info!(
        messages = relayed.messages,
        bytes    = relayed.bytes,
        senders  = relayed.senders,
        "relay drained"
    );

    if let Some(e) = observer.take_error() {
        return Err(anyhow::Error::new(e)
            .context(format!("writing report to {}", cli.output_dir.display())));
    }
    println!("{report}");
    Ok(())
}
