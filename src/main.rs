//! CLI driver for the experiment data gatherer.
//!
//! Registers the built-in demo probes, loads the layered configuration
//! (defaults, config.yaml, CLI args), and runs the gatherer until Ctrl-C.
//! Each stdin line fires one input-triggered export and is captured as the
//! `last_input` readout column.

mod probes;

use clap::Parser;
use color_eyre::Result;
use data_gatherer_config::{
    Args,
    Config,
};
use data_gatherer_core::{
    DataGatherer,
    ObjectRegistry,
};
use tokio::io::{
    AsyncBufReadExt as _,
    BufReader,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::new(args)?;

    let log_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "data_gatherer={log_level},data_gatherer_core={log_level},data_gatherer_config={log_level}"
        ))
        .init();

    color_eyre::install()?;

    let settings = config.gatherer_settings();
    info!(mode = %settings.mode, path = %settings.export_path.display(), "starting data gatherer");

    let mut registry = ObjectRegistry::new();
    probes::register_demo_probes(&mut registry);

    let mut gatherer = DataGatherer::new(settings, registry);
    for binding in &config.bindings {
        gatherer.add_binding(binding.clone());
    }

    if config.stdin_trigger {
        let readout = probes::LineReadout::default();
        gatherer.add_readout(readout.clone());
        let trigger = gatherer.trigger();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                readout.set(line);
                trigger.fire();
            }
        });
    }

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            token.cancel();
        }
    });

    gatherer.run(shutdown).await
}
