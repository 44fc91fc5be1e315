//! surface-link - headless sync runner
//!
//! Usage:
//!   surface-link                              Connect using surface-link.toml / defaults
//!   surface-link --host 192.168.2.102        Override the DAW host
//!   surface-link --verbose                   Debug logging
//!
//! Runs the sync core without a UI: connects to the DAW, mirrors state and
//! logs link activity until SIGINT/SIGTERM.

use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use surface_link::cli::Cli;
use surface_link::config::{self, Config};
use surface_link::dispatch::Dispatcher;
use surface_link::link::LinkManager;
use surface_link::state::StateRegistry;
use surface_link::{logging, outbound, Result, SurfaceError};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let mut config = config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| SurfaceError::Runtime { source: e })?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    let (outbound_tx, outbound_rx) = outbound::channel();
    let registry = Arc::new(StateRegistry::new(
        config.surface.devices,
        config.surface.controls_per_device,
        outbound_tx,
    ));
    info!(
        "mirroring {} devices x {} controls from {}:{}",
        config.surface.devices, config.surface.controls_per_device,
        config.link.host, config.link.port
    );

    let link = LinkManager::new(config.link, Dispatcher::new(registry), outbound_rx);
    let mut status = link.status();

    // Log link transitions; nothing else consumes them in headless mode
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            info!("link {:?}", *status.borrow());
        }
    });

    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_signal_handler(shutdown.clone());

    link.run(shutdown).await
}

fn spawn_signal_handler(shutdown: Arc<AtomicBool>) {
    #[cfg(unix)]
    tokio::spawn(async move {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => return,
            };
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = tokio::signal::ctrl_c() => {},
        }
        info!("shutdown requested");
        shutdown.store(true, Ordering::SeqCst);
    });

    #[cfg(not(unix))]
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown requested");
        shutdown.store(true, Ordering::SeqCst);
    });
}
