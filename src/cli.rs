//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.
//! CLI flags override values from the config file.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Touch-surface sync link for DAW remote control
#[derive(Parser, Debug, Default)]
#[command(name = "surface-link")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file path (default: surface-link.toml in the working directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// DAW host to connect to (overrides config)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// DAW port to connect to (overrides config)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Number of device slots to mirror (overrides config)
    #[arg(long, value_name = "COUNT")]
    pub devices: Option<usize>,
}

impl Cli {
    /// Fold CLI overrides into a loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.link.host = host.clone();
        }
        if let Some(port) = self.port {
            config.link.port = port;
        }
        if let Some(devices) = self.devices {
            config.surface.devices = devices;
        }
    }
}
