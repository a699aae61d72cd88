use clap::Parser;
use std::path::PathBuf;

/// Serves the Snap checkout demo page.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// TOML file with server, gateway and transaction settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// dotenv file to load before reading the environment (default: ./.env if present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Port to listen on, overrides PORT and the config file
    #[arg(short, long)]
    pub port: Option<u16>,
}
