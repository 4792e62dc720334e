mod candump;
mod config;
mod replay;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use config::ReplayConfig;
use replay::ReplaySession;

#[derive(Parser)]
#[command(name = "idrive-replay")]
#[command(author, version, about = "Decode recorded iDrive controller CAN traffic")]
struct Cli {
    /// YAML config file (defaults to ./idrive.yml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only decode this CAN identifier (hex)
    #[arg(long, value_name = "ID", value_parser = parse_hex_id)]
    can_id: Option<u32>,

    /// Only decode records from this interface
    #[arg(long)]
    interface: Option<String>,

    /// Show the raw frame alongside each event
    #[arg(long)]
    hex: bool,

    /// candump log to replay; reads stdin when omitted
    input: Option<PathBuf>,
}

fn parse_hex_id(value: &str) -> Result<u32, String> {
    let digits = value.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid CAN identifier {value:?}: {e}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("idrive_replay=info".parse()?)
                .add_directive("idrive_decoder=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(ReplayConfig::default_path);
    let mut config = ReplayConfig::load(&config_path)?;
    if cli.can_id.is_some() {
        config.can_id = cli.can_id;
    }
    if cli.interface.is_some() {
        config.interface = cli.interface.clone();
    }

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut session = ReplaySession::new(config, cli.hex);
    session.run(input, &mut io::stdout().lock())?;

    let stats = session.stats();
    info!(
        "{} lines, {} frames decoded, {} skipped, {} malformed, {} events",
        stats.lines, stats.frames, stats.skipped, stats.malformed, stats.events
    );

    Ok(())
}
