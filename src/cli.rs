use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qrlog")]
#[command(about = "A terminal QR code scanner with a persistent history")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the interactive scanner against the live camera feed
    Watch(WatchArgs),

    /// Decode QR codes from image files and record them
    Decode(DecodeArgs),

    /// List recorded scans, newest first
    History(HistoryArgs),
}

#[derive(Parser)]
pub struct WatchArgs {
    /// Camera index to open
    #[arg(long)]
    pub camera: Option<u32>,

    /// Sampling rate in ticks per second
    #[arg(long)]
    pub rate: Option<u32>,

    /// Print diagnostics collected during the session on exit
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

#[derive(Parser)]
pub struct DecodeArgs {
    /// Image files to decode
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Output as JSON instead of plain lines
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Decode only, without recording payloads to history
    #[arg(long, default_value_t = false)]
    pub no_store: bool,
}

#[derive(Parser)]
pub struct HistoryArgs {
    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Show only the most recent N scans
    #[arg(long)]
    pub limit: Option<usize>,
}
