use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "intake-sim")]
#[command(about = "Payment transaction intake simulator", long_about = None)]
pub struct Cli {
    /// Override the HTTP listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the snapshot file location
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Serve HTTP without the interactive console
    #[arg(long)]
    pub headless: bool,
}
