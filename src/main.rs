// Hylium genesis miner - CLI

use clap::Parser;
use hylium_genesis::{Cli, cli};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = cli::handle(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
