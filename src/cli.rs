// CLI commands

use crate::consensus::{NONCE_SPACE, SearchStatus, Target};
use crate::genesis::{
    CHAIN_GENESIS, ChainGenesis, GenesisMiner, MineOutcome, MinerConfig, MiningReport, NetworkProfile, Round,
    SearchResult,
};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(name = "hylium-genesis")]
#[command(about = "Mine and verify Hylium genesis blocks", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Options for the default `mine` command
    #[command(flatten)]
    pub mine: MineArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for genesis nonces (default)
    Mine(MineArgs),

    /// Rebuild the hard-coded chain genesis blocks and check their hashes
    Verify {
        /// Comma-separated networks to check
        #[arg(long, env = "HYLIUM_GENESIS_NETS", value_delimiter = ',')]
        networks: Vec<String>,
    },

    /// Print the network profile table
    Profiles,
}

#[derive(Args, Debug, Clone)]
pub struct MineArgs {
    /// Worker threads (default: one per CPU)
    #[arg(short, long, env = "HYLIUM_GENESIS_THREADS")]
    pub threads: Option<usize>,

    /// Nonce to start each round from
    #[arg(long, env = "HYLIUM_GENESIS_START", default_value = "0", value_parser = parse_u32)]
    pub nonce_start: u32,

    /// Stop each round below this nonce
    #[arg(long, default_value_t = NONCE_SPACE, value_parser = parse_u64)]
    pub nonce_limit: u64,

    /// Force extra-nonce mode on (nonzero) or off (0)
    #[arg(long, env = "HYLIUM_GENESIS_EXTRANONCE", value_parser = parse_flag)]
    pub extra_nonce: Option<bool>,

    /// First extra-nonce value when extra-nonce mode is on
    #[arg(long, env = "HYLIUM_GENESIS_EXTRANONCE_START", value_parser = parse_u32)]
    pub extra_nonce_start: Option<u32>,

    /// Comma-separated networks to mine
    #[arg(long, env = "HYLIUM_GENESIS_NETS", value_delimiter = ',')]
    pub networks: Vec<String>,

    /// Print each result as a JSON line instead of text
    #[arg(long)]
    pub json: bool,

    /// Suppress the live status line
    #[arg(short, long)]
    pub quiet: bool,
}

impl MineArgs {
    /// Resolve into the miner's configuration
    pub fn to_config(&self) -> MinerConfig {
        MinerConfig {
            // An explicit 0 still gets one worker
            threads: self.threads.map_or(0, |t| t.max(1)),
            nonce_start: self.nonce_start,
            nonce_limit: self.nonce_limit,
            extra_nonce: self.extra_nonce,
            extra_nonce_start: self.extra_nonce_start,
            networks: self.networks.iter().filter(|n| !n.is_empty()).cloned().collect(),
            ..MinerConfig::default()
        }
    }
}

/// Parse decimal or 0x-prefixed hex
fn parse_u64(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid integer '{}': {}", s, e))
}

fn parse_u32(s: &str) -> Result<u32, String> {
    let value = parse_u64(s)?;
    u32::try_from(value).map_err(|_| format!("{} does not fit in 32 bits", value))
}

/// Integer (nonzero = on) or true/false
fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => parse_u64(other).map(|v| v != 0),
    }
}

/// Progress and results on stdout, as text or JSON lines
struct ConsoleReport {
    json: bool,
    status_line: bool,
}

impl ConsoleReport {
    fn new(args: &MineArgs) -> Self {
        Self {
            json: args.json,
            status_line: !args.quiet && !args.json,
        }
    }
}

impl MiningReport for ConsoleReport {
    fn start(&mut self, profile: &NetworkProfile, target: &Target, threads: usize) {
        if self.json {
            return;
        }
        println!("== {} ==", profile.name);
        println!(
            " nTime={} bits=0x{:08x} target={} threads={}",
            profile.time,
            profile.bits,
            target.to_hex(),
            threads
        );
        if profile.uses_extra_nonce {
            println!(" extraNonce start={}", profile.extra_nonce_start);
        }
    }

    fn round(&mut self, _profile: &NetworkProfile, round: &Round) {
        if self.json {
            return;
        }
        println!(
            " extraNonce={} txhash={} merkle={}",
            round.extra_nonce, round.tx_hash, round.merkle_root
        );
    }

    fn status(&mut self, profile: &NetworkProfile, extra_nonce: u32, status: &SearchStatus) {
        if !self.status_line {
            return;
        }
        print!(
            "{} status: extraNonce={} total={} rate={:.0}/s max_nonce={}\r",
            profile.name, extra_nonce, status.total_hashes, status.hash_rate, status.max_nonce
        );
        let _ = io::stdout().flush();
    }

    fn finish(&mut self, _profile: &NetworkProfile, outcome: &MineOutcome) {
        if self.json {
            match outcome_json(outcome) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("failed to encode result: {}", e),
            }
            return;
        }

        match outcome {
            MineOutcome::Found(result) => print_result(result),
            MineOutcome::Exhausted { network, hashes } => {
                log::info!("{}: nonce space exhausted after {} hashes", network, hashes);
                println!();
                println!("No solution found for fixed coinbase; set HYLIUM_GENESIS_EXTRANONCE=1 to expand search.");
            }
        }
    }
}

/// One JSON line per finished network
fn outcome_json(outcome: &MineOutcome) -> serde_json::Result<String> {
    match outcome {
        MineOutcome::Found(result) => serde_json::to_string(result),
        MineOutcome::Exhausted { network, hashes } => serde_json::to_string(&serde_json::json!({
            "network": network,
            "exhausted": true,
            "hashes": hashes,
        })),
    }
}

fn print_result(result: &SearchResult) {
    // Ends the status line left open by `\r`
    println!();
    println!("Found genesis for {} in {:.2}s", result.network, result.elapsed_seconds);
    println!(" extraNonce={}", result.extra_nonce);
    println!(" nNonce={}", result.nonce);
    println!(" hashGenesisBlock={}", result.header_hash);
    println!(" merkleRoot={}", result.merkle_root);
    println!(" txhash={}", result.tx_hash);
    println!();
    println!(" nTime={} nNonce={} nBits=0x{:08x}", result.time, result.nonce, result.bits);
    println!(
        " assert(consensus.hashGenesisBlock == uint256{{\"{}\"}});",
        result.header_hash
    );
    println!(" assert(genesis.hashMerkleRoot == uint256{{\"{}\"}});", result.merkle_root);
    println!();
}

/// Handle CLI command
pub fn handle(cli: Cli) -> Result<(), String> {
    match cli.command.unwrap_or(Commands::Mine(cli.mine)) {
        Commands::Mine(args) => mine(&args),
        Commands::Verify { networks } => verify(&networks),
        Commands::Profiles => {
            profiles();
            Ok(())
        }
    }
}

fn mine(args: &MineArgs) -> Result<(), String> {
    let miner = GenesisMiner::new(args.to_config());
    let results = miner.run(&mut ConsoleReport::new(args));

    if results.is_empty() {
        return Err("no networks selected".to_string());
    }

    let mut failures = 0;
    for (network, outcome) in &results {
        if let Err(e) = outcome {
            eprintln!("{}: {}", network, e);
            failures += 1;
        }
    }

    if failures == results.len() {
        return Err(format!("mining failed for every selected network ({})", failures));
    }
    Ok(())
}

fn verify(networks: &[String]) -> Result<(), String> {
    let selected: Vec<&ChainGenesis> = if networks.is_empty() {
        CHAIN_GENESIS.iter().collect()
    } else {
        networks
            .iter()
            .filter(|n| !n.is_empty())
            .map(|n| ChainGenesis::find(n))
            .collect::<Result<_, _>>()
            .map_err(|e| e.to_string())?
    };

    let mut failures = Vec::new();
    for genesis in selected {
        match genesis.verify() {
            Ok(block) => {
                println!(
                    "{}: ok hash={} merkle={} nonce={}",
                    genesis.network,
                    block.hash(),
                    block.header.merkle_root,
                    block.header.nonce
                );
            }
            Err(e) => {
                println!("{}: FAILED {}", genesis.network, e);
                failures.push(genesis.network);
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("genesis verification failed: {}", failures.join(", ")))
    }
}

fn profiles() {
    for profile in NetworkProfile::table() {
        let extra = if profile.uses_extra_nonce {
            format!("extraNonce from {}", profile.extra_nonce_start)
        } else {
            "fixed coinbase".to_string()
        };
        println!(
            "{:<8} nTime={} bits=0x{:08x} {:<22} \"{}\"",
            profile.name, profile.time, profile.bits, extra, profile.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_u32("42"), Ok(42));
        assert_eq!(parse_u32("0x1d00ffff"), Ok(0x1d00ffff));
        assert_eq!(parse_u32("0XFF"), Ok(255));
        assert!(parse_u32("4294967296").is_err());
        assert!(parse_u32("abc").is_err());
        assert_eq!(parse_u64("4294967296"), Ok(NONCE_SPACE));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Ok(true));
        assert_eq!(parse_flag("0"), Ok(false));
        assert_eq!(parse_flag("7"), Ok(true));
        assert_eq!(parse_flag("TRUE"), Ok(true));
        assert_eq!(parse_flag("off"), Ok(false));
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_mine_args_from_flags() {
        let cli = Cli::try_parse_from([
            "hylium-genesis",
            "mine",
            "--threads",
            "0",
            "--nonce-start",
            "0x10",
            "--extra-nonce",
            "1",
            "--extra-nonce-start",
            "5",
            "--networks",
            "main,regtest",
        ])
        .unwrap();

        let Some(Commands::Mine(args)) = cli.command else {
            panic!("expected mine command");
        };
        let config = args.to_config();
        assert_eq!(config.threads, 1);
        assert_eq!(config.nonce_start, 16);
        assert_eq!(config.nonce_limit, NONCE_SPACE);
        assert_eq!(config.extra_nonce, Some(true));
        assert_eq!(config.extra_nonce_start, Some(5));
        assert_eq!(config.networks, vec!["main", "regtest"]);
    }

    #[test]
    fn test_default_command_is_mine() {
        let cli = Cli::try_parse_from(["hylium-genesis", "--nonce-limit", "100", "--quiet"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.mine.nonce_limit, 100);
        assert!(cli.mine.quiet);
    }

    #[test]
    fn test_env_fallback_and_flag_precedence() {
        // Only this test touches the environment
        unsafe {
            std::env::set_var("HYLIUM_GENESIS_START", "0x20");
            std::env::set_var("HYLIUM_GENESIS_NETS", "regtest,test4");
        }

        let from_env = Cli::try_parse_from(["hylium-genesis", "mine"]).unwrap();
        let Some(Commands::Mine(args)) = from_env.command else {
            panic!("expected mine command");
        };
        assert_eq!(args.nonce_start, 32);
        assert_eq!(args.to_config().networks, vec!["regtest", "test4"]);

        let from_flags =
            Cli::try_parse_from(["hylium-genesis", "--nonce-start", "5", "--networks", "main"]).unwrap();

        unsafe {
            std::env::remove_var("HYLIUM_GENESIS_START");
            std::env::remove_var("HYLIUM_GENESIS_NETS");
        }

        assert_eq!(from_flags.mine.nonce_start, 5);
        assert_eq!(from_flags.mine.networks, vec!["main"]);
    }

    #[test]
    fn test_exhausted_outcome_json() {
        let outcome = MineOutcome::Exhausted {
            network: "regtest".to_string(),
            hashes: 2,
        };
        let value: serde_json::Value = serde_json::from_str(&outcome_json(&outcome).unwrap()).unwrap();
        assert_eq!(value["network"], "regtest");
        assert_eq!(value["exhausted"], true);
        assert_eq!(value["hashes"], 2);
    }

    #[test]
    fn test_verify_every_network() {
        assert!(verify(&[]).is_ok());
        assert!(verify(&["bogus".to_string()]).is_err());
    }
}
