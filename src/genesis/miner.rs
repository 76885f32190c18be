// Genesis mining driver: extra-nonce rounds around the parallel nonce search

use super::{GenesisBuilder, NetworkProfile};
use crate::consensus::{NONCE_SPACE, NonceRange, NonceSearch, SearchOutcome, SearchStatus, Target};
use crate::core::{Block, Hash256};
use crate::error::{GenesisError, Result};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Miner settings, after flag/environment resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerConfig {
    /// Worker threads; 0 means one per CPU
    pub threads: usize,
    /// First nonce of every round
    pub nonce_start: u32,
    /// Exclusive upper bound on nonces, at most 2^32
    pub nonce_limit: u64,
    /// Force extra-nonce mode on or off
    pub extra_nonce: Option<bool>,
    /// First extra-nonce when extra-nonce mode is on
    pub extra_nonce_start: Option<u32>,
    /// Network names to mine; empty means all
    pub networks: Vec<String>,
    /// Telemetry cadence
    pub report_interval: Duration,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            nonce_start: 0,
            nonce_limit: NONCE_SPACE,
            extra_nonce: None,
            extra_nonce_start: None,
            networks: Vec::new(),
            report_interval: Duration::from_secs(1),
        }
    }
}

/// One coinbase variant about to be searched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub extra_nonce: u32,
    pub tx_hash: Hash256,
    pub merkle_root: Hash256,
}

/// A mined genesis, ready to be pasted into chain parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub network: String,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    /// Zero when the coinbase carries no extra-nonce
    pub extra_nonce: u32,
    pub header_hash: Hash256,
    pub merkle_root: Hash256,
    pub tx_hash: Hash256,
    pub hashes: u64,
    pub elapsed_seconds: f64,
}

/// How mining one network ended
#[derive(Debug, Clone, PartialEq)]
pub enum MineOutcome {
    Found(SearchResult),
    /// Fixed coinbase and every nonce tried
    Exhausted { network: String, hashes: u64 },
}

/// Progress sink for the mining driver
pub trait MiningReport {
    /// A network's search is starting
    fn start(&mut self, _profile: &NetworkProfile, _target: &Target, _threads: usize) {}

    /// A new coinbase variant is about to be searched
    fn round(&mut self, _profile: &NetworkProfile, _round: &Round) {}

    /// Periodic telemetry from the running search
    fn status(&mut self, _profile: &NetworkProfile, _extra_nonce: u32, _status: &SearchStatus) {}

    /// A network's search ended, before the next network starts
    fn finish(&mut self, _profile: &NetworkProfile, _outcome: &MineOutcome) {}
}

/// Report sink that discards everything
impl MiningReport for () {}

/// Mines genesis blocks for a list of network profiles, one at a time
#[derive(Debug, Clone)]
pub struct GenesisMiner {
    config: MinerConfig,
}

impl GenesisMiner {
    pub fn new(config: MinerConfig) -> Self {
        Self { config }
    }

    /// Mine every selected network in table order
    ///
    /// A failure on one network does not stop the others.
    pub fn run(&self, report: &mut dyn MiningReport) -> Vec<(String, Result<MineOutcome>)> {
        NetworkProfile::select(&self.config.networks)
            .into_iter()
            .map(|profile| {
                let outcome = self.mine(&profile, report);
                match &outcome {
                    Ok(mined) => report.finish(&profile, mined),
                    Err(e) => log::error!("{}: {}", profile.name, e),
                }
                (profile.name, outcome)
            })
            .collect()
    }

    /// Mine one network's genesis block
    ///
    /// With a fixed coinbase the search ends after one pass over the nonce
    /// range. In extra-nonce mode every exhausted pass bumps the extra-nonce
    /// (wrapping at 2^32) and starts over.
    pub fn mine(&self, profile: &NetworkProfile, report: &mut dyn MiningReport) -> Result<MineOutcome> {
        let range = NonceRange::new(self.config.nonce_start, self.config.nonce_limit);
        if range.is_empty() {
            return Err(GenesisError::EmptyNonceRange {
                start: range.start,
                end: range.end,
            });
        }

        let profile = profile.with_overrides(self.config.extra_nonce, self.config.extra_nonce_start);
        let builder = GenesisBuilder::new(&profile)?;
        let target = Target::from_bits(profile.bits);
        let search = NonceSearch::new(target, self.config.threads)
            .with_report_interval(self.config.report_interval);

        log::info!(
            "mining {} genesis: bits=0x{:08x} threads={} nonces=[{}, {})",
            profile.name,
            profile.bits,
            search.threads(),
            range.start,
            range.end
        );
        report.start(&profile, &target, search.threads());

        let started = Instant::now();
        let mut total_hashes = 0u64;
        let mut extra_nonce = profile.extra_nonce_start;

        loop {
            let coinbase = builder.coinbase(profile.uses_extra_nonce.then_some(extra_nonce));
            let round = Round {
                extra_nonce,
                tx_hash: coinbase.txid(),
                merkle_root: Block::calculate_merkle_root(std::slice::from_ref(&coinbase)),
            };
            report.round(&profile, &round);

            let template = builder.header(round.merkle_root, range.start);
            let outcome = search.run(&template, range, &mut |status: &SearchStatus| {
                report.status(&profile, extra_nonce, status)
            });
            total_hashes += outcome.stats().hashes;

            match outcome {
                SearchOutcome::Found { nonce, hash, .. } => {
                    return Ok(MineOutcome::Found(SearchResult {
                        network: profile.name.clone(),
                        time: profile.time,
                        bits: profile.bits,
                        nonce,
                        extra_nonce: if profile.uses_extra_nonce { extra_nonce } else { 0 },
                        header_hash: hash,
                        merkle_root: round.merkle_root,
                        tx_hash: round.tx_hash,
                        hashes: total_hashes,
                        elapsed_seconds: started.elapsed().as_secs_f64(),
                    }));
                }
                SearchOutcome::Exhausted { stats } => {
                    log::debug!(
                        "{} extraNonce={} exhausted after {} hashes ({:.0} H/s)",
                        profile.name,
                        extra_nonce,
                        stats.hashes,
                        stats.hash_rate()
                    );
                    if !profile.uses_extra_nonce {
                        return Ok(MineOutcome::Exhausted {
                            network: profile.name.clone(),
                            hashes: total_hashes,
                        });
                    }
                    extra_nonce = extra_nonce.wrapping_add(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::BITS_STANDARD;

    /// Records every callback
    #[derive(Default)]
    struct Recorder {
        started: Vec<String>,
        rounds: Vec<Round>,
        events: Vec<String>,
    }

    impl MiningReport for Recorder {
        fn start(&mut self, profile: &NetworkProfile, _target: &Target, _threads: usize) {
            self.started.push(profile.name.clone());
            self.events.push(format!("start {}", profile.name));
        }

        fn round(&mut self, _profile: &NetworkProfile, round: &Round) {
            self.rounds.push(*round);
        }

        fn finish(&mut self, profile: &NetworkProfile, outcome: &MineOutcome) {
            let kind = match outcome {
                MineOutcome::Found(_) => "found",
                MineOutcome::Exhausted { .. } => "exhausted",
            };
            self.events.push(format!("{} {}", kind, profile.name));
        }
    }

    fn config(threads: usize, nonce_limit: u64) -> MinerConfig {
        MinerConfig {
            threads,
            nonce_limit,
            ..MinerConfig::default()
        }
    }

    fn regtest() -> NetworkProfile {
        NetworkProfile::by_name("regtest").unwrap()
    }

    fn found(outcome: MineOutcome) -> SearchResult {
        match outcome {
            MineOutcome::Found(result) => result,
            other => panic!("expected a solution, got {other:?}"),
        }
    }

    #[test]
    fn test_single_thread_regtest_finds_lowest_nonce() {
        let result = found(GenesisMiner::new(config(1, NONCE_SPACE)).mine(&regtest(), &mut ()).unwrap());
        assert_eq!(result.nonce, 2);
        assert_eq!(result.extra_nonce, 0);
        assert_eq!(
            result.merkle_root.to_hex(),
            "348a580fe27f335304305faa3aa108ea85f1036ffc0ee6ee9f087bbf7e023ecf"
        );
        assert_eq!(result.tx_hash, result.merkle_root);
        assert_eq!(result.hashes, 3);
    }

    #[test]
    fn test_found_result_rebuilds() {
        let result = found(GenesisMiner::new(config(4, NONCE_SPACE)).mine(&regtest(), &mut ()).unwrap());
        let block = GenesisBuilder::new(&regtest()).unwrap().block(None, result.nonce);
        assert_eq!(block.hash(), result.header_hash);
        assert!(Target::from_bits(result.bits).is_met_by(&result.header_hash));
    }

    #[test]
    fn test_fixed_coinbase_exhausts() {
        // Nonces 0 and 1 both miss the regtest target
        let outcome = GenesisMiner::new(config(2, 2)).mine(&regtest(), &mut ()).unwrap();
        assert_eq!(
            outcome,
            MineOutcome::Exhausted {
                network: "regtest".to_string(),
                hashes: 2
            }
        );
    }

    #[test]
    fn test_difficulty_one_small_range_exhausts() {
        let profile = NetworkProfile::new("custom", "no luck here", 1765886400, BITS_STANDARD);
        let outcome = GenesisMiner::new(config(3, 64)).mine(&profile, &mut ()).unwrap();
        assert!(matches!(outcome, MineOutcome::Exhausted { hashes: 64, .. }));
    }

    #[test]
    fn test_extra_nonce_rolls_until_found() {
        let miner = GenesisMiner::new(MinerConfig {
            extra_nonce: Some(true),
            ..config(1, 1)
        });
        let mut recorder = Recorder::default();
        let result = found(miner.mine(&regtest(), &mut recorder).unwrap());

        assert_eq!(result.nonce, 0);
        assert_eq!(result.extra_nonce, 2);
        assert_eq!(
            result.tx_hash.to_hex(),
            "a7d741e055fbff31877dd181202ca0f287cd4e6d2cc05341aa163eb7fe170dc1"
        );
        assert_eq!(result.hashes, 3);

        let extra_nonces: Vec<u32> = recorder.rounds.iter().map(|r| r.extra_nonce).collect();
        assert_eq!(extra_nonces, vec![0, 1, 2]);
        assert_ne!(recorder.rounds[0].merkle_root, recorder.rounds[1].merkle_root);
    }

    #[test]
    fn test_extra_nonce_start_override() {
        let miner = GenesisMiner::new(MinerConfig {
            extra_nonce: Some(true),
            extra_nonce_start: Some(3),
            ..config(1, 1)
        });
        let result = found(miner.mine(&regtest(), &mut ()).unwrap());
        assert_eq!(result.extra_nonce, 3);
    }

    #[test]
    fn test_nonce_start_offset() {
        let miner = GenesisMiner::new(MinerConfig {
            nonce_start: 3,
            ..config(1, NONCE_SPACE)
        });
        let result = found(miner.mine(&regtest(), &mut ()).unwrap());
        assert!(result.nonce >= 3);
    }

    #[test]
    fn test_run_continues_past_exhausted_network() {
        let miner = GenesisMiner::new(MinerConfig {
            networks: vec!["testnet".to_string(), "regtest".to_string()],
            ..config(1, 2)
        });
        let mut recorder = Recorder::default();
        let results = miner.run(&mut recorder);

        assert_eq!(recorder.started, vec!["testnet", "regtest"]);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(_, outcome)| outcome.is_ok()));
    }

    #[test]
    fn test_each_network_finishes_before_the_next_starts() {
        // testnet passes at nonce 0, regtest misses nonces 0 and 1
        let miner = GenesisMiner::new(MinerConfig {
            networks: vec!["testnet".to_string(), "regtest".to_string()],
            ..config(1, 2)
        });
        let mut recorder = Recorder::default();
        miner.run(&mut recorder);

        assert_eq!(
            recorder.events,
            vec!["start testnet", "found testnet", "start regtest", "exhausted regtest"]
        );
    }

    #[test]
    fn test_empty_nonce_range_is_rejected() {
        let miner = GenesisMiner::new(MinerConfig {
            nonce_start: 100,
            extra_nonce: Some(true),
            ..config(1, 50)
        });
        let mut recorder = Recorder::default();
        assert_eq!(
            miner.mine(&regtest(), &mut recorder),
            Err(GenesisError::EmptyNonceRange { start: 100, end: 50 })
        );
        assert!(recorder.rounds.is_empty());

        let at_limit = GenesisMiner::new(MinerConfig {
            nonce_start: 7,
            ..config(1, 7)
        });
        assert!(at_limit.mine(&regtest(), &mut ()).is_err());
    }

    #[test]
    fn test_result_serializes_display_hex() {
        let result = found(GenesisMiner::new(config(1, NONCE_SPACE)).mine(&regtest(), &mut ()).unwrap());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["network"], "regtest");
        assert_eq!(json["nonce"], 2);
        assert_eq!(json["merkle_root"], "348a580fe27f335304305faa3aa108ea85f1036ffc0ee6ee9f087bbf7e023ecf");
    }
}
