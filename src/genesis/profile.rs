// Per-network genesis parameters

use crate::error::{GenesisError, Result};

/// Main network timestamp, 2025-12-16 12:00:00 UTC
pub const MAIN_TIME: u32 = 1765886400;
/// Regtest keeps Bitcoin's regtest timestamp
pub const REGTEST_TIME: u32 = 1296688602;
/// Difficulty-1 compact target
pub const BITS_STANDARD: u32 = 0x1d00ffff;
/// Easy target for test and development chains
pub const BITS_EASY: u32 = 0x207fffff;

/// Static genesis configuration for one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    /// Network identifier (`main`, `testnet`, `test4`, `regtest`)
    pub name: String,
    /// Text embedded in the coinbase scriptSig
    pub message: String,
    /// Header timestamp
    pub time: u32,
    /// Compact target
    pub bits: u32,
    /// Whether the scriptSig carries a 4-byte extra-nonce
    pub uses_extra_nonce: bool,
    /// First extra-nonce tried
    pub extra_nonce_start: u32,
}

impl NetworkProfile {
    pub fn new(name: &str, message: &str, time: u32, bits: u32) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
            time,
            bits,
            uses_extra_nonce: false,
            extra_nonce_start: 0,
        }
    }

    /// Enable the extra-nonce field starting at `start`
    pub fn with_extra_nonce(mut self, start: u32) -> Self {
        self.uses_extra_nonce = true;
        self.extra_nonce_start = start;
        self
    }

    /// The fixed network table
    pub fn table() -> Vec<NetworkProfile> {
        vec![
            NetworkProfile::new("main", "Hylium 2025-12-16: Verify, don't trust.", MAIN_TIME, BITS_STANDARD)
                .with_extra_nonce(0),
            NetworkProfile::new("testnet", "Hylium testnet 2025-12-16: break safely.", MAIN_TIME, BITS_EASY),
            NetworkProfile::new("test4", "Hylium test4 2025-12-16: staging chain.", MAIN_TIME, BITS_EASY),
            NetworkProfile::new("regtest", "Hylium regtest: local sandbox.", REGTEST_TIME, BITS_EASY),
        ]
    }

    /// Look up a profile by name
    pub fn by_name(name: &str) -> Result<NetworkProfile> {
        Self::table()
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| GenesisError::UnknownNetwork(name.to_string()))
    }

    /// Profiles named in `filter`, in table order; an empty filter selects all
    ///
    /// Names not in the table are logged and skipped.
    pub fn select(filter: &[String]) -> Vec<NetworkProfile> {
        let table = Self::table();

        for name in filter {
            if !table.iter().any(|p| &p.name == name) {
                log::warn!("{}", GenesisError::UnknownNetwork(name.clone()));
            }
        }

        table
            .into_iter()
            .filter(|p| filter.is_empty() || filter.contains(&p.name))
            .collect()
    }

    /// Apply configuration overrides
    ///
    /// The start override only matters once extra-nonce mode is on.
    pub fn with_overrides(&self, extra_nonce: Option<bool>, extra_nonce_start: Option<u32>) -> Self {
        let mut profile = self.clone();
        if let Some(enabled) = extra_nonce {
            profile.uses_extra_nonce = enabled;
        }
        if profile.uses_extra_nonce {
            if let Some(start) = extra_nonce_start {
                profile.extra_nonce_start = start;
            }
        }
        profile
    }
}
