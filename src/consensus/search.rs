// Parallel nonce search over a block header
//
// Each worker owns one residue class of the nonce range
// (start + worker, start + worker + threads, ...), so no nonce is hashed
// twice and the hot loop shares nothing but a relaxed "found" flag.
//
// The calling thread supervises: it wakes every 20 ms to see whether a
// nonce was claimed or every worker has finished, and samples telemetry
// once per report interval (1 s by default).

use crate::consensus::Target;
use crate::core::{BlockHeader, HEADER_SIZE, Hash256, NONCE_OFFSET, hash256};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Size of the header nonce space
pub const NONCE_SPACE: u64 = 1 << 32;

/// Hashes a worker accumulates before publishing to the shared counters
const FLUSH_EVERY: u64 = 4096;

/// How often the supervisor wakes to check for completion
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Half-open nonce range `[start, end)`, `end` at most 2^32
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceRange {
    pub start: u32,
    pub end: u64,
}

impl NonceRange {
    pub fn new(start: u32, end: u64) -> Self {
        Self {
            start,
            end: end.min(NONCE_SPACE),
        }
    }

    /// Every nonce from `start` to `u32::MAX`
    pub fn from_start(start: u32) -> Self {
        Self::new(start, NONCE_SPACE)
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nonces owned by `worker` out of `workers`
    pub fn partition(self, worker: usize, workers: usize) -> impl Iterator<Item = u32> {
        let first = self.start as u64 + worker as u64;
        (first..self.end.max(first))
            .step_by(workers.max(1))
            .map(|nonce| nonce as u32)
    }
}

/// Live telemetry sampled by the supervisor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStatus {
    /// Hashes computed so far
    pub total_hashes: u64,
    /// Hash rate over the last report interval
    pub hash_rate: f64,
    /// Highest nonce any worker has published
    pub max_nonce: u32,
}

/// Totals for a finished search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub hashes: u64,
    pub max_nonce: u32,
    pub elapsed: Duration,
}

impl SearchStats {
    /// Calculate hash rate (hashes per second)
    pub fn hash_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.hashes as f64 / secs
        } else {
            0.0
        }
    }
}

/// Terminal state of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A worker found a header hash at or below the target
    Found {
        nonce: u32,
        hash: Hash256,
        stats: SearchStats,
    },
    /// Every nonce in the range was tried without success
    Exhausted { stats: SearchStats },
}

impl SearchOutcome {
    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Found { stats, .. } | SearchOutcome::Exhausted { stats } => stats,
        }
    }
}

/// State shared by the workers of one search
#[derive(Debug, Default)]
struct SharedState {
    found: AtomicBool,
    solution: OnceLock<(u32, Hash256)>,
    total_hashes: AtomicU64,
    interval_hashes: AtomicU64,
    max_nonce: AtomicU32,
    active: AtomicUsize,
}

impl SharedState {
    /// First successful claim wins; later ones are ignored
    fn claim(&self, nonce: u32, hash: Hash256) -> bool {
        if self
            .found
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            let _ = self.solution.set((nonce, hash));
            true
        } else {
            false
        }
    }

    fn publish(&self, hashes: u64, last_nonce: Option<u32>) {
        if hashes > 0 {
            self.total_hashes.fetch_add(hashes, Ordering::Relaxed);
            self.interval_hashes.fetch_add(hashes, Ordering::Relaxed);
        }
        if let Some(nonce) = last_nonce {
            self.max_nonce.fetch_max(nonce, Ordering::Relaxed);
        }
    }
}

/// Multi-threaded nonce search against a fixed target
#[derive(Debug, Clone)]
pub struct NonceSearch {
    target: Target,
    threads: usize,
    report_interval: Duration,
}

impl NonceSearch {
    /// Create a search; `threads == 0` means one per CPU
    pub fn new(target: Target, threads: usize) -> Self {
        let threads = if threads == 0 { num_cpus::get() } else { threads };

        Self {
            target,
            threads: threads.max(1),
            report_interval: Duration::from_secs(1),
        }
    }

    /// Set how often `on_status` is invoked
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Search `range` for a nonce whose header hash meets the target
    ///
    /// `template` supplies every header field but the nonce. Workers are
    /// spawned for this call and joined before it returns; `on_status` runs
    /// on the calling thread once per report interval.
    pub fn run(
        &self,
        template: &BlockHeader,
        range: NonceRange,
        on_status: &mut dyn FnMut(&SearchStatus),
    ) -> SearchOutcome {
        let header = template.to_bytes();
        let state = SharedState::default();
        state.active.store(self.threads, Ordering::Release);

        log::debug!(
            "searching nonces [{}, {}) with {} threads",
            range.start,
            range.end,
            self.threads
        );

        let started = Instant::now();
        thread::scope(|scope| {
            for worker in 0..self.threads {
                let state = &state;
                scope.spawn(move || {
                    self.run_worker(worker, header, range, state);
                    state.active.fetch_sub(1, Ordering::AcqRel);
                });
            }

            self.supervise(&state, on_status);
        });
        let elapsed = started.elapsed();

        let stats = SearchStats {
            hashes: state.total_hashes.load(Ordering::Relaxed),
            max_nonce: state.max_nonce.load(Ordering::Relaxed),
            elapsed,
        };

        match state.solution.get() {
            Some(&(nonce, hash)) => SearchOutcome::Found { nonce, hash, stats },
            None => SearchOutcome::Exhausted { stats },
        }
    }

    fn run_worker(&self, worker: usize, mut header: [u8; HEADER_SIZE], range: NonceRange, state: &SharedState) {
        log::trace!("worker {} started", worker);

        let mut pending = 0u64;
        let mut last_nonce = None;

        for nonce in range.partition(worker, self.threads) {
            if state.found.load(Ordering::Relaxed) {
                break;
            }

            header[NONCE_OFFSET..].copy_from_slice(&nonce.to_le_bytes());
            let hash = hash256(&header);
            pending += 1;
            last_nonce = Some(nonce);

            if self.target.is_met_by(&hash) {
                if state.claim(nonce, hash) {
                    log::info!("worker {} found nonce {}", worker, nonce);
                }
                break;
            }

            if pending == FLUSH_EVERY {
                state.publish(pending, last_nonce);
                pending = 0;
            }
        }

        state.publish(pending, last_nonce);
        log::trace!("worker {} finished", worker);
    }

    fn supervise(&self, state: &SharedState, on_status: &mut dyn FnMut(&SearchStatus)) {
        let mut last_report = Instant::now();

        while !state.found.load(Ordering::Relaxed) && state.active.load(Ordering::Acquire) > 0 {
            thread::sleep(POLL_INTERVAL);

            let secs = last_report.elapsed().as_secs_f64();
            if secs >= self.report_interval.as_secs_f64() {
                let delta = state.interval_hashes.swap(0, Ordering::Relaxed);
                on_status(&SearchStatus {
                    total_hashes: state.total_hashes.load(Ordering::Relaxed),
                    hash_rate: delta as f64 / secs,
                    max_nonce: state.max_nonce.load(Ordering::Relaxed),
                });
                last_report = Instant::now();
            }
        }
    }
}
