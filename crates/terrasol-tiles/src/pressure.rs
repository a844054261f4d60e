//! Heap pressure monitoring for the tile cache.
//!
//! Samples process memory on a polling interval, classifies usage against
//! the heap limit, and broadcasts stats to registered listeners. The cache
//! reacts to [`PressureLevel`] transitions by shrinking its budget and
//! coarsening detail.

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{debug, warn};

use terrasol_config::MemoryConfig;

/// Classified memory pressure, from heap usage as a fraction of the limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PressureLevel {
    /// Under 50% of the heap limit.
    Low,
    /// 50-75%.
    Medium,
    /// 75-90%.
    High,
    /// 90% and above.
    Critical,
}

impl PressureLevel {
    /// Classify a usage fraction in `[0, 1]`.
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction < 0.50 {
            PressureLevel::Low
        } else if fraction < 0.75 {
            PressureLevel::Medium
        } else if fraction < 0.90 {
            PressureLevel::High
        } else {
            PressureLevel::Critical
        }
    }
}

/// One snapshot of process memory, as broadcast to listeners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemoryStats {
    /// Process heap usage in bytes.
    pub heap_used_bytes: usize,
    /// Heap ceiling the usage is classified against.
    pub heap_limit_bytes: usize,
    /// Bytes held by resident tile content.
    pub tiles_memory_bytes: usize,
    /// Classified pressure level.
    pub pressure_level: PressureLevel,
    /// When the tile cache last evicted content, if ever.
    pub last_eviction: Option<Instant>,
}

/// Reads current process heap usage. Platform probes implement this; tests
/// substitute fakes.
pub trait MemoryProbe: Send {
    /// Current heap usage in bytes, or `None` when unavailable.
    fn heap_used_bytes(&self) -> Option<usize>;
}

/// Probe backed by `/proc/self/status` (`VmRSS`). Returns `None` on
/// platforms without procfs, which pins the monitor at [`PressureLevel::Low`].
pub struct ProcStatusProbe;

impl MemoryProbe for ProcStatusProbe {
    fn heap_used_bytes(&self) -> Option<usize> {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        for line in status.lines() {
            if let Some(rest) = line.strip_prefix("VmRSS:") {
                let kb: usize = rest.trim().trim_end_matches("kB").trim().parse().ok()?;
                return Some(kb * 1024);
            }
        }
        None
    }
}

/// Identifies a registered stats listener for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Polls a [`MemoryProbe`] on an interval and classifies pressure.
///
/// Drive it from the frame loop: call [`sample`](Self::sample) with the
/// cache's current accounting; it rate-limits itself to the configured poll
/// interval and returns the new level only when a poll actually ran.
pub struct MemoryPressureMonitor {
    probe: Box<dyn MemoryProbe>,
    heap_limit_bytes: usize,
    poll_interval_seconds: f64,
    last_poll: Option<Instant>,
    level: PressureLevel,
    listeners: Vec<(ListenerId, Sender<MemoryStats>)>,
    next_listener_id: u64,
    probe_warned: bool,
}

impl MemoryPressureMonitor {
    /// Create a monitor over `probe` using the configured poll interval and
    /// heap limit.
    pub fn new(probe: Box<dyn MemoryProbe>, config: &MemoryConfig) -> Self {
        Self {
            probe,
            heap_limit_bytes: config.default_heap_limit,
            poll_interval_seconds: config.poll_interval_seconds,
            last_poll: None,
            level: PressureLevel::Low,
            listeners: Vec::new(),
            next_listener_id: 0,
            probe_warned: false,
        }
    }

    /// The most recently classified pressure level.
    pub fn level(&self) -> PressureLevel {
        self.level
    }

    /// Whether the poll interval has elapsed since the last sample.
    pub fn poll_due(&self, now: Instant) -> bool {
        match self.last_poll {
            Some(last) => {
                now.duration_since(last).as_secs_f64() >= self.poll_interval_seconds
            }
            None => true,
        }
    }

    /// Register a stats listener. Each poll's snapshot is sent to every
    /// listener; slow listeners drop old snapshots rather than block.
    pub fn add_stats_listener(&mut self) -> (ListenerId, Receiver<MemoryStats>) {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        let (sender, receiver) = bounded(8);
        self.listeners.push((id, sender));
        (id, receiver)
    }

    /// Remove a previously registered listener.
    pub fn remove_stats_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener, _)| *listener != id);
    }

    /// Poll the probe if the interval has elapsed.
    ///
    /// `tiles_memory_bytes` and `last_eviction` come from the tile cache and
    /// are passed through to listeners. Returns `Some(level)` when a poll
    /// ran, `None` when rate-limited.
    pub fn sample(
        &mut self,
        now: Instant,
        tiles_memory_bytes: usize,
        last_eviction: Option<Instant>,
    ) -> Option<PressureLevel> {
        if !self.poll_due(now) {
            return None;
        }
        self.last_poll = Some(now);

        let heap_used_bytes = match self.probe.heap_used_bytes() {
            Some(bytes) => bytes,
            None => {
                if !self.probe_warned {
                    warn!("memory probe unavailable, pressure pinned at Low");
                    self.probe_warned = true;
                }
                0
            }
        };

        let fraction = heap_used_bytes as f64 / self.heap_limit_bytes.max(1) as f64;
        let level = PressureLevel::from_fraction(fraction);
        if level != self.level {
            debug!(
                ?level,
                heap_used_bytes, heap_limit_bytes = self.heap_limit_bytes,
                "memory pressure level changed"
            );
        }
        self.level = level;

        let stats = MemoryStats {
            heap_used_bytes,
            heap_limit_bytes: self.heap_limit_bytes,
            tiles_memory_bytes,
            pressure_level: level,
            last_eviction,
        };
        for (_, sender) in &self.listeners {
            // Full channel: discard the oldest snapshot, never block.
            if sender.is_full() {
                continue;
            }
            let _ = sender.try_send(stats);
        }

        Some(level)
    }
}
