//! Asynchronous tile content fetching on a bounded worker pool.
//!
//! Offloads network fetch/decode to background threads, bounded by the
//! configured concurrency, with per-request cancellation and completion
//! delivered back to the render thread via bounded channels. The render loop
//! never blocks on I/O; it drains completed results once per frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;

use crate::error::StreamingError;
use crate::tree::{TileContent, TileId};

/// Fetches and decodes one tile's content. Implementations wrap the actual
/// transport (HTTP, file, test fixture); the pool owns scheduling.
pub trait TileFetcher: Send + Sync + 'static {
    fn fetch(&self, uri: &str) -> Result<TileContent, StreamingError>;
}

/// A completed fetch, success or failure, for one tile.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The tile the request was for.
    pub tile: TileId,
    /// The fetched content or the failure to report.
    pub result: Result<TileContent, StreamingError>,
    /// Wall time spent fetching, microseconds.
    pub fetch_time_us: u64,
}

struct FetchTask {
    tile: TileId,
    uri: String,
    cancelled: Arc<AtomicBool>,
}

/// Bounded fetch worker pool.
pub struct FetchPool {
    task_sender: Sender<FetchTask>,
    result_receiver: Receiver<FetchOutcome>,
    active: Arc<DashMap<TileId, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl FetchPool {
    /// Create a pool running `fetcher` on background threads.
    ///
    /// `max_concurrent` bounds both the worker count (capped by available
    /// cores) and the pending queue.
    pub fn new(fetcher: Arc<dyn TileFetcher>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        let thread_count = max_concurrent.min(num_cpus::get().max(1));
        let (task_sender, task_receiver) = bounded::<FetchTask>(max_concurrent * 2);
        let (result_sender, result_receiver) = bounded::<FetchOutcome>(max_concurrent * 2);
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let fetcher = Arc::clone(&fetcher);

            std::thread::Builder::new()
                .name("tile-fetch-worker".into())
                .spawn(move || {
                    while let Ok(task) = receiver.recv() {
                        if task.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let result = fetcher.fetch(&task.uri);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if !task.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(FetchOutcome {
                                tile: task.tile,
                                result,
                                fetch_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .expect("failed to spawn tile fetch worker thread");
        }

        Self {
            task_sender,
            result_receiver,
            active: Arc::new(DashMap::new()),
            in_flight,
        }
    }

    /// Submit a tile fetch. Returns [`StreamingError::QueueFull`] when the
    /// queue is saturated; the caller retries on a later frame.
    pub fn submit(&self, tile: TileId, uri: &str) -> Result<(), StreamingError> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active.insert(tile, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        let task = FetchTask {
            tile,
            uri: uri.to_string(),
            cancelled,
        };
        self.task_sender.try_send(task).map_err(|e| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            self.active.remove(&e.into_inner().tile);
            StreamingError::QueueFull
        })
    }

    /// Cancel a pending or in-progress fetch. No-op if already completed.
    pub fn cancel(&self, tile: TileId) {
        if let Some((_, cancelled)) = self.active.remove(&tile) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Cancel every outstanding fetch.
    pub fn cancel_all(&self) {
        self.active.retain(|_, cancelled| {
            cancelled.store(true, Ordering::Relaxed);
            false
        });
    }

    /// Drain all completed fetches. Call once per frame on the render thread.
    pub fn drain_results(&self) -> Vec<FetchOutcome> {
        let mut results = Vec::new();
        while let Ok(outcome) = self.result_receiver.try_recv() {
            self.active.remove(&outcome.tile);
            results.push(outcome);
        }
        results
    }

    /// Number of requests queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Whether a request for this tile is currently outstanding.
    pub fn is_pending(&self, tile: TileId) -> bool {
        self.active.contains_key(&tile)
    }
}
