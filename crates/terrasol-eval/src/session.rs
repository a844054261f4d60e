//! The scene session: explicit ownership of placer, cache, and monitor.
//!
//! One object owns the mutable scene state and fixes the per-frame order:
//! camera placement completes before the cache refines against it, and
//! memory pressure is applied between frames, never mid-update. Components
//! stay decoupled; nothing here reaches back into the UI.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use terrasol_config::Config;
use terrasol_geo::{AreaLocation, CameraPreset, GeodeticCameraPlacer};
use terrasol_tiles::pressure::{MemoryPressureMonitor, MemoryProbe};
use terrasol_tiles::{
    StreamingObserver, StreamingStats, TileFetcher, TileStreamingCache, TileTree,
};

use crate::error::SessionError;

/// Owns the live scene: camera placement, tile streaming, memory monitoring.
pub struct SceneSession {
    placer: GeodeticCameraPlacer,
    cache: TileStreamingCache,
    monitor: MemoryPressureMonitor,
}

impl SceneSession {
    /// Build a session over a tile tree, a content fetcher, and a memory
    /// probe. The camera rig initializes immediately; placements are valid
    /// from the first frame.
    pub fn new(
        config: &Config,
        tree: TileTree,
        fetcher: Arc<dyn TileFetcher>,
        probe: Box<dyn MemoryProbe>,
    ) -> Self {
        let mut placer = GeodeticCameraPlacer::new();
        placer.initialize_scene();
        let cache = TileStreamingCache::new(
            tree,
            fetcher,
            config.streaming.clone(),
            &config.viewport,
        );
        let monitor = MemoryPressureMonitor::new(probe, &config.memory);
        info!("scene session created");
        Self {
            placer,
            cache,
            monitor,
        }
    }

    /// Re-anchor and place the camera for an area, request the fast
    /// refinement pass, and run one cache frame immediately so the new pose
    /// takes effect without waiting for the next tick.
    pub fn place_camera(
        &mut self,
        location: &AreaLocation,
        preset: Option<&CameraPreset>,
    ) -> Result<(), SessionError> {
        let placement = self.placer.place_camera(location, preset)?;
        self.cache.begin_refinement_boost(placement.refinement_error_target);
        self.cache.update(&placement.pose)?;
        Ok(())
    }

    /// Run one frame: sample memory pressure, then update the cache against
    /// the current camera pose. A frame before any placement is a no-op.
    pub fn tick(&mut self, now: Instant) -> Result<(), SessionError> {
        if let Some(level) =
            self.monitor
                .sample(now, self.cache.tiles_memory_bytes(), self.cache.last_eviction())
        {
            self.cache.apply_memory_pressure(level);
        }

        let Some(pose) = self.placer.pose().copied() else {
            return Ok(());
        };
        self.cache.update(&pose)?;
        Ok(())
    }

    /// Forward camera motion state to the cache's error-target policy.
    pub fn set_camera_moving(&mut self, moving: bool) {
        self.cache.set_camera_moving(moving);
    }

    /// Register a streaming observer (progress, errors, attributions).
    pub fn add_observer(&mut self, observer: Box<dyn StreamingObserver>) {
        self.cache.add_observer(observer);
    }

    /// Live streaming counters.
    pub fn streaming_stats(&self) -> StreamingStats {
        self.cache.stats()
    }

    /// The camera placer, for pose and orbit-control reads.
    pub fn placer(&self) -> &GeodeticCameraPlacer {
        &self.placer
    }

    /// The memory monitor, for registering stats listeners.
    pub fn monitor_mut(&mut self) -> &mut MemoryPressureMonitor {
        &mut self.monitor
    }

    /// Tear the session down: cancel fetches and release tile content.
    /// Idempotent; later [`tick`](Self::tick) calls fail with a disposed
    /// streaming error.
    pub fn dispose(&mut self) {
        self.cache.dispose();
        info!("scene session disposed");
    }
}
