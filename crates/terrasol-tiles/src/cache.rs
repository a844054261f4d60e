//! The streaming cache: per-frame refinement, loading, and eviction.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace, warn};

use terrasol_config::{StreamingConfig, ViewportConfig};
use terrasol_geo::{CameraPose, ClipPlanes};

use crate::error::StreamingError;
use crate::events::StreamingObserver;
use crate::fetch::{FetchPool, TileFetcher};
use crate::frustum::{Frustum, Intersection};
use crate::pressure::PressureLevel;
use crate::tree::{ContentState, TileId, TileTree};

/// Live counters for stats displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Tiles currently holding content.
    pub resident_tiles: usize,
    /// Bytes of resident tile content.
    pub tiles_memory_bytes: usize,
    /// Tiles selected for rendering last frame.
    pub visible_tiles: usize,
    /// Outstanding fetch requests.
    pub in_flight: usize,
    /// Frames processed.
    pub frame: u64,
}

/// Hierarchical LOD tile cache.
///
/// Owns the tile tree exclusively; other components observe it through the
/// narrow accessor and observer interfaces. Call [`update`](Self::update)
/// once per frame after camera placement for that frame has completed.
pub struct TileStreamingCache {
    config: StreamingConfig,
    viewport: (u32, u32),
    fov_y_rad: f64,
    clip: ClipPlanes,
    tree: TileTree,
    pool: FetchPool,
    observers: Vec<Box<dyn StreamingObserver>>,

    frame: u64,
    tiles_memory_bytes: usize,
    resident_tiles: usize,
    largest_tile_bytes: usize,

    camera_moving: bool,
    boost_target: Option<f64>,
    pressure_error_factor: f64,
    pressure_budget_factor: f64,

    render_set: Vec<TileId>,
    in_frustum: HashSet<TileId>,
    attributions: Vec<String>,
    load_complete_notified: bool,
    last_eviction: Option<Instant>,
    disposed: bool,
}

impl TileStreamingCache {
    /// Create a cache over `tree`, fetching content with `fetcher`.
    pub fn new(
        tree: TileTree,
        fetcher: Arc<dyn TileFetcher>,
        config: StreamingConfig,
        viewport: &ViewportConfig,
    ) -> Self {
        let pool = FetchPool::new(fetcher, config.max_concurrent_requests);
        Self {
            viewport: (viewport.width, viewport.height),
            fov_y_rad: viewport.fov_y_deg.to_radians(),
            clip: ClipPlanes::default(),
            tree,
            pool,
            observers: Vec::new(),
            frame: 0,
            tiles_memory_bytes: 0,
            resident_tiles: 0,
            largest_tile_bytes: 0,
            camera_moving: false,
            boost_target: None,
            pressure_error_factor: 1.0,
            pressure_budget_factor: 1.0,
            render_set: Vec::new(),
            in_frustum: HashSet::new(),
            attributions: Vec::new(),
            load_complete_notified: false,
            last_eviction: None,
            disposed: false,
            config,
        }
    }

    /// Register an observer for load progress/errors/attributions.
    pub fn add_observer(&mut self, observer: Box<dyn StreamingObserver>) {
        self.observers.push(observer);
    }

    /// Two-state motion policy: while the camera is dragged the error target
    /// relaxes to shed load; it tightens back once motion stops.
    pub fn set_camera_moving(&mut self, moving: bool) {
        if self.camera_moving != moving {
            trace!(moving, "camera motion state changed");
        }
        self.camera_moving = moving;
    }

    /// Temporarily tighten the error target to force a fast refinement pass
    /// (applied after camera placement). Released automatically once the
    /// visible set is fully loaded.
    pub fn begin_refinement_boost(&mut self, error_target: f64) {
        self.boost_target = Some(error_target);
        self.load_complete_notified = false;
    }

    /// The screen-space error target in effect this frame.
    pub fn effective_error_target(&self) -> f64 {
        if let Some(boost) = self.boost_target {
            return boost;
        }
        let mut target = self.config.error_target * self.pressure_error_factor;
        if self.camera_moving {
            target *= self.config.motion_coarsen_factor;
        }
        target
    }

    /// The memory ceiling in effect, after any pressure shrink.
    pub fn effective_memory_budget(&self) -> usize {
        (self.config.maximum_memory_usage as f64 * self.pressure_budget_factor) as usize
    }

    /// Run one frame: drain completed fetches, refine against the camera,
    /// schedule loads, and evict down to the memory budget.
    ///
    /// Camera placement for this frame must have completed before this call.
    pub fn update(&mut self, pose: &CameraPose) -> Result<(), StreamingError> {
        if self.disposed {
            return Err(StreamingError::Disposed);
        }
        self.frame += 1;

        self.apply_fetch_results();

        let frustum = Frustum::from_camera(
            pose,
            self.viewport,
            self.fov_y_rad,
            self.clip.near,
            self.clip.far,
        );
        let error_target = self.effective_error_target();

        self.in_frustum.clear();
        self.render_set.clear();
        let mut to_request: Vec<TileId> = Vec::new();
        let mut stack = vec![self.tree.root()];

        while let Some(id) = stack.pop() {
            let node = self.tree.node(id);
            if frustum.intersects_aabb(node.bounds.min, node.bounds.max) == Intersection::Outside
            {
                continue;
            }

            let sse = self.screen_space_error(node.geometric_error, &node.bounds, pose);
            let children: Vec<TileId> = node.children().to_vec();
            let depth = node.depth();

            self.tree.node_mut(id).last_touched_frame = self.frame;
            self.in_frustum.insert(id);

            // Children are only traversed while the node's screen-space
            // error exceeds the target.
            let refine =
                !children.is_empty() && sse > error_target && depth < self.config.max_depth;

            if refine {
                stack.extend(children);
                if !self.config.skip_level_of_detail {
                    // Uniform-detail mode keeps intermediate levels resident.
                    to_request.push(id);
                }
            } else {
                self.render_set.push(id);
                to_request.push(id);
                if self.config.load_siblings {
                    to_request.extend(self.tree.siblings(id));
                }
            }
        }

        for id in to_request {
            self.request_content(id);
        }

        self.evict_pass(false);
        self.notify_frame_progress();
        Ok(())
    }

    /// Command from the memory pressure monitor: shrink the resident budget,
    /// coarsen the error target, and evict immediately. LOW/MEDIUM restores
    /// the steady-state configuration.
    pub fn apply_memory_pressure(&mut self, level: PressureLevel) {
        let (error_factor, budget_factor) = match level {
            PressureLevel::Low | PressureLevel::Medium => (1.0, 1.0),
            PressureLevel::High => (1.5, 0.75),
            PressureLevel::Critical => (2.0, 0.5),
        };
        self.pressure_error_factor = error_factor;
        self.pressure_budget_factor = budget_factor;

        if matches!(level, PressureLevel::High | PressureLevel::Critical) {
            debug!(?level, "memory pressure: forcing eviction pass");
            self.evict_pass(true);
        }
    }

    /// Release all content and cancel in-flight requests. Idempotent; safe
    /// to call even if initialization partially failed.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.pool.cancel_all();
        let _ = self.pool.drain_results();
        for id in self.tree.ids().collect::<Vec<_>>() {
            let node = self.tree.node_mut(id);
            node.content = None;
            node.state = ContentState::Unloaded;
        }
        self.tiles_memory_bytes = 0;
        self.resident_tiles = 0;
        self.render_set.clear();
        self.in_frustum.clear();
        self.disposed = true;
        debug!("tile cache disposed");
    }

    /// Bytes of resident tile content.
    pub fn tiles_memory_bytes(&self) -> usize {
        self.tiles_memory_bytes
    }

    /// Largest single tile observed, the slack allowed over the budget.
    pub fn largest_tile_bytes(&self) -> usize {
        self.largest_tile_bytes
    }

    /// When the last eviction pass removed content.
    pub fn last_eviction(&self) -> Option<Instant> {
        self.last_eviction
    }

    /// Tiles selected for rendering last frame.
    pub fn render_set(&self) -> &[TileId] {
        &self.render_set
    }

    /// Read access to the tile tree.
    pub fn tree(&self) -> &TileTree {
        &self.tree
    }

    /// Live counters for stats displays.
    pub fn stats(&self) -> StreamingStats {
        StreamingStats {
            resident_tiles: self.resident_tiles,
            tiles_memory_bytes: self.tiles_memory_bytes,
            visible_tiles: self.render_set.len(),
            in_flight: self.pool.in_flight_count() as usize,
            frame: self.frame,
        }
    }

    // --- internals ---

    fn screen_space_error(
        &self,
        geometric_error: f64,
        bounds: &crate::tree::Aabb,
        pose: &CameraPose,
    ) -> f64 {
        let distance = bounds.distance_to_point(pose.position).max(1e-6);
        geometric_error * self.viewport.1 as f64
            / (2.0 * distance * (self.fov_y_rad * 0.5).tan())
    }

    fn request_content(&mut self, id: TileId) {
        let node = self.tree.node(id);
        if node.state() != ContentState::Unloaded || node.content_uri.is_none() {
            return;
        }
        if self.pool.is_pending(id)
            || self.pool.in_flight_count() >= self.config.max_concurrent_requests as u64
        {
            return;
        }
        let uri = node.content_uri.clone().unwrap_or_default();
        match self.pool.submit(id, &uri) {
            Ok(()) => {
                self.tree.node_mut(id).state = ContentState::Loading;
                self.load_complete_notified = false;
                trace!(?id, uri, "tile fetch scheduled");
            }
            Err(StreamingError::QueueFull) => {
                // Stays Unloaded; visibility re-requests it next frame.
            }
            Err(err) => warn!(?id, %err, "tile fetch submission failed"),
        }
    }

    fn apply_fetch_results(&mut self) {
        for outcome in self.pool.drain_results() {
            let id = outcome.tile;
            match outcome.result {
                Ok(content) => {
                    let size = content.size_bytes();
                    if let Some(attribution) = content.attribution.clone()
                        && !self.attributions.contains(&attribution)
                    {
                        self.attributions.push(attribution);
                        let text = self.attributions.join(" · ");
                        for observer in &mut self.observers {
                            observer.on_attributions(&text);
                        }
                    }
                    let node = self.tree.node_mut(id);
                    node.content = Some(content);
                    node.state = ContentState::Loaded;
                    self.tiles_memory_bytes += size;
                    self.resident_tiles += 1;
                    self.largest_tile_bytes = self.largest_tile_bytes.max(size);
                    trace!(?id, size, us = outcome.fetch_time_us, "tile loaded");
                }
                Err(err) => {
                    // Recovered locally: back to Unloaded, retried on the
                    // next visibility check.
                    self.tree.node_mut(id).state = ContentState::Unloaded;
                    warn!(?id, %err, "tile fetch failed");
                    for observer in &mut self.observers {
                        observer.on_load_error(&err);
                    }
                }
            }
        }
    }

    /// Evict least-recently-touched content until usage fits the budget.
    /// Tiles inside the current frustum are never evicted; the idle window
    /// is waived only under memory pressure.
    fn evict_pass(&mut self, ignore_idle: bool) {
        let budget = self.effective_memory_budget();
        let mut evicted = 0usize;

        while self.tiles_memory_bytes > budget {
            let mut candidate: Option<(TileId, u64)> = None;
            for id in self.tree.ids() {
                let node = self.tree.node(id);
                if node.state() != ContentState::Loaded || self.in_frustum.contains(&id) {
                    continue;
                }
                let idle = self.frame.saturating_sub(node.last_touched_frame());
                if !ignore_idle && idle < self.config.eviction_idle_frames {
                    continue;
                }
                match candidate {
                    Some((_, best)) if node.last_touched_frame() >= best => {}
                    _ => candidate = Some((id, node.last_touched_frame())),
                }
            }

            let Some((id, _)) = candidate else {
                break;
            };
            let node = self.tree.node_mut(id);
            let size = node.content.take().map(|c| c.size_bytes()).unwrap_or(0);
            node.state = ContentState::Unloaded;
            self.tiles_memory_bytes -= size;
            self.resident_tiles -= 1;
            evicted += 1;
        }

        if evicted > 0 {
            self.last_eviction = Some(Instant::now());
            debug!(
                evicted,
                resident = self.resident_tiles,
                bytes = self.tiles_memory_bytes,
                "eviction pass complete"
            );
        }
    }

    fn notify_frame_progress(&mut self) {
        let with_content: Vec<TileId> = self
            .render_set
            .iter()
            .copied()
            .filter(|&id| self.tree.node(id).content_uri.is_some())
            .collect();
        let total = with_content.len();
        let loaded = with_content
            .iter()
            .filter(|&&id| self.tree.node(id).state() == ContentState::Loaded)
            .count();

        let percent = if total == 0 {
            100.0
        } else {
            100.0 * loaded as f32 / total as f32
        };
        let count = self.render_set.len();
        for observer in &mut self.observers {
            observer.on_tile_count(count);
            observer.on_load_progress(percent);
        }

        if total > 0 && loaded == total && !self.load_complete_notified {
            self.load_complete_notified = true;
            // A completed refinement pass releases the placement boost.
            self.boost_target = None;
            for observer in &mut self.observers {
                observer.on_load_complete();
            }
        }
    }
}

impl Drop for TileStreamingCache {
    fn drop(&mut self) {
        self.dispose();
    }
}
