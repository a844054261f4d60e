//! Observer seam between the streaming cache and the surrounding UI.

use crate::error::StreamingError;

/// Callbacks the streaming cache raises for the orchestrating scene.
///
/// This is the only interface the surrounding UI consumes; the cache never
/// holds UI state. All methods default to no-ops so observers implement only
/// what they display.
pub trait StreamingObserver: Send {
    /// Loading progress for the current visible set, `[0, 100]`.
    fn on_load_progress(&mut self, _percent: f32) {}

    /// An individual tile fetch/decode failed. Recovered internally; surfaced
    /// for the error banner only.
    fn on_load_error(&mut self, _error: &StreamingError) {}

    /// The visible set is fully loaded.
    fn on_load_complete(&mut self) {}

    /// Number of tiles selected for rendering this frame.
    fn on_tile_count(&mut self, _count: usize) {}

    /// Data provider attribution text changed.
    fn on_attributions(&mut self, _text: &str) {}
}
