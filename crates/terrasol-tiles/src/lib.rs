//! Hierarchical LOD tile streaming for the Terrasol scene.
//!
//! Maintains, each frame, the minimal set of loaded tiles that satisfies a
//! target screen-space error for the current camera, while respecting a hard
//! memory ceiling. Content fetching runs on a bounded worker pool; eviction is
//! LRU-by-frame over tiles outside the current view frustum. A companion
//! memory pressure monitor tightens the cache when the process nears its heap
//! limit.

mod cache;
mod error;
mod events;
mod fetch;
mod frustum;
pub mod pressure;
mod tree;

pub use cache::{StreamingStats, TileStreamingCache};
pub use error::StreamingError;
pub use events::StreamingObserver;
pub use fetch::{FetchOutcome, FetchPool, TileFetcher};
pub use frustum::{Frustum, Intersection};
pub use tree::{Aabb, ContentState, TileContent, TileId, TileNode, TileTree};
