//! Streaming error types.

/// Errors from the tile streaming pipeline.
///
/// Individual fetch failures are recovered locally (the tile reverts to
/// unloaded and is retried on the next visibility check); they surface only
/// through the aggregate load-error observer callback.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StreamingError {
    /// A tile content fetch failed.
    #[error("tile fetch failed for {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    /// A fetched payload could not be decoded.
    #[error("tile decode failed for {uri}: {reason}")]
    Decode { uri: String, reason: String },

    /// The fetch queue is saturated; the request is retried next frame.
    #[error("fetch queue full")]
    QueueFull,

    /// Operation on a disposed cache.
    #[error("tile cache already disposed")]
    Disposed,
}
