//! Sweep and session error types.

use thiserror::Error;

use terrasol_geo::GeoError;
use terrasol_tiles::StreamingError;

use crate::slots::TimeSlot;

/// Errors from driving the scene session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Camera placement failed (invalid input or the rig is not ready).
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// The tile cache rejected a frame.
    #[error(transparent)]
    Streaming(#[from] StreamingError),
}

/// A shadow render pass failed for one time slot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct RenderError {
    /// Human-readable failure description from the render backend.
    pub reason: String,
}

impl RenderError {
    /// Wrap a backend failure description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors from running a sun evaluation sweep.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SweepError {
    /// The configured sweep window is inverted.
    #[error("invalid sweep window: start hour {start} after end hour {end}")]
    InvalidWindow { start: u32, end: u32 },

    /// The configured step does not produce a usable grid.
    #[error("invalid sweep step: {step_minutes} minutes")]
    InvalidStep { step_minutes: u32 },

    /// The sweep date and a slot did not form a valid timestamp.
    #[error("invalid sweep timestamp at {slot}")]
    InvalidTimestamp { slot: TimeSlot },

    /// One slot failed; earlier slots' samples remain written.
    #[error("time slot {slot} failed: {reason}")]
    SlotFailed { slot: TimeSlot, reason: String },
}
