//! The sun evaluation sweep: one shadow render per time slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};
use glam::DVec3;
use tracing::{debug, info};

use terrasol_config::SweepConfig;
use terrasol_geo::GeoPoint;
use terrasol_mask::{ShadowBuffer, VisionMask, percent_in_sun};
use terrasol_solar::{compute_sun_position, light_direction, shadow_opacity_from_altitude};

use crate::error::{RenderError, SweepError};
use crate::slots::{TimeSlot, slot_grid};
use crate::store::{SampleStore, SunEvalSample};

/// Renders the scene's shadow state for one sun configuration.
///
/// Takes `&mut self`: slots render strictly one at a time, so a backend with
/// a single viewport never sees overlapping passes.
pub trait ShadowRenderer {
    fn render_shadow_buffer(
        &mut self,
        light_direction: DVec3,
        shadow_opacity: f32,
    ) -> Result<ShadowBuffer, RenderError>;
}

/// Outcome of a completed (or cancelled) sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepReport {
    /// Samples written to the store.
    pub written: usize,
    /// Wall time the sweep took.
    pub duration: Duration,
}

/// Sweep an area's mask across the configured local time slots for `date`.
///
/// Slots run sequentially. For each slot the local wall time is converted to
/// UTC via `utc_offset_minutes`, the sun position drives one shadow render,
/// and the mask's sunlit percentage is written to the store. Slots where the
/// sun is below the horizon still sample; the shadow backend applies the
/// night opacity. The cancel flag is checked between slots only, so a set
/// flag finishes the in-progress slot and returns what was written. A slot
/// failure aborts the remainder with [`SweepError::SlotFailed`], leaving
/// earlier samples intact.
pub fn run_sweep(
    location: GeoPoint,
    mask: &VisionMask,
    date: NaiveDate,
    config: &SweepConfig,
    renderer: &mut dyn ShadowRenderer,
    store: &mut dyn SampleStore,
    cancel: &AtomicBool,
) -> Result<SweepReport, SweepError> {
    let grid = slot_grid(config)?;
    let started = Instant::now();
    let mut written = 0usize;

    info!(
        area = mask.area_id(),
        %date,
        slots = grid.len(),
        "sun evaluation sweep started"
    );

    for &slot in &grid {
        if cancel.load(Ordering::Relaxed) {
            info!(area = mask.area_id(), written, "sweep cancelled");
            break;
        }

        let timestamp = slot_to_utc(date, slot, config.utc_offset_minutes)
            .ok_or(SweepError::InvalidTimestamp { slot })?;
        let sun = compute_sun_position(
            timestamp,
            location.latitude_deg(),
            location.longitude_deg(),
        );
        let buffer = renderer
            .render_shadow_buffer(
                light_direction(sun),
                shadow_opacity_from_altitude(sun.altitude_rad),
            )
            .map_err(|err| SweepError::SlotFailed {
                slot,
                reason: err.to_string(),
            })?;

        let percent = percent_in_sun(mask, &buffer).map_err(|err| SweepError::SlotFailed {
            slot,
            reason: err.to_string(),
        })?;

        debug!(
            area = mask.area_id(),
            %slot,
            altitude_deg = sun.altitude_rad.to_degrees(),
            percent,
            "slot evaluated"
        );

        store.write_sample(SunEvalSample {
            area_id: mask.area_id().to_string(),
            slot,
            percent_in_sun: percent,
        });
        written += 1;
    }

    let report = SweepReport {
        written,
        duration: started.elapsed(),
    };
    info!(
        area = mask.area_id(),
        written = report.written,
        ms = report.duration.as_millis() as u64,
        "sweep finished"
    );
    Ok(report)
}

/// Convert a local wall-time slot on `date` to the UTC instant it names.
fn slot_to_utc(date: NaiveDate, slot: TimeSlot, utc_offset_minutes: i32) -> Option<DateTime<Utc>> {
    let local = date.and_hms_opt(slot.hour(), slot.minute(), 0)?;
    let utc = local - chrono::Duration::minutes(utc_offset_minutes as i64);
    Some(DateTime::<Utc>::from_naive_utc_and_offset(utc, Utc))
}
