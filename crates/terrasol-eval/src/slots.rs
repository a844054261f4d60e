//! Quantized time slots for the evaluation sweep.

use std::fmt;

use terrasol_config::SweepConfig;

use crate::error::SweepError;

/// A local time-of-day bucket, stored as minutes from midnight.
///
/// Slots quantize the sweep so repeated runs land on identical sample keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(u32);

impl TimeSlot {
    /// Slot for an exact hour and minute. Minutes wrap within the day.
    pub fn from_hour_minute(hour: u32, minute: u32) -> Self {
        Self((hour * 60 + minute) % (24 * 60))
    }

    /// Minutes from local midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        self.0
    }

    /// Local hour, `[0, 24)`.
    pub fn hour(&self) -> u32 {
        self.0 / 60
    }

    /// Minute within the hour.
    pub fn minute(&self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Build the sweep's slot grid from configuration.
///
/// Samples every `time_slot_step_minutes` from `sweep_start_hour:00` through
/// the end of `sweep_end_hour` (both hours inclusive).
pub fn slot_grid(config: &SweepConfig) -> Result<Vec<TimeSlot>, SweepError> {
    if config.sweep_start_hour > config.sweep_end_hour {
        return Err(SweepError::InvalidWindow {
            start: config.sweep_start_hour,
            end: config.sweep_end_hour,
        });
    }
    if config.sweep_end_hour >= 24 {
        return Err(SweepError::InvalidWindow {
            start: config.sweep_start_hour,
            end: config.sweep_end_hour,
        });
    }
    if config.time_slot_step_minutes == 0 || config.time_slot_step_minutes > 24 * 60 {
        return Err(SweepError::InvalidStep {
            step_minutes: config.time_slot_step_minutes,
        });
    }

    let first = config.sweep_start_hour * 60;
    let last = (config.sweep_end_hour + 1) * 60; // exclusive
    Ok((first..last)
        .step_by(config.time_slot_step_minutes as usize)
        .map(TimeSlot)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        // 12:00 through 21:45 at 15-minute steps.
        let grid = slot_grid(&SweepConfig::default()).unwrap();
        assert_eq!(grid.len(), 40);
        assert_eq!(grid[0], TimeSlot::from_hour_minute(12, 0));
        assert_eq!(*grid.last().unwrap(), TimeSlot::from_hour_minute(21, 45));
    }

    #[test]
    fn test_hourly_grid() {
        let config = SweepConfig {
            sweep_start_hour: 9,
            sweep_end_hour: 17,
            time_slot_step_minutes: 60,
            utc_offset_minutes: 0,
        };
        let grid = slot_grid(&config).unwrap();
        assert_eq!(grid.len(), 9);
        assert!(grid.iter().all(|slot| slot.minute() == 0));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let config = SweepConfig {
            sweep_start_hour: 18,
            sweep_end_hour: 9,
            ..SweepConfig::default()
        };
        assert!(matches!(
            slot_grid(&config),
            Err(SweepError::InvalidWindow { start: 18, end: 9 })
        ));
    }

    #[test]
    fn test_zero_step_rejected() {
        let config = SweepConfig {
            time_slot_step_minutes: 0,
            ..SweepConfig::default()
        };
        assert!(matches!(slot_grid(&config), Err(SweepError::InvalidStep { .. })));
    }

    #[test]
    fn test_out_of_range_end_hour_rejected() {
        let config = SweepConfig {
            sweep_end_hour: 24,
            ..SweepConfig::default()
        };
        assert!(matches!(slot_grid(&config), Err(SweepError::InvalidWindow { .. })));
    }

    #[test]
    fn test_slot_display_and_ordering() {
        let morning = TimeSlot::from_hour_minute(9, 5);
        let evening = TimeSlot::from_hour_minute(21, 45);
        assert_eq!(morning.to_string(), "09:05");
        assert_eq!(evening.to_string(), "21:45");
        assert!(morning < evening);
    }
}
