//! Sweep sample storage.

use std::collections::HashMap;

use crate::slots::TimeSlot;

/// One evaluated sample: how sunlit an area's mask was at a time slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SunEvalSample {
    /// The venue area the mask belongs to.
    pub area_id: String,
    /// Local time slot the sample was taken for.
    pub slot: TimeSlot,
    /// Sunlit percentage of the masked area, `[0, 100]`.
    pub percent_in_sun: f64,
}

/// Where sweep results land. The boundary for persistence backends; the
/// sweep itself never touches storage details.
pub trait SampleStore {
    /// Write a sample, overwriting any previous sample for the same area and
    /// slot. Re-running a sweep never duplicates.
    fn write_sample(&mut self, sample: SunEvalSample);

    /// The sample for an area at a slot, if one was written.
    fn sample(&self, area_id: &str, slot: TimeSlot) -> Option<&SunEvalSample>;

    /// All samples for an area, ordered by slot.
    fn samples_for_area(&self, area_id: &str) -> Vec<&SunEvalSample>;

    /// The sunniest recorded slot for an area. Ties resolve to the earliest
    /// slot.
    fn best_slot(&self, area_id: &str) -> Option<&SunEvalSample> {
        self.samples_for_area(area_id)
            .into_iter()
            .reduce(|best, sample| {
                if sample.percent_in_sun > best.percent_in_sun {
                    sample
                } else {
                    best
                }
            })
    }
}

/// In-memory sample store, keyed by (area, slot).
#[derive(Debug, Default)]
pub struct MemorySampleStore {
    samples: HashMap<(String, TimeSlot), SunEvalSample>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total samples across all areas.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleStore for MemorySampleStore {
    fn write_sample(&mut self, sample: SunEvalSample) {
        self.samples
            .insert((sample.area_id.clone(), sample.slot), sample);
    }

    fn sample(&self, area_id: &str, slot: TimeSlot) -> Option<&SunEvalSample> {
        self.samples.get(&(area_id.to_string(), slot))
    }

    fn samples_for_area(&self, area_id: &str) -> Vec<&SunEvalSample> {
        let mut samples: Vec<&SunEvalSample> = self
            .samples
            .values()
            .filter(|sample| sample.area_id == area_id)
            .collect();
        samples.sort_by_key(|sample| sample.slot);
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(area: &str, hour: u32, minute: u32, percent: f64) -> SunEvalSample {
        SunEvalSample {
            area_id: area.to_string(),
            slot: TimeSlot::from_hour_minute(hour, minute),
            percent_in_sun: percent,
        }
    }

    #[test]
    fn test_rewrite_overwrites_not_duplicates() {
        let mut store = MemorySampleStore::new();
        store.write_sample(sample("terrace", 14, 0, 40.0));
        store.write_sample(sample("terrace", 14, 0, 65.0));

        assert_eq!(store.len(), 1);
        let slot = TimeSlot::from_hour_minute(14, 0);
        assert_eq!(store.sample("terrace", slot).unwrap().percent_in_sun, 65.0);
    }

    #[test]
    fn test_samples_for_area_sorted_by_slot() {
        let mut store = MemorySampleStore::new();
        store.write_sample(sample("terrace", 18, 0, 10.0));
        store.write_sample(sample("terrace", 12, 0, 80.0));
        store.write_sample(sample("garden", 13, 0, 50.0));
        store.write_sample(sample("terrace", 15, 30, 60.0));

        let slots: Vec<TimeSlot> = store
            .samples_for_area("terrace")
            .iter()
            .map(|sample| sample.slot)
            .collect();
        assert_eq!(
            slots,
            vec![
                TimeSlot::from_hour_minute(12, 0),
                TimeSlot::from_hour_minute(15, 30),
                TimeSlot::from_hour_minute(18, 0),
            ]
        );
    }

    #[test]
    fn test_best_slot_prefers_max_then_earliest() {
        let mut store = MemorySampleStore::new();
        store.write_sample(sample("terrace", 12, 0, 55.0));
        store.write_sample(sample("terrace", 14, 0, 90.0));
        store.write_sample(sample("terrace", 16, 0, 90.0));
        store.write_sample(sample("terrace", 18, 0, 20.0));

        let best = store.best_slot("terrace").unwrap();
        assert_eq!(best.slot, TimeSlot::from_hour_minute(14, 0));
        assert_eq!(best.percent_in_sun, 90.0);
    }

    #[test]
    fn test_best_slot_empty_area() {
        let store = MemorySampleStore::new();
        assert!(store.best_slot("nowhere").is_none());
    }
}
