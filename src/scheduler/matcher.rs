//! Duration matcher.
//!
//! Enumerates runs of consecutive slots inside one continuous block
//! whose summed duration is within a tolerance of a target.
//!
//! # Algorithm
//!
//! For each block and each start index, accumulate slot durations
//! left to right:
//! - record the run and stop as soon as the total is within
//!   `target ± tolerance`;
//! - abandon the start index once the total exceeds
//!   `target + tolerance` (slot durations are positive, so the total
//!   only grows).
//!
//! Runs never cross a block boundary, so no combination straddles a
//! break. The result depends only on the catalog, target, and
//! tolerance, so it is memoized once per run.
//!
//! # Complexity
//! O(b * k^2) where b=blocks, k=slots per block.

use std::collections::HashMap;

use crate::models::{SlotCatalog, SlotCombination};

/// Returns every in-block slot run matching `target_minutes` within
/// `tolerance_minutes`.
///
/// An empty result means the duration cannot be placed with this
/// catalog.
///
/// # Example
///
/// ```
/// use u_timetable::models::{SlotCatalog, TimeSlot};
/// use u_timetable::scheduler::match_duration;
///
/// let catalog = SlotCatalog::new(vec![TimeSlot::hm(9, 0, 10, 0), TimeSlot::hm(10, 0, 10, 30)]);
/// let runs = match_duration(&catalog, 90, 5);
/// assert_eq!(runs.len(), 1);
/// assert_eq!(runs[0].total_minutes, 90);
/// ```
pub fn match_duration(
    catalog: &SlotCatalog,
    target_minutes: u32,
    tolerance_minutes: u32,
) -> Vec<SlotCombination> {
    let low = target_minutes.saturating_sub(tolerance_minutes);
    let high = target_minutes + tolerance_minutes;
    let mut found = Vec::new();

    for block in catalog.blocks() {
        for start in 0..block.slots.len() {
            let mut total = 0;
            for end in start..block.slots.len() {
                total += catalog
                    .get(block.slots[end])
                    .map(|s| s.duration_minutes())
                    .unwrap_or(0);
                if total > high {
                    break;
                }
                if total >= low {
                    if let Some(c) = catalog.combination(&block.slots[start..=end]) {
                        found.push(c);
                    }
                    break;
                }
            }
        }
    }

    found
}

/// Memoizing wrapper around [`match_duration`] for one catalog.
#[derive(Debug, Clone)]
pub struct DurationMatcher {
    catalog: SlotCatalog,
    tolerance_minutes: u32,
    cache: HashMap<u32, Vec<SlotCombination>>,
}

impl DurationMatcher {
    /// Creates a matcher over a catalog.
    pub fn new(catalog: SlotCatalog, tolerance_minutes: u32) -> Self {
        Self {
            catalog,
            tolerance_minutes,
            cache: HashMap::new(),
        }
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Combinations for a target duration, computed once per target.
    pub fn combinations_for(&mut self, target_minutes: u32) -> &[SlotCombination] {
        let catalog = &self.catalog;
        let tolerance = self.tolerance_minutes;
        self.cache
            .entry(target_minutes)
            .or_insert_with(|| match_duration(catalog, target_minutes, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotId, TimeSlot};

    #[test]
    fn test_ninety_minutes_in_short_block() {
        let cat = SlotCatalog::new(vec![TimeSlot::hm(9, 0, 10, 0), TimeSlot::hm(10, 0, 10, 30)]);
        let combos = match_duration(&cat, 90, 5);
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].total_minutes, 90);
        assert_eq!(combos[0].label(), "09:00-10:30");
    }

    #[test]
    fn test_sixty_minutes_uneven_slots() {
        // 15 / 45 / 15 minute slots
        let cat = SlotCatalog::new(vec![
            TimeSlot::hm(9, 0, 9, 15),
            TimeSlot::hm(9, 15, 10, 0),
            TimeSlot::hm(10, 0, 10, 15),
        ]);
        let combos = match_duration(&cat, 60, 5);
        let runs: Vec<Vec<SlotId>> = combos.iter().map(|c| c.slots.clone()).collect();
        assert_eq!(
            runs,
            vec![vec![SlotId(0), SlotId(1)], vec![SlotId(1), SlotId(2)]]
        );
        assert!(combos
            .iter()
            .all(|c| c.total_minutes >= 55 && c.total_minutes <= 65));
        // The lone 45 minute slot is outside the tolerance
        assert!(!runs.contains(&vec![SlotId(1)]));
    }

    #[test]
    fn test_never_straddles_break() {
        let cat = SlotCatalog::new(vec![
            TimeSlot::hm(9, 0, 10, 0),
            // break 10:00-10:15
            TimeSlot::hm(10, 15, 10, 45),
        ]);
        assert!(match_duration(&cat, 90, 5).is_empty());
    }

    #[test]
    fn test_standard_catalog_durations() {
        let cat = SlotCatalog::standard();
        // 120: 09:00-11:00, 11:15-13:15, 14:30-16:30, 15:30-17:30
        assert_eq!(match_duration(&cat, 120, 5).len(), 4);
        // 90: 09:00-10:30, 11:15-12:45, 14:30-16:00, 16:00-17:30
        let labels: Vec<String> = match_duration(&cat, 90, 5)
            .iter()
            .map(|c| c.label())
            .collect();
        assert_eq!(
            labels,
            vec!["09:00-10:30", "11:15-12:45", "14:30-16:00", "16:00-17:30"]
        );
    }

    #[test]
    fn test_unmatchable_duration() {
        let cat = SlotCatalog::standard();
        assert!(match_duration(&cat, 300, 5).is_empty());
    }

    #[test]
    fn test_memoized() {
        let mut m = DurationMatcher::new(SlotCatalog::standard(), 5);
        let first = m.combinations_for(60).to_vec();
        let second = m.combinations_for(60).to_vec();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
