//! Time slot catalog and continuous blocks.
//!
//! A teaching day is a fixed, ordered catalog of half-open intervals
//! `[start, end)` measured in minutes after midnight. Scheduled breaks
//! split the catalog into gap-free *continuous blocks*; a session may
//! only span several slots when they belong to the same block (the lab
//! fallback strategies are the one exception, see
//! [`SlotCatalog::adjacent_pairs`]).
//!
//! # Standard Day
//!
//! | Block | Slots |
//! |-------|-------|
//! | Morning | 09:00-10:00, 10:00-10:30, 10:30-11:00 |
//! | Late morning | 11:15-12:15, 12:15-12:45, 12:45-13:15 |
//! | Afternoon | 14:30-15:30, 15:30-16:00, 16:00-16:30, 16:30-17:30 |
//!
//! Breaks: 11:00-11:15 and lunch 13:15-14:30.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// A time interval [start, end) within a day, in minutes after midnight.
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Interval start (minutes after midnight, inclusive).
    pub start_minute: u16,
    /// Interval end (minutes after midnight, exclusive).
    pub end_minute: u16,
}

impl TimeSlot {
    /// Creates a new time slot.
    pub const fn new(start_minute: u16, end_minute: u16) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    /// Creates a time slot from hour/minute pairs.
    pub const fn hm(start_h: u16, start_m: u16, end_h: u16, end_m: u16) -> Self {
        Self::new(start_h * 60 + start_m, end_h * 60 + end_m)
    }

    /// Duration of this slot (minutes).
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end_minute.saturating_sub(self.start_minute))
    }

    /// Whether two slots overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }

    /// Display label, e.g. `09:00-10:30`.
    pub fn label(&self) -> String {
        format_span(self.start_minute, self.end_minute)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub(crate) fn format_span(start_minute: u16, end_minute: u16) -> String {
    format!(
        "{:02}:{:02}-{:02}:{:02}",
        start_minute / 60,
        start_minute % 60,
        end_minute / 60,
        end_minute % 60
    )
}

/// Position of a slot in its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(pub usize);

/// A maximal run of slots with no break between consecutive slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuousBlock {
    /// Block position within the day (0 = earliest).
    pub index: usize,
    /// Slots in chronological order.
    pub slots: Vec<SlotId>,
}

/// An ordered run of catalog slots assigned to one session.
///
/// Produced by the duration matcher (always within one block) or by
/// the lab fallback strategies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotCombination {
    /// Slots in chronological order.
    pub slots: Vec<SlotId>,
    /// Sum of the slot durations (minutes).
    pub total_minutes: u32,
    /// Start of the first slot.
    pub start_minute: u16,
    /// End of the last slot.
    pub end_minute: u16,
}

impl SlotCombination {
    /// Display label spanning first start to last end.
    pub fn label(&self) -> String {
        format_span(self.start_minute, self.end_minute)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the combination has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The fixed grid of usable time slots per day.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
    blocks: Vec<ContinuousBlock>,
}

impl SlotCatalog {
    /// Builds a catalog, sorting slots by start and partitioning them
    /// into continuous blocks wherever `slot.start != previous.end`.
    pub fn new(mut slots: Vec<TimeSlot>) -> Self {
        slots.sort_by_key(|s| (s.start_minute, s.end_minute));

        let mut blocks: Vec<ContinuousBlock> = Vec::new();
        for (i, slot) in slots.iter().enumerate() {
            let continues = i > 0 && slots[i - 1].end_minute == slot.start_minute;
            match blocks.last_mut() {
                Some(block) if continues => block.slots.push(SlotId(i)),
                _ => blocks.push(ContinuousBlock {
                    index: blocks.len(),
                    slots: vec![SlotId(i)],
                }),
            }
        }

        Self { slots, blocks }
    }

    /// The standard teaching day (three blocks, see module docs).
    pub fn standard() -> Self {
        Self::new(vec![
            TimeSlot::hm(9, 0, 10, 0),
            TimeSlot::hm(10, 0, 10, 30),
            TimeSlot::hm(10, 30, 11, 0),
            TimeSlot::hm(11, 15, 12, 15),
            TimeSlot::hm(12, 15, 12, 45),
            TimeSlot::hm(12, 45, 13, 15),
            TimeSlot::hm(14, 30, 15, 30),
            TimeSlot::hm(15, 30, 16, 0),
            TimeSlot::hm(16, 0, 16, 30),
            TimeSlot::hm(16, 30, 17, 30),
        ])
    }

    /// All slots in chronological order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Continuous blocks in chronological order.
    pub fn blocks(&self) -> &[ContinuousBlock] {
        &self.blocks
    }

    /// Looks up a slot by id.
    pub fn get(&self, id: SlotId) -> Option<&TimeSlot> {
        self.slots.get(id.0)
    }

    /// Number of slots per day.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total usable minutes per day.
    pub fn minutes_per_day(&self) -> u32 {
        self.slots.iter().map(TimeSlot::duration_minutes).sum()
    }

    /// Builds a combination from consecutive slot ids.
    ///
    /// Returns `None` if `ids` is empty or references unknown slots.
    pub fn combination(&self, ids: &[SlotId]) -> Option<SlotCombination> {
        let first = self.get(*ids.first()?)?;
        let last = self.get(*ids.last()?)?;
        let mut total = 0;
        for id in ids {
            total += self.get(*id)?.duration_minutes();
        }
        Some(SlotCombination {
            slots: ids.to_vec(),
            total_minutes: total,
            start_minute: first.start_minute,
            end_minute: last.end_minute,
        })
    }

    /// Every run of `min_len..=max_len` consecutive slots inside a block,
    /// regardless of duration.
    pub fn runs_within_blocks(&self, min_len: usize, max_len: usize) -> Vec<SlotCombination> {
        let mut runs = Vec::new();
        for block in &self.blocks {
            for len in min_len.max(1)..=max_len {
                for window in block.slots.windows(len) {
                    if let Some(c) = self.combination(window) {
                        runs.push(c);
                    }
                }
            }
        }
        runs
    }

    /// Every pair of catalog-adjacent slots, including pairs that
    /// straddle a break.
    pub fn adjacent_pairs(&self) -> Vec<SlotCombination> {
        let ids: Vec<SlotId> = (0..self.slots.len()).map(SlotId).collect();
        ids.windows(2)
            .filter_map(|pair| self.combination(pair))
            .collect()
    }

    /// Slots overlapping the interval [start, end).
    pub fn slots_overlapping(&self, start_minute: u16, end_minute: u16) -> Vec<SlotId> {
        let window = TimeSlot::new(start_minute, end_minute);
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.overlaps(&window))
            .map(|(i, _)| SlotId(i))
            .collect()
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// A weekly time window closed to regular class sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectiveWindow {
    /// Day of the week.
    pub day: Weekday,
    /// Window start (minutes after midnight).
    pub start_minute: u16,
    /// Window end (minutes after midnight).
    pub end_minute: u16,
}

impl ElectiveWindow {
    /// Creates a window from hour/minute pairs.
    pub const fn hm(day: Weekday, start_h: u16, start_m: u16, end_h: u16, end_m: u16) -> Self {
        Self {
            day,
            start_minute: start_h * 60 + start_m,
            end_minute: end_h * 60 + end_m,
        }
    }

    /// Catalog slots covered by this window.
    pub fn reserved_slots(&self, catalog: &SlotCatalog) -> Vec<SlotId> {
        catalog.slots_overlapping(self.start_minute, self.end_minute)
    }
}

/// Elective windows reserved every week: Tuesday and Thursday 16:30-17:30.
pub const ELECTIVE_WINDOWS: [ElectiveWindow; 2] = [
    ElectiveWindow::hm(Weekday::Tue, 16, 30, 17, 30),
    ElectiveWindow::hm(Weekday::Thu, 16, 30, 17, 30),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot() {
        let s = TimeSlot::hm(9, 0, 10, 30);
        assert_eq!(s.duration_minutes(), 90);
        assert_eq!(s.label(), "09:00-10:30");
        assert!(s.overlaps(&TimeSlot::hm(10, 0, 11, 0)));
        assert!(!s.overlaps(&TimeSlot::hm(10, 30, 11, 0))); // touching
    }

    #[test]
    fn test_standard_blocks() {
        let cat = SlotCatalog::standard();
        assert_eq!(cat.len(), 10);
        assert_eq!(cat.blocks().len(), 3);
        assert_eq!(cat.blocks()[0].slots, vec![SlotId(0), SlotId(1), SlotId(2)]);
        assert_eq!(cat.blocks()[2].slots.len(), 4);
        assert_eq!(cat.minutes_per_day(), 420);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let cat = SlotCatalog::new(vec![TimeSlot::hm(10, 0, 11, 0), TimeSlot::hm(9, 0, 10, 0)]);
        assert_eq!(cat.get(SlotId(0)), Some(&TimeSlot::hm(9, 0, 10, 0)));
        assert_eq!(cat.blocks().len(), 1);
    }

    #[test]
    fn test_runs_within_blocks_never_cross_breaks() {
        let cat = SlotCatalog::standard();
        let runs = cat.runs_within_blocks(2, 3);
        // Morning: 2 pairs + 1 triple, late morning: 2 + 1, afternoon: 3 + 2
        assert_eq!(runs.len(), 11);
        for run in &runs {
            let block = cat
                .blocks()
                .iter()
                .find(|b| b.slots.contains(&run.slots[0]))
                .unwrap();
            assert!(run.slots.iter().all(|s| block.slots.contains(s)));
        }
    }

    #[test]
    fn test_adjacent_pairs_include_break_pairs() {
        let cat = SlotCatalog::standard();
        let pairs = cat.adjacent_pairs();
        assert_eq!(pairs.len(), 9);
        assert!(pairs.iter().any(|p| p.slots == vec![SlotId(2), SlotId(3)]));
    }

    #[test]
    fn test_elective_window_slots() {
        let cat = SlotCatalog::standard();
        let w = ELECTIVE_WINDOWS[0];
        assert_eq!(w.day, Weekday::Tue);
        assert_eq!(w.reserved_slots(&cat), vec![SlotId(9)]);
    }
}
