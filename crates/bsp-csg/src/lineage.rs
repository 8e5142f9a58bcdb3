//! Lineage tags linking polygon fragments back to the polygon they were cut from.

use std::num::NonZeroU32;

/// Identifies every fragment produced by splitting one original polygon.
///
/// Fragments sharing a lineage id may be joined back together after clipping.
/// Polygons that were never split carry no lineage (`None` on [`Polygon`]),
/// which is never eligible for rejoining.
///
/// [`Polygon`]: crate::Polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineageId(NonZeroU32);

impl LineageId {
    /// Returns the raw id value (always non-zero).
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Source of fresh lineage ids.
///
/// The counter is passed explicitly through every operation that splits
/// polygons; ids are unique per counter, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct LineageCounter {
    last: u32,
}

impl LineageCounter {
    /// Creates a counter whose first id will be 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next lineage id.
    pub fn next_id(&mut self) -> LineageId {
        // Ids repeat after u32::MAX splits within one operation.
        self.last = self.last.wrapping_add(1);
        LineageId(NonZeroU32::new(self.last).unwrap_or(NonZeroU32::MIN))
    }

    /// Returns the number of ids handed out so far.
    #[inline]
    pub fn issued(&self) -> u32 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut counter = LineageCounter::new();
        assert_eq!(counter.issued(), 0);
        let first = counter.next_id();
        let second = counter.next_id();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_ne!(first, second);
        assert_eq!(counter.issued(), 2);
    }

    #[test]
    fn counters_are_independent() {
        let mut a = LineageCounter::new();
        let mut b = LineageCounter::new();
        a.next_id();
        assert_eq!(b.next_id().get(), 1);
    }
}
