//! Per-step active contact table.
//!
//! Every source particle owns a reserved, fixed-size, contiguous slot
//! range in one flat arena. Compaction of its broad-phase candidates into
//! that range touches no other particle's slots, so the rebuild runs over
//! disjoint mutable chunks with no locks or atomics. Candidates validated
//! past the reserved capacity are dropped silently; a per-rebuild counter
//! records how many.
//!
//! The table carries no history: particle motion invalidates last step's
//! geometry, so the whole arena is rebuilt at the start of every step.

use crate::narrow::Overlap;
use rayon::prelude::*;
use scree_math::Vec3;

/// Stride-layout candidate neighbor lists handed over by the external
/// broad-phase spatial index. Regenerated every step; no history.
#[derive(Debug, Clone)]
pub struct CandidateLists {
    capacity: usize,
    counts: Vec<u32>,
    entries: Vec<u32>,
}

impl CandidateLists {
    /// Empty lists for `n_sources` particles with `capacity` slots each.
    pub fn new(n_sources: usize, capacity: usize) -> Self {
        Self {
            capacity,
            counts: vec![0; n_sources],
            entries: vec![0; n_sources * capacity],
        }
    }

    /// Per-particle candidate capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of source particles.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether there are no source particles.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Append a candidate counterpart for `source`. Candidates beyond the
    /// list capacity are dropped, mirroring the contact table's own
    /// truncation rule.
    pub fn push(&mut self, source: usize, target: u32) {
        let count = self.counts[source] as usize;
        if count < self.capacity {
            self.entries[source * self.capacity + count] = target;
            self.counts[source] += 1;
        }
    }

    /// Candidate counterparts recorded for `source`.
    pub fn candidates(&self, source: usize) -> &[u32] {
        let start = source * self.capacity;
        &self.entries[start..start + self.counts[source] as usize]
    }

    /// Drop all candidates, keeping the allocation.
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }
}

/// One validated contact, alive for exactly one step.
#[derive(Debug, Clone, Copy)]
pub struct ContactPair {
    /// Index of the source particle.
    pub source: u32,
    /// Index of the counterpart (particle or wall facet).
    pub target: u32,
    /// Linear material-pair index into the surface table.
    pub pair_index: u32,
    /// Signed gap from the narrow-phase test (negative = penetrating).
    pub gap: f64,
    /// Unit contact normal, counterpart toward source.
    pub normal: Vec3,
}

/// Capacity-bounded active contact list for one step.
#[derive(Debug, Clone, Default)]
pub struct ContactTable {
    capacity: usize,
    slots: Vec<Option<ContactPair>>,
    truncated: usize,
}

impl ContactTable {
    /// Empty table. Sized on the first rebuild.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserved per-source slot capacity of the last rebuild.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Candidates validated but dropped for exceeding some source's
    /// reserved capacity during the last rebuild.
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Rebuild the table from this step's candidate lists.
    ///
    /// `narrow(source, target)` is the pluggable narrow-phase predicate;
    /// `pair_of(source, target)` resolves the material-pair index for a
    /// validated pair. Each source's writes stay inside its own slot
    /// range, so sources are processed in parallel.
    pub fn rebuild<N, P>(&mut self, candidates: &CandidateLists, capacity: usize, narrow: N, pair_of: P)
    where
        N: Fn(u32, u32) -> Option<Overlap> + Sync,
        P: Fn(u32, u32) -> u32 + Sync,
    {
        let n_sources = candidates.len();
        self.capacity = capacity;
        self.slots.clear();
        self.slots.resize(n_sources * capacity, None);

        if capacity == 0 {
            // No reserved slots at all: every validated candidate drops.
            self.truncated = (0..n_sources)
                .into_par_iter()
                .map(|source| {
                    candidates
                        .candidates(source)
                        .iter()
                        .filter(|&&target| narrow(source as u32, target).is_some())
                        .count()
                })
                .sum();
            return;
        }

        self.truncated = self
            .slots
            .par_chunks_mut(capacity)
            .enumerate()
            .map(|(source, range)| {
                let source = source as u32;
                let mut written = 0;
                let mut dropped = 0;
                for &target in candidates.candidates(source as usize) {
                    let Some(overlap) = narrow(source, target) else {
                        continue;
                    };
                    if written < capacity {
                        range[written] = Some(ContactPair {
                            source,
                            target,
                            pair_index: pair_of(source, target),
                            gap: overlap.gap,
                            normal: overlap.normal,
                        });
                        written += 1;
                    } else {
                        dropped += 1;
                    }
                }
                dropped
            })
            .sum();
    }

    /// Active contacts attributed to `source`.
    pub fn contacts_of(&self, source: usize) -> impl Iterator<Item = &ContactPair> {
        let start = source * self.capacity;
        self.slots[start..start + self.capacity]
            .iter()
            .filter_map(|slot| slot.as_ref())
    }

    /// All active contacts of the current step.
    pub fn iter_active(&self) -> impl Iterator<Item = &ContactPair> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Parallel iterator over the active contacts.
    pub fn par_iter_active(&self) -> impl ParallelIterator<Item = &ContactPair> {
        self.slots.par_iter().filter_map(|slot| slot.as_ref())
    }

    /// Total number of active contacts.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Validates every candidate with a fixed unit normal.
    fn accept_all(_source: u32, _target: u32) -> Option<Overlap> {
        Some(Overlap {
            gap: -0.01,
            normal: Vec3::new(0.0, 0.0, 1.0),
        })
    }

    #[test]
    fn test_candidate_lists_layout() {
        let mut lists = CandidateLists::new(3, 2);
        lists.push(0, 7);
        lists.push(2, 4);
        lists.push(2, 5);
        assert_eq!(lists.candidates(0), &[7]);
        assert_eq!(lists.candidates(1), &[] as &[u32]);
        assert_eq!(lists.candidates(2), &[4, 5]);
    }

    #[test]
    fn test_candidate_lists_drop_beyond_capacity() {
        let mut lists = CandidateLists::new(1, 2);
        for t in 0..5 {
            lists.push(0, t);
        }
        assert_eq!(lists.candidates(0), &[0, 1]);
    }

    #[test]
    fn test_rebuild_places_contacts_in_own_range() {
        let mut lists = CandidateLists::new(3, 4);
        lists.push(0, 10);
        lists.push(0, 11);
        lists.push(2, 12);

        let mut table = ContactTable::new();
        table.rebuild(&lists, 4, accept_all, |s, t| s * 100 + t);

        let of0: Vec<u32> = table.contacts_of(0).map(|c| c.target).collect();
        assert_eq!(of0, vec![10, 11]);
        assert_eq!(table.contacts_of(1).count(), 0);
        let of2: Vec<&ContactPair> = table.contacts_of(2).collect();
        assert_eq!(of2.len(), 1);
        assert_eq!(of2[0].pair_index, 2 * 100 + 12);
        assert_eq!(table.active_count(), 3);
        assert_eq!(table.truncated(), 0);
    }

    #[test]
    fn test_capacity_bound_and_truncation_counter() {
        // Candidate lists wider than the reserved contact capacity: the
        // excess validated candidates must be dropped, not spilled.
        let mut lists = CandidateLists::new(2, 6);
        for t in 0..6 {
            lists.push(0, t);
        }
        lists.push(1, 9);

        let mut table = ContactTable::new();
        table.rebuild(&lists, 2, accept_all, |_, _| 0);

        assert_eq!(table.contacts_of(0).count(), 2);
        assert_eq!(table.contacts_of(1).count(), 1);
        assert_eq!(table.truncated(), 4);
        for source in 0..2 {
            assert!(table.contacts_of(source).count() <= table.capacity());
        }
    }

    #[test]
    fn test_rejected_candidates_leave_empty_slots() {
        let mut lists = CandidateLists::new(1, 3);
        lists.push(0, 1);
        lists.push(0, 2);
        lists.push(0, 3);

        let mut table = ContactTable::new();
        // Only even targets pass the narrow phase.
        table.rebuild(
            &lists,
            3,
            |_, t| (t % 2 == 0).then(|| accept_all(0, t).unwrap()),
            |_, _| 0,
        );

        assert_eq!(table.active_count(), 1);
        assert_eq!(table.iter_active().next().unwrap().target, 2);
        assert_eq!(table.truncated(), 0);
    }

    #[test]
    fn test_rebuild_discards_previous_step() {
        let mut lists = CandidateLists::new(2, 2);
        lists.push(0, 1);
        lists.push(1, 0);

        let mut table = ContactTable::new();
        table.rebuild(&lists, 2, accept_all, |_, _| 0);
        assert_eq!(table.active_count(), 2);

        lists.clear();
        table.rebuild(&lists, 2, accept_all, |_, _| 0);
        assert_eq!(table.active_count(), 0);
    }

    #[test]
    fn test_zero_capacity_still_counts_drops() {
        let mut lists = CandidateLists::new(2, 3);
        lists.push(0, 1);
        lists.push(0, 2);
        lists.push(1, 0);

        let mut table = ContactTable::new();
        table.rebuild(&lists, 0, accept_all, |_, _| 0);

        assert_eq!(table.active_count(), 0);
        assert_eq!(table.truncated(), 3);
    }

    #[test]
    fn test_empty_sources() {
        let lists = CandidateLists::new(0, 4);
        let mut table = ContactTable::new();
        table.rebuild(&lists, 4, accept_all, |_, _| 0);
        assert_eq!(table.active_count(), 0);
        assert_eq!(table.truncated(), 0);
    }
}
