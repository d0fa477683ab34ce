//! Contact graph: registered spines plus an adjacency structure recording
//! which pairs currently overlap.
//!
//! Every scan is exhaustive (O(N) per query). The edge set must always equal
//! what a brute-force all-pairs test of the current poses would find, which
//! holds as long as [`ContactGraph::update`] is called after every pose change.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::error::{Result, SpineError};
use crate::spine::Spine;

static NEXT_GRAPH: AtomicU64 = AtomicU64::new(0);

/// Stable handle issued by [`ContactGraph::register`]. It never changes when
/// the spine moves, and only the issuing graph (or a clone of it) accepts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpineId {
    index: usize,
    graph: u64,
}

impl SpineId {
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for SpineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Owns the registered spines and their overlap edges.
///
/// Adjacency is symmetric: `j` is in `adjacency[i]` iff `i` is in
/// `adjacency[j]`. Sorted sets keep pair emission ordered and duplicate-free.
#[derive(Clone, Debug)]
pub struct ContactGraph {
    /// Stamped into every handle this graph issues.
    stamp: u64,
    spines: Vec<Spine>,
    adjacency: Vec<BTreeSet<usize>>,
}

impl Default for ContactGraph {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl ContactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stamp: NEXT_GRAPH.fetch_add(1, Ordering::Relaxed),
            spines: Vec::with_capacity(capacity),
            adjacency: Vec::with_capacity(capacity),
        }
    }

    /// Take ownership of `spine`, hand out the next handle and record its
    /// overlaps with every previously registered spine.
    pub fn register(&mut self, spine: Spine) -> SpineId {
        let hits = self.overlapping_with(&spine, None);
        let id = self.spines.len();
        self.spines.push(spine);
        self.adjacency.push(BTreeSet::new());
        for other in hits {
            self.link(id, other.index);
        }
        self.handle(id)
    }

    /// Drop every edge incident to `id` and recompute them from the current
    /// pose. Edges between other spines are left untouched.
    pub fn update(&mut self, id: SpineId) -> Result<()> {
        let i = self.check(id)?;
        let stale = std::mem::take(&mut self.adjacency[i]);
        for j in stale {
            self.adjacency[j].remove(&i);
        }
        let hits = self.overlapping_with(&self.spines[i], Some(id));
        for other in hits {
            self.link(i, other.index);
        }
        Ok(())
    }

    /// Every registered spine overlapping `spine`'s pose. `exclude` skips a
    /// member, so querying a registered spine does not report itself.
    pub fn overlapping_with(&self, spine: &Spine, exclude: Option<SpineId>) -> Vec<SpineId> {
        self.spines
            .iter()
            .enumerate()
            .map(|(j, other)| (self.handle(j), other))
            .filter(|&(id, other)| Some(id) != exclude && spine.is_overlapped_with(other))
            .map(|(id, _)| id)
            .collect()
    }

    /// Overlaps of a registered spine, excluding itself.
    pub fn overlapping_with_member(&self, id: SpineId) -> Result<Vec<SpineId>> {
        let i = self.check(id)?;
        Ok(self.overlapping_with(&self.spines[i], Some(id)))
    }

    /// Every edge once, as `(i, j)` with `i < j`, ascending by `i` then `j`.
    pub fn contact_pairs(&self) -> impl Iterator<Item = (SpineId, SpineId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(move |(i, neighbors)| {
            neighbors
                .range(i + 1..)
                .map(move |&j| (self.handle(i), self.handle(j)))
        })
    }

    /// Like [`contact_pairs`](Self::contact_pairs) but yielding the spines.
    pub fn contacts(&self) -> impl Iterator<Item = (&Spine, &Spine)> + '_ {
        self.contact_pairs()
            .map(move |(a, b)| (&self.spines[a.index], &self.spines[b.index]))
    }

    /// [`contact_pairs`](Self::contact_pairs) as plain indices, for callers
    /// that outlive the graph.
    pub fn index_pairs(&self) -> Vec<(usize, usize)> {
        self.contact_pairs()
            .map(|(a, b)| (a.index(), b.index()))
            .collect()
    }

    /// Number of overlapping pairs.
    pub fn contact_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn neighbors(&self, id: SpineId) -> Result<Vec<SpineId>> {
        let i = self.check(id)?;
        Ok(self.adjacency[i].iter().map(|&j| self.handle(j)).collect())
    }

    pub fn spine(&self, id: SpineId) -> Result<&Spine> {
        let i = self.check(id)?;
        Ok(&self.spines[i])
    }

    /// Mutable access to a spine. The graph is stale for this spine until
    /// [`update`](Self::update) is called with the same handle.
    pub fn spine_mut(&mut self, id: SpineId) -> Result<&mut Spine> {
        let i = self.check(id)?;
        Ok(&mut self.spines[i])
    }

    /// All spines in handle order.
    pub fn spines(&self) -> &[Spine] {
        &self.spines
    }

    pub fn len(&self) -> usize {
        self.spines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spines.is_empty()
    }

    /// Handle of the spine at `index`, if it is registered.
    pub fn id_at(&self, index: usize) -> Option<SpineId> {
        (index < self.spines.len()).then(|| self.handle(index))
    }

    /// [`overlap_scan`] of the current poses, as handles.
    pub fn brute_force_pairs(&self) -> Vec<(SpineId, SpineId)> {
        overlap_scan(&self.spines)
            .into_iter()
            .map(|(i, j)| (self.handle(i), self.handle(j)))
            .collect()
    }

    /// True when the recorded edges match a fresh brute-force scan.
    pub fn is_consistent(&self) -> bool {
        self.contact_pairs().eq(self.brute_force_pairs())
    }

    fn link(&mut self, i: usize, j: usize) {
        self.adjacency[i].insert(j);
        self.adjacency[j].insert(i);
    }

    fn handle(&self, index: usize) -> SpineId {
        SpineId {
            index,
            graph: self.stamp,
        }
    }

    fn check(&self, id: SpineId) -> Result<usize> {
        if id.graph == self.stamp && id.index < self.spines.len() {
            Ok(id.index)
        } else {
            Err(SpineError::UnknownSpine(id.index))
        }
    }
}

/// Exhaustive O(N^2) overlap scan of `spines` as index pairs `(i, j)` with
/// `i < j`, sorted like [`ContactGraph::contact_pairs`]. Pair tests run on the
/// rayon pool.
pub fn overlap_scan(spines: &[Spine]) -> Vec<(usize, usize)> {
    let n = spines.len();
    let mut pairs: Vec<(usize, usize)> = (0..n)
        .into_par_iter()
        .flat_map_iter(move |i| {
            (i + 1..n)
                .filter(move |&j| spines[i].is_overlapped_with(&spines[j]))
                .map(move |j| (i, j))
        })
        .collect();
    pairs.sort_unstable();
    pairs
}
