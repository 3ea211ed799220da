use crate::kdtree::r#trait::sq_dist;
use crate::r#type::IndexableNum;

#[derive(Clone, Copy)]
struct Candidate<N> {
    id: u32,
    dist: N,
}

/// A bounded best-k candidate set.
///
/// Tracks which slot holds the current worst (largest squared distance)
/// candidate, so a closer point can overwrite it in place; a linear rescan
/// then finds the new worst. k is expected to be small relative to the
/// number of points, which keeps the rescan cheap.
pub(crate) struct NearestCandidates<N: IndexableNum> {
    capacity: usize,
    entries: Vec<Candidate<N>>,
    worst_slot: usize,
}

impl<N: IndexableNum> NearestCandidates<N> {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
            worst_slot: 0,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Squared distance of the current worst candidate. Only meaningful once
    /// at least one candidate is held.
    pub(crate) fn worst_dist(&self) -> N {
        self.entries[self.worst_slot].dist
    }

    /// Offer a candidate; it is kept if the set is not yet full or it beats
    /// the current worst.
    pub(crate) fn consider(&mut self, id: u32, dist: N) {
        if self.entries.len() < self.capacity {
            if self.entries.is_empty() || dist > self.worst_dist() {
                self.worst_slot = self.entries.len();
            }
            self.entries.push(Candidate { id, dist });
        } else if dist < self.worst_dist() {
            self.entries[self.worst_slot] = Candidate { id, dist };
            self.rescan_worst();
        }
    }

    fn rescan_worst(&mut self) {
        let mut worst = 0;
        for slot in 1..self.entries.len() {
            if self.entries[slot].dist > self.entries[worst].dist {
                worst = slot;
            }
        }
        self.worst_slot = worst;
    }

    pub(crate) fn into_ids(self) -> Vec<u32> {
        self.entries.into_iter().map(|c| c.id).collect()
    }
}

/// Recursive k-nearest traversal over the kd-sorted buffers.
pub(crate) struct NearestSearch<'a, N: IndexableNum> {
    pub(crate) coords: &'a [N],
    pub(crate) ids: &'a [u32],
    pub(crate) num_dims: usize,
    pub(crate) bucket_size: usize,
    pub(crate) center: &'a [N],
}

impl<N: IndexableNum> NearestSearch<'_, N> {
    /// Search `[left, right]`, split on `axis`, accumulating into `best`.
    pub(crate) fn descend(
        &self,
        left: usize,
        right: usize,
        axis: usize,
        best: &mut NearestCandidates<N>,
    ) {
        // if we reached a leaf range, consider every point in it
        if right - left <= self.bucket_size {
            for pos in left..=right {
                best.consider(self.ids[pos], self.sq_dist_to_center(pos));
            }
            return;
        }

        let m = (left + right) >> 1;
        let split = self.coords[self.num_dims * m + axis];
        let position = self.center[axis];
        let next_axis = (axis + 1) % self.num_dims;

        // descend into the half containing the query point first, so the
        // worst tracked distance has shrunk before the far side is tested
        let (near, far) = if position <= split {
            ((left, m - 1), (m + 1, right))
        } else {
            ((m + 1, right), (left, m - 1))
        };

        self.descend(near.0, near.1, next_axis, best);

        // the median is a real point, not a synthetic splitter
        best.consider(self.ids[m], self.sq_dist_to_center(m));

        // the far half can only hold a closer point if the query sphere of
        // the current worst distance reaches across the split plane
        let gap = position - split;
        if !best.is_full() || gap * gap <= best.worst_dist() {
            self.descend(far.0, far.1, next_axis, best);
        }
    }

    #[inline]
    fn sq_dist_to_center(&self, pos: usize) -> N {
        let point = &self.coords[self.num_dims * pos..self.num_dims * (pos + 1)];
        sq_dist(point, self.center)
    }
}
