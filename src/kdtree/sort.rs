use rand::Rng;

use crate::r#type::IndexableNum;

/// Mutable view over the parallel coordinate and id buffers while they are
/// being kd-sorted.
///
/// Coordinates are interleaved: item `i`'s value on `axis` lives at
/// `coords[num_dims * i + axis]`. Every swap moves an item's id together
/// with all of its coordinates, so the two buffers stay aligned.
pub(crate) struct KdSorter<'a, N: IndexableNum, R: Rng> {
    pub(crate) coords: &'a mut [N],
    pub(crate) ids: &'a mut [u32],
    pub(crate) num_dims: usize,
    pub(crate) bucket_size: usize,
    pub(crate) rng: R,
}

impl<N: IndexableNum, R: Rng> KdSorter<'_, N, R> {
    /// Recursively kd-sort `[left, right]`: fix the true median on `axis` at
    /// the range midpoint, then sort both halves on the next axis.
    pub(crate) fn sort(&mut self, left: usize, right: usize, axis: usize) {
        // small ranges are left as-is and scanned linearly by queries
        if right - left <= self.bucket_size {
            return;
        }

        let m = (left + right) >> 1;

        // sort ids and coords around the middle index so that the halves lie
        // either side of the median on this axis (axes taking turns)
        self.select(left, right, m, axis);

        let next_axis = (axis + 1) % self.num_dims;
        self.sort(left, m - 1, next_axis);
        self.sort(m + 1, right, next_axis);
    }

    /// Quickselect: permute `[left, right]` so that the item at `k` is the
    /// one a full sort by `axis` would put there, with smaller-or-equal items
    /// on its left and larger-or-equal items on its right.
    pub(crate) fn select(&mut self, mut left: usize, mut right: usize, k: usize, axis: usize) {
        debug_assert!(left <= k && k <= right);

        while left < right {
            let pivot_index = self.rng.gen_range(left..right);
            let split = self.partition(left, right, axis, pivot_index);
            if k < split {
                right = split - 1;
            } else if k > split {
                left = split + 1;
            } else {
                return;
            }
        }
    }

    /// Partition `[left, right]` around the value at `pivot_index` on `axis`.
    ///
    /// Returns a split index `p` with every item of `[left, p]` <= the value
    /// at `p` and every item of `(p, right]` >= it.
    pub(crate) fn partition(
        &mut self,
        left: usize,
        right: usize,
        axis: usize,
        pivot_index: usize,
    ) -> usize {
        let pivot_value = self.value(pivot_index, axis);

        // move the pivot to the end
        self.swap_item(pivot_index, right);

        // swap values that are smaller than the pivot to the front
        let mut split = left;
        for i in left..right {
            if self.value(i, axis) < pivot_value {
                self.swap_item(split, i);
                split += 1;
            }
        }

        // move the pivot to its final position
        self.swap_item(right, split);

        // try to move the split closer to the median if possible; this
        // matters when many points sit on an axis-aligned line
        let median = (left + right) >> 1;
        while split < median && self.value(split + 1, axis) == pivot_value {
            split += 1;
        }

        split
    }

    fn swap_item(&mut self, i: usize, j: usize) {
        self.ids.swap(i, j);
        for axis in 0..self.num_dims {
            self.coords
                .swap(self.num_dims * i + axis, self.num_dims * j + axis);
        }
    }

    #[inline]
    fn value(&self, index: usize, axis: usize) -> N {
        self.coords[self.num_dims * index + axis]
    }
}
