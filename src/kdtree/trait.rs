use tinyvec::TinyVec;

use crate::error::{PointIndexError, Result};
use crate::kdtree::neighbors::{NearestCandidates, NearestSearch};
use crate::r#type::IndexableNum;

/// A trait for searching and accessing data out of a k-d tree.
pub trait KDTreeIndex<N: IndexableNum> {
    /// The underlying kd-sorted coordinate buffer, interleaved.
    fn coords(&self) -> &[N];

    /// The ids of the points, permuted into kd-sorted order.
    ///
    /// An id is the point's original insertion index.
    fn ids(&self) -> &[u32];

    /// The number of points in this tree.
    fn num_items(&self) -> usize;

    /// The number of coordinates per point.
    fn num_dims(&self) -> usize;

    /// The bucket size this tree was built with.
    fn bucket_size(&self) -> usize;

    /// The coordinates of the point at a kd-sorted position.
    fn point(&self, pos: usize) -> &[N] {
        let num_dims = self.num_dims();
        &self.coords()[num_dims * pos..num_dims * (pos + 1)]
    }

    /// Per-axis minimum and maximum over the whole point set.
    fn bounds(&self) -> (Vec<N>, Vec<N>) {
        let num_dims = self.num_dims();
        let mut min = vec![N::infinity(); num_dims];
        let mut max = vec![N::neg_infinity(); num_dims];
        for point in self.coords().chunks_exact(num_dims) {
            for (axis, &value) in point.iter().enumerate() {
                if value < min[axis] {
                    min[axis] = value;
                }
                if value > max[axis] {
                    max[axis] = value;
                }
            }
        }
        (min, max)
    }

    /// Search the index for points within a given radius of `center`.
    ///
    /// Returns ids of found points, in no particular order. A radius of 0
    /// matches only points at exactly the center's coordinates.
    fn within(&self, center: &[N], radius: N) -> Result<Vec<u32>> {
        check_center(center, self.num_dims())?;
        if radius.is_nan() || radius < N::zero() {
            return Err(PointIndexError::InvalidInput(format!(
                "radius must be a non-negative number, got {:?}",
                radius
            )));
        }

        let coords = self.coords();
        let ids = self.ids();
        let num_dims = self.num_dims();
        let bucket_size = self.bucket_size();
        let r2 = radius * radius;

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[usize; 33]> = TinyVec::new();
        stack.push(0);
        stack.push(self.num_items() - 1);
        stack.push(0);

        let mut result: Vec<u32> = vec![];

        // search for points within radius in the kd-sorted arrays
        while !stack.is_empty() {
            let axis = stack.pop().unwrap_or(0);
            let right = stack.pop().unwrap_or(0);
            let left = stack.pop().unwrap_or(0);

            // if we reached a leaf range, search linearly
            if right - left <= bucket_size {
                for pos in left..=right {
                    let point = &coords[num_dims * pos..num_dims * (pos + 1)];
                    if sq_dist(point, center) <= r2 {
                        result.push(ids[pos]);
                    }
                }
                continue;
            }

            // otherwise find the middle index
            let m = (left + right) >> 1;

            // include the middle point if it's in range
            let split_point = &coords[num_dims * m..num_dims * (m + 1)];
            if sq_dist(split_point, center) <= r2 {
                result.push(ids[m]);
            }

            let split = split_point[axis];
            let next_axis = (axis + 1) % num_dims;

            // queue search in the halves the query sphere reaches into
            if center[axis] - radius <= split {
                stack.push(left);
                stack.push(m - 1);
                stack.push(next_axis);
            }
            if center[axis] + radius >= split {
                stack.push(m + 1);
                stack.push(right);
                stack.push(next_axis);
            }
        }

        Ok(result)
    }

    /// Search the index for the `k` points closest to `center`.
    ///
    /// Returns ids of found points, in no particular order; fewer than `k`
    /// when the tree holds fewer than `k` points. When several points tie at
    /// the k-th distance, which of them is returned is unspecified.
    fn nearest(&self, center: &[N], k: usize) -> Result<Vec<u32>> {
        check_center(center, self.num_dims())?;
        if k == 0 {
            return Ok(vec![]);
        }

        let mut best = NearestCandidates::new(k);
        let search = NearestSearch {
            coords: self.coords(),
            ids: self.ids(),
            num_dims: self.num_dims(),
            bucket_size: self.bucket_size(),
            center,
        };
        search.descend(0, self.num_items() - 1, 0, &mut best);

        Ok(best.into_ids())
    }
}

fn check_center<N: IndexableNum>(center: &[N], num_dims: usize) -> Result<()> {
    if center.len() != num_dims {
        return Err(PointIndexError::InvalidInput(format!(
            "query point has {} coordinates when the index holds {}-dimensional points",
            center.len(),
            num_dims
        )));
    }
    Ok(())
}

/// Squared Euclidean distance between two equal-length coordinate slices.
#[inline]
pub(crate) fn sq_dist<N: IndexableNum>(a: &[N], b: &[N]) -> N {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(N::zero(), |sum, (&av, &bv)| sum + (av - bv) * (av - bv))
}
