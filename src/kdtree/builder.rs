use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{PointIndexError, Result};
use crate::kdtree::sort::KdSorter;
use crate::kdtree::KDTree;
use crate::r#type::IndexableNum;

const DEFAULT_BUCKET_SIZE: usize = 64;

/// A builder to create a [`KDTree`].
///
/// Points are appended one by one (or in bulk from an interleaved slice);
/// [`finish`][KDTreeBuilder::finish] kd-sorts the collected buffer in place
/// and returns the immutable tree.
pub struct KDTreeBuilder<N: IndexableNum> {
    coords: Vec<N>,
    num_dims: usize,
    bucket_size: usize,
}

impl<N: IndexableNum> KDTreeBuilder<N> {
    /// Create a new builder for points with `num_dims` coordinates, using the
    /// default bucket size.
    pub fn new(num_dims: usize) -> Result<Self> {
        Self::new_with_bucket_size(num_dims, DEFAULT_BUCKET_SIZE)
    }

    /// Create a new builder with the provided bucket size.
    ///
    /// A range of at most `bucket_size + 1` points is kept as a leaf and
    /// scanned linearly by queries instead of being split further.
    pub fn new_with_bucket_size(num_dims: usize, bucket_size: usize) -> Result<Self> {
        if num_dims < 1 {
            return Err(PointIndexError::InvalidInput(
                "number of dimensions must be at least 1".to_string(),
            ));
        }
        if bucket_size < 1 {
            return Err(PointIndexError::InvalidInput(
                "bucket size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            coords: vec![],
            num_dims,
            bucket_size,
        })
    }

    /// Add a point to the index, returning its id.
    ///
    /// Ids count up from 0 in insertion order and are what queries report
    /// back, so the returned value indexes the caller's own point collection.
    pub fn add(&mut self, point: &[N]) -> Result<usize> {
        if point.len() != self.num_dims {
            return Err(PointIndexError::InvalidInput(format!(
                "point has {} coordinates when the index holds {}-dimensional points",
                point.len(),
                self.num_dims
            )));
        }

        let index = self.coords.len() / self.num_dims;
        self.coords.extend_from_slice(point);
        Ok(index)
    }

    /// Add points in bulk from an interleaved coordinate slice.
    ///
    /// Point `i` of the slice is read from
    /// `coords[num_dims * i..num_dims * (i + 1)]`.
    pub fn add_interleaved(&mut self, coords: &[N]) -> Result<()> {
        if coords.len() % self.num_dims != 0 {
            return Err(PointIndexError::InvalidInput(format!(
                "interleaved buffer of {} values is not a whole number of {}-dimensional points",
                coords.len(),
                self.num_dims
            )));
        }

        self.coords.extend_from_slice(coords);
        Ok(())
    }

    /// Consume this builder, performing the k-d sort and generating a
    /// [`KDTree`] ready for queries.
    pub fn finish(self) -> Result<KDTree<N>> {
        self.finish_with_rng(SmallRng::from_entropy())
    }

    /// Like [`finish`][KDTreeBuilder::finish], but with deterministic pivot
    /// selection: the same points and seed always produce the same tree.
    pub fn finish_with_seed(self, seed: u64) -> Result<KDTree<N>> {
        self.finish_with_rng(SmallRng::seed_from_u64(seed))
    }

    fn finish_with_rng<R: Rng>(self, rng: R) -> Result<KDTree<N>> {
        let num_items = self.coords.len() / self.num_dims;
        if num_items == 0 {
            return Err(PointIndexError::InvalidInput(
                "cannot build an index over an empty point set".to_string(),
            ));
        }
        assert!(num_items <= u32::MAX as usize);

        let mut coords = self.coords;
        let mut ids: Vec<u32> = (0..num_items as u32).collect();

        // kd-sort both arrays for efficient search
        let mut sorter = KdSorter {
            coords: &mut coords,
            ids: &mut ids,
            num_dims: self.num_dims,
            bucket_size: self.bucket_size,
            rng,
        };
        sorter.sort(0, num_items - 1, 0);

        Ok(KDTree {
            coords,
            ids,
            num_items,
            num_dims: self.num_dims,
            bucket_size: self.bucket_size,
        })
    }
}
