use crate::error::Result;
use crate::kdtree::{KDTreeBuilder, KDTreeIndex};
use crate::r#type::IndexableNum;

/// An owned, immutable k-d tree over n-dimensional points.
///
/// Usually this will be created via a [`KDTreeBuilder`]. Once built, the
/// tree never changes; queries take `&self` and may run concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct KDTree<N: IndexableNum> {
    pub(crate) coords: Vec<N>,
    pub(crate) ids: Vec<u32>,
    pub(crate) num_items: usize,
    pub(crate) num_dims: usize,
    pub(crate) bucket_size: usize,
}

impl<N: IndexableNum> KDTree<N> {
    /// Build a tree in one call from an interleaved coordinate buffer.
    ///
    /// Point `i` is read from `coords[num_dims * i..num_dims * (i + 1)]` and
    /// gets id `i`. Equivalent to a [`KDTreeBuilder`] fed with
    /// [`add_interleaved`][KDTreeBuilder::add_interleaved].
    pub fn from_interleaved(coords: Vec<N>, num_dims: usize, bucket_size: usize) -> Result<Self> {
        let mut builder = KDTreeBuilder::new_with_bucket_size(num_dims, bucket_size)?;
        builder.add_interleaved(&coords)?;
        builder.finish()
    }
}

impl<N: IndexableNum> KDTreeIndex<N> for KDTree<N> {
    fn coords(&self) -> &[N] {
        &self.coords
    }

    fn ids(&self) -> &[u32] {
        &self.ids
    }

    fn num_items(&self) -> usize {
        self.num_items
    }

    fn num_dims(&self) -> usize {
        self.num_dims
    }

    fn bucket_size(&self) -> usize {
        self.bucket_size
    }
}
