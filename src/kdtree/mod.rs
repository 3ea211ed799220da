//! An implementation of an immutable k-d tree over n-dimensional points.

#![warn(missing_docs)]

mod builder;
mod index;
mod neighbors;
mod sort;
mod r#trait;

pub use builder::KDTreeBuilder;
pub use index::KDTree;
pub use r#trait::KDTreeIndex;
