use std::fmt::Debug;

use num_traits::Float;

/// A trait for types that can be used as indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. The
/// query algorithms prune with Euclidean distance arithmetic, so coordinates
/// are restricted to the float types that math is defined for.
pub trait IndexableNum: private::Sealed + Float + Debug + Send + Sync + 'static {}

impl IndexableNum for f32 {}
impl IndexableNum for f64 {}

mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
