#![doc = include_str!("../README.md")]

mod error;
pub mod kdtree;
mod r#type;

pub use error::PointIndexError;
pub use r#type::IndexableNum;
