//! Diff representation and the three operations over it: compute, apply,
//! merge.

pub mod apply;
pub mod compute;
pub mod merge;
pub mod types;

pub use apply::apply;
pub use compute::{diff, Differ};
pub use merge::{merge, MergeConflict};
pub use types::{Diff, DiffOp, DELETE_SENTINEL};
