//! Capabilities a tensor backend provides to the executor.
//!
//! The engine never touches tensor data. Every primitive is requested from
//! the backend through these traits and awaited before the next one starts.

use crate::plan::ReductionOp;

/// Shape inspection and the layout primitives rearrange needs.
#[allow(async_fn_in_trait)]
pub trait TensorCapability: Sized {
    /// Backend failure, passed through to the caller unchanged.
    type Error;

    fn shape(&self) -> &[usize];

    /// Reinterprets the data under `shape`; element counts must match.
    async fn reshape(&self, shape: &[usize]) -> Result<Self, Self::Error>;

    /// Reorders axes; `axes[i]` is the input position of output axis `i`.
    async fn permute(&self, axes: &[usize]) -> Result<Self, Self::Error>;

    /// Swaps the axes of a rank-2 tensor.
    async fn transpose(&self) -> Result<Self, Self::Error>;
}

/// Reduction along a set of axes.
#[allow(async_fn_in_trait)]
pub trait ReduceCapability: TensorCapability {
    /// Reduces over `axes`. With `keep_dims` they stay as size-1 axes.
    async fn reduce(&self, axes: &[usize], op: ReductionOp, keep_dims: bool) -> Result<Self, Self::Error>;
}

/// Broadcasting of size-1 axes.
#[allow(async_fn_in_trait)]
pub trait ExpandCapability: TensorCapability {
    /// Broadcasts to `shape`, which must have the same rank. Axes of size 1
    /// may grow; every other axis must match.
    async fn expand(&self, shape: &[usize]) -> Result<Self, Self::Error>;
}
