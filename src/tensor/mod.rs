//! Tensor backends.
//!
//! The executor is generic over [`TensorCapability`]; [`DenseTensor`] is a
//! host-memory implementation for tests, benchmarks and experimentation.

mod capability;
mod dense;

pub use capability::{ExpandCapability, ReduceCapability, TensorCapability};
pub use dense::{DenseError, DenseTensor, Scalar};
pub use crate::plan::ReductionOp;
