//! Tensor primitives a plan is made of.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single step in a rearrange plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TensorOperation {
    /// Pass the tensor through unchanged.
    Identity,
    /// Swap the two axes of a rank-2 tensor.
    Transpose,
    /// Reorder axes; `axes[i]` is the input position of output axis `i`.
    Permute(Vec<usize>),
    /// Reinterpret the data under a new shape with the same element count.
    Reshape(Vec<usize>),
}

impl TensorOperation {
    /// Returns a human-readable name for this operation.
    pub fn name(&self) -> &'static str {
        match self {
            TensorOperation::Identity => "identity",
            TensorOperation::Transpose => "transpose",
            TensorOperation::Permute(_) => "permute",
            TensorOperation::Reshape(_) => "reshape",
        }
    }

    /// Shape produced by applying this operation to `shape`.
    pub fn output_shape(&self, shape: &[usize]) -> Vec<usize> {
        match self {
            TensorOperation::Identity => shape.to_vec(),
            TensorOperation::Transpose => shape.iter().rev().copied().collect(),
            TensorOperation::Permute(axes) => axes.iter().map(|&a| shape[a]).collect(),
            TensorOperation::Reshape(target) => target.clone(),
        }
    }
}

impl fmt::Display for TensorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorOperation::Identity | TensorOperation::Transpose => write!(f, "{}", self.name()),
            TensorOperation::Permute(axes) => write!(f, "permute{:?}", axes),
            TensorOperation::Reshape(shape) => write!(f, "reshape{:?}", shape),
        }
    }
}

/// Type of reduction operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReductionOp {
    #[default]
    Sum,
    Mean,
    Max,
    Min,
    Prod,
}

impl ReductionOp {
    pub fn name(&self) -> &'static str {
        match self {
            ReductionOp::Sum => "sum",
            ReductionOp::Mean => "mean",
            ReductionOp::Max => "max",
            ReductionOp::Min => "min",
            ReductionOp::Prod => "prod",
        }
    }
}

impl fmt::Display for ReductionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown reduction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reduction '{0}', expected one of sum, mean, max, min, prod")]
pub struct UnknownReduction(pub alloc::string::String);

impl FromStr for ReductionOp {
    type Err = UnknownReduction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(ReductionOp::Sum),
            "mean" => Ok(ReductionOp::Mean),
            "max" => Ok(ReductionOp::Max),
            "min" => Ok(ReductionOp::Min),
            "prod" => Ok(ReductionOp::Prod),
            other => Err(UnknownReduction(other.into())),
        }
    }
}
