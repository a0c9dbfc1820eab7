//! Fast path operation types.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// A pattern that maps onto a single tensor primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FastPath {
    /// Both sides name the same axes in the same order.
    /// `a b c -> a b c`
    Identity,

    /// Two axes swapped.
    /// `h w -> w h`
    Transpose,

    /// Reordering of simple axes.
    /// `b h w c -> b c h w`
    Permute {
        /// `axes[i]` is the input position of output axis `i`.
        axes: Vec<usize>,
    },
}

impl FastPath {
    /// Returns true if the tensor passes through untouched.
    pub fn is_identity(&self) -> bool {
        matches!(self, FastPath::Identity)
    }

    /// Returns the permutation implied by this fast path, if any.
    pub fn permutation(&self) -> Option<Vec<usize>> {
        match self {
            FastPath::Identity => None,
            FastPath::Transpose => Some(alloc::vec![1, 0]),
            FastPath::Permute { axes } => Some(axes.clone()),
        }
    }

    /// Returns a human-readable name for this operation.
    pub fn name(&self) -> &'static str {
        match self {
            FastPath::Identity => "identity",
            FastPath::Transpose => "transpose",
            FastPath::Permute { .. } => "permute",
        }
    }
}
