//! Operation planning.
//!
//! Turns a resolved pattern into a short sequence of tensor primitives:
//! - Rearrange: fast path, or reshape → permute → reshape
//! - Reduce: reshape → permute → reduce trailing axes → reshape
//! - Repeat: reshape → permute → reshape → expand → reshape

mod elementary;
mod operation;
mod rearrange;
mod reduce;
mod repeat;

pub use operation::{ReductionOp, TensorOperation, UnknownReduction};
pub use rearrange::{RearrangePlan, create_plan};
pub use reduce::{ReducePlan, create_reduce_plan};
pub use repeat::{RepeatPlan, create_repeat_plan};
