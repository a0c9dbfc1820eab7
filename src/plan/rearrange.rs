//! Plans for `rearrange`.

use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::TensorOperation;
use super::elementary::{PlanBuilder, elementary_axes, elementary_shape, positions};
use crate::error::EinopsResult;
use crate::notation::EinopsAst;
use crate::pattern::{FastPath, recognize_pattern};
use crate::resolve::ResolvedPattern;

/// Complete plan for one `rearrange` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RearrangePlan {
    /// Axis sizes the plan was built from.
    pub resolved: ResolvedPattern,
    /// Operations to apply, in order. Never empty.
    pub operations: Vec<TensorOperation>,
}

impl RearrangePlan {
    /// Returns the output shape.
    pub fn output_shape(&self) -> &[usize] {
        &self.resolved.output_shape
    }

    /// Returns the number of steps.
    pub fn num_steps(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if the plan is a single fast-path primitive.
    pub fn uses_fast_path(&self) -> bool {
        matches!(
            self.operations.as_slice(),
            [TensorOperation::Identity | TensorOperation::Transpose | TensorOperation::Permute(_)]
        )
    }
}

/// Creates the operation sequence for a resolved rearrange pattern.
///
/// This is the main entry point for planning. It:
/// 1. Checks for fast paths (identity, transpose, permute)
/// 2. Otherwise reshapes to elementary axes, permutes them into output
///    order and reshapes to the output shape
///
/// The returned sequence is never empty; a pattern with nothing to do
/// plans as `[Identity]`.
pub fn create_plan(
    ast: &EinopsAst,
    input_shape: &[usize],
    resolved: &ResolvedPattern,
) -> EinopsResult<Vec<TensorOperation>> {
    if let Some(fast_path) = recognize_pattern(ast) {
        tracing::debug!(pattern = ast.pattern(), fast_path = fast_path.name(), "fast path selected");
        return Ok(vec![match fast_path {
            FastPath::Identity => TensorOperation::Identity,
            FastPath::Transpose => TensorOperation::Transpose,
            FastPath::Permute { axes } => TensorOperation::Permute(axes),
        }]);
    }

    let ellipsis_len = resolved.ellipsis_dimensions.len();
    let in_axes = elementary_axes(ast.input(), ellipsis_len);
    let out_axes = elementary_axes(ast.output(), ellipsis_len);

    let mut builder = PlanBuilder::new(input_shape);
    builder.reshape(&elementary_shape(ast, &in_axes, resolved)?);
    builder.permute(positions(ast, &in_axes, &out_axes)?);
    builder.reshape(&resolved.output_shape);

    let (mut operations, _) = builder.finish();
    if operations.is_empty() {
        operations.push(TensorOperation::Identity);
    }

    tracing::debug!(
        pattern = ast.pattern(),
        steps = operations.len(),
        "general rearrange plan created"
    );
    Ok(operations)
}
