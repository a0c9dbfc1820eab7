//! Plans for `reduce`.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::elementary::{ElementaryAxis, PlanBuilder, elementary_axes, elementary_shape, positions};
use super::{ReductionOp, TensorOperation};
use crate::error::EinopsResult;
use crate::notation::EinopsAst;
use crate::resolve::ResolvedPattern;

/// Reshape/permute, reduce the trailing axes, reshape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducePlan {
    /// Axis sizes the plan was built from. Its `output_shape` is the
    /// pattern's output and never carries the `keep_dims` ones.
    pub resolved: ResolvedPattern,
    /// Brings kept axes to the front in output order, reduced axes last.
    pub before: Vec<TensorOperation>,
    /// Axes passed to the reduction. Empty when nothing is reduced.
    pub axes: Vec<usize>,
    pub op: ReductionOp,
    pub keep_dims: bool,
    /// Shapes the reduced tensor into the final output.
    pub after: Vec<TensorOperation>,
    /// Final output shape, including trailing ones under `keep_dims`.
    pub output_shape: Vec<usize>,
}

impl ReducePlan {
    /// Returns the output shape.
    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    /// Returns true if the reduction step runs.
    pub fn reduces(&self) -> bool {
        !self.axes.is_empty()
    }
}

/// Creates the plan for a resolved reduce pattern.
pub fn create_reduce_plan(
    ast: &EinopsAst,
    input_shape: &[usize],
    resolved: ResolvedPattern,
    op: ReductionOp,
    keep_dims: bool,
) -> EinopsResult<ReducePlan> {
    let ellipsis_len = resolved.ellipsis_dimensions.len();
    let in_axes = elementary_axes(ast.input(), ellipsis_len);
    let kept = elementary_axes(ast.output(), ellipsis_len);
    let reduced: Vec<ElementaryAxis<'_>> = in_axes
        .iter()
        .filter(|axis| !kept.contains(axis))
        .copied()
        .collect();

    let mut order: Vec<ElementaryAxis<'_>> = kept.to_vec();
    order.extend_from_slice(&reduced);

    let mut before = PlanBuilder::new(input_shape);
    before.reshape(&elementary_shape(ast, &in_axes, &resolved)?);
    before.permute(positions(ast, &in_axes, &order)?);
    let (before, mut shape) = before.finish();

    let axes: Vec<usize> = (kept.len()..kept.len() + reduced.len()).collect();

    let mut output_shape = resolved.output_shape.clone();
    if !axes.is_empty() {
        if keep_dims {
            for &a in &axes {
                shape[a] = 1;
            }
            output_shape.extend(core::iter::repeat_n(1, axes.len()));
        } else {
            shape.truncate(kept.len());
        }
    }

    let mut after = PlanBuilder::new(&shape);
    after.reshape(&output_shape);
    let (after, _) = after.finish();

    tracing::debug!(
        pattern = ast.pattern(),
        op = op.name(),
        reduced = axes.len(),
        "reduce plan created"
    );

    Ok(ReducePlan {
        resolved,
        before,
        axes,
        op,
        keep_dims,
        after,
        output_shape,
    })
}
