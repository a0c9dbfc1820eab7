//! Plans for `repeat`.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::TensorOperation;
use super::elementary::{ElementaryAxis, PlanBuilder, elementary_axes, elementary_shape, positions};
use crate::error::EinopsResult;
use crate::notation::EinopsAst;
use crate::resolve::ResolvedPattern;

/// Reshape/permute with size-1 slots for new axes, broadcast, reshape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatPlan {
    /// Axis sizes the plan was built from.
    pub resolved: ResolvedPattern,
    /// Orders the input axes as in the output and opens the new slots.
    pub before: Vec<TensorOperation>,
    /// Broadcast target, absent when the pattern adds no axis.
    pub expand: Option<Vec<usize>>,
    /// Reshapes the broadcast tensor into the output.
    pub after: Vec<TensorOperation>,
}

impl RepeatPlan {
    /// Returns the output shape.
    pub fn output_shape(&self) -> &[usize] {
        &self.resolved.output_shape
    }
}

/// Creates the plan for a resolved repeat pattern.
pub fn create_repeat_plan(
    ast: &EinopsAst,
    input_shape: &[usize],
    resolved: ResolvedPattern,
) -> EinopsResult<RepeatPlan> {
    let ellipsis_len = resolved.ellipsis_dimensions.len();
    let in_axes = elementary_axes(ast.input(), ellipsis_len);
    let out_axes = elementary_axes(ast.output(), ellipsis_len);

    let carried: Vec<ElementaryAxis<'_>> = out_axes
        .iter()
        .filter(|axis| in_axes.contains(axis))
        .copied()
        .collect();

    let full = elementary_shape(ast, &out_axes, &resolved)?;
    let slotted: Vec<usize> = out_axes
        .iter()
        .zip(full.iter())
        .map(|(axis, &size)| if in_axes.contains(axis) { size } else { 1 })
        .collect();
    let adds_axes = carried.len() != out_axes.len();

    let mut before = PlanBuilder::new(input_shape);
    before.reshape(&elementary_shape(ast, &in_axes, &resolved)?);
    before.permute(positions(ast, &in_axes, &carried)?);
    before.reshape(&slotted);
    let (before, shape) = before.finish();

    let (expand, shape) = if adds_axes {
        (Some(full.to_vec()), full.to_vec())
    } else {
        (None, shape)
    };

    let mut after = PlanBuilder::new(&shape);
    after.reshape(&resolved.output_shape);
    let (after, _) = after.finish();

    tracing::debug!(
        pattern = ast.pattern(),
        new_axes = out_axes.len() - carried.len(),
        "repeat plan created"
    );

    Ok(RepeatPlan {
        resolved,
        before,
        expand,
        after,
    })
}
