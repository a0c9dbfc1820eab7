//! Elementary axes: composites expanded, singletons dropped, every
//! ellipsis dimension kept as its own axis.

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::TensorOperation;
use crate::error::{EinopsError, EinopsResult};
use crate::notation::{AxisPattern, EinopsAst};
use crate::pattern::is_identity_permutation;
use crate::resolve::ResolvedPattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementaryAxis<'a> {
    Named(&'a str),
    /// The i-th dimension covered by the ellipsis.
    Ellipsis(usize),
}

pub(crate) type AxisBuffer<'a> = SmallVec<[ElementaryAxis<'a>; 8]>;
pub(crate) type ShapeBuffer = SmallVec<[usize; 8]>;

/// Expands one side into its elementary axes.
pub(crate) fn elementary_axes(side: &[AxisPattern], ellipsis_len: usize) -> AxisBuffer<'_> {
    let mut out = AxisBuffer::new();
    for term in side {
        push_term(term, ellipsis_len, &mut out);
    }
    out
}

fn push_term<'a>(term: &'a AxisPattern, ellipsis_len: usize, out: &mut AxisBuffer<'a>) {
    match term {
        AxisPattern::Simple { name, .. } => out.push(ElementaryAxis::Named(name)),
        AxisPattern::Composite { axes, .. } => {
            for axis in axes {
                push_term(axis, ellipsis_len, out);
            }
        }
        AxisPattern::Ellipsis { .. } => out.extend((0..ellipsis_len).map(ElementaryAxis::Ellipsis)),
        AxisPattern::Singleton { .. } => {}
    }
}

/// Sizes of elementary axes under a resolution.
pub(crate) fn elementary_shape(
    ast: &EinopsAst,
    axes: &[ElementaryAxis<'_>],
    resolved: &ResolvedPattern,
) -> EinopsResult<ShapeBuffer> {
    axes.iter()
        .map(|axis| match *axis {
            ElementaryAxis::Named(name) => resolved.size_of(name).ok_or_else(|| {
                EinopsError::shape(
                    ast.pattern(),
                    alloc::format!("axis '{}' has no resolved size", name),
                )
                .with_axes([name])
            }),
            ElementaryAxis::Ellipsis(i) => resolved.ellipsis_dimensions.get(i).copied().ok_or_else(|| {
                EinopsError::shape(ast.pattern(), "ellipsis position out of range")
            }),
        })
        .collect()
}

/// Input position of each of `targets` within `source`.
pub(crate) fn positions(
    ast: &EinopsAst,
    source: &[ElementaryAxis<'_>],
    targets: &[ElementaryAxis<'_>],
) -> EinopsResult<Vec<usize>> {
    targets
        .iter()
        .map(|target| {
            source.iter().position(|axis| axis == target).ok_or_else(|| {
                let names = match target {
                    ElementaryAxis::Named(name) => alloc::vec![*name],
                    ElementaryAxis::Ellipsis(_) => alloc::vec!["..."],
                };
                EinopsError::axis(ast.pattern(), "axes appear only on one side", names)
            })
        })
        .collect()
}

/// Accumulates operations while tracking the shape they produce.
///
/// No-op reshapes and identity permutations are never recorded, and
/// consecutive reshapes collapse into one.
#[derive(Debug)]
pub(crate) struct PlanBuilder {
    ops: Vec<TensorOperation>,
    /// Shape before each recorded operation.
    inputs: Vec<Vec<usize>>,
    current: Vec<usize>,
}

impl PlanBuilder {
    pub(crate) fn new(input_shape: &[usize]) -> Self {
        Self {
            ops: Vec::new(),
            inputs: Vec::new(),
            current: input_shape.to_vec(),
        }
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> &[usize] {
        &self.current
    }

    pub(crate) fn reshape(&mut self, target: &[usize]) {
        if self.current.as_slice() == target {
            return;
        }
        if let Some(TensorOperation::Reshape(last)) = self.ops.last_mut() {
            let before = self.inputs.last().map(Vec::as_slice);
            if before == Some(target) {
                self.ops.pop();
                self.inputs.pop();
            } else {
                *last = target.to_vec();
            }
        } else {
            self.inputs.push(core::mem::take(&mut self.current));
            self.ops.push(TensorOperation::Reshape(target.to_vec()));
        }
        self.current = target.to_vec();
    }

    pub(crate) fn permute(&mut self, axes: Vec<usize>) {
        if is_identity_permutation(&axes) {
            return;
        }
        let next = axes.iter().map(|&a| self.current[a]).collect();
        self.inputs.push(core::mem::replace(&mut self.current, next));
        self.ops.push(TensorOperation::Permute(axes));
    }

    /// Finishes the plan, returning the operations and the final shape.
    pub(crate) fn finish(self) -> (Vec<TensorOperation>, Vec<usize>) {
        (self.ops, self.current)
    }
}
