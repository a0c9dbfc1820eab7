//! Host-memory reference backend.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::{Add, Div, Mul};

use half::f16;
use serde::{Deserialize, Serialize};

use super::capability::{ExpandCapability, ReduceCapability, TensorCapability};
use crate::plan::ReductionOp;

/// Element types supported by [`DenseTensor`].
pub trait Scalar:
    Copy + PartialOrd + Debug + Add<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;

    fn from_count(n: usize) -> Self;
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn from_count(n: usize) -> Self {
        n as f32
    }
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn from_count(n: usize) -> Self {
        n as f64
    }
}

impl Scalar for f16 {
    const ZERO: Self = f16::ZERO;
    const ONE: Self = f16::ONE;

    fn from_count(n: usize) -> Self {
        f16::from_f64(n as f64)
    }
}

/// Errors raised by [`DenseTensor`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DenseError {
    #[error("shape {shape:?} holds {expected} elements, got {actual}")]
    ElementCount {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("invalid axes {axes:?} for a tensor of rank {rank}")]
    InvalidAxes { axes: Vec<usize>, rank: usize },

    #[error("transpose requires a rank-2 tensor, got rank {0}")]
    NotMatrix(usize),

    #[error("cannot broadcast {from:?} to {to:?}")]
    NotBroadcastable { from: Vec<usize>, to: Vec<usize> },

    #[error("{0} over an empty axis has no identity")]
    EmptyReduction(ReductionOp),
}

/// Row-major tensor stored in a `Vec`.
///
/// Every operation materializes a new buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseTensor<E> {
    data: Vec<E>,
    shape: Vec<usize>,
}

impl<E: Scalar> DenseTensor<E> {
    pub fn from_vec(data: Vec<E>, shape: &[usize]) -> Result<Self, DenseError> {
        let expected = shape.iter().product::<usize>();
        if expected != data.len() {
            return Err(DenseError::ElementCount {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            shape: shape.to_vec(),
        })
    }

    /// Builds a tensor whose element at linear index `i` is `f(i)`.
    pub fn from_fn(shape: &[usize], f: impl FnMut(usize) -> E) -> Self {
        let len = shape.iter().product::<usize>();
        Self {
            data: (0..len).map(f).collect(),
            shape: shape.to_vec(),
        }
    }

    pub fn data(&self) -> &[E] {
        &self.data
    }

    pub fn into_data(self) -> Vec<E> {
        self.data
    }

    /// Element at a multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<E> {
        if index.len() != self.shape.len() || index.iter().zip(&self.shape).any(|(&i, &d)| i >= d) {
            return None;
        }
        let offset = index.iter().zip(strides(&self.shape)).map(|(&i, s)| i * s).sum::<usize>();
        self.data.get(offset).copied()
    }

    fn reshaped(&self, shape: &[usize]) -> Result<Self, DenseError> {
        Self::from_vec(self.data.clone(), shape)
    }

    fn permuted(&self, axes: &[usize]) -> Result<Self, DenseError> {
        let rank = self.shape.len();
        if !is_permutation(axes, rank) {
            return Err(DenseError::InvalidAxes {
                axes: axes.to_vec(),
                rank,
            });
        }

        let src_strides = strides(&self.shape);
        let shape: Vec<usize> = axes.iter().map(|&a| self.shape[a]).collect();
        let moved: Vec<usize> = axes.iter().map(|&a| src_strides[a]).collect();

        let mut data = Vec::with_capacity(self.data.len());
        for_each_index(&shape, |index| {
            let offset = index.iter().zip(&moved).map(|(&i, &s)| i * s).sum::<usize>();
            data.push(self.data[offset]);
        });
        Ok(Self { data, shape })
    }

    fn reduced(&self, axes: &[usize], op: ReductionOp, keep_dims: bool) -> Result<Self, DenseError> {
        let rank = self.shape.len();
        let mut reduced = vec![false; rank];
        for &a in axes {
            if a >= rank || reduced[a] {
                return Err(DenseError::InvalidAxes {
                    axes: axes.to_vec(),
                    rank,
                });
            }
            reduced[a] = true;
        }

        let kept_shape: Vec<usize> = self
            .shape
            .iter()
            .zip(&reduced)
            .map(|(&d, &r)| if r { 1 } else { d })
            .collect();
        let kept_strides = strides(&kept_shape);
        let out_len = kept_shape.iter().product::<usize>();
        let count = axes.iter().map(|&a| self.shape[a]).product::<usize>();

        if count == 0 && out_len > 0 && matches!(op, ReductionOp::Max | ReductionOp::Min) {
            return Err(DenseError::EmptyReduction(op));
        }

        let init = match op {
            ReductionOp::Prod => E::ONE,
            _ => E::ZERO,
        };
        let mut acc = vec![init; out_len];
        let mut seen = vec![false; out_len];

        let mut linear = 0;
        for_each_index(&self.shape, |index| {
            let out = index
                .iter()
                .zip(&kept_strides)
                .zip(&reduced)
                .map(|((&i, &s), &r)| if r { 0 } else { i * s })
                .sum::<usize>();
            let value = self.data[linear];
            linear += 1;

            let slot = &mut acc[out];
            *slot = match op {
                ReductionOp::Sum | ReductionOp::Mean => *slot + value,
                ReductionOp::Prod => *slot * value,
                ReductionOp::Max if !seen[out] || value > *slot => value,
                ReductionOp::Min if !seen[out] || value < *slot => value,
                ReductionOp::Max | ReductionOp::Min => *slot,
            };
            seen[out] = true;
        });

        if op == ReductionOp::Mean {
            let n = E::from_count(count);
            for slot in &mut acc {
                *slot = *slot / n;
            }
        }

        let shape = if keep_dims {
            kept_shape
        } else {
            self.shape
                .iter()
                .zip(&reduced)
                .filter(|&(_, &r)| !r)
                .map(|(&d, _)| d)
                .collect()
        };
        Ok(Self { data: acc, shape })
    }

    fn expanded(&self, target: &[usize]) -> Result<Self, DenseError> {
        let broadcastable = target.len() == self.shape.len()
            && self
                .shape
                .iter()
                .zip(target)
                .all(|(&from, &to)| from == to || from == 1);
        if !broadcastable {
            return Err(DenseError::NotBroadcastable {
                from: self.shape.clone(),
                to: target.to_vec(),
            });
        }

        let src: Vec<usize> = strides(&self.shape)
            .into_iter()
            .zip(&self.shape)
            .map(|(s, &d)| if d == 1 { 0 } else { s })
            .collect();

        let mut data = Vec::with_capacity(target.iter().product::<usize>());
        for_each_index(target, |index| {
            let offset = index.iter().zip(&src).map(|(&i, &s)| i * s).sum::<usize>();
            data.push(self.data[offset]);
        });
        Ok(Self {
            data,
            shape: target.to_vec(),
        })
    }
}

impl<E: Scalar> TensorCapability for DenseTensor<E> {
    type Error = DenseError;

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    async fn reshape(&self, shape: &[usize]) -> Result<Self, Self::Error> {
        self.reshaped(shape)
    }

    async fn permute(&self, axes: &[usize]) -> Result<Self, Self::Error> {
        self.permuted(axes)
    }

    async fn transpose(&self) -> Result<Self, Self::Error> {
        if self.shape.len() != 2 {
            return Err(DenseError::NotMatrix(self.shape.len()));
        }
        self.permuted(&[1, 0])
    }
}

impl<E: Scalar> ReduceCapability for DenseTensor<E> {
    async fn reduce(&self, axes: &[usize], op: ReductionOp, keep_dims: bool) -> Result<Self, Self::Error> {
        self.reduced(axes, op, keep_dims)
    }
}

impl<E: Scalar> ExpandCapability for DenseTensor<E> {
    async fn expand(&self, shape: &[usize]) -> Result<Self, Self::Error> {
        self.expanded(shape)
    }
}

/// Row-major strides for a shape.
fn strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

fn is_permutation(axes: &[usize], rank: usize) -> bool {
    if axes.len() != rank {
        return false;
    }
    let mut seen = vec![false; rank];
    axes.iter().all(|&a| a < rank && !core::mem::replace(&mut seen[a], true))
}

/// Visits every multi-index of `shape` in row-major order.
fn for_each_index(shape: &[usize], mut f: impl FnMut(&[usize])) {
    if shape.contains(&0) {
        return;
    }
    let mut index = vec![0; shape.len()];
    loop {
        f(&index);
        let mut dim = shape.len();
        loop {
            if dim == 0 {
                return;
            }
            dim -= 1;
            index[dim] += 1;
            if index[dim] < shape[dim] {
                break;
            }
            index[dim] = 0;
        }
    }
}
