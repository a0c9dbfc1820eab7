//! Integration tests for einops-engine.
//!
//! These tests execute full rearrange/reduce/repeat calls on the dense
//! reference backend.

use einops_engine::tensor::DenseError;
use einops_engine::{
    DenseTensor, Einops, EinopsConfig, ErrorStage, ExecutionError, ReductionOp, TensorCapability,
    rearrange, reduce, repeat,
};
use half::f16;
use pollster::block_on;

fn arange(shape: &[usize]) -> DenseTensor<f32> {
    DenseTensor::from_fn(shape, |i| i as f32)
}

#[test]
fn test_transpose_integration() {
    let x = arange(&[3, 4]);
    let y = block_on(rearrange(x.clone(), "h w -> w h", &[])).unwrap();
    assert_eq!(y.shape(), &[4, 3]);
    for i in 0..3 {
        for j in 0..4 {
            assert_eq!(y.get(&[j, i]), x.get(&[i, j]));
        }
    }
}

#[test]
fn test_split_integration() {
    let x = arange(&[100, 3]);
    let y = block_on(rearrange(x.clone(), "(h w) c -> h w c", &[("h", 10)])).unwrap();
    assert_eq!(y.shape(), &[10, 10, 3]);
    assert_eq!(y.data(), x.data());
}

#[test]
fn test_invalid_split_integration() {
    let err = block_on(rearrange(arange(&[100, 3]), "(h w) c -> h w c", &[("h", 30)])).unwrap_err();
    assert_eq!(err.as_einops().map(|e| e.stage()), Some(ErrorStage::Shape));
}

#[test]
fn test_ellipsis_integration() {
    let x = arange(&[2, 3, 4, 5, 6]);
    let y = block_on(rearrange(x.clone(), "batch ... channels -> batch channels ...", &[])).unwrap();
    assert_eq!(y.shape(), &[2, 6, 3, 4, 5]);
    assert_eq!(y.get(&[1, 5, 2, 3, 4]), x.get(&[1, 2, 3, 4, 5]));
}

#[test]
fn test_merge_heads_integration() {
    let x = arange(&[2, 4, 3, 5]);
    let y = block_on(rearrange(x.clone(), "b heads s d -> b s (heads d)", &[])).unwrap();
    assert_eq!(y.shape(), &[2, 3, 20]);
    // heads = 1, d = 2 lands at 1 * 5 + 2.
    assert_eq!(y.get(&[1, 2, 7]), x.get(&[1, 1, 2, 2]));
}

#[test]
fn test_flatten_ellipsis_integration() {
    let x = arange(&[2, 3, 4]);
    let y = block_on(rearrange(x.clone(), "b ... -> b (...)", &[])).unwrap();
    assert_eq!(y.shape(), &[2, 12]);
    assert_eq!(y.data(), x.data());
}

#[test]
fn test_singleton_squeeze_integration() {
    let x = arange(&[2, 1, 3]);
    let y = block_on(rearrange(x, "a 1 b -> a b", &[])).unwrap();
    assert_eq!(y.shape(), &[2, 3]);
}

#[test]
fn test_scalar_integration() {
    let x = DenseTensor::from_vec(vec![4.5f32], &[]).unwrap();
    let y = block_on(rearrange(x, " -> 1 1", &[])).unwrap();
    assert_eq!(y.shape(), &[1, 1]);
    assert_eq!(y.data(), &[4.5]);
}

#[test]
fn test_global_pooling_integration() {
    let x = arange(&[2, 3, 2, 2]);
    let y = block_on(reduce(x, "b c h w -> b c", ReductionOp::Max, false, &[])).unwrap();
    assert_eq!(y.shape(), &[2, 3]);
    assert_eq!(y.get(&[1, 2]), Some(23.0));
}

#[test]
fn test_max_pool_integration() {
    let x = arange(&[1, 4, 4]);
    let y = block_on(reduce(
        x,
        "c (h h2) (w w2) -> c h w",
        ReductionOp::Max,
        false,
        &[("h2", 2), ("w2", 2)],
    ))
    .unwrap();
    assert_eq!(y.shape(), &[1, 2, 2]);
    assert_eq!(y.data(), &[5.0, 7.0, 13.0, 15.0]);
}

#[test]
fn test_reduce_keep_dims_integration() {
    let x = arange(&[2, 3]);
    let y = block_on(reduce(x, "a b -> a", ReductionOp::Sum, true, &[])).unwrap();
    assert_eq!(y.shape(), &[2, 1]);
    assert_eq!(y.data(), &[3.0, 12.0]);
}

#[test]
fn test_reduce_ellipsis_integration() {
    let x = arange(&[2, 2, 3]);
    let y = block_on(reduce(x, "b ... -> b", ReductionOp::Sum, false, &[])).unwrap();
    assert_eq!(y.data(), &[15.0, 51.0]);
}

#[test]
fn test_repeat_integration() {
    let x = arange(&[2]);
    let y = block_on(repeat(x, "w -> h w", &[("h", 3)])).unwrap();
    assert_eq!(y.shape(), &[3, 2]);
    assert_eq!(y.data(), &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);

    let x = arange(&[2]);
    let y = block_on(repeat(x, "w -> (w k)", &[("k", 2)])).unwrap();
    assert_eq!(y.data(), &[0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn test_upsample_integration() {
    let x = arange(&[2, 2]);
    let y = block_on(repeat(x, "h w -> (h h2) (w w2)", &[("h2", 2), ("w2", 2)])).unwrap();
    assert_eq!(y.shape(), &[4, 4]);
    assert_eq!(y.get(&[3, 1]), Some(2.0));
}

#[test]
fn test_half_precision_integration() {
    let x = DenseTensor::from_fn(&[2, 3], |i| f16::from_f32(i as f32));
    let y = block_on(rearrange(x, "a b -> b a", &[])).unwrap();
    assert_eq!(y.get(&[2, 1]), Some(f16::from_f32(5.0)));
}

#[test]
fn test_f64_integration() {
    let x = DenseTensor::from_fn(&[4], |i| i as f64);
    let y = block_on(reduce(x, "a -> ", ReductionOp::Prod, false, &[])).unwrap();
    assert_eq!(y.data(), &[0.0]);
}

#[test]
fn test_backend_error_passthrough() {
    let x = arange(&[2, 0]);
    let err = block_on(reduce(x, "a b -> a", ReductionOp::Min, false, &[])).unwrap_err();
    match err {
        ExecutionError::Tensor(e) => assert_eq!(e, DenseError::EmptyReduction(ReductionOp::Min)),
        ExecutionError::Einops(e) => panic!("unexpected pattern error {e}"),
    }
}

#[test]
fn test_unused_sizes_depend_on_config() {
    let strict = Einops::new(EinopsConfig::safe());
    let err = block_on(strict.rearrange(arange(&[2, 3]), "a b -> b a", &[("z", 1)])).unwrap_err();
    assert_eq!(err.as_einops().map(|e| e.stage()), Some(ErrorStage::Axis));

    let lenient = Einops::new(EinopsConfig::fast());
    assert!(block_on(lenient.rearrange(arange(&[2, 3]), "a b -> b a", &[("z", 1)])).is_ok());
}

#[test]
fn test_error_message_contains_pattern() {
    let err = block_on(rearrange(arange(&[2, 3, 4]), "a b c -> a c", &[])).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("a b c -> a c"), "{message}");
    assert!(message.contains('b'), "{message}");
}
