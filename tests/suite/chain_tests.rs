//! Tests for chained operations (several calls feeding each other).

use einops_engine::{DenseTensor, Einops, ReductionOp, TensorCapability};
use pollster::block_on;

fn arange(shape: &[usize]) -> DenseTensor<f32> {
    DenseTensor::from_fn(shape, |i| i as f32)
}

#[test]
fn test_chain_rearrange_round_trip() {
    // b c h w -> b h w c -> b c h w
    let engine = Einops::default();
    let x = arange(&[2, 3, 4, 5]);
    let nhwc = block_on(engine.rearrange(x.clone(), "b c h w -> b h w c", &[])).unwrap();
    let back = block_on(engine.rearrange(nhwc, "b h w c -> b c h w", &[])).unwrap();
    assert_eq!(back, x);
}

#[test]
fn test_chain_split_merge_round_trip() {
    let engine = Einops::default();
    let x = arange(&[6, 4]);
    let split = block_on(engine.rearrange(x.clone(), "(a b) c -> a b c", &[("a", 2)])).unwrap();
    assert_eq!(split.shape(), &[2, 3, 4]);
    let merged = block_on(engine.rearrange(split, "a b c -> (a b) c", &[])).unwrap();
    assert_eq!(merged, x);
}

#[test]
fn test_chain_patches_and_back() {
    // Image to non-overlapping patches and back.
    let engine = Einops::default();
    let image = arange(&[1, 3, 4, 6]);
    let patches = block_on(engine.rearrange(
        image.clone(),
        "b c (h p1) (w p2) -> b (h w) (p1 p2 c)",
        &[("p1", 2), ("p2", 2)],
    ))
    .unwrap();
    assert_eq!(patches.shape(), &[1, 6, 12]);

    let restored = block_on(engine.rearrange(
        patches,
        "b (h w) (p1 p2 c) -> b c (h p1) (w p2)",
        &[("h", 2), ("p1", 2), ("p2", 2)],
    ))
    .unwrap();
    assert_eq!(restored, image);
}

#[test]
fn test_chain_repeat_then_reduce_mean_is_identity() {
    let engine = Einops::default();
    let x = arange(&[2, 3]);
    let tiled = block_on(engine.repeat(x.clone(), "h w -> h w k", &[("k", 4)])).unwrap();
    assert_eq!(tiled.shape(), &[2, 3, 4]);
    let mean = block_on(engine.reduce(tiled, "h w k -> h w", ReductionOp::Mean, false, &[])).unwrap();
    assert_eq!(mean, x);
}

#[test]
fn test_chain_repeat_then_reduce_sum_scales() {
    let engine = Einops::default();
    let x = arange(&[3]);
    let tiled = block_on(engine.repeat(x, "w -> k w", &[("k", 3)])).unwrap();
    let sum = block_on(engine.reduce(tiled, "k w -> w", ReductionOp::Sum, false, &[])).unwrap();
    assert_eq!(sum.data(), &[0.0, 3.0, 6.0]);
}
