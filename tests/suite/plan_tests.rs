//! Planning tests through the engine's synchronous entry points.

use einops_engine::{Einops, EinopsConfig, ErrorStage, ReductionOp, TensorOperation};

fn engine() -> Einops {
    Einops::new(EinopsConfig::default())
}

#[test]
fn test_plan_transpose_scenario() {
    let plan = engine().plan_rearrange("h w -> w h", &[3, 4], &[]).unwrap();
    assert_eq!(plan.output_shape(), &[4, 3]);
    assert_eq!(plan.operations, vec![TensorOperation::Transpose]);
}

#[test]
fn test_plan_split_scenario() {
    let plan = engine()
        .plan_rearrange("(h w) c -> h w c", &[100, 3], &[("h", 10)])
        .unwrap();
    assert_eq!(plan.output_shape(), &[10, 10, 3]);
    assert_eq!(plan.resolved.size_of("w"), Some(10));
}

#[test]
fn test_plan_invalid_split_scenario() {
    let err = engine()
        .plan_rearrange("(h w) c -> h w c", &[100, 3], &[("h", 30)])
        .unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Shape);
}

#[test]
fn test_plan_batch_seq_scenario() {
    let plan = engine()
        .plan_rearrange("(batch seq) hidden -> batch seq hidden", &[20, 768], &[("batch", 4)])
        .unwrap();
    assert_eq!(plan.output_shape(), &[4, 5, 768]);
    assert_eq!(plan.operations, vec![TensorOperation::Reshape(vec![4, 5, 768])]);
}

#[test]
fn test_plan_ellipsis_scenario() {
    let plan = engine()
        .plan_rearrange("batch ... channels -> batch channels ...", &[2, 3, 4, 5, 6], &[])
        .unwrap();
    assert_eq!(plan.output_shape(), &[2, 6, 3, 4, 5]);
    assert_eq!(plan.resolved.ellipsis_dimensions, vec![3, 4, 5]);
}

#[test]
fn test_plan_dropped_axis_scenario() {
    let err = engine().plan_rearrange("a b c -> a c", &[2, 3, 4], &[]).unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Axis);
    assert_eq!(err.axes(), &["b"]);
}

#[test]
fn test_plan_never_empty() {
    for (pattern, shape) in [
        ("a b -> a b", vec![2, 3]),
        ("b ... -> b ...", vec![2, 3, 4]),
        ("(a) b -> a (b)", vec![2, 3]),
        (" -> ", vec![]),
    ] {
        let plan = engine().plan_rearrange(pattern, &shape, &[]).unwrap();
        assert!(!plan.operations.is_empty(), "{pattern}");
        assert_eq!(plan.output_shape(), shape.as_slice(), "{pattern}");
    }
}

#[test]
fn test_plan_has_no_noop_steps() {
    let shape = [2, 12, 5];
    let plan = engine()
        .plan_rearrange("b (h w) c -> b c (w h)", &shape, &[("h", 3)])
        .unwrap();
    let mut current = shape.to_vec();
    for op in &plan.operations {
        let next = op.output_shape(&current);
        if let TensorOperation::Permute(axes) = op {
            assert!(axes.iter().enumerate().any(|(i, &a)| i != a));
        }
        if let TensorOperation::Reshape(target) = op {
            assert_ne!(target, &current);
        }
        current = next;
    }
    assert_eq!(current, plan.output_shape());
}

#[test]
fn test_plan_reduce_pooling() {
    let plan = engine()
        .plan_reduce("b (h h2) (w w2) c -> b h w c", &[1, 4, 6, 3], ReductionOp::Max, false, &[("h2", 2), ("w2", 2)])
        .unwrap();
    assert_eq!(plan.output_shape(), &[1, 2, 3, 3]);
    assert_eq!(plan.axes, vec![4, 5]);
    assert_eq!(plan.op, ReductionOp::Max);
}

#[test]
fn test_plan_reduce_keep_dims_shape() {
    let plan = engine()
        .plan_reduce("b c h w -> b c", &[2, 3, 4, 5], ReductionOp::Mean, true, &[])
        .unwrap();
    assert_eq!(plan.output_shape(), &[2, 3, 1, 1]);
}

#[test]
fn test_plan_reduce_rejects_new_axes() {
    let err = engine()
        .plan_reduce("a b -> a c", &[2, 3], ReductionOp::Sum, false, &[("c", 2)])
        .unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Axis);
}

#[test]
fn test_plan_repeat_shape() {
    let plan = engine()
        .plan_repeat("h w -> (h h2) (w w2)", &[2, 3], &[("h2", 2), ("w2", 3)])
        .unwrap();
    assert_eq!(plan.output_shape(), &[4, 9]);
    assert_eq!(plan.expand, Some(vec![2, 2, 3, 3]));
}

#[test]
fn test_plan_repeat_requires_sizes() {
    let err = engine().plan_repeat("h w -> h w c", &[2, 3], &[]).unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Axis);
    assert_eq!(err.axes(), &["c"]);
}

#[test]
fn test_plan_display() {
    let plan = engine().plan_rearrange("a b c -> c (a b)", &[2, 3, 4], &[]).unwrap();
    let rendered: Vec<String> = plan.operations.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["permute[2, 0, 1]", "reshape[4, 6]"]);
}
