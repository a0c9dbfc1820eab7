//! Property tests: size conservation, identity law and round trips.

use einops_engine::{DenseTensor, Einops, TensorCapability, TensorOperation};
use pollster::block_on;
use proptest::prelude::*;

fn shape_strategy(max_rank: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..5, 1..=max_rank)
}

/// Axis names `a0 a1 ...` for a rank.
fn names(rank: usize) -> Vec<String> {
    (0..rank).map(|i| format!("a{i}")).collect()
}

proptest! {
    #[test]
    fn prop_permute_conserves_size(shape in shape_strategy(5), seed in any::<u64>()) {
        let rank = shape.len();
        let input = names(rank);
        let mut output = input.clone();
        // Deterministic shuffle from the seed.
        let mut state = seed;
        for i in (1..rank).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            output.swap(i, (state >> 33) as usize % (i + 1));
        }
        let pattern = format!("{} -> {}", input.join(" "), output.join(" "));

        let plan = Einops::default().plan_rearrange(&pattern, &shape, &[]).unwrap();
        let in_elements: usize = shape.iter().product();
        let out_elements: usize = plan.output_shape().iter().product();
        prop_assert_eq!(in_elements, out_elements);
        prop_assert_eq!(plan.operations.len(), 1);
    }

    #[test]
    fn prop_identity_law(shape in shape_strategy(5)) {
        let side = names(shape.len()).join(" ");
        let pattern = format!("{side} -> {side}");
        let plan = Einops::default().plan_rearrange(&pattern, &shape, &[]).unwrap();
        prop_assert_eq!(plan.operations, vec![TensorOperation::Identity]);

        let x = DenseTensor::from_fn(&shape, |i| i as f32);
        let y = block_on(Einops::default().rearrange(x.clone(), &pattern, &[])).unwrap();
        prop_assert_eq!(y, x);
    }

    #[test]
    fn prop_split_merge_inverse(a in 1usize..6, b in 1usize..6, c in 1usize..4) {
        let engine = Einops::default();
        let x = DenseTensor::from_fn(&[a * b, c], |i| i as f32);
        let split = block_on(engine.rearrange(x.clone(), "(a b) c -> a b c", &[("a", a)])).unwrap();
        prop_assert_eq!(split.shape(), &[a, b, c][..]);
        let merged = block_on(engine.rearrange(split, "a b c -> (a b) c", &[])).unwrap();
        prop_assert_eq!(merged, x);
    }

    #[test]
    fn prop_round_trip(b in 1usize..4, h in 1usize..4, w in 1usize..4, c in 1usize..4) {
        let engine = Einops::default();
        let x = DenseTensor::from_fn(&[b, h * w, c], |i| i as f32);
        let forward = block_on(engine.rearrange(x.clone(), "b (h w) c -> c w b h", &[("h", h)])).unwrap();
        prop_assert_eq!(forward.shape(), &[c, w, b, h][..]);
        let back = block_on(engine.rearrange(forward, "c w b h -> b (h w) c", &[])).unwrap();
        prop_assert_eq!(back, x);
    }

    #[test]
    fn prop_ellipsis_conserves_size(shape in shape_strategy(6)) {
        let plan = Einops::default()
            .plan_rearrange("first ... -> ... first", &shape, &[])
            .unwrap();
        let in_elements: usize = shape.iter().product();
        let out_elements: usize = plan.output_shape().iter().product();
        prop_assert_eq!(in_elements, out_elements);
        prop_assert_eq!(plan.resolved.ellipsis_dimensions.as_slice(), &shape[1..]);
    }
}
