//! Validation tests for einops patterns.

use einops_engine::notation::{
    OperationKind, parse_pattern, validate_explicit_sizes, validate_for, validate_pattern,
    validate_reduce_pattern, validate_repeat_pattern,
};
use einops_engine::{EinopsError, ErrorStage};

fn axis_error(result: Result<(), EinopsError>) -> Vec<String> {
    let err = result.unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Axis, "{err}");
    err.axes().to_vec()
}

#[test]
fn test_valid_rearrange_patterns() {
    for pattern in [
        "h w -> w h",
        "b (h w) c -> b h w c",
        "batch ... channels -> batch channels ...",
        "b ... -> b (...)",
        "a 1 b -> b a",
        " -> 1",
        "((a b) c) -> a b c",
    ] {
        let ast = parse_pattern(pattern).unwrap();
        assert!(validate_pattern(&ast).is_ok(), "{pattern}");
    }
}

#[test]
fn test_dropped_axis_is_named() {
    let ast = parse_pattern("a b c -> a c").unwrap();
    assert_eq!(axis_error(validate_pattern(&ast)), vec!["b"]);
}

#[test]
fn test_one_sided_axes_report_full_set() {
    let ast = parse_pattern("a b c -> a d e").unwrap();
    assert_eq!(axis_error(validate_pattern(&ast)), vec!["b", "c", "d", "e"]);
}

#[test]
fn test_duplicates_report_full_set() {
    let ast = parse_pattern("a a b b -> a b").unwrap();
    assert_eq!(axis_error(validate_pattern(&ast)), vec!["a", "b"]);

    let ast = parse_pattern("a b -> a (a b)").unwrap();
    assert_eq!(axis_error(validate_pattern(&ast)), vec!["a"]);
}

#[test]
fn test_ellipsis_rules() {
    let ast = parse_pattern("... a ... -> a").unwrap();
    axis_error(validate_pattern(&ast));

    let ast = parse_pattern("b ... -> b").unwrap();
    axis_error(validate_pattern(&ast));

    let ast = parse_pattern("b (...) -> b ...").unwrap();
    axis_error(validate_pattern(&ast));
}

#[test]
fn test_empty_group_rejected() {
    let ast = parse_pattern("a () -> a").unwrap();
    axis_error(validate_pattern(&ast));
}

#[test]
fn test_reduce_rules() {
    assert!(validate_reduce_pattern(&parse_pattern("b h w c -> b c").unwrap()).is_ok());
    assert!(validate_reduce_pattern(&parse_pattern("b ... -> b").unwrap()).is_ok());
    let ast = parse_pattern("b h -> b k").unwrap();
    assert_eq!(axis_error(validate_reduce_pattern(&ast)), vec!["k"]);
}

#[test]
fn test_repeat_rules() {
    let ast = parse_pattern("h w -> h w c").unwrap();
    assert!(validate_repeat_pattern(&ast, &["c"]).is_ok());
    assert_eq!(axis_error(validate_repeat_pattern(&ast, &[])), vec!["c"]);

    let ast = parse_pattern("h w -> h").unwrap();
    assert_eq!(axis_error(validate_repeat_pattern(&ast, &[])), vec!["w"]);
}

#[test]
fn test_validate_for_dispatch() {
    let ast = parse_pattern("a b -> a").unwrap();
    assert!(validate_for(OperationKind::Reduce, &ast, &[]).is_ok());
    assert!(validate_for(OperationKind::Rearrange, &ast, &[]).is_err());
    assert!(validate_for(OperationKind::Repeat, &ast, &[]).is_err());
}

#[test]
fn test_unused_explicit_sizes() {
    let ast = parse_pattern("(h w) -> h w").unwrap();
    assert!(validate_explicit_sizes(&ast, &["h"]).is_ok());
    assert_eq!(axis_error(validate_explicit_sizes(&ast, &["z", "h", "y"])), vec!["y", "z"]);
}
