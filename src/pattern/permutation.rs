//! Detection of patterns that only reorder simple axes.

use alloc::vec::Vec;

use crate::notation::{EinopsAst, simple_names};

/// Returns the output-to-input permutation of a pattern whose sides are
/// both lists of simple axes over the same set.
///
/// `b h w c -> b c h w` returns `[0, 3, 1, 2]`.
pub fn permutation_of(ast: &EinopsAst) -> Option<Vec<usize>> {
    let input = simple_names(ast.input())?;
    let output = simple_names(ast.output())?;

    if input.len() != output.len() {
        return None;
    }

    let permutation: Vec<usize> = output
        .iter()
        .filter_map(|name| input.iter().position(|x| x == name))
        .collect();

    if permutation.len() != input.len() {
        return None;
    }

    Some(permutation)
}

/// Returns true if the permutation leaves every axis in place.
#[inline]
pub fn is_identity_permutation(axes: &[usize]) -> bool {
    axes.iter().enumerate().all(|(i, &p)| i == p)
}

/// Checks if the pattern is the identity, `a b -> a b`.
pub fn is_identity(ast: &EinopsAst) -> bool {
    permutation_of(ast).is_some_and(|perm| is_identity_permutation(&perm))
}

/// Checks if the pattern swaps exactly two axes, `h w -> w h`.
pub fn is_transpose(ast: &EinopsAst) -> bool {
    permutation_of(ast).is_some_and(|perm| perm == [1, 0])
}

/// Returns the permutation if the pattern reorders simple axes without
/// being the identity.
pub fn is_permute(ast: &EinopsAst) -> Option<Vec<usize>> {
    permutation_of(ast).filter(|perm| !is_identity_permutation(perm))
}
