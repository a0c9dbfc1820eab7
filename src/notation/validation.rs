//! Shape-independent validation of einops patterns.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use super::ast::{EinopsAst, Side, owned_sorted};
use super::axis::{self, AxisPattern};
use crate::error::{EinopsError, EinopsResult};

/// The operation a pattern is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationKind {
    /// Identical axis sets on both sides.
    #[default]
    Rearrange,
    /// Output axes are a subset of input axes.
    Reduce,
    /// Output may introduce new, explicitly sized axes.
    Repeat,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Rearrange => write!(f, "rearrange"),
            OperationKind::Reduce => write!(f, "reduce"),
            OperationKind::Repeat => write!(f, "repeat"),
        }
    }
}

/// Validates a pattern for `rearrange`.
///
/// Checks:
/// - Axis names are legal identifiers
/// - At most one ellipsis per side, none inside an input group
/// - No empty groups
/// - Every name appears on both sides
/// - No name repeats on either side
pub fn validate_pattern(ast: &EinopsAst) -> EinopsResult<()> {
    validate_common(ast)?;
    validate_ellipsis_sides(ast, OperationKind::Rearrange)?;
    validate_symmetric_names(ast)?;
    validate_duplicates(ast, Side::Input)?;
    validate_duplicates(ast, Side::Output)?;
    Ok(())
}

/// Validates a pattern for `reduce`.
///
/// Output names must be drawn from the input. An ellipsis present only on
/// the input side is reduced over.
pub fn validate_reduce_pattern(ast: &EinopsAst) -> EinopsResult<()> {
    validate_common(ast)?;
    validate_ellipsis_sides(ast, OperationKind::Reduce)?;

    let input: BTreeSet<&str> = ast.input_names().into_iter().collect();
    let introduced: Vec<&str> = ast
        .output_names()
        .into_iter()
        .filter(|name| !input.contains(name))
        .collect();
    if !introduced.is_empty() {
        return Err(EinopsError::axis(
            ast.pattern(),
            "reduce cannot introduce axes absent from the input",
            owned_sorted(introduced),
        ));
    }

    validate_duplicates(ast, Side::Input)?;
    validate_duplicates(ast, Side::Output)?;
    Ok(())
}

/// Validates a pattern for `repeat`.
///
/// Every input name must survive to the output, and each new output name
/// must be listed in `explicit_names`.
pub fn validate_repeat_pattern(ast: &EinopsAst, explicit_names: &[&str]) -> EinopsResult<()> {
    validate_common(ast)?;
    validate_ellipsis_sides(ast, OperationKind::Repeat)?;

    let input: BTreeSet<&str> = ast.input_names().into_iter().collect();
    let output: BTreeSet<&str> = ast.output_names().into_iter().collect();

    let dropped: Vec<&str> = input.difference(&output).copied().collect();
    if !dropped.is_empty() {
        return Err(EinopsError::axis(
            ast.pattern(),
            "repeat cannot drop input axes",
            owned_sorted(dropped),
        ));
    }

    let unsized_axes: Vec<&str> = output
        .difference(&input)
        .copied()
        .filter(|name| !explicit_names.contains(name))
        .collect();
    if !unsized_axes.is_empty() {
        return Err(EinopsError::axis(
            ast.pattern(),
            "new axes in repeat require an explicit size",
            owned_sorted(unsized_axes),
        ));
    }

    validate_duplicates(ast, Side::Input)?;
    validate_duplicates(ast, Side::Output)?;
    Ok(())
}

/// Validates a pattern for the given operation.
pub fn validate_for(
    kind: OperationKind,
    ast: &EinopsAst,
    explicit_names: &[&str],
) -> EinopsResult<()> {
    match kind {
        OperationKind::Rearrange => validate_pattern(ast),
        OperationKind::Reduce => validate_reduce_pattern(ast),
        OperationKind::Repeat => validate_repeat_pattern(ast, explicit_names),
    }
}

/// Validates that every explicitly sized axis is used by the pattern.
pub fn validate_explicit_sizes(ast: &EinopsAst, explicit_names: &[&str]) -> EinopsResult<()> {
    let names = ast.all_names();
    let unused: Vec<&str> = explicit_names
        .iter()
        .copied()
        .filter(|name| !names.contains(name))
        .collect();
    if !unused.is_empty() {
        return Err(EinopsError::axis(
            ast.pattern(),
            "explicit sizes given for axes not in the pattern",
            owned_sorted(unused),
        ));
    }
    Ok(())
}

/// Checks shared by every operation.
fn validate_common(ast: &EinopsAst) -> EinopsResult<()> {
    validate_identifiers(ast)?;
    for side in [Side::Input, Side::Output] {
        validate_ellipsis_count(ast, side)?;
        validate_composites(ast, side)?;
    }
    Ok(())
}

/// Returns true if `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates identifier syntax of every name.
///
/// The scanner only produces legal names, but ASTs may be built by hand.
fn validate_identifiers(ast: &EinopsAst) -> EinopsResult<()> {
    let invalid: Vec<&str> = ast
        .input_names()
        .into_iter()
        .chain(ast.output_names())
        .filter(|name| !is_valid_identifier(name))
        .collect();
    if !invalid.is_empty() {
        return Err(EinopsError::axis(
            ast.pattern(),
            "invalid axis names",
            owned_sorted(invalid),
        ));
    }
    Ok(())
}

fn validate_ellipsis_count(ast: &EinopsAst, side: Side) -> EinopsResult<()> {
    let count = axis::ellipsis_count(ast.side(side));
    if count > 1 {
        return Err(EinopsError::axis(
            ast.pattern(),
            alloc::format!("{} side has {} ellipses, at most one is allowed", side, count),
            Vec::<&str>::new(),
        ));
    }
    Ok(())
}

/// Rejects empty groups anywhere, and ellipsis inside input groups.
fn validate_composites(ast: &EinopsAst, side: Side) -> EinopsResult<()> {
    let mut empty = false;
    let mut grouped_ellipsis = false;
    for term in ast.side(side) {
        term.visit_composites(&mut |axes, _span| {
            if axes.is_empty() {
                empty = true;
            }
            if axes.iter().any(AxisPattern::is_ellipsis) {
                grouped_ellipsis = true;
            }
        });
    }

    if empty {
        return Err(EinopsError::axis(
            ast.pattern(),
            alloc::format!("empty group '()' on {} side", side),
            Vec::<&str>::new(),
        ));
    }
    if grouped_ellipsis && side == Side::Input {
        return Err(EinopsError::axis(
            ast.pattern(),
            "ellipsis inside a group is not allowed on the input side",
            Vec::<&str>::new(),
        ));
    }
    Ok(())
}

/// Validates where the ellipsis may appear for each operation.
fn validate_ellipsis_sides(ast: &EinopsAst, kind: OperationKind) -> EinopsResult<()> {
    let on_input = axis::has_ellipsis(ast.input());
    let on_output = axis::has_ellipsis(ast.output());

    let message = match (kind, on_input, on_output) {
        (_, false, true) => "ellipsis on the output side requires one on the input side",
        (OperationKind::Rearrange | OperationKind::Repeat, true, false) => {
            "ellipsis on the input side must also appear on the output side"
        }
        _ => return Ok(()),
    };
    Err(EinopsError::axis(ast.pattern(), message, Vec::<&str>::new()))
}

/// Every name must appear on both sides (rearrange).
fn validate_symmetric_names(ast: &EinopsAst) -> EinopsResult<()> {
    let input: BTreeSet<&str> = ast.input_names().into_iter().collect();
    let output: BTreeSet<&str> = ast.output_names().into_iter().collect();

    let one_sided: Vec<&str> = input.symmetric_difference(&output).copied().collect();
    if !one_sided.is_empty() {
        return Err(EinopsError::axis(
            ast.pattern(),
            "axes appear only on one side",
            owned_sorted(one_sided),
        ));
    }
    Ok(())
}

/// No name may repeat on a side. Reports every repeated name at once.
fn validate_duplicates(ast: &EinopsAst, side: Side) -> EinopsResult<()> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in axis::flatten_names(ast.side(side)) {
        *counts.entry(name).or_insert(0) += 1;
    }

    let repeated: Vec<&str> = counts
        .iter()
        .filter(|&(_, &count)| count > 1)
        .map(|(&name, _)| name)
        .collect();
    if !repeated.is_empty() {
        return Err(EinopsError::axis(
            ast.pattern(),
            alloc::format!("duplicate axes on {} side", side),
            owned_sorted(repeated),
        ));
    }
    Ok(())
}
