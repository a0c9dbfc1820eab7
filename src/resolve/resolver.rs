//! Binds axis names to sizes and computes the output shape.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use super::resolved::{AxisDimensionMap, ResolvedPattern};
use crate::error::{EinopsError, EinopsResult};
use crate::notation::{AxisPattern, EinopsAst, OperationKind, explicit_count, owned_sorted};

/// Resolves a pattern for `rearrange`.
///
/// # Example
///
/// ```ignore
/// let ast = parse_pattern("(h w) c -> h w c")?;
/// let resolved = resolve_pattern(&ast, &[100, 3], &[("h", 10)])?;
/// assert_eq!(resolved.output_shape, vec![10, 10, 3]);
/// ```
pub fn resolve_pattern(
    ast: &EinopsAst,
    input_shape: &[usize],
    explicit: &[(&str, usize)],
) -> EinopsResult<ResolvedPattern> {
    resolve_pattern_for(OperationKind::Rearrange, ast, input_shape, explicit)
}

/// Resolves a pattern under the output rules of the given operation.
///
/// The pattern is expected to have passed validation for `kind`.
pub fn resolve_pattern_for(
    kind: OperationKind,
    ast: &EinopsAst,
    input_shape: &[usize],
    explicit: &[(&str, usize)],
) -> EinopsResult<ResolvedPattern> {
    let mut resolver = Resolver::new(ast, explicit)?;
    resolver.bind_input(input_shape)?;
    if kind == OperationKind::Repeat {
        resolver.bind_new_output_axes()?;
    }
    let output_shape = resolver.output_shape()?;

    if kind == OperationKind::Rearrange {
        check_conservation(ast, input_shape, &output_shape)?;
    }

    Ok(ResolvedPattern {
        axis_dimensions: resolver.dims,
        ellipsis_dimensions: resolver.ellipsis,
        output_shape,
    })
}

/// Multiplies sizes, reporting overflow as a shape error.
fn checked_product(
    ast: &EinopsAst,
    sizes: impl IntoIterator<Item = usize>,
) -> EinopsResult<usize> {
    sizes.into_iter().try_fold(1usize, |acc, d| {
        acc.checked_mul(d)
            .ok_or_else(|| EinopsError::shape(ast.pattern(), "dimension product overflows usize"))
    })
}

fn check_conservation(ast: &EinopsAst, input: &[usize], output: &[usize]) -> EinopsResult<()> {
    let in_elements = checked_product(ast, input.iter().copied())?;
    let out_elements = checked_product(ast, output.iter().copied())?;
    if in_elements != out_elements {
        return Err(EinopsError::shape(
            ast.pattern(),
            alloc::format!(
                "rearrange must preserve element count ({} vs {})",
                in_elements, out_elements
            ),
        )
        .with_shapes(input.to_vec(), output.to_vec()));
    }
    Ok(())
}

struct Resolver<'a> {
    ast: &'a EinopsAst,
    explicit: HashMap<&'a str, usize>,
    dims: AxisDimensionMap,
    ellipsis: Vec<usize>,
}

impl<'a> Resolver<'a> {
    fn new(ast: &'a EinopsAst, explicit: &[(&'a str, usize)]) -> EinopsResult<Self> {
        let mut map: HashMap<&'a str, usize> = HashMap::with_capacity(explicit.len());
        for &(name, size) in explicit {
            if size == 0 {
                return Err(EinopsError::shape(
                    ast.pattern(),
                    alloc::format!("explicit size of '{}' must be positive", name),
                )
                .with_axes([name]));
            }
            if let Some(previous) = map.insert(name, size) {
                if previous != size {
                    return Err(EinopsError::shape(
                        ast.pattern(),
                        alloc::format!(
                            "conflicting explicit sizes for '{}': {} and {}",
                            name, previous, size
                        ),
                    )
                    .with_axes([name]));
                }
            }
        }

        Ok(Self {
            ast,
            explicit: map,
            dims: AxisDimensionMap::new(),
            ellipsis: Vec::new(),
        })
    }

    fn pattern(&self) -> &str {
        self.ast.pattern()
    }

    /// Known size of an axis from earlier bindings or explicit sizes.
    fn known_size(&self, name: &str) -> EinopsResult<Option<usize>> {
        match (self.dims.get(name).copied(), self.explicit.get(name).copied()) {
            (Some(bound), Some(given)) if bound != given => Err(self.conflict(name, given, bound)),
            (Some(size), _) | (None, Some(size)) => Ok(Some(size)),
            (None, None) => Ok(None),
        }
    }

    fn conflict(&self, name: &str, given: usize, actual: usize) -> EinopsError {
        EinopsError::shape(
            self.pattern(),
            alloc::format!(
                "explicit size {} for '{}' conflicts with size {} from the input shape",
                given, name, actual
            ),
        )
        .with_axes([name])
        .with_shapes(alloc::vec![given], alloc::vec![actual])
    }

    /// Walks the input side in lock-step with the shape.
    fn bind_input(&mut self, shape: &[usize]) -> EinopsResult<()> {
        let ast = self.ast;
        let input = ast.input();
        let explicit_terms = explicit_count(input);
        let has_ellipsis = input.iter().any(AxisPattern::is_ellipsis);

        let rank_ok = if has_ellipsis {
            shape.len() >= explicit_terms
        } else {
            shape.len() == explicit_terms
        };
        if !rank_ok {
            let expected = if has_ellipsis {
                alloc::format!("at least {}", explicit_terms)
            } else {
                alloc::format!("{}", explicit_terms)
            };
            return Err(EinopsError::shape(
                self.pattern(),
                alloc::format!(
                    "input pattern expects {} dimensions, tensor has {}",
                    expected,
                    shape.len()
                ),
            )
            .with_actual(shape));
        }

        let ellipsis_len = shape.len() - explicit_terms;
        let mut dim_idx = 0;

        for term in input {
            match term {
                AxisPattern::Simple { name, .. } => {
                    self.bind_simple(name, shape[dim_idx])?;
                    dim_idx += 1;
                }
                AxisPattern::Composite { axes, .. } => {
                    self.bind_composite(term, axes, shape[dim_idx])?;
                    dim_idx += 1;
                }
                AxisPattern::Ellipsis { .. } => {
                    self.ellipsis = shape[dim_idx..dim_idx + ellipsis_len].to_vec();
                    dim_idx += ellipsis_len;
                }
                AxisPattern::Singleton { .. } => {
                    if shape[dim_idx] != 1 {
                        return Err(EinopsError::shape(
                            self.pattern(),
                            alloc::format!(
                                "singleton at input position {} matched dimension of size {}",
                                dim_idx, shape[dim_idx]
                            ),
                        )
                        .with_actual(shape));
                    }
                    dim_idx += 1;
                }
            }
        }

        Ok(())
    }

    fn bind_simple(&mut self, name: &str, dim: usize) -> EinopsResult<()> {
        if let Some(&given) = self.explicit.get(name) {
            if given != dim {
                return Err(self.conflict(name, given, dim));
            }
        }
        if let Some(&bound) = self.dims.get(name) {
            if bound != dim {
                return Err(EinopsError::shape(
                    self.pattern(),
                    alloc::format!("axis '{}' bound to both {} and {}", name, bound, dim),
                )
                .with_axes([name]));
            }
        }
        self.dims.insert(String::from(name), dim);
        Ok(())
    }

    /// Splits one input dimension across the members of a group.
    fn bind_composite(&mut self, term: &AxisPattern, axes: &[AxisPattern], dim: usize) -> EinopsResult<()> {
        let mut names = Vec::new();
        for axis in axes {
            axis.collect_names(&mut names);
        }

        let mut known_product = 1usize;
        let mut unknown: Vec<&str> = Vec::new();
        for &name in &names {
            match self.known_size(name)? {
                Some(size) => {
                    known_product = known_product.checked_mul(size).ok_or_else(|| {
                        EinopsError::shape(self.pattern(), "dimension product overflows usize")
                    })?;
                }
                None => unknown.push(name),
            }
        }

        match unknown.as_slice() {
            [] => {
                if known_product != dim {
                    return Err(EinopsError::shape(
                        self.pattern(),
                        alloc::format!(
                            "group {} has size {} but the input dimension is {}",
                            term, known_product, dim
                        ),
                    )
                    .with_axes(names.iter().copied())
                    .with_shapes(alloc::vec![known_product], alloc::vec![dim]));
                }
            }
            [missing] => {
                if known_product == 0 || dim % known_product != 0 {
                    return Err(EinopsError::shape(
                        self.pattern(),
                        alloc::format!(
                            "dimension {} of group {} is not divisible by {}",
                            dim, term, known_product
                        ),
                    )
                    .with_axes(names.iter().copied()));
                }
                self.dims.insert(String::from(*missing), dim / known_product);
            }
            _ => {
                return Err(EinopsError::shape(
                    self.pattern(),
                    alloc::format!(
                        "cannot infer sizes of {} axes in group {}, provide all but one",
                        unknown.len(),
                        term
                    ),
                )
                .with_axes(owned_sorted(unknown.iter().copied())));
            }
        }

        for name in names {
            if !self.dims.contains_key(name) {
                if let Some(size) = self.known_size(name)? {
                    self.dims.insert(String::from(name), size);
                }
            }
        }
        Ok(())
    }

    /// Binds output axes that are not on the input side (repeat only).
    fn bind_new_output_axes(&mut self) -> EinopsResult<()> {
        let ast = self.ast;
        for name in ast.output_names() {
            if self.dims.contains_key(name) {
                continue;
            }
            let Some(&size) = self.explicit.get(name) else {
                return Err(EinopsError::axis(
                    self.pattern(),
                    "new axes in repeat require an explicit size",
                    [name],
                ));
            };
            self.dims.insert(String::from(name), size);
        }
        Ok(())
    }

    /// Walks the output side and computes its shape.
    fn output_shape(&self) -> EinopsResult<Vec<usize>> {
        let mut shape = Vec::with_capacity(self.ast.output().len() + self.ellipsis.len());
        for term in self.ast.output() {
            match term {
                AxisPattern::Ellipsis { .. } => shape.extend_from_slice(&self.ellipsis),
                other => shape.push(self.term_size(other)?),
            }
        }
        Ok(shape)
    }

    /// Size of a single output term; groups multiply their members.
    fn term_size(&self, term: &AxisPattern) -> EinopsResult<usize> {
        match term {
            AxisPattern::Simple { name, .. } => self.dims.get(name.as_str()).copied().ok_or_else(|| {
                EinopsError::shape(
                    self.pattern(),
                    alloc::format!("axis '{}' has no resolved size", name),
                )
                .with_axes([name.as_str()])
            }),
            AxisPattern::Composite { axes, .. } => {
                let sizes = axes
                    .iter()
                    .map(|axis| self.term_size(axis))
                    .collect::<EinopsResult<Vec<usize>>>()?;
                checked_product(self.ast, sizes)
            }
            AxisPattern::Ellipsis { .. } => checked_product(self.ast, self.ellipsis.iter().copied()),
            AxisPattern::Singleton { .. } => Ok(1),
        }
    }
}
