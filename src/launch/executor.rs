//! Einops execution engine.
//!
//! Orchestrates parsing, validation, resolution, planning, and backend
//! dispatch.

use alloc::sync::Arc;
use alloc::vec::Vec;

use super::config::EinopsConfig;
#[cfg(feature = "std")]
use crate::cache::PatternCache;
use crate::error::{EinopsResult, ExecutionError};
use crate::notation::{
    EinopsAst, OperationKind, parse_pattern, validate_explicit_sizes, validate_for,
};
use crate::plan::{
    RearrangePlan, ReducePlan, ReductionOp, RepeatPlan, TensorOperation, create_plan,
    create_reduce_plan, create_repeat_plan,
};
use crate::resolve::resolve_pattern_for;
use crate::tensor::{ExpandCapability, ReduceCapability, TensorCapability};

/// Applies a sequence of operations, awaiting each before the next.
///
/// The first backend failure is returned unchanged and the remaining
/// steps are abandoned.
pub async fn execute<T: TensorCapability>(
    tensor: T,
    operations: &[TensorOperation],
) -> Result<T, T::Error> {
    let mut current = tensor;
    for (step, op) in operations.iter().enumerate() {
        tracing::trace!(step, op = %op, "executing step");
        current = match op {
            TensorOperation::Identity => current,
            TensorOperation::Transpose => current.transpose().await?,
            TensorOperation::Permute(axes) => current.permute(axes).await?,
            TensorOperation::Reshape(shape) => current.reshape(shape).await?,
        };
    }
    Ok(current)
}

/// Runs a reduce plan.
pub async fn execute_reduce<T: ReduceCapability>(tensor: T, plan: &ReducePlan) -> Result<T, T::Error> {
    let mut current = execute(tensor, &plan.before).await?;
    if plan.reduces() {
        tracing::trace!(axes = ?plan.axes, op = plan.op.name(), keep_dims = plan.keep_dims, "executing reduction");
        current = current.reduce(&plan.axes, plan.op, plan.keep_dims).await?;
    }
    execute(current, &plan.after).await
}

/// Runs a repeat plan.
pub async fn execute_repeat<T: ExpandCapability>(tensor: T, plan: &RepeatPlan) -> Result<T, T::Error> {
    let mut current = execute(tensor, &plan.before).await?;
    if let Some(shape) = &plan.expand {
        tracing::trace!(shape = ?shape, "executing expand");
        current = current.expand(shape).await?;
    }
    execute(current, &plan.after).await
}

/// Pattern engine holding configuration and the optional pattern cache.
///
/// # Example
///
/// ```ignore
/// let engine = Einops::new(EinopsConfig::default());
/// let plan = engine.plan_rearrange("(h w) c -> h w c", &[100, 3], &[("h", 10)])?;
/// assert_eq!(plan.output_shape(), &[10, 10, 3]);
///
/// let out = engine.rearrange(tensor, "b c h w -> b h w c", &[]).await?;
/// ```
#[derive(Debug)]
pub struct Einops {
    config: EinopsConfig,
    #[cfg(feature = "std")]
    cache: Option<PatternCache>,
}

impl Default for Einops {
    fn default() -> Self {
        Self::new(EinopsConfig::default())
    }
}

impl Einops {
    pub fn new(config: EinopsConfig) -> Self {
        Self {
            #[cfg(feature = "std")]
            cache: config
                .use_cache
                .then(|| PatternCache::new(config.cache_capacity)),
            config,
        }
    }

    pub fn config(&self) -> &EinopsConfig {
        &self.config
    }

    /// Returns the pattern cache, if enabled.
    #[cfg(feature = "std")]
    pub fn cache(&self) -> Option<&PatternCache> {
        self.cache.as_ref()
    }

    /// Parses a pattern, going through the cache when enabled.
    pub fn parse(&self, pattern: &str) -> EinopsResult<Arc<EinopsAst>> {
        #[cfg(feature = "std")]
        if let Some(cache) = &self.cache {
            return cache.get_or_parse(pattern);
        }
        parse_pattern(pattern).map(Arc::new)
    }

    /// Parses and validates a pattern for `kind`.
    fn prepare(
        &self,
        kind: OperationKind,
        pattern: &str,
        explicit: &[(&str, usize)],
    ) -> EinopsResult<Arc<EinopsAst>> {
        let ast = self.parse(pattern)?;
        let names: Vec<&str> = explicit.iter().map(|&(name, _)| name).collect();
        validate_for(kind, &ast, &names)?;
        if self.config.strict_sizes {
            validate_explicit_sizes(&ast, &names)?;
        }
        Ok(ast)
    }

    /// Plans a `rearrange` without touching any tensor.
    pub fn plan_rearrange(
        &self,
        pattern: &str,
        input_shape: &[usize],
        explicit: &[(&str, usize)],
    ) -> EinopsResult<RearrangePlan> {
        let ast = self.prepare(OperationKind::Rearrange, pattern, explicit)?;
        let resolved = resolve_pattern_for(OperationKind::Rearrange, &ast, input_shape, explicit)?;
        let operations = create_plan(&ast, input_shape, &resolved)?;
        Ok(RearrangePlan {
            resolved,
            operations,
        })
    }

    /// Plans a `reduce` without touching any tensor.
    pub fn plan_reduce(
        &self,
        pattern: &str,
        input_shape: &[usize],
        op: ReductionOp,
        keep_dims: bool,
        explicit: &[(&str, usize)],
    ) -> EinopsResult<ReducePlan> {
        let ast = self.prepare(OperationKind::Reduce, pattern, explicit)?;
        let resolved = resolve_pattern_for(OperationKind::Reduce, &ast, input_shape, explicit)?;
        create_reduce_plan(&ast, input_shape, resolved, op, keep_dims)
    }

    /// Plans a `repeat` without touching any tensor.
    pub fn plan_repeat(
        &self,
        pattern: &str,
        input_shape: &[usize],
        explicit: &[(&str, usize)],
    ) -> EinopsResult<RepeatPlan> {
        let ast = self.prepare(OperationKind::Repeat, pattern, explicit)?;
        let resolved = resolve_pattern_for(OperationKind::Repeat, &ast, input_shape, explicit)?;
        create_repeat_plan(&ast, input_shape, resolved)
    }

    /// Rearranges `tensor` according to `pattern`.
    pub async fn rearrange<T: TensorCapability>(
        &self,
        tensor: T,
        pattern: &str,
        explicit: &[(&str, usize)],
    ) -> Result<T, ExecutionError<T::Error>> {
        let plan = self.plan_rearrange(pattern, tensor.shape(), explicit)?;
        execute(tensor, &plan.operations)
            .await
            .map_err(ExecutionError::Tensor)
    }

    /// Reduces the axes of `tensor` that `pattern` drops.
    pub async fn reduce<T: ReduceCapability>(
        &self,
        tensor: T,
        pattern: &str,
        op: ReductionOp,
        keep_dims: bool,
        explicit: &[(&str, usize)],
    ) -> Result<T, ExecutionError<T::Error>> {
        let plan = self.plan_reduce(pattern, tensor.shape(), op, keep_dims, explicit)?;
        execute_reduce(tensor, &plan)
            .await
            .map_err(ExecutionError::Tensor)
    }

    /// Broadcasts `tensor` along the new axes of `pattern`.
    pub async fn repeat<T: ExpandCapability>(
        &self,
        tensor: T,
        pattern: &str,
        explicit: &[(&str, usize)],
    ) -> Result<T, ExecutionError<T::Error>> {
        let plan = self.plan_repeat(pattern, tensor.shape(), explicit)?;
        execute_repeat(tensor, &plan)
            .await
            .map_err(ExecutionError::Tensor)
    }
}

#[cfg(feature = "std")]
static GLOBAL: once_cell::sync::Lazy<Einops> = once_cell::sync::Lazy::new(Einops::default);

#[cfg(not(feature = "std"))]
static GLOBAL: Einops = Einops {
    config: EinopsConfig {
        use_cache: false,
        cache_capacity: 0,
        strict_sizes: true,
    },
};

/// Process-wide engine with the default configuration.
pub fn global() -> &'static Einops {
    &GLOBAL
}

/// Rearranges `tensor` using the global engine.
///
/// # Example
///
/// ```ignore
/// let out = rearrange(tensor, "(batch seq) hidden -> batch seq hidden", &[("batch", 4)]).await?;
/// ```
pub async fn rearrange<T: TensorCapability>(
    tensor: T,
    pattern: &str,
    explicit: &[(&str, usize)],
) -> Result<T, ExecutionError<T::Error>> {
    global().rearrange(tensor, pattern, explicit).await
}

/// Reduces `tensor` using the global engine.
pub async fn reduce<T: ReduceCapability>(
    tensor: T,
    pattern: &str,
    op: ReductionOp,
    keep_dims: bool,
    explicit: &[(&str, usize)],
) -> Result<T, ExecutionError<T::Error>> {
    global().reduce(tensor, pattern, op, keep_dims, explicit).await
}

/// Repeats `tensor` using the global engine.
pub async fn repeat<T: ExpandCapability>(
    tensor: T,
    pattern: &str,
    explicit: &[(&str, usize)],
) -> Result<T, ExecutionError<T::Error>> {
    global().repeat(tensor, pattern, explicit).await
}
