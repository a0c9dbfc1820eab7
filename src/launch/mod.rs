//! Launch module for einops operations.
//!
//! Provides the high-level API: the [`Einops`] engine, its configuration,
//! and free functions backed by a process-wide engine.

mod config;
mod executor;

pub use config::EinopsConfig;
pub use executor::{Einops, execute, execute_reduce, execute_repeat, global, rearrange, reduce, repeat};
