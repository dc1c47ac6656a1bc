//! Runtime-typed N-dimensional array processing: elementwise arithmetic with
//! manual type dispatch, range inference, and separable-kernel resampling.
//!
//! The core entity is [`NdArray`]: a handle carrying an element-type tag, per
//! axis sizes and metadata, and ownership of one contiguous buffer. Element
//! types are only known at runtime; the [`dtype::Scalar`] trait plus a
//! dispatch macro select a concrete type once per operation so the hot loops
//! stay monomorphic.
//!
//! Elementwise operations take [`Operand`]s (scalar constants or whole
//! arrays walked in linear order) and produce a fresh handle:
//!
//! ```
//! use gridops::{apply_unary, NdArray, Operand, UnaryOp};
//!
//! let values = NdArray::from_vec(&[1.0f64, -2.0, 3.5], &[3]).unwrap();
//! let negated = apply_unary(UnaryOp::Negate, Operand::array(&values).unwrap(), None).unwrap();
//! assert_eq!(negated.values().unwrap(), vec![-1.0, 2.0, -3.5]);
//! ```
//!
//! Resampling is configured per axis through [`ResamplePlan`]: a kernel, an
//! output sample count, a boundary policy, and optional weight
//! renormalization, composed axis by axis.
//!
//! All operations are synchronous and either fully complete or fail without
//! partial writes. Large per-element loops run on a shared rayon pool
//! (`GRIDOPS_THREADS` overrides its size); results are identical either way
//! because every output position is computed independently.

use std::env;
use std::sync::OnceLock;

pub mod array;
pub mod axis;
pub mod config;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod operand;
pub mod ops;
pub mod range;
pub mod resample;

pub use array::NdArray;
pub use axis::{Axis, Centering, MAX_DIM};
pub use config::EngineConfig;
pub use dtype::{DType, Scalar};
pub use error::{GridError, Result};
pub use kernel::Kernel;
pub use operand::{ArrayWalk, Operand};
pub use ops::{apply_binary, apply_ternary, apply_unary, BinaryOp, TernaryOp, UnaryOp};
pub use range::{compute_range, compute_range_with, ValueRange};
pub use resample::{AxisPlan, Boundary, ResamplePlan};

/// Shared pool for per-element loops; `None` on single-core hosts or when the
/// pool cannot be built, in which case callers stay sequential.
pub(crate) fn thread_pool() -> Option<&'static rayon::ThreadPool> {
    static POOL: OnceLock<Option<rayon::ThreadPool>> = OnceLock::new();
    POOL.get_or_init(|| {
        let explicit = env::var("GRIDOPS_THREADS")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|&threads| threads > 1);
        let builder = if let Some(threads) = explicit {
            rayon::ThreadPoolBuilder::new().num_threads(threads)
        } else {
            rayon::ThreadPoolBuilder::new()
        };
        match builder.build() {
            Ok(pool) if pool.current_num_threads() > 1 => Some(pool),
            _ => None,
        }
    })
    .as_ref()
}
