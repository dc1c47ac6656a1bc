//! Arithmetic dispatch engine: unary/binary/ternary elementwise operations
//! over mixed scalar/array operands.
//!
//! Every apply call validates operand arity and shape agreement, allocates
//! the output handle, then makes exactly one pass over linear positions in
//! increasing order, writing through the typed accessor of the output type.
//! Large RNG-free passes run on the shared rayon pool; each output position
//! is independent, so parallel and sequential results are identical.

mod binary;
mod ternary;
mod unary;

pub use binary::BinaryOp;
pub use ternary::TernaryOp;
pub use unary::UnaryOp;

use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::array::NdArray;
use crate::dtype::{with_scalar, DType, Scalar};
use crate::error::{GridError, Result};
use crate::operand::Operand;
use crate::thread_pool;

/// Element count below which an apply pass always stays sequential.
const PAR_MIN_ELEMENTS: usize = 1 << 16;
/// Elements handed to one rayon task.
const PAR_BLOCK: usize = 1 << 12;

/// Applies a unary operator. `out` overrides the output element type; when
/// set, operand values are value-converted to it before the operator runs.
pub fn apply_unary(op: UnaryOp, mut a: Operand, out: Option<DType>) -> Result<NdArray> {
    let mut result = output_for("apply_unary", &[&a], out)?;
    let explicit = out.is_some();
    let len = result.len();
    let content = format!("{}({})", op.label(), a.describe());

    with_scalar!(
        result.dtype(),
        Out => {
            if let UnaryOp::Rand = op {
                // One RNG per invocation, seeded from process time; never
                // re-seeded per element.
                let mut rng = StdRng::seed_from_u64(time_seed());
                let data = result.data_mut();
                for idx in 0..len {
                    let _ = a.next();
                    Out::from_f64(rng.gen::<f64>()).write(data, idx);
                }
            } else {
                let value = |idx: usize| op.eval(quantized::<Out>(a.value_at(idx), explicit));
                run_elementwise::<Out>(result.data_mut(), len, &value, op.label());
            }
        },
        unreachable!("output dtype validated"),
    );

    result.set_content(content);
    Ok(result)
}

/// Applies a binary operator over two operands, at least one of which must be
/// an array; array operands must agree exactly in shape.
pub fn apply_binary(op: BinaryOp, a: Operand, b: Operand, out: Option<DType>) -> Result<NdArray> {
    let mut result = output_for("apply_binary", &[&a, &b], out)?;
    let explicit = out.is_some();
    let len = result.len();
    let content = format!("({} {} {})", a.describe(), op.label(), b.describe());

    with_scalar!(
        result.dtype(),
        Out => {
            let value = |idx: usize| {
                op.eval(
                    quantized::<Out>(a.value_at(idx), explicit),
                    quantized::<Out>(b.value_at(idx), explicit),
                )
            };
            run_elementwise::<Out>(result.data_mut(), len, &value, op.label());
        },
        unreachable!("output dtype validated"),
    );

    result.set_content(content);
    Ok(result)
}

/// Applies a ternary operator over three operands, at least one of which must
/// be an array; array operands must agree exactly in shape.
pub fn apply_ternary(
    op: TernaryOp,
    a: Operand,
    b: Operand,
    c: Operand,
    out: Option<DType>,
) -> Result<NdArray> {
    let mut result = output_for("apply_ternary", &[&a, &b, &c], out)?;
    let explicit = out.is_some();
    let len = result.len();
    let content = format!(
        "{}({}, {}, {})",
        op.label(),
        a.describe(),
        b.describe(),
        c.describe()
    );

    with_scalar!(
        result.dtype(),
        Out => {
            let value = |idx: usize| {
                op.eval(
                    quantized::<Out>(a.value_at(idx), explicit),
                    quantized::<Out>(b.value_at(idx), explicit),
                    quantized::<Out>(c.value_at(idx), explicit),
                )
            };
            run_elementwise::<Out>(result.data_mut(), len, &value, op.label());
        },
        unreachable!("output dtype validated"),
    );

    result.set_content(content);
    Ok(result)
}

/// Validates arity and shape agreement, then allocates the output handle
/// sharing the first array operand's shape and axis metadata.
fn output_for(
    operation: &'static str,
    operands: &[&Operand],
    out: Option<DType>,
) -> Result<NdArray> {
    let mut arrays = operands.iter().filter_map(|operand| operand.as_array());
    let first = arrays.next().ok_or(GridError::InvalidOperatorArity {
        operation,
        expected: "at least one array operand",
        got: "only constants",
    })?;
    for other in arrays {
        if other.shape() != first.shape() {
            return Err(GridError::ShapeMismatch {
                operation,
                left: first.shape(),
                right: other.shape(),
            });
        }
    }
    let dtype = out.unwrap_or(first.dtype());
    if dtype.is_block() {
        return Err(GridError::UnsupportedType { operation, dtype });
    }
    Ok(first.with_shape_of(dtype))
}

/// Rounds `value` through the output type when the caller requested an
/// explicit one; operands are converted before the operator applies.
fn quantized<Out: Scalar>(value: f64, explicit: bool) -> f64 {
    if explicit {
        Out::from_f64(value).to_f64()
    } else {
        value
    }
}

fn run_elementwise<Out: Scalar>(
    data: &mut [u8],
    len: usize,
    value: &(dyn Fn(usize) -> f64 + Sync),
    label: &str,
) {
    if len >= PAR_MIN_ELEMENTS {
        if let Some(pool) = thread_pool() {
            debug!(
                "elementwise `{label}`: {len} elements on {} threads",
                pool.current_num_threads()
            );
            pool.install(|| {
                use rayon::prelude::*;
                data.par_chunks_mut(Out::WIDTH * PAR_BLOCK)
                    .enumerate()
                    .for_each(|(block, chunk)| {
                        let start = block * PAR_BLOCK;
                        for offset in 0..chunk.len() / Out::WIDTH {
                            Out::from_f64(value(start + offset)).write(chunk, offset);
                        }
                    });
            });
            return;
        }
    }
    for idx in 0..len {
        Out::from_f64(value(idx)).write(data, idx);
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
