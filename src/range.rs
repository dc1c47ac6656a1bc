//! Range inference: min/max over an array's existing values, with the opt-in
//! blind 8-bit shortcut.

use crate::array::NdArray;
use crate::config::EngineConfig;
use crate::dtype::{with_scalar, Scalar};
use crate::error::{GridError, Result};
use crate::thread_pool;

/// Element count below which a range scan always stays sequential.
const PAR_MIN_ELEMENTS: usize = 1 << 20;

/// Result of one range scan. `min`/`max` are NaN when the array holds no
/// existent value; `has_non_existent` reports whether any NaN/±inf was seen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub has_non_existent: bool,
}

impl ValueRange {
    fn empty() -> Self {
        Self {
            min: f64::NAN,
            max: f64::NAN,
            has_non_existent: false,
        }
    }

    fn include(mut self, value: f64) -> Self {
        if !value.is_finite() {
            self.has_non_existent = true;
            return self;
        }
        if self.min.is_nan() || value < self.min {
            self.min = value;
        }
        if self.max.is_nan() || value > self.max {
            self.max = value;
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        let mut merged = self;
        if merged.min.is_nan() || other.min < merged.min {
            merged.min = other.min;
        }
        if merged.max.is_nan() || other.max > merged.max {
            merged.max = other.max;
        }
        merged.has_non_existent |= other.has_non_existent;
        merged
    }
}

/// Computes min/max over `array`, ignoring non-existent (NaN/±inf) values but
/// reporting their presence.
///
/// With `blind_8bit` set and a 1-byte integer element type, the type's full
/// representable range is returned immediately without touching the data, an
/// explicit performance/semantics trade the caller opts into.
pub fn compute_range(array: &NdArray, blind_8bit: bool) -> Result<ValueRange> {
    let dtype = array.dtype();
    if blind_8bit && dtype.is_integer() && dtype.width() == 1 {
        if let Some((min, max)) = dtype.representable_range() {
            return Ok(ValueRange {
                min,
                max,
                has_non_existent: false,
            });
        }
    }
    with_scalar!(
        dtype,
        T => Ok(scan::<T>(array.data(), array.len())),
        Err(GridError::UnsupportedType {
            operation: "compute_range",
            dtype,
        }),
    )
}

/// [`compute_range`] with the blind policy taken from `config`.
pub fn compute_range_with(config: &EngineConfig, array: &NdArray) -> Result<ValueRange> {
    compute_range(array, config.blind_8bit)
}

fn scan<T: Scalar>(data: &[u8], len: usize) -> ValueRange {
    if len >= PAR_MIN_ELEMENTS {
        if let Some(pool) = thread_pool() {
            return pool.install(|| {
                use rayon::prelude::*;
                (0..len)
                    .into_par_iter()
                    .with_min_len(1 << 14)
                    .fold(ValueRange::empty, |acc, idx| {
                        acc.include(T::read(data, idx).to_f64())
                    })
                    .reduce(ValueRange::empty, ValueRange::merge)
            });
        }
    }
    (0..len).fold(ValueRange::empty(), |acc, idx| {
        acc.include(T::read(data, idx).to_f64())
    })
}
