//! Separable-kernel resampling: per-axis convolution against a weighted
//! neighbor table, composed axis by axis.
//!
//! Each resampled axis maps output sample positions into source index space
//! (honoring cell/node centering), gathers the source samples inside the
//! kernel's support, substitutes out-of-range indices per the boundary
//! policy, and optionally renormalizes the weights of each output sample to
//! sum to 1. Intermediate results are held in double precision until every
//! axis is processed; the final conversion writes the requested output type.

use log::debug;

use crate::array::NdArray;
use crate::axis::{Axis, Centering};
use crate::config::EngineConfig;
use crate::dtype::{reader_for, DType, Scalar};
use crate::error::{GridError, Result};
use crate::kernel::Kernel;
use crate::thread_pool;

/// Output element count below which an axis pass stays sequential.
const PAR_MIN_ELEMENTS: usize = 1 << 16;

/// Weight sums smaller than this skip renormalization (degenerate kernel).
const RENORM_EPSILON: f64 = 1e-12;

/// Handling of source positions outside an axis's valid index range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    /// Substitute the given value for out-of-range taps.
    Pad(f64),
    /// Clamp the index into the valid range.
    Bleed,
    /// Wrap the index modulo the axis size.
    Wrap,
}

impl Boundary {
    pub const fn label(self) -> &'static str {
        match self {
            Boundary::Pad(_) => "pad",
            Boundary::Bleed => "bleed",
            Boundary::Wrap => "wrap",
        }
    }
}

/// What happens to one axis during execution.
#[derive(Clone, Debug)]
pub enum AxisPlan {
    /// Axis is copied through unchanged.
    PassThrough,
    /// Axis is convolved down/up to `samples` output samples over the given
    /// source index range (whole axis when `None`).
    Resample {
        kernel: Kernel,
        samples: usize,
        range: Option<(f64, f64)>,
    },
}

/// Per-axis resampling context: configure each axis, then [`execute`].
///
/// Axes are processed independently and sequentially; separability makes the
/// numerical result independent of axis order.
///
/// [`execute`]: ResamplePlan::execute
#[derive(Clone, Debug)]
pub struct ResamplePlan {
    plans: Vec<AxisPlan>,
    boundary: Boundary,
    renormalize: bool,
    out_dtype: Option<DType>,
    default_centering: Centering,
}

impl ResamplePlan {
    /// A plan for a `dim`-dimensional array with every axis passed through.
    pub fn new(dim: usize) -> Self {
        Self {
            plans: vec![AxisPlan::PassThrough; dim],
            boundary: Boundary::Bleed,
            renormalize: true,
            out_dtype: None,
            default_centering: Centering::Cell,
        }
    }

    /// Like [`ResamplePlan::new`], taking the unknown-centering fallback from
    /// `config`.
    pub fn with_config(dim: usize, config: &EngineConfig) -> Self {
        let mut plan = Self::new(dim);
        plan.default_centering = config.default_centering;
        plan
    }

    /// Resamples `axis` to `samples` output samples over the whole axis.
    pub fn resample_axis(self, axis: usize, kernel: Kernel, samples: usize) -> Result<Self> {
        self.set_plan(
            axis,
            AxisPlan::Resample {
                kernel,
                samples,
                range: None,
            },
        )
    }

    /// Resamples `axis` over an explicit source index range `(lo, hi)`.
    pub fn resample_axis_range(
        self,
        axis: usize,
        kernel: Kernel,
        samples: usize,
        range: (f64, f64),
    ) -> Result<Self> {
        self.set_plan(
            axis,
            AxisPlan::Resample {
                kernel,
                samples,
                range: Some(range),
            },
        )
    }

    /// Marks `axis` as not resampled (the initial state of every axis).
    pub fn pass_through(self, axis: usize) -> Result<Self> {
        self.set_plan(axis, AxisPlan::PassThrough)
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Renormalization is on by default; turning it off applies raw kernel
    /// weights, required for deliberately non-energy-preserving kernels.
    pub fn renormalize(mut self, renormalize: bool) -> Self {
        self.renormalize = renormalize;
        self
    }

    pub fn out_dtype(mut self, dtype: DType) -> Self {
        self.out_dtype = Some(dtype);
        self
    }

    fn set_plan(mut self, axis: usize, plan: AxisPlan) -> Result<Self> {
        if axis >= self.plans.len() {
            return Err(GridError::InvalidConfiguration {
                operation: "ResamplePlan",
                reason: format!("axis {axis} outside 0..{}", self.plans.len()),
            });
        }
        self.plans[axis] = plan;
        Ok(self)
    }

    /// Runs the configured plan, producing a fresh handle.
    pub fn execute(&self, input: &NdArray) -> Result<NdArray> {
        if input.dtype().is_block() {
            return Err(GridError::UnsupportedType {
                operation: "resample",
                dtype: input.dtype(),
            });
        }
        if self.plans.len() != input.dim() {
            return Err(GridError::InvalidConfiguration {
                operation: "resample",
                reason: format!(
                    "plan covers {} axes, array has {}",
                    self.plans.len(),
                    input.dim()
                ),
            });
        }
        let final_dtype = self.out_dtype.unwrap_or(input.dtype());
        if final_dtype.is_block() {
            return Err(GridError::UnsupportedType {
                operation: "resample",
                dtype: final_dtype,
            });
        }
        for (idx, plan) in self.plans.iter().enumerate() {
            self.validate_axis(input, idx, plan)?;
        }

        let mut work: Option<NdArray> = None;
        for (idx, plan) in self.plans.iter().enumerate() {
            let AxisPlan::Resample {
                kernel,
                samples,
                range,
            } = plan
            else {
                continue;
            };
            let src = work.as_ref().unwrap_or(input);
            debug!(
                "resample axis {idx}: {} -> {samples} samples, kernel {}, boundary {}",
                src.axes()[idx].size,
                kernel.label(),
                self.boundary.label()
            );
            work = Some(self.resample_one_axis(src, idx, *kernel, *samples, *range)?);
        }

        let mut result = match work {
            Some(done) if done.dtype() == final_dtype => done,
            Some(done) => done.convert(final_dtype)?,
            None => input.convert(final_dtype)?,
        };
        result.set_content(format!("resample({})", input.content().unwrap_or("?")));
        Ok(result)
    }

    fn validate_axis(&self, input: &NdArray, idx: usize, plan: &AxisPlan) -> Result<()> {
        let AxisPlan::Resample {
            kernel,
            samples,
            range,
        } = plan
        else {
            return Ok(());
        };
        if *samples == 0 {
            return Err(GridError::InvalidConfiguration {
                operation: "resample",
                reason: format!("axis {idx}: zero output samples"),
            });
        }
        if input.axes()[idx].size == 0 {
            return Err(GridError::InvalidConfiguration {
                operation: "resample",
                reason: format!("axis {idx}: cannot resample an empty axis"),
            });
        }
        if let Some((lo, hi)) = range {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(GridError::InvalidConfiguration {
                    operation: "resample",
                    reason: format!("axis {idx}: bad source range [{lo}, {hi}]"),
                });
            }
        }
        if !(kernel.support() > 0.0) {
            return Err(GridError::InvalidConfiguration {
                operation: "resample",
                reason: format!("axis {idx}: kernel {} has empty support", kernel.label()),
            });
        }
        Ok(())
    }

    fn resample_one_axis(
        &self,
        src: &NdArray,
        axis_idx: usize,
        kernel: Kernel,
        samples: usize,
        range: Option<(f64, f64)>,
    ) -> Result<NdArray> {
        let axis = &src.axes()[axis_idx];
        let center = match axis.center {
            Centering::Unknown => match self.default_centering {
                Centering::Unknown => Centering::Cell,
                resolved => resolved,
            },
            resolved => resolved,
        };
        let (lo, hi) = range.unwrap_or((0.0, axis.size as f64 - 1.0));
        let table = axis_taps(
            axis.size,
            center,
            kernel,
            samples,
            (lo, hi),
            self.boundary,
            self.renormalize,
        )?;

        let n_in = axis.size;
        let stride = src.stride(axis_idx);

        let mut axes = src.axes().to_vec();
        axes[axis_idx] = resampled_axis(axis, center, samples, (lo, hi));
        let mut out = NdArray::with_axes(DType::Double, axes);
        // A zero-sized pass-through axis empties the whole array.
        if out.is_empty() {
            return Ok(out);
        }
        let outer_count = src.len() / (stride * n_in);

        let read = reader_for(src.dtype(), "resample")?;
        let src_data = src.data();
        let pad = match self.boundary {
            Boundary::Pad(value) => value,
            _ => 0.0,
        };
        let slab = stride * samples;

        let convolve_slab = |outer: usize, slab_data: &mut [u8]| {
            let src_base = outer * stride * n_in;
            for (j, taps) in table.iter().enumerate() {
                for inner in 0..stride {
                    let mut acc = 0.0;
                    for tap in taps {
                        let value = match tap.src {
                            Some(s) => read(src_data, src_base + s * stride + inner),
                            None => pad,
                        };
                        acc += tap.weight * value;
                    }
                    acc.write(slab_data, j * stride + inner);
                }
            }
        };

        let out_len = out.len();
        let data = out.data_mut();
        let mut ran_parallel = false;
        if out_len >= PAR_MIN_ELEMENTS && outer_count > 1 {
            if let Some(pool) = thread_pool() {
                ran_parallel = true;
                pool.install(|| {
                    use rayon::prelude::*;
                    data.par_chunks_mut(slab * f64::WIDTH)
                        .enumerate()
                        .for_each(|(outer, slab_data)| convolve_slab(outer, slab_data));
                });
            }
        }
        if !ran_parallel {
            for (outer, slab_data) in data.chunks_mut(slab * f64::WIDTH).enumerate() {
                convolve_slab(outer, slab_data);
            }
        }
        Ok(out)
    }
}

/// One weighted source sample feeding an output sample; `src == None` means
/// the boundary pad value.
#[derive(Clone, Copy, Debug)]
struct Tap {
    src: Option<usize>,
    weight: f64,
}

/// Builds the output-sample -> weighted-source-samples table for one axis.
fn axis_taps(
    size: usize,
    center: Centering,
    kernel: Kernel,
    samples: usize,
    (lo, hi): (f64, f64),
    boundary: Boundary,
    renormalize: bool,
) -> Result<Vec<Vec<Tap>>> {
    let support = kernel.support();
    let mut table = Vec::with_capacity(samples);
    for j in 0..samples {
        let pos = sample_position(j, samples, center, lo, hi);
        let first = (pos - support).ceil() as i64;
        let last = (pos + support).floor() as i64;
        let mut taps = Vec::with_capacity((last - first + 1).max(0) as usize);
        for i in first..=last {
            let weight = kernel.eval(pos - i as f64);
            if weight == 0.0 {
                continue;
            }
            let src = resolve_index(i, size, boundary);
            taps.push(Tap { src, weight });
        }
        if taps.is_empty() {
            return Err(GridError::InvalidConfiguration {
                operation: "resample",
                reason: format!(
                    "kernel {} covers no source sample at output index {j}",
                    kernel.label()
                ),
            });
        }
        if renormalize {
            let total: f64 = taps.iter().map(|tap| tap.weight).sum();
            if total.abs() > RENORM_EPSILON {
                for tap in &mut taps {
                    tap.weight /= total;
                }
            }
        }
        table.push(taps);
    }
    Ok(table)
}

/// Continuous source-space position of output sample `j`.
///
/// Node-centered samples sit at integer offsets: the first and last output
/// samples land exactly on `lo` and `hi`. Cell-centered samples sit at
/// half-integer offsets inside the widened range `[lo - 0.5, hi + 0.5]`.
fn sample_position(j: usize, samples: usize, center: Centering, lo: f64, hi: f64) -> f64 {
    match center {
        Centering::Node | Centering::Unknown => {
            if samples == 1 {
                (lo + hi) / 2.0
            } else {
                lo + j as f64 * (hi - lo) / (samples as f64 - 1.0)
            }
        }
        Centering::Cell => lo - 0.5 + (j as f64 + 0.5) * (hi - lo + 1.0) / samples as f64,
    }
}

fn resolve_index(i: i64, size: usize, boundary: Boundary) -> Option<usize> {
    let last = size as i64 - 1;
    if (0..=last).contains(&i) {
        return Some(i as usize);
    }
    match boundary {
        Boundary::Pad(_) => None,
        Boundary::Bleed => Some(i.clamp(0, last) as usize),
        Boundary::Wrap => Some(i.rem_euclid(size as i64) as usize),
    }
}

fn resampled_axis(axis: &Axis, center: Centering, samples: usize, (lo, hi): (f64, f64)) -> Axis {
    let mut out = axis.clone();
    out.size = samples;
    out.center = center;
    if axis.spacing.is_finite() {
        let ratio = match center {
            Centering::Cell => (hi - lo + 1.0) / samples as f64,
            _ if samples > 1 => (hi - lo) / (samples as f64 - 1.0),
            _ => hi - lo,
        };
        out.spacing = axis.spacing * ratio;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_positions_span_the_range() {
        assert_eq!(sample_position(0, 2, Centering::Node, 0.0, 3.0), 0.0);
        assert_eq!(sample_position(1, 2, Centering::Node, 0.0, 3.0), 3.0);
        assert_eq!(sample_position(0, 1, Centering::Node, 0.0, 3.0), 1.5);
    }

    #[test]
    fn cell_positions_sit_at_half_integers() {
        // 4 cells resampled to 2: centers at 0.5 and 2.5.
        assert_eq!(sample_position(0, 2, Centering::Cell, 0.0, 3.0), 0.5);
        assert_eq!(sample_position(1, 2, Centering::Cell, 0.0, 3.0), 2.5);
        // Identity mapping when sizes agree.
        for j in 0..4 {
            assert_eq!(sample_position(j, 4, Centering::Cell, 0.0, 3.0), j as f64);
        }
    }

    #[test]
    fn bleed_clamps_and_wrap_wraps() {
        assert_eq!(resolve_index(-2, 4, Boundary::Bleed), Some(0));
        assert_eq!(resolve_index(5, 4, Boundary::Bleed), Some(3));
        assert_eq!(resolve_index(-1, 4, Boundary::Wrap), Some(3));
        assert_eq!(resolve_index(4, 4, Boundary::Wrap), Some(0));
        assert_eq!(resolve_index(-1, 4, Boundary::Pad(9.0)), None);
        assert_eq!(resolve_index(2, 4, Boundary::Pad(9.0)), Some(2));
    }

    #[test]
    fn renormalized_taps_sum_to_one() {
        let table = axis_taps(
            5,
            Centering::Node,
            Kernel::mitchell(),
            7,
            (0.0, 4.0),
            Boundary::Bleed,
            true,
        )
        .unwrap();
        for taps in &table {
            let total: f64 = taps.iter().map(|tap| tap.weight).sum();
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn raw_taps_keep_kernel_weights() {
        let table = axis_taps(
            4,
            Centering::Node,
            Kernel::Gaussian {
                sigma: 1.0,
                cutoff: 3.0,
            },
            4,
            (0.0, 3.0),
            Boundary::Bleed,
            false,
        )
        .unwrap();
        // A gaussian's raw integer-offset weights do not sum to exactly 1.
        let total: f64 = table[1].iter().map(|tap| tap.weight).sum();
        assert!((total - 1.0).abs() > 1e-6);
    }

    #[test]
    fn degenerate_kernel_support_is_rejected() {
        let err = axis_taps(
            4,
            Centering::Node,
            Kernel::Gaussian {
                sigma: 0.05,
                cutoff: 2.0,
            },
            3,
            (0.0, 3.0),
            Boundary::Bleed,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidConfiguration { .. }));
    }
}
