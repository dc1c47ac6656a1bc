//! Separable resampling kernels: a stateless weighting function plus its
//! support radius in source index space.

/// Kernel specification reused for every output sample on an axis.
///
/// Weights are evaluated in source index space; no implicit dilation is
/// applied when downsampling. Wider smoothing is expressed through the
/// kernel's own parameters (`sigma`, `radius`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Kernel {
    /// Nearest-neighbor box, support 0.5.
    Box,
    /// Linear tent, support 1.
    Tent,
    /// Cubic BC family (Mitchell-Netravali parameterization), support 2.
    Cubic { b: f64, c: f64 },
    /// Biweight quartic `(15/16)(1 - x^2)^2`, support 1.
    Quartic,
    /// Hann-windowed sinc with the given support radius.
    Hann { radius: f64 },
    /// Blackman-windowed sinc with the given support radius.
    Blackman { radius: f64 },
    /// Gaussian truncated at `cutoff` standard deviations.
    Gaussian { sigma: f64, cutoff: f64 },
}

impl Kernel {
    /// Mitchell-Netravali cubic (B = C = 1/3).
    pub fn mitchell() -> Self {
        Kernel::Cubic {
            b: 1.0 / 3.0,
            c: 1.0 / 3.0,
        }
    }

    /// Catmull-Rom cubic (B = 0, C = 1/2), interpolating.
    pub fn catmull_rom() -> Self {
        Kernel::Cubic { b: 0.0, c: 0.5 }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Kernel::Box => "box",
            Kernel::Tent => "tent",
            Kernel::Cubic { .. } => "cubic",
            Kernel::Quartic => "quartic",
            Kernel::Hann { .. } => "hann",
            Kernel::Blackman { .. } => "blackman",
            Kernel::Gaussian { .. } => "gauss",
        }
    }

    /// Support radius: `eval(x)` is zero for `|x| > support()`.
    pub fn support(self) -> f64 {
        match self {
            Kernel::Box => 0.5,
            Kernel::Tent | Kernel::Quartic => 1.0,
            Kernel::Cubic { .. } => 2.0,
            Kernel::Hann { radius } | Kernel::Blackman { radius } => radius,
            Kernel::Gaussian { sigma, cutoff } => sigma * cutoff,
        }
    }

    /// Evaluates the kernel weight at signed source-space offset `x`.
    pub fn eval(self, x: f64) -> f64 {
        let t = x.abs();
        match self {
            Kernel::Box => {
                if t < 0.5 {
                    1.0
                } else if t == 0.5 {
                    0.5
                } else {
                    0.0
                }
            }
            Kernel::Tent => (1.0 - t).max(0.0),
            Kernel::Cubic { b, c } => cubic_bc(t, b, c),
            Kernel::Quartic => {
                if t < 1.0 {
                    let u = 1.0 - t * t;
                    15.0 / 16.0 * u * u
                } else {
                    0.0
                }
            }
            Kernel::Hann { radius } => {
                if t < radius {
                    sinc(x) * 0.5 * (1.0 + (std::f64::consts::PI * x / radius).cos())
                } else {
                    0.0
                }
            }
            Kernel::Blackman { radius } => {
                if t < radius {
                    let phase = std::f64::consts::PI * x / radius;
                    sinc(x) * (0.42 + 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos())
                } else {
                    0.0
                }
            }
            Kernel::Gaussian { sigma, cutoff } => {
                if t < sigma * cutoff {
                    let norm = sigma * (2.0 * std::f64::consts::PI).sqrt();
                    (-x * x / (2.0 * sigma * sigma)).exp() / norm
                } else {
                    0.0
                }
            }
        }
    }
}

fn cubic_bc(t: f64, b: f64, c: f64) -> f64 {
    if t < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * t * t * t
            + (-18.0 + 12.0 * b + 6.0 * c) * t * t
            + (6.0 - 2.0 * b))
            / 6.0
    } else if t < 2.0 {
        ((-b - 6.0 * c) * t * t * t
            + (6.0 * b + 30.0 * c) * t * t
            + (-12.0 * b - 48.0 * c) * t
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

fn sinc(x: f64) -> f64 {
    let arg = std::f64::consts::PI * x;
    if arg.abs() < 1e-12 {
        1.0
    } else {
        arg.sin() / arg
    }
}
