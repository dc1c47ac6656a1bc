use num_traits::clamp;

/// Elementwise ternary operators over operands `(x, y, z)`.
///
/// `Clamp` restricts `y` to `[x, z]`; `Lerp` interpolates from `y` to `z` by
/// weight `x`; the range-membership tests report 0/1 for `y` against the
/// interval `(x, z)` or `[x, z]`. All three apply floating semantics
/// regardless of the operands' integer origins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TernaryOp {
    Add,
    Multiply,
    Min,
    Max,
    Clamp,
    IfElse,
    Lerp,
    InOpen,
    InClosed,
}

impl TernaryOp {
    pub const fn label(self) -> &'static str {
        match self {
            TernaryOp::Add => "+",
            TernaryOp::Multiply => "x",
            TernaryOp::Min => "min",
            TernaryOp::Max => "max",
            TernaryOp::Clamp => "clamp",
            TernaryOp::IfElse => "ifelse",
            TernaryOp::Lerp => "lerp",
            TernaryOp::InOpen => "in_op",
            TernaryOp::InClosed => "in_cl",
        }
    }

    pub fn eval(self, x: f64, y: f64, z: f64) -> f64 {
        match self {
            TernaryOp::Add => x + y + z,
            TernaryOp::Multiply => x * y * z,
            TernaryOp::Min => x.min(y).min(z),
            TernaryOp::Max => x.max(y).max(z),
            TernaryOp::Clamp => clamp(y, x, z),
            TernaryOp::IfElse => {
                if x != 0.0 {
                    y
                } else {
                    z
                }
            }
            TernaryOp::Lerp => y + x * (z - y),
            TernaryOp::InOpen => {
                if x < y && y < z {
                    1.0
                } else {
                    0.0
                }
            }
            TernaryOp::InClosed => {
                if x <= y && y <= z {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}
