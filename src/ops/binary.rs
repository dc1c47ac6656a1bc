/// Elementwise binary operators.
///
/// Comparisons produce 0/1. `If` selects the first operand where it is
/// non-zero, otherwise the second. `Exists` falls back to the second operand
/// where the first is NaN/±inf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Pow,
    Mod,
    Atan2,
    Min,
    Max,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    If,
    Exists,
}

impl BinaryOp {
    pub const fn label(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "x",
            BinaryOp::Divide => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Mod => "%",
            BinaryOp::Atan2 => "atan2",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::If => "if",
            BinaryOp::Exists => "exists",
        }
    }

    pub fn eval(self, x: f64, y: f64) -> f64 {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Subtract => x - y,
            BinaryOp::Multiply => x * y,
            BinaryOp::Divide => x / y,
            BinaryOp::Pow => x.powf(y),
            BinaryOp::Mod => x % y,
            BinaryOp::Atan2 => x.atan2(y),
            BinaryOp::Min => x.min(y),
            BinaryOp::Max => x.max(y),
            BinaryOp::Lt => bool_value(x < y),
            BinaryOp::Lte => bool_value(x <= y),
            BinaryOp::Gt => bool_value(x > y),
            BinaryOp::Gte => bool_value(x >= y),
            BinaryOp::Eq => bool_value(x == y),
            BinaryOp::Neq => bool_value(x != y),
            BinaryOp::If => {
                if x != 0.0 {
                    x
                } else {
                    y
                }
            }
            BinaryOp::Exists => {
                if x.is_finite() {
                    x
                } else {
                    y
                }
            }
        }
    }
}

fn bool_value(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_matches_ieee() {
        assert_eq!(BinaryOp::Add.eval(1.5, 2.5), 4.0);
        assert_eq!(BinaryOp::Pow.eval(2.0, 10.0), 1024.0);
        assert_eq!(BinaryOp::Mod.eval(7.5, 2.0), 1.5);
        assert!(BinaryOp::Divide.eval(1.0, 0.0).is_infinite());
    }

    #[test]
    fn comparisons_are_zero_one() {
        assert_eq!(BinaryOp::Lt.eval(1.0, 2.0), 1.0);
        assert_eq!(BinaryOp::Gte.eval(1.0, 2.0), 0.0);
        assert_eq!(BinaryOp::Eq.eval(f64::NAN, f64::NAN), 0.0);
    }

    #[test]
    fn if_selects_first_non_zero() {
        assert_eq!(BinaryOp::If.eval(3.0, 9.0), 3.0);
        assert_eq!(BinaryOp::If.eval(0.0, 9.0), 9.0);
    }

    #[test]
    fn exists_falls_back_on_non_existent() {
        assert_eq!(BinaryOp::Exists.eval(2.0, 5.0), 2.0);
        assert_eq!(BinaryOp::Exists.eval(f64::NAN, 5.0), 5.0);
        assert_eq!(BinaryOp::Exists.eval(f64::INFINITY, 5.0), 5.0);
    }
}
