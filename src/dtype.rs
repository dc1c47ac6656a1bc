use num_traits::ToPrimitive;

use crate::error::GridError;

/// Runtime tag for the element type of an [`crate::NdArray`].
///
/// The set is closed: every signed/unsigned integer width up to 64 bits, both
/// IEEE float widths, and an opaque fixed-size `Block` that carries no numeric
/// interpretation. Numeric operations reject `Block` arrays with
/// [`GridError::UnsupportedType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Block { size: usize },
}

impl DType {
    /// Width of one element in bytes.
    pub const fn width(self) -> usize {
        match self {
            DType::Char | DType::UChar => 1,
            DType::Short | DType::UShort => 2,
            DType::Int | DType::UInt | DType::Float => 4,
            DType::Long | DType::ULong | DType::Double => 8,
            DType::Block { size } => size,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DType::Char => "char",
            DType::UChar => "uchar",
            DType::Short => "short",
            DType::UShort => "ushort",
            DType::Int => "int",
            DType::UInt => "uint",
            DType::Long => "long",
            DType::ULong => "ulong",
            DType::Float => "float",
            DType::Double => "double",
            DType::Block { .. } => "block",
        }
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            DType::Char
                | DType::UChar
                | DType::Short
                | DType::UShort
                | DType::Int
                | DType::UInt
                | DType::Long
                | DType::ULong
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, DType::Float | DType::Double)
    }

    pub const fn is_block(self) -> bool {
        matches!(self, DType::Block { .. })
    }

    /// Full representable range as doubles, `None` for float and block types.
    ///
    /// This backs the blind 8-bit fast path of range inference; it is defined
    /// for every integer width so that callers need no width special-casing.
    pub fn representable_range(self) -> Option<(f64, f64)> {
        match self {
            DType::Char => Some((f64::from(i8::MIN), f64::from(i8::MAX))),
            DType::UChar => Some((0.0, f64::from(u8::MAX))),
            DType::Short => Some((f64::from(i16::MIN), f64::from(i16::MAX))),
            DType::UShort => Some((0.0, f64::from(u16::MAX))),
            DType::Int => Some((f64::from(i32::MIN), f64::from(i32::MAX))),
            DType::UInt => Some((0.0, f64::from(u32::MAX))),
            DType::Long => Some((i64::MIN as f64, i64::MAX as f64)),
            DType::ULong => Some((0.0, u64::MAX as f64)),
            DType::Float | DType::Double | DType::Block { .. } => None,
        }
    }
}

/// One supported element type: byte-level access into an array buffer plus
/// value conversion to and from `f64`.
///
/// `read`/`write` use fixed-size byte chunks so the backing buffer needs no
/// alignment guarantee. `from_f64` on integer types rounds to nearest and
/// saturates at the representable range; NaN converts to 0.
pub trait Scalar: Copy + Send + Sync + 'static + ToPrimitive {
    const DTYPE: DType;
    const WIDTH: usize;

    fn read(bytes: &[u8], idx: usize) -> Self;
    fn write(self, bytes: &mut [u8], idx: usize);
    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64 {
        ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
    }
}

macro_rules! impl_scalar {
    ($ty:ty, $dtype:expr, |$value:ident| $conv:expr) => {
        impl Scalar for $ty {
            const DTYPE: DType = $dtype;
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn read(bytes: &[u8], idx: usize) -> Self {
                let offset = idx * Self::WIDTH;
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[offset..offset + Self::WIDTH]);
                <$ty>::from_ne_bytes(raw)
            }

            fn write(self, bytes: &mut [u8], idx: usize) {
                let offset = idx * Self::WIDTH;
                bytes[offset..offset + Self::WIDTH].copy_from_slice(&self.to_ne_bytes());
            }

            fn from_f64($value: f64) -> Self {
                $conv
            }
        }
    };
}

// Rust float-to-int `as` casts saturate and map NaN to zero, which combined
// with `round()` gives round-to-nearest with saturation for integer targets.
impl_scalar!(i8, DType::Char, |v| v.round() as i8);
impl_scalar!(u8, DType::UChar, |v| v.round() as u8);
impl_scalar!(i16, DType::Short, |v| v.round() as i16);
impl_scalar!(u16, DType::UShort, |v| v.round() as u16);
impl_scalar!(i32, DType::Int, |v| v.round() as i32);
impl_scalar!(u32, DType::UInt, |v| v.round() as u32);
impl_scalar!(i64, DType::Long, |v| v.round() as i64);
impl_scalar!(u64, DType::ULong, |v| v.round() as u64);
impl_scalar!(f32, DType::Float, |v| v as f32);
impl_scalar!(f64, DType::Double, |v| v);

/// Dispatches `$dtype` to a monomorphic body with `$t` bound to the concrete
/// scalar type, evaluating `$fallback` for the opaque block type. Selection
/// happens once per call site, so hot loops inside `$body` stay branch-free.
macro_rules! with_scalar {
    ($dtype:expr, $t:ident => $body:expr, $fallback:expr $(,)?) => {
        match $dtype {
            $crate::dtype::DType::Char => {
                type $t = i8;
                $body
            }
            $crate::dtype::DType::UChar => {
                type $t = u8;
                $body
            }
            $crate::dtype::DType::Short => {
                type $t = i16;
                $body
            }
            $crate::dtype::DType::UShort => {
                type $t = u16;
                $body
            }
            $crate::dtype::DType::Int => {
                type $t = i32;
                $body
            }
            $crate::dtype::DType::UInt => {
                type $t = u32;
                $body
            }
            $crate::dtype::DType::Long => {
                type $t = i64;
                $body
            }
            $crate::dtype::DType::ULong => {
                type $t = u64;
                $body
            }
            $crate::dtype::DType::Float => {
                type $t = f32;
                $body
            }
            $crate::dtype::DType::Double => {
                type $t = f64;
                $body
            }
            $crate::dtype::DType::Block { .. } => $fallback,
        }
    };
}

pub(crate) use with_scalar;

/// Reads one element as `f64` from a raw buffer.
pub(crate) type ReadFn = fn(&[u8], usize) -> f64;

fn read_as<T: Scalar>(bytes: &[u8], idx: usize) -> f64 {
    // Qualified: `ToPrimitive` is in scope here and also names a `to_f64`.
    Scalar::to_f64(T::read(bytes, idx))
}

/// Resolves the read-as-double accessor for `dtype` once, for reuse inside
/// per-element loops. Block types have no numeric value.
pub(crate) fn reader_for(dtype: DType, operation: &'static str) -> Result<ReadFn, GridError> {
    with_scalar!(
        dtype,
        T => Ok(read_as::<T> as ReadFn),
        Err(GridError::UnsupportedType { operation, dtype }),
    )
}
