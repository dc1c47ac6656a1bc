use crate::array::NdArray;
use crate::dtype::{reader_for, ReadFn};
use crate::error::Result;

/// One input operand of an elementwise operation: either a scalar constant
/// repeated at every position, or a whole array walked in linear order.
pub enum Operand<'a> {
    Constant(f64),
    Array(ArrayWalk<'a>),
}

/// Forward-only walk over an array's elements in increasing linear order.
///
/// The read accessor is resolved once at construction, so advancing the walk
/// is branch-free regardless of the array's element type.
pub struct ArrayWalk<'a> {
    array: &'a NdArray,
    read: ReadFn,
    cursor: usize,
}

impl<'a> Operand<'a> {
    pub fn constant(value: f64) -> Self {
        Operand::Constant(value)
    }

    /// Wraps an array operand. Fails for block-typed arrays, which have no
    /// numeric value.
    pub fn array(array: &'a NdArray) -> Result<Self> {
        let read = reader_for(array.dtype(), "Operand::array")?;
        Ok(Operand::Array(ArrayWalk {
            array,
            read,
            cursor: 0,
        }))
    }

    /// Produces the next operand value. Constants repeat forever; array walks
    /// advance their cursor by one element.
    pub fn next(&mut self) -> f64 {
        match self {
            Operand::Constant(value) => *value,
            Operand::Array(walk) => {
                let value = (walk.read)(walk.array.data(), walk.cursor);
                walk.cursor += 1;
                value
            }
        }
    }

    /// Random access variant of [`Operand::next`], used by parallel loops.
    /// Does not move the cursor.
    pub fn value_at(&self, idx: usize) -> f64 {
        match self {
            Operand::Constant(value) => *value,
            Operand::Array(walk) => (walk.read)(walk.array.data(), idx),
        }
    }

    /// The underlying array for the array-walk variant.
    pub fn as_array(&self) -> Option<&'a NdArray> {
        match self {
            Operand::Constant(_) => None,
            Operand::Array(walk) => Some(walk.array),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::Constant(_))
    }

    /// Short description used in content strings and diagnostics.
    pub(crate) fn describe(&self) -> String {
        match self {
            Operand::Constant(value) => format!("{value}"),
            Operand::Array(walk) => walk.array.content().unwrap_or("?").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    #[test]
    fn constant_repeats_forever() {
        let mut operand = Operand::constant(2.5);
        for _ in 0..5 {
            assert_eq!(operand.next(), 2.5);
        }
        assert_eq!(operand.value_at(1_000_000), 2.5);
    }

    #[test]
    fn array_walk_visits_linear_order() {
        let array = NdArray::from_vec(&[1i32, -2, 3], &[3]).unwrap();
        let mut operand = Operand::array(&array).unwrap();
        assert_eq!(operand.next(), 1.0);
        assert_eq!(operand.next(), -2.0);
        assert_eq!(operand.next(), 3.0);
    }

    #[test]
    fn value_at_does_not_advance_cursor() {
        let array = NdArray::from_vec(&[5.0f64, 6.0], &[2]).unwrap();
        let mut operand = Operand::array(&array).unwrap();
        assert_eq!(operand.value_at(1), 6.0);
        assert_eq!(operand.next(), 5.0);
    }

    #[test]
    fn block_arrays_are_rejected() {
        let array = NdArray::new(DType::Block { size: 8 }, &[2]).unwrap();
        assert!(Operand::array(&array).is_err());
    }
}
