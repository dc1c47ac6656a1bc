use crate::axis::{Axis, MAX_DIM};
use crate::dtype::{with_scalar, DType, Scalar};
use crate::error::{GridError, Result};

/// The core entity: an N-dimensional array of homogeneous elements plus
/// per-axis metadata, owning one contiguous byte buffer.
///
/// The buffer length always equals `element count * dtype.width()`. Linear
/// element order is fastest-axis-first: axis 0 varies fastest, so the stride
/// of axis `k` is the product of the sizes of axes `0..k`.
///
/// Operations that change shape or element type always allocate a fresh
/// handle; in-place mutation is limited to element values and metadata.
#[derive(Clone, Debug)]
pub struct NdArray {
    dtype: DType,
    axes: Vec<Axis>,
    data: Vec<u8>,
    content: Option<String>,
    key_values: Vec<(String, String)>,
}

impl NdArray {
    /// Allocates a zero-filled array of the given type and per-axis sizes.
    pub fn new(dtype: DType, sizes: &[usize]) -> Result<Self> {
        if sizes.is_empty() || sizes.len() > MAX_DIM {
            return Err(GridError::InvalidConfiguration {
                operation: "NdArray::new",
                reason: format!("dimension {} outside 1..={MAX_DIM}", sizes.len()),
            });
        }
        if dtype.width() == 0 {
            return Err(GridError::InvalidConfiguration {
                operation: "NdArray::new",
                reason: "block size must be non-zero".into(),
            });
        }
        let count: usize = sizes.iter().product();
        Ok(Self {
            dtype,
            axes: sizes.iter().map(|&size| Axis::new(size)).collect(),
            data: vec![0u8; count * dtype.width()],
            content: None,
            key_values: Vec::new(),
        })
    }

    /// Builds an array from typed values; `values.len()` must equal the
    /// product of `sizes`.
    pub fn from_vec<T: Scalar>(values: &[T], sizes: &[usize]) -> Result<Self> {
        let mut array = Self::new(T::DTYPE, sizes)?;
        if values.len() != array.len() {
            return Err(GridError::InvalidConfiguration {
                operation: "NdArray::from_vec",
                reason: format!(
                    "{} values for shape {:?} ({} elements)",
                    values.len(),
                    sizes,
                    array.len()
                ),
            });
        }
        for (idx, &value) in values.iter().enumerate() {
            value.write(&mut array.data, idx);
        }
        Ok(array)
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn dim(&self) -> usize {
        self.axes.len()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|axis| axis.size).collect()
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.axes.iter().map(|axis| axis.size).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut [Axis] {
        &mut self.axes
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    pub fn key_values(&self) -> &[(String, String)] {
        &self.key_values
    }

    pub fn add_key_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.key_values.push((key.into(), value.into()));
    }

    /// Reads the element at linear index `idx` as a double.
    pub fn value(&self, idx: usize) -> Result<f64> {
        with_scalar!(
            self.dtype,
            T => Ok(T::read(&self.data, idx).to_f64()),
            Err(GridError::UnsupportedType {
                operation: "NdArray::value",
                dtype: self.dtype,
            }),
        )
    }

    /// Writes a double to the element at linear index `idx`, rounding and
    /// saturating per the element type.
    pub fn set_value(&mut self, idx: usize, value: f64) -> Result<()> {
        with_scalar!(
            self.dtype,
            T => {
                T::from_f64(value).write(&mut self.data, idx);
                Ok(())
            },
            Err(GridError::UnsupportedType {
                operation: "NdArray::set_value",
                dtype: self.dtype,
            }),
        )
    }

    /// All element values as doubles, in linear order.
    pub fn values(&self) -> Result<Vec<f64>> {
        with_scalar!(
            self.dtype,
            T => Ok((0..self.len()).map(|idx| T::read(&self.data, idx).to_f64()).collect()),
            Err(GridError::UnsupportedType {
                operation: "NdArray::values",
                dtype: self.dtype,
            }),
        )
    }

    /// Value-converts every element to `dtype`, producing a fresh handle with
    /// the same shape and metadata. Block types cannot be converted.
    pub fn convert(&self, dtype: DType) -> Result<NdArray> {
        if self.dtype.is_block() || dtype.is_block() {
            return Err(GridError::ConversionFailure {
                from: self.dtype,
                to: dtype,
            });
        }
        let mut out = self.with_shape_of(dtype);
        with_scalar!(
            self.dtype,
            Src => with_scalar!(
                dtype,
                Dst => {
                    for idx in 0..self.len() {
                        Dst::from_f64(Src::read(&self.data, idx).to_f64()).write(&mut out.data, idx);
                    }
                },
                unreachable!("block ruled out above"),
            ),
            unreachable!("block ruled out above"),
        );
        Ok(out)
    }

    /// Fresh zero-filled array sharing this one's shape and axis metadata.
    pub(crate) fn with_shape_of(&self, dtype: DType) -> NdArray {
        NdArray {
            dtype,
            axes: self.axes.clone(),
            data: vec![0u8; self.len() * dtype.width()],
            content: None,
            key_values: Vec::new(),
        }
    }

    /// Fresh zero-filled array with pre-built axis metadata. The caller has
    /// already validated dimension and dtype.
    pub(crate) fn with_axes(dtype: DType, axes: Vec<Axis>) -> NdArray {
        let count: usize = axes.iter().map(|axis| axis.size).product();
        NdArray {
            dtype,
            axes,
            data: vec![0u8; count * dtype.width()],
            content: None,
            key_values: Vec::new(),
        }
    }

    /// Stride (in elements) of axis `k`: product of the sizes of faster axes.
    pub(crate) fn stride(&self, k: usize) -> usize {
        self.axes[..k].iter().map(|axis| axis.size).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Centering;

    #[test]
    fn buffer_length_matches_shape_and_width() {
        let array = NdArray::new(DType::Short, &[3, 4, 5]).unwrap();
        assert_eq!(array.len(), 60);
        assert_eq!(array.data().len(), 120);
    }

    #[test]
    fn block_arrays_carry_opaque_elements() {
        let array = NdArray::new(DType::Block { size: 24 }, &[7]).unwrap();
        assert_eq!(array.data().len(), 7 * 24);
        assert!(array.value(0).is_err());
    }

    #[test]
    fn zero_sized_block_is_rejected() {
        assert!(NdArray::new(DType::Block { size: 0 }, &[4]).is_err());
    }

    #[test]
    fn dimension_bounds_are_enforced() {
        assert!(NdArray::new(DType::Float, &[]).is_err());
        assert!(NdArray::new(DType::Float, &[1; MAX_DIM + 1]).is_err());
        assert!(NdArray::new(DType::Float, &[1; MAX_DIM]).is_ok());
    }

    #[test]
    fn from_vec_checks_element_count() {
        assert!(NdArray::from_vec(&[1.0f32, 2.0], &[3]).is_err());
        let array = NdArray::from_vec(&[1.0f32, 2.0, 3.0], &[3]).unwrap();
        assert_eq!(array.dtype(), DType::Float);
        assert_eq!(array.values().unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn set_value_saturates_integer_types() {
        let mut array = NdArray::from_vec(&[0u8, 0, 0], &[3]).unwrap();
        array.set_value(0, 300.0).unwrap();
        array.set_value(1, -4.0).unwrap();
        array.set_value(2, 7.5).unwrap();
        assert_eq!(array.values().unwrap(), vec![255.0, 0.0, 8.0]);
    }

    #[test]
    fn convert_preserves_shape_and_axis_metadata() {
        let mut array = NdArray::from_vec(&[1.5f64, -2.5, 100.0, 1000.0], &[2, 2]).unwrap();
        array.axes_mut()[0].spacing = 2.0;
        array.axes_mut()[1].center = Centering::Node;
        let out = array.convert(DType::UChar).unwrap();
        assert_eq!(out.shape(), vec![2, 2]);
        assert_eq!(out.values().unwrap(), vec![2.0, 0.0, 100.0, 255.0]);
        assert_eq!(out.axes()[0].spacing, 2.0);
        assert_eq!(out.axes()[1].center, Centering::Node);
    }

    #[test]
    fn convert_rejects_block() {
        let array = NdArray::new(DType::Block { size: 4 }, &[2]).unwrap();
        assert!(array.convert(DType::Float).is_err());
        let array = NdArray::new(DType::Float, &[2]).unwrap();
        assert!(array.convert(DType::Block { size: 4 }).is_err());
    }

    #[test]
    fn stride_is_fastest_axis_first() {
        let array = NdArray::new(DType::UChar, &[3, 4, 5]).unwrap();
        assert_eq!(array.stride(0), 1);
        assert_eq!(array.stride(1), 3);
        assert_eq!(array.stride(2), 12);
    }
}
