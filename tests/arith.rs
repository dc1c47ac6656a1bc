use gridops::{
    apply_binary, apply_ternary, apply_unary, compute_range, BinaryOp, DType, GridError, NdArray,
    Operand, TernaryOp, UnaryOp,
};

#[test]
fn negate_1d_double_array() {
    let values = NdArray::from_vec(&[1.0f64, -2.0, 3.5], &[3]).unwrap();
    let out = apply_unary(UnaryOp::Negate, Operand::array(&values).unwrap(), None).unwrap();
    assert_eq!(out.dtype(), DType::Double);
    assert_eq!(out.values().unwrap(), vec![-1.0, 2.0, -3.5]);
}

#[test]
fn double_negation_is_identity() {
    let values = NdArray::from_vec(&[0.25f64, -7.0, 1e9, 0.0], &[2, 2]).unwrap();
    let once = apply_unary(UnaryOp::Negate, Operand::array(&values).unwrap(), None).unwrap();
    let twice = apply_unary(UnaryOp::Negate, Operand::array(&once).unwrap(), None).unwrap();
    assert_eq!(twice.shape(), values.shape());
    assert_eq!(twice.values().unwrap(), values.values().unwrap());
}

#[test]
fn clamp_array_between_constants() {
    let values = NdArray::from_vec(&[-1.0f64, 0.5, 2.0], &[3]).unwrap();
    let out = apply_ternary(
        TernaryOp::Clamp,
        Operand::constant(0.0),
        Operand::array(&values).unwrap(),
        Operand::constant(1.0),
        None,
    )
    .unwrap();
    assert_eq!(out.values().unwrap(), vec![0.0, 0.5, 1.0]);
}

#[test]
fn binary_add_of_two_arrays_is_commutative() {
    let a = NdArray::from_vec(&[1.0f64, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    let b = NdArray::from_vec(&[10.0f64, -20.0, 0.5, 4.0], &[2, 2]).unwrap();
    let ab = apply_binary(
        BinaryOp::Add,
        Operand::array(&a).unwrap(),
        Operand::array(&b).unwrap(),
        None,
    )
    .unwrap();
    let ba = apply_binary(
        BinaryOp::Add,
        Operand::array(&b).unwrap(),
        Operand::array(&a).unwrap(),
        None,
    )
    .unwrap();
    assert_eq!(ab.shape(), a.shape());
    assert_eq!(ab.values().unwrap(), ba.values().unwrap());
}

#[test]
fn comparisons_yield_zero_one_masks() {
    let a = NdArray::from_vec(&[1.0f64, 5.0, 3.0], &[3]).unwrap();
    let out = apply_binary(
        BinaryOp::Gt,
        Operand::array(&a).unwrap(),
        Operand::constant(2.5),
        None,
    )
    .unwrap();
    assert_eq!(out.values().unwrap(), vec![0.0, 1.0, 1.0]);
}

#[test]
fn exists_fallback_replaces_non_existent_values() {
    let a = NdArray::from_vec(&[1.0f64, f64::NAN, f64::INFINITY], &[3]).unwrap();
    let out = apply_binary(
        BinaryOp::Exists,
        Operand::array(&a).unwrap(),
        Operand::constant(-1.0),
        None,
    )
    .unwrap();
    assert_eq!(out.values().unwrap(), vec![1.0, -1.0, -1.0]);
}

#[test]
fn exists_mask_over_integer_arrays_is_all_ones() {
    let a = NdArray::from_vec(&[0i32, -5, 1_000_000], &[3]).unwrap();
    let out = apply_unary(UnaryOp::Exists, Operand::array(&a).unwrap(), None).unwrap();
    assert_eq!(out.values().unwrap(), vec![1.0, 1.0, 1.0]);
}

#[test]
fn lerp_between_two_arrays_by_constant_weight() {
    let a = NdArray::from_vec(&[0.0f64, 10.0], &[2]).unwrap();
    let b = NdArray::from_vec(&[100.0f64, 20.0], &[2]).unwrap();
    let out = apply_ternary(
        TernaryOp::Lerp,
        Operand::constant(0.5),
        Operand::array(&a).unwrap(),
        Operand::array(&b).unwrap(),
        None,
    )
    .unwrap();
    assert_eq!(out.values().unwrap(), vec![50.0, 15.0]);
}

#[test]
fn integer_results_round_and_saturate_on_write() {
    let a = NdArray::from_vec(&[100u8, 200, 250], &[3]).unwrap();
    let out = apply_binary(
        BinaryOp::Add,
        Operand::array(&a).unwrap(),
        Operand::constant(10.4),
        None,
    )
    .unwrap();
    assert_eq!(out.dtype(), DType::UChar);
    assert_eq!(out.values().unwrap(), vec![110.0, 210.0, 255.0]);
}

#[test]
fn mismatched_shapes_are_rejected_before_allocation() {
    let a = NdArray::from_vec(&[1.0f64; 6], &[2, 3]).unwrap();
    let b = NdArray::from_vec(&[1.0f64; 6], &[3, 2]).unwrap();
    let err = apply_binary(
        BinaryOp::Multiply,
        Operand::array(&a).unwrap(),
        Operand::array(&b).unwrap(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, GridError::ShapeMismatch { .. }));
}

#[test]
fn constants_alone_cannot_define_a_shape() {
    let err = apply_ternary(
        TernaryOp::Add,
        Operand::constant(1.0),
        Operand::constant(2.0),
        Operand::constant(3.0),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, GridError::InvalidOperatorArity { .. }));
}

#[test]
fn blind_8bit_range_ignores_data_contents() {
    let a = NdArray::from_vec(&[42u8, 42, 42], &[3]).unwrap();
    let range = compute_range(&a, true).unwrap();
    assert_eq!((range.min, range.max), (0.0, 255.0));
    assert!(!range.has_non_existent);

    let scanned = compute_range(&a, false).unwrap();
    assert_eq!((scanned.min, scanned.max), (42.0, 42.0));
}

#[test]
fn range_feeds_clamp_for_rescaling() {
    // Typical quantization prelude: clamp everything into the scanned range.
    let a = NdArray::from_vec(&[3.0f64, f64::NAN, -2.0, 8.0], &[4]).unwrap();
    let range = compute_range(&a, false).unwrap();
    assert!(range.has_non_existent);
    let out = apply_ternary(
        TernaryOp::Clamp,
        Operand::constant(range.min),
        Operand::array(&a).unwrap(),
        Operand::constant(range.max),
        None,
    )
    .unwrap();
    assert_eq!(out.values().unwrap()[0], 3.0);
    assert_eq!(out.values().unwrap()[2], -2.0);
}

#[test]
fn block_arrays_never_feed_arithmetic() {
    let block = NdArray::new(DType::Block { size: 16 }, &[4]).unwrap();
    assert!(Operand::array(&block).is_err());
}
