use crate::types::ScalarType;

#[test]
fn bit_widths_match_the_scalar_sizes() {
    assert_eq!(ScalarType::F16.bit_width(), 16);
    assert_eq!(ScalarType::F32.bit_width(), 32);
    assert_eq!(ScalarType::F64.bit_width(), 64);
    assert_eq!(ScalarType::Int.bit_width(), 32);
    assert_eq!(ScalarType::Index.bit_width(), 32);
}

#[test]
fn only_the_float_types_are_floats() {
    assert!(ScalarType::F16.is_float());
    assert!(ScalarType::F32.is_float());
    assert!(ScalarType::F64.is_float());
    assert!(!ScalarType::Int.is_float());
    assert!(!ScalarType::Index.is_float());
}
