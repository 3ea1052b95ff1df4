//! Memory layout tests: strides, flat offsets, native arrays,
//! declarations, and vectorized access forms.

use polygen_ir::{AffineMap, MemorySpace, ScalarType, Type, Value};
use test_case::test_case;

use crate::context::SymbolTable;
use crate::cuda::memory::{access, declare, row_major_strides, vector_access};
use crate::cuda::types::vector_fetch_type;
use crate::error::Error;

fn named(ty: Type, name: &str, symbols: &mut SymbolTable) -> Value {
    let value = Value::new(ty);
    symbols.define(&value, name).unwrap();
    value
}

fn index_operands(names: &[&str], symbols: &mut SymbolTable) -> Vec<Value> {
    names.iter().map(|name| named(Type::Scalar(ScalarType::Index), name, symbols)).collect()
}

#[test_case(&[4, 3, 2], &[6, 2, 1])]
#[test_case(&[8], &[1])]
#[test_case(&[2, 5], &[5, 1])]
fn strides_are_row_major(shape: &[i64], expected: &[i64]) {
    assert_eq!(row_major_strides(shape), expected);
}

#[test]
fn global_access_renders_the_flat_offset() {
    let mut symbols = SymbolTable::default();
    let memref = named(Type::memref(ScalarType::F32, vec![4, 3, 2], MemorySpace::Global), "A", &mut symbols);
    let operands = index_operands(&["i", "j", "k"], &mut symbols);

    let rendered = access(&memref, &AffineMap::identity(3).exprs, &operands, &symbols).unwrap();
    assert_eq!(rendered, "A[i * 6 + j * 2 + k + 0]");
}

/// Symbolic check of the offset: the row-major stride map must send
/// every in-bounds index tuple to a distinct flat offset covering
/// exactly `0..volume`.
#[test]
fn row_major_offsets_are_a_bijection() {
    let shape = [4i64, 3, 2];
    let strides = row_major_strides(&shape);
    let mut seen = vec![false; 24];

    for i in 0..shape[0] {
        for j in 0..shape[1] {
            for k in 0..shape[2] {
                let flat = (i * strides[0] + j * strides[1] + k * strides[2]) as usize;
                assert!(!seen[flat], "offset {flat} hit twice");
                seen[flat] = true;
            }
        }
    }
    assert!(seen.into_iter().all(|hit| hit), "offsets must cover the volume");
}

#[test]
fn unit_stride_terms_carry_no_multiplier() {
    let mut symbols = SymbolTable::default();
    let memref = named(Type::memref(ScalarType::F32, vec![8], MemorySpace::Global), "in", &mut symbols);
    let operands = index_operands(&["threadIdx.x"], &mut symbols);

    let rendered = access(&memref, &AffineMap::identity(1).exprs, &operands, &symbols).unwrap();
    assert_eq!(rendered, "in[threadIdx.x + 0]");
}

#[test]
fn shared_access_renders_per_dimension_subscripts() {
    let mut symbols = SymbolTable::default();
    let memref = named(Type::memref(ScalarType::F32, vec![16, 16], MemorySpace::Shared), "tile", &mut symbols);
    let operands = index_operands(&["iter0", "iter1"], &mut symbols);

    let rendered = access(&memref, &AffineMap::identity(2).exprs, &operands, &symbols).unwrap();
    assert_eq!(rendered, "tile[iter0][iter1]");
}

#[test]
fn declarations_follow_the_memory_space() {
    let mut symbols = SymbolTable::default();
    let global = named(Type::memref(ScalarType::F32, vec![1024], MemorySpace::Global), "arg0", &mut symbols);
    let shared = named(Type::memref(ScalarType::F32, vec![16, 16], MemorySpace::Shared), "array0", &mut symbols);
    let local = named(Type::memref(ScalarType::F64, vec![8], MemorySpace::Local), "array1", &mut symbols);

    assert_eq!(declare(&global, &symbols).unwrap(), "float* arg0");
    assert_eq!(declare(&shared, &symbols).unwrap(), "__shared__ float array0[16][16]");
    assert_eq!(declare(&local, &symbols).unwrap(), "double array1[8]");
}

#[test_case(ScalarType::F32, 4, "float4"; "four floats")]
#[test_case(ScalarType::F16, 8, "float4"; "eight halves pack to four words")]
#[test_case(ScalarType::F64, 2, "float4"; "two doubles")]
#[test_case(ScalarType::F16, 2, "float1"; "two halves")]
fn vector_fetch_types_encode_total_words(element: ScalarType, lanes: u32, expected: &str) {
    assert_eq!(vector_fetch_type(element, lanes).unwrap(), expected);
}

#[test]
fn vector_fetch_over_integer_elements_is_rejected() {
    let err = vector_fetch_type(ScalarType::Int, 4).expect_err("no integer wide fetch");
    assert!(matches!(err, Error::UnsupportedAttribute { .. }), "got {err:?}");
}

#[test]
fn vector_access_reinterprets_the_scalar_address() {
    let mut symbols = SymbolTable::default();
    let memref = named(Type::memref(ScalarType::F32, vec![64], MemorySpace::Global), "arg0", &mut symbols);
    let operands = index_operands(&["threadIdx.x"], &mut symbols);

    let rendered = vector_access(&memref, &AffineMap::identity(1).exprs, &operands, 4, &symbols).unwrap();
    assert_eq!(rendered, "(reinterpret_cast<float4*>(&(arg0[threadIdx.x + 0]))[0])");
}
