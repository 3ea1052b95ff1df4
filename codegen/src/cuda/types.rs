//! CUDA C type mapping.

use polygen_ir::ScalarType;

use crate::error::{Result, UnsupportedAttributeSnafu};

/// CUDA C spelling of a scalar type.
pub fn c_scalar(s: ScalarType) -> &'static str {
    match s {
        ScalarType::F16 => "half_t",
        ScalarType::F32 => "float",
        ScalarType::F64 => "double",
        ScalarType::Int | ScalarType::Index => "int",
    }
}

/// Native vector type used for a wide fetch of `lanes` elements.
///
/// The fetch width is expressed in 32-bit words: `lanes` f16 elements
/// load as `float{lanes/2}`, f32 as `float{lanes}`, f64 as
/// `float{lanes*2}`. Non-float elements have no wide-fetch form.
pub fn vector_fetch_type(element: ScalarType, lanes: u32) -> Result<String> {
    if !element.is_float() {
        return UnsupportedAttributeSnafu {
            what: format!("vectorized access over {element:?} elements"),
        }
        .fail();
    }
    let total_words = lanes * element.bit_width() / 32;
    Ok(format!("float{total_words}"))
}
