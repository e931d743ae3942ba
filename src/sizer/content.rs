//! Content costing of static field data.
//!
//! Static fields carry data in the module beyond their metadata row: constant blobs, field RVA
//! data for array initializers, string literals. [`content_size`] estimates those bytes from
//! the declared [`ValueShape`] and, for variable-length shapes, the stored [`FieldValue`].
//!
//! The recursion only ever descends into an array's element shape or an enum's underlying
//! shape, both strictly smaller than the input, so it always terminates.

use crate::metadata::value::{FieldValue, ValueShape};

/// Estimates the bytes of data a value of `shape` occupies.
///
/// - empty or missing arrays cost 0; arrays of fixed-layout elements cost
///   `count * element size`; arrays of strings or arrays cost the sum of their elements;
///   arrays of anything else cost 0
/// - strings cost two bytes per UTF-16 code unit, null strings cost 0
/// - enums cost as their underlying type
/// - fixed-layout values cost their marshalled size
/// - unmeasurable shapes cost 0
///
/// # Examples
///
/// ```rust
/// use dotsizer::metadata::value::{FieldValue, Primitive, ValueShape};
/// use dotsizer::sizer::content::content_size;
///
/// let ints = ValueShape::array(Primitive::I4.into());
/// let value = FieldValue::Array(vec![FieldValue::Scalar; 10]);
/// assert_eq!(content_size(&ints, Some(&value)), 40);
///
/// assert_eq!(content_size(&ValueShape::String, Some(&FieldValue::string("hello"))), 10);
/// ```
#[must_use]
pub fn content_size(shape: &ValueShape, value: Option<&FieldValue>) -> u64 {
    match shape {
        ValueShape::ArrayOf(element) => array_size(element, value),
        ValueShape::String => string_size(value),
        ValueShape::Enum(underlying) => content_size(underlying, value),
        ValueShape::FixedLayout(size) => u64::from(*size),
        ValueShape::Unmeasurable => 0,
    }
}

fn array_size(element: &ValueShape, value: Option<&FieldValue>) -> u64 {
    let Some(FieldValue::Array(items)) = value else {
        return 0;
    };
    if items.is_empty() {
        return 0;
    }

    let element = element.unwrap_enum();
    match element {
        ValueShape::FixedLayout(size) => items.len() as u64 * u64::from(*size),
        ValueShape::String | ValueShape::ArrayOf(_) => items
            .iter()
            .map(|item| content_size(element, Some(item)))
            .sum(),
        ValueShape::Enum(_) | ValueShape::Unmeasurable => 0,
    }
}

fn string_size(value: Option<&FieldValue>) -> u64 {
    match value {
        Some(FieldValue::String(text)) => text.len() as u64 * 2,
        _ => 0,
    }
}
