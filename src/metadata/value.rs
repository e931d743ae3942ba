//! Declared value shapes and runtime values of fields.
//!
//! The content costing in [`crate::sizer::content`] needs two pieces of information about a
//! static field: what its declared type looks like from a layout point of view
//! ([`ValueShape`]) and, for variable-length data, the value stored in the module
//! ([`FieldValue`]). Metadata providers translate their own type system into these two types.
//!
//! # Examples
//!
//! ```rust
//! use dotsizer::metadata::value::{Primitive, ValueShape};
//!
//! // int[]
//! let shape = ValueShape::array(Primitive::I4.into());
//! assert_eq!(shape.element().and_then(ValueShape::fixed_size), Some(4));
//!
//! // enum Color : byte
//! let color = ValueShape::enumeration(Primitive::U1.into());
//! assert_eq!(color.fixed_size(), Some(1));
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use widestring::U16String;

/// Built-in value types with a fixed marshalled size.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    /// `System.Boolean`, marshalled as a 4-byte `BOOL`
    Boolean,
    /// `System.Char`, marshalled as a single ANSI byte
    Char,
    /// `System.SByte`
    I1,
    /// `System.Byte`
    U1,
    /// `System.Int16`
    I2,
    /// `System.UInt16`
    U2,
    /// `System.Int32`
    I4,
    /// `System.UInt32`
    U4,
    /// `System.Int64`
    I8,
    /// `System.UInt64`
    U8,
    /// `System.Single`
    R4,
    /// `System.Double`
    R8,
    /// `System.IntPtr`
    I,
    /// `System.UIntPtr`
    U,
    /// `System.Decimal`
    Decimal,
    /// Unmanaged pointer
    Ptr,
}

impl Primitive {
    /// Returns the marshalled size of the primitive in bytes.
    ///
    /// Native-sized integers and pointers use the pointer width of the analyzing host.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn marshalled_size(self) -> u32 {
        match self {
            Primitive::Char | Primitive::I1 | Primitive::U1 => 1,
            Primitive::I2 | Primitive::U2 => 2,
            Primitive::Boolean | Primitive::I4 | Primitive::U4 | Primitive::R4 => 4,
            Primitive::I8 | Primitive::U8 | Primitive::R8 => 8,
            Primitive::Decimal => 16,
            Primitive::I | Primitive::U | Primitive::Ptr => std::mem::size_of::<usize>() as u32,
        }
    }
}

/// Layout view of a declared field type.
///
/// Only array element and enum underlying shapes nest, so every recursive walk over a
/// `ValueShape` terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueShape {
    /// A value type with a fixed marshalled size in bytes
    FixedLayout(u32),
    /// `System.String`
    String,
    /// A single-dimensional array of the contained element shape
    ArrayOf(Box<ValueShape>),
    /// An enum, described by its underlying integer shape
    Enum(Box<ValueShape>),
    /// Open generics, reference types without fixed layout, or anything else whose size
    /// cannot be derived from metadata alone
    Unmeasurable,
}

impl ValueShape {
    /// Creates an array shape over `element`.
    #[must_use]
    pub fn array(element: ValueShape) -> Self {
        ValueShape::ArrayOf(Box::new(element))
    }

    /// Creates an enum shape with the given underlying shape.
    #[must_use]
    pub fn enumeration(underlying: ValueShape) -> Self {
        ValueShape::Enum(Box::new(underlying))
    }

    /// Strips any number of enum wrappers and returns the underlying shape.
    #[must_use]
    pub fn unwrap_enum(&self) -> &ValueShape {
        let mut shape = self;
        while let ValueShape::Enum(underlying) = shape {
            shape = underlying;
        }
        shape
    }

    /// Returns the array element shape, or `None` if this is not an array.
    #[must_use]
    pub fn element(&self) -> Option<&ValueShape> {
        match self {
            ValueShape::ArrayOf(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the fixed marshalled size, looking through enums.
    #[must_use]
    pub fn fixed_size(&self) -> Option<u32> {
        match self.unwrap_enum() {
            ValueShape::FixedLayout(size) => Some(*size),
            _ => None,
        }
    }

    /// Returns true for shapes whose size depends on the stored value (strings and arrays).
    #[must_use]
    pub fn is_variable_length(&self) -> bool {
        matches!(self.unwrap_enum(), ValueShape::String | ValueShape::ArrayOf(_))
    }
}

impl From<Primitive> for ValueShape {
    fn from(primitive: Primitive) -> Self {
        ValueShape::FixedLayout(primitive.marshalled_size())
    }
}

/// A value stored in the module for a static field.
///
/// Fixed-layout values carry no payload because their cost is taken from the declared shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A null reference
    Null,
    /// Any fixed-layout value
    Scalar,
    /// A string, stored as UTF-16 like the runtime does
    String(U16String),
    /// An array of values
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Creates a string value from UTF-8 text.
    #[must_use]
    pub fn string(text: &str) -> Self {
        FieldValue::String(U16String::from_str(text))
    }

    /// Returns the number of array elements, or `None` if this is not an array.
    #[must_use]
    pub fn array_len(&self) -> Option<usize> {
        match self {
            FieldValue::Array(items) => Some(items.len()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_primitive_sizes() {
        assert_eq!(Primitive::Boolean.marshalled_size(), 4);
        assert_eq!(Primitive::Char.marshalled_size(), 1);
        assert_eq!(Primitive::U2.marshalled_size(), 2);
        assert_eq!(Primitive::R8.marshalled_size(), 8);
        assert_eq!(Primitive::Decimal.marshalled_size(), 16);

        for primitive in Primitive::iter() {
            assert!(primitive.marshalled_size() > 0, "{primitive} has no size");
        }
    }

    #[test]
    fn test_primitive_names() {
        assert_eq!(Primitive::from_str("i4").unwrap(), Primitive::I4);
        assert_eq!(Primitive::Decimal.to_string(), "decimal");
        assert!(Primitive::from_str("object").is_err());
    }

    #[test]
    fn test_shape_enum_unwrap() {
        let nested = ValueShape::enumeration(ValueShape::enumeration(Primitive::I2.into()));
        assert_eq!(nested.unwrap_enum(), &ValueShape::FixedLayout(2));
        assert_eq!(nested.fixed_size(), Some(2));
        assert!(!nested.is_variable_length());
    }

    #[test]
    fn test_shape_variable_length() {
        assert!(ValueShape::String.is_variable_length());
        assert!(ValueShape::array(Primitive::U1.into()).is_variable_length());
        assert!(!ValueShape::Unmeasurable.is_variable_length());
        assert_eq!(ValueShape::String.fixed_size(), None);
    }

    #[test]
    fn test_field_value_string_is_utf16() {
        let FieldValue::String(text) = FieldValue::string("h\u{e9}llo\u{1F600}") else {
            panic!("Expected String");
        };
        // the emoji needs a surrogate pair
        assert_eq!(text.len(), 7);
    }
}
