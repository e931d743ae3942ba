//! The read-only metadata contract consumed by the sizer.
//!
//! Any binary metadata reader can feed the size analysis by implementing the four traits in
//! this module. The contract is capability based: every accessor that a real reader may fail to
//! answer for an individual element returns a [`Result`], and the walker treats a failed
//! accessor as a zero-cost term instead of aborting.
//!
//! # Key Types
//!
//! - [`ModuleMetadata`] - A loaded module: global members, types, resources
//! - [`TypeMetadata`] - A resolved type definition and its members
//! - [`MethodMetadata`] - A method or constructor
//! - [`FieldMetadata`] - A field, with its declared shape and stored value
//! - [`MethodBody`], [`Parameter`], [`NamedMember`] - Plain data returned by accessors
//!
//! # Errors
//!
//! Accessors report missing data with [`crate::Error::Unavailable`]; optional capabilities
//! that a provider does not implement report [`crate::Error::NotSupported`].

use serde::Deserialize;

use crate::{
    metadata::{
        resources::{ManifestResource, NativeResource},
        value::{FieldValue, ValueShape},
    },
    Error, Result,
};

/// The parts of a method body that contribute to its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MethodBody {
    /// Length of the instruction stream in bytes
    pub code_size: usize,
    /// Number of declared local variables
    pub local_count: usize,
}

/// A method parameter. Return-value parameters and compiler-generated parameters may be
/// anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct Parameter {
    /// Parameter name, if the module records one
    pub name: Option<String>,
}

/// A property or event, which the sizer only needs by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct NamedMember {
    /// Member name, if the module records one
    pub name: Option<String>,
}

impl NamedMember {
    /// Creates a named member.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        NamedMember {
            name: Some(name.into()),
        }
    }

    /// Length of the name in UTF-16 code units, 0 for anonymous members.
    #[must_use]
    pub fn name_len(&self) -> usize {
        self.name.as_deref().map_or(0, name_length)
    }
}

/// Length of a metadata name in UTF-16 code units, the unit names are counted in by the runtime.
#[must_use]
pub fn name_length(name: &str) -> usize {
    name.encode_utf16().count()
}

/// A method or constructor.
pub trait MethodMetadata {
    /// Method name, e.g. `.ctor` or `ToString`.
    fn name(&self) -> &str;

    /// Returns the method body, or `None` for methods without one (abstract, extern, runtime
    /// implemented).
    ///
    /// # Errors
    /// Returns an error if the body exists but cannot be read.
    fn body(&self) -> Result<Option<MethodBody>>;

    /// Returns the declared parameters.
    ///
    /// # Errors
    /// Returns an error if the signature or parameter rows cannot be resolved.
    fn parameters(&self) -> Result<Vec<Parameter>>;

    /// Returns the number of custom attributes applied to the method.
    ///
    /// # Errors
    /// Returns an error if the attribute records cannot be enumerated.
    fn custom_attribute_count(&self) -> Result<usize>;
}

/// A field declared on a type or at module level.
pub trait FieldMetadata {
    /// Field name.
    fn name(&self) -> &str;

    /// Returns true for static fields.
    fn is_static(&self) -> bool;

    /// Returns the layout view of the declared field type.
    ///
    /// # Errors
    /// Returns an error if the field signature cannot be resolved.
    fn shape(&self) -> Result<ValueShape>;

    /// Returns the constant or initial value stored in the module, if any.
    ///
    /// # Errors
    /// Returns an error if the value exists but cannot be read.
    fn value(&self) -> Result<Option<FieldValue>>;
}

/// A resolved type definition.
pub trait TypeMetadata {
    /// Method type used for constructors and methods.
    type Method: MethodMetadata;
    /// Field type.
    type Field: FieldMetadata;

    /// Full name with namespace and nesting, e.g. `Contoso.Data.Reader+Cursor`.
    fn full_name(&self) -> &str;

    /// Returns the number of implemented interfaces.
    ///
    /// # Errors
    /// Returns an error if the interface list cannot be resolved.
    fn interface_count(&self) -> Result<usize>;

    /// Returns the number of custom attributes applied to the type.
    ///
    /// # Errors
    /// Returns an error if the attribute records cannot be enumerated.
    fn custom_attribute_count(&self) -> Result<usize>;

    /// Declared fields, static and instance.
    fn fields(&self) -> &[Self::Field];

    /// Declared properties.
    fn properties(&self) -> &[NamedMember];

    /// Declared events.
    fn events(&self) -> &[NamedMember];

    /// Declared constructors, static and instance.
    fn constructors(&self) -> &[Self::Method];

    /// Declared methods, excluding constructors.
    fn methods(&self) -> &[Self::Method];
}

/// A loaded module, the unit of size analysis.
pub trait ModuleMetadata {
    /// Method type shared by global methods and type members.
    type Method: MethodMetadata;
    /// Field type shared by global fields and type members.
    type Field: FieldMetadata;
    /// Type definition type.
    type Type: TypeMetadata<Method = Self::Method, Field = Self::Field>;

    /// Simple name of the assembly, used as the root label.
    fn name(&self) -> &str;

    /// File name of the module, e.g. `MyApp.dll`.
    fn file_name(&self) -> &str;

    /// Methods declared at module level.
    fn global_methods(&self) -> &[Self::Method];

    /// Fields declared at module level.
    fn global_fields(&self) -> &[Self::Field];

    /// Type definitions that could be resolved.
    fn types(&self) -> &[Self::Type];

    /// Number of type definitions that could not be resolved, 0 if enumeration was complete.
    fn unresolved_type_count(&self) -> usize {
        0
    }

    /// Resources listed in the module manifest.
    fn manifest_resources(&self) -> &[ManifestResource];

    /// Entries of the native resource directory.
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] by default; providers that can read the resource
    /// directory override this.
    fn native_resources(&self) -> Result<Vec<NativeResource>> {
        Err(Error::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_member_len() {
        assert_eq!(NamedMember::new("Count").name_len(), 5);
        assert_eq!(NamedMember::default().name_len(), 0);
        assert_eq!(NamedMember::new("Größe").name_len(), 5);
    }
}
