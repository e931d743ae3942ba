//! Shared fixtures for unit tests.

use crate::metadata::{
    provider::Parameter,
    resources::{NativeResource, NativeResourceName},
    snapshot::{
        BodySnapshot, CompositeDescriptor, FieldSnapshot, MethodSnapshot, ModuleSnapshot,
        SnapshotValue, TypeDescriptor, TypeSnapshot,
    },
};

// Helper function to create a method with a body and no parameters
pub fn create_method(name: &str, code_size: usize, locals: usize) -> MethodSnapshot {
    MethodSnapshot {
        name: name.to_string(),
        body: Some(BodySnapshot { code_size, locals }),
        ..MethodSnapshot::default()
    }
}

// Helper function to create a parameter
pub fn create_parameter(name: Option<&str>) -> Parameter {
    Parameter {
        name: name.map(str::to_string),
    }
}

// Helper function to create an `i4` field
pub fn create_scalar_field(name: &str, is_static: bool) -> FieldSnapshot {
    FieldSnapshot {
        name: name.to_string(),
        is_static,
        descriptor: Some(TypeDescriptor::Named("i4".to_string())),
        ..FieldSnapshot::default()
    }
}

// Helper function to create a static `i4[]` field initialized with `values`
pub fn create_array_field(name: &str, values: &[f64]) -> FieldSnapshot {
    FieldSnapshot {
        name: name.to_string(),
        is_static: true,
        descriptor: Some(TypeDescriptor::Composite(CompositeDescriptor::Array(
            Box::new(TypeDescriptor::Named("i4".to_string())),
        ))),
        value: Some(SnapshotValue::List(
            values.iter().copied().map(SnapshotValue::Number).collect(),
        )),
        ..FieldSnapshot::default()
    }
}

// Helper function to create a static string field
pub fn create_string_field(name: &str, value: Option<&str>) -> FieldSnapshot {
    FieldSnapshot {
        name: name.to_string(),
        is_static: true,
        descriptor: Some(TypeDescriptor::Named("string".to_string())),
        value: Some(value.map_or(SnapshotValue::Null, |text| {
            SnapshotValue::Text(text.to_string())
        })),
        ..FieldSnapshot::default()
    }
}

// Helper function to create an empty type
pub fn create_type(full_name: &str) -> TypeSnapshot {
    TypeSnapshot {
        name: full_name.to_string(),
        ..TypeSnapshot::default()
    }
}

// Helper function to create a module without resources
pub fn create_module(name: &str, types: Vec<TypeSnapshot>) -> ModuleSnapshot {
    ModuleSnapshot {
        name: name.to_string(),
        types,
        ..ModuleSnapshot::default()
    }
}

// Helper function to create a native resource, named if `name` is given, else by `id`
pub fn create_native_resource(
    type_id: u32,
    name: Option<&str>,
    id: u32,
    size: u64,
) -> NativeResource {
    NativeResource {
        type_id,
        name: name.map_or(NativeResourceName::Id(id), |name| {
            NativeResourceName::Named(name.to_string())
        }),
        size,
    }
}
