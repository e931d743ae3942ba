//! A JSON snapshot of a module's metadata.
//!
//! [`ModuleSnapshot`] implements the provider contract over data that an external metadata
//! dumper wrote to disk, so the sizer can run without a PE parser in the same process. The
//! format mirrors the provider traits one to one:
//!
//! ```json
//! {
//!   "name": "Hello",
//!   "file_name": "Hello.dll",
//!   "file_size": 4096,
//!   "types": [
//!     {
//!       "name": "Hello.Program",
//!       "interfaces": 1,
//!       "attributes": 0,
//!       "fields": [
//!         { "name": "Greeting", "static": true, "type": "string", "value": "hi" },
//!         { "name": "Table", "static": true, "type": { "array": "i4" }, "value": [1, 2, 3] }
//!       ],
//!       "properties": ["Count"],
//!       "methods": [
//!         { "name": "Main", "body": { "code_size": 12, "locals": 1 }, "parameters": ["args"] }
//!       ]
//!     }
//!   ],
//!   "resources": [{ "name": "Hello.Strings.resources", "length": 240 }]
//! }
//! ```
//!
//! Field type descriptors are primitive names (`"i4"`, `"r8"`, `"boolean"`, ...), `"string"`,
//! `{"array": <descriptor>}`, `{"enum": <primitive>}` or `{"struct": <size>}`. Any other
//! name (`"object"`, `"generic"`, a class name) is treated as unmeasurable.
//!
//! Accessors that the dumper failed to read are listed per element in `unreadable`, e.g.
//! `"unreadable": ["body", "attributes"]`; the corresponding trait method then returns
//! [`crate::Error::Unavailable`].

use std::{fs, path::Path, path::PathBuf, str::FromStr};

use serde::{Deserialize, Deserializer};

use crate::{
    metadata::{
        provider::{
            FieldMetadata, MethodBody, MethodMetadata, ModuleMetadata, NamedMember, Parameter,
            TypeMetadata,
        },
        resources::{ManifestResource, NativeResource, NativeResourceName, ResourceLocation},
        value::{FieldValue, Primitive, ValueShape},
    },
    Error, Result,
};

/// Provider accessors that a dumper can mark as unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessor {
    /// Method body (instruction stream and locals)
    Body,
    /// Method parameters
    Parameters,
    /// Custom attributes of a type or method
    Attributes,
    /// Interfaces of a type
    Interfaces,
    /// Declared type of a field
    Type,
    /// Stored value of a field
    Value,
}

impl Accessor {
    fn name(self) -> &'static str {
        match self {
            Accessor::Body => "method body",
            Accessor::Parameters => "parameters",
            Accessor::Attributes => "custom attributes",
            Accessor::Interfaces => "interfaces",
            Accessor::Type => "field type",
            Accessor::Value => "field value",
        }
    }
}

fn readable(unreadable: &[Accessor], accessor: Accessor) -> Result<()> {
    if unreadable.contains(&accessor) {
        Err(Error::Unavailable(accessor.name()))
    } else {
        Ok(())
    }
}

/// Declared type of a field in snapshot form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeDescriptor {
    /// A primitive, `string`, or any other type name
    Named(String),
    /// Arrays, enums and fixed-size structs
    Composite(CompositeDescriptor),
}

/// Composite field type descriptors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeDescriptor {
    /// Single-dimensional array of the element descriptor
    Array(Box<TypeDescriptor>),
    /// Enum with the given underlying primitive
    Enum(Primitive),
    /// Value type with an explicit marshalled size
    Struct(u32),
}

impl TypeDescriptor {
    /// Converts the descriptor into the layout view used by the sizer.
    #[must_use]
    pub fn to_shape(&self) -> ValueShape {
        match self {
            TypeDescriptor::Named(name) if name == "string" => ValueShape::String,
            TypeDescriptor::Named(name) => match Primitive::from_str(name) {
                Ok(primitive) => primitive.into(),
                Err(_) => ValueShape::Unmeasurable,
            },
            TypeDescriptor::Composite(CompositeDescriptor::Array(element)) => {
                ValueShape::array(element.to_shape())
            }
            TypeDescriptor::Composite(CompositeDescriptor::Enum(underlying)) => {
                ValueShape::enumeration((*underlying).into())
            }
            TypeDescriptor::Composite(CompositeDescriptor::Struct(size)) => {
                ValueShape::FixedLayout(*size)
            }
        }
    }
}

/// A stored field value in snapshot form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    /// `null`
    Null,
    /// A boolean constant
    Bool(bool),
    /// A numeric constant
    Number(f64),
    /// A string constant
    Text(String),
    /// An array initializer
    List(Vec<SnapshotValue>),
}

impl From<&SnapshotValue> for FieldValue {
    fn from(value: &SnapshotValue) -> Self {
        match value {
            SnapshotValue::Null => FieldValue::Null,
            SnapshotValue::Bool(_) | SnapshotValue::Number(_) => FieldValue::Scalar,
            SnapshotValue::Text(text) => FieldValue::string(text),
            SnapshotValue::List(items) => {
                FieldValue::Array(items.iter().map(FieldValue::from).collect())
            }
        }
    }
}

/// Method body in snapshot form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct BodySnapshot {
    /// Instruction stream length in bytes
    #[serde(default)]
    pub code_size: usize,
    /// Number of local variables
    #[serde(default)]
    pub locals: usize,
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MethodSnapshot {
    /// Method name
    pub name: String,
    /// Method body; absent for methods without one
    #[serde(default)]
    pub body: Option<BodySnapshot>,
    /// Parameter names, `null` for anonymous parameters
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Number of custom attributes
    #[serde(default)]
    pub attributes: usize,
    /// Accessors the dumper failed to read
    #[serde(default)]
    pub unreadable: Vec<Accessor>,
}

impl MethodMetadata for MethodSnapshot {
    fn name(&self) -> &str {
        &self.name
    }

    fn body(&self) -> Result<Option<MethodBody>> {
        readable(&self.unreadable, Accessor::Body)?;
        Ok(self.body.map(|body| MethodBody {
            code_size: body.code_size,
            local_count: body.locals,
        }))
    }

    fn parameters(&self) -> Result<Vec<Parameter>> {
        readable(&self.unreadable, Accessor::Parameters)?;
        Ok(self.parameters.clone())
    }

    fn custom_attribute_count(&self) -> Result<usize> {
        readable(&self.unreadable, Accessor::Attributes)?;
        Ok(self.attributes)
    }
}

/// A field.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FieldSnapshot {
    /// Field name
    pub name: String,
    /// Static field flag
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Declared type; `null` or absent if it could not be resolved
    #[serde(default, rename = "type")]
    pub descriptor: Option<TypeDescriptor>,
    /// Stored value, if any
    #[serde(default)]
    pub value: Option<SnapshotValue>,
    /// Accessors the dumper failed to read
    #[serde(default)]
    pub unreadable: Vec<Accessor>,
}

impl FieldMetadata for FieldSnapshot {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_static(&self) -> bool {
        self.is_static
    }

    fn shape(&self) -> Result<ValueShape> {
        readable(&self.unreadable, Accessor::Type)?;
        self.descriptor
            .as_ref()
            .map(TypeDescriptor::to_shape)
            .ok_or(Error::Unavailable(Accessor::Type.name()))
    }

    fn value(&self) -> Result<Option<FieldValue>> {
        readable(&self.unreadable, Accessor::Value)?;
        Ok(self.value.as_ref().map(FieldValue::from))
    }
}

/// A type definition.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TypeSnapshot {
    /// Full name including namespace and nesting (`Outer+Inner`)
    pub name: String,
    /// Number of implemented interfaces
    #[serde(default)]
    pub interfaces: usize,
    /// Number of custom attributes
    #[serde(default)]
    pub attributes: usize,
    /// Declared fields
    #[serde(default)]
    pub fields: Vec<FieldSnapshot>,
    /// Declared property names
    #[serde(default)]
    pub properties: Vec<NamedMember>,
    /// Declared event names
    #[serde(default)]
    pub events: Vec<NamedMember>,
    /// Declared constructors
    #[serde(default)]
    pub constructors: Vec<MethodSnapshot>,
    /// Declared methods
    #[serde(default)]
    pub methods: Vec<MethodSnapshot>,
    /// Accessors the dumper failed to read
    #[serde(default)]
    pub unreadable: Vec<Accessor>,
}

impl TypeMetadata for TypeSnapshot {
    type Method = MethodSnapshot;
    type Field = FieldSnapshot;

    fn full_name(&self) -> &str {
        &self.name
    }

    fn interface_count(&self) -> Result<usize> {
        readable(&self.unreadable, Accessor::Interfaces)?;
        Ok(self.interfaces)
    }

    fn custom_attribute_count(&self) -> Result<usize> {
        readable(&self.unreadable, Accessor::Attributes)?;
        Ok(self.attributes)
    }

    fn fields(&self) -> &[FieldSnapshot] {
        &self.fields
    }

    fn properties(&self) -> &[NamedMember] {
        &self.properties
    }

    fn events(&self) -> &[NamedMember] {
        &self.events
    }

    fn constructors(&self) -> &[MethodSnapshot] {
        &self.constructors
    }

    fn methods(&self) -> &[MethodSnapshot] {
        &self.methods
    }
}

#[derive(Deserialize)]
struct ResourceSnapshot {
    name: String,
    length: u64,
    #[serde(default = "embedded_default")]
    embedded: bool,
    #[serde(default)]
    contained_in_another_assembly: bool,
    #[serde(default)]
    contained_in_manifest_file: bool,
}

fn embedded_default() -> bool {
    true
}

impl From<ResourceSnapshot> for ManifestResource {
    fn from(raw: ResourceSnapshot) -> Self {
        let mut location = ResourceLocation::empty();
        location.set(ResourceLocation::EMBEDDED, raw.embedded);
        location.set(
            ResourceLocation::CONTAINED_IN_ANOTHER_ASSEMBLY,
            raw.contained_in_another_assembly,
        );
        location.set(
            ResourceLocation::CONTAINED_IN_MANIFEST_FILE,
            raw.contained_in_manifest_file,
        );
        ManifestResource {
            name: raw.name,
            length: raw.length,
            location,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NativeNameSnapshot {
    Id(u32),
    Named(String),
}

#[derive(Deserialize)]
struct NativeResourceSnapshot {
    #[serde(rename = "type")]
    type_id: u32,
    name: NativeNameSnapshot,
    size: u64,
}

impl From<NativeResourceSnapshot> for NativeResource {
    fn from(raw: NativeResourceSnapshot) -> Self {
        NativeResource {
            type_id: raw.type_id,
            name: match raw.name {
                NativeNameSnapshot::Id(id) => NativeResourceName::Id(id),
                NativeNameSnapshot::Named(name) => NativeResourceName::Named(name),
            },
            size: raw.size,
        }
    }
}

fn deserialize_resources<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<ManifestResource>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<ResourceSnapshot>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(ManifestResource::from).collect())
}

fn deserialize_native<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<NativeResource>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<NativeResourceSnapshot>>::deserialize(deserializer)?;
    Ok(raw.map(|entries| entries.into_iter().map(NativeResource::from).collect()))
}

/// A whole module in snapshot form.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ModuleSnapshot {
    /// Simple assembly name
    pub name: String,
    /// Module file name; defaults to the assembly name
    #[serde(default)]
    pub file_name: Option<String>,
    /// On-disk length of the module, if the dumper recorded it
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Path of the file the dumper actually loaded
    #[serde(default)]
    pub location: Option<PathBuf>,
    /// Module-level methods
    #[serde(default)]
    pub global_methods: Vec<MethodSnapshot>,
    /// Module-level fields
    #[serde(default)]
    pub global_fields: Vec<FieldSnapshot>,
    /// Resolved type definitions
    #[serde(default)]
    pub types: Vec<TypeSnapshot>,
    /// Number of type definitions the dumper could not resolve
    #[serde(default)]
    pub unresolved_types: usize,
    /// Manifest resources
    #[serde(default, deserialize_with = "deserialize_resources")]
    pub resources: Vec<ManifestResource>,
    /// Native resources; absent if the dumper could not read the resource directory
    #[serde(default, deserialize_with = "deserialize_native")]
    pub native_resources: Option<Vec<NativeResource>>,
}

impl ModuleSnapshot {
    /// Parses a snapshot from a JSON string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Snapshot`] if the document is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a snapshot from a JSON byte buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Snapshot`] if the buffer is not a valid snapshot.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Reads and parses a snapshot file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read, or
    /// [`crate::Error::Snapshot`] if its contents are not a valid snapshot.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_slice(&data)
    }
}

impl ModuleMetadata for ModuleSnapshot {
    type Method = MethodSnapshot;
    type Field = FieldSnapshot;
    type Type = TypeSnapshot;

    fn name(&self) -> &str {
        &self.name
    }

    fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.name)
    }

    fn global_methods(&self) -> &[MethodSnapshot] {
        &self.global_methods
    }

    fn global_fields(&self) -> &[FieldSnapshot] {
        &self.global_fields
    }

    fn types(&self) -> &[TypeSnapshot] {
        &self.types
    }

    fn unresolved_type_count(&self) -> usize {
        self.unresolved_types
    }

    fn manifest_resources(&self) -> &[ManifestResource] {
        &self.resources
    }

    fn native_resources(&self) -> Result<Vec<NativeResource>> {
        self.native_resources.clone().ok_or(Error::NotSupported)
    }
}
