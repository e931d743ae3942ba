//! Walks a module's metadata and prices every structural element.
//!
//! The [`MetadataWalker`] visits a module in a fixed order and emits one [`CostedElement`] per
//! costed element into an [`ElementSink`]. It never builds the tree itself: the
//! [`SizeTreeBuilder`] is one sink, a plain `Vec<CostedElement>` is another, which keeps the
//! pricing rules testable on their own.
//!
//! # Walk Order
//!
//! 1. Native resources, then manifest resources, below a `Resources` node
//! 2. Module-level methods, then the module-level field bucket, below the root
//! 3. Every resolved type in provider order: the type itself, its static fields, the field,
//!    property and event buckets, constructors and methods
//!
//! # Degradation
//!
//! Metadata accessors can fail for individual elements. A failed accessor contributes zero to
//! the element it belongs to and is logged at debug level; it never aborts the walk. Errors
//! returned by the sink, such as a negative cost, do abort it.

use log::debug;
use serde::Serialize;
use strum::Display;

use crate::{
    metadata::provider::{
        name_length, FieldMetadata, MethodMetadata, ModuleMetadata, NamedMember, TypeMetadata,
    },
    sizer::{content::content_size, cost::CostModel, tree::SizeTreeBuilder},
    Result,
};

/// Label of the path node that parents all resources.
pub const RESOURCES: &str = "Resources";

/// The kind of a costed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ElementKind {
    /// A type definition; its cost lands on the type's own path node
    Type,
    /// A method, at module level or on a type
    Method,
    /// A constructor
    Constructor,
    /// Data stored by a static field
    StaticField,
    /// Metadata rows of all fields of a type or module
    FieldGroup,
    /// Metadata rows of all properties of a type
    PropertyGroup,
    /// Metadata rows of all events of a type
    EventGroup,
    /// An embedded manifest resource stream
    ManifestResource,
    /// An entry of the native resource directory
    NativeResource,
}

/// One priced element, ready to be placed into a size tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostedElement {
    /// What was priced
    pub kind: ElementKind,
    /// Ownership path below the module root
    pub path: Vec<String>,
    /// Display label of the element
    pub label: String,
    /// Estimated bytes
    pub cost: i64,
}

/// Receives the elements produced by a [`MetadataWalker`].
pub trait ElementSink {
    /// Accepts one element.
    ///
    /// # Errors
    /// Implementations return an error to abort the walk.
    fn accept(&mut self, element: CostedElement) -> Result<()>;
}

impl ElementSink for Vec<CostedElement> {
    fn accept(&mut self, element: CostedElement) -> Result<()> {
        self.push(element);
        Ok(())
    }
}

impl ElementSink for SizeTreeBuilder {
    fn accept(&mut self, element: CostedElement) -> Result<()> {
        match element.kind {
            ElementKind::Type => {
                let mut path = element.path;
                path.push(element.label);
                self.charge(&path, element.cost)?;
            }
            ElementKind::ManifestResource | ElementKind::NativeResource => {
                let folder = element.path.first().map_or(RESOURCES, String::as_str);
                self.add_resource(folder, &element.label, element.cost)?;
            }
            _ => {
                self.add(&element.path, &element.label, element.cost)?;
            }
        }
        Ok(())
    }
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn per_item(n: usize, overhead: i64) -> i64 {
    count(n).saturating_mul(overhead)
}

/// Splits a full type name into its ownership path, on namespace dots and nesting pluses.
#[must_use]
pub fn type_path(full_name: &str) -> Vec<String> {
    full_name.split(['.', '+']).map(str::to_string).collect()
}

/// Prices the elements of a module with a [`CostModel`].
#[derive(Debug, Clone, Copy)]
pub struct MetadataWalker<'a> {
    model: &'a CostModel,
}

impl<'a> MetadataWalker<'a> {
    /// Creates a walker pricing with `model`.
    #[must_use]
    pub fn new(model: &'a CostModel) -> Self {
        MetadataWalker { model }
    }

    /// Walks `module` and emits every costed element into `sink`.
    ///
    /// # Errors
    /// Returns the first error reported by `sink`.
    pub fn walk<M, S>(&self, module: &M, sink: &mut S) -> Result<()>
    where
        M: ModuleMetadata,
        S: ElementSink + ?Sized,
    {
        self.walk_resources(module, sink)?;

        for method in module.global_methods() {
            sink.accept(self.method_element(Vec::new(), method, ElementKind::Method))?;
        }

        let fields = module.global_fields();
        let cost = self.field_cost(fields);
        if cost != 0 {
            sink.accept(CostedElement {
                kind: ElementKind::FieldGroup,
                path: Vec::new(),
                label: format!("{} Fields in {} (Overhead)", fields.len(), module.file_name()),
                cost,
            })?;
        }

        for ty in module.types() {
            self.walk_type(ty, sink)?;
        }
        Ok(())
    }

    /// Estimated cost of a method or constructor.
    ///
    /// `method + name + code size + locals * local_variable + Σ(parameter + name) +
    /// attributes * custom_attribute`, where the body, the parameters and the attributes each
    /// contribute zero when they cannot be read.
    pub fn method_cost<T: MethodMetadata + ?Sized>(&self, method: &T) -> i64 {
        let model = self.model;
        let mut cost = model.method.saturating_add(count(name_length(method.name())));

        match method.body() {
            Ok(Some(body)) => {
                cost = cost
                    .saturating_add(count(body.code_size))
                    .saturating_add(per_item(body.local_count, model.local_variable));
            }
            Ok(None) => {}
            Err(error) => debug!("Body of '{}' not costed: {}", method.name(), error),
        }

        match method.parameters() {
            Ok(parameters) => {
                for parameter in &parameters {
                    let name = parameter.name.as_deref().map_or(0, name_length);
                    cost = cost.saturating_add(model.parameter.saturating_add(count(name)));
                }
            }
            Err(error) => debug!("Parameters of '{}' not costed: {}", method.name(), error),
        }

        match method.custom_attribute_count() {
            Ok(attributes) => {
                cost = cost.saturating_add(per_item(attributes, model.custom_attribute));
            }
            Err(error) => debug!("Attributes of '{}' not costed: {}", method.name(), error),
        }

        cost
    }

    /// Estimated cost of a type definition itself, excluding its members.
    pub fn type_cost<T: TypeMetadata + ?Sized>(&self, ty: &T) -> i64 {
        let model = self.model;
        let name = ty.full_name();
        let mut cost = model.type_def.saturating_add(count(name_length(name)));

        match ty.interface_count() {
            Ok(interfaces) => {
                cost = cost.saturating_add(per_item(interfaces, model.interface_impl));
            }
            Err(error) => debug!("Interfaces of '{}' not costed: {}", name, error),
        }
        match ty.custom_attribute_count() {
            Ok(attributes) => {
                cost = cost.saturating_add(per_item(attributes, model.custom_attribute));
            }
            Err(error) => debug!("Attributes of '{}' not costed: {}", name, error),
        }

        cost
    }

    /// Bytes of data stored by a static field, `None` if the field is not costed.
    pub fn static_field_cost<F: FieldMetadata + ?Sized>(&self, field: &F) -> Option<i64> {
        let shape = match field.shape() {
            Ok(shape) => shape,
            Err(error) => {
                debug!("Static field '{}' skipped: {}", field.name(), error);
                return None;
            }
        };

        let value = if shape.is_variable_length() {
            match field.value() {
                Ok(value) => value,
                Err(error) => {
                    debug!("Value of static field '{}' skipped: {}", field.name(), error);
                    return None;
                }
            }
        } else {
            None
        };

        let size = content_size(&shape, value.as_ref());
        (size > 0).then(|| i64::try_from(size).unwrap_or(i64::MAX))
    }

    fn walk_resources<M, S>(&self, module: &M, sink: &mut S) -> Result<()>
    where
        M: ModuleMetadata,
        S: ElementSink + ?Sized,
    {
        match module.native_resources() {
            Ok(resources) => {
                for resource in resources {
                    sink.accept(CostedElement {
                        kind: ElementKind::NativeResource,
                        path: vec![RESOURCES.to_string()],
                        label: format!("Resource: {} {}", resource.type_name(), resource.name),
                        cost: i64::try_from(resource.size).unwrap_or(i64::MAX),
                    })?;
                }
            }
            Err(error) => debug!("Native resources of '{}' skipped: {}", module.name(), error),
        }

        for resource in module.manifest_resources() {
            if !resource.is_local() {
                debug!("Manifest resource '{}' is not embedded", resource.name);
                continue;
            }
            sink.accept(CostedElement {
                kind: ElementKind::ManifestResource,
                path: vec![RESOURCES.to_string()],
                label: format!("Manifest Resource: {}", resource.name),
                cost: i64::try_from(resource.length).unwrap_or(i64::MAX),
            })?;
        }
        Ok(())
    }

    fn walk_type<T, S>(&self, ty: &T, sink: &mut S) -> Result<()>
    where
        T: TypeMetadata,
        S: ElementSink + ?Sized,
    {
        let mut segments = type_path(ty.full_name());
        let label = segments.pop().unwrap_or_default();
        sink.accept(CostedElement {
            kind: ElementKind::Type,
            path: segments.clone(),
            label: label.clone(),
            cost: self.type_cost(ty),
        })?;
        segments.push(label);
        let path = segments;

        for field in ty.fields().iter().filter(|field| field.is_static()) {
            if let Some(cost) = self.static_field_cost(field) {
                sink.accept(CostedElement {
                    kind: ElementKind::StaticField,
                    path: path.clone(),
                    label: format!("Static Field: {}", field.name()),
                    cost,
                })?;
            }
        }

        let buckets = [
            (
                ElementKind::FieldGroup,
                "Fields",
                ty.fields().len(),
                self.field_cost(ty.fields()),
            ),
            (
                ElementKind::PropertyGroup,
                "Properties",
                ty.properties().len(),
                self.member_cost(ty.properties(), self.model.property),
            ),
            (
                ElementKind::EventGroup,
                "Events",
                ty.events().len(),
                self.member_cost(ty.events(), self.model.event),
            ),
        ];
        for (kind, noun, members, cost) in buckets {
            if cost != 0 {
                sink.accept(CostedElement {
                    kind,
                    path: path.clone(),
                    label: format!("{members} {noun} (Overhead)"),
                    cost,
                })?;
            }
        }

        for constructor in ty.constructors() {
            sink.accept(self.method_element(path.clone(), constructor, ElementKind::Constructor))?;
        }
        for method in ty.methods() {
            sink.accept(self.method_element(path.clone(), method, ElementKind::Method))?;
        }
        Ok(())
    }

    fn field_cost<F: FieldMetadata>(&self, fields: &[F]) -> i64 {
        fields
            .iter()
            .map(|field| self.model.field.saturating_add(count(name_length(field.name()))))
            .fold(0i64, i64::saturating_add)
    }

    fn member_cost(&self, members: &[NamedMember], overhead: i64) -> i64 {
        members
            .iter()
            .map(|member| overhead.saturating_add(count(member.name_len())))
            .fold(0i64, i64::saturating_add)
    }

    fn method_element<T: MethodMetadata>(
        &self,
        path: Vec<String>,
        method: &T,
        kind: ElementKind,
    ) -> CostedElement {
        CostedElement {
            kind,
            path,
            label: method.name().to_string(),
            cost: self.method_cost(method),
        }
    }
}
