//! # dotsizer Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotsizer library. Import this module to get quick access to the essential
//! types for module size analysis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotsizer operations
pub use crate::Error;

/// The result type used throughout dotsizer
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Size analysis entry point and its result
pub use crate::{SizeReport, Sizer};

/// Overhead constants
pub use crate::sizer::cost::CostModel;

// ================================================================================================
// Size Tree
// ================================================================================================

/// The finished tree and read access to its nodes
pub use crate::sizer::tree::{NodeId, NodeKind, NodeRef, SizeTree, SizeTreeBuilder};

/// Metadata walk and its output
pub use crate::sizer::walker::{CostedElement, ElementKind, ElementSink, MetadataWalker};

// ================================================================================================
// Metadata
// ================================================================================================

/// Provider traits implemented by metadata readers
pub use crate::metadata::provider::{
    FieldMetadata, MethodBody, MethodMetadata, ModuleMetadata, NamedMember, Parameter,
    TypeMetadata,
};

/// Field layouts and values
pub use crate::metadata::value::{FieldValue, Primitive, ValueShape};

/// Resources
pub use crate::metadata::resources::{
    ManifestResource, NativeResource, NativeResourceName, NativeResourceType, ResourceLocation,
};

/// JSON snapshot provider
pub use crate::metadata::snapshot::ModuleSnapshot;

// ================================================================================================
// File Access
// ================================================================================================

/// Module file helpers
pub use crate::file::{contents_match, file_length, is_substituted};
