//! Manifest and native resources of a module.
//!
//! Two kinds of resources contribute to a module's size:
//!
//! - [`ManifestResource`] - resources listed in the `ManifestResource` table. Only resources
//!   whose data is embedded in this very module are attributed to it.
//! - [`NativeResource`] - entries of the PE resource directory (icons, version info,
//!   manifests). Enumerating them is an optional provider capability.

use std::fmt;

use bitflags::bitflags;
use strum::{Display, FromRepr};

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy)]
    /// Where the data of a manifest resource physically lives
    pub struct ResourceLocation : u32 {
        /// The resource data is embedded in a module
        const EMBEDDED = 0x0001;
        /// The resource is contained in another, referenced assembly
        const CONTAINED_IN_ANOTHER_ASSEMBLY = 0x0002;
        /// The resource is contained in the manifest file
        const CONTAINED_IN_MANIFEST_FILE = 0x0004;
    }
}

/// A resource listed in the module manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResource {
    /// Resource name as listed in the manifest
    pub name: String,
    /// Exact byte length of the backing stream
    pub length: u64,
    /// Where the resource data lives
    pub location: ResourceLocation,
}

impl ManifestResource {
    /// Creates an embedded resource of the given length.
    #[must_use]
    pub fn embedded(name: impl Into<String>, length: u64) -> Self {
        ManifestResource {
            name: name.into(),
            length,
            location: ResourceLocation::EMBEDDED,
        }
    }

    /// Returns true if the resource bytes are part of this module's file.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.location.contains(ResourceLocation::EMBEDDED)
            && !self
                .location
                .contains(ResourceLocation::CONTAINED_IN_ANOTHER_ASSEMBLY)
    }
}

/// Predefined PE resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum NativeResourceType {
    Cursor = 1,
    Bitmap = 2,
    Icon = 3,
    Menu = 4,
    Dialog = 5,
    String = 6,
    FontDir = 7,
    Font = 8,
    Accelerator = 9,
    RcData = 10,
    MessageTable = 11,
    CursorGroup = 12,
    IconGroup = 14,
    VersionInfo = 16,
    DlgInclude = 17,
    PlugPlay = 19,
    Vxd = 20,
    AnimatedCursor = 21,
    AnimatedIcon = 22,
    Html = 23,
    Manifest = 24,
}

/// Name of a native resource entry, either a string or a numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeResourceName {
    /// A named entry
    Named(String),
    /// An entry identified by ordinal
    Id(u32),
}

impl fmt::Display for NativeResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeResourceName::Named(name) => write!(f, "{name}"),
            NativeResourceName::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// An entry of the PE resource directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeResource {
    /// Numeric resource type id
    pub type_id: u32,
    /// Entry name
    pub name: NativeResourceName,
    /// Raw resource size as reported by the resource directory
    pub size: u64,
}

impl NativeResource {
    /// Returns the predefined resource type, if `type_id` is one.
    #[must_use]
    pub fn kind(&self) -> Option<NativeResourceType> {
        NativeResourceType::from_repr(self.type_id)
    }

    /// Returns the display name of the resource type, falling back to the numeric id.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self.kind() {
            Some(kind) => kind.to_string(),
            None => self.type_id.to_string(),
        }
    }
}
