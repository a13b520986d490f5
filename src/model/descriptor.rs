// ==============================================================================
// Descriptor Model: the Input Contract from Discovery
// ==============================================================================
//
// The original tooling this generator replaces located annotated data classes
// by scanning a build classpath at runtime. That mechanism is deliberately not
// part of this crate: discovery hands the engine an explicit, ordered list of
// descriptor sets — one per source (the local project, then each dependency
// artifact) — and everything in this module is plain data describing what was
// found. The JSON form of this contract is parsed in `import.rs`; callers can
// also construct descriptor sets directly (the integration tests do).
//
// Fields flagged as ignored in the JSON form are filtered out by the import
// layer and never appear in a `FieldDescriptor`.

use super::declaration::{EnumKind, ScalarType, TypeKind};

/// The declared shape of one field, before resolution into a canonical schema
/// type token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// A plain scalar (`bool`, `byte`, …, `string`).
    Scalar(ScalarType),
    /// A boxed/nullable wrapper around a scalar. Resolves to the same token
    /// as the bare scalar; the distinction exists only on the discovery side.
    Boxed(ScalarType),
    /// A fixed-size array of an element shape.
    Array(Box<FieldShape>),
    /// A generic single-element collection of an element shape. Resolves the
    /// same way as `Array`: both are vectors of the element.
    List(Box<FieldShape>),
    /// A generic two-type-parameter map from key shape to value shape. The
    /// target vocabulary has no native map; the resolver synthesizes an entry
    /// table and emits a vector of it.
    Map(Box<FieldShape>, Box<FieldShape>),
    /// A reference to another discovered (or undiscovered) declaration.
    Ref(TypeRef),
}

/// A by-name reference to another declaration.
///
/// `qualified` is the referenced type's fully-qualified dotted name as known
/// to discovery (derived from the owning artifact's namespace). It is only
/// consulted when the referencing field asks for full-name emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub qualified: Option<String>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> TypeRef {
        TypeRef {
            name: name.into(),
            qualified: None,
        }
    }

    pub fn qualified(name: impl Into<String>, qualified: impl Into<String>) -> TypeRef {
        TypeRef {
            name: name.into(),
            qualified: Some(qualified.into()),
        }
    }
}

/// One field of a record descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub shape: FieldShape,
    /// Raw default-value text, emitted verbatim and not type-checked.
    pub default_value: Option<String>,
    pub comment: Option<String>,
    /// Emit the referenced type's fully-qualified dotted name instead of its
    /// simple name, to disambiguate same-named types from different
    /// namespaces in one consolidated schema.
    pub use_full_name: bool,
}

impl FieldDescriptor {
    /// A field with just a name and shape; the common case in tests.
    pub fn new(name: impl Into<String>, shape: FieldShape) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            shape,
            default_value: None,
            comment: None,
            use_full_name: false,
        }
    }
}

/// A table-or-struct type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub name: String,
    /// Fully-qualified dotted name, when discovery knows it.
    pub full_name: Option<String>,
    pub kind: TypeKind,
    /// This type claims the schema's root-type marker. At most one claim
    /// survives consolidation.
    pub root: bool,
    pub comment: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

/// An enum-or-union type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    pub full_name: Option<String>,
    pub kind: EnumKind,
    /// Underlying scalar tag; `None` means the smallest (byte).
    pub underlying: Option<ScalarType>,
    pub values: Vec<String>,
    pub comment: Option<String>,
}

/// One discovered type, tagged by which declaration family it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Record(RecordDescriptor),
    Enum(EnumDescriptor),
}

impl TypeDescriptor {
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Record(r) => &r.name,
            TypeDescriptor::Enum(e) => &e.name,
        }
    }

    pub fn full_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Record(r) => r.full_name.as_deref(),
            TypeDescriptor::Enum(e) => e.full_name.as_deref(),
        }
    }
}

/// Everything discovery found in one source: the local project or one
/// dependency artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSet {
    /// Where this set came from (a file path or `"<memory>"`), for
    /// diagnostics.
    pub origin: String,
    /// Raw colon-delimited namespace descriptor for this source, if any.
    /// Only the primary (first) source's namespace is emitted; see the
    /// consolidator.
    pub namespace: Option<String>,
    /// Optional file-identifier directive carried by this source. Only the
    /// primary source's value is considered.
    pub file_identifier: Option<String>,
    /// Discovered types, in discovery order.
    pub types: Vec<TypeDescriptor>,
}
