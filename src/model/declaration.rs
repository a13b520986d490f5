// ==============================================================================
// Declaration Model: the In-Memory Schema Graph
// ==============================================================================
//
// The consolidator assembles declarations into one `Schema`, and the text
// serializer (model/text.rs) renders them. Two rules shape this module:
//
// - Identity is the declaration NAME, nothing else. Two declarations with the
//   same name are the same declaration regardless of their other fields, which
//   is the deduplication contract: `PartialEq`/`Hash` consider only the name,
//   and `Schema` stores declarations in a name-keyed `IndexMap` so the first
//   registration wins and later ones are skipped.
// - Cross-declaration references are name strings, never owning pointers. A
//   field's `SchemaType::Ref` holds the referenced declaration's emitted name
//   token; the declaration graph may be cyclic, and declarations must be
//   constructible before the types they reference exist.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use super::namespace::Namespace;

// ==============================================================================
// Type Tokens
// ==============================================================================

/// The fixed scalar vocabulary of the target schema language.
///
/// `String` is grouped here because it occupies the same position in field
/// type tokens, even though it is not a legal enum underlying type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl ScalarType {
    /// The schema-text token for this scalar.
    pub fn token(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Byte => "byte",
            ScalarType::Short => "short",
            ScalarType::Int => "int",
            ScalarType::Long => "long",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::String => "string",
        }
    }

    /// Parse a scalar token as it appears in descriptor documents.
    pub fn from_token(token: &str) -> Option<ScalarType> {
        Some(match token {
            "bool" => ScalarType::Bool,
            "byte" => ScalarType::Byte,
            "short" => ScalarType::Short,
            "int" => ScalarType::Int,
            "long" => ScalarType::Long,
            "float" => ScalarType::Float,
            "double" => ScalarType::Double,
            "string" => ScalarType::String,
            _ => return None,
        })
    }
}

/// A field's resolved, canonical schema type.
///
/// `Ref` carries the name token exactly as it will be emitted — the referenced
/// declaration's simple name, or its fully-qualified dotted name when the
/// field asked for full-name disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Scalar(ScalarType),
    Vector(Box<SchemaType>),
    Ref(String),
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Scalar(scalar) => f.write_str(scalar.token()),
            SchemaType::Vector(element) => write!(f, "[{element}]"),
            SchemaType::Ref(name) => f.write_str(name),
        }
    }
}

// ==============================================================================
// Declarations
// ==============================================================================

/// Distinguishes the two enum-like block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    Enum,
    Union,
}

impl EnumKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            EnumKind::Enum => "enum",
            EnumKind::Union => "union",
        }
    }
}

/// Distinguishes the two record-like block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Table,
    Struct,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Table => "table",
            TypeKind::Struct => "struct",
        }
    }
}

/// One field of a table or struct declaration.
///
/// `default_value` is the raw string supplied by the descriptor, emitted
/// verbatim after `=`; it is not type-checked against `schema_type`. Field
/// order within the parent declaration is significant and preserved, since
/// the downstream compiler assigns binary layout from text order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    pub schema_type: SchemaType,
    pub default_value: Option<String>,
    pub comment: Option<String>,
}

impl FieldDeclaration {
    /// True if the resolved type is a vector.
    pub fn is_vector(&self) -> bool {
        matches!(self.schema_type, SchemaType::Vector(_))
    }
}

/// An enum or union declaration: a name, an ordered set of value names, and —
/// for enums — an underlying scalar type (byte when unspecified, the smallest).
///
/// Equality and hashing consider only `name`; see the module header.
#[derive(Debug, Clone)]
pub struct EnumDeclaration {
    pub name: String,
    pub kind: EnumKind,
    pub underlying: ScalarType,
    pub values: Vec<String>,
    pub comment: Option<String>,
}

impl PartialEq for EnumDeclaration {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for EnumDeclaration {}

impl Hash for EnumDeclaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A table or struct declaration with its ordered fields.
///
/// `root_type` marks this declaration as the schema's payload entry point. At
/// most one declaration in the final schema may carry it — enforced by the
/// consolidator during registration, not by this type.
///
/// Equality and hashing consider only `name`; see the module header.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    pub root_type: bool,
    pub fields: Vec<FieldDeclaration>,
    pub comment: Option<String>,
}

impl PartialEq for TypeDeclaration {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeDeclaration {}

impl Hash for TypeDeclaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Either kind of declaration. Tables/structs and enums/unions share one flat
/// name space, so the registry stores both behind this sum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Declaration {
    Enum(EnumDeclaration),
    Type(TypeDeclaration),
}

impl Declaration {
    /// The declaration's name — its identity for deduplication.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Enum(e) => &e.name,
            Declaration::Type(t) => &t.name,
        }
    }

    /// The block keyword this declaration renders with.
    pub fn keyword(&self) -> &'static str {
        match self {
            Declaration::Enum(e) => e.kind.keyword(),
            Declaration::Type(t) => t.kind.keyword(),
        }
    }
}

// ==============================================================================
// Schema
// ==============================================================================

/// The root aggregate of one synthesis run: a namespace, an optional
/// 4-character file identifier, and the deduplicated declarations in
/// registration order.
#[derive(Debug, Clone)]
pub struct Schema {
    namespace: Namespace,
    file_identifier: Option<String>,
    declarations: IndexMap<String, Declaration>,
}

impl Schema {
    pub fn new(namespace: Namespace) -> Schema {
        Schema {
            namespace,
            file_identifier: None,
            declarations: IndexMap::new(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Set the file identifier directive.
    ///
    /// The directive is a fixed 4-character tag embedded in binary payloads;
    /// any other length is rejected by leaving the previous value in place.
    /// Returns whether the value was accepted.
    pub fn set_file_identifier(&mut self, identifier: &str) -> bool {
        if identifier.chars().count() != 4 {
            return false;
        }
        self.file_identifier = Some(identifier.to_string());
        true
    }

    pub fn file_identifier(&self) -> Option<&str> {
        self.file_identifier.as_deref()
    }

    /// Register a declaration under its name.
    ///
    /// The first registration of a name wins; a later declaration with the
    /// same name is dropped and `false` is returned. No merging of fields or
    /// values is performed.
    pub fn insert(&mut self, declaration: Declaration) -> bool {
        match self.declarations.entry(declaration.name().to_string()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(declaration);
                true
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    /// All declarations in registration order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    /// Enum and union declarations in registration order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumDeclaration> {
        self.declarations.values().filter_map(|d| match d {
            Declaration::Enum(e) => Some(e),
            Declaration::Type(_) => None,
        })
    }

    /// Table and struct declarations in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.declarations.values().filter_map(|d| match d {
            Declaration::Type(t) => Some(t),
            Declaration::Enum(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
