// ==============================================================================
// Descriptor Document Loading
// ==============================================================================
//
// Discovery tooling serializes what it found into JSON descriptor documents —
// one for the local project and one per dependency artifact. This module is
// the bridge from those documents to the in-memory descriptor model:
//
//   - `parse_descriptor_set`: serde_json `Value` -> `DescriptorSet`, by hand,
//     so every contract violation gets a message naming the offending type
//     and field rather than a generic deserialization error.
//   - `load_descriptor_file` / `load_artifact_sets`: file and directory
//     loading; artifact directories are walked in sorted order so that
//     duplicate-name precedence across artifacts is stable between runs.
//   - `DescriptorSource`: the boundary trait the engine consumes, with file
//     and in-memory implementations.
//
// Documents may contain C-style comments (discovery tools emit them for
// provenance notes), so JSON parsing strips them first.
//
// A field object carrying `"ignore": true` is dropped right here: the engine
// proper never sees ignored fields.
//
// Document shape:
//
//   {
//     "namespace": "com.example:app",
//     "fileIdentifier": "MONS",
//     "types": [
//       { "kind": "table", "name": "Request", "fullName": "…", "root": true,
//         "comment": "…", "fields": [
//           { "name": "state", "shape": "UserState" },
//           { "name": "id", "shape": "long", "default": "0" },
//           { "name": "tags", "shape": { "list": "string" } },
//           { "name": "attrs", "shape": { "map": ["string", "int"] } },
//           { "name": "age", "shape": { "boxed": "int" } },
//           { "name": "w", "shape": { "ref": { "name": "Wallet",
//                                              "fullName": "com.w.Wallet" } },
//             "useFullName": true }
//         ] },
//       { "kind": "enum", "name": "UserState", "underlying": "byte",
//         "values": ["GUEST", "ACTIVE"] }
//     ]
//   }
//
// A bare string shape that is not a scalar token is a reference by simple
// name.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Context;
use serde_json::Value;

use crate::error::SynthError;
use crate::model::declaration::{EnumKind, ScalarType, TypeKind};
use crate::model::descriptor::{
    DescriptorSet, EnumDescriptor, FieldDescriptor, FieldShape, RecordDescriptor, TypeDescriptor,
    TypeRef,
};

/// Parse JSON with C-style comment stripping (`//` and `/* */`).
fn parse_json_with_comments(input: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_reader(
        json_comments::CommentSettings::c_style().strip_comments(input.as_bytes()),
    )
}

// ==============================================================================
// Source Boundary
// ==============================================================================

/// One provider of a descriptor set. The consolidator takes an ordered list
/// of these: the local project first, dependency artifacts after.
pub trait DescriptorSource {
    fn load(&self) -> miette::Result<DescriptorSet>;
}

/// A descriptor document on disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> JsonFileSource {
        JsonFileSource { path: path.into() }
    }
}

impl DescriptorSource for JsonFileSource {
    fn load(&self) -> miette::Result<DescriptorSet> {
        load_descriptor_file(&self.path)
    }
}

/// An already-built descriptor set, for programmatic callers and tests.
pub struct InMemorySource {
    set: DescriptorSet,
}

impl InMemorySource {
    pub fn new(set: DescriptorSet) -> InMemorySource {
        InMemorySource { set }
    }
}

impl DescriptorSource for InMemorySource {
    fn load(&self) -> miette::Result<DescriptorSet> {
        Ok(self.set.clone())
    }
}

// ==============================================================================
// File and Directory Loading
// ==============================================================================

/// Read and parse one descriptor document.
pub fn load_descriptor_file(path: &Path) -> miette::Result<DescriptorSet> {
    let input = fs::read_to_string(path)
        .map_err(|e| miette::miette!("{e}"))
        .with_context(|| format!("read {}", path.display()))?;
    let set = parse_descriptor_set(&input, &path.display().to_string())?;
    Ok(set)
}

/// Load every `.json` descriptor document under the given artifact
/// directories. Directories are walked depth-first with entries sorted by
/// file name, so the resulting source order — and therefore duplicate-name
/// precedence — is deterministic.
pub fn load_artifact_sets(dirs: &[PathBuf]) -> miette::Result<Vec<DescriptorSet>> {
    let mut sets = Vec::new();
    for dir in dirs {
        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            if entry.path().extension().is_some_and(|ext| ext == "json") {
                sets.push(load_descriptor_file(entry.path())?);
            }
        }
    }
    Ok(sets)
}

// ==============================================================================
// Document Parsing
// ==============================================================================

/// Parse a descriptor document from JSON text. `origin` names the document in
/// error messages (a file path, or `"<input>"` for stdin).
pub fn parse_descriptor_set(input: &str, origin: &str) -> miette::Result<DescriptorSet> {
    let invalid = |message: String| SynthError::InvalidDescriptor {
        origin: origin.to_string(),
        message,
    };

    let document = parse_json_with_comments(input).map_err(|e| invalid(format!("{e}")))?;
    let Value::Object(document) = document else {
        return Err(invalid("document must be a JSON object".to_string()).into());
    };

    let namespace = match document.get("namespace") {
        None | Some(Value::Null) => None,
        Some(Value::String(ns)) => Some(ns.clone()),
        Some(_) => return Err(invalid("`namespace` must be a string".to_string()).into()),
    };
    let file_identifier = match document.get("fileIdentifier") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => return Err(invalid("`fileIdentifier` must be a string".to_string()).into()),
    };

    let mut types = Vec::new();
    match document.get("types") {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            for entry in entries {
                types.push(parse_type(entry).map_err(&invalid)?);
            }
        }
        Some(_) => return Err(invalid("`types` must be an array".to_string()).into()),
    }

    Ok(DescriptorSet {
        origin: origin.to_string(),
        namespace,
        file_identifier,
        types,
    })
}

/// Parse one type descriptor object.
fn parse_type(value: &Value) -> Result<TypeDescriptor, String> {
    let Value::Object(obj) = value else {
        return Err("each entry in `types` must be an object".to_string());
    };

    let name = require_string(obj.get("name"), "type", "`name`")?;
    let kind = require_string(obj.get("kind"), &name, "`kind`")?;
    let full_name = optional_string(obj.get("fullName"), &name, "`fullName`")?;
    let comment = optional_string(obj.get("comment"), &name, "`comment`")?;

    match kind.as_str() {
        "table" | "struct" => {
            let kind = if kind == "table" {
                TypeKind::Table
            } else {
                TypeKind::Struct
            };
            let root = optional_bool(obj.get("root"), &name, "`root`")?.unwrap_or(false);
            let mut fields = Vec::new();
            match obj.get("fields") {
                None | Some(Value::Null) => {}
                Some(Value::Array(entries)) => {
                    for entry in entries {
                        // `None` means the field was flagged ignored.
                        if let Some(field) = parse_field(entry, &name)? {
                            fields.push(field);
                        }
                    }
                }
                Some(_) => return Err(format!("type `{name}`: `fields` must be an array")),
            }
            Ok(TypeDescriptor::Record(RecordDescriptor {
                name,
                full_name,
                kind,
                root,
                comment,
                fields,
            }))
        }
        "enum" | "union" => {
            let kind = if kind == "enum" {
                EnumKind::Enum
            } else {
                EnumKind::Union
            };
            let underlying = match obj.get("underlying") {
                None | Some(Value::Null) => None,
                Some(Value::String(token)) => Some(parse_underlying(token, &name)?),
                Some(_) => return Err(format!("type `{name}`: `underlying` must be a string")),
            };
            let mut values = Vec::new();
            match obj.get("values") {
                None | Some(Value::Null) => {}
                Some(Value::Array(entries)) => {
                    for entry in entries {
                        let Value::String(v) = entry else {
                            return Err(format!(
                                "type `{name}`: `values` entries must be strings"
                            ));
                        };
                        values.push(v.clone());
                    }
                }
                Some(_) => return Err(format!("type `{name}`: `values` must be an array")),
            }
            Ok(TypeDescriptor::Enum(EnumDescriptor {
                name,
                full_name,
                kind,
                underlying,
                values,
                comment,
            }))
        }
        other => Err(format!(
            "type `{name}`: unknown kind `{other}` \
             (expected `table`, `struct`, `enum`, or `union`)"
        )),
    }
}

/// Parse one field descriptor object. Returns `Ok(None)` for ignored fields.
fn parse_field(value: &Value, type_name: &str) -> Result<Option<FieldDescriptor>, String> {
    let Value::Object(obj) = value else {
        return Err(format!("type `{type_name}`: each field must be an object"));
    };

    let name = require_string(obj.get("name"), type_name, "field `name`")?;
    let at = format!("{type_name}.{name}");

    if optional_bool(obj.get("ignore"), &at, "`ignore`")?.unwrap_or(false) {
        return Ok(None);
    }

    let Some(shape_value) = obj.get("shape") else {
        return Err(format!("field `{at}`: `shape` is required"));
    };
    let shape = parse_shape(shape_value, &at)?;

    let default_value = match obj.get("default") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        // Numeric and boolean defaults are legal in documents; the engine
        // treats all defaults as raw text.
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(_) => return Err(format!("field `{at}`: `default` must be a scalar value")),
    };
    let comment = optional_string(obj.get("comment"), &at, "`comment`")?;
    let use_full_name = optional_bool(obj.get("useFullName"), &at, "`useFullName`")?.unwrap_or(false);

    Ok(Some(FieldDescriptor {
        name,
        shape,
        default_value,
        comment,
        use_full_name,
    }))
}

/// Parse a field shape: a bare string (scalar token or reference by simple
/// name) or a single-key object (`boxed`, `array`, `list`, `map`, `ref`).
fn parse_shape(value: &Value, at: &str) -> Result<FieldShape, String> {
    match value {
        Value::String(token) => Ok(match ScalarType::from_token(token) {
            Some(scalar) => FieldShape::Scalar(scalar),
            None => FieldShape::Ref(TypeRef::new(token.clone())),
        }),
        Value::Object(obj) => {
            if obj.len() != 1 {
                return Err(format!(
                    "field `{at}`: a shape object must have exactly one key"
                ));
            }
            let (key, inner) = obj.iter().next().expect("length checked above");
            match key.as_str() {
                "boxed" => {
                    let Value::String(token) = inner else {
                        return Err(format!("field `{at}`: `boxed` takes a scalar token"));
                    };
                    let scalar = ScalarType::from_token(token).ok_or_else(|| {
                        format!("field `{at}`: `{token}` is not a scalar token")
                    })?;
                    Ok(FieldShape::Boxed(scalar))
                }
                "array" => Ok(FieldShape::Array(Box::new(parse_shape(inner, at)?))),
                "list" => Ok(FieldShape::List(Box::new(parse_shape(inner, at)?))),
                "map" => {
                    let Value::Array(pair) = inner else {
                        return Err(format!(
                            "field `{at}`: `map` takes a two-element [key, value] array"
                        ));
                    };
                    let [key_shape, value_shape] = pair.as_slice() else {
                        return Err(format!(
                            "field `{at}`: `map` takes a two-element [key, value] array"
                        ));
                    };
                    Ok(FieldShape::Map(
                        Box::new(parse_shape(key_shape, at)?),
                        Box::new(parse_shape(value_shape, at)?),
                    ))
                }
                "ref" => match inner {
                    Value::String(name) => Ok(FieldShape::Ref(TypeRef::new(name.clone()))),
                    Value::Object(ref_obj) => {
                        let name = require_string(ref_obj.get("name"), at, "`ref.name`")?;
                        let qualified =
                            optional_string(ref_obj.get("fullName"), at, "`ref.fullName`")?;
                        Ok(FieldShape::Ref(TypeRef { name, qualified }))
                    }
                    _ => Err(format!(
                        "field `{at}`: `ref` takes a name string or an object"
                    )),
                },
                other => Err(format!("field `{at}`: unknown shape key `{other}`")),
            }
        }
        _ => Err(format!(
            "field `{at}`: shape must be a string or a shape object"
        )),
    }
}

/// Enum underlying types are the integral and floating scalars; `bool` and
/// `string` cannot back an enum.
fn parse_underlying(token: &str, type_name: &str) -> Result<ScalarType, String> {
    match ScalarType::from_token(token) {
        Some(ScalarType::Bool | ScalarType::String) | None => Err(format!(
            "type `{type_name}`: `{token}` is not a valid underlying type \
             (expected byte, short, int, long, float, or double)"
        )),
        Some(scalar) => Ok(scalar),
    }
}

fn require_string(
    value: Option<&Value>,
    at: &str,
    what: &str,
) -> Result<String, String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(format!("`{at}`: {what} must not be empty")),
        Some(_) => Err(format!("`{at}`: {what} must be a string")),
        None => Err(format!("`{at}`: {what} is required")),
    }
}

fn optional_string(
    value: Option<&Value>,
    at: &str,
    what: &str,
) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("`{at}`: {what} must be a string")),
    }
}

fn optional_bool(value: Option<&Value>, at: &str, what: &str) -> Result<Option<bool>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(format!("`{at}`: {what} must be a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> DescriptorSet {
        parse_descriptor_set(input, "<test>").expect("document should parse")
    }

    fn parse_err(input: &str) -> String {
        parse_descriptor_set(input, "<test>")
            .expect_err("document should be rejected")
            .to_string()
    }

    #[test]
    fn parses_a_minimal_document() {
        let set = parse(r#"{ "namespace": "com.example:app", "types": [] }"#);
        assert_eq!(set.namespace.as_deref(), Some("com.example:app"));
        assert_eq!(set.file_identifier, None);
        assert!(set.types.is_empty());
    }

    #[test]
    fn strips_c_style_comments() {
        let set = parse(
            r#"{
                // emitted by discovery v2
                "namespace": "com.example", /* three-part form unused */
                "types": []
            }"#,
        );
        assert_eq!(set.namespace.as_deref(), Some("com.example"));
    }

    #[test]
    fn parses_records_with_all_field_forms() {
        let set = parse(
            r#"{
                "types": [{
                    "kind": "table", "name": "Request", "root": true,
                    "fields": [
                        { "name": "state", "shape": "UserState" },
                        { "name": "id", "shape": "long", "default": 0 },
                        { "name": "tags", "shape": { "list": "string" } },
                        { "name": "hash", "shape": { "array": "byte" } },
                        { "name": "age", "shape": { "boxed": "int" } },
                        { "name": "attrs", "shape": { "map": ["string", "int"] } },
                        { "name": "wallet",
                          "shape": { "ref": { "name": "Wallet", "fullName": "com.w.Wallet" } },
                          "useFullName": true }
                    ]
                }]
            }"#,
        );
        let TypeDescriptor::Record(record) = &set.types[0] else {
            panic!("expected a record descriptor");
        };
        assert_eq!(record.kind, TypeKind::Table);
        assert!(record.root);
        assert_eq!(record.fields.len(), 7);
        assert_eq!(
            record.fields[0].shape,
            FieldShape::Ref(TypeRef::new("UserState"))
        );
        assert_eq!(record.fields[1].default_value.as_deref(), Some("0"));
        assert_eq!(
            record.fields[2].shape,
            FieldShape::List(Box::new(FieldShape::Scalar(ScalarType::String)))
        );
        assert_eq!(
            record.fields[3].shape,
            FieldShape::Array(Box::new(FieldShape::Scalar(ScalarType::Byte)))
        );
        assert_eq!(record.fields[4].shape, FieldShape::Boxed(ScalarType::Int));
        assert_eq!(
            record.fields[5].shape,
            FieldShape::Map(
                Box::new(FieldShape::Scalar(ScalarType::String)),
                Box::new(FieldShape::Scalar(ScalarType::Int)),
            )
        );
        let wallet = &record.fields[6];
        assert!(wallet.use_full_name);
        assert_eq!(
            wallet.shape,
            FieldShape::Ref(TypeRef::qualified("Wallet", "com.w.Wallet"))
        );
    }

    #[test]
    fn ignored_fields_never_reach_the_model() {
        let set = parse(
            r#"{
                "types": [{
                    "kind": "table", "name": "Request",
                    "fields": [
                        { "name": "kept", "shape": "int" },
                        { "name": "dropped", "shape": "int", "ignore": true }
                    ]
                }]
            }"#,
        );
        let TypeDescriptor::Record(record) = &set.types[0] else {
            panic!("expected a record descriptor");
        };
        let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["kept"]);
    }

    #[test]
    fn parses_enums_and_unions() {
        let set = parse(
            r#"{
                "types": [
                    { "kind": "enum", "name": "UserState", "underlying": "short",
                      "values": ["GUEST", "ACTIVE"] },
                    { "kind": "union", "name": "Payload",
                      "values": ["Request", "Response"] }
                ]
            }"#,
        );
        let TypeDescriptor::Enum(state) = &set.types[0] else {
            panic!("expected an enum descriptor");
        };
        assert_eq!(state.kind, EnumKind::Enum);
        assert_eq!(state.underlying, Some(ScalarType::Short));
        assert_eq!(state.values, vec!["GUEST", "ACTIVE"]);

        let TypeDescriptor::Enum(payload) = &set.types[1] else {
            panic!("expected a union descriptor");
        };
        assert_eq!(payload.kind, EnumKind::Union);
        assert_eq!(payload.underlying, None);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = parse_err(r#"{ "types": [{ "kind": "message", "name": "Oops" }] }"#);
        insta::assert_snapshot!(
            err,
            @"invalid descriptor document <test>: type `Oops`: unknown kind `message` (expected `table`, `struct`, `enum`, or `union`)"
        );
    }

    #[test]
    fn rejects_invalid_underlying_type() {
        let err = parse_err(
            r#"{ "types": [{ "kind": "enum", "name": "S", "underlying": "string" }] }"#,
        );
        insta::assert_snapshot!(
            err,
            @"invalid descriptor document <test>: type `S`: `string` is not a valid underlying type (expected byte, short, int, long, float, or double)"
        );
    }

    #[test]
    fn rejects_missing_shape() {
        let err = parse_err(
            r#"{ "types": [{ "kind": "table", "name": "T", "fields": [{ "name": "x" }] }] }"#,
        );
        assert!(err.contains("field `T.x`: `shape` is required"), "{err}");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_descriptor_set("{", "<test>").is_err());
        assert!(parse_descriptor_set("[1, 2]", "<test>").is_err());
    }

    #[test]
    fn rejects_bad_map_shape() {
        let err = parse_err(
            r#"{ "types": [{ "kind": "table", "name": "T",
                 "fields": [{ "name": "m", "shape": { "map": ["string"] } }] }] }"#,
        );
        assert!(
            err.contains("`map` takes a two-element [key, value] array"),
            "{err}"
        );
    }

    #[test]
    fn rejects_empty_type_name() {
        let err = parse_err(r#"{ "types": [{ "kind": "table", "name": "" }] }"#);
        assert!(err.contains("must not be empty"), "{err}");
    }

    #[test]
    fn in_memory_source_round_trips() {
        let set = parse(r#"{ "namespace": ":app", "types": [] }"#);
        let source = InMemorySource::new(set.clone());
        assert_eq!(source.load().expect("in-memory load is infallible"), set);
    }
}
