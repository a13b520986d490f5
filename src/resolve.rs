// ==============================================================================
// Type Resolver: Declared Field Shapes to Canonical Schema Type Tokens
// ==============================================================================
//
// Each field's declared shape (scalar, boxed scalar, array, collection, map,
// or reference to another declaration) is mapped to the token that will appear
// in the rendered schema text. Three rules matter:
//
// - Resolution never fails on a reference to an undiscovered type. The token
//   is produced from the referenced name regardless, and every referenced
//   simple name is reported back in `Resolved::references` so the
//   consolidator can decide to keep the field or drop it. Keeping that
//   decision out of the resolver lets one field's gap leave the rest of the
//   declaration intact.
// - Arrays and single-element generic collections are the same thing here:
//   a vector of the recursively-resolved element.
// - The target vocabulary has no map type. A map field resolves to a vector
//   of a synthesized two-field entry table (`<Parent><Field>Entry`), returned
//   in `Resolved::synthesized` for the consolidator to register through the
//   normal name-deduplication path.

use crate::model::declaration::{FieldDeclaration, SchemaType, TypeDeclaration, TypeKind};
use crate::model::descriptor::{FieldDescriptor, FieldShape};
use crate::registry::DescriptorIndex;

/// The outcome of resolving one field.
pub(crate) struct Resolved {
    pub ty: SchemaType,
    /// Simple names of every declaration this type refers to, including
    /// references nested in vectors and synthesized entry tables. The
    /// consolidator checks each against the descriptor index.
    pub references: Vec<String>,
    /// Entry tables synthesized for map shapes, innermost first.
    pub synthesized: Vec<TypeDeclaration>,
}

/// Resolve a field of the declaration named `parent`.
pub(crate) fn resolve_field(
    parent: &str,
    field: &FieldDescriptor,
    index: &DescriptorIndex<'_>,
) -> Resolved {
    let mut references = Vec::new();
    let mut synthesized = Vec::new();
    let seed = format!("{parent}{}", pascal_case(&field.name));
    let ty = resolve_shape(
        &field.shape,
        &seed,
        field.use_full_name,
        index,
        &mut references,
        &mut synthesized,
    );
    Resolved {
        ty,
        references,
        synthesized,
    }
}

/// Recursive worker. `seed` names any entry table synthesized at this
/// position; nested maps extend it (`…KeyEntry`, `…ValueEntry`) so every
/// synthesized name stays distinct within one field.
fn resolve_shape(
    shape: &FieldShape,
    seed: &str,
    use_full_name: bool,
    index: &DescriptorIndex<'_>,
    references: &mut Vec<String>,
    synthesized: &mut Vec<TypeDeclaration>,
) -> SchemaType {
    match shape {
        // Boxed wrappers carry no schema-level meaning; both map 1:1 onto
        // the scalar vocabulary.
        FieldShape::Scalar(scalar) | FieldShape::Boxed(scalar) => SchemaType::Scalar(*scalar),
        FieldShape::Array(element) | FieldShape::List(element) => {
            let element = resolve_shape(
                element,
                seed,
                use_full_name,
                index,
                references,
                synthesized,
            );
            SchemaType::Vector(Box::new(element))
        }
        FieldShape::Map(key, value) => {
            let key_ty = resolve_shape(
                key,
                &format!("{seed}Key"),
                use_full_name,
                index,
                references,
                synthesized,
            );
            let value_ty = resolve_shape(
                value,
                &format!("{seed}Value"),
                use_full_name,
                index,
                references,
                synthesized,
            );
            let entry_name = format!("{seed}Entry");
            synthesized.push(TypeDeclaration {
                name: entry_name.clone(),
                kind: TypeKind::Table,
                root_type: false,
                fields: vec![
                    FieldDeclaration {
                        name: "key".to_string(),
                        schema_type: key_ty,
                        default_value: None,
                        comment: None,
                    },
                    FieldDeclaration {
                        name: "value".to_string(),
                        schema_type: value_ty,
                        default_value: None,
                        comment: None,
                    },
                ],
                comment: None,
            });
            SchemaType::Vector(Box::new(SchemaType::Ref(entry_name)))
        }
        FieldShape::Ref(type_ref) => {
            references.push(type_ref.name.clone());
            let token = if use_full_name {
                // The index's record of the referenced type is authoritative;
                // the reference's own qualified name covers types the index
                // has not seen. Without either, the simple name still renders
                // a usable token.
                index
                    .full_name_of(&type_ref.name)
                    .map(str::to_string)
                    .or_else(|| type_ref.qualified.clone())
                    .unwrap_or_else(|| type_ref.name.clone())
            } else {
                type_ref.name.clone()
            };
            SchemaType::Ref(token)
        }
    }
}

/// Upper-case the first letter of each `_`-separated or camelCase-initial
/// segment, producing a PascalCase fragment for synthesized entry names.
fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for segment in name.split('_').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::declaration::ScalarType;
    use crate::model::descriptor::{DescriptorSet, RecordDescriptor, TypeDescriptor, TypeRef};

    fn sources_with(types: Vec<TypeDescriptor>) -> Vec<DescriptorSet> {
        vec![DescriptorSet {
            origin: "<memory>".to_string(),
            namespace: None,
            file_identifier: None,
            types,
        }]
    }

    fn record(name: &str, full_name: Option<&str>) -> TypeDescriptor {
        TypeDescriptor::Record(RecordDescriptor {
            name: name.to_string(),
            full_name: full_name.map(str::to_string),
            kind: TypeKind::Table,
            root: false,
            comment: None,
            fields: Vec::new(),
        })
    }

    fn field(name: &str, shape: FieldShape) -> FieldDescriptor {
        FieldDescriptor::new(name, shape)
    }

    #[test]
    fn scalars_and_boxed_scalars_share_tokens() {
        let sources = sources_with(Vec::new());
        let index = DescriptorIndex::new(&sources);
        for (shape, token) in [
            (FieldShape::Scalar(ScalarType::Bool), "bool"),
            (FieldShape::Boxed(ScalarType::Bool), "bool"),
            (FieldShape::Scalar(ScalarType::Long), "long"),
            (FieldShape::Boxed(ScalarType::Long), "long"),
            (FieldShape::Scalar(ScalarType::String), "string"),
        ] {
            let resolved = resolve_field("Request", &field("x", shape), &index);
            assert_eq!(resolved.ty.to_string(), token);
            assert!(resolved.references.is_empty());
            assert!(resolved.synthesized.is_empty());
        }
    }

    #[test]
    fn arrays_and_collections_both_become_vectors() {
        let sources = sources_with(Vec::new());
        let index = DescriptorIndex::new(&sources);
        let array = field(
            "scores",
            FieldShape::Array(Box::new(FieldShape::Scalar(ScalarType::Int))),
        );
        let list = field(
            "scores",
            FieldShape::List(Box::new(FieldShape::Scalar(ScalarType::Int))),
        );
        assert_eq!(resolve_field("Request", &array, &index).ty.to_string(), "[int]");
        assert_eq!(resolve_field("Request", &list, &index).ty.to_string(), "[int]");
    }

    #[test]
    fn vectors_of_references_resolve_recursively() {
        let sources = sources_with(vec![record("Wallet", None)]);
        let index = DescriptorIndex::new(&sources);
        let f = field(
            "wallets",
            FieldShape::List(Box::new(FieldShape::Ref(TypeRef::new("Wallet")))),
        );
        let resolved = resolve_field("Request", &f, &index);
        assert_eq!(resolved.ty.to_string(), "[Wallet]");
        assert_eq!(resolved.references, vec!["Wallet"]);
    }

    #[test]
    fn references_use_simple_names_by_default() {
        let sources = sources_with(vec![record("Wallet", Some("com.example.wallet.Wallet"))]);
        let index = DescriptorIndex::new(&sources);
        let resolved = resolve_field(
            "Request",
            &field("wallet", FieldShape::Ref(TypeRef::new("Wallet"))),
            &index,
        );
        assert_eq!(resolved.ty, SchemaType::Ref("Wallet".to_string()));
    }

    #[test]
    fn full_name_requests_emit_the_qualified_token() {
        let sources = sources_with(vec![record("Wallet", Some("com.example.wallet.Wallet"))]);
        let index = DescriptorIndex::new(&sources);
        let mut f = field("wallet", FieldShape::Ref(TypeRef::new("Wallet")));
        f.use_full_name = true;
        let resolved = resolve_field("Request", &f, &index);
        assert_eq!(
            resolved.ty,
            SchemaType::Ref("com.example.wallet.Wallet".to_string())
        );
        // Gap checking still keys on the simple name.
        assert_eq!(resolved.references, vec!["Wallet"]);
    }

    #[test]
    fn full_name_falls_back_to_the_reference_then_simple() {
        let sources = sources_with(Vec::new());
        let index = DescriptorIndex::new(&sources);

        let mut f = field(
            "wallet",
            FieldShape::Ref(TypeRef::qualified("Wallet", "com.dep.Wallet")),
        );
        f.use_full_name = true;
        let resolved = resolve_field("Request", &f, &index);
        assert_eq!(resolved.ty, SchemaType::Ref("com.dep.Wallet".to_string()));

        let mut bare = field("wallet", FieldShape::Ref(TypeRef::new("Wallet")));
        bare.use_full_name = true;
        let resolved = resolve_field("Request", &bare, &index);
        assert_eq!(resolved.ty, SchemaType::Ref("Wallet".to_string()));
    }

    #[test]
    fn undiscovered_references_still_resolve_to_a_token() {
        let sources = sources_with(Vec::new());
        let index = DescriptorIndex::new(&sources);
        let resolved = resolve_field(
            "Request",
            &field("mystery", FieldShape::Ref(TypeRef::new("Undiscovered"))),
            &index,
        );
        // The resolver defers the include/skip decision: token produced,
        // reference reported.
        assert_eq!(resolved.ty, SchemaType::Ref("Undiscovered".to_string()));
        assert_eq!(resolved.references, vec!["Undiscovered"]);
    }

    #[test]
    fn maps_synthesize_an_entry_table() {
        let sources = sources_with(Vec::new());
        let index = DescriptorIndex::new(&sources);
        let f = field(
            "attrs",
            FieldShape::Map(
                Box::new(FieldShape::Scalar(ScalarType::String)),
                Box::new(FieldShape::Scalar(ScalarType::Int)),
            ),
        );
        let resolved = resolve_field("Request", &f, &index);
        assert_eq!(resolved.ty.to_string(), "[RequestAttrsEntry]");

        assert_eq!(resolved.synthesized.len(), 1);
        let entry = &resolved.synthesized[0];
        assert_eq!(entry.name, "RequestAttrsEntry");
        assert_eq!(entry.kind, TypeKind::Table);
        assert!(!entry.root_type);
        let fields: Vec<_> = entry
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.schema_type.to_string()))
            .collect();
        assert_eq!(
            fields,
            vec![("key", "string".to_string()), ("value", "int".to_string())]
        );
    }

    #[test]
    fn entry_names_pascal_case_snake_case_fields() {
        let sources = sources_with(Vec::new());
        let index = DescriptorIndex::new(&sources);
        let f = field(
            "wallet_balances",
            FieldShape::Map(
                Box::new(FieldShape::Scalar(ScalarType::String)),
                Box::new(FieldShape::Scalar(ScalarType::Long)),
            ),
        );
        let resolved = resolve_field("Account", &f, &index);
        assert_eq!(resolved.ty.to_string(), "[AccountWalletBalancesEntry]");
    }

    #[test]
    fn nested_maps_synthesize_distinct_entries() {
        let sources = sources_with(Vec::new());
        let index = DescriptorIndex::new(&sources);
        let f = field(
            "attrs",
            FieldShape::Map(
                Box::new(FieldShape::Scalar(ScalarType::String)),
                Box::new(FieldShape::Map(
                    Box::new(FieldShape::Scalar(ScalarType::String)),
                    Box::new(FieldShape::Scalar(ScalarType::Int)),
                )),
            ),
        );
        let resolved = resolve_field("Request", &f, &index);
        assert_eq!(resolved.ty.to_string(), "[RequestAttrsEntry]");
        let names: Vec<_> = resolved.synthesized.iter().map(|t| t.name.as_str()).collect();
        // Innermost first: the value map's entry exists before the table that
        // refers to it.
        assert_eq!(names, vec!["RequestAttrsValueEntry", "RequestAttrsEntry"]);
        let outer = &resolved.synthesized[1];
        assert_eq!(outer.fields[1].schema_type.to_string(), "[RequestAttrsValueEntry]");
    }

    #[test]
    fn map_of_references_reports_the_reference() {
        let sources = sources_with(vec![record("Wallet", None)]);
        let index = DescriptorIndex::new(&sources);
        let f = field(
            "wallets",
            FieldShape::Map(
                Box::new(FieldShape::Scalar(ScalarType::String)),
                Box::new(FieldShape::Ref(TypeRef::new("Wallet"))),
            ),
        );
        let resolved = resolve_field("Request", &f, &index);
        assert_eq!(resolved.references, vec!["Wallet"]);
        assert_eq!(
            resolved.synthesized[0].fields[1].schema_type,
            SchemaType::Ref("Wallet".to_string())
        );
    }

    #[test]
    fn pascal_case_segments() {
        assert_eq!(pascal_case("attrs"), "Attrs");
        assert_eq!(pascal_case("wallet_balances"), "WalletBalances");
        assert_eq!(pascal_case("walletBalances"), "WalletBalances");
        assert_eq!(pascal_case("__x"), "X");
        assert_eq!(pascal_case(""), "");
    }
}
