// ==============================================================================
// Consolidation: Descriptor Sets from All Sources into One Closed Schema
// ==============================================================================
//
// The working set is seeded with every descriptor from every source — the
// local project document first, dependency artifact documents after, in the
// deterministic order the loader produced. Registration walks that seed order,
// so duplicate names across sources always resolve the same way: the first
// registration wins and the local project beats any dependency.
//
// Field references are checked against the full descriptor index. A reference
// to a name no source declared is a resolution gap: the field is dropped and
// a warning is surfaced, but the declaration — and the rest of the schema —
// still generate. An unresolved nested type must not block schema generation
// for the rest of the model.
//
// References are plain name strings and registration is keyed by name, so a
// cyclic reference graph (A contains B contains A) consolidates in one pass
// with no re-traversal.

use miette::Report;

use crate::error::SynthWarning;
use crate::model::declaration::{
    Declaration, EnumDeclaration, FieldDeclaration, ScalarType, Schema, TypeDeclaration,
};
use crate::model::descriptor::{DescriptorSet, EnumDescriptor, RecordDescriptor, TypeDescriptor};
use crate::model::namespace::Namespace;
use crate::registry::DescriptorIndex;
use crate::resolve::resolve_field;
use crate::suggest::closest_match;

/// Optional knobs applied on top of what the descriptor documents carry.
#[derive(Debug, Default)]
pub struct Directives {
    /// Overrides the primary document's file identifier. Subject to the same
    /// exactly-4-characters invariant; an invalid override leaves the
    /// document's value in place.
    pub file_identifier: Option<String>,
}

/// Merge the given sources into one schema. The first source is the primary
/// (local project) one: it alone contributes the namespace statement and the
/// document-level file identifier.
///
/// Warnings report recoverable conditions (dropped fields, ignored root-type
/// claims, ignored file identifiers); the schema itself is always produced.
pub fn consolidate(
    sources: &[DescriptorSet],
    directives: &Directives,
) -> (Schema, Vec<Report>) {
    let mut warnings = Vec::new();

    let namespace = sources
        .first()
        .and_then(|s| s.namespace.as_deref())
        .and_then(Namespace::parse)
        .unwrap_or_else(Namespace::empty);
    let mut schema = Schema::new(namespace);

    // Document value first, directive override second; both are no-ops when
    // the 4-character invariant fails.
    if let Some(identifier) = sources.first().and_then(|s| s.file_identifier.as_deref())
        && !schema.set_file_identifier(identifier)
    {
        warnings.push(Report::new(SynthWarning::new(format!(
            "file identifier `{identifier}` is not exactly 4 characters; ignored"
        ))));
    }
    if let Some(identifier) = directives.file_identifier.as_deref()
        && !schema.set_file_identifier(identifier)
    {
        warnings.push(Report::new(SynthWarning::new(format!(
            "file identifier `{identifier}` is not exactly 4 characters; ignored"
        ))));
    }

    let index = DescriptorIndex::new(sources);
    let mut root_claimed: Option<String> = None;

    for source in sources {
        for descriptor in &source.types {
            // First registration of a name wins; later same-named
            // descriptors are dropped without a diagnostic.
            if schema.contains(descriptor.name()) {
                continue;
            }
            match descriptor {
                TypeDescriptor::Enum(desc) => {
                    schema.insert(Declaration::Enum(build_enum(desc)));
                }
                TypeDescriptor::Record(desc) => {
                    let declaration =
                        build_record(desc, &index, &mut schema, &mut root_claimed, &mut warnings);
                    schema.insert(Declaration::Type(declaration));
                }
            }
        }
    }

    (schema, warnings)
}

fn build_enum(desc: &EnumDescriptor) -> EnumDeclaration {
    EnumDeclaration {
        name: desc.name.clone(),
        kind: desc.kind,
        // Byte is the smallest representation and the default.
        underlying: desc.underlying.unwrap_or(ScalarType::Byte),
        values: desc.values.clone(),
        comment: desc.comment.clone(),
    }
}

fn build_record(
    desc: &RecordDescriptor,
    index: &DescriptorIndex<'_>,
    schema: &mut Schema,
    root_claimed: &mut Option<String>,
    warnings: &mut Vec<Report>,
) -> TypeDeclaration {
    let mut fields = Vec::with_capacity(desc.fields.len());
    for field in &desc.fields {
        let resolved = resolve_field(&desc.name, field, index);

        let missing: Vec<&str> = resolved
            .references
            .iter()
            .map(String::as_str)
            .filter(|name| !index.contains(name))
            .collect();
        if !missing.is_empty() {
            warnings.push(gap_warning(&desc.name, &field.name, &missing, index));
            continue;
        }

        // Entry tables synthesized for map fields go through the same
        // name-keyed, first-wins registration as everything else.
        for entry in resolved.synthesized {
            schema.insert(Declaration::Type(entry));
        }
        fields.push(FieldDeclaration {
            name: field.name.clone(),
            schema_type: resolved.ty,
            default_value: field.default_value.clone(),
            comment: field.comment.clone(),
        });
    }

    let root_type = if desc.root {
        match root_claimed {
            None => {
                *root_claimed = Some(desc.name.clone());
                true
            }
            Some(winner) => {
                warnings.push(Report::new(SynthWarning::new(format!(
                    "root type already claimed by `{winner}`; \
                     ignoring the claim by `{}`",
                    desc.name
                ))));
                false
            }
        }
    } else {
        false
    };

    TypeDeclaration {
        name: desc.name.clone(),
        kind: desc.kind,
        root_type,
        fields,
        comment: desc.comment.clone(),
    }
}

/// Warning for a field dropped over references to undiscovered types, with a
/// near-name suggestion when one of the missing names looks like a typo.
fn gap_warning(
    type_name: &str,
    field_name: &str,
    missing: &[&str],
    index: &DescriptorIndex<'_>,
) -> Report {
    let listed = missing
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let plural = if missing.len() == 1 { "type" } else { "types" };
    let mut warning = SynthWarning::new(format!(
        "type `{type_name}`: field `{field_name}` references undiscovered {plural} {listed}; \
         field omitted from the schema"
    ));
    if let Some(suggestion) = missing
        .iter()
        .find_map(|name| closest_match(name, index.names()))
    {
        warning = warning.with_help(format!("did you mean `{suggestion}`?"));
    }
    Report::new(warning)
}
