// ==============================================================================
// Text Serialization: Declaration Graph to Canonical Schema Text
// ==============================================================================
//
// Renders a consolidated `Schema` into the textual form the downstream schema
// compiler consumes. Structural order:
//
//   1. `namespace a.b.c;` — omitted entirely for an empty namespace
//   2. `file_identifier "XXXX";` — only present when the 4-character
//      invariant held at consolidation time
//   3. every enum/union block, in registration order
//   4. every table/struct block, in registration order; a declaration
//      holding the root-type marker is preceded by its `root_type Name;`
//      line
//
// Blocks are separated by one blank line, comment lines precede the
// declaration (and fields) they describe, and value lists never carry a
// trailing comma. A declaration with an empty name cannot be rendered into
// anything the downstream compiler would accept — the builder must not
// produce one, so rendering fails fast instead of emitting malformed text.

use std::fmt::Write;

use crate::error::SynthError;

use super::declaration::{EnumDeclaration, Schema, TypeDeclaration};

/// Render the schema to canonical text. The only error is the internal
/// empty-declaration-name defect.
pub fn schema_to_text(schema: &Schema) -> Result<String, SynthError> {
    let mut blocks: Vec<String> = Vec::new();

    if !schema.namespace().is_empty() {
        blocks.push(format!("namespace {};", schema.namespace()));
    }
    if let Some(identifier) = schema.file_identifier() {
        blocks.push(format!("file_identifier \"{identifier}\";"));
    }
    for declaration in schema.enums() {
        blocks.push(enum_block(declaration)?);
    }
    for declaration in schema.types() {
        blocks.push(type_block(declaration)?);
    }

    let mut text = blocks.join("\n\n");
    if !text.is_empty() {
        text.push('\n');
    }
    Ok(text)
}

/// `enum Name : byte { A, B }` or `union Name { A, B }`.
///
/// Unions get no underlying-type annotation: the target grammar does not
/// admit one, the tag type is implied.
fn enum_block(declaration: &EnumDeclaration) -> Result<String, SynthError> {
    if declaration.name.is_empty() {
        return Err(SynthError::UnnamedDeclaration {
            keyword: declaration.kind.keyword(),
        });
    }

    let mut block = String::new();
    push_comment(&mut block, declaration.comment.as_deref(), "");
    block.push_str(declaration.kind.keyword());
    block.push(' ');
    block.push_str(&declaration.name);
    if matches!(declaration.kind, super::declaration::EnumKind::Enum) {
        write!(block, " : {}", declaration.underlying.token())
            .expect("write to String is infallible");
    }
    if declaration.values.is_empty() {
        block.push_str(" {}");
    } else {
        write!(block, " {{ {} }}", declaration.values.join(", "))
            .expect("write to String is infallible");
    }
    Ok(block)
}

/// `table Name { field:type = default; … }`, multi-line, preceded by
/// `root_type Name;` when this declaration is the schema's entry point.
fn type_block(declaration: &TypeDeclaration) -> Result<String, SynthError> {
    if declaration.name.is_empty() {
        return Err(SynthError::UnnamedDeclaration {
            keyword: declaration.kind.keyword(),
        });
    }

    let mut block = String::new();
    push_comment(&mut block, declaration.comment.as_deref(), "");
    if declaration.root_type {
        writeln!(block, "root_type {};", declaration.name)
            .expect("write to String is infallible");
    }
    writeln!(
        block,
        "{} {} {{",
        declaration.kind.keyword(),
        declaration.name
    )
    .expect("write to String is infallible");
    for field in &declaration.fields {
        push_comment(&mut block, field.comment.as_deref(), "  ");
        write!(block, "  {}:{}", field.name, field.schema_type)
            .expect("write to String is infallible");
        if let Some(default) = &field.default_value {
            write!(block, " = {default}").expect("write to String is infallible");
        }
        block.push_str(";\n");
    }
    block.push('}');
    Ok(block)
}

/// Emit `// …` lines for a (possibly multi-line) comment.
fn push_comment(out: &mut String, comment: Option<&str>, indent: &str) {
    if let Some(comment) = comment {
        for line in comment.lines() {
            writeln!(out, "{indent}// {line}").expect("write to String is infallible");
        }
    }
}
