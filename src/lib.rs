//! FlatBuffers schema generator — synthesize `.fbs` schema text from
//! data-model type descriptors.
//!
//! Annotated data classes are discovered externally (in the project's own
//! source tree and in its compiled dependency artifacts) and serialized into
//! JSON descriptor documents; this crate turns those documents into one
//! consistent, deduplicated schema: every field's declared shape is resolved
//! to a canonical schema type, declarations from all sources are merged under
//! name-based identity, and the result is rendered as canonical schema text
//! for a downstream schema compiler.
//!
//! The main entry point is the [`Schemagen`] builder, a non-consuming builder
//! that can be reused across multiple calls.
//!
//! # Generating a schema
//!
//! ```no_run
//! use fbsgen::Schemagen;
//!
//! let output = Schemagen::new()
//!     .artifact_dir("build/descriptors/deps/")
//!     .generate("build/descriptors/app.json")?;
//! std::fs::write(&output.file_name, &output.text)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Programmatic descriptor sets
//!
//! Callers that already hold descriptors in memory can skip the JSON layer
//! entirely and hand [`model::descriptor::DescriptorSet`] values to
//! [`Schemagen::generate_sets`]; the first set is the primary (local project)
//! source.
//!
//! # Error handling
//!
//! All fallible methods return [`miette::Result`]. Recoverable conditions —
//! a field referencing an undiscovered type, a second root-type claim, an
//! invalid file identifier — do not fail the run; they surface as
//! warning-severity [`miette::Report`]s on the output (or via
//! [`Schemagen::drain_warnings`] after a failure).

pub mod consolidate;
pub mod error;
pub mod import;
pub mod model;
pub mod registry;

pub(crate) mod compiler;
pub(crate) mod resolve;
pub(crate) mod suggest;

// Re-export the small number of public API at the crate root.
pub use compiler::{Schemagen, SchemaOutput};
