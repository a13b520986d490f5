// ==============================================================================
// Library API: the `Schemagen` Builder
// ==============================================================================
//
// The public entry point for schema synthesis. Follows the non-consuming
// `&mut self` builder pattern (C-BUILDER), so one configured builder can be
// reused across multiple calls. All per-run state (descriptor sets, schema,
// warnings) is created fresh per call; the builder itself only owns
// configuration and the warnings of the most recent run.
//
// Warnings are kept even when a call returns `Err`, so a CLI can print what
// was learned before the failure; `drain_warnings` hands them out.

use std::path::{Path, PathBuf};

use crate::consolidate::{Directives, consolidate};
use crate::import::{
    DescriptorSource, load_artifact_sets, load_descriptor_file, parse_descriptor_set,
};
use crate::model::declaration::Schema;
use crate::model::descriptor::DescriptorSet;
use crate::model::namespace::Namespace;
use crate::model::text::schema_to_text;

/// Builder for synthesizing schema text from descriptor documents.
///
/// # Examples
///
/// ```no_run
/// use fbsgen::Schemagen;
///
/// // One-liner with chaining:
/// let output = Schemagen::new()
///     .artifact_dir("build/descriptors/deps/")
///     .generate("build/descriptors/app.json")?;
/// std::fs::write(&output.file_name, &output.text)?;
///
/// // Multi-step configuration:
/// let mut generator = Schemagen::new();
/// generator.artifact_dir("build/descriptors/deps/");
/// generator.file_identifier("MONS");
/// let output = generator.generate("build/descriptors/app.json")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Schemagen {
    artifact_dirs: Vec<PathBuf>,
    file_identifier: Option<String>,
    /// Warnings accumulated during the most recent `generate*` call.
    /// Populated even when the call returns `Err`, so the CLI can emit
    /// warnings before propagating the error.
    accumulated_warnings: Vec<miette::Report>,
}

/// Result of a successful synthesis run.
pub struct SchemaOutput {
    /// The rendered schema text.
    pub text: String,
    /// Suggested output filename for the file-writing caller, derived from
    /// the primary namespace (`<identifier>.fbs`, falling back to the last
    /// group segment, then `schema.fbs`).
    pub file_name: String,
    /// Non-fatal warnings from consolidation (dropped fields, ignored
    /// root-type claims, ignored file identifiers).
    ///
    /// Each warning is a [`miette::Report`] with `Severity::Warning` set.
    /// Print with `eprintln!("{report:?}")` for rich diagnostic output.
    pub warnings: Vec<miette::Report>,
}

/// Shows the text and warning count without dumping the full graphical
/// rendering of every `miette::Report` (whose `Debug` impl is verbose).
impl std::fmt::Debug for SchemaOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaOutput")
            .field("text", &self.text)
            .field("file_name", &self.file_name)
            .field(
                "warnings",
                &format_args!("[{} warnings]", self.warnings.len()),
            )
            .finish()
    }
}

impl Default for Schemagen {
    fn default() -> Self {
        Self::new()
    }
}

impl Schemagen {
    /// Create a builder with no artifact directories and no directives.
    pub fn new() -> Schemagen {
        Schemagen {
            artifact_dirs: Vec::new(),
            file_identifier: None,
            accumulated_warnings: Vec::new(),
        }
    }

    /// Add a directory to scan for dependency artifact descriptor documents
    /// (`*.json`, walked in sorted order). Scanned after the primary
    /// document, in the order added.
    pub fn artifact_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.artifact_dirs.push(dir.into());
        self
    }

    /// Set the file-identifier directive, overriding any value carried by the
    /// primary descriptor document. Values not exactly 4 characters long are
    /// ignored with a warning.
    pub fn file_identifier(&mut self, identifier: impl Into<String>) -> &mut Self {
        self.file_identifier = Some(identifier.into());
        self
    }

    /// Drain warnings accumulated during the most recent `generate*` call.
    ///
    /// When a call returns `Ok`, the same warnings are in
    /// [`SchemaOutput::warnings`]. When it returns `Err`, this method is the
    /// only way to retrieve the warnings collected before the failure. Each
    /// call drains the buffer, so a second call returns an empty `Vec`.
    pub fn drain_warnings(&mut self) -> Vec<miette::Report> {
        std::mem::take(&mut self.accumulated_warnings)
    }

    /// Synthesize schema text from a primary descriptor document on disk,
    /// plus any documents found in the configured artifact directories.
    pub fn generate(&mut self, path: impl AsRef<Path>) -> miette::Result<SchemaOutput> {
        self.accumulated_warnings.clear();
        let primary = load_descriptor_file(path.as_ref())?;
        self.generate_impl(primary)
    }

    /// Synthesize schema text from descriptor document text. Uses `"<input>"`
    /// as the document origin in diagnostics.
    pub fn generate_str(&mut self, source: &str) -> miette::Result<SchemaOutput> {
        self.generate_str_named(source, "<input>")
    }

    /// Synthesize schema text from descriptor document text with a custom
    /// origin name for diagnostics.
    pub fn generate_str_named(
        &mut self,
        source: &str,
        origin: &str,
    ) -> miette::Result<SchemaOutput> {
        self.accumulated_warnings.clear();
        let primary = parse_descriptor_set(source, origin)?;
        self.generate_impl(primary)
    }

    /// Synthesize schema text from already-loaded descriptor sets. The first
    /// set is the primary source; artifact directories configured on the
    /// builder are still scanned and appended after it.
    pub fn generate_sets(&mut self, sets: Vec<DescriptorSet>) -> miette::Result<SchemaOutput> {
        self.accumulated_warnings.clear();
        let mut sources = sets;
        sources.extend(load_artifact_sets(&self.artifact_dirs)?);
        self.finish(sources)
    }

    /// Synthesize schema text from [`DescriptorSource`] providers, loading
    /// each in order. The first source is the primary one; artifact
    /// directories configured on the builder are still scanned and appended
    /// after it.
    pub fn generate_sources(
        &mut self,
        providers: &[&dyn DescriptorSource],
    ) -> miette::Result<SchemaOutput> {
        self.accumulated_warnings.clear();
        let mut sources = Vec::with_capacity(providers.len());
        for provider in providers {
            sources.push(provider.load()?);
        }
        sources.extend(load_artifact_sets(&self.artifact_dirs)?);
        self.finish(sources)
    }

    fn generate_impl(&mut self, primary: DescriptorSet) -> miette::Result<SchemaOutput> {
        let mut sources = vec![primary];
        sources.extend(load_artifact_sets(&self.artifact_dirs)?);
        self.finish(sources)
    }

    fn finish(&mut self, sources: Vec<DescriptorSet>) -> miette::Result<SchemaOutput> {
        let directives = Directives {
            file_identifier: self.file_identifier.clone(),
        };
        let (schema, warnings) = consolidate(&sources, &directives);

        let text = match schema_to_text(&schema) {
            Ok(text) => text,
            Err(e) => {
                // Stash warnings before returning the error so they remain
                // available via `drain_warnings()`.
                self.accumulated_warnings = warnings;
                return Err(e.into());
            }
        };

        Ok(SchemaOutput {
            text,
            file_name: output_file_name(&schema),
            warnings,
        })
    }
}

/// Derive the suggested `.fbs` filename from the primary namespace: the
/// identifier component, else the last dot-segment of the group, else
/// `schema`.
fn output_file_name(schema: &Schema) -> String {
    let stem = namespace_stem(schema.namespace());
    format!("{stem}.fbs")
}

fn namespace_stem(namespace: &Namespace) -> &str {
    if let Some(identifier) = namespace.identifier() {
        return identifier;
    }
    if let Some(group) = namespace.group() {
        return group.rsplit('.').next().expect("rsplit yields at least one piece");
    }
    "schema"
}
