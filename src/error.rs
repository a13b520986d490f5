use miette::Severity;

/// Fatal defects in a synthesis run.
///
/// These abort the run: emitting malformed schema text is never acceptable,
/// and a malformed descriptor document means discovery and the engine
/// disagree about the input contract.
#[derive(Debug)]
pub enum SynthError {
    /// A declaration with an empty name reached the serializer. Names are
    /// assigned during consolidation, so this is an internal invariant
    /// violation, not a user error.
    UnnamedDeclaration {
        /// The block keyword of the offending declaration (`table`, `enum`, …).
        keyword: &'static str,
    },
    /// A descriptor document could not be understood.
    InvalidDescriptor {
        /// The document's origin (file path or `"<memory>"`).
        origin: String,
        message: String,
    },
}

impl std::fmt::Display for SynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthError::UnnamedDeclaration { keyword } => {
                write!(f, "cannot render a {keyword} declaration with an empty name")
            }
            SynthError::InvalidDescriptor { origin, message } => {
                write!(f, "invalid descriptor document {origin}: {message}")
            }
        }
    }
}

impl std::error::Error for SynthError {}

impl miette::Diagnostic for SynthError {}

/// A recoverable condition observed during consolidation, surfaced to the
/// caller as a `miette::Report` with warning severity rather than aborting
/// the run. The two producers are resolution gaps (a field referencing an
/// undiscovered type is dropped) and duplicate root-type claims (the later
/// claim is ignored).
#[derive(Debug)]
pub struct SynthWarning {
    pub message: String,
    /// Optional remediation hint, e.g. a "did you mean?" suggestion for a
    /// near-miss type name.
    pub help: Option<String>,
}

impl SynthWarning {
    pub fn new(message: impl Into<String>) -> SynthWarning {
        SynthWarning {
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> SynthWarning {
        self.help = Some(help.into());
        self
    }
}

impl std::fmt::Display for SynthWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SynthWarning {}

impl miette::Diagnostic for SynthWarning {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Warning)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_declaration_names_the_block_kind() {
        let err = SynthError::UnnamedDeclaration { keyword: "table" };
        insta::assert_snapshot!(
            err.to_string(),
            @"cannot render a table declaration with an empty name"
        );
    }

    #[test]
    fn invalid_descriptor_includes_origin() {
        let err = SynthError::InvalidDescriptor {
            origin: "deps/wallet.json".to_string(),
            message: "`types` must be an array".to_string(),
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"invalid descriptor document deps/wallet.json: `types` must be an array"
        );
    }

    #[test]
    fn warnings_carry_warning_severity_and_help() {
        use miette::Diagnostic;

        let warning = SynthWarning::new("field `owner` dropped").with_help("did you mean `Owner`?");
        assert_eq!(warning.severity(), Some(Severity::Warning));
        assert_eq!(
            warning.help().map(|h| h.to_string()),
            Some("did you mean `Owner`?".to_string())
        );
        let bare = SynthWarning::new("root type conflict");
        assert!(bare.help().is_none());
    }
}
