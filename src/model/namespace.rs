use std::fmt;

/// A three-part hierarchical grouping identifier for schema declarations,
/// parsed from a colon-delimited descriptor string.
///
/// The descriptor positions are `group:identifier:artifact`. Any position may
/// be left empty, which leaves that component unset (not the empty string):
///
/// - `"com.example"` sets only the group
/// - `":app"` sets only the identifier
/// - `"::core"` sets only the artifact
/// - `"com.example:app:core"` sets all three
///
/// Rendering joins the set components with `.`, so the examples above render
/// as `com.example`, `app`, `core`, and `com.example.app.core` respectively.
/// A fully-unset namespace renders as the empty string, and the serializer
/// omits the `namespace …;` statement for it entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    group: Option<String>,
    identifier: Option<String>,
    artifact: Option<String>,
}

impl Namespace {
    /// Parse a colon-delimited namespace descriptor.
    ///
    /// Returns `None` only for the empty string. Empty positions map to unset
    /// components; tokens past the third position are ignored, since the
    /// descriptor format defines exactly three.
    pub fn parse(raw: &str) -> Option<Namespace> {
        if raw.is_empty() {
            return None;
        }
        let mut parts = raw.split(':');
        let component = |part: Option<&str>| {
            part.filter(|p| !p.is_empty()).map(str::to_string)
        };
        Some(Namespace {
            group: component(parts.next()),
            identifier: component(parts.next()),
            artifact: component(parts.next()),
        })
    }

    /// A namespace with no components set. Renders as the empty string.
    pub fn empty() -> Namespace {
        Namespace {
            group: None,
            identifier: None,
            artifact: None,
        }
    }

    /// True iff no component is set.
    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.identifier.is_none() && self.artifact.is_none()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn artifact(&self) -> Option<&str> {
        self.artifact.as_deref()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in [&self.group, &self.identifier, &self.artifact]
            .into_iter()
            .flatten()
        {
            if !first {
                f.write_str(".")?;
            }
            f.write_str(component)?;
            first = false;
        }
        Ok(())
    }
}
