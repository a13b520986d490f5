// ==============================================================================
// Descriptor Index: Name-Keyed Lookup Across All Sources
// ==============================================================================
//
// Consolidation needs one view over every descriptor from every source: to
// decide whether a field's type reference points at a discovered type, to
// look up the fully-qualified name behind a reference, and to offer
// suggestion candidates for near-miss names.
//
// Identity is the simple name, kept as an explicit map key rather than
// equality on the descriptors themselves. Sources are indexed in the order
// given (local project first, dependency artifacts after), and the first
// descriptor to claim a name wins — a later same-named descriptor from
// another source is shadowed, which is also the declaration the consolidator
// will register. Shadowing makes duplicate-name collisions deterministic:
// local always beats dependencies.

use indexmap::IndexMap;

use crate::model::descriptor::{DescriptorSet, TypeDescriptor};

/// A read-only, name-keyed view over the descriptors of an ordered list of
/// sources, first claim per name wins.
pub struct DescriptorIndex<'a> {
    entries: IndexMap<&'a str, &'a TypeDescriptor>,
}

impl<'a> DescriptorIndex<'a> {
    /// Index every descriptor of every source, in source order.
    pub fn new(sources: &'a [DescriptorSet]) -> DescriptorIndex<'a> {
        let mut entries: IndexMap<&str, &TypeDescriptor> = IndexMap::new();
        entries.reserve(sources.iter().map(|s| s.types.len()).sum());
        for source in sources {
            for descriptor in &source.types {
                entries.entry(descriptor.name()).or_insert(descriptor);
            }
        }
        DescriptorIndex { entries }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&'a TypeDescriptor> {
        self.entries.get(name).copied()
    }

    /// The fully-qualified dotted name recorded for `name`, when discovery
    /// supplied one. Used to emit full-name reference tokens.
    pub fn full_name_of(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(TypeDescriptor::full_name)
    }

    /// All indexed simple names in registration order. Used as suggestion
    /// candidates for unresolved references.
    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
