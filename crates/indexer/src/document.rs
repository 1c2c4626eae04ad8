use crate::reference::{ModuleReference, Target};
use modlink_protocol::Resolution;

/// Whether a remediation-action provider is registered for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemediationState {
    #[default]
    Unregistered,
    Registered,
}

/// Module references of one tracked document.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    generation: u64,
    references: Vec<ModuleReference>,
    resolved: bool,
    remediation: RemediationState,
}

impl DocumentIndex {
    pub(crate) fn new(generation: u64, references: Vec<ModuleReference>) -> Self {
        Self {
            generation,
            references,
            resolved: false,
            remediation: RemediationState::Unregistered,
        }
    }

    /// Swap in a fresh reference list; the previous one is discarded, not merged.
    pub(crate) fn replace(&mut self, generation: u64, references: Vec<ModuleReference>) {
        self.generation = generation;
        self.references = references;
        self.resolved = false;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn references(&self) -> &[ModuleReference] {
        &self.references
    }

    /// True once a resolution pass for the current generation has committed.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn remediation(&self) -> RemediationState {
        self.remediation
    }

    pub fn has_unresolvable(&self) -> bool {
        self.resolved && self.references.iter().any(|r| r.target.is_unresolvable())
    }

    /// Target of the reference covering `offset`.
    ///
    /// `None` when no reference covers it or the document is mid-resolution.
    pub fn lookup(&self, offset: usize) -> Option<Target> {
        if !self.resolved {
            return None;
        }
        let mut choice = None;
        for reference in &self.references {
            if reference.start > offset {
                break;
            }
            choice = Some(reference);
        }
        let reference = choice.filter(|r| r.contains(offset))?;
        match &reference.target {
            Target::Pending => None,
            target => Some(target.clone()),
        }
    }

    /// Apply one resolution per reference, in reference order. Builtin modules are
    /// removed. Returns the new remediation availability when it changed.
    pub(crate) fn commit(&mut self, resolutions: Vec<Resolution>) -> Option<bool> {
        let references = std::mem::take(&mut self.references);
        self.references = references
            .into_iter()
            .zip(resolutions)
            .filter_map(|(mut reference, resolution)| {
                reference.target = match resolution {
                    Resolution::Resolved(path) => Target::Resolved(path),
                    Resolution::NotFound => Target::Unresolvable,
                    Resolution::Builtin => return None,
                };
                Some(reference)
            })
            .collect();
        self.resolved = true;
        self.sync_remediation()
    }

    /// Re-evaluate the provider state against the current references.
    pub(crate) fn sync_remediation(&mut self) -> Option<bool> {
        let wanted = if self.has_unresolvable() {
            RemediationState::Registered
        } else {
            RemediationState::Unregistered
        };
        if wanted == self.remediation {
            return None;
        }
        self.remediation = wanted;
        Some(wanted == RemediationState::Registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn index(names: &[(usize, &str)]) -> DocumentIndex {
        DocumentIndex::new(
            1,
            names
                .iter()
                .map(|(start, name)| ModuleReference::pending(*start, *name))
                .collect(),
        )
    }

    #[test]
    fn lookup_is_none_until_resolved() {
        let doc = index(&[(9, "./foo")]);
        assert_eq!(doc.lookup(10), None);
    }

    #[test]
    fn lookup_finds_nearest_preceding_reference() {
        let mut doc = index(&[(9, "./foo"), (30, "bar")]);
        doc.commit(vec![
            Resolution::Resolved(PathBuf::from("/proj/foo.js")),
            Resolution::NotFound,
        ]);

        assert_eq!(
            doc.lookup(11),
            Some(Target::Resolved(PathBuf::from("/proj/foo.js")))
        );
        assert_eq!(doc.lookup(31), Some(Target::Unresolvable));
        assert_eq!(doc.lookup(20), None);
        assert_eq!(doc.lookup(0), None);
    }

    #[test]
    fn commit_drops_builtins() {
        let mut doc = index(&[(0, "fs"), (10, "./a")]);
        doc.commit(vec![
            Resolution::Builtin,
            Resolution::Resolved(PathBuf::from("/a.js")),
        ]);
        let names: Vec<_> = doc.references().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["./a"]);
    }

    #[test]
    fn remediation_transitions_only_on_change() {
        let mut doc = index(&[(0, "bar")]);
        assert_eq!(doc.commit(vec![Resolution::NotFound]), Some(true));
        assert_eq!(doc.remediation(), RemediationState::Registered);

        doc.replace(2, vec![ModuleReference::pending(0, "bar")]);
        assert_eq!(doc.commit(vec![Resolution::NotFound]), None);

        doc.replace(3, vec![ModuleReference::pending(0, "bar")]);
        assert_eq!(
            doc.commit(vec![Resolution::Resolved(PathBuf::from("/n/bar.js"))]),
            Some(false)
        );
        assert_eq!(doc.remediation(), RemediationState::Unregistered);
    }
}
