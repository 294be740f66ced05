//! Manifest Diff

use std::collections::BTreeMap;

use crate::types::{Manifest, ModEntry};

/// Entry names that differ between two manifests, each list sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl ManifestDiff {
    /// Compare `old` (what is on disk, if anything) against `new`
    pub fn between(old: Option<&Manifest>, new: &Manifest) -> Self {
        let old_index = index(old.map(Manifest::mods).unwrap_or_default());
        let new_index = index(new.mods());

        let mut diff = ManifestDiff::default();

        for (name, entry) in &new_index {
            match old_index.get(name) {
                None => diff.added.push(name.to_string()),
                Some(prev) if prev.sha256 != entry.sha256 || prev.size != entry.size => {
                    diff.changed.push(name.to_string())
                }
                Some(_) => {}
            }
        }

        diff.removed = old_index
            .keys()
            .filter(|name| !new_index.contains_key(*name))
            .map(|name| name.to_string())
            .collect();

        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} added, {} removed, {} changed",
            self.added.len(),
            self.removed.len(),
            self.changed.len()
        )
    }

    /// One line per entry: `+ name`, `- name`, `~ name`
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.added.len() + self.removed.len() + self.changed.len());
        lines.extend(self.added.iter().map(|n| format!("+ {}", n)));
        lines.extend(self.removed.iter().map(|n| format!("- {}", n)));
        lines.extend(self.changed.iter().map(|n| format!("~ {}", n)));
        lines
    }
}

fn index(mods: &[ModEntry]) -> BTreeMap<&str, &ModEntry> {
    mods.iter().map(|m| (m.name.as_str(), m)).collect()
}
