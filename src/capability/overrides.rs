use std::collections::BTreeMap;

use crate::capability::feature::Feature;

/// Explicit per-feature switches applied after the providers have answered.
///
/// An entry set to `false` removes the feature from the capabilities
/// document whatever its provider says; `true` advertises it even when the
/// provider reports itself disabled. Features without an entry follow their
/// provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityOverrides {
    switches: BTreeMap<Feature, bool>,
}

impl CapabilityOverrides {
    /// A table with no overrides at all.
    pub fn none() -> Self {
        Self {
            switches: BTreeMap::new(),
        }
    }

    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        self.switches.insert(feature, enabled);
        self
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        self.switches.insert(feature, enabled);
    }

    pub fn get(&self, feature: Feature) -> Option<bool> {
        self.switches.get(&feature).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        self.switches.iter().map(|(feature, enabled)| (*feature, *enabled))
    }
}

impl Default for CapabilityOverrides {
    /// Signature help stays switched off until its provider is trusted for
    /// every client; flip it here rather than in the provider.
    fn default() -> Self {
        Self::none().with(Feature::SignatureHelp, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_disables_signature_help() {
        let overrides = CapabilityOverrides::default();
        let entries: Vec<(Feature, bool)> = overrides.iter().collect();
        assert_eq!(entries, vec![(Feature::SignatureHelp, false)]);
    }

    #[test]
    fn set_replaces_existing_switch() {
        let mut overrides = CapabilityOverrides::default();
        overrides.set(Feature::SignatureHelp, true);
        assert_eq!(overrides.get(Feature::SignatureHelp), Some(true));
        assert_eq!(overrides.get(Feature::Hover), None);
    }
}
