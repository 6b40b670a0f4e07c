//! Assembles the server capabilities document from the provider registry

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use tower_lsp::lsp_types::ServerCapabilities;
use tracing::{debug, warn};

use crate::capability::feature::Feature;
use crate::capability::overrides::CapabilityOverrides;
use crate::capability::provider::FeatureProvider;
use crate::config::SERVER_NAME;

/// Capabilities advertised to the client, keyed by LSP capability name.
/// Built once per session and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapabilitiesDocument(Map<String, Value>);

impl CapabilitiesDocument {
    pub fn get(&self, feature: Feature) -> Option<&Value> {
        self.0.get(feature.capability_key())
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains_key(feature.capability_key())
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Typed view used by the tower-lsp host.
    pub fn to_server_capabilities(&self) -> Result<ServerCapabilities, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }
}

/// Builds the `initialize` result body: capabilities plus server identity.
pub fn initialize_result(capabilities: &CapabilitiesDocument) -> Value {
    json!({
        "capabilities": capabilities.to_value(),
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

pub struct CapabilityAggregator {
    providers: BTreeMap<Feature, Box<dyn FeatureProvider>>,
    overrides: CapabilityOverrides,
}

impl CapabilityAggregator {
    pub fn new(providers: Vec<Box<dyn FeatureProvider>>, overrides: CapabilityOverrides) -> Self {
        let mut registry: BTreeMap<Feature, Box<dyn FeatureProvider>> = BTreeMap::new();
        for provider in providers {
            let feature = provider.feature();
            if registry.contains_key(&feature) {
                warn!("Ignoring duplicate provider for {}", feature);
                continue;
            }
            registry.insert(feature, provider);
        }

        Self {
            providers: registry,
            overrides,
        }
    }

    /// Queries every provider and produces the capabilities document.
    ///
    /// A family with no registered provider counts as disabled. Families
    /// switched off in the override table are left out entirely.
    pub fn build(&self) -> CapabilitiesDocument {
        let mut document = Map::new();

        for feature in Feature::ALL {
            let provider = self.providers.get(&feature);
            let override_switch = self.overrides.get(feature);

            if override_switch == Some(false) {
                debug!("{} disabled by override", feature);
                continue;
            }

            let enabled =
                override_switch.unwrap_or_else(|| provider.is_some_and(|p| p.is_enabled()));

            let options = provider.and_then(|p| p.options());
            let entry = match (enabled, feature.requires_options()) {
                (true, true) => Some(options.unwrap_or_else(|| Value::Object(Map::new()))),
                (true, false) => Some(options.unwrap_or(Value::Bool(true))),
                (false, true) => None,
                (false, false) => Some(Value::Bool(false)),
            };

            if let Some(entry) = entry {
                document.insert(feature.capability_key().to_string(), entry);
            }
        }

        CapabilitiesDocument(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::provider::{MockFeatureProvider, StaticProvider, default_providers};
    use rstest::rstest;

    fn default_aggregator() -> CapabilityAggregator {
        CapabilityAggregator::new(default_providers(), CapabilityOverrides::default())
    }

    #[test]
    fn build_never_advertises_signature_help_by_default() {
        let document = default_aggregator().build();

        assert!(!document.contains(Feature::SignatureHelp));
        assert_eq!(document.get(Feature::Hover), Some(&Value::Bool(true)));
    }

    #[test]
    fn build_omits_signature_help_even_when_provider_is_enabled() {
        let providers: Vec<Box<dyn FeatureProvider>> = vec![Box::new(StaticProvider::with_options(
            Feature::SignatureHelp,
            json!({"triggerCharacters": ["("]}),
        ))];
        let document = CapabilityAggregator::new(providers, CapabilityOverrides::default()).build();

        assert!(!document.contains(Feature::SignatureHelp));
    }

    #[test]
    fn override_can_enable_signature_help() {
        let overrides = CapabilityOverrides::none().with(Feature::SignatureHelp, true);
        let document = CapabilityAggregator::new(default_providers(), overrides).build();

        assert_eq!(
            document.get(Feature::SignatureHelp),
            Some(&json!({"triggerCharacters": ["(", ",", ")"]}))
        );
    }

    #[rstest]
    #[case(Feature::Definition, Some(Value::Bool(false)))]
    #[case(Feature::Hover, Some(Value::Bool(false)))]
    #[case(Feature::Completion, None)]
    #[case(Feature::CodeLens, None)]
    fn unregistered_provider_is_treated_as_disabled(
        #[case] feature: Feature,
        #[case] expected: Option<Value>,
    ) {
        let document = CapabilityAggregator::new(Vec::new(), CapabilityOverrides::none()).build();

        assert_eq!(document.get(feature).cloned(), expected);
    }

    #[test]
    fn disabled_provider_reports_false() {
        let providers: Vec<Box<dyn FeatureProvider>> =
            vec![Box::new(StaticProvider::disabled(Feature::DocumentRangeFormatting))];
        let document = CapabilityAggregator::new(providers, CapabilityOverrides::none()).build();

        assert_eq!(
            document.get(Feature::DocumentRangeFormatting),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn default_document_advertises_range_formatting() {
        let document = default_aggregator().build();
        assert_eq!(
            document.get(Feature::DocumentRangeFormatting),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn enabled_provider_options_are_used_verbatim() {
        let mut provider = MockFeatureProvider::new();
        provider.expect_feature().return_const(Feature::CodeLens);
        provider.expect_is_enabled().return_const(true);
        provider
            .expect_options()
            .returning(|| Some(json!({"resolveProvider": true})));

        let document =
            CapabilityAggregator::new(vec![Box::new(provider)], CapabilityOverrides::none()).build();

        assert_eq!(
            document.get(Feature::CodeLens),
            Some(&json!({"resolveProvider": true}))
        );
    }

    #[test]
    fn first_provider_wins_for_duplicate_feature() {
        let providers: Vec<Box<dyn FeatureProvider>> = vec![
            Box::new(StaticProvider::enabled(Feature::Rename)),
            Box::new(StaticProvider::disabled(Feature::Rename)),
        ];
        let document = CapabilityAggregator::new(providers, CapabilityOverrides::none()).build();

        assert_eq!(document.get(Feature::Rename), Some(&Value::Bool(true)));
    }

    #[test]
    fn build_is_stable_across_calls() {
        let aggregator = default_aggregator();
        assert_eq!(aggregator.build(), aggregator.build());
    }

    #[test]
    fn default_document_converts_to_typed_capabilities() {
        let capabilities = default_aggregator().build().to_server_capabilities().unwrap();

        assert!(capabilities.signature_help_provider.is_none());
        assert!(capabilities.completion_provider.is_some());
        assert!(capabilities.execute_command_provider.is_some());
        assert!(capabilities.text_document_sync.is_some());
    }

    #[test]
    fn initialize_result_carries_server_info() {
        let result = initialize_result(&default_aggregator().build());

        assert_eq!(result["serverInfo"]["name"], "erlang-ls");
        assert_eq!(result["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(result["capabilities"].get("signatureHelpProvider").is_none());
    }
}
