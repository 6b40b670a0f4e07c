//! Feature provider query interface and the built-in provider registry

use serde_json::{Value, json};

use crate::capability::feature::Feature;

/// Characters that re-trigger completion inside Erlang sources.
pub const COMPLETION_TRIGGER_CHARACTERS: [&str; 6] = [":", "#", "?", ".", "-", "\""];

/// Characters that open or advance a signature help session.
pub const SIGNATURE_HELP_TRIGGER_CHARACTERS: [&str; 3] = ["(", ",", ")"];

/// Commands served through `workspace/executeCommand`, before prefixing.
pub const COMMANDS: [&str; 5] = [
    "replace-lines",
    "server-info",
    "ct-run-test",
    "show-behaviour-usages",
    "suggest-spec",
];

/// What the capability aggregator asks of every feature provider.
///
/// Implementations are independent of each other; the aggregator is the
/// only place that sees all of them.
#[cfg_attr(test, mockall::automock)]
pub trait FeatureProvider: Send + Sync {
    /// The capability family this provider answers for.
    fn feature(&self) -> Feature;

    /// Whether the feature should be advertised at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Structured options for the capability entry, if any.
    fn options(&self) -> Option<Value> {
        None
    }
}

/// Provider whose answers are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticProvider {
    feature: Feature,
    enabled: bool,
    options: Option<Value>,
}

impl StaticProvider {
    pub fn enabled(feature: Feature) -> Self {
        Self {
            feature,
            enabled: true,
            options: None,
        }
    }

    pub fn disabled(feature: Feature) -> Self {
        Self {
            feature,
            enabled: false,
            options: None,
        }
    }

    pub fn with_options(feature: Feature, options: Value) -> Self {
        Self {
            feature,
            enabled: true,
            options: Some(options),
        }
    }
}

impl FeatureProvider for StaticProvider {
    fn feature(&self) -> Feature {
        self.feature
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn options(&self) -> Option<Value> {
        self.options.clone()
    }
}

/// Prefixes a command with the OS process id, so that several server
/// instances attached to the same client never claim the same command.
pub fn command_with_prefix(command: &str) -> String {
    format!("{}:{}", std::process::id(), command)
}

/// Providers shipped with the server, one per capability family.
pub fn default_providers() -> Vec<Box<dyn FeatureProvider>> {
    let commands: Vec<String> = COMMANDS.iter().map(|c| command_with_prefix(c)).collect();

    vec![
        Box::new(StaticProvider::with_options(
            Feature::TextDocumentSync,
            json!({
                "openClose": true,
                "change": 2,
                "save": { "includeText": false }
            }),
        )),
        Box::new(StaticProvider::enabled(Feature::Hover)),
        Box::new(StaticProvider::with_options(
            Feature::Completion,
            json!({
                "resolveProvider": true,
                "triggerCharacters": COMPLETION_TRIGGER_CHARACTERS
            }),
        )),
        Box::new(StaticProvider::with_options(
            Feature::SignatureHelp,
            json!({ "triggerCharacters": SIGNATURE_HELP_TRIGGER_CHARACTERS }),
        )),
        Box::new(StaticProvider::enabled(Feature::Definition)),
        Box::new(StaticProvider::enabled(Feature::References)),
        Box::new(StaticProvider::enabled(Feature::DocumentHighlight)),
        Box::new(StaticProvider::enabled(Feature::DocumentSymbol)),
        Box::new(StaticProvider::enabled(Feature::WorkspaceSymbol)),
        Box::new(StaticProvider::enabled(Feature::CodeAction)),
        Box::new(StaticProvider::enabled(Feature::DocumentFormatting)),
        Box::new(StaticProvider::enabled(Feature::DocumentRangeFormatting)),
        Box::new(StaticProvider::enabled(Feature::FoldingRange)),
        Box::new(StaticProvider::enabled(Feature::Implementation)),
        Box::new(StaticProvider::with_options(
            Feature::ExecuteCommand,
            json!({ "commands": commands }),
        )),
        Box::new(StaticProvider::with_options(
            Feature::CodeLens,
            json!({ "resolveProvider": false }),
        )),
        Box::new(StaticProvider::enabled(Feature::Rename)),
        Box::new(StaticProvider::enabled(Feature::CallHierarchy)),
    ]
}
