//! Capability families negotiated during `initialize`

use std::fmt;

/// One optional protocol feature family, as advertised in the server
/// capabilities document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    TextDocumentSync,
    Hover,
    Completion,
    SignatureHelp,
    Definition,
    References,
    DocumentHighlight,
    DocumentSymbol,
    WorkspaceSymbol,
    CodeAction,
    DocumentFormatting,
    DocumentRangeFormatting,
    FoldingRange,
    Implementation,
    ExecuteCommand,
    CodeLens,
    Rename,
    CallHierarchy,
}

impl Feature {
    /// Every family, in the order entries are emitted.
    pub const ALL: [Feature; 18] = [
        Feature::TextDocumentSync,
        Feature::Hover,
        Feature::Completion,
        Feature::SignatureHelp,
        Feature::Definition,
        Feature::References,
        Feature::DocumentHighlight,
        Feature::DocumentSymbol,
        Feature::WorkspaceSymbol,
        Feature::CodeAction,
        Feature::DocumentFormatting,
        Feature::DocumentRangeFormatting,
        Feature::FoldingRange,
        Feature::Implementation,
        Feature::ExecuteCommand,
        Feature::CodeLens,
        Feature::Rename,
        Feature::CallHierarchy,
    ];

    /// Key used for this family in the `ServerCapabilities` document.
    pub fn capability_key(self) -> &'static str {
        match self {
            Feature::TextDocumentSync => "textDocumentSync",
            Feature::Hover => "hoverProvider",
            Feature::Completion => "completionProvider",
            Feature::SignatureHelp => "signatureHelpProvider",
            Feature::Definition => "definitionProvider",
            Feature::References => "referencesProvider",
            Feature::DocumentHighlight => "documentHighlightProvider",
            Feature::DocumentSymbol => "documentSymbolProvider",
            Feature::WorkspaceSymbol => "workspaceSymbolProvider",
            Feature::CodeAction => "codeActionProvider",
            Feature::DocumentFormatting => "documentFormattingProvider",
            Feature::DocumentRangeFormatting => "documentRangeFormattingProvider",
            Feature::FoldingRange => "foldingRangeProvider",
            Feature::Implementation => "implementationProvider",
            Feature::ExecuteCommand => "executeCommandProvider",
            Feature::CodeLens => "codeLensProvider",
            Feature::Rename => "renameProvider",
            Feature::CallHierarchy => "callHierarchyProvider",
        }
    }

    /// Families whose capability entry is an options object; the LSP schema
    /// has no boolean form for these, so a disabled one is left out instead
    /// of being reported as `false`.
    pub fn requires_options(self) -> bool {
        matches!(
            self,
            Feature::TextDocumentSync
                | Feature::Completion
                | Feature::SignatureHelp
                | Feature::ExecuteCommand
                | Feature::CodeLens
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.capability_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn capability_keys_are_unique() {
        let keys: HashSet<&str> = Feature::ALL.iter().map(|f| f.capability_key()).collect();
        assert_eq!(keys.len(), Feature::ALL.len());
    }

    #[test]
    fn display_uses_capability_key() {
        assert_eq!(Feature::SignatureHelp.to_string(), "signatureHelpProvider");
    }
}
