//! Capability negotiation layer
//! - feature.rs: Capability families and their document keys
//! - provider.rs: FeatureProvider trait and built-in providers
//! - overrides.rs: Per-feature override table
//! - aggregator.rs: Capabilities document assembly

pub mod aggregator;
pub mod feature;
pub mod overrides;
pub mod provider;

pub use aggregator::{CapabilitiesDocument, CapabilityAggregator, initialize_result};
pub use feature::Feature;
pub use overrides::CapabilityOverrides;
pub use provider::{FeatureProvider, StaticProvider, default_providers};
