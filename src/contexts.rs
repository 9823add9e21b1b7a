//! JSON-LD contexts of the two published versions of the DID configuration resource.

use did_utils::jsonld::{JsonLdError, StaticContextLoader};

/// Legacy context, used by the first DID configuration drafts.
pub const DID_CONFIGURATION_V0: &str = "https://identity.foundation/.well-known/contexts/did-configuration-v0.0.jsonld";

/// Current context of the Well Known DID Configuration specification.
pub const DID_CONFIGURATION_V1: &str = "https://identity.foundation/.well-known/did-configuration/v1";

/// Document served at [`DID_CONFIGURATION_V0`].
pub const DID_CONFIGURATION_V0_DOCUMENT: &str = include_str!("../test_resources/context_did_configuration_v0.json");

/// Document served at [`DID_CONFIGURATION_V1`].
pub const DID_CONFIGURATION_V1_DOCUMENT: &str = include_str!("../test_resources/context_did_configuration_v1.json");

/// Both domain linkage contexts, legacy first.
pub const DOMAIN_LINKAGE_CONTEXTS: [&str; 2] = [DID_CONFIGURATION_V0, DID_CONFIGURATION_V1];

/// Tells whether the URL names one of the domain linkage contexts.
pub fn is_domain_linkage_context(url: &str) -> bool {
    DOMAIN_LINKAGE_CONTEXTS.contains(&url)
}

/// A context loader serving both domain linkage contexts.
///
/// The W3C credentials and security contexts ship with `ssi`, which falls back
/// to them during proof verification.
pub fn did_configuration_loader() -> Result<StaticContextLoader, JsonLdError> {
    StaticContextLoader::new()
        .with_context_str(DID_CONFIGURATION_V0, DID_CONFIGURATION_V0_DOCUMENT)?
        .with_context_str(DID_CONFIGURATION_V1, DID_CONFIGURATION_V1_DOCUMENT)
}
