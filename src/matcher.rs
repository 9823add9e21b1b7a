use crate::{contexts::DOMAIN_LINKAGE_CONTEXTS, credential::NormalizedCredential, error::CredentialError};

/// Type every domain linkage credential declares.
pub const DOMAIN_LINKAGE_CREDENTIAL: &str = "DomainLinkageCredential";

/// Checks that a verified credential links `did` to `domain`.
///
/// DIDs are compared verbatim. Origins are compared after stripping a
/// trailing slash from both sides.
pub fn matches(credential: &NormalizedCredential, did: &str, domain: &str) -> Result<(), CredentialError> {
    let mismatch = |reason: String| CredentialError::Mismatch {
        index: credential.index,
        reason,
    };
    let vc = &credential.credential;

    match vc.credential_subject.id.as_deref() {
        Some(subject) if subject == did => {}
        Some(subject) => return Err(mismatch(format!("credential subject {subject} is not {did}"))),
        None => return Err(mismatch(String::from("credential subject has no id"))),
    }

    match vc.credential_subject.claim("origin") {
        Some(origin) if normalize_origin(origin) == normalize_origin(domain) => {}
        Some(origin) => return Err(mismatch(format!("origin {origin} is not {domain}"))),
        None => return Err(mismatch(String::from("credential subject has no origin"))),
    }

    if !vc.has_type(DOMAIN_LINKAGE_CREDENTIAL) {
        return Err(mismatch(format!("credential is not a {DOMAIN_LINKAGE_CREDENTIAL}")));
    }

    if !DOMAIN_LINKAGE_CONTEXTS.iter().any(|context| vc.context.contains(context)) {
        return Err(mismatch(String::from("credential @context lacks a domain linkage context")));
    }

    if vc.issuer.id() != did {
        return Err(mismatch(format!("issuer {} is not {did}", vc.issuer.id())));
    }

    if vc.issuance_date.is_none() {
        return Err(mismatch(String::from("credential has no issuanceDate")));
    }
    if vc.expiration_date.is_none() {
        return Err(mismatch(String::from("credential has no expirationDate")));
    }

    Ok(())
}

fn normalize_origin(origin: &str) -> &str {
    origin.trim_end_matches('/')
}
