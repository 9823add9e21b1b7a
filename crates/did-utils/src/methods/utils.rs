use std::collections::HashMap;

use super::errors::DIDResolutionError;

pub type ParsedDIDUrl = (String, HashMap<String, String>, Option<String>);

/// Parses DID URL into (did, query, fragment)
pub fn parse_did_url(did_url: &str) -> Result<ParsedDIDUrl, DIDResolutionError> {
    let (rest, fragment) = match did_url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment.to_string())),
        None => (did_url, None),
    };

    let (did, query) = match rest.split_once('?') {
        Some((did, query)) => (did, Some(query)),
        None => (rest, None),
    };

    let did = match did.find('/') {
        Some(index) => &did[..index],
        None => did,
    };

    method_name(did).map_err(|_| DIDResolutionError::InvalidDidUrl)?;

    let query = query
        .map(|query| url::form_urlencoded::parse(query.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    Ok((did.to_string(), query, fragment))
}

/// Extracts the method name of a DID, e.g. `key` for `did:key:z6Mk...`
pub fn method_name(did: &str) -> Result<&str, DIDResolutionError> {
    let mut parts = did.splitn(3, ':');

    match (parts.next(), parts.next(), parts.next()) {
        (Some("did"), Some(method), Some(id))
            if !method.is_empty() && !id.is_empty() && method.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) =>
        {
            Ok(method)
        }
        _ => Err(DIDResolutionError::InvalidDid),
    }
}
