//! Normalization of `linked_dids` entries.
//!
//! Both encodings of a domain linkage credential end up as a
//! [`NormalizedCredential`]: the credential itself plus the material its
//! signature is checked against.

use chrono::{DateTime, SecondsFormat};
use did_utils::{jws::CompactJws, vc::VerifiableCredential};
use serde_json::{Map, Value};

use crate::{config::RawCredential, error::CredentialError};

/// A `linked_dids` entry decoded into a credential.
#[derive(Debug, Clone)]
pub struct NormalizedCredential {
    /// Position of the entry in `linked_dids`.
    pub index: usize,
    pub credential: VerifiableCredential,
    pub proof: ProofMaterial,
}

/// What the signature of a credential covers.
#[derive(Debug, Clone)]
pub enum ProofMaterial {
    /// The enveloping JWS of a JWT credential.
    Jws(CompactJws),
    /// The secured document and its embedded proofs.
    LinkedData { document: Value, proofs: Vec<Value> },
}

impl NormalizedCredential {
    /// The verification method each proof claims to be signed with.
    pub fn verification_methods(&self) -> Vec<&str> {
        match &self.proof {
            ProofMaterial::Jws(jws) => jws.header().kid.as_deref().into_iter().collect(),
            ProofMaterial::LinkedData { proofs, .. } => proofs
                .iter()
                .filter_map(|proof| proof.get("verificationMethod").and_then(Value::as_str))
                .collect(),
        }
    }
}

/// Decodes the entry found at `index` in `linked_dids`.
pub fn normalize(index: usize, raw: &RawCredential) -> Result<NormalizedCredential, CredentialError> {
    let format_error = |reason: String| CredentialError::Format { index, reason };

    match raw {
        RawCredential::Compact(token) => normalize_compact(index, token).map_err(format_error),
        RawCredential::LinkedData(object) => normalize_linked_data(index, object).map_err(format_error),
        RawCredential::Unsupported(value) => Err(format_error(format!(
            "expected a JWT string or a credential object, found {}",
            kind_of(value)
        ))),
    }
}

fn normalize_compact(index: usize, token: &str) -> Result<NormalizedCredential, String> {
    let jws = CompactJws::parse(token).map_err(|err| format!("JWT: {err}"))?;

    let header = jws.header();
    if header.kid.as_deref().map_or(true, str::is_empty) {
        return Err(String::from("JWT header is missing 'kid'"));
    }
    if let Some(typ) = header.typ.as_deref().filter(|typ| *typ != "JWT") {
        return Err(format!("JWT header 'typ' must be 'JWT', found '{typ}'"));
    }

    let claims = jws.claims().map_err(|err| format!("JWT: {err}"))?;
    let Some(Value::Object(vc)) = claims.get("vc") else {
        return Err(String::from("JWT claim 'vc' is missing or not an object"));
    };

    let vc = project_registered_claims(vc.clone(), &claims)?;
    let credential: VerifiableCredential =
        serde_json::from_value(Value::Object(vc)).map_err(|err| format!("JWT claim 'vc': {err}"))?;

    if let Some(iss) = claims.get("iss") {
        if iss.as_str() != Some(credential.issuer.id()) {
            return Err(String::from("JWT claim 'iss' does not match the credential issuer"));
        }
    }
    if let Some(sub) = claims.get("sub") {
        if sub.as_str() != credential.credential_subject.id.as_deref() {
            return Err(String::from("JWT claim 'sub' does not match the credential subject"));
        }
    }

    Ok(NormalizedCredential {
        index,
        credential,
        proof: ProofMaterial::Jws(jws),
    })
}

// Registered JWT claims stand in for the credential properties they encode
// when the nested credential leaves them out.
fn project_registered_claims(mut vc: Map<String, Value>, claims: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    if let (None, Some(iss)) = (vc.get("issuer"), claims.get("iss")) {
        vc.insert(String::from("issuer"), iss.clone());
    }

    if let Some(sub) = claims.get("sub") {
        match vc.get_mut("credentialSubject") {
            Some(Value::Object(subject)) => {
                subject.entry("id").or_insert_with(|| sub.clone());
            }
            None => {
                vc.insert(String::from("credentialSubject"), serde_json::json!({ "id": sub }));
            }
            Some(_) => {}
        }
    }

    for (claim, property) in [("nbf", "issuanceDate"), ("exp", "expirationDate")] {
        if vc.contains_key(property) {
            continue;
        }

        if let Some(timestamp) = claims.get(claim) {
            let seconds = timestamp
                .as_i64()
                .ok_or_else(|| format!("JWT claim '{claim}' must be a NumericDate"))?;
            let date = DateTime::from_timestamp(seconds, 0)
                .ok_or_else(|| format!("JWT claim '{claim}' is out of range"))?;
            vc.insert(
                property.to_string(),
                Value::String(date.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
    }

    Ok(vc)
}

fn normalize_linked_data(index: usize, object: &Map<String, Value>) -> Result<NormalizedCredential, String> {
    let document = Value::Object(object.clone());
    let credential: VerifiableCredential =
        serde_json::from_value(document.clone()).map_err(|err| format!("credential: {err}"))?;

    let proofs = match object.get("proof") {
        None => return Err(String::from("property 'proof' is required")),
        Some(Value::Array(proofs)) if proofs.is_empty() => return Err(String::from("property 'proof' is empty")),
        Some(Value::Array(proofs)) => proofs.clone(),
        Some(proof) => vec![proof.clone()],
    };

    Ok(NormalizedCredential {
        index,
        credential,
        proof: ProofMaterial::LinkedData { document, proofs },
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use did_utils::{
        crypto::{Ed25519KeyPair, Generate},
        jws::{sign_compact, JwsAlgorithm, JwsHeader},
    };
    use serde_json::json;

    const DID: &str = "did:key:z6MkoTHsgNNrby8JzCNQ1iRLyW5QQ6R8Xuu6AA8igGrMVPUM";

    fn fixture_entry(fixture: &str) -> RawCredential {
        let document: Value = serde_json::from_str(fixture).unwrap();
        RawCredential::from(document["linked_dids"][0].clone())
    }

    fn sign(header: JwsHeader, claims: Value) -> RawCredential {
        let key_pair = Ed25519KeyPair::new_with_seed(&[7; 32]).unwrap();
        RawCredential::Compact(sign_compact(&header, &claims, &key_pair).unwrap())
    }

    fn header() -> JwsHeader {
        JwsHeader {
            kid: Some(format!("{DID}#key-1")),
            ..JwsHeader::new(JwsAlgorithm::EdDSA)
        }
    }

    fn format_reason(result: Result<NormalizedCredential, CredentialError>) -> String {
        match result {
            Err(CredentialError::Format { reason, .. }) => reason,
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_linked_data_fixture() {
        let raw = fixture_entry(include_str!("../test_resources/did_configuration_ld.json"));
        let normalized = normalize(0, &raw).unwrap();

        assert_eq!(normalized.credential.issuer.id(), DID);
        assert_eq!(normalized.credential.credential_subject.claim("origin"), Some("https://identity.foundation"));
        assert_eq!(normalized.verification_methods(), vec![format!("{DID}#{}", &DID[8..])]);
        assert!(matches!(normalized.proof, ProofMaterial::LinkedData { ref proofs, .. } if proofs.len() == 1));
    }

    #[test]
    fn test_normalize_jwt_fixture() {
        let raw = fixture_entry(include_str!("../test_resources/did_configuration_jwt.json"));
        let normalized = normalize(3, &raw).unwrap();

        let credential = &normalized.credential;
        assert_eq!(normalized.index, 3);
        assert!(credential.issuer.id().starts_with("did:ion:EiCMdVLtzqqW5n6zUC3_srZxWPCseVxKXu9FqQ8LyS1mTA"));
        assert_eq!(credential.credential_subject.id.as_deref(), Some(credential.issuer.id()));
        assert_eq!(credential.credential_subject.claim("origin"), Some("https://did.rohitgulati.com/"));
        assert!(credential.has_type("DomainLinkageCredential"));

        let methods = normalized.verification_methods();
        assert_eq!(methods.len(), 1);
        assert!(methods[0].ends_with("#66dd51fe0cac4f1aae812d0aa109bc2avcSigningKey-2e975"));
    }

    #[test]
    fn test_registered_claims_fill_the_credential() {
        let raw = sign(
            header(),
            json!({
                "iss": DID,
                "sub": DID,
                "nbf": 1607112508,
                "exp": 1764880108,
                "vc": {
                    "@context": ["https://www.w3.org/2018/credentials/v1"],
                    "type": ["VerifiableCredential", "DomainLinkageCredential"],
                    "credentialSubject": { "origin": "https://identity.foundation" }
                }
            }),
        );

        let credential = normalize(0, &raw).unwrap().credential;
        assert_eq!(credential.issuer.id(), DID);
        assert_eq!(credential.credential_subject.id.as_deref(), Some(DID));
        assert_eq!(
            credential.issuance_date.map(|date| date.timestamp()),
            Some(1607112508)
        );
        assert_eq!(
            credential.expiration_date.map(|date| date.timestamp()),
            Some(1764880108)
        );
    }

    #[test]
    fn test_registered_claims_must_agree_with_the_credential() {
        let vc = json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "issuer": DID,
            "type": ["VerifiableCredential", "DomainLinkageCredential"],
            "credentialSubject": { "id": DID, "origin": "https://identity.foundation" }
        });

        let raw = sign(header(), json!({ "iss": "did:example:other", "vc": vc }));
        assert!(format_reason(normalize(0, &raw)).contains("'iss'"));

        let raw = sign(header(), json!({ "sub": "did:example:other", "vc": vc }));
        assert!(format_reason(normalize(0, &raw)).contains("'sub'"));
    }

    #[test]
    fn test_malformed_jwt_entries() {
        let raw = RawCredential::Compact(String::from("abc.def"));
        assert_eq!(format_reason(normalize(0, &raw)), "JWT: expected 3 segments, found 2");

        let raw = sign(JwsHeader::new(JwsAlgorithm::EdDSA), json!({ "vc": {} }));
        assert_eq!(format_reason(normalize(0, &raw)), "JWT header is missing 'kid'");

        let raw = sign(
            JwsHeader {
                typ: Some(String::from("JOSE")),
                ..header()
            },
            json!({ "vc": {} }),
        );
        assert!(format_reason(normalize(0, &raw)).contains("'typ'"));

        let raw = sign(header(), json!({ "iss": DID }));
        assert_eq!(format_reason(normalize(0, &raw)), "JWT claim 'vc' is missing or not an object");
    }

    #[test]
    fn test_linked_data_entry_requires_a_proof() {
        let mut raw = fixture_entry(include_str!("../test_resources/did_configuration_ld.json"));
        if let RawCredential::LinkedData(object) = &mut raw {
            object.remove("proof");
        }

        assert_eq!(format_reason(normalize(0, &raw)), "property 'proof' is required");
    }

    #[test]
    fn test_unsupported_entry() {
        let err = normalize(5, &RawCredential::Unsupported(json!(42))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "entry 5: malformed credential: expected a JWT string or a credential object, found a number"
        );
    }
}
