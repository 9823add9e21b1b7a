//! Signature verification of normalized credentials against their issuer's DID document.

use did_utils::{
    crypto::PublicKey,
    didcore::Document,
    jsonld::ContextLoader,
    methods::ResolverRegistry,
    proof::{LinkedDataProof, ProofError},
};
use serde_json::Value;
use tracing::debug;

use crate::{
    credential::{NormalizedCredential, ProofMaterial},
    error::CredentialError,
};

/// Checks that the credential is signed by a key of its issuer.
///
/// Failing to resolve the issuer or to find the referenced key is a
/// resolution error. A signature that does not check out against the resolved
/// key is a signature error.
pub async fn verify(
    credential: &NormalizedCredential,
    registry: &ResolverRegistry,
    loader: &dyn ContextLoader,
) -> Result<(), CredentialError> {
    let index = credential.index;
    let issuer = credential.credential.issuer.id();

    let document = registry.resolve(issuer).await.map_err(|err| {
        debug!(index, issuer, error = %err, "issuer resolution failed");
        CredentialError::Resolution {
            index,
            reason: format!("cannot resolve issuer {issuer}: {err}"),
        }
    })?;

    match &credential.proof {
        ProofMaterial::Jws(jws) => {
            let kid = jws.header().kid.as_deref().unwrap_or_default();
            let key = verification_key(index, &document, issuer, kid)?;

            jws.verify(&key).map_err(|err| classify(index, err.into()))
        }
        ProofMaterial::LinkedData { document: secured, proofs } => {
            let mut last_error = None;
            for proof in proofs {
                match verify_linked_data(index, &document, issuer, secured, proof, loader).await {
                    Ok(()) => return Ok(()),
                    Err(err) => last_error = Some(err),
                }
            }

            Err(last_error.unwrap_or_else(|| CredentialError::Format {
                index,
                reason: String::from("credential carries no proof"),
            }))
        }
    }
}

async fn verify_linked_data(
    index: usize,
    document: &Document,
    issuer: &str,
    secured: &Value,
    proof: &Value,
    loader: &dyn ContextLoader,
) -> Result<(), CredentialError> {
    let method = proof
        .get("verificationMethod")
        .and_then(Value::as_str)
        .ok_or_else(|| CredentialError::Format {
            index,
            reason: String::from("proof is missing 'verificationMethod'"),
        })?;

    let key = verification_key(index, document, issuer, method)?;
    let proof = LinkedDataProof::from_value(proof, key, loader).map_err(|err| classify(index, err))?;

    proof.verify(secured).await.map_err(|err| classify(index, err))
}

// Looks the verification method up in the issuer's document. Methods of other
// DIDs are refused, the issuer has to control the signing key.
fn verification_key(index: usize, document: &Document, issuer: &str, did_url: &str) -> Result<PublicKey, CredentialError> {
    let resolution_error = |reason: String| CredentialError::Resolution { index, reason };

    if did_url.is_empty() {
        return Err(resolution_error(String::from("no verification method referenced")));
    }

    let controller = did_url.split('#').next().unwrap_or_default();
    if !controller.is_empty() && controller != issuer && controller != document.id {
        return Err(resolution_error(format!(
            "verification method {did_url} does not belong to issuer {issuer}"
        )));
    }

    let method = document
        .find_verification_method(did_url)
        .ok_or_else(|| resolution_error(format!("verification method {did_url} not found in the DID document of {issuer}")))?;

    method
        .public_key()
        .map_err(|err| resolution_error(format!("verification method {did_url}: {err}")))
}

fn classify(index: usize, err: ProofError) -> CredentialError {
    if err.is_signature_failure() {
        CredentialError::Signature {
            index,
            reason: err.to_string(),
        }
    } else {
        CredentialError::Format {
            index,
            reason: err.to_string(),
        }
    }
}
