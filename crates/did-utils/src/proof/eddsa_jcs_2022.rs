use multibase::Base;
use serde_json::Value;

use crate::crypto::{sha256_hash, CoreSign, Ed25519KeyPair, Error};

use super::{error::ProofError, model::Proof, traits::CryptoProof};

pub const CRYPTO_SUITE_EDDSA_JCS_2022: &str = "eddsa-jcs-2022";
pub const PROOF_TYPE_DATA_INTEGRITY_PROOF: &str = "DataIntegrityProof";

/// The `eddsa-jcs-2022` cryptosuite: JSON canonicalization and Ed25519 signatures.
pub struct EdDsaJcs2022 {
    /// The proof object
    ///
    /// In a proof creation process, it does not contain the proof value, but
    ///   carries info like challenge, nonce, etc.
    ///
    /// In a proof verification process, it contains the proof as found in the
    ///   secured document, including the proof value
    pub proof: Proof,

    /// Signing key for proof creation, or a public key alone for verification.
    ///
    /// Verification method resolution happens upstream.
    pub key_pair: Ed25519KeyPair,

    /// The proof value codec, required for proof creation.
    ///
    /// For the decoding, codec is inferred from the multibase prefix.
    pub proof_value_codec: Option<Base>,
}

impl EdDsaJcs2022 {
    fn normalized_proof(&self) -> Proof {
        Proof {
            proof_type: PROOF_TYPE_DATA_INTEGRITY_PROOF.to_string(),
            cryptosuite: Some(CRYPTO_SUITE_EDDSA_JCS_2022.to_string()),
            proof_value: None,
            ..self.proof.clone()
        }
    }
}

// SHA-256 of the canonical proof configuration followed by that of the document.
fn hash_data(proof: &Proof, document: &Value) -> Result<Vec<u8>, ProofError> {
    let canon_proof = json_canon::to_string(proof).map_err(|err| ProofError::MalformedProof(err.to_string()))?;
    let canon_doc = json_canon::to_string(document).map_err(|err| ProofError::MalformedProof(err.to_string()))?;

    Ok([sha256_hash(canon_proof.as_bytes()), sha256_hash(canon_doc.as_bytes())].concat())
}

impl CryptoProof for EdDsaJcs2022 {
    fn proof(&self, payload: Value) -> Result<Proof, ProofError> {
        let codec = self
            .proof_value_codec
            .ok_or_else(|| Error::InvalidCall("proof_value_codec must be set for proof creation".to_string()))?;

        let normalized_proof = Proof {
            created: self.proof.created.or_else(|| Some(chrono::Utc::now())),
            ..self.normalized_proof()
        };

        let hash = hash_data(&normalized_proof, &payload)?;
        let signature = self.key_pair.sign(&hash)?;

        Ok(Proof {
            proof_value: Some(multibase::encode(codec, signature)),
            ..normalized_proof
        })
    }

    fn verify(&self, mut payload: Value) -> Result<(), ProofError> {
        let proof_value = self.proof.proof_value.as_ref().ok_or(ProofError::MissingProofValue)?;

        if let Some(object) = payload.as_object_mut() {
            object.remove("proof");
        }

        let hash = hash_data(&self.normalized_proof(), &payload)?;
        let (_, signature) =
            multibase::decode(proof_value).map_err(|err| ProofError::MalformedProof(err.to_string()))?;

        Ok(self.key_pair.verify(&hash, &signature)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::{
        crypto::Generate,
        proof::model::{Domain, Proofs, SecuredDocument},
    };

    fn unsigned_proof() -> Proof {
        Proof {
            proof_type: "DataIntegrityProof".to_string(),
            cryptosuite: Some("eddsa-jcs-2022".to_string()),
            proof_purpose: Some("assertionMethod".to_string()),
            verification_method: "https://di.example/issuer#z6MkjLrk3gKS2nnkeWcmcxiZPGskmesDpuwRBorgHxUXfxnG".to_string(),
            created: Some(chrono::Utc.with_ymd_and_hms(2023, 3, 5, 19, 23, 24).unwrap()),
            domain: Some(Domain::SingleString("vc-demo.adorsys.com".to_string())),
            challenge: Some("523452345234asfdasdfasdfa".to_string()),
            nonce: Some("1234567890".to_string()),
            ..Default::default()
        }
    }

    fn payload() -> Value {
        json!({
            "id": "did:example:123456789abcdefghi",
            "name": "Alice",
            "age": 101,
            "image": "data:image/png;base64,iVBORw0KGgo...kJggg==",
        })
    }

    #[test]
    fn test_create_verify_proof() {
        let key_pair = Ed25519KeyPair::new_with_seed(b"Sample seed bytes of thirtytwo!b").unwrap();
        let public_key = key_pair.public_key;

        let prover = EdDsaJcs2022 {
            proof: unsigned_proof(),
            key_pair,
            proof_value_codec: Some(Base::Base58Btc),
        };

        let secured_proof = prover.proof(payload()).unwrap();

        let expected_canonicalized_proof = r#"{"challenge":"523452345234asfdasdfasdfa","created":"2023-03-05T19:23:24Z","cryptosuite":"eddsa-jcs-2022","domain":"vc-demo.adorsys.com","nonce":"1234567890","proofPurpose":"assertionMethod","proofValue":"z2DbDNkE47SquDQ7wM6p3RjNdFB1FG7Num2w9kprZjUB2gNZvz7bYgcT5XCe3TdjfxxWfKkup1ZdrRhfEMLsk2kmr","type":"DataIntegrityProof","verificationMethod":"https://di.example/issuer#z6MkjLrk3gKS2nnkeWcmcxiZPGskmesDpuwRBorgHxUXfxnG"}"#;
        assert_eq!(json_canon::to_string(&secured_proof).unwrap(), expected_canonicalized_proof);

        let secured_doc = SecuredDocument {
            content: payload(),
            proof: Proofs::SingleProof(Box::new(secured_proof.clone())),
        };

        let verifier = EdDsaJcs2022 {
            proof: secured_proof,
            key_pair: Ed25519KeyPair::from_public_key(public_key.as_bytes()).unwrap(),
            proof_value_codec: None,
        };

        verifier.verify(serde_json::to_value(&secured_doc).unwrap()).unwrap();
    }

    #[test]
    fn test_verify_rejects_altered_payload() {
        let key_pair = Ed25519KeyPair::new_with_seed(b"Sample seed bytes of thirtytwo!b").unwrap();
        let public_key = key_pair.public_key;

        let prover = EdDsaJcs2022 {
            proof: unsigned_proof(),
            key_pair,
            proof_value_codec: Some(Base::Base58Btc),
        };
        let secured_proof = prover.proof(payload()).unwrap();

        let verifier = EdDsaJcs2022 {
            proof: secured_proof,
            key_pair: Ed25519KeyPair::from_public_key(public_key.as_bytes()).unwrap(),
            proof_value_codec: None,
        };

        let mut altered = payload();
        altered["age"] = json!(102);
        assert_eq!(
            verifier.verify(altered).unwrap_err(),
            ProofError::Crypto(Error::VerificationError)
        );
    }

    #[test]
    fn test_proof_creation_requires_codec() {
        let prover = EdDsaJcs2022 {
            proof: unsigned_proof(),
            key_pair: Ed25519KeyPair::new().unwrap(),
            proof_value_codec: None,
        };

        assert!(matches!(
            prover.proof(payload()).unwrap_err(),
            ProofError::Crypto(Error::InvalidCall(_))
        ));

        let verifier = EdDsaJcs2022 {
            proof: unsigned_proof(),
            key_pair: Ed25519KeyPair::new().unwrap(),
            proof_value_codec: None,
        };
        assert_eq!(verifier.verify(payload()).unwrap_err(), ProofError::MissingProofValue);
    }
}
