//! Linked-data proof suites.
//!
//! The 2018 to 2020 suites are created and checked by `ssi`, which carries
//! out JSON-LD expansion and URDNA2015 canonicalization. A `DataIntegrityProof`
//! with the `eddsa-jcs-2022` cryptosuite goes through [`EdDsaJcs2022`].
//!
//! Verification keys are resolved upstream: `ssi` is handed a DID document
//! holding that single key.

use async_trait::async_trait;
use multibase::Base;
use serde_json::{json, Map, Value};
use ssi::{
    did::Document,
    did_resolve::{
        DIDResolver, DocumentMetadata, ResolutionInputMetadata, ResolutionMetadata, ERROR_NOT_FOUND, TYPE_DID_LD_JSON,
    },
    jwk::JWK,
    ldp::{Proof as LdpProof, ProofSuiteType},
    vc::{Credential, LinkedDataProofOptions, URI},
};
use tracing::debug;

use crate::{
    crypto::{Ed25519KeyPair, Generate, KeyMaterial, PublicKey},
    didcore::Jwk,
    jsonld::{self, ContextLoader},
};

use super::{
    eddsa_jcs_2022::{EdDsaJcs2022, CRYPTO_SUITE_EDDSA_JCS_2022, PROOF_TYPE_DATA_INTEGRITY_PROOF},
    error::ProofError,
    model::Proof,
    traits::CryptoProof,
};

pub const PROOF_TYPE_ED25519_SIGNATURE_2018: &str = "Ed25519Signature2018";
pub const PROOF_TYPE_ED25519_SIGNATURE_2020: &str = "Ed25519Signature2020";
pub const PROOF_TYPE_JSON_WEB_SIGNATURE_2020: &str = "JsonWebSignature2020";
pub const PROOF_TYPE_ECDSA_SECP256K1_SIGNATURE_2019: &str = "EcdsaSecp256k1Signature2019";

const DID_V1_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedDataSuite {
    Ed25519Signature2018,
    Ed25519Signature2020,
    JsonWebSignature2020,
    EcdsaSecp256k1Signature2019,
    EddsaJcs2022,
}

impl LinkedDataSuite {
    /// Picks the suite named by the proof type and cryptosuite.
    pub fn of(proof: &Proof) -> Result<Self, ProofError> {
        match (proof.proof_type.as_str(), proof.cryptosuite.as_deref()) {
            (PROOF_TYPE_ED25519_SIGNATURE_2018, _) => Ok(LinkedDataSuite::Ed25519Signature2018),
            (PROOF_TYPE_ED25519_SIGNATURE_2020, _) => Ok(LinkedDataSuite::Ed25519Signature2020),
            (PROOF_TYPE_JSON_WEB_SIGNATURE_2020, _) => Ok(LinkedDataSuite::JsonWebSignature2020),
            (PROOF_TYPE_ECDSA_SECP256K1_SIGNATURE_2019, _) => Ok(LinkedDataSuite::EcdsaSecp256k1Signature2019),
            (PROOF_TYPE_DATA_INTEGRITY_PROOF, Some(CRYPTO_SUITE_EDDSA_JCS_2022)) => Ok(LinkedDataSuite::EddsaJcs2022),
            (proof_type, cryptosuite) => Err(ProofError::UnsupportedProofType(match cryptosuite {
                Some(cryptosuite) => format!("{proof_type} ({cryptosuite})"),
                None => proof_type.to_string(),
            })),
        }
    }

    pub fn proof_type(&self) -> &'static str {
        match self {
            LinkedDataSuite::Ed25519Signature2018 => PROOF_TYPE_ED25519_SIGNATURE_2018,
            LinkedDataSuite::Ed25519Signature2020 => PROOF_TYPE_ED25519_SIGNATURE_2020,
            LinkedDataSuite::JsonWebSignature2020 => PROOF_TYPE_JSON_WEB_SIGNATURE_2020,
            LinkedDataSuite::EcdsaSecp256k1Signature2019 => PROOF_TYPE_ECDSA_SECP256K1_SIGNATURE_2019,
            LinkedDataSuite::EddsaJcs2022 => PROOF_TYPE_DATA_INTEGRITY_PROOF,
        }
    }

    pub fn cryptosuite(&self) -> Option<&'static str> {
        match self {
            LinkedDataSuite::EddsaJcs2022 => Some(CRYPTO_SUITE_EDDSA_JCS_2022),
            _ => None,
        }
    }

    // `None` for the suites not delegated to ssi.
    fn ssi_suite(&self) -> Option<ProofSuiteType> {
        match self {
            LinkedDataSuite::Ed25519Signature2018 => Some(ProofSuiteType::Ed25519Signature2018),
            LinkedDataSuite::Ed25519Signature2020 => Some(ProofSuiteType::Ed25519Signature2020),
            LinkedDataSuite::JsonWebSignature2020 => Some(ProofSuiteType::JsonWebSignature2020),
            LinkedDataSuite::EcdsaSecp256k1Signature2019 => Some(ProofSuiteType::EcdsaSecp256k1Signature2019),
            LinkedDataSuite::EddsaJcs2022 => None,
        }
    }

    // Verification method type the suite expects its key under.
    fn verification_method_type(&self) -> &'static str {
        match self {
            LinkedDataSuite::Ed25519Signature2018 => "Ed25519VerificationKey2018",
            LinkedDataSuite::Ed25519Signature2020 => "Ed25519VerificationKey2020",
            LinkedDataSuite::EcdsaSecp256k1Signature2019 => "EcdsaSecp256k1VerificationKey2019",
            LinkedDataSuite::JsonWebSignature2020 | LinkedDataSuite::EddsaJcs2022 => "JsonWebKey2020",
        }
    }
}

/// A linked-data proof bound to its verification key.
pub struct LinkedDataProof<'a> {
    suite: LinkedDataSuite,
    verification_method: String,
    proof: Value,
    key: PublicKey,
    loader: &'a dyn ContextLoader,
}

impl<'a> LinkedDataProof<'a> {
    /// Prepares a new proof, made with `key` under the given verification method.
    pub fn new(suite: LinkedDataSuite, verification_method: &str, key: PublicKey, loader: &'a dyn ContextLoader) -> Self {
        let mut proof = json!({
            "type": suite.proof_type(),
            "proofPurpose": "assertionMethod",
            "verificationMethod": verification_method,
        });
        if let Some(cryptosuite) = suite.cryptosuite() {
            proof["cryptosuite"] = json!(cryptosuite);
        }

        LinkedDataProof {
            suite,
            verification_method: verification_method.to_string(),
            proof,
            key,
            loader,
        }
    }

    /// Wraps a proof as found in a secured document.
    pub fn from_value(proof: &Value, key: PublicKey, loader: &'a dyn ContextLoader) -> Result<Self, ProofError> {
        let typed: Proof =
            serde_json::from_value(proof.clone()).map_err(|err| ProofError::MalformedProof(err.to_string()))?;

        Ok(LinkedDataProof {
            suite: LinkedDataSuite::of(&typed)?,
            verification_method: typed.verification_method,
            proof: proof.clone(),
            key,
            loader,
        })
    }

    pub fn suite(&self) -> LinkedDataSuite {
        self.suite
    }

    /// Secures the document, replacing any proof it carries.
    pub async fn sign(&self, document: Value) -> Result<Value, ProofError> {
        let Value::Object(mut unsigned) = document else {
            return Err(ProofError::MalformedProof(String::from("document must be an object")));
        };
        unsigned.remove("proof");

        let proof = match self.suite {
            LinkedDataSuite::EddsaJcs2022 => self.sign_jcs(Value::Object(unsigned.clone()))?,
            _ => self.sign_with_ssi(&unsigned).await?,
        };

        unsigned.insert(String::from("proof"), proof);
        Ok(Value::Object(unsigned))
    }

    /// Verifies this proof over the secured document.
    ///
    /// Other proofs the document carries are not covered by the signature.
    pub async fn verify(&self, secured: &Value) -> Result<(), ProofError> {
        let Value::Object(entries) = secured else {
            return Err(ProofError::MalformedProof(String::from("secured document must be an object")));
        };

        let mut unsigned = entries.clone();
        unsigned.remove("proof");

        match self.suite {
            LinkedDataSuite::EddsaJcs2022 => self.verify_jcs(Value::Object(unsigned)),
            _ => self.verify_with_ssi(unsigned).await,
        }
    }

    async fn sign_with_ssi(&self, unsigned: &Map<String, Value>) -> Result<Value, ProofError> {
        let document = Value::Object(unsigned.clone());
        let credential = as_credential(&document)?;
        let jwk = to_ssi_jwk(self.key.to_secret_jwk()?)?;

        let key_document = self.key_document()?;
        let mut loader = jsonld::document_loader(&document, self.loader)?;
        let options = LinkedDataProofOptions {
            type_: self.suite.ssi_suite(),
            verification_method: Some(URI::String(self.verification_method.clone())),
            ..Default::default()
        };

        let proof = credential
            .generate_proof(&jwk, &options, &KeyResolver::new(&key_document), &mut loader)
            .await
            .map_err(|err| ProofError::Signing(err.to_string()))?;

        serde_json::to_value(proof).map_err(|err| ProofError::Signing(err.to_string()))
    }

    async fn verify_with_ssi(&self, mut unsigned: Map<String, Value>) -> Result<(), ProofError> {
        let credential = as_credential(&Value::Object(unsigned.clone()))?;
        let proof: LdpProof =
            serde_json::from_value(self.proof.clone()).map_err(|err| ProofError::MalformedProof(err.to_string()))?;

        let key_document = self.key_document()?;
        unsigned.insert(String::from("proof"), self.proof.clone());
        let mut loader = jsonld::document_loader(&Value::Object(unsigned), self.loader)?;

        let result = proof.verify(&credential, &KeyResolver::new(&key_document), &mut loader).await;
        if result.errors.is_empty() {
            return Ok(());
        }

        debug!(verification_method = %self.verification_method, errors = ?result.errors, "linked-data proof rejected");
        Err(ProofError::Rejected(result.errors.join("; ")))
    }

    fn sign_jcs(&self, unsigned: Value) -> Result<Value, ProofError> {
        let signer = EdDsaJcs2022 {
            proof: Proof {
                proof_type: PROOF_TYPE_DATA_INTEGRITY_PROOF.to_string(),
                cryptosuite: Some(CRYPTO_SUITE_EDDSA_JCS_2022.to_string()),
                proof_purpose: Some(String::from("assertionMethod")),
                verification_method: self.verification_method.clone(),
                ..Default::default()
            },
            key_pair: Ed25519KeyPair::from_secret_key(&self.ed25519_key()?.private_key_bytes()?)?,
            proof_value_codec: Some(Base::Base58Btc),
        };

        let proof = signer.proof(unsigned)?;
        serde_json::to_value(proof).map_err(|err| ProofError::Signing(err.to_string()))
    }

    fn verify_jcs(&self, unsigned: Value) -> Result<(), ProofError> {
        let verifier = EdDsaJcs2022 {
            proof: serde_json::from_value(self.proof.clone()).map_err(|err| ProofError::MalformedProof(err.to_string()))?,
            key_pair: Ed25519KeyPair::from_public_key(&self.ed25519_key()?.public_key_bytes()?)?,
            proof_value_codec: None,
        };

        verifier.verify(unsigned)
    }

    fn ed25519_key(&self) -> Result<&Ed25519KeyPair, ProofError> {
        match &self.key {
            PublicKey::Ed25519(keypair) => Ok(keypair),
            PublicKey::Secp256k1(_) => Err(ProofError::MalformedProof(format!(
                "{CRYPTO_SUITE_EDDSA_JCS_2022} requires an Ed25519 key"
            ))),
        }
    }

    // A DID document holding the verification key alone.
    fn key_document(&self) -> Result<Document, ProofError> {
        let did = match self.verification_method.split_once('#') {
            Some((did, _)) if did.starts_with("did:") => did,
            _ => {
                return Err(ProofError::MalformedProof(format!(
                    "verification method {} is not an absolute DID URL",
                    self.verification_method
                )))
            }
        };

        serde_json::from_value(json!({
            "@context": DID_V1_CONTEXT,
            "id": did,
            "verificationMethod": [{
                "id": self.verification_method,
                "type": self.suite.verification_method_type(),
                "controller": did,
                "publicKeyJwk": self.key.to_jwk()?,
            }],
            "assertionMethod": [self.verification_method],
            "authentication": [self.verification_method],
        }))
        .map_err(|err| ProofError::MalformedProof(format!("verification method {}: {err}", self.verification_method)))
    }
}

fn as_credential(document: &Value) -> Result<Credential, ProofError> {
    serde_json::from_value(document.clone())
        .map_err(|err| ProofError::MalformedProof(format!("not a verifiable credential: {err}")))
}

fn to_ssi_jwk(jwk: Jwk) -> Result<JWK, ProofError> {
    serde_json::to_value(jwk)
        .and_then(serde_json::from_value)
        .map_err(|err| ProofError::MalformedProof(format!("unusable key: {err}")))
}

// Serves a single DID document to ssi.
struct KeyResolver<'a> {
    diddoc: &'a Document,
}

impl<'a> KeyResolver<'a> {
    fn new(diddoc: &'a Document) -> Self {
        Self { diddoc }
    }

    fn not_found() -> ResolutionMetadata {
        ResolutionMetadata {
            error: Some(ERROR_NOT_FOUND.to_string()),
            content_type: None,
            property_set: None,
        }
    }
}

#[async_trait]
impl DIDResolver for KeyResolver<'_> {
    async fn resolve(
        &self,
        did: &str,
        _input_metadata: &ResolutionInputMetadata,
    ) -> (ResolutionMetadata, Option<Document>, Option<DocumentMetadata>) {
        if did != self.diddoc.id {
            return (Self::not_found(), None, None);
        }

        (
            ResolutionMetadata {
                content_type: Some(TYPE_DID_LD_JSON.to_string()),
                ..Default::default()
            },
            Some(self.diddoc.clone()),
            Some(DocumentMetadata::default()),
        )
    }

    async fn resolve_representation(
        &self,
        did: &str,
        _input_metadata: &ResolutionInputMetadata,
    ) -> (ResolutionMetadata, Vec<u8>, Option<DocumentMetadata>) {
        if did != self.diddoc.id {
            return (Self::not_found(), Vec::new(), None);
        }

        match serde_json::to_vec(self.diddoc) {
            Ok(representation) => (
                ResolutionMetadata {
                    content_type: Some(TYPE_DID_LD_JSON.to_string()),
                    ..Default::default()
                },
                representation,
                Some(DocumentMetadata::default()),
            ),
            Err(err) => (
                ResolutionMetadata {
                    error: Some(err.to_string()),
                    content_type: None,
                    property_set: None,
                },
                Vec::new(),
                None,
            ),
        }
    }
}
