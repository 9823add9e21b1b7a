use std::collections::HashMap;

use multibase::Base::{Base58Btc, Base64Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    crypto::{Algorithm, Error as CryptoError, PublicKey, Secp256k1KeyPair},
    ldmodel::Context,
};

// === Structure of a did document ===

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    // The @context property defines the vocabulary used in the JSON-LD document.
    // Plain JSON representations (application/did+json) may omit it.
    #[serde(rename = "@context", default = "default_context")]
    pub context: Context,

    // === Identifier ===

    // Identifier property is mandatory in a did document.
    // see https://www.w3.org/TR/did-core/#dfn-id
    pub id: String,

    // See https://www.w3.org/TR/did-core/#dfn-controller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<Controller>,

    // See https://www.w3.org/TR/did-core/#dfn-alsoknownas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub also_known_as: Option<Vec<String>>,

    // === Verification Methods ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<Vec<VerificationMethod>>,

    // === Verification Relationships ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Vec<VerificationMethodType>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion_method: Option<Vec<VerificationMethodType>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability_delegation: Option<Vec<VerificationMethodType>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability_invocation: Option<Vec<VerificationMethodType>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_agreement: Option<Vec<VerificationMethodType>>,

    // === Services ===
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<Service>>,

    // === Dynamic Properties ===
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(flatten)]
    pub additional_properties: Option<HashMap<String, Value>>,
}

fn default_context() -> Context {
    Context::SingleString(String::from("https://www.w3.org/ns/did/v1"))
}

#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Controller {
    SingleString(String),
    SetOfString(Vec<String>),
}

// See https://www.w3.org/TR/did-core/#services
#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,

    #[serde(rename = "type")]
    pub service_type: String,

    pub service_endpoint: ServiceEndpoint,

    // === Additional properties ===
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(flatten)]
    pub additional_properties: Option<HashMap<String, Value>>,
}

// See https://www.w3.org/TR/did-core/#dfn-serviceendpoint
#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ServiceEndpoint {
    Uri(String),
    Structured(Value),
}

#[derive(Serialize, Debug, Clone, PartialEq, Default, Deserialize)]
pub struct VerificationMethod {
    pub id: String,

    #[serde(rename = "type")]
    pub key_type: String,

    pub controller: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(flatten)]
    pub public_key: Option<KeyFormat>,
}

// Verification material, flattened into the verification method.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum KeyFormat {
    #[serde(rename_all = "camelCase")]
    Multibase { public_key_multibase: String },
    #[serde(rename_all = "camelCase")]
    Jwk { public_key_jwk: Jwk },
    #[serde(rename_all = "camelCase")]
    Base58 { public_key_base58: String },
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct Jwk {
    #[serde(rename = "kid", skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(rename = "kty")]
    pub key_type: String,
    #[serde(rename = "crv")]
    pub curve: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

// === Verification relationship entry ===
#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VerificationMethodType {
    Reference(String),
    Embedded(Box<VerificationMethod>),
}

impl Document {
    /// Resolves a verification method by its DID URL.
    ///
    /// Both the lookup key and the method ids may be relative (`#key-1`),
    /// in which case they are read against the document id.
    pub fn find_verification_method(&self, did_url: &str) -> Option<&VerificationMethod> {
        let needle = self.absolute_id(did_url);

        let relationships = [
            &self.authentication,
            &self.assertion_method,
            &self.capability_delegation,
            &self.capability_invocation,
            &self.key_agreement,
        ];

        let embedded = relationships.into_iter().flatten().flatten().filter_map(|entry| match entry {
            VerificationMethodType::Embedded(vm) => Some(vm.as_ref()),
            VerificationMethodType::Reference(_) => None,
        });

        self.verification_method
            .iter()
            .flatten()
            .chain(embedded)
            .find(|vm| self.absolute_id(&vm.id) == needle)
    }

    fn absolute_id(&self, id: &str) -> String {
        if id.starts_with('#') {
            format!("{}{}", self.id, id)
        } else {
            id.to_string()
        }
    }
}

impl VerificationMethod {
    /// Extracts the verification key carried by this method.
    pub fn public_key(&self) -> Result<PublicKey, CryptoError> {
        match &self.public_key {
            Some(KeyFormat::Multibase { public_key_multibase }) => {
                let (_, bytes) = multibase::decode(public_key_multibase).map_err(|_| CryptoError::InvalidPublicKey)?;
                self.decode_key_bytes(&bytes)
            }
            Some(KeyFormat::Base58 { public_key_base58 }) => {
                let bytes = Base58Btc.decode(public_key_base58).map_err(|_| CryptoError::InvalidPublicKey)?;
                self.decode_key_bytes(&bytes)
            }
            Some(KeyFormat::Jwk { public_key_jwk }) => public_key_jwk.public_key(),
            None => Err(CryptoError::InvalidPublicKey),
        }
    }

    // Raw key bytes may or may not carry a multicodec prefix.
    fn decode_key_bytes(&self, bytes: &[u8]) -> Result<PublicKey, CryptoError> {
        if bytes.len() > 2 {
            let prefix = [bytes[0], bytes[1]];
            if let Some(alg) = Algorithm::from_muticodec_prefix(&prefix) {
                if alg.public_key_length() == Some(bytes.len() - 2) {
                    return PublicKey::from_raw(alg, &bytes[2..]);
                }
            }
        }

        if self.key_type.starts_with("Ed25519") {
            PublicKey::from_raw(Algorithm::Ed25519, bytes)
        } else if self.key_type.starts_with("EcdsaSecp256k1") {
            PublicKey::from_raw(Algorithm::Secp256k1, bytes)
        } else {
            Err(CryptoError::Unsupported)
        }
    }
}

impl Jwk {
    /// Converts the public part of the JWK into verification key material.
    pub fn public_key(&self) -> Result<PublicKey, CryptoError> {
        let decode = |coordinate: &Option<String>| -> Result<Vec<u8>, CryptoError> {
            let encoded = coordinate.as_ref().ok_or(CryptoError::InvalidPublicKey)?;
            Base64Url.decode(encoded).map_err(|_| CryptoError::InvalidPublicKey)
        };

        match (self.key_type.as_str(), self.curve.as_str()) {
            ("OKP", "Ed25519") => PublicKey::from_raw(Algorithm::Ed25519, &decode(&self.x)?),
            ("EC", "secp256k1") => {
                let keypair = Secp256k1KeyPair::from_coordinates(&decode(&self.x)?, &decode(&self.y)?)?;
                Ok(PublicKey::Secp256k1(keypair))
            }
            _ => Err(CryptoError::Unsupported),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::crypto::{KeyMaterial, ToMultikey};

    fn ion_document() -> Document {
        let raw = std::fs::read_to_string("test_resources/ion_did_document.json").unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_parse_document_with_structured_service_endpoints() {
        let document = ion_document();

        assert!(matches!(document.context, Context::JsonObject(_)));
        assert!(document.context.contains("https://www.w3.org/ns/did/v1"));

        let services = document.service.as_ref().unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].service_type, "LinkedDomains");
        assert!(matches!(services[0].service_endpoint, ServiceEndpoint::Structured(_)));
    }

    #[test]
    fn test_find_verification_method_with_relative_id() {
        let document = ion_document();
        let did_url = format!("{}#66dd51fe0cac4f1aae812d0aa109bc2avcSigningKey-2e975", document.id);

        let vm = document.find_verification_method(&did_url).unwrap();
        assert_eq!(vm.key_type, "EcdsaSecp256k1VerificationKey2019");

        let same = document.find_verification_method("#66dd51fe0cac4f1aae812d0aa109bc2avcSigningKey-2e975");
        assert_eq!(same, Some(vm));

        assert!(document.find_verification_method("#unknown").is_none());
        assert!(document.find_verification_method("did:ion:other#66dd51fe0cac4f1aae812d0aa109bc2avcSigningKey-2e975").is_none());

        let key = vm.public_key().unwrap();
        assert_eq!(key.algorithm(), Algorithm::Secp256k1);
    }

    #[test]
    fn test_find_embedded_verification_method() {
        let document: Document = serde_json::from_str(
            r#"{
                "@context": "https://www.w3.org/ns/did/v1",
                "id": "did:example:123",
                "assertionMethod": [
                    "did:example:123#key-0",
                    {
                        "id": "did:example:123#key-1",
                        "type": "Ed25519VerificationKey2018",
                        "controller": "did:example:123",
                        "publicKeyBase58": "H3C2AVvLMv6gmMNam3uVAjZpfkcJCwDwnZn6z3wXmqPV"
                    }
                ]
            }"#,
        )
        .unwrap();

        let vm = document.find_verification_method("did:example:123#key-1").unwrap();
        assert!(matches!(vm.public_key, Some(KeyFormat::Base58 { .. })));

        let key = vm.public_key().unwrap();
        assert_eq!(key.algorithm(), Algorithm::Ed25519);

        // References are not verification methods on their own
        assert!(document.find_verification_method("did:example:123#key-0").is_none());
    }

    #[test]
    fn test_public_key_from_multibase_and_jwk() {
        let multikey = VerificationMethod {
            id: "#key".to_string(),
            key_type: "Ed25519VerificationKey2020".to_string(),
            controller: "did:example:123".to_string(),
            public_key: Some(KeyFormat::Multibase {
                public_key_multibase: "z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp".to_string(),
            }),
        };

        let PublicKey::Ed25519(keypair) = multikey.public_key().unwrap() else {
            panic!("expected an Ed25519 key");
        };
        assert_eq!(keypair.to_multikey(), "z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp");

        let jwk: Jwk = serde_json::from_str(
            r#"{
                "kty": "OKP",
                "crv": "Ed25519",
                "x": "O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2ik"
            }"#,
        )
        .unwrap();

        let PublicKey::Ed25519(from_jwk) = jwk.public_key().unwrap() else {
            panic!("expected an Ed25519 key");
        };
        assert_eq!(from_jwk.public_key_bytes().unwrap(), keypair.public_key_bytes().unwrap());

        let unsupported = Jwk {
            key_type: "EC".to_string(),
            curve: "P-384".to_string(),
            ..Default::default()
        };
        assert_eq!(unsupported.public_key().unwrap_err(), CryptoError::Unsupported);
    }

    #[test]
    fn test_verification_method_serialization_keeps_key_property_name() {
        let vm = VerificationMethod {
            id: "did:example:123#key".to_string(),
            key_type: "JsonWebKey2020".to_string(),
            controller: "did:example:123".to_string(),
            public_key: Some(KeyFormat::Jwk {
                public_key_jwk: Jwk {
                    key_type: "OKP".to_string(),
                    curve: "Ed25519".to_string(),
                    x: Some("O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2ik".to_string()),
                    ..Default::default()
                },
            }),
        };

        let expected = r#"{"controller":"did:example:123","id":"did:example:123#key","publicKeyJwk":{"crv":"Ed25519","kty":"OKP","x":"O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2ik"},"type":"JsonWebKey2020"}"#;
        assert_eq!(json_canon::to_string(&vm).unwrap(), expected);
    }
}
