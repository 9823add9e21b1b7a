use multibase::Base::Base58Btc;

use crate::{
    crypto::{Algorithm, Ed25519KeyPair, Error as CryptoError, Generate, KeyMaterial},
    didcore::{Document as DIDDocument, KeyFormat, VerificationMethod, VerificationMethodType},
    ldmodel::Context,
    methods::{
        common::{decode_multikey, DecodeMultikeyError, PublicKeyFormat},
        errors::DIDResolutionError,
        traits::DIDMethod,
    },
};

#[derive(Default)]
pub struct DidKey {
    /// Key format to consider during DID expansion into a DID document
    key_format: PublicKeyFormat,
}

impl DIDMethod for DidKey {
    fn name() -> String {
        "did:key".to_string()
    }
}

impl DidKey {
    /// Creates new instance of DidKey.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates new instance of DidKey with given key format.
    pub fn with_format(key_format: PublicKeyFormat) -> Self {
        Self { key_format }
    }

    /// Generates did:key address ex nihilo, off self-generated Ed25519 key pair
    pub fn generate() -> Result<String, CryptoError> {
        let keypair = Ed25519KeyPair::new()?;
        Self::from_ed25519_keypair(&keypair)
    }

    /// Computes did:key address corresponding to Ed25519 key pair
    pub fn from_ed25519_keypair(keypair: &Ed25519KeyPair) -> Result<String, CryptoError> {
        Self::from_raw_public_key(Algorithm::Ed25519, &keypair.public_key_bytes()?)
    }

    /// Computes did:key address corresponding to raw public key bytes
    pub fn from_raw_public_key(alg: Algorithm, bytes: &[u8]) -> Result<String, CryptoError> {
        if let Some(required_length) = alg.public_key_length() {
            if required_length != bytes.len() {
                return Err(CryptoError::InvalidKeyLength);
            }
        }

        let multibase_value = multibase::encode(Base58Btc, [&alg.muticodec_prefix(), bytes].concat());

        Ok(format!("did:key:{multibase_value}"))
    }

    /// Expands `did:key` address into DID document
    ///
    /// See https://w3c-ccg.github.io/did-method-key/#document-creation-algorithm
    pub fn expand(&self, did: &str) -> Result<DIDDocument, DIDResolutionError> {
        let multikey = did.strip_prefix("did:key:").ok_or(DIDResolutionError::InvalidDid)?;

        let (alg, key) = decode_multikey(multikey).map_err(|err| match err {
            DecodeMultikeyError::UnknownAlgorithm => DIDResolutionError::UnsupportedPublicKeyType,
            _ => DIDResolutionError::InvalidDid,
        })?;
        let method = self.derive_verification_method(did, multikey, alg, &key)?;
        let reference = || vec![VerificationMethodType::Reference(method.id.clone())];

        let mut diddoc = DIDDocument {
            context: Context::SetOfString(vec![
                String::from("https://www.w3.org/ns/did/v1"),
                String::from(match (self.key_format, alg) {
                    (PublicKeyFormat::Jwk, _) => "https://w3id.org/security/suites/jws-2020/v1",
                    (PublicKeyFormat::Multikey, Algorithm::Ed25519) => "https://w3id.org/security/suites/ed25519-2020/v1",
                    (PublicKeyFormat::Multikey, Algorithm::X25519) => "https://w3id.org/security/suites/x25519-2020/v1",
                    (PublicKeyFormat::Multikey, _) => "https://w3id.org/security/multikey/v1",
                }),
            ]),
            id: did.to_string(),
            controller: None,
            also_known_as: None,
            verification_method: None,
            authentication: None,
            assertion_method: None,
            capability_delegation: None,
            capability_invocation: None,
            key_agreement: None,
            service: None,
            additional_properties: None,
        };

        // Encryption keys only serve key agreement
        if alg == Algorithm::X25519 {
            diddoc.key_agreement = Some(reference());
        } else {
            diddoc.authentication = Some(reference());
            diddoc.assertion_method = Some(reference());
            diddoc.capability_delegation = Some(reference());
            diddoc.capability_invocation = Some(reference());
        }

        diddoc.verification_method = Some(vec![method]);

        Ok(diddoc)
    }

    /// Derives verification method from multikey constituents
    fn derive_verification_method(&self, did: &str, multikey: &str, alg: Algorithm, key: &[u8]) -> Result<VerificationMethod, DIDResolutionError> {
        match alg.public_key_length() {
            Some(required_length) if required_length != key.len() => return Err(DIDResolutionError::InvalidPublicKeyLength),
            None => return Err(DIDResolutionError::UnsupportedPublicKeyType),
            _ => (),
        }

        let (key_type, public_key) = match self.key_format {
            PublicKeyFormat::Multikey => (
                match alg {
                    Algorithm::Ed25519 => "Ed25519VerificationKey2020",
                    Algorithm::X25519 => "X25519KeyAgreementKey2020",
                    Algorithm::Secp256k1 => "EcdsaSecp256k1VerificationKey2019",
                    _ => "Multikey",
                },
                KeyFormat::Multibase {
                    public_key_multibase: multikey.to_string(),
                },
            ),
            PublicKeyFormat::Jwk => (
                "JsonWebKey2020",
                KeyFormat::Jwk {
                    public_key_jwk: alg.build_jwk(key).map_err(|_| DIDResolutionError::UnsupportedPublicKeyType)?,
                },
            ),
        };

        Ok(VerificationMethod {
            id: format!("{did}#{multikey}"),
            key_type: key_type.to_string(),
            controller: did.to_string(),
            public_key: Some(public_key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::didcore::Jwk;

    #[test]
    fn test_did_key_generation() {
        let did = DidKey::generate();
        assert!(did.unwrap().starts_with("did:key:z6Mk"));
    }

    #[test]
    fn test_did_key_generation_from_given_key_material() {
        let entries = [
            (
                Algorithm::Ed25519,
                hex::decode("3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29").unwrap(),
                "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp",
            ),
            (
                Algorithm::Secp256k1,
                hex::decode("03874c15c7fda20e539c6e5ba573c139884c351188799f5458b4b41f7924f235cd").unwrap(),
                "did:key:zQ3shokFTS3brHcDQrn82RUDfCZESWL1ZdCEJwekUDPQiYBme",
            ),
        ];

        for (alg, bytes, expected) in entries {
            assert_eq!(DidKey::from_raw_public_key(alg, &bytes).unwrap(), expected);
        }

        let keypair = Ed25519KeyPair::from_public_key_slice(
            &hex::decode("3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29").unwrap(),
        )
        .unwrap();
        assert_eq!(
            DidKey::from_ed25519_keypair(&keypair).unwrap(),
            "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"
        );

        assert_eq!(
            DidKey::from_raw_public_key(Algorithm::Ed25519, &[0u8; 31]).unwrap_err(),
            CryptoError::InvalidKeyLength
        );
    }

    #[test]
    fn test_did_key_expansion_multikey() {
        let did = "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp";
        let diddoc = DidKey::new().expand(did).unwrap();

        let expected = serde_json::json!({
            "@context": [
                "https://www.w3.org/ns/did/v1",
                "https://w3id.org/security/suites/ed25519-2020/v1"
            ],
            "id": did,
            "verificationMethod": [{
                "id": "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp#z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp",
                "type": "Ed25519VerificationKey2020",
                "controller": did,
                "publicKeyMultibase": "z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"
            }],
            "authentication": ["did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp#z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"],
            "assertionMethod": ["did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp#z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"],
            "capabilityDelegation": ["did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp#z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"],
            "capabilityInvocation": ["did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp#z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"]
        });

        assert_eq!(json_canon::to_string(&diddoc).unwrap(), json_canon::to_string(&expected).unwrap());
    }

    #[test]
    fn test_did_key_expansion_jwk() {
        let did = "did:key:zQ3shokFTS3brHcDQrn82RUDfCZESWL1ZdCEJwekUDPQiYBme";
        let diddoc = DidKey::with_format(PublicKeyFormat::Jwk).expand(did).unwrap();

        let vm = diddoc
            .find_verification_method("#zQ3shokFTS3brHcDQrn82RUDfCZESWL1ZdCEJwekUDPQiYBme")
            .unwrap();
        assert_eq!(vm.key_type, "JsonWebKey2020");

        let Some(KeyFormat::Jwk { public_key_jwk }) = &vm.public_key else {
            panic!("expected a JWK");
        };
        let expected: Jwk = serde_json::from_str(
            r#"{
                "kty": "EC",
                "crv": "secp256k1",
                "x": "h0wVx_2iDlOcblulc8E5iEw1EYh5n1RYtLQfeSTyNc0",
                "y": "O2EATIGbu6DezKFptj5scAIRntgfecanVNXxat1rnwE"
            }"#,
        )
        .unwrap();
        assert_eq!(public_key_jwk, &expected);

        assert_eq!(vm.public_key().unwrap().algorithm(), Algorithm::Secp256k1);
    }

    #[test]
    fn test_did_key_expansion_failures() {
        let did_method = DidKey::new();

        let cases = [
            ("did:web:example.com", DIDResolutionError::InvalidDid),
            ("did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp0", DIDResolutionError::InvalidDid),
            ("did:key:z2DQVsnzKoPrzWGGeSt3PXeA8HH4gfaP66XgS4nugS6VH3P", DIDResolutionError::InvalidPublicKeyLength),
            // P-256 keys are not supported
            ("did:key:zDnaerDaTF5BXEavCrfRZEk316dpbLsfPDZ3WJ5hRTPFU2169", DIDResolutionError::UnsupportedPublicKeyType),
        ];

        for (did, expected_err) in cases {
            assert_eq!(did_method.expand(did).unwrap_err(), expected_err);
        }
    }
}
