//! This module provides utilities for creating and verifying proofs.
//!
//! [`LinkedDataProof`] dispatches on the proof type. `Ed25519Signature2018`,
//! `Ed25519Signature2020`, `JsonWebSignature2020` and
//! `EcdsaSecp256k1Signature2019` are handled by `ssi`, over the URDNA2015
//! canonical form of the document. `DataIntegrityProof` with the
//! `eddsa-jcs-2022` cryptosuite goes to [`EdDsaJcs2022`], which signs the JCS
//! canonical form and can also be used on its own.
//!
//! # Examples
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use did_utils::crypto::{Ed25519KeyPair, Generate};
//! use did_utils::proof::{CryptoProof, EdDsaJcs2022, Proof};
//! use multibase::Base;
//! use serde_json::json;
//!
//! let key_pair = Ed25519KeyPair::new_with_seed(b"Sample seed bytes of thirtytwo!b")?;
//! let public_key = key_pair.public_key;
//!
//! let proof = Proof {
//!     proof_type: "DataIntegrityProof".to_string(),
//!     proof_purpose: Some("assertionMethod".to_string()),
//!     verification_method: "https://di.example/issuer#z6MkjLrk3gKS2nnkeWcmcxiZPGskmesDpuwRBorgHxUXfxnG".to_string(),
//!     ..Default::default()
//! };
//!
//! let payload = json!({ "id": "did:example:123456789abcdefghi", "name": "Alice" });
//!
//! let prover = EdDsaJcs2022 { proof, key_pair, proof_value_codec: Some(Base::Base58Btc) };
//! let secured_proof = prover.proof(payload.clone())?;
//!
//! let verifier = EdDsaJcs2022 {
//!     proof: secured_proof,
//!     key_pair: Ed25519KeyPair::from_public_key(public_key.as_bytes())?,
//!     proof_value_codec: None,
//! };
//! verifier.verify(payload)?;
//! # Ok(())
//! # }
//! ```

mod eddsa_jcs_2022;
mod error;
mod linked_data;
mod model;
mod traits;

// public re-exports
pub use eddsa_jcs_2022::{EdDsaJcs2022, CRYPTO_SUITE_EDDSA_JCS_2022, PROOF_TYPE_DATA_INTEGRITY_PROOF};
pub use error::ProofError;
pub use linked_data::{
    LinkedDataProof, LinkedDataSuite, PROOF_TYPE_ECDSA_SECP256K1_SIGNATURE_2019, PROOF_TYPE_ED25519_SIGNATURE_2018,
    PROOF_TYPE_ED25519_SIGNATURE_2020, PROOF_TYPE_JSON_WEB_SIGNATURE_2020,
};
pub use model::{Domain, PreviousProofs, Proof, Proofs, SecuredDocument};
pub use traits::CryptoProof;
