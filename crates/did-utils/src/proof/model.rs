use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    // An optional identifier for the proof.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // See https://www.w3.org/TR/vc-data-integrity/#dfn-proof-type
    #[serde(rename = "type")]
    pub proof_type: String,

    // Only used with the `DataIntegrityProof` type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cryptosuite: Option<String>,

    // See https://www.w3.org/TR/vc-data-integrity/#dfn-proof-purpose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,

    // See https://www.w3.org/TR/vc-data-integrity/#dfn-verification-method
    pub verification_method: String,

    // The date and time the proof was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    // The date and time that the proof expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    // One or more security domains in which the proof is meant to be used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,

    // Used once for a particular domain and window of time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,

    // Multibase-encoded signature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,

    // Detached JWS signature of the 2018/2019 linked-data suites
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jws: Option<String>,

    // See https://www.w3.org/TR/vc-data-integrity/#proof-chains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_proof: Option<PreviousProofs>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Domain {
    SingleString(String),
    SetOfString(Vec<String>),
}

#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PreviousProofs {
    SingleString(String),
    SetOfString(Vec<String>),
}

#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Proofs {
    SingleProof(Box<Proof>),
    SetOfProofs(Vec<Proof>),
}

impl Proofs {
    /// Iterates over the proofs regardless of cardinality.
    pub fn iter(&self) -> impl Iterator<Item = &Proof> {
        match self {
            Proofs::SingleProof(proof) => std::slice::from_ref(&**proof).iter(),
            Proofs::SetOfProofs(proofs) => proofs.iter(),
        }
    }
}

/// A document with its proofs attached.
#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
pub struct SecuredDocument {
    #[serde(flatten)]
    pub content: Value,

    pub proof: Proofs,
}
