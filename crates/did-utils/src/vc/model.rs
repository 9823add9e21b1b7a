use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{ldmodel::Context, proof::Proofs};

/// Represents a Verifiable Credential.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Context,

    // Identifier of this credential.
    // WARNING: This is not the identifier of the subject of the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // see https://www.w3.org/TR/vc-data-model/#types
    #[serde(rename = "type", deserialize_with = "one_or_many")]
    pub cred_type: Vec<String>,

    // see https://www.w3.org/TR/vc-data-model/#issuer
    pub issuer: Issuer,

    // Data model 1.1 validity period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,

    // Data model 2.0 validity period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,

    // See https://www.w3.org/TR/vc-data-model/#credential-subject
    pub credential_subject: CredentialSubject,

    // We allow a vc to be read without the proof block, as envelope
    // signatures carry it outside of the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proofs>,

    // === Properties Map===
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl VerifiableCredential {
    /// Tells whether the credential is declared with the given type.
    pub fn has_type(&self, cred_type: &str) -> bool {
        self.cred_type.iter().any(|t| t == cred_type)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Issuer {
    SingleString(String),
    IssuerObject(IssuerObject),
}

impl Issuer {
    pub fn id(&self) -> &str {
        match self {
            Issuer::SingleString(id) => id,
            Issuer::IssuerObject(object) => &object.id,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
pub struct IssuerObject {
    pub id: String,

    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    // Identifies the subject of the verifiable credential
    // (the thing the claims are about), usually a DID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // === Properties Map===
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl CredentialSubject {
    /// Returns a string claim about the subject.
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.additional_properties.get(name).and_then(Value::as_str)
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
