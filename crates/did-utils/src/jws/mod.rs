//! Compact JSON Web Signatures, in the attached form `header.payload.signature`
//! used by JWT-encoded credentials.

use multibase::Base::Base64Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::crypto::{CoreSign, PublicKey};

/// Errors raised while parsing or verifying a JWS.
#[derive(Debug, Error, PartialEq)]
pub enum JwsError {
    #[error("expected 3 segments, found {0}")]
    InvalidSegmentCount(usize),
    #[error("{0} segment is not valid base64url")]
    InvalidEncoding(&'static str),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("unsupported critical header parameter: {0}")]
    UnsupportedCritical(String),
    #[error("algorithm {0} does not match the verification key")]
    KeyMismatch(String),
    #[error("signing failed")]
    SigningFailed,
    #[error("signature verification failed")]
    InvalidSignature,
}

/// Signature algorithms this module can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwsAlgorithm {
    EdDSA,
    ES256K,
}

impl JwsAlgorithm {
    pub fn parse(alg: &str) -> Result<Self, JwsError> {
        match alg {
            "EdDSA" => Ok(JwsAlgorithm::EdDSA),
            "ES256K" => Ok(JwsAlgorithm::ES256K),
            other => Err(JwsError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JwsAlgorithm::EdDSA => "EdDSA",
            JwsAlgorithm::ES256K => "ES256K",
        }
    }
}

/// JOSE header of a JWS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwsHeader {
    #[serde(default)]
    pub alg: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub crit: Option<Vec<String>>,

    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl JwsHeader {
    pub fn new(alg: JwsAlgorithm) -> Self {
        JwsHeader {
            alg: alg.as_str().to_string(),
            ..Default::default()
        }
    }
}

/// A parsed compact JWS.
#[derive(Debug, Clone)]
pub struct CompactJws {
    header: JwsHeader,
    encoded_header: String,
    encoded_payload: String,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl CompactJws {
    /// Parses an attached compact JWS.
    pub fn parse(token: &str) -> Result<Self, JwsError> {
        let (encoded_header, encoded_payload, encoded_signature) = split(token)?;
        let payload = decode_segment(encoded_payload, "payload")?;

        Self::assemble(encoded_header, encoded_payload, payload, encoded_signature)
    }

    fn assemble(encoded_header: &str, encoded_payload: &str, payload: Vec<u8>, encoded_signature: &str) -> Result<Self, JwsError> {
        let header_bytes = decode_segment(encoded_header, "header")?;
        let header: JwsHeader =
            serde_json::from_slice(&header_bytes).map_err(|err| JwsError::InvalidHeader(err.to_string()))?;

        if header.alg.is_empty() {
            return Err(JwsError::InvalidHeader(String::from("missing alg")));
        }

        if let Some(critical) = header.crit.iter().flatten().next() {
            return Err(JwsError::UnsupportedCritical(critical.clone()));
        }

        Ok(CompactJws {
            header,
            encoded_header: encoded_header.to_string(),
            encoded_payload: encoded_payload.to_string(),
            payload,
            signature: decode_segment(encoded_signature, "signature")?,
        })
    }

    pub fn header(&self) -> &JwsHeader {
        &self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Decodes the payload as a JSON object of claims.
    pub fn claims(&self) -> Result<Map<String, Value>, JwsError> {
        serde_json::from_slice(&self.payload).map_err(|err| JwsError::InvalidPayload(err.to_string()))
    }

    /// Bytes covered by the signature of an attached JWS.
    pub fn signing_input(&self) -> Vec<u8> {
        format!("{}.{}", self.encoded_header, self.encoded_payload).into_bytes()
    }

    /// Verifies an attached JWS.
    pub fn verify(&self, key: &PublicKey) -> Result<(), JwsError> {
        verify_signature(&self.header, &self.signing_input(), &self.signature, key)
    }
}

/// Produces an attached compact JWS over the JSON claims.
pub fn sign_compact(header: &JwsHeader, claims: &Value, signer: &dyn CoreSign) -> Result<String, JwsError> {
    let encoded_header = encode_json(header)?;
    let encoded_payload = Base64Url.encode(claims.to_string());

    let signature = signer
        .sign(format!("{encoded_header}.{encoded_payload}").as_bytes())
        .map_err(|_| JwsError::SigningFailed)?;

    Ok(format!("{encoded_header}.{encoded_payload}.{}", Base64Url.encode(signature)))
}

fn split(token: &str) -> Result<(&str, &str, &str), JwsError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    match segments.as_slice() {
        [header, payload, signature] => Ok((*header, *payload, *signature)),
        _ => Err(JwsError::InvalidSegmentCount(segments.len())),
    }
}

fn decode_segment(segment: &str, name: &'static str) -> Result<Vec<u8>, JwsError> {
    if segment.is_empty() {
        return Err(JwsError::InvalidEncoding(name));
    }

    Base64Url.decode(segment).map_err(|_| JwsError::InvalidEncoding(name))
}

fn encode_json(header: &JwsHeader) -> Result<String, JwsError> {
    let json = serde_json::to_vec(header).map_err(|err| JwsError::InvalidHeader(err.to_string()))?;
    Ok(Base64Url.encode(json))
}

fn verify_signature(header: &JwsHeader, signing_input: &[u8], signature: &[u8], key: &PublicKey) -> Result<(), JwsError> {
    let alg = JwsAlgorithm::parse(&header.alg)?;

    match (alg, key) {
        (JwsAlgorithm::EdDSA, PublicKey::Ed25519(_)) | (JwsAlgorithm::ES256K, PublicKey::Secp256k1(_)) => key
            .verify(signing_input, signature)
            .map_err(|_| JwsError::InvalidSignature),
        _ => Err(JwsError::KeyMismatch(header.alg.clone())),
    }
}
