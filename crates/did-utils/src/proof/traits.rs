use serde_json::Value;

use super::{error::ProofError, model::Proof};

/// A trait to be implemented by every crypto suite
pub trait CryptoProof {
    /// Create the proof value and add it to the proof object.
    ///
    /// The payload is the data to be signed without any proof entry.
    ///
    /// Returns the proof object with the proof value added.
    fn proof(&self, payload: Value) -> Result<Proof, ProofError>;

    /// Verifies that this proof authenticates the payload.
    ///
    /// A `proof` entry found in the payload is stripped before verification.
    fn verify(&self, payload: Value) -> Result<(), ProofError>;
}
