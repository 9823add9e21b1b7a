//! This module provides utilities for working with [Verifiable Credentials (VCs)][vc].
//!
//! [vc]: https://www.w3.org/TR/vc-data-model/

mod model;

// Re-export
pub use model::{CredentialSubject, Issuer, IssuerObject, VerifiableCredential};
