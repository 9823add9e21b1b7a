/*! # did-utils

This library provides a set of utilities for working with Decentralized Identifiers (DIDs).
It includes support for cryptographic operations, DID core functionality, DID resolution,
JSON-LD context loading, compact JWS handling and proof verification for verifiable credentials.

## Features

- **Cryptographic Operations**: Ed25519 and secp256k1 signature verification, SHA-256 hashing.
- **DID Support**: `did:key`, `did:web` and HTTP-binding resolvers behind a method registry.
- **JSON-LD**: Context loading and term expansion, with proof processing delegated to `ssi`.
- **Verifiable Credentials**: Linked-data proof suites and compact JWS verification.

*/
pub mod crypto;
pub mod didcore;
pub mod jsonld;
pub mod jws;
pub mod ldmodel;
pub mod methods;
pub mod proof;
pub mod vc;
