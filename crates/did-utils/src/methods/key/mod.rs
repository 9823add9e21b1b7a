//! Implementation of the [`did:key`] method.
//!
//! [`did:key`]: https://w3c-ccg.github.io/did-method-key/

pub(crate) mod method;
mod resolver;
