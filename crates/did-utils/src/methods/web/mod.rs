//! Implementation of the [`did:web`] method.
//!
//! [`did:web`]: https://w3c-ccg.github.io/did-method-web/

pub(crate) mod resolver;
