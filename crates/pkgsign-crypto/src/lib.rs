//! Cryptographic identity verification for pkgsign: key resolution and
//! OpenPGP signature checks.
#![deny(warnings, clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod pgp;
pub mod verifier;
