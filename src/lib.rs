//! Anonymous credentials for private CoinJoin amount accounting.
//!
//! A coordinator has to know that the amounts clients register add up
//! without learning which inputs fund which outputs. This crate implements
//! the credential scheme behind that: a keyed-verification anonymous
//! credential (a CMZ-style algebraic MAC over Ristretto) certifying a
//! confidential amount, plus the zero-knowledge range, balance, and
//! presentation proofs that let a client spend credentials back to the
//! issuer unlinkably while conserving value.
//!
//! The two actors are [`CredentialIssuer`] (coordinator side: verifies
//! requests, MACs new credentials, tracks spent serial numbers) and
//! [`CredentialClient`] (participant side: builds requests, validates
//! responses, keeps a pool of usable credentials). Every exchange presents
//! and requests a fixed number of credentials ([`CREDENTIAL_NUMBER`]),
//! padding with zero-valued ones, so the shape of the traffic reveals
//! nothing about balances.
//!
//! Alongside the credential protocol, [`standard_denominations`] and
//! [`PossibleDecompositions`] implement the output decomposition search a
//! client runs to split its registered value into standard denominations.

mod client;
mod credentials;
mod decomposition;
mod denomination;
mod errors;
mod generators;
mod issuer;
mod messages;
mod proofs;
mod serialization;
mod transcript;

pub use client::{CredentialClient, CredentialsResponseValidation};
pub use credentials::{
    Credential, CredentialPresentation, IssuanceRequest, IssuerParameters, IssuerSecretKey, Mac,
    range_proof_width,
};
pub use decomposition::{Decomposition, PossibleDecompositions};
pub use denomination::{MAX_MONEY, standard_denominations};
pub use errors::CredentialError;
pub use generators::GeneratorSet;
pub use issuer::CredentialIssuer;
pub use messages::{
    CredentialsRequest, CredentialsResponse, RealCredentialsRequest, ZeroCredentialsRequest,
};
pub use proofs::Proof;

/// Number of credentials presented and requested in every exchange.
pub const CREDENTIAL_NUMBER: usize = 2;

/// Largest amount a single credential can certify, in satoshis.
pub const MAX_AMOUNT: u64 = 4_300_000_000_000;

#[cfg(test)]
mod tests;
