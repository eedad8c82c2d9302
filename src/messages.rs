//! The wire messages of a credential exchange.
//!
//! A request is either a zero request, the bootstrap that asks for
//! zero-valued credentials and presents nothing, or a real request that
//! presents credentials, asks for new amounts, and declares the public
//! `delta` between the two sums. The JSON forms are distinguished purely by
//! shape: the zero form is `{"requested": …, "proofs": …}` and the real form
//! adds `delta` and `presented`. Deserialization tries the real form first
//! and the zero form denies unknown fields, so a real request can never be
//! downgraded into a zero one by a forwarding party.

use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialPresentation, IssuanceRequest, Mac};
use crate::proofs::Proof;

/// A bootstrap request for zero-valued credentials. Presents nothing and
/// carries one zero proof per requested credential; `delta` is implicitly
/// zero.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZeroCredentialsRequest {
    pub(crate) requested: Vec<IssuanceRequest>,
    pub(crate) proofs: Vec<Proof>,
}

/// A full exchange: presented credentials, requested replacements, and the
/// public amount difference between the two.
///
/// The proofs are ordered: one presentation proof per presented credential,
/// then one range proof per requested credential, then the balance proof.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RealCredentialsRequest {
    pub(crate) delta: i64,
    pub(crate) presented: Vec<CredentialPresentation>,
    pub(crate) requested: Vec<IssuanceRequest>,
    pub(crate) proofs: Vec<Proof>,
}

impl RealCredentialsRequest {
    /// The declared difference `Σ requested − Σ presented`, in satoshis.
    /// Positive when value enters the round, negative when it leaves.
    pub fn delta(&self) -> i64 {
        self.delta
    }

    /// The presented credentials, serial numbers included.
    pub fn presented(&self) -> &[CredentialPresentation] {
        &self.presented
    }
}

/// Either form of credential request, as it travels on the wire.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialsRequest {
    Real(RealCredentialsRequest),
    Zero(ZeroCredentialsRequest),
}

impl CredentialsRequest {
    /// The public delta of the request; zero requests always declare zero.
    pub fn delta(&self) -> i64 {
        match self {
            CredentialsRequest::Real(real) => real.delta,
            CredentialsRequest::Zero(_) => 0,
        }
    }

    /// How many new credentials the request asks for.
    pub fn requested_count(&self) -> usize {
        match self {
            CredentialsRequest::Real(real) => real.requested.len(),
            CredentialsRequest::Zero(zero) => zero.requested.len(),
        }
    }
}

impl From<ZeroCredentialsRequest> for CredentialsRequest {
    fn from(request: ZeroCredentialsRequest) -> Self {
        CredentialsRequest::Zero(request)
    }
}

impl From<RealCredentialsRequest> for CredentialsRequest {
    fn from(request: RealCredentialsRequest) -> Self {
        CredentialsRequest::Real(request)
    }
}

/// The issuer's answer: one MAC per requested credential, in request order,
/// each with an issuance proof tied to the request's transcript.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CredentialsResponse {
    pub(crate) issued: Vec<Mac>,
    pub(crate) proofs: Vec<Proof>,
}

impl CredentialsResponse {
    /// The issued MACs, one per requested credential.
    pub fn issued(&self) -> &[Mac] {
        &self.issued
    }
}
