//! Protocol errors shared by the issuer and the client.
//!
//! Every validation step in the credential exchange fails with its own
//! variant so a caller can tell protocol violations (malformed or replayed
//! requests) apart from coordinator misbehavior (bad issuance proofs). Wire
//! decoding problems are reported by serde at the message boundary and never
//! reach this type.

use std::error::Error;
use std::fmt;

/// Errors raised while building, validating, or settling a credential
/// exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// The request presented a different number of credentials than the
    /// protocol requires per request.
    InvalidNumberOfPresentedCredentials { expected: usize, got: usize },
    /// The request asked for a different number of credentials than the
    /// protocol issues per request.
    InvalidNumberOfRequestedCredentials { expected: usize, got: usize },
    /// Two presented credentials inside the same request share a serial
    /// number.
    SerialNumberDuplicated,
    /// A presented serial number was already accepted earlier in the round.
    SerialNumberAlreadyUsed,
    /// A requested credential carried the wrong number of bit commitments
    /// for the issuer's range proof width.
    InvalidBitCommitment,
    /// The aggregate zero-knowledge proofs of a request failed to verify.
    CoordinatorReceivedInvalidProofs,
    /// The response carried a different number of issued credentials than
    /// the request asked for.
    IssuedCredentialNumberMismatch { expected: usize, got: usize },
    /// The issuance proofs of a response failed to verify. The coordinator
    /// misbehaved; the would-be credentials are discarded.
    ClientReceivedInvalidProofs,
    /// A requested amount exceeds the issuer's maximum credential amount.
    CredentialAmountOutOfRange { amount: u64, max_amount: u64 },
    /// A credential offered for presentation is not held in the client's
    /// pool.
    CredentialNotInPool,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::InvalidNumberOfPresentedCredentials { expected, got } => {
                write!(f, "expected {expected} presented credentials, got {got}")
            }
            CredentialError::InvalidNumberOfRequestedCredentials { expected, got } => {
                write!(f, "expected {expected} requested credentials, got {got}")
            }
            CredentialError::SerialNumberDuplicated => {
                write!(f, "request presents the same serial number twice")
            }
            CredentialError::SerialNumberAlreadyUsed => {
                write!(f, "serial number was already used in this round")
            }
            CredentialError::InvalidBitCommitment => {
                write!(f, "wrong number of bit commitments for the range proof width")
            }
            CredentialError::CoordinatorReceivedInvalidProofs => {
                write!(f, "request proofs failed to verify")
            }
            CredentialError::IssuedCredentialNumberMismatch { expected, got } => {
                write!(f, "expected {expected} issued credentials, got {got}")
            }
            CredentialError::ClientReceivedInvalidProofs => {
                write!(f, "issuance proofs failed to verify")
            }
            CredentialError::CredentialAmountOutOfRange { amount, max_amount } => {
                write!(f, "amount {amount} exceeds the maximum credential amount {max_amount}")
            }
            CredentialError::CredentialNotInPool => {
                write!(f, "credential is not in the client's pool")
            }
        }
    }
}

impl Error for CredentialError {}
