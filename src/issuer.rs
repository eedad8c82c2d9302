//! The coordinator-side credential issuer.
//!
//! One `CredentialIssuer` lives as long as a round. It validates requests in
//! a fixed order so every failure mode has a distinct error, and it tracks
//! spent serial numbers for the round behind a mutex so concurrent
//! presentations of the same credential cannot both succeed. Validation
//! never touches the used-serial set; the set is only written after a
//! request has fully verified, in one lock acquisition that re-checks and
//! inserts atomically.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use curve25519_dalek::RistrettoPoint;
use rand_core::CryptoRngCore;

use crate::credentials::{
    IssuanceRequest, IssuerParameters, IssuerSecretKey, Mac, balance_statement,
    issuance_statement, presentation_statement, range_proof_width, range_statement,
    scalar_from_i64, zero_statement,
};
use crate::errors::CredentialError;
use crate::generators::GeneratorSet;
use crate::messages::{
    CredentialsRequest, CredentialsResponse, RealCredentialsRequest, ZeroCredentialsRequest,
};
use crate::proofs::{Knowledge, Statement, prove_composed, verify_composed};
use crate::transcript::{REQUEST_LABEL, Transcript};

/// The issuer half of the credential exchange, scoped to one round.
///
/// `handle_request` performs no I/O and takes `&self`, so a coordinator can
/// serve many clients from one issuer across threads.
pub struct CredentialIssuer {
    secret: IssuerSecretKey,
    parameters: IssuerParameters,
    generators: GeneratorSet,
    credential_number: usize,
    max_amount: u64,
    range_width: usize,
    used_serials: Mutex<HashSet<[u8; 32]>>,
}

impl CredentialIssuer {
    /// Creates an issuer for a round.
    ///
    /// `credential_number` is how many credentials every request presents
    /// and requests; `max_amount` bounds each credential amount and fixes
    /// the range proof width. Both must be at least one.
    pub fn new(secret: IssuerSecretKey, credential_number: usize, max_amount: u64) -> Self {
        assert!(credential_number >= 1, "at least one credential per request");
        assert!(max_amount >= 1, "maximum amount must be positive");
        let generators = GeneratorSet::default();
        let parameters = secret.parameters(&generators);
        CredentialIssuer {
            secret,
            parameters,
            generators,
            credential_number,
            max_amount,
            range_width: range_proof_width(max_amount),
            used_serials: Mutex::new(HashSet::new()),
        }
    }

    /// The public parameters clients verify issuance proofs against.
    pub fn parameters(&self) -> IssuerParameters {
        self.parameters.clone()
    }

    /// The number of credentials presented and requested per request.
    pub fn credential_number(&self) -> usize {
        self.credential_number
    }

    /// The largest amount a single credential may carry.
    pub fn max_amount(&self) -> u64 {
        self.max_amount
    }

    /// Validates a request and, if everything holds, issues the requested
    /// credentials.
    ///
    /// Real requests are checked in a fixed order: presented count,
    /// requested count, duplicate serials within the request, serials
    /// already spent this round, bit commitment counts, and finally the
    /// aggregate proofs. Nothing is recorded until every check has
    /// passed. When two requests race on the same serial number, exactly one
    /// wins; the other fails with [`CredentialError::SerialNumberAlreadyUsed`].
    pub fn handle_request(
        &self,
        request: &CredentialsRequest,
        rng: impl CryptoRngCore,
    ) -> Result<CredentialsResponse, CredentialError> {
        match request {
            CredentialsRequest::Zero(zero) => self.handle_zero(zero, rng),
            CredentialsRequest::Real(real) => self.handle_real(real, rng),
        }
    }

    /// A zero request presents nothing, so only the requested side is
    /// validated: the count, the absence of bit commitments, and the zero
    /// proofs.
    fn handle_zero(
        &self,
        request: &ZeroCredentialsRequest,
        rng: impl CryptoRngCore,
    ) -> Result<CredentialsResponse, CredentialError> {
        self.check_requested_count(&request.requested)?;
        for requested in &request.requested {
            if !requested.bit_commitments.is_empty() {
                return Err(CredentialError::InvalidBitCommitment);
            }
        }

        let mut transcript = self.transcript();
        let statements: Vec<Statement> = request
            .requested
            .iter()
            .map(|requested| zero_statement(&self.generators, requested.ma))
            .collect();
        if !verify_composed(&statements, &request.proofs, &mut transcript) {
            return Err(CredentialError::CoordinatorReceivedInvalidProofs);
        }

        Ok(self.issue(&request.requested, &mut transcript, rng))
    }

    fn handle_real(
        &self,
        request: &RealCredentialsRequest,
        rng: impl CryptoRngCore,
    ) -> Result<CredentialsResponse, CredentialError> {
        if request.presented.len() != self.credential_number {
            return Err(CredentialError::InvalidNumberOfPresentedCredentials {
                expected: self.credential_number,
                got: request.presented.len(),
            });
        }
        self.check_requested_count(&request.requested)?;

        let serials: Vec<[u8; 32]> = request
            .presented
            .iter()
            .map(|presentation| presentation.serial_number().compress().to_bytes())
            .collect();
        let mut seen = HashSet::with_capacity(serials.len());
        for serial in &serials {
            if !seen.insert(*serial) {
                return Err(CredentialError::SerialNumberDuplicated);
            }
        }
        if self.any_used(&self.lock_serials(), &serials) {
            return Err(CredentialError::SerialNumberAlreadyUsed);
        }

        for requested in &request.requested {
            if requested.bit_commitments.len() != self.range_width {
                return Err(CredentialError::InvalidBitCommitment);
            }
        }

        let mut transcript = self.transcript();
        let mut statements = Vec::with_capacity(2 * self.credential_number + 1);
        for presentation in &request.presented {
            let check_value = self.secret.check_value(&self.generators, presentation);
            statements.push(presentation_statement(
                &self.generators,
                &self.parameters,
                check_value,
                presentation,
            ));
        }
        for requested in &request.requested {
            statements.push(range_statement(&self.generators, requested));
        }
        statements.push(balance_statement(&self.generators, self.balance_point(request)));
        if !verify_composed(&statements, &request.proofs, &mut transcript) {
            return Err(CredentialError::CoordinatorReceivedInvalidProofs);
        }

        // The request is now fully validated. Re-check and insert the
        // serials under one guard so a concurrent presentation of the same
        // credential cannot slip in between.
        {
            let mut used = self.lock_serials();
            if self.any_used(&used, &serials) {
                return Err(CredentialError::SerialNumberAlreadyUsed);
            }
            for serial in serials {
                used.insert(serial);
            }
        }

        Ok(self.issue(&request.requested, &mut transcript, rng))
    }

    /// MACs every requested commitment and proves each issuance on the
    /// request's transcript, so the proofs bind to this exact exchange.
    fn issue(
        &self,
        requested: &[IssuanceRequest],
        transcript: &mut Transcript,
        mut rng: impl CryptoRngCore,
    ) -> CredentialsResponse {
        let issued: Vec<Mac> = requested
            .iter()
            .map(|requested| Mac::compute(&self.secret, &requested.ma, &self.generators, &mut rng))
            .collect();
        let knowledges: Vec<Knowledge> = requested
            .iter()
            .zip(&issued)
            .map(|(requested, mac)| {
                Knowledge::new(
                    issuance_statement(&self.generators, &self.parameters, requested.ma, mac),
                    self.secret.witness(),
                )
            })
            .collect();
        let proofs = prove_composed(&knowledges, transcript, rng);
        CredentialsResponse { issued, proofs }
    }

    /// `B = Σ Ca − Σ Ma + Δ·Gg`, the public point of the balance statement.
    fn balance_point(&self, request: &RealCredentialsRequest) -> RistrettoPoint {
        let presented: RistrettoPoint =
            request.presented.iter().map(|presentation| presentation.ca).sum();
        let requested: RistrettoPoint =
            request.requested.iter().map(|requested| requested.ma).sum();
        presented - requested + self.generators.gg * scalar_from_i64(request.delta)
    }

    fn check_requested_count(&self, requested: &[IssuanceRequest]) -> Result<(), CredentialError> {
        if requested.len() != self.credential_number {
            return Err(CredentialError::InvalidNumberOfRequestedCredentials {
                expected: self.credential_number,
                got: requested.len(),
            });
        }
        Ok(())
    }

    fn any_used(&self, used: &HashSet<[u8; 32]>, serials: &[[u8; 32]]) -> bool {
        serials.iter().any(|serial| used.contains(serial))
    }

    fn lock_serials(&self) -> MutexGuard<'_, HashSet<[u8; 32]>> {
        self.used_serials.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transcript(&self) -> Transcript {
        Transcript::new(&self.generators, &self.parameters, REQUEST_LABEL)
    }
}
