//! The client side of the credential exchange.
//!
//! A `CredentialClient` holds the credentials a wallet has been issued in
//! the current round, splits them into zero-valued padding and valuable
//! credentials, and builds the two request shapes: the zero bootstrap and
//! the real exchange. Presented credentials leave the pool the moment a
//! request is built, since the issuer may accept it at any time afterwards,
//! and only return through [`CredentialClient::restore`] when the exchange
//! dies outside the protocol.

use curve25519_dalek::RistrettoPoint;
use curve25519_dalek::Scalar;
use rand_core::CryptoRngCore;

use crate::credentials::{
    Credential, IssuanceRequest, IssuerParameters, amount_bits, balance_statement,
    issuance_statement, presentation_statement, range_proof_width, range_statement,
    scalar_from_i64, zero_statement,
};
use crate::errors::CredentialError;
use crate::generators::GeneratorSet;
use crate::messages::{CredentialsResponse, RealCredentialsRequest, ZeroCredentialsRequest};
use crate::proofs::{Knowledge, Statement, prove_composed, verify_composed};
use crate::transcript::{REQUEST_LABEL, Transcript};

/// What the client keeps private while a request is in flight: the
/// transcript the request was proved on, the openings of the requested
/// commitments, and the presented credentials in case the exchange has to
/// be rolled back.
#[derive(Debug)]
pub struct CredentialsResponseValidation {
    transcript: Transcript,
    requested: Vec<IssuanceValidation>,
    presented: Vec<Credential>,
}

#[derive(Debug)]
struct IssuanceValidation {
    amount: u64,
    randomness: Scalar,
}

/// The holder half of the credential exchange.
pub struct CredentialClient {
    generators: GeneratorSet,
    parameters: IssuerParameters,
    credential_number: usize,
    max_amount: u64,
    zero_credentials: Vec<Credential>,
    valuable_credentials: Vec<Credential>,
}

impl CredentialClient {
    /// Creates a client for a round. The parameters and generators must be
    /// the ones the round's issuer runs with, or every proof will fail.
    pub fn new(
        credential_number: usize,
        max_amount: u64,
        parameters: IssuerParameters,
        generators: GeneratorSet,
    ) -> Self {
        assert!(credential_number >= 1, "at least one credential per request");
        assert!(max_amount >= 1, "maximum amount must be positive");
        CredentialClient {
            generators,
            parameters,
            credential_number,
            max_amount,
            zero_credentials: Vec::new(),
            valuable_credentials: Vec::new(),
        }
    }

    /// The zero-valued credentials available as padding.
    pub fn zero_credentials(&self) -> &[Credential] {
        &self.zero_credentials
    }

    /// The credentials carrying value.
    pub fn valuable_credentials(&self) -> &[Credential] {
        &self.valuable_credentials
    }

    /// The total value of the pool.
    pub fn balance(&self) -> u64 {
        self.valuable_credentials.iter().map(Credential::amount).sum()
    }

    /// Builds the bootstrap request: zero-amount commitments with zero
    /// proofs, no presentations, delta implicitly zero. Every lane of a
    /// round starts with one of these, so a request with nothing to present
    /// is indistinguishable from any other.
    pub fn create_request_for_zero_amount(
        &self,
        mut rng: impl CryptoRngCore,
    ) -> (ZeroCredentialsRequest, CredentialsResponseValidation) {
        let mut transcript = self.transcript();
        let mut requested = Vec::with_capacity(self.credential_number);
        let mut validations = Vec::with_capacity(self.credential_number);
        let mut knowledges = Vec::with_capacity(self.credential_number);
        for _ in 0..self.credential_number {
            let randomness = Scalar::random(&mut rng);
            let ma = self.generators.gh * randomness;
            knowledges.push(Knowledge::new(
                zero_statement(&self.generators, ma),
                vec![randomness],
            ));
            requested.push(IssuanceRequest { ma, bit_commitments: Vec::new() });
            validations.push(IssuanceValidation { amount: 0, randomness });
        }
        let proofs = prove_composed(&knowledges, &mut transcript, rng);
        (
            ZeroCredentialsRequest { requested, proofs },
            CredentialsResponseValidation {
                transcript,
                requested: validations,
                presented: Vec::new(),
            },
        )
    }

    /// Builds a real request: presents `credentials_to_present`, asks for
    /// `amounts` (padded with zeros up to the credential number), and
    /// declares `delta = Σ requested − Σ presented`.
    ///
    /// Every amount is checked against the issuer's maximum and every
    /// presented credential against the pool; presented credentials are
    /// removed optimistically and come back via [`CredentialClient::restore`]
    /// if the exchange fails outside the protocol.
    pub fn create_request(
        &mut self,
        amounts: &[u64],
        credentials_to_present: Vec<Credential>,
        mut rng: impl CryptoRngCore,
    ) -> Result<(RealCredentialsRequest, CredentialsResponseValidation), CredentialError> {
        if amounts.len() > self.credential_number {
            return Err(CredentialError::InvalidNumberOfRequestedCredentials {
                expected: self.credential_number,
                got: amounts.len(),
            });
        }
        if credentials_to_present.len() != self.credential_number {
            return Err(CredentialError::InvalidNumberOfPresentedCredentials {
                expected: self.credential_number,
                got: credentials_to_present.len(),
            });
        }
        for &amount in amounts {
            if amount > self.max_amount {
                return Err(CredentialError::CredentialAmountOutOfRange {
                    amount,
                    max_amount: self.max_amount,
                });
            }
        }
        let presented = self.take_from_pool(credentials_to_present)?;

        let mut requested_amounts = amounts.to_vec();
        requested_amounts.resize(self.credential_number, 0);
        let presented_total: u64 = presented.iter().map(Credential::amount).sum();
        let requested_total: u64 = requested_amounts.iter().sum();
        let delta = requested_total as i64 - presented_total as i64;

        let width = range_proof_width(self.max_amount);
        let mut transcript = self.transcript();
        let mut knowledges = Vec::with_capacity(2 * self.credential_number + 1);

        let mut presentations = Vec::with_capacity(self.credential_number);
        let mut z_sum = Scalar::ZERO;
        let mut randomness_delta = Scalar::ZERO;
        for credential in &presented {
            let (presentation, z) = credential.present(&self.generators, &mut rng);
            z_sum += z;
            randomness_delta += credential.randomness();
            knowledges.push(Knowledge::new(
                presentation_statement(
                    &self.generators,
                    &self.parameters,
                    self.parameters.i * z,
                    &presentation,
                ),
                credential.presentation_witness(z),
            ));
            presentations.push(presentation);
        }

        let mut requested = Vec::with_capacity(self.credential_number);
        let mut validations = Vec::with_capacity(self.credential_number);
        for &amount in &requested_amounts {
            let (request, knowledge, randomness) =
                self.issuance_request(amount, width, &mut rng);
            knowledges.push(knowledge);
            randomness_delta -= randomness;
            validations.push(IssuanceValidation { amount, randomness });
            requested.push(request);
        }

        let balance = presentations.iter().map(|presentation| presentation.ca).sum::<RistrettoPoint>()
            - requested.iter().map(|requested| requested.ma).sum::<RistrettoPoint>()
            + self.generators.gg * scalar_from_i64(delta);
        knowledges.push(Knowledge::new(
            balance_statement(&self.generators, balance),
            vec![z_sum, randomness_delta],
        ));

        let proofs = prove_composed(&knowledges, &mut transcript, rng);
        Ok((
            RealCredentialsRequest { delta, presented: presentations, requested, proofs },
            CredentialsResponseValidation { transcript, requested: validations, presented },
        ))
    }

    /// Checks the issuer's response against the request it answers and, on
    /// success, moves the fresh credentials into the pool.
    ///
    /// A failed issuance proof means the coordinator misbehaved; the
    /// would-be credentials are discarded rather than trusted.
    pub fn handle_response(
        &mut self,
        response: &CredentialsResponse,
        validation: CredentialsResponseValidation,
    ) -> Result<(), CredentialError> {
        if response.issued.len() != validation.requested.len() {
            return Err(CredentialError::IssuedCredentialNumberMismatch {
                expected: validation.requested.len(),
                got: response.issued.len(),
            });
        }
        let mut transcript = validation.transcript;
        let statements: Vec<Statement> = validation
            .requested
            .iter()
            .zip(&response.issued)
            .map(|(requested, mac)| {
                let ma = self.generators.gg * Scalar::from(requested.amount)
                    + self.generators.gh * requested.randomness;
                issuance_statement(&self.generators, &self.parameters, ma, mac)
            })
            .collect();
        if !verify_composed(&statements, &response.proofs, &mut transcript) {
            return Err(CredentialError::ClientReceivedInvalidProofs);
        }
        for (requested, mac) in validation.requested.into_iter().zip(&response.issued) {
            self.pool(requested.amount)
                .push(Credential::new(requested.amount, requested.randomness, mac.clone()));
        }
        Ok(())
    }

    /// Returns optimistically-removed credentials to the pool after an
    /// exchange that failed outside the protocol. Pending presentations hold
    /// no issuer-side state, so nothing else needs undoing.
    pub fn restore(&mut self, validation: CredentialsResponseValidation) {
        for credential in validation.presented {
            self.pool(credential.amount()).push(credential);
        }
    }

    /// One issuance request with its range proof knowledge: the amount
    /// commitment's randomness is recomposed from per-bit randomness, so the
    /// bit commitments sum back to `Ma` under powers of two.
    fn issuance_request(
        &self,
        amount: u64,
        width: usize,
        mut rng: impl CryptoRngCore,
    ) -> (IssuanceRequest, Knowledge, Scalar) {
        let bits = amount_bits(amount, width);
        let bit_randomness: Vec<Scalar> = (0..width).map(|_| Scalar::random(&mut rng)).collect();
        let mut randomness = Scalar::ZERO;
        let mut power = Scalar::ONE;
        for bit_r in &bit_randomness {
            randomness += bit_r * power;
            power += power;
        }
        let ma = self.generators.gg * Scalar::from(amount) + self.generators.gh * randomness;
        let bit_commitments: Vec<RistrettoPoint> = bits
            .iter()
            .zip(&bit_randomness)
            .map(|(bit, bit_r)| self.generators.gg * bit + self.generators.gh * bit_r)
            .collect();
        let request = IssuanceRequest { ma, bit_commitments };

        let mut witness = bits.clone();
        witness.extend(bit_randomness.iter().copied());
        witness.extend(bits.iter().zip(&bit_randomness).map(|(bit, bit_r)| bit * bit_r));
        let knowledge = Knowledge::new(range_statement(&self.generators, &request), witness);
        (request, knowledge, randomness)
    }

    /// Removes the given credentials from the pool, atomically: either all
    /// of them are found (duplicates count once per held copy) or the pool
    /// is left untouched.
    fn take_from_pool(
        &mut self,
        credentials: Vec<Credential>,
    ) -> Result<Vec<Credential>, CredentialError> {
        let mut zero = self.zero_credentials.clone();
        let mut valuable = self.valuable_credentials.clone();
        let mut taken = Vec::with_capacity(credentials.len());
        for credential in credentials {
            let pool = if credential.amount() == 0 { &mut zero } else { &mut valuable };
            let index = pool
                .iter()
                .position(|held| *held == credential)
                .ok_or(CredentialError::CredentialNotInPool)?;
            taken.push(pool.remove(index));
        }
        self.zero_credentials = zero;
        self.valuable_credentials = valuable;
        Ok(taken)
    }

    fn pool(&mut self, amount: u64) -> &mut Vec<Credential> {
        if amount == 0 {
            &mut self.zero_credentials
        } else {
            &mut self.valuable_credentials
        }
    }

    fn transcript(&self) -> Transcript {
        Transcript::new(&self.generators, &self.parameters, REQUEST_LABEL)
    }
}
