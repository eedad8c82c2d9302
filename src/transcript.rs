//! A transcript system for Fiat-Shamir transformations.
//!
//! This module implements a simple transcript system that can be used to securely
//! generate challenge values for zero-knowledge proofs. It uses the BLAKE3 hash
//! function to accumulate transcript state and derive challenge values.

use curve25519_dalek::RistrettoPoint;
use curve25519_dalek::Scalar;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

use crate::credentials::IssuerParameters;
use crate::generators::GeneratorSet;

const PROTOCOL_LABEL: &[u8] = b"curve25519-ristretto wabisabi credentials v1.0";

/// The label both sides of a credential exchange open their transcript with.
pub(crate) const REQUEST_LABEL: &[u8] = b"credentials-request";

/// A transcript that accumulates cryptographic protocol messages and generates challenges.
///
/// The `Transcript` is used to implement the Fiat-Shamir transform, which converts
/// interactive zero-knowledge protocols into non-interactive ones by deriving challenge
/// values from the transcript of the protocol so far. One transcript spans a whole
/// credential exchange: the client keeps the copy it used to build a request and
/// continues it when verifying the issuer's response, which binds the issuance proofs
/// to the exact request context.
#[derive(Clone, Debug)]
pub(crate) struct Transcript {
    /// The underlying BLAKE3 hasher for accumulating transcript state
    hasher: blake3::Hasher,
}

impl Transcript {
    /// Creates a new transcript with the given label.
    ///
    /// The label helps to domain-separate different transcript uses, ensuring
    /// that challenges generated for one protocol cannot be reused for another.
    /// The generator set and the issuer parameters are absorbed up front so a
    /// proof made for one deployment cannot verify under another.
    ///
    /// # Arguments
    ///
    /// * `generators` - The generator set the exchange runs over
    /// * `parameters` - The issuer's public parameters
    /// * `label` - A byte slice used to identify this transcript's purpose
    ///
    /// # Returns
    ///
    /// A new `Transcript` instance initialized with the label
    pub(crate) fn new(
        generators: &GeneratorSet,
        parameters: &IssuerParameters,
        label: &[u8],
    ) -> Self {
        let mut t = Transcript { hasher: blake3::Hasher::new() };
        t.update(PROTOCOL_LABEL);
        t.add_elements(generators.elements().into_iter());
        t.add_element(&parameters.cw);
        t.add_element(&parameters.i);
        t.update(label);
        t
    }

    fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(&bytes.len().to_be_bytes());
        self.hasher.update(bytes);
    }

    /// Adds a Ristretto point to the transcript.
    ///
    /// # Arguments
    ///
    /// * `element` - A reference to a `RistrettoPoint` to add to the transcript
    pub(crate) fn add_element(&mut self, element: &RistrettoPoint) {
        self.update(element.compress().as_bytes());
    }

    /// Adds multiple Ristretto points to the transcript.
    ///
    /// # Arguments
    ///
    /// * `elements` - An iterator over references to `RistrettoPoint`s to add to the transcript
    pub(crate) fn add_elements<'a>(&mut self, elements: impl Iterator<Item = &'a RistrettoPoint>) {
        for element in elements {
            self.add_element(element);
        }
    }

    /// Adds a scalar value to the transcript.
    ///
    /// # Arguments
    ///
    /// * `scalar` - A reference to a `Scalar` to add to the transcript
    pub(crate) fn add_scalar(&mut self, scalar: &Scalar) {
        self.update(scalar.as_bytes());
    }

    /// Adds an unsigned integer to the transcript, for lengths and indices.
    ///
    /// # Arguments
    ///
    /// * `value` - The integer to add to the transcript
    pub(crate) fn add_u64(&mut self, value: u64) {
        self.update(&value.to_be_bytes());
    }

    /// Generates a challenge scalar from the current transcript state.
    ///
    /// The transcript is not consumed: the issuance proofs of the response
    /// phase are squeezed from the same transcript after further absorbs. A
    /// separator is mixed in afterwards so repeated challenges differ.
    ///
    /// # Returns
    ///
    /// A `Scalar` representing the challenge derived from the transcript
    pub(crate) fn challenge(&mut self) -> Scalar {
        let seed = *self.hasher.finalize().as_bytes();
        self.update(b"challenge");
        Scalar::random(&mut ChaCha20Rng::from_seed(seed))
    }
}

#[cfg(test)]
mod tests {
    use rand_core::OsRng;

    use super::*;
    use crate::credentials::IssuerSecretKey;

    fn transcript(label: &[u8]) -> Transcript {
        let generators = GeneratorSet::default();
        let parameters = IssuerSecretKey::random(OsRng).parameters(&generators);
        Transcript::new(&generators, &parameters, label)
    }

    #[test]
    fn same_absorbs_same_challenge() {
        let parameters = IssuerSecretKey::random(OsRng).parameters(&GeneratorSet::default());
        let mut a = Transcript::new(&GeneratorSet::default(), &parameters, b"test");
        let mut b = Transcript::new(&GeneratorSet::default(), &parameters, b"test");
        a.add_u64(7);
        b.add_u64(7);
        assert_eq!(a.challenge(), b.challenge());
    }

    #[test]
    fn labels_and_parameters_separate_challenges() {
        assert_ne!(transcript(b"one").challenge(), transcript(b"two").challenge());
        // Distinct issuer keys bind to distinct transcripts even under one label.
        assert_ne!(transcript(b"same").challenge(), transcript(b"same").challenge());
    }

    #[test]
    fn successive_challenges_differ() {
        let mut t = transcript(b"test");
        assert_ne!(t.challenge(), t.challenge());
    }
}
