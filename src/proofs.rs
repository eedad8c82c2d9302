//! A generalized Schnorr proof system over sparse linear relations.
//!
//! Every statement proved in the protocol, from presentation and range to
//! balance and issuance, is a list of equations `P_j = Σ_i s_i·G_{j,i}`
//! over one shared witness vector, so a single engine covers all of them.
//! Statements are AND-composed under one Fiat-Shamir challenge: all
//! equations are committed to the transcript, then all public nonces, then
//! one challenge is squeezed and every response answers it. A verifier that
//! absorbs the same statements in the same order derives the same challenge.

use curve25519_dalek::RistrettoPoint;
use curve25519_dalek::Scalar;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::serialization::{point_vec_hex, scalar_vec_hex};
use crate::transcript::Transcript;

/// One linear equation `lhs = Σ terms`, each term a witness index paired
/// with its generator.
pub(crate) struct Equation {
    lhs: RistrettoPoint,
    terms: Vec<(usize, RistrettoPoint)>,
}

/// A conjunction of linear equations over a single witness vector.
pub(crate) struct Statement {
    witnesses: usize,
    equations: Vec<Equation>,
}

impl Statement {
    /// Creates a statement over a witness vector of the given length.
    pub(crate) fn new(witnesses: usize) -> Self {
        Statement { witnesses, equations: Vec::new() }
    }

    /// Appends the equation `lhs = Σ terms` to the statement.
    ///
    /// Panics if a term references a witness index out of range; statements
    /// are built from fixed protocol shapes, so that is a programming error.
    pub(crate) fn equation(&mut self, lhs: RistrettoPoint, terms: &[(usize, RistrettoPoint)]) {
        for (index, _) in terms {
            assert!(*index < self.witnesses, "witness index {index} out of range");
        }
        self.equations.push(Equation { lhs, terms: terms.to_vec() });
    }

    /// Absorbs the full statement shape into the transcript: counts, every
    /// left-hand side, and every (index, generator) term in order.
    fn commit(&self, transcript: &mut Transcript) {
        transcript.add_u64(self.witnesses as u64);
        transcript.add_u64(self.equations.len() as u64);
        for equation in &self.equations {
            transcript.add_element(&equation.lhs);
            transcript.add_u64(equation.terms.len() as u64);
            for (index, generator) in &equation.terms {
                transcript.add_u64(*index as u64);
                transcript.add_element(generator);
            }
        }
    }
}

/// A statement together with a witness vector satisfying it.
pub(crate) struct Knowledge {
    statement: Statement,
    witness: Vec<Scalar>,
}

impl Knowledge {
    /// Pairs a statement with its witness vector.
    ///
    /// Panics if the witness length does not match the statement shape.
    pub(crate) fn new(statement: Statement, witness: Vec<Scalar>) -> Self {
        assert_eq!(statement.witnesses, witness.len(), "witness length mismatch");
        Knowledge { statement, witness }
    }
}

/// A non-interactive proof of one statement: a public nonce per equation
/// and a response scalar per witness component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(with = "point_vec_hex")]
    pub(crate) nonces: Vec<RistrettoPoint>,
    #[serde(with = "scalar_vec_hex")]
    pub(crate) responses: Vec<Scalar>,
}

/// Proves a batch of statements under a single shared challenge.
///
/// The returned proofs are in the order the knowledges were given and must
/// be verified in the same order with [`verify_composed`].
pub(crate) fn prove_composed(
    knowledges: &[Knowledge],
    transcript: &mut Transcript,
    mut rng: impl CryptoRngCore,
) -> Vec<Proof> {
    for knowledge in knowledges {
        knowledge.statement.commit(transcript);
    }
    let blindings: Vec<Vec<Scalar>> = knowledges
        .iter()
        .map(|knowledge| {
            (0..knowledge.statement.witnesses)
                .map(|_| Scalar::random(&mut rng))
                .collect()
        })
        .collect();
    let nonces: Vec<Vec<RistrettoPoint>> = knowledges
        .iter()
        .zip(&blindings)
        .map(|(knowledge, blinding)| {
            knowledge
                .statement
                .equations
                .iter()
                .map(|equation| evaluate(equation, blinding))
                .collect()
        })
        .collect();
    for batch in &nonces {
        transcript.add_elements(batch.iter());
    }
    let challenge = transcript.challenge();
    knowledges
        .iter()
        .zip(blindings)
        .zip(nonces)
        .map(|((knowledge, blinding), nonces)| Proof {
            nonces,
            responses: blinding
                .iter()
                .zip(&knowledge.witness)
                .map(|(blinding, witness)| blinding + challenge * witness)
                .collect(),
        })
        .collect()
}

/// Verifies a batch of proofs against their statements under the shared
/// challenge. Returns `false` on any shape mismatch or failed equation.
pub(crate) fn verify_composed(
    statements: &[Statement],
    proofs: &[Proof],
    transcript: &mut Transcript,
) -> bool {
    if statements.len() != proofs.len() {
        return false;
    }
    for (statement, proof) in statements.iter().zip(proofs) {
        if proof.nonces.len() != statement.equations.len()
            || proof.responses.len() != statement.witnesses
        {
            return false;
        }
    }
    for statement in statements {
        statement.commit(transcript);
    }
    for proof in proofs {
        transcript.add_elements(proof.nonces.iter());
    }
    let challenge = transcript.challenge();
    statements.iter().zip(proofs).all(|(statement, proof)| {
        statement
            .equations
            .iter()
            .zip(&proof.nonces)
            .all(|(equation, nonce)| {
                evaluate(equation, &proof.responses) == nonce + equation.lhs * challenge
            })
    })
}

fn evaluate(equation: &Equation, scalars: &[Scalar]) -> RistrettoPoint {
    equation
        .terms
        .iter()
        .map(|(index, generator)| generator * scalars[*index])
        .sum()
}
