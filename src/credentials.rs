//! The credential algebra: keys, MACs, commitments, and statement shapes.
//!
//! Credentials are keyed-verification anonymous credentials in the
//! Chase-Meiklejohn-Zaverucha style over a single hidden attribute, the
//! amount. The issuer MACs a Pedersen commitment `Ma = a·Gg + r·Gh`; the
//! holder later presents randomized commitments plus a serial number
//! `S = r·Gs` and proves in zero knowledge that they open a valid MAC. Both
//! sides build the same statement shapes from this module, so the shared
//! Fiat-Shamir challenge of [`crate::proofs`] lines up.

use curve25519_dalek::RistrettoPoint;
use curve25519_dalek::Scalar;
use group::Group;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::generators::{GeneratorSet, hash_to_group};
use crate::proofs::Statement;
use crate::serialization::{point_hex, point_vec_hex, scalar_hex};

const MAC_TAG_DOMAIN: &[u8] = b"wabisabi mac tag";

/// Computes `U`, the per-MAC base derived from the tag `t`.
fn tag_point(t: &Scalar) -> RistrettoPoint {
    hash_to_group(MAC_TAG_DOMAIN, t.as_bytes())
}

/// The issuer's MAC key `(w, w', x0, x1, ya)`, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct IssuerSecretKey {
    w: Scalar,
    wp: Scalar,
    x0: Scalar,
    x1: Scalar,
    ya: Scalar,
}

impl IssuerSecretKey {
    /// Samples a fresh key. Coordinators draw one per round.
    pub fn random(mut rng: impl CryptoRngCore) -> Self {
        IssuerSecretKey {
            w: Scalar::random(&mut rng),
            wp: Scalar::random(&mut rng),
            x0: Scalar::random(&mut rng),
            x1: Scalar::random(&mut rng),
            ya: Scalar::random(&mut rng),
        }
    }

    /// Derives the public parameters `Cw = w·Gw + w'·Gwp` and
    /// `I = GV − x0·Gx0 − x1·Gx1 − ya·Ga` that clients verify against.
    pub fn parameters(&self, generators: &GeneratorSet) -> IssuerParameters {
        IssuerParameters {
            cw: generators.gw * self.w + generators.gwp * self.wp,
            i: generators.gv
                - (generators.gx0 * self.x0 + generators.gx1 * self.x1 + generators.ga * self.ya),
        }
    }

    /// The issuer-side check value `Z = CV − (w·Gw + x0·Cx0 + x1·Cx1 + ya·Ca)`.
    ///
    /// For an honest presentation this equals the holder's `z·I`; the
    /// presentation proof shows exactly that equality.
    pub(crate) fn check_value(
        &self,
        generators: &GeneratorSet,
        presentation: &CredentialPresentation,
    ) -> RistrettoPoint {
        presentation.cv
            - (generators.gw * self.w
                + presentation.cx0 * self.x0
                + presentation.cx1 * self.x1
                + presentation.ca * self.ya)
    }

    /// The witness vector of the issuance statement, in statement order.
    pub(crate) fn witness(&self) -> Vec<Scalar> {
        vec![self.w, self.wp, self.x0, self.x1, self.ya]
    }
}

/// The issuer's public parameters, published once per round.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerParameters {
    #[serde(with = "point_hex")]
    pub(crate) cw: RistrettoPoint,
    #[serde(with = "point_hex")]
    pub(crate) i: RistrettoPoint,
}

/// An algebraic MAC `(t, V)` on an amount commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mac {
    #[serde(with = "scalar_hex")]
    pub(crate) t: Scalar,
    #[serde(with = "point_hex")]
    pub(crate) v: RistrettoPoint,
}

impl Mac {
    /// MACs a commitment: fresh tag `t`, `U = hash_to_group(t)`,
    /// `V = w·Gw + (x0 + x1·t)·U + ya·Ma`.
    pub(crate) fn compute(
        secret: &IssuerSecretKey,
        ma: &RistrettoPoint,
        generators: &GeneratorSet,
        mut rng: impl CryptoRngCore,
    ) -> Mac {
        let t = Scalar::random(&mut rng);
        let u = tag_point(&t);
        Mac {
            t,
            v: generators.gw * secret.w + u * (secret.x0 + secret.x1 * t) + ma * secret.ya,
        }
    }

    /// Verifies the MAC directly with the secret key, comparing the
    /// recomputed `V` in constant time. Presentation normally replaces this
    /// check with a zero-knowledge proof; direct verification exists for the
    /// issuer's own bookkeeping.
    pub fn verify(
        &self,
        secret: &IssuerSecretKey,
        ma: &RistrettoPoint,
        generators: &GeneratorSet,
    ) -> bool {
        let u = tag_point(&self.t);
        let expected =
            generators.gw * secret.w + u * (secret.x0 + secret.x1 * self.t) + ma * secret.ya;
        bool::from(
            expected
                .compress()
                .as_bytes()
                .ct_eq(self.v.compress().as_bytes()),
        )
    }
}

/// A credential as held by a client: the opening of the amount commitment
/// plus the MAC that makes it spendable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    amount: u64,
    #[serde(with = "scalar_hex")]
    randomness: Scalar,
    mac: Mac,
}

impl Credential {
    pub(crate) fn new(amount: u64, randomness: Scalar, mac: Mac) -> Self {
        Credential { amount, randomness, mac }
    }

    /// The hidden amount this credential is worth.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// The serial number point `S = r·Gs` this credential will reveal when
    /// presented.
    pub fn serial_number(&self, generators: &GeneratorSet) -> RistrettoPoint {
        generators.gs * self.randomness
    }

    pub(crate) fn randomness(&self) -> Scalar {
        self.randomness
    }

    /// The amount commitment `Ma = a·Gg + r·Gh`.
    pub(crate) fn ma(&self, generators: &GeneratorSet) -> RistrettoPoint {
        generators.gg * Scalar::from(self.amount) + generators.gh * self.randomness
    }

    /// Randomizes the credential for presentation. Returns the presentation
    /// and the randomization scalar `z`, which the presentation proof needs
    /// as part of its witness.
    pub(crate) fn present(
        &self,
        generators: &GeneratorSet,
        mut rng: impl CryptoRngCore,
    ) -> (CredentialPresentation, Scalar) {
        let z = Scalar::random(&mut rng);
        let u = tag_point(&self.mac.t);
        let presentation = CredentialPresentation {
            ca: generators.ga * z + self.ma(generators),
            cx0: generators.gx0 * z + u,
            cx1: generators.gx1 * z + u * self.mac.t,
            cv: generators.gv * z + self.mac.v,
            s: generators.gs * self.randomness,
        };
        (presentation, z)
    }

    /// The presentation proof witness `(z, −t·z, t, a, r)`.
    pub(crate) fn presentation_witness(&self, z: Scalar) -> Vec<Scalar> {
        vec![
            z,
            -(self.mac.t * z),
            self.mac.t,
            Scalar::from(self.amount),
            self.randomness,
        ]
    }
}

/// A presented credential: randomized commitments plus the revealed serial
/// number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPresentation {
    #[serde(with = "point_hex")]
    pub(crate) ca: RistrettoPoint,
    #[serde(with = "point_hex")]
    pub(crate) cx0: RistrettoPoint,
    #[serde(with = "point_hex")]
    pub(crate) cx1: RistrettoPoint,
    #[serde(with = "point_hex")]
    pub(crate) cv: RistrettoPoint,
    #[serde(with = "point_hex")]
    pub(crate) s: RistrettoPoint,
}

impl CredentialPresentation {
    /// The serial number this presentation spends. The issuer remembers it
    /// for the rest of the round.
    pub fn serial_number(&self) -> RistrettoPoint {
        self.s
    }
}

/// A request for one new credential: the amount commitment and, for real
/// requests, one Pedersen commitment per bit of the amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRequest {
    #[serde(with = "point_hex")]
    pub(crate) ma: RistrettoPoint,
    #[serde(with = "point_vec_hex")]
    pub(crate) bit_commitments: Vec<RistrettoPoint>,
}

/// The number of bits a range proof must cover for a maximum amount: the
/// smallest `W` with `2^W − 1 ≥ max_amount`. Zero requests skip the range
/// proof entirely, so their width is zero regardless.
pub fn range_proof_width(max_amount: u64) -> usize {
    (u64::BITS - max_amount.leading_zeros()) as usize
}

/// The bits of `amount` as scalars, least significant first. The caller
/// guarantees `amount < 2^width`.
pub(crate) fn amount_bits(amount: u64, width: usize) -> Vec<Scalar> {
    (0..width)
        .map(|i| {
            if (amount >> i) & 1 == 1 {
                Scalar::ONE
            } else {
                Scalar::ZERO
            }
        })
        .collect()
}

/// Embeds a signed delta into the scalar field.
pub(crate) fn scalar_from_i64(value: i64) -> Scalar {
    if value >= 0 {
        Scalar::from(value as u64)
    } else {
        -Scalar::from(value.unsigned_abs())
    }
}

/// The presentation statement over witness `(z, z0, t, a, r)`:
/// `Z = z·I`, `Cx1 = t·Cx0 + z0·Gx0 + z·Gx1`, `S = r·Gs`,
/// `Ca = z·Ga + a·Gg + r·Gh`.
pub(crate) fn presentation_statement(
    generators: &GeneratorSet,
    parameters: &IssuerParameters,
    check_value: RistrettoPoint,
    presentation: &CredentialPresentation,
) -> Statement {
    let mut statement = Statement::new(5);
    statement.equation(check_value, &[(0, parameters.i)]);
    statement.equation(
        presentation.cx1,
        &[(2, presentation.cx0), (1, generators.gx0), (0, generators.gx1)],
    );
    statement.equation(presentation.s, &[(4, generators.gs)]);
    statement.equation(
        presentation.ca,
        &[(0, generators.ga), (3, generators.gg), (4, generators.gh)],
    );
    statement
}

/// The range statement over witness `(b_0.., r_0.., c_0..)` with
/// `c_i = b_i·r_i`: the amount commitment recomposed from its bits, each bit
/// commitment well-formed, and each bit boolean via the linearized check
/// `O = b_i·(B_i − Gg) − c_i·Gh`.
pub(crate) fn range_statement(generators: &GeneratorSet, request: &IssuanceRequest) -> Statement {
    let width = request.bit_commitments.len();
    let mut statement = Statement::new(3 * width);

    let mut recomposition = Vec::with_capacity(2 * width);
    let mut gg_power = generators.gg;
    let mut gh_power = generators.gh;
    for i in 0..width {
        recomposition.push((i, gg_power));
        recomposition.push((width + i, gh_power));
        gg_power = gg_power + gg_power;
        gh_power = gh_power + gh_power;
    }
    statement.equation(request.ma, &recomposition);

    for (i, commitment) in request.bit_commitments.iter().enumerate() {
        statement.equation(*commitment, &[(i, generators.gg), (width + i, generators.gh)]);
    }
    for (i, commitment) in request.bit_commitments.iter().enumerate() {
        statement.equation(
            RistrettoPoint::identity(),
            &[(i, commitment - generators.gg), (2 * width + i, -generators.gh)],
        );
    }
    statement
}

/// The zero statement: `Ma = r·Gh`, so the committed amount is zero by
/// construction.
pub(crate) fn zero_statement(generators: &GeneratorSet, ma: RistrettoPoint) -> Statement {
    let mut statement = Statement::new(1);
    statement.equation(ma, &[(0, generators.gh)]);
    statement
}

/// The balance statement over the public point
/// `B = Σ Ca − Σ Ma + Δ·Gg`: knowing `(z_sum, r_delta)` with
/// `B = z_sum·Ga + r_delta·Gh` proves the amounts cancel exactly.
pub(crate) fn balance_statement(generators: &GeneratorSet, balance: RistrettoPoint) -> Statement {
    let mut statement = Statement::new(2);
    statement.equation(balance, &[(0, generators.ga), (1, generators.gh)]);
    statement
}

/// The issuance statement over the issuer key witness `(w, w', x0, x1, ya)`:
/// the key opens `Cw`, fixes `GV − I`, and produced this very MAC. Verifying
/// it is what stops a coordinator from forging credentials or altering an
/// amount in flight.
pub(crate) fn issuance_statement(
    generators: &GeneratorSet,
    parameters: &IssuerParameters,
    ma: RistrettoPoint,
    mac: &Mac,
) -> Statement {
    let u = tag_point(&mac.t);
    let mut statement = Statement::new(5);
    statement.equation(parameters.cw, &[(0, generators.gw), (1, generators.gwp)]);
    statement.equation(
        generators.gv - parameters.i,
        &[(2, generators.gx0), (3, generators.gx1), (4, generators.ga)],
    );
    statement.equation(
        mac.v,
        &[(0, generators.gw), (2, u), (3, u * mac.t), (4, ma)],
    );
    statement
}
