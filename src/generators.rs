//! Nothing-up-my-sleeve group generators for the credential scheme.
//!
//! Every generator is derived deterministically by seeding a `ChaCha20Rng`
//! with the BLAKE3 hash of a domain label and sampling a Ristretto point, so
//! no party knows a discrete-log relation between any two of them.

use curve25519_dalek::RistrettoPoint;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

const GENERATOR_DOMAIN: &[u8] = b"curve25519-ristretto wabisabi generators v1.0";

/// Hashes arbitrary input to a Ristretto point under a domain label.
///
/// Label and input are length-prefixed before hashing so distinct
/// (label, input) pairs can never collide.
pub(crate) fn hash_to_group(label: &[u8], input: &[u8]) -> RistrettoPoint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&label.len().to_be_bytes());
    hasher.update(label);
    hasher.update(&input.len().to_be_bytes());
    hasher.update(input);
    let mut rng = ChaCha20Rng::from_seed(*hasher.finalize().as_bytes());
    RistrettoPoint::random(&mut rng)
}

/// The fixed generators every participant of a round agrees on.
///
/// `Gw`/`Gwp` blind the MAC key commitment, `Gx0`/`Gx1`/`GV` are the MAC
/// verification bases, `Ga` randomizes presented amount commitments,
/// `Gg`/`Gh` are the Pedersen bases for amount attributes, and `Gs` is the
/// serial number base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorSet {
    pub(crate) gw: RistrettoPoint,
    pub(crate) gwp: RistrettoPoint,
    pub(crate) gx0: RistrettoPoint,
    pub(crate) gx1: RistrettoPoint,
    pub(crate) gv: RistrettoPoint,
    pub(crate) ga: RistrettoPoint,
    pub(crate) gg: RistrettoPoint,
    pub(crate) gh: RistrettoPoint,
    pub(crate) gs: RistrettoPoint,
}

impl GeneratorSet {
    /// Derives a full generator set from a domain label.
    ///
    /// Distinct labels yield unrelated sets; proofs built against one set
    /// never verify against another.
    pub fn from_label(label: &[u8]) -> Self {
        GeneratorSet {
            gw: hash_to_group(label, b"Gw"),
            gwp: hash_to_group(label, b"Gwp"),
            gx0: hash_to_group(label, b"Gx0"),
            gx1: hash_to_group(label, b"Gx1"),
            gv: hash_to_group(label, b"GV"),
            ga: hash_to_group(label, b"Ga"),
            gg: hash_to_group(label, b"Gg"),
            gh: hash_to_group(label, b"Gh"),
            gs: hash_to_group(label, b"Gs"),
        }
    }

    /// All nine generators in a fixed order, for transcript binding.
    pub(crate) fn elements(&self) -> [&RistrettoPoint; 9] {
        [
            &self.gw, &self.gwp, &self.gx0, &self.gx1, &self.gv, &self.ga, &self.gg, &self.gh,
            &self.gs,
        ]
    }
}

impl Default for GeneratorSet {
    fn default() -> Self {
        Self::from_label(GENERATOR_DOMAIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(GeneratorSet::default(), GeneratorSet::default());
        assert_eq!(
            hash_to_group(b"a", b"b"),
            hash_to_group(b"a", b"b"),
        );
    }

    #[test]
    fn labels_separate_domains() {
        let protocol = GeneratorSet::default();
        let other = GeneratorSet::from_label(b"some other deployment");
        assert_ne!(protocol, other);
        // Length prefixes keep (label, input) splits apart.
        assert_ne!(hash_to_group(b"ab", b"c"), hash_to_group(b"a", b"bc"));
    }

    #[test]
    fn generators_are_pairwise_distinct() {
        let set = GeneratorSet::default();
        let elements = set.elements();
        for i in 0..elements.len() {
            for j in (i + 1)..elements.len() {
                assert_ne!(elements[i], elements[j], "generators {i} and {j} collide");
            }
        }
    }
}
