//! Fixed-width hex encodings for points and scalars on the wire.
//!
//! Every group element and scalar crosses the wire as the hex of its 32-byte
//! canonical encoding, 64 characters exactly. Decoding is strict: wrong
//! length, non-hex content, and non-canonical encodings all fail the whole
//! message with a serde error. In particular the identity point decodes only
//! from the all-zero encoding, so a malformed claim of identity cannot be
//! smuggled past the boundary.

use std::fmt;

use curve25519_dalek::RistrettoPoint;
use curve25519_dalek::Scalar;
use curve25519_dalek::ristretto::CompressedRistretto;

/// Hex length of a canonical 32-byte encoding.
const ENCODED_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DecodeError {
    WrongLength { expected: usize, got: usize },
    NotHex,
    NonCanonicalPoint,
    NonCanonicalScalar,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::WrongLength { expected, got } => {
                write!(f, "expected {expected} hex characters, got {got}")
            }
            DecodeError::NotHex => write!(f, "not a hex string"),
            DecodeError::NonCanonicalPoint => write!(f, "non-canonical point encoding"),
            DecodeError::NonCanonicalScalar => write!(f, "non-canonical scalar encoding"),
        }
    }
}

fn decode_bytes(text: &str) -> Result<[u8; 32], DecodeError> {
    if text.len() != ENCODED_LEN {
        return Err(DecodeError::WrongLength { expected: ENCODED_LEN, got: text.len() });
    }
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(text, &mut bytes).map_err(|_| DecodeError::NotHex)?;
    Ok(bytes)
}

pub(crate) fn encode_point(point: &RistrettoPoint) -> String {
    hex::encode(point.compress().as_bytes())
}

pub(crate) fn decode_point(text: &str) -> Result<RistrettoPoint, DecodeError> {
    CompressedRistretto(decode_bytes(text)?)
        .decompress()
        .ok_or(DecodeError::NonCanonicalPoint)
}

pub(crate) fn encode_scalar(scalar: &Scalar) -> String {
    hex::encode(scalar.as_bytes())
}

pub(crate) fn decode_scalar(text: &str) -> Result<Scalar, DecodeError> {
    Option::from(Scalar::from_canonical_bytes(decode_bytes(text)?))
        .ok_or(DecodeError::NonCanonicalScalar)
}

/// Serde adapter for a single point field.
pub(crate) mod point_hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::*;

    pub fn serialize<S: Serializer>(
        point: &RistrettoPoint,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_point(point))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<RistrettoPoint, D::Error> {
        let text = String::deserialize(deserializer)?;
        decode_point(&text).map_err(D::Error::custom)
    }
}

/// Serde adapter for a vector of points.
pub(crate) mod point_vec_hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::*;

    pub fn serialize<S: Serializer>(
        points: &[RistrettoPoint],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(points.iter().map(encode_point))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<RistrettoPoint>, D::Error> {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts
            .iter()
            .map(|text| decode_point(text).map_err(D::Error::custom))
            .collect()
    }
}

/// Serde adapter for a single scalar field.
pub(crate) mod scalar_hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::*;

    pub fn serialize<S: Serializer>(scalar: &Scalar, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_scalar(scalar))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
        let text = String::deserialize(deserializer)?;
        decode_scalar(&text).map_err(D::Error::custom)
    }
}

/// Serde adapter for a vector of scalars.
pub(crate) mod scalar_vec_hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::*;

    pub fn serialize<S: Serializer>(
        scalars: &[Scalar],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(scalars.iter().map(encode_scalar))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Scalar>, D::Error> {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts
            .iter()
            .map(|text| decode_scalar(text).map_err(D::Error::custom))
            .collect()
    }
}
