//! # BN254 Primitives
//!
//! Point encoding, hash-to-curve and the pairing check used to authenticate
//! DA signers.
//!
//! ## Encodings
//!
//! - G1: `X ‖ Y`, 32-byte big-endian base field elements (64 bytes)
//! - G2: `X.c1 ‖ X.c0 ‖ Y.c1 ‖ Y.c0` (128 bytes, EIP-197 order)
//! - The point at infinity is all zero bytes in both groups
//!
//! ## Signature Check
//!
//! A signer holds `sk` with `pk_g1 = sk·G1` and `pk_g2 = sk·G2`, and signs a
//! hashed point `H` as `σ = sk·H`. Both key encodings are bound in one pairing
//! product using a challenge `γ` derived from all inputs:
//!
//! ```text
//! e(σ + γ·pk_g1, −G2) · e(H + γ·G1, pk_g2) == 1
//! ```

use super::hash::keccak256;
use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInt, BigInteger, Field, One, PrimeField, Zero};
use thiserror::Error;

/// Encoded G1 point.
pub type G1Bytes = [u8; 64];

/// Encoded G2 point.
pub type G2Bytes = [u8; 128];

/// Domain tag for the key-ownership proof.
pub const PUBKEY_REGISTRATION_TAG: &[u8] = b"QC18_DA_SIGNERS_PUBKEY_REGISTRATION";

/// Domain tag for the per-epoch availability proof.
pub const EPOCH_REGISTRATION_TAG: &[u8] = b"QC18_DA_SIGNERS_EPOCH_REGISTRATION";

/// Point decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointError {
    #[error("field element is not canonical")]
    NonCanonical,
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point is not in the prime order subgroup")]
    NotInSubgroup,
}

fn fq_from_be(bytes: &[u8]) -> Result<Fq, PointError> {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.rchunks(8)) {
        let word: [u8; 8] = chunk.try_into().map_err(|_| PointError::NonCanonical)?;
        *limb = u64::from_be_bytes(word);
    }
    Fq::from_bigint(BigInt::new(limbs)).ok_or(PointError::NonCanonical)
}

fn fq_to_be(value: &Fq, out: &mut [u8]) {
    out.copy_from_slice(&value.into_bigint().to_bytes_be());
}

/// Decode a G1 point, rejecting anything outside the group.
pub fn deserialize_g1(bytes: &G1Bytes) -> Result<G1Affine, PointError> {
    if bytes.iter().all(|b| *b == 0) {
        return Ok(G1Affine::zero());
    }

    let x = fq_from_be(&bytes[..32])?;
    let y = fq_from_be(&bytes[32..])?;
    let point = G1Affine::new_unchecked(x, y);

    if !point.is_on_curve() {
        return Err(PointError::NotOnCurve);
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(PointError::NotInSubgroup);
    }
    Ok(point)
}

/// Encode a G1 point.
pub fn serialize_g1(point: &G1Affine) -> G1Bytes {
    let mut out = [0u8; 64];
    if let Some((x, y)) = point.xy() {
        fq_to_be(x, &mut out[..32]);
        fq_to_be(y, &mut out[32..]);
    }
    out
}

/// Decode a G2 point, rejecting anything outside the prime order subgroup.
pub fn deserialize_g2(bytes: &G2Bytes) -> Result<G2Affine, PointError> {
    if bytes.iter().all(|b| *b == 0) {
        return Ok(G2Affine::zero());
    }

    let x = Fq2::new(fq_from_be(&bytes[32..64])?, fq_from_be(&bytes[..32])?);
    let y = Fq2::new(fq_from_be(&bytes[96..])?, fq_from_be(&bytes[64..96])?);
    let point = G2Affine::new_unchecked(x, y);

    if !point.is_on_curve() {
        return Err(PointError::NotOnCurve);
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(PointError::NotInSubgroup);
    }
    Ok(point)
}

/// Encode a G2 point.
pub fn serialize_g2(point: &G2Affine) -> G2Bytes {
    let mut out = [0u8; 128];
    if let Some((x, y)) = point.xy() {
        fq_to_be(&x.c1, &mut out[..32]);
        fq_to_be(&x.c0, &mut out[32..64]);
        fq_to_be(&y.c1, &mut out[64..96]);
        fq_to_be(&y.c0, &mut out[96..]);
    }
    out
}

/// `scalar · G1`
pub fn scalar_mul_g1(point: &G1Affine, scalar: &Fr) -> G1Affine {
    (*point * scalar).into_affine()
}

/// `scalar · G2`
pub fn scalar_mul_g2(point: &G2Affine, scalar: &Fr) -> G2Affine {
    (*point * scalar).into_affine()
}

/// Map a message onto G1.
///
/// Keccak-256 of `domain_tag ‖ message` seeds `x`; `x` is incremented until
/// `x³ + 3` is a square. The smaller root is taken as `y`, so the result is
/// unique. G1 has cofactor one, so every curve point is in the group.
pub fn hash_to_g1(message: &[u8], domain_tag: &[u8]) -> G1Affine {
    let mut input = Vec::with_capacity(domain_tag.len() + message.len());
    input.extend_from_slice(domain_tag);
    input.extend_from_slice(message);

    let b = Fq::from(3u64);
    let mut x = Fq::from_be_bytes_mod_order(&keccak256(&input));
    loop {
        let rhs = x.square() * x + b;
        if let Some(y) = rhs.sqrt() {
            let y = std::cmp::min(y, -y);
            return G1Affine::new_unchecked(x, y);
        }
        x += Fq::one();
    }
}

/// Point a signer signs to prove ownership of its key pair.
pub fn pubkey_registration_hash(account: &[u8; 20], chain_id: u64) -> G1Affine {
    let mut message = Vec::with_capacity(52);
    message.extend_from_slice(account);
    message.extend_from_slice(&u256_be(chain_id));
    hash_to_g1(&message, PUBKEY_REGISTRATION_TAG)
}

/// Point a signer signs to declare availability for `epoch`.
pub fn epoch_registration_hash(account: &[u8; 20], epoch: u64, chain_id: u64) -> G1Affine {
    let mut message = Vec::with_capacity(60);
    message.extend_from_slice(account);
    message.extend_from_slice(&epoch.to_be_bytes());
    message.extend_from_slice(&u256_be(chain_id));
    hash_to_g1(&message, EPOCH_REGISTRATION_TAG)
}

fn u256_be(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Pairing check binding `signature` over `hash` to both key encodings.
///
/// Identity keys and signatures never verify.
pub fn verify_signature(
    pubkey_g1: &G1Affine,
    pubkey_g2: &G2Affine,
    hash: &G1Affine,
    signature: &G1Affine,
) -> bool {
    if pubkey_g1.is_zero() || pubkey_g2.is_zero() || signature.is_zero() {
        return false;
    }

    let mut transcript = Vec::with_capacity(64 * 3 + 128);
    transcript.extend_from_slice(&serialize_g1(signature));
    transcript.extend_from_slice(&serialize_g1(pubkey_g1));
    transcript.extend_from_slice(&serialize_g2(pubkey_g2));
    transcript.extend_from_slice(&serialize_g1(hash));
    let gamma = Fr::from_be_bytes_mod_order(&keccak256(&transcript));

    let lhs = (signature.into_group() + *pubkey_g1 * gamma).into_affine();
    let rhs = (hash.into_group() + G1Affine::generator() * gamma).into_affine();

    Bn254::multi_pairing([lhs, rhs], [-G2Affine::generator(), *pubkey_g2])
        .0
        .is_one()
}

/// Sum of G1 points; the identity for an empty input.
pub fn aggregate_g1<'a, I>(points: I) -> G1Affine
where
    I: IntoIterator<Item = &'a G1Affine>,
{
    points
        .into_iter()
        .fold(G1Affine::zero().into_group(), |acc, p| acc + p)
        .into_affine()
}

/// BN254 key pair for signers.
#[derive(Clone, Debug)]
pub struct Keypair {
    secret: Fr,
    pub pubkey_g1: G1Affine,
    pub pubkey_g2: G2Affine,
}

impl Keypair {
    /// Derive a key pair from a secret scalar. Zero is not a valid secret.
    pub fn from_secret(secret: Fr) -> Option<Self> {
        if secret.is_zero() {
            return None;
        }
        Some(Self {
            secret,
            pubkey_g1: scalar_mul_g1(&G1Affine::generator(), &secret),
            pubkey_g2: scalar_mul_g2(&G2Affine::generator(), &secret),
        })
    }

    /// Derive a key pair from big-endian secret bytes (reduced mod r).
    pub fn from_secret_bytes(bytes: &[u8]) -> Option<Self> {
        Self::from_secret(Fr::from_be_bytes_mod_order(bytes))
    }

    pub fn pubkey_g1_bytes(&self) -> G1Bytes {
        serialize_g1(&self.pubkey_g1)
    }

    pub fn pubkey_g2_bytes(&self) -> G2Bytes {
        serialize_g2(&self.pubkey_g2)
    }

    /// `sk · hash`
    pub fn sign(&self, hash: &G1Affine) -> G1Affine {
        scalar_mul_g1(hash, &self.secret)
    }

    /// Sign and encode.
    pub fn sign_bytes(&self, hash: &G1Affine) -> G1Bytes {
        serialize_g1(&self.sign(hash))
    }
}
