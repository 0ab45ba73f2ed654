//! Key material and passphrase-based key derivation.
//!
//! Wrapping keys are derived from the user's passphrase with
//! PBKDF2-HMAC-SHA256; data keys are drawn fresh from the OS random source
//! for every file. Both key types are zeroized on drop and redacted from
//! `Debug` output.

use crate::error::{CryptoError, CryptoResult};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric key length in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// KDF salt length in bytes.
pub const SALT_SIZE: usize = 16;

/// Minimum PBKDF2 iteration count accepted on the encrypt path; also the
/// default. Records written before a floor increase remain decryptable.
pub const KDF_ITERATION_FLOOR: u32 = 250_000;

/// PBKDF2 work-factor parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: KDF_ITERATION_FLOOR,
        }
    }
}

/// Random per-derivation KDF input.
///
/// Persisted in the envelope record: the same salt must be presented to
/// re-derive the wrapping key on decryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Draws a fresh random salt from the OS random source.
    pub fn random() -> Self {
        Self::random_with(&mut OsRng)
    }

    /// Draws a fresh random salt from the supplied RNG.
    pub fn random_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Single-use 256-bit key encrypting one file's contents.
///
/// Exists only transiently in memory; only its wrapped form leaves the core.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DataKey([u8; KEY_SIZE]);

impl DataKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataKey(REDACTED)")
    }
}

/// Passphrase-derived 256-bit key that only ever encrypts data keys.
///
/// Never persisted; re-derived from the envelope's salt on every decrypt.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WrappingKey([u8; KEY_SIZE]);

impl WrappingKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for WrappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WrappingKey(REDACTED)")
    }
}

/// Generates a fresh random data key from the OS random source.
pub fn generate_data_key() -> DataKey {
    generate_data_key_with(&mut OsRng)
}

/// Generates a fresh random data key from the supplied RNG.
pub fn generate_data_key_with<R: RngCore + CryptoRng>(rng: &mut R) -> DataKey {
    let mut bytes = [0u8; KEY_SIZE];
    rng.fill_bytes(&mut bytes);
    DataKey(bytes)
}

/// Derives the wrapping key from a passphrase with PBKDF2-HMAC-SHA256.
///
/// Deterministic: identical inputs always yield the identical key. The
/// iteration count is the sole defense against offline guessing of
/// low-entropy passphrases, so it is part of the persisted record and
/// must be fed back verbatim on decryption.
pub fn derive_wrapping_key(
    passphrase: &str,
    salt: &Salt,
    params: &KdfParams,
) -> CryptoResult<WrappingKey> {
    if passphrase.is_empty() {
        return Err(CryptoError::Config("passphrase must not be empty".into()));
    }
    if params.iterations == 0 {
        return Err(CryptoError::Config(
            "kdf iteration count must be positive".into(),
        ));
    }

    let mut out = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        passphrase.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut out,
    );
    Ok(WrappingKey(out))
}
