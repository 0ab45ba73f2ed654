//! Envelope orchestration: wrapping of data keys and the file-level
//! encrypt/decrypt entry points.
//!
//! One [`encrypt_file`] call produces exactly two artifacts the storage
//! layer must persist together: the payload ciphertext and a self-contained
//! [`FileEnvelope`] record. Decryption needs nothing beyond those two and
//! the passphrase; the core performs no lookup or caching of its own.

use crate::cipher::{self, EncryptedData, NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{
    derive_wrapping_key, generate_data_key_with, DataKey, KdfParams, Salt, WrappingKey,
    KDF_ITERATION_FLOOR, KEY_SIZE, SALT_SIZE,
};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroize;

/// Authenticated cipher identifier written into every envelope. A future
/// scheme revision introduces a new constant; unrecognized values are
/// rejected before any primitive runs.
pub const ALGORITHM_ID: &str = "AES-256-GCM";

/// KDF identifier written into every envelope.
pub const KDF_ID: &str = "PBKDF2-HMAC-SHA256";

/// Length of a wrapped data key: raw key plus authentication tag.
pub const WRAPPED_KEY_SIZE: usize = KEY_SIZE + TAG_SIZE;

/// Plaintext provenance supplied by the caller. Advisory only; carried
/// unencrypted in the envelope record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

/// The persisted metadata record for one encrypted file.
///
/// Together with the payload ciphertext this is a self-contained unit:
/// salt and iteration count reproduce the wrapping key, the wrapped key
/// yields the data key, and the nonces drive both AEAD operations. The
/// record never contains the raw data key or the wrapping key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileEnvelope {
    pub algorithm: String,
    pub kdf: String,
    pub kdf_iterations: u32,
    pub salt: [u8; SALT_SIZE],
    pub file_nonce: [u8; NONCE_SIZE],
    /// Data key encrypted under the wrapping key (ciphertext + tag).
    pub wrapped_key: Vec<u8>,
    pub wrap_nonce: [u8; NONCE_SIZE],
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    /// Unix timestamp of the encryption event. Advisory.
    pub created_at: i64,
}

impl FileEnvelope {
    /// Structural checks that run before any cryptographic primitive.
    ///
    /// Failures here mean the record was corrupted in storage or written
    /// by an unknown scheme version, as opposed to a wrong passphrase.
    pub fn validate(&self) -> CryptoResult<()> {
        if self.algorithm != ALGORITHM_ID {
            return Err(CryptoError::Metadata(format!(
                "unrecognized algorithm identifier: {}",
                self.algorithm
            )));
        }
        if self.kdf != KDF_ID {
            return Err(CryptoError::Metadata(format!(
                "unrecognized kdf identifier: {}",
                self.kdf
            )));
        }
        if self.kdf_iterations == 0 {
            return Err(CryptoError::Metadata(
                "kdf iteration count must be positive".into(),
            ));
        }
        if self.wrapped_key.len() != WRAPPED_KEY_SIZE {
            return Err(CryptoError::Metadata(format!(
                "wrapped key must be {WRAPPED_KEY_SIZE} bytes, got {}",
                self.wrapped_key.len()
            )));
        }
        Ok(())
    }
}

/// Encrypts the raw data-key bytes under the wrapping key with a fresh nonce.
pub fn wrap_data_key(wrap_key: &WrappingKey, data_key: &DataKey) -> CryptoResult<EncryptedData> {
    wrap_data_key_with(&mut OsRng, wrap_key, data_key)
}

/// Same as [`wrap_data_key`] with a caller-supplied RNG.
pub fn wrap_data_key_with<R>(
    rng: &mut R,
    wrap_key: &WrappingKey,
    data_key: &DataKey,
) -> CryptoResult<EncryptedData>
where
    R: RngCore + CryptoRng,
{
    cipher::seal(wrap_key.as_bytes(), rng, data_key.as_bytes())
}

/// Recovers the data key from its wrapped form; the tag must verify.
///
/// A wrong passphrase, a tampered wrapped key and a mismatched nonce or
/// salt all fail identically here.
pub fn unwrap_data_key(
    wrap_key: &WrappingKey,
    wrapped: &EncryptedData,
) -> CryptoResult<DataKey> {
    let mut plaintext = cipher::open(wrap_key.as_bytes(), &wrapped.nonce, &wrapped.ciphertext)?;
    if plaintext.len() != KEY_SIZE {
        let actual = plaintext.len();
        plaintext.zeroize();
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual,
        });
    }

    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&plaintext);
    plaintext.zeroize();
    let key = DataKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Encrypts one file under a fresh data key and wraps that key under the
/// passphrase, using the default KDF parameters.
///
/// Returns the payload ciphertext and the envelope record; the caller
/// persists both together, atomically associated. No state survives the
/// call: both keys are discarded before it returns.
pub fn encrypt_file(
    plaintext: &[u8],
    meta: &FileMetadata,
    passphrase: &str,
) -> CryptoResult<(Vec<u8>, FileEnvelope)> {
    encrypt_file_with(&mut OsRng, &KdfParams::default(), plaintext, meta, passphrase)
}

/// Same as [`encrypt_file`] with a caller-supplied RNG and KDF parameters.
///
/// Iteration counts below [`KDF_ITERATION_FLOOR`] are rejected so the
/// passphrase-guessing cost can never silently regress on newly written
/// envelopes.
pub fn encrypt_file_with<R>(
    rng: &mut R,
    params: &KdfParams,
    plaintext: &[u8],
    meta: &FileMetadata,
    passphrase: &str,
) -> CryptoResult<(Vec<u8>, FileEnvelope)>
where
    R: RngCore + CryptoRng,
{
    if params.iterations < KDF_ITERATION_FLOOR {
        return Err(CryptoError::Config(format!(
            "kdf iteration count {} is below the floor of {KDF_ITERATION_FLOOR}",
            params.iterations
        )));
    }

    let data_key = generate_data_key_with(rng);
    let payload = cipher::encrypt_payload_with(rng, &data_key, plaintext)?;

    let salt = Salt::random_with(rng);
    let wrap_key = derive_wrapping_key(passphrase, &salt, params)?;
    let wrapped = wrap_data_key_with(rng, &wrap_key, &data_key)?;

    let envelope = FileEnvelope {
        algorithm: ALGORITHM_ID.to_string(),
        kdf: KDF_ID.to_string(),
        kdf_iterations: params.iterations,
        salt: *salt.as_bytes(),
        file_nonce: payload.nonce,
        wrapped_key: wrapped.ciphertext,
        wrap_nonce: wrapped.nonce,
        filename: meta.filename.clone(),
        content_type: meta.content_type.clone(),
        size: meta.size,
        created_at: chrono::Utc::now().timestamp(),
    };

    debug!(
        filename = %envelope.filename,
        plaintext_len = plaintext.len(),
        iterations = envelope.kdf_iterations,
        "file sealed under fresh data key"
    );

    Ok((payload.ciphertext, envelope))
}

/// Decrypts one file given the exact ciphertext and envelope record
/// produced by [`encrypt_file`].
///
/// The record is validated before any primitive runs; after that, every
/// failure is the single generic [`CryptoError::Authentication`] — the
/// wrap layer and the payload layer are indistinguishable by design.
pub fn decrypt_file(
    ciphertext: &[u8],
    envelope: &FileEnvelope,
    passphrase: &str,
) -> CryptoResult<Vec<u8>> {
    envelope.validate()?;

    if envelope.kdf_iterations < KDF_ITERATION_FLOOR {
        warn!(
            iterations = envelope.kdf_iterations,
            floor = KDF_ITERATION_FLOOR,
            "envelope carries a kdf iteration count below the current floor"
        );
    }

    let salt = Salt::from_bytes(envelope.salt);
    let params = KdfParams {
        iterations: envelope.kdf_iterations,
    };
    let wrap_key = derive_wrapping_key(passphrase, &salt, &params)?;

    let wrapped = EncryptedData {
        nonce: envelope.wrap_nonce,
        ciphertext: envelope.wrapped_key.clone(),
    };
    let data_key = unwrap_data_key(&wrap_key, &wrapped)?;

    let plaintext = cipher::open(data_key.as_bytes(), &envelope.file_nonce, ciphertext)?;

    debug!(
        filename = %envelope.filename,
        plaintext_len = plaintext.len(),
        "file opened"
    );

    Ok(plaintext)
}
