//! AES-256-GCM authenticated encryption of file payloads.
//!
//! Every encryption draws a fresh 96-bit nonce from the RNG; the GCM tag
//! trails the ciphertext, so decryption fails closed on any modification.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{DataKey, KEY_SIZE};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// AES-GCM nonce length in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// One AEAD output: the nonce used and the ciphertext with its trailing tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Encodes as base64 over the concatenation `[nonce || ciphertext]`.
    pub fn to_base64(&self) -> String {
        let mut buf = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.ciphertext);
        STANDARD.encode(buf)
    }

    /// Decodes the `[nonce || ciphertext]` base64 form.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::Metadata(format!("invalid base64: {e}")))?;
        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::Metadata(format!(
                "encrypted blob too short: {} bytes",
                bytes.len()
            )));
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[..NONCE_SIZE]);
        Ok(Self {
            nonce,
            ciphertext: bytes[NONCE_SIZE..].to_vec(),
        })
    }
}

/// Encrypts a payload under a data key with a fresh random nonce.
pub fn encrypt_payload(key: &DataKey, plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    encrypt_payload_with(&mut OsRng, key, plaintext)
}

/// Same as [`encrypt_payload`] with a caller-supplied RNG.
pub fn encrypt_payload_with<R>(
    rng: &mut R,
    key: &DataKey,
    plaintext: &[u8],
) -> CryptoResult<EncryptedData>
where
    R: RngCore + CryptoRng,
{
    seal(key.as_bytes(), rng, plaintext)
}

/// Decrypts a payload; fails closed if the tag does not verify.
pub fn decrypt_payload(key: &DataKey, data: &EncryptedData) -> CryptoResult<Vec<u8>> {
    open(key.as_bytes(), &data.nonce, &data.ciphertext)
}

pub(crate) fn seal<R>(
    key_bytes: &[u8; KEY_SIZE],
    rng: &mut R,
    plaintext: &[u8],
) -> CryptoResult<EncryptedData>
where
    R: RngCore + CryptoRng,
{
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes));
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(format!("AES-GCM seal failed: {e}")))?;

    Ok(EncryptedData { nonce, ciphertext })
}

pub(crate) fn open(
    key_bytes: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}
