//! Envelope encryption core for Lockbox.
//!
//! Every file is encrypted under a fresh, single-use data key with
//! AES-256-GCM, and that data key is wrapped under a key derived from the
//! user's passphrase with PBKDF2-HMAC-SHA256. The passphrase is never
//! stored; the raw data key never leaves a single call.
//!
//! # Architecture
//!
//! Two stateless engines cooperate inside each call:
//!
//! 1. **Data-key engine**: generates the per-file key and performs
//!    authenticated encryption of the payload bytes.
//! 2. **Key-wrapping engine**: derives the wrapping key from
//!    (passphrase, salt, iteration count) and seals the data key under it.
//!
//! [`encrypt_file`] returns the payload ciphertext plus a self-contained
//! [`FileEnvelope`] record; [`decrypt_file`] needs exactly those two
//! artifacts and the passphrase, nothing else. Calls share no state and
//! may run fully in parallel.
//!
//! A wrong passphrase and tampered data both surface as the one generic
//! [`CryptoError::Authentication`]; distinguishing them would hand an
//! attacker an oracle. Malformed records are rejected separately, before
//! any primitive runs.

mod cipher;
pub mod envelope;
mod error;
mod key;

pub use cipher::{
    decrypt_payload, encrypt_payload, encrypt_payload_with, EncryptedData, NONCE_SIZE, TAG_SIZE,
};
pub use envelope::{
    decrypt_file, encrypt_file, encrypt_file_with, unwrap_data_key, wrap_data_key,
    wrap_data_key_with, FileEnvelope, FileMetadata, ALGORITHM_ID, KDF_ID, WRAPPED_KEY_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    derive_wrapping_key, generate_data_key, generate_data_key_with, DataKey, KdfParams, Salt,
    WrappingKey, KDF_ITERATION_FLOOR, KEY_SIZE, SALT_SIZE,
};
