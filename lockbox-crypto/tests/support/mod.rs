//! Shared helpers for integration tests.

use lockbox_crypto::{
    derive_wrapping_key, encrypt_payload, generate_data_key, wrap_data_key, FileEnvelope,
    FileMetadata, KdfParams, Salt, ALGORITHM_ID, KDF_ID,
};

pub fn file_meta() -> FileMetadata {
    FileMetadata {
        filename: "notes.txt".to_string(),
        content_type: "text/plain".to_string(),
        size: 10,
    }
}

/// Assembles an envelope through the public primitives with an arbitrary
/// iteration count, bypassing the encrypt-path floor. This is the shape of
/// records written by clients before the floor was raised, and it keeps
/// tamper loops fast.
pub fn seal_with_iterations(
    plaintext: &[u8],
    passphrase: &str,
    iterations: u32,
) -> (Vec<u8>, FileEnvelope) {
    let params = KdfParams { iterations };
    let data_key = generate_data_key();
    let payload = encrypt_payload(&data_key, plaintext).unwrap();

    let salt = Salt::random();
    let wrap_key = derive_wrapping_key(passphrase, &salt, &params).unwrap();
    let wrapped = wrap_data_key(&wrap_key, &data_key).unwrap();

    let envelope = FileEnvelope {
        algorithm: ALGORITHM_ID.to_string(),
        kdf: KDF_ID.to_string(),
        kdf_iterations: iterations,
        salt: *salt.as_bytes(),
        file_nonce: payload.nonce,
        wrapped_key: wrapped.ciphertext,
        wrap_nonce: wrapped.nonce,
        filename: "notes.txt".to_string(),
        content_type: "text/plain".to_string(),
        size: plaintext.len() as u64,
        created_at: 1_650_000_000,
    };

    (payload.ciphertext, envelope)
}
