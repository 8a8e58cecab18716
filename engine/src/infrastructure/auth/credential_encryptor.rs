// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Credential Encryptor (spec §4.5)
//!
//! AES-256-GCM with a random 12-byte nonce per call; ciphertext output is
//! `base64(nonce ‖ ciphertext ‖ tag)`. Key derivation accepts either a
//! base64-encoded 32-byte key directly or, for any other input, the
//! SHA-256 of the input bytes — a "use verbatim if shaped right, otherwise
//! hash" fallback for password-derived key material.

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use engine_domain::EngineError;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

fn derive_key(key_material: &str) -> [u8; 32] {
    if let Ok(decoded) = BASE64.decode(key_material) {
        if decoded.len() == 32 {
            let mut key = [0u8; 32];
            key.copy_from_slice(&decoded);
            return key;
        }
    }
    let digest = Sha256::digest(key_material.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

/// Encrypts `plaintext` under the key derived from `key_material`. Empty
/// plaintext is preserved as empty with no envelope (spec §4.5).
pub fn encrypt(key_material: &str, plaintext: &str) -> Result<String, EngineError> {
    if plaintext.is_empty() {
        return Ok(String::new());
    }
    let key_bytes = derive_key(key_material);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| EngineError::Other("encryption failed".to_string()))?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(nonce.as_slice());
    envelope.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(envelope))
}

/// Decrypts an envelope produced by [`encrypt`]. Fails with
/// [`EngineError::DecryptionFailed`] on invalid base64, a too-short
/// envelope, or an authentication-tag mismatch (spec §4.5).
pub fn decrypt(key_material: &str, envelope: &str) -> Result<String, EngineError> {
    if envelope.is_empty() {
        return Ok(String::new());
    }
    let raw = BASE64.decode(envelope).map_err(|_| EngineError::DecryptionFailed)?;
    if raw.len() < NONCE_LEN + TAG_LEN {
        return Err(EngineError::DecryptionFailed);
    }
    let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
    let key_bytes = derive_key(key_material);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    let plaintext = cipher
        .decrypt(nonce_bytes.into(), ciphertext)
        .map_err(|_| EngineError::DecryptionFailed)?;
    String::from_utf8(plaintext).map_err(|_| EngineError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "a shared passphrase, not a raw key";

    #[test]
    fn round_trips_plaintext() {
        let ciphertext = encrypt(KEY, "upstream-secret").unwrap();
        assert_eq!(decrypt(KEY, &ciphertext).unwrap(), "upstream-secret");
    }

    #[test]
    fn empty_plaintext_has_no_envelope() {
        assert_eq!(encrypt(KEY, "").unwrap(), "");
        assert_eq!(decrypt(KEY, "").unwrap(), "");
    }

    #[test]
    fn reencrypting_yields_different_ciphertext() {
        let a = encrypt(KEY, "same-plaintext").unwrap();
        let b = encrypt(KEY, "same-plaintext").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn decrypt_rejects_invalid_base64() {
        assert!(matches!(decrypt(KEY, "not base64!!"), Err(EngineError::DecryptionFailed)));
    }

    #[test]
    fn decrypt_rejects_truncated_envelope() {
        let short = BASE64.encode([0u8; 4]);
        assert!(matches!(decrypt(KEY, &short), Err(EngineError::DecryptionFailed)));
    }

    #[test]
    fn decrypt_rejects_tampered_ciphertext() {
        let mut raw = BASE64.decode(encrypt(KEY, "tamper me").unwrap()).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        assert!(matches!(decrypt(KEY, &BASE64.encode(raw)), Err(EngineError::DecryptionFailed)));
    }

    #[test]
    fn decrypt_rejects_wrong_key() {
        let ciphertext = encrypt(KEY, "secret").unwrap();
        assert!(matches!(decrypt("a different passphrase", &ciphertext), Err(EngineError::DecryptionFailed)));
    }
}
