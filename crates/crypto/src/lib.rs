//! End-to-end secure channel: asymmetric-keyed bootstrap of a symmetric
//! session key, then AEAD-authenticated payloads carried over the data
//! channel without the coordinator ever seeing plaintext.
//!
//! Bootstrap, in order:
//! 1. client sends its RSA public key
//! 2. worker generates or reuses its own keypair and replies with its public key
//! 3. client wraps a fresh AES-256 key under the worker's public key and sends it
//! 4. worker unwraps the key and acknowledges
//!
//! After step 4 both sides hold the same symmetric key and
//! [`SecureChannel::encrypt`]/[`SecureChannel::decrypt`] carry the body.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use thiserror::Error;

const RSA_KEY_BITS: usize = 2048;
const AES_KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("public key encoding failed: {0}")]
    Encoding(String),
    #[error("key wrap/unwrap failed: {0}")]
    KeyExchange(String),
    #[error("no symmetric key established yet")]
    NotEstablished,
    #[error("decryption failed: authentication tag mismatch or malformed frame")]
    DecryptionFailed,
}

/// Mirrors [`fabric_core::SecureChannelState`] without the core dependency,
/// so this crate stays leaf-level per the stated build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    None,
    RemotePubkeyKnown,
    SymmetricKeyEstablished,
}

/// One end of a bootstrapping secure channel. The same type is used by
/// both client and worker; which methods are called in which order
/// determines the role.
pub struct SecureChannel {
    local_keypair: Option<(RsaPrivateKey, RsaPublicKey)>,
    remote_public_key: Option<RsaPublicKey>,
    symmetric_key: Option<[u8; AES_KEY_LEN]>,
}

impl SecureChannel {
    pub fn new() -> Self {
        Self { local_keypair: None, remote_public_key: None, symmetric_key: None }
    }

    pub fn state(&self) -> ChannelState {
        if self.symmetric_key.is_some() {
            ChannelState::SymmetricKeyEstablished
        } else if self.remote_public_key.is_some() {
            ChannelState::RemotePubkeyKnown
        } else {
            ChannelState::None
        }
    }

    /// Generate (once) and return this side's RSA public key, base64-encoded
    /// PKCS#1 DER. Reuses the keypair across calls within one channel.
    pub fn local_public_key_base64(&mut self) -> Result<String, CryptoError> {
        if self.local_keypair.is_none() {
            let mut rng = OsRng;
            let private = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)
                .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
            let public = RsaPublicKey::from(&private);
            self.local_keypair = Some((private, public));
        }
        let (_, public) = self.local_keypair.as_ref().expect("just populated above");
        encode_public_key(public)
    }

    /// Record the peer's public key, received as base64 PKCS#1 DER.
    pub fn receive_public_key(&mut self, encoded: &str) -> Result<(), CryptoError> {
        self.remote_public_key = Some(decode_public_key(encoded)?);
        Ok(())
    }

    /// Client side: generate a fresh AES-256 key, remember it, and return it
    /// wrapped (RSA-OAEP) under the peer's public key, base64-encoded.
    pub fn generate_and_wrap_key(&mut self) -> Result<String, CryptoError> {
        let remote = self
            .remote_public_key
            .as_ref()
            .ok_or_else(|| CryptoError::KeyExchange("peer public key not yet known".into()))?;

        let mut key = [0u8; AES_KEY_LEN];
        rand::RngCore::fill_bytes(&mut OsRng, &mut key);

        let mut rng = OsRng;
        let wrapped = remote
            .encrypt(&mut rng, Oaep::new::<Sha256>(), &key)
            .map_err(|e| CryptoError::KeyExchange(e.to_string()))?;

        self.symmetric_key = Some(key);
        Ok(BASE64.encode(wrapped))
    }

    /// Worker side: unwrap a base64 RSA-OAEP-wrapped AES key with this
    /// side's private key and adopt it as the session key.
    pub fn unwrap_key(&mut self, wrapped_base64: &str) -> Result<(), CryptoError> {
        let (private, _) = self
            .local_keypair
            .as_ref()
            .ok_or_else(|| CryptoError::KeyExchange("no local keypair generated yet".into()))?;

        let wrapped = BASE64
            .decode(wrapped_base64)
            .map_err(|e| CryptoError::Encoding(e.to_string()))?;
        let key = private
            .decrypt(Oaep::new::<Sha256>(), &wrapped)
            .map_err(|e| CryptoError::KeyExchange(e.to_string()))?;
        if key.len() != AES_KEY_LEN {
            return Err(CryptoError::KeyExchange(format!(
                "unwrapped key has wrong length: {}",
                key.len()
            )));
        }
        let mut buf = [0u8; AES_KEY_LEN];
        buf.copy_from_slice(&key);
        self.symmetric_key = Some(buf);
        Ok(())
    }

    /// Encrypt `plaintext` under the established session key. `aad` should
    /// cover the message type (`encrypted-task` or `encrypted-result`) so a
    /// frame replayed under the other type fails to authenticate.
    ///
    /// Returns a single base64 string: `nonce || ciphertext-with-tag`.
    pub fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> Result<String, CryptoError> {
        let key = self.symmetric_key.ok_or(CryptoError::NotEstablished)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut OsRng, &mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, aes_gcm::aead::Payload { msg: plaintext, aad })
            .map_err(|_| CryptoError::DecryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(out))
    }

    /// Decrypt a frame produced by [`Self::encrypt`]. Any failure —
    /// malformed base64, short frame, or a tampered tag — is reported as
    /// [`CryptoError::DecryptionFailed`]; callers must treat the session as
    /// unrecoverable on this error and tear it down.
    pub fn decrypt(&self, encrypted_data: &str, aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let key = self.symmetric_key.ok_or(CryptoError::NotEstablished)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));

        let raw = BASE64.decode(encrypted_data).map_err(|_| CryptoError::DecryptionFailed)?;
        if raw.len() < NONCE_LEN {
            return Err(CryptoError::DecryptionFailed);
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher
            .decrypt(nonce, aes_gcm::aead::Payload { msg: ciphertext, aad })
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}

impl Default for SecureChannel {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_public_key(key: &RsaPublicKey) -> Result<String, CryptoError> {
    use rsa::pkcs1::EncodeRsaPublicKey;
    let der = key.to_pkcs1_der().map_err(|e| CryptoError::Encoding(e.to_string()))?;
    Ok(BASE64.encode(der.as_bytes()))
}

fn decode_public_key(encoded: &str) -> Result<RsaPublicKey, CryptoError> {
    use rsa::pkcs1::DecodeRsaPublicKey;
    let der = BASE64.decode(encoded).map_err(|e| CryptoError::Encoding(e.to_string()))?;
    RsaPublicKey::from_pkcs1_der(&der).map_err(|e| CryptoError::Encoding(e.to_string()))
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
