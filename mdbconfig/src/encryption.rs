//! Machine-bound encryption for the stored API token
//!
//! The personal access token is the only credential MDBlog persists. It is
//! kept in `config.yaml` as `encrypted:BASE64(nonce || ciphertext)`, sealed
//! with AES-256-GCM under a key derived from the machine identifier. The
//! config file is therefore not portable across machines, but a leaked copy
//! does not leak the token. Values without the prefix are passed through
//! unchanged, so a token pasted by hand keeps working.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Result};
use base64::Engine;
use sha2::{Digest, Sha256};

/// Marker in front of sealed values in the config file
const ENCRYPTED_PREFIX: &str = "encrypted:";

const KEY_SALT: &[u8] = b"mdblog-config-encryption-v1";
const NONCE_SALT: &[u8] = b"mdblog-nonce-v1";
const NONCE_LEN: usize = 12;

/// Stable identifier of this machine, used as key material
#[cfg(target_os = "linux")]
fn machine_id() -> Result<String> {
    for path in ["/etc/machine-id", "/var/lib/dbus/machine-id"] {
        if let Ok(id) = std::fs::read_to_string(path) {
            return Ok(id.trim().to_string());
        }
    }
    Err(anyhow!("Failed to read machine-id"))
}

#[cfg(target_os = "macos")]
fn machine_id() -> Result<String> {
    let output = std::process::Command::new("ioreg")
        .args(["-d2", "-c", "IOPlatformExpertDevice"])
        .output()?;
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find(|line| line.contains("IOPlatformUUID"))
        .and_then(|line| line.split('"').nth(3))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Failed to extract IOPlatformUUID from ioreg"))
}

#[cfg(target_os = "windows")]
fn machine_id() -> Result<String> {
    let output = std::process::Command::new("wmic")
        .args(["csproduct", "get", "UUID"])
        .output()?;
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .nth(1)
        .map(|line| line.trim().to_string())
        .ok_or_else(|| anyhow!("Failed to extract UUID from wmic"))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn machine_id() -> Result<String> {
    Err(anyhow!("Unsupported platform for machine identification"))
}

fn sha256_tagged(data: &[u8], salt: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.update(salt);
    hasher.finalize().into()
}

/// Cipher keyed for this machine
fn machine_cipher() -> Result<Aes256Gcm> {
    let key = sha256_tagged(machine_id()?.as_bytes(), KEY_SALT);
    Aes256Gcm::new_from_slice(&key).map_err(|e| anyhow!("Failed to create cipher: {}", e))
}

/// Seals a token for storage in the config file
///
/// The nonce is derived from the token itself, making encryption
/// deterministic: saving an unchanged token does not rewrite the file.
pub fn encrypt_token(token: &str) -> Result<String> {
    let cipher = machine_cipher()?;
    let nonce_bytes = &sha256_tagged(token.as_bytes(), NONCE_SALT)[..NONCE_LEN];
    let nonce = Nonce::from_slice(nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, token.as_bytes())
        .map_err(|e| anyhow!("Encryption failed: {}", e))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    Ok(format!(
        "{}{}",
        ENCRYPTED_PREFIX,
        base64::engine::general_purpose::STANDARD.encode(&sealed)
    ))
}

/// Opens a value produced by [`encrypt_token`]
///
/// Fails when the prefix or base64 is malformed, or when the value was
/// sealed on a different machine.
pub fn decrypt_token(encrypted: &str) -> Result<String> {
    let encoded = encrypted
        .strip_prefix(ENCRYPTED_PREFIX)
        .ok_or_else(|| anyhow!("Invalid encrypted token format (missing prefix)"))?;

    let sealed = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| anyhow!("Invalid base64: {}", e))?;
    if sealed.len() < NONCE_LEN {
        return Err(anyhow!("Invalid ciphertext (too short)"));
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);

    let plaintext = machine_cipher()?
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|e| anyhow!("Decryption failed (wrong machine or corrupted data): {}", e))?;

    String::from_utf8(plaintext).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
}

/// Checks whether a stored value carries the encrypted marker
pub fn is_encrypted(value: &str) -> bool {
    value.starts_with(ENCRYPTED_PREFIX)
}

/// Returns the clear-text token whether the stored value is sealed or not
pub fn get_token(value: &str) -> Result<String> {
    if is_encrypted(value) {
        decrypt_token(value)
    } else {
        Ok(value.to_string())
    }
}
