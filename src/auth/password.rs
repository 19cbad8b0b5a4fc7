//! Salted password hashing.
//!
//! Stored hashes have the form `salt.digest`: a random hex salt and the hex
//! encoded Argon2id output over the password and that salt. Argon2 is CPU
//! bound, so async callers should use the `_async` variants.

use anyhow::Context;
use argon2::{password_hash::Output, Argon2};
use rand::{rngs::OsRng, RngCore};
use tracing::{error, warn};

const SALT_LEN: usize = 8;
const DIGEST_LEN: usize = 32;
const SEPARATOR: char = '.';

/// Fresh random salt, hex encoded.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn digest_bytes(plain: &str, salt: &str) -> anyhow::Result<[u8; DIGEST_LEN]> {
    let mut out = [0u8; DIGEST_LEN];
    Argon2::default()
        .hash_password_into(plain.as_bytes(), salt.as_bytes(), &mut out)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password_into error");
            anyhow::anyhow!(e.to_string())
        })?;
    Ok(out)
}

/// Hex encoded digest of `plain` keyed with `salt`.
pub fn derive_digest(plain: &str, salt: &str) -> anyhow::Result<String> {
    Ok(hex::encode(digest_bytes(plain, salt)?))
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = generate_salt();
    let digest = derive_digest(plain, &salt)?;
    Ok(format!("{salt}{SEPARATOR}{digest}"))
}

fn parse_stored(stored: &str) -> Option<(&str, Output)> {
    let (salt, digest) = stored.split_once(SEPARATOR)?;
    if salt.len() != SALT_LEN * 2 || hex::decode(salt).is_err() {
        return None;
    }
    let digest = hex::decode(digest).ok()?;
    if digest.len() != DIGEST_LEN {
        return None;
    }
    let digest = Output::new(&digest).ok()?;
    Some((salt, digest))
}

/// Checks `plain` against a stored `salt.digest` value.
///
/// A stored value that does not parse is treated as a mismatch. The digests
/// are compared through [`Output`], whose equality is constant time.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let Some((salt, expected)) = parse_stored(stored) else {
        warn!("stored password hash is malformed");
        return Ok(false);
    };
    let actual = digest_bytes(plain, salt)?;
    let actual = Output::new(&actual).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(actual == expected)
}

pub async fn hash_password_async(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task")?
}

pub async fn verify_password_async(plain: String, stored: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &stored))
        .await
        .context("password verification task")?
}
