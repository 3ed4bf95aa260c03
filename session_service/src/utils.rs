use base64::Engine as _;
use base64::alphabet::Alphabet;
use base64::engine::{GeneralPurpose, general_purpose::NO_PAD};
use ring::rand::SecureRandom;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Characters allowed in a session id, 6 bits per character.
const SESSION_ID_ALPHABET: Alphabet = match Alphabet::new(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-,",
) {
    Ok(alphabet) => alphabet,
    Err(_) => panic!("invalid session id alphabet"),
};

const SESSION_ID_ENGINE: GeneralPurpose = GeneralPurpose::new(&SESSION_ID_ALPHABET, NO_PAD);

/// Number of random bytes behind a generated session id (43 characters).
pub(crate) const SESSION_ID_BYTES: usize = 32;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

fn random_bytes(len: usize) -> Result<Vec<u8>, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(bytes)
}

/// Generates a session id from `len` random bytes, encoded with the session id alphabet.
pub(crate) fn gen_session_id(len: usize) -> Result<String, UtilError> {
    if len == 0 {
        return Err(UtilError::Format(
            "Session id length must be greater than zero".to_string(),
        ));
    }
    let bytes = random_bytes(len)?;
    Ok(SESSION_ID_ENGINE.encode(bytes))
}

/// Returns true if `id` is a well-formed session id: 1 to 128 characters of `[-,A-Za-z0-9]`.
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b',')
}

/// Returns true if `name` is a non-empty ASCII alphanumeric session name.
pub fn is_valid_session_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Shortens a session id for log output.
pub(crate) fn redact_id(id: &str) -> String {
    let prefix: String = id.chars().take(6).collect();
    format!("{prefix}…")
}
