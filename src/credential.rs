//! Credential verification.
//!
//! Two interchangeable schemes implement [`Credential`]: the legacy plaintext
//! password and the hardened salted hash. [`StoredCredential`] is the persisted
//! form and accepts either shape from the data file.

use clap::ValueEnum;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

/// Salt length used when none is configured.
pub const DEFAULT_SALT_BYTES: usize = 16;

/// Shortest salt accepted for newly generated credentials.
pub const MIN_SALT_BYTES: usize = 8;

/// Checks a candidate password and re-keys on password change.
pub trait Credential {
    /// Returns `true` if `candidate` is the current password. Never mutates.
    fn verify(&self, candidate: &str) -> bool;

    /// Replaces the secret with `new_password`.
    fn replace(&mut self, new_password: &str);
}

/// Which scheme new credentials are created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CredentialScheme {
    /// Salted one-way hash.
    #[default]
    Salted,
    /// Password stored as-is, as older data files do.
    Plaintext,
}

/// Digest applied to `password ++ salt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Hashes `password` followed by `salt` and renders lowercase hex.
    pub fn hash(&self, password: &str, salt: &str) -> String {
        match self {
            HashAlgorithm::Sha256 => digest_hex::<Sha256>(password, salt),
            HashAlgorithm::Sha512 => digest_hex::<Sha512>(password, salt),
        }
    }

    fn is_default(&self) -> bool {
        *self == HashAlgorithm::default()
    }
}

fn digest_hex<D: Digest>(password: &str, salt: &str) -> String {
    let mut hasher = D::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Parameters for deriving new salted hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub algorithm: HashAlgorithm,
    pub salt_bytes: usize,
}

impl Default for HashParams {
    fn default() -> Self {
        HashParams {
            algorithm: HashAlgorithm::default(),
            salt_bytes: DEFAULT_SALT_BYTES,
        }
    }
}

/// Generates `bytes` random bytes from the OS and hex-encodes them.
fn generate_salt(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes.max(MIN_SALT_BYTES)];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Compares two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Legacy credential: the password itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextCredential {
    password: String,
}

impl PlaintextCredential {
    pub fn new(password: &str) -> Self {
        PlaintextCredential {
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for PlaintextCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaintextCredential")
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credential for PlaintextCredential {
    fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(self.password.as_bytes(), candidate.as_bytes())
    }

    fn replace(&mut self, new_password: &str) {
        self.password = new_password.to_string();
    }
}

/// Hardened credential: hex digest of `password ++ salt` plus the hex salt.
///
/// `algorithm` is only written to disk when it is not SHA-256, so files
/// produced with the defaults keep the two-field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltedHashCredential {
    password_hash: String,
    salt: String,
    #[serde(default, skip_serializing_if = "HashAlgorithm::is_default")]
    algorithm: HashAlgorithm,
}

impl SaltedHashCredential {
    /// Derives a credential for `password` under a freshly generated salt.
    pub fn derive(password: &str, params: &HashParams) -> Self {
        let salt = generate_salt(params.salt_bytes);
        SaltedHashCredential {
            password_hash: params.algorithm.hash(password, &salt),
            salt,
            algorithm: params.algorithm,
        }
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Parameters matching this credential, used when it is re-keyed.
    fn params(&self) -> HashParams {
        HashParams {
            algorithm: self.algorithm,
            salt_bytes: self.salt.len() / 2,
        }
    }
}

impl Credential for SaltedHashCredential {
    fn verify(&self, candidate: &str) -> bool {
        let computed = self.algorithm.hash(candidate, &self.salt);
        constant_time_eq(computed.as_bytes(), self.password_hash.as_bytes())
    }

    fn replace(&mut self, new_password: &str) {
        *self = SaltedHashCredential::derive(new_password, &self.params());
    }
}

/// Credential as kept on an account and in the data file.
///
/// Salted records are tried first; a record carrying `password_hash` and
/// `salt` is never read as plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredCredential {
    Salted(SaltedHashCredential),
    Plaintext(PlaintextCredential),
}

impl StoredCredential {
    /// Creates a credential for `password` under the given scheme.
    pub fn new(password: &str, scheme: CredentialScheme, params: &HashParams) -> Self {
        match scheme {
            CredentialScheme::Salted => {
                StoredCredential::Salted(SaltedHashCredential::derive(password, params))
            }
            CredentialScheme::Plaintext => {
                StoredCredential::Plaintext(PlaintextCredential::new(password))
            }
        }
    }

    pub fn scheme(&self) -> CredentialScheme {
        match self {
            StoredCredential::Salted(_) => CredentialScheme::Salted,
            StoredCredential::Plaintext(_) => CredentialScheme::Plaintext,
        }
    }
}

impl Credential for StoredCredential {
    fn verify(&self, candidate: &str) -> bool {
        match self {
            StoredCredential::Salted(c) => c.verify(candidate),
            StoredCredential::Plaintext(c) => c.verify(candidate),
        }
    }

    fn replace(&mut self, new_password: &str) {
        match self {
            StoredCredential::Salted(c) => c.replace(new_password),
            StoredCredential::Plaintext(c) => c.replace(new_password),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_matches_known_digest() {
        // sha256("abc") with an empty salt
        assert_eq!(
            HashAlgorithm::Sha256.hash("abc", ""),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_concatenates_password_and_salt() {
        let algo = HashAlgorithm::Sha256;
        assert_eq!(algo.hash("ab", "c"), algo.hash("abc", ""));
        assert_ne!(algo.hash("abc", "salt"), algo.hash("abc", "other"));
    }

    #[test]
    fn test_sha512_renders_128_hex_chars() {
        let digest = HashAlgorithm::Sha512.hash("abc123", "00ff");
        assert_eq!(digest.len(), 128);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derive_uses_fresh_hex_salt() {
        let params = HashParams::default();
        let a = SaltedHashCredential::derive("abc123", &params);
        let b = SaltedHashCredential::derive("abc123", &params);

        assert_eq!(a.salt().len(), DEFAULT_SALT_BYTES * 2);
        assert!(a.salt().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.password_hash(), b.password_hash());
    }

    #[test]
    fn test_salt_length_is_clamped() {
        let params = HashParams {
            algorithm: HashAlgorithm::Sha256,
            salt_bytes: 2,
        };
        let cred = SaltedHashCredential::derive("pw", &params);
        assert_eq!(cred.salt().len(), MIN_SALT_BYTES * 2);
    }

    #[test]
    fn test_salted_verify() {
        let cred = SaltedHashCredential::derive("abc123", &HashParams::default());
        assert!(cred.verify("abc123"));
        assert!(!cred.verify("abc124"));
        assert!(!cred.verify(""));
    }

    #[test]
    fn test_salted_replace_rekeys_with_same_params() {
        let params = HashParams {
            algorithm: HashAlgorithm::Sha512,
            salt_bytes: 24,
        };
        let mut cred = SaltedHashCredential::derive("abc123", &params);
        let old_salt = cred.salt().to_string();

        cred.replace("xyz789");

        assert_ne!(cred.salt(), old_salt);
        assert_eq!(cred.salt().len(), 48);
        assert_eq!(cred.algorithm(), HashAlgorithm::Sha512);
        assert!(cred.verify("xyz789"));
        assert!(!cred.verify("abc123"));
    }

    #[test]
    fn test_plaintext_verify_and_replace() {
        let mut cred = PlaintextCredential::new("hello123");
        assert!(cred.verify("hello123"));
        assert!(!cred.verify("hello1234"));

        cred.replace("bye");
        assert!(cred.verify("bye"));
        assert!(!cred.verify("hello123"));
    }

    #[test]
    fn test_plaintext_debug_is_redacted() {
        let cred = PlaintextCredential::new("secret999");
        assert!(!format!("{:?}", cred).contains("secret999"));
    }

    #[test]
    fn test_stored_credential_reads_both_layouts() {
        let legacy: StoredCredential = serde_json::from_str(r#"{"password": "bank321"}"#).unwrap();
        assert_eq!(legacy.scheme(), CredentialScheme::Plaintext);
        assert!(legacy.verify("bank321"));

        let salt = "0123456789abcdef";
        let hash = HashAlgorithm::Sha256.hash("bank321", salt);
        let json = format!(r#"{{"password_hash": "{}", "salt": "{}"}}"#, hash, salt);
        let hardened: StoredCredential = serde_json::from_str(&json).unwrap();
        assert_eq!(hardened.scheme(), CredentialScheme::Salted);
        assert!(hardened.verify("bank321"));
    }

    #[test]
    fn test_stored_credential_rejects_incomplete_record() {
        assert!(serde_json::from_str::<StoredCredential>(r#"{"salt": "00"}"#).is_err());
        assert!(serde_json::from_str::<StoredCredential>("{}").is_err());
    }

    #[test]
    fn test_default_algorithm_is_not_written() {
        let cred = StoredCredential::new("pw", CredentialScheme::Salted, &HashParams::default());
        let json = serde_json::to_value(&cred).unwrap();
        assert!(json.get("algorithm").is_none());
        assert!(json.get("password_hash").is_some());
        assert!(json.get("salt").is_some());

        let params = HashParams {
            algorithm: HashAlgorithm::Sha512,
            salt_bytes: DEFAULT_SALT_BYTES,
        };
        let cred = StoredCredential::new("pw", CredentialScheme::Salted, &params);
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(json["algorithm"], "sha512");
    }
}
