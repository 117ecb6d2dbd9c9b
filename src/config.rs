//! Runtime configuration.

use crate::credential::{CredentialScheme, HashAlgorithm, HashParams, DEFAULT_SALT_BYTES};
use std::path::PathBuf;

/// Data file used when no path is given.
pub const DEFAULT_DATA_FILE: &str = "customers.json";

/// Settings the binary resolves from its arguments and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtmConfig {
    /// JSON file holding the accounts.
    pub data_path: PathBuf,

    /// Scheme for credentials created by this process.
    pub scheme: CredentialScheme,

    /// Digest and salt length for new salted credentials.
    pub hash: HashParams,
}

impl AtmConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        AtmConfig {
            data_path: data_path.into(),
            ..Default::default()
        }
    }

    pub fn with_scheme(mut self, scheme: CredentialScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_hash(mut self, algorithm: HashAlgorithm, salt_bytes: usize) -> Self {
        self.hash = HashParams {
            algorithm,
            salt_bytes,
        };
        self
    }
}

impl Default for AtmConfig {
    fn default() -> Self {
        AtmConfig {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            scheme: CredentialScheme::default(),
            hash: HashParams {
                algorithm: HashAlgorithm::default(),
                salt_bytes: DEFAULT_SALT_BYTES,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AtmConfig::default();
        assert_eq!(config.data_path, PathBuf::from("customers.json"));
        assert_eq!(config.scheme, CredentialScheme::Salted);
        assert_eq!(config.hash.algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.hash.salt_bytes, 16);
    }

    #[test]
    fn test_builders() {
        let config = AtmConfig::new("/tmp/bank.json")
            .with_scheme(CredentialScheme::Plaintext)
            .with_hash(HashAlgorithm::Sha512, 32);

        assert_eq!(config.data_path, PathBuf::from("/tmp/bank.json"));
        assert_eq!(config.scheme, CredentialScheme::Plaintext);
        assert_eq!(config.hash.algorithm, HashAlgorithm::Sha512);
        assert_eq!(config.hash.salt_bytes, 32);
    }
}
