//! Error types for the ATM.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ATM operations
pub type Result<T> = std::result::Result<T, AtmError>;

/// Errors that can occur while operating the ATM.
///
/// The `Display` text of the transaction-level variants is what the console
/// shows to the customer.
#[derive(Error, Debug)]
pub enum AtmError {
    /// Transaction amount was zero or negative
    #[error("Invalid amount. Please enter a positive number.")]
    InvalidAmount,

    /// Withdrawal larger than the current balance
    #[error("Insufficient funds.")]
    InsufficientFunds,

    /// Deposit would push the balance past the largest supported amount
    #[error("Transaction declined. The balance would exceed the maximum allowed.")]
    BalanceLimitExceeded,

    /// Password did not match the stored credential
    #[error("Incorrect password.")]
    IncorrectPassword,

    /// No account with the given number
    #[error("Account not found.")]
    AccountNotFound(String),

    /// An account with the same number is already in the store
    #[error("Account {0} already exists.")]
    DuplicateAccount(String),

    /// Backing file could not be parsed or a record is incomplete
    #[error("Corrupt account data in {}: {source}", .path.display())]
    DataCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to read or write the backing file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtmError {
    /// Returns `true` for errors that must end the process.
    ///
    /// Everything else is reported to the customer and the session continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AtmError::DataCorrupt { .. } | AtmError::Io(_))
    }
}
