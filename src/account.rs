//! Customer account model and operations.
//!
//! Balance changes only through [`Account::withdraw`] and [`Account::deposit`];
//! credentials change only through [`Account::change_password`].

use crate::credential::{Credential, CredentialScheme, HashParams, StoredCredential};
use crate::error::{AtmError, Result};
use crate::money::Money;
use log::debug;

/// A customer's account.
///
/// # Negative Balances
///
/// A balance may be negative when the data file says so. No operation can
/// drive it below zero: withdrawals are capped at the current balance, and a
/// withdrawal from an overdrawn account is always rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    account_number: String,
    credential: StoredCredential,
    balance: Money,
}

impl Account {
    /// Opens an account, deriving its credential under `scheme`.
    pub fn create(
        account_number: &str,
        password: &str,
        balance: Money,
        scheme: CredentialScheme,
        params: &HashParams,
    ) -> Self {
        Account {
            account_number: account_number.to_string(),
            credential: StoredCredential::new(password, scheme, params),
            balance,
        }
    }

    /// Rebuilds an account from persisted parts.
    pub fn from_parts(account_number: String, credential: StoredCredential, balance: Money) -> Self {
        Account {
            account_number,
            credential,
            balance,
        }
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn credential(&self) -> &StoredCredential {
        &self.credential
    }

    /// Returns the balance formatted to 2 decimal places.
    pub fn check_balance(&self) -> String {
        self.balance.to_string()
    }

    /// Withdraws `amount` and returns the new balance.
    ///
    /// Fails with `InvalidAmount` for non-positive amounts and
    /// `InsufficientFunds` when `amount` exceeds the balance. The balance is
    /// untouched on failure.
    pub fn withdraw(&mut self, amount: Money) -> Result<Money> {
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(AtmError::InsufficientFunds);
        }

        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(AtmError::BalanceLimitExceeded)?;
        debug!(
            "Withdrew {} from account {}, balance {}",
            amount, self.account_number, self.balance
        );
        Ok(self.balance)
    }

    /// Deposits `amount` and returns the new balance.
    ///
    /// Fails with `BalanceLimitExceeded`, leaving the balance untouched, when
    /// the result would pass [`Money::MAX`].
    pub fn deposit(&mut self, amount: Money) -> Result<Money> {
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount);
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(AtmError::BalanceLimitExceeded)?;
        debug!(
            "Deposited {} to account {}, balance {}",
            amount, self.account_number, self.balance
        );
        Ok(self.balance)
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        self.credential.verify(candidate)
    }

    /// Replaces the password after checking the current one.
    ///
    /// Salted credentials get a new salt. On `IncorrectPassword` the stored
    /// credential is left exactly as it was.
    pub fn change_password(&mut self, old_password: &str, new_password: &str) -> Result<()> {
        if !self.verify_password(old_password) {
            return Err(AtmError::IncorrectPassword);
        }

        self.credential.replace(new_password);
        debug!("Password changed for account {}", self.account_number);
        Ok(())
    }
}
