//! Account store and its JSON backing file.
//!
//! The whole file is read once by [`AccountStore::load`] and rewritten
//! wholesale by [`AccountStore::save`]. Changes made in between live only in
//! memory until the next save.

use crate::account::Account;
use crate::config::AtmConfig;
use crate::credential::{CredentialScheme, HashParams, StoredCredential};
use crate::error::{AtmError, Result};
use crate::money::Money;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Demonstration accounts written when no data file exists:
/// `(account number, password, balance in cents)`.
const SAMPLE_ACCOUNTS: [(&str, &str, i64); 10] = [
    ("1001", "DekelVaknin1", 500_000),
    ("1002", "AviBitter456", 250_050),
    ("1003", "password111", -20_000),
    ("1004", "hello123", 1_500_075),
    ("1005", "bank321", 10_000),
    ("1006", "rabbi770", 75_025),
    ("1007", "secure999", -50_000),
    ("1008", "easymoney23", 220_000),
    ("1009", "lukaLebron123", 0),
    ("1010", "MessiRonaldo710", 980_000),
];

/// One account as it appears in the data file, keyed by account number.
#[derive(Debug, Serialize, Deserialize)]
struct AccountRecord {
    #[serde(flatten)]
    credential: StoredCredential,
    balance: Money,
}

/// What [`AccountStore::load`] found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Accounts were read from an existing file.
    Loaded(usize),
    /// No file existed; the sample accounts were created and saved.
    Generated(usize),
}

/// In-memory collection of accounts, ordered by account number.
#[derive(Debug)]
pub struct AccountStore {
    accounts: BTreeMap<String, Account>,
    scheme: CredentialScheme,
    params: HashParams,
}

impl AccountStore {
    /// Creates an empty store that derives new credentials under `scheme`.
    pub fn new(scheme: CredentialScheme, params: HashParams) -> Self {
        AccountStore {
            accounts: BTreeMap::new(),
            scheme,
            params,
        }
    }

    pub fn from_config(config: &AtmConfig) -> Self {
        Self::new(config.scheme, config.hash)
    }

    /// Replaces the store contents with the accounts in `path`.
    ///
    /// A missing file is not an error: the sample accounts are generated and
    /// written there first.
    pub fn load(&mut self, path: &Path) -> Result<LoadOutcome> {
        if !path.exists() {
            self.generate_sample_accounts(path)?;
            return Ok(LoadOutcome::Generated(self.accounts.len()));
        }

        let contents = fs::read_to_string(path)?;
        let records: BTreeMap<String, AccountRecord> =
            serde_json::from_str(&contents).map_err(|source| AtmError::DataCorrupt {
                path: path.to_path_buf(),
                source,
            })?;

        self.accounts = records
            .into_iter()
            .map(|(number, record)| {
                let account = Account::from_parts(number.clone(), record.credential, record.balance);
                (number, account)
            })
            .collect();

        debug!("Loaded {} accounts from {}", self.accounts.len(), path.display());
        Ok(LoadOutcome::Loaded(self.accounts.len()))
    }

    /// Writes every account to `path`, replacing its contents.
    pub fn save(&self, path: &Path) -> Result<()> {
        let records: BTreeMap<&str, AccountRecord> = self
            .accounts
            .values()
            .map(|account| {
                let record = AccountRecord {
                    credential: account.credential().clone(),
                    balance: account.balance(),
                };
                (account.account_number(), record)
            })
            .collect();

        let mut writer = BufWriter::new(File::create(path)?);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        records.serialize(&mut serializer).map_err(io::Error::from)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        debug!("Saved {} accounts to {}", self.accounts.len(), path.display());
        Ok(())
    }

    /// Looks up `account_number` and checks `password` against it.
    pub fn authenticate(&mut self, account_number: &str, password: &str) -> Result<&mut Account> {
        let account = self
            .accounts
            .get_mut(account_number)
            .ok_or_else(|| AtmError::AccountNotFound(account_number.to_string()))?;

        if !account.verify_password(password) {
            warn!("Failed login for account {}", account_number);
            return Err(AtmError::IncorrectPassword);
        }

        debug!("Account {} authenticated", account_number);
        Ok(account)
    }

    /// Replaces the store contents with the demonstration accounts and
    /// writes them to `path`.
    pub fn generate_sample_accounts(&mut self, path: &Path) -> Result<()> {
        self.accounts = SAMPLE_ACCOUNTS
            .iter()
            .map(|&(number, password, cents)| {
                let account = Account::create(
                    number,
                    password,
                    Money::from_cents(cents),
                    self.scheme,
                    &self.params,
                );
                (number.to_string(), account)
            })
            .collect();

        self.save(path)?;
        info!(
            "Created {} sample accounts in {}",
            self.accounts.len(),
            path.display()
        );
        Ok(())
    }

    /// Opens a new account under the store's credential scheme.
    pub fn open_account(&mut self, account_number: &str, password: &str, balance: Money) -> Result<()> {
        let account = Account::create(account_number, password, balance, self.scheme, &self.params);
        self.add_account(account)
    }

    /// Inserts `account`, refusing to overwrite an existing account number.
    pub fn add_account(&mut self, account: Account) -> Result<()> {
        if self.accounts.contains_key(account.account_number()) {
            return Err(AtmError::DuplicateAccount(account.account_number().to_string()));
        }
        self.accounts
            .insert(account.account_number().to_string(), account);
        Ok(())
    }

    pub fn contains(&self, account_number: &str) -> bool {
        self.accounts.contains_key(account_number)
    }

    pub fn get(&self, account_number: &str) -> Option<&Account> {
        self.accounts.get(account_number)
    }

    pub fn get_mut(&mut self, account_number: &str) -> Option<&mut Account> {
        self.accounts.get_mut(account_number)
    }

    /// Account numbers in ascending order.
    pub fn account_numbers(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new(CredentialScheme::default(), HashParams::default())
    }
}
