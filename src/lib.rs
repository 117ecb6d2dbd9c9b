//! # ATM Console
//!
//! A single-user console ATM. Customers log in with an account number and
//! password, then check their balance, withdraw, deposit or change their
//! password. Accounts live in a JSON file that is read at startup and
//! rewritten on exit.
//!
//! ## Design Principles
//!
//! - **Fixed-point money**: balances use 2 decimal places via `rust_decimal`
//! - **Pluggable credentials**: plaintext and salted-hash schemes share one
//!   [`Credential`] trait, and a data file may mix both
//! - **No hidden exits**: a session returns a [`SessionEnd`]; the caller saves
//!
//! ## Example
//!
//! ```no_run
//! use atm_console::{run_atm, AtmConfig};
//! use std::io;
//!
//! let config = AtmConfig::new("customers.json");
//! run_atm(&config, io::stdin().lock(), io::stdout()).unwrap();
//! ```

pub mod account;
pub mod config;
pub mod credential;
pub mod error;
pub mod money;
pub mod session;
pub mod store;

pub use account::Account;
pub use config::{AtmConfig, DEFAULT_DATA_FILE};
pub use credential::{
    Credential, CredentialScheme, HashAlgorithm, HashParams, PlaintextCredential,
    SaltedHashCredential, StoredCredential,
};
pub use error::{AtmError, Result};
pub use money::Money;
pub use session::{run_atm, MenuChoice, Session, SessionEnd};
pub use store::{AccountStore, LoadOutcome};
