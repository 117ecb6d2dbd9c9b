//! ATM Console CLI
//!
//! An interactive ATM over stdin/stdout. Accounts are kept in a JSON file
//! that is created with sample accounts on first run.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- [customers.json]
//! ```
//!
//! # Environment Variables
//!
//! - `ATM_DATA_FILE`: data file path when none is given on the command line
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use atm_console::credential::MIN_SALT_BYTES;
use atm_console::{run_atm, AtmConfig, CredentialScheme, HashAlgorithm, Result, DEFAULT_DATA_FILE};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;

/// Interactive console ATM
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// JSON file holding the accounts
    #[arg(env = "ATM_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Credential scheme for newly created passwords
    #[arg(long, value_enum, default_value_t = CredentialScheme::Salted)]
    scheme: CredentialScheme,

    /// Digest used for salted passwords
    #[arg(long, value_enum, default_value_t = HashAlgorithm::Sha256)]
    hash_algorithm: HashAlgorithm,

    /// Random salt length in bytes
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u16).range(MIN_SALT_BYTES as i64..))]
    salt_bytes: u16,
}

impl From<Cli> for AtmConfig {
    fn from(cli: Cli) -> Self {
        AtmConfig::new(cli.data_file)
            .with_scheme(cli.scheme)
            .with_hash(cli.hash_algorithm, usize::from(cli.salt_bytes))
    }
}

fn main() {
    env_logger::init();

    let config = AtmConfig::from(Cli::parse());
    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &AtmConfig) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_atm(config, stdin.lock(), stdout.lock())?;
    Ok(())
}
