//! Interactive console session.
//!
//! A [`Session`] reads line-oriented input and drives an [`AccountStore`].
//! It never persists anything itself: it returns a [`SessionEnd`] and the
//! caller saves the store. [`run_atm`] wires load, session and save together.

use crate::account::Account;
use crate::config::AtmConfig;
use crate::error::{AtmError, Result};
use crate::money::Money;
use crate::store::{AccountStore, LoadOutcome};
use log::{debug, info};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Input that ends the session at the account prompt.
pub const EXIT_SENTINEL: &str = "-1";

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The customer entered the exit sentinel.
    Exit,
    /// Input was closed.
    EndOfInput,
}

/// Result of the login prompt loop.
enum Login {
    Authenticated(String),
    Ended(SessionEnd),
}

/// One of the four actions offered after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CheckBalance,
    Withdraw,
    Deposit,
    ChangePassword,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 4] = [
        MenuChoice::CheckBalance,
        MenuChoice::Withdraw,
        MenuChoice::Deposit,
        MenuChoice::ChangePassword,
    ];

    /// Parses the number typed at the menu prompt.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::CheckBalance),
            "2" => Some(MenuChoice::Withdraw),
            "3" => Some(MenuChoice::Deposit),
            "4" => Some(MenuChoice::ChangePassword),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            MenuChoice::CheckBalance => "1",
            MenuChoice::Withdraw => "2",
            MenuChoice::Deposit => "3",
            MenuChoice::ChangePassword => "4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::CheckBalance => "Check Balance",
            MenuChoice::Withdraw => "Withdraw Cash",
            MenuChoice::Deposit => "Deposit Cash",
            MenuChoice::ChangePassword => "Change Password",
        }
    }
}

/// Console session over a borrowed store.
pub struct Session<'a, R, W> {
    store: &'a mut AccountStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(store: &'a mut AccountStore, input: R, output: W) -> Self {
        Session {
            store,
            input,
            output,
        }
    }

    /// Runs login and one menu action per login until the customer exits or
    /// input runs out.
    ///
    /// Transaction errors are shown to the customer and the loop goes on;
    /// only I/O failures are returned.
    pub fn run(&mut self) -> Result<SessionEnd> {
        loop {
            let account_number = match self.authenticate_user()? {
                Login::Authenticated(number) => number,
                Login::Ended(end) => return Ok(end),
            };
            if let Some(end) = self.menu(&account_number)? {
                return Ok(end);
            }
        }
    }

    /// Prompts until a login succeeds or the session ends.
    fn authenticate_user(&mut self) -> Result<Login> {
        loop {
            let Some(account_number) =
                self.prompt("Enter your account number (or -1 to exit): ")?
            else {
                return Ok(Login::Ended(SessionEnd::EndOfInput));
            };

            if account_number == EXIT_SENTINEL {
                self.say("Exiting ATM...")?;
                return Ok(Login::Ended(SessionEnd::Exit));
            }

            if !self.store.contains(&account_number) {
                self.say("Account not found. Try again.")?;
                continue;
            }

            let Some(password) = self.prompt("Enter your password: ")? else {
                return Ok(Login::Ended(SessionEnd::EndOfInput));
            };

            let verified = self.store.authenticate(&account_number, &password).map(|_| ());
            match verified {
                Ok(()) => {
                    self.say("Login successful!\n")?;
                    return Ok(Login::Authenticated(account_number));
                }
                Err(AtmError::IncorrectPassword) => self.say("Incorrect password. Try again.")?,
                Err(e) if !e.is_fatal() => self.say(&format!("{} Try again.", e))?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Shows the menu and performs exactly one action.
    fn menu(&mut self, account_number: &str) -> Result<Option<SessionEnd>> {
        self.say("\nATM Menu:")?;
        for choice in MenuChoice::ALL {
            self.say(&format!("{}. {}", choice.key(), choice.label()))?;
        }

        let Some(input) = self.prompt("Choose an option: ")? else {
            return Ok(Some(SessionEnd::EndOfInput));
        };

        let Some(choice) = MenuChoice::parse(&input) else {
            self.say("Invalid choice. Please select a valid option.")?;
            return Ok(None);
        };
        debug!("Account {} chose {:?}", account_number, choice);

        let outcome = match choice {
            MenuChoice::CheckBalance => {
                let balance = self.account(account_number)?.check_balance();
                Ok(format!("Your current balance is: ${}", balance))
            }
            MenuChoice::Withdraw => {
                let Some(amount) = self.read_amount("Enter amount to withdraw: ")? else {
                    return Ok(Some(SessionEnd::EndOfInput));
                };
                self.account(account_number)?
                    .withdraw(amount)
                    .map(|balance| format!("Withdrawal successful. New balance: ${}", balance))
            }
            MenuChoice::Deposit => {
                let Some(amount) = self.read_amount("Enter amount to deposit: ")? else {
                    return Ok(Some(SessionEnd::EndOfInput));
                };
                self.account(account_number)?
                    .deposit(amount)
                    .map(|balance| format!("Deposit successful. New balance: ${}", balance))
            }
            MenuChoice::ChangePassword => {
                let Some(old_password) = self.prompt("Enter your current password: ")? else {
                    return Ok(Some(SessionEnd::EndOfInput));
                };
                let Some(new_password) = self.prompt("Enter your new password: ")? else {
                    return Ok(Some(SessionEnd::EndOfInput));
                };
                self.account(account_number)?
                    .change_password(&old_password, &new_password)
                    .map(|()| "Password changed successfully.".to_string())
            }
        };

        match outcome {
            Ok(message) => self.say(&message)?,
            Err(e) if !e.is_fatal() => self.say(&e.to_string())?,
            Err(e) => return Err(e),
        }
        Ok(None)
    }

    fn account(&mut self, account_number: &str) -> Result<&mut Account> {
        self.store
            .get_mut(account_number)
            .ok_or_else(|| AtmError::AccountNotFound(account_number.to_string()))
    }

    /// Prompts until a positive amount is entered. `None` on end of input.
    fn read_amount(&mut self, prompt: &str) -> Result<Option<Money>> {
        loop {
            let Some(line) = self.prompt(prompt)? else {
                return Ok(None);
            };
            match Money::from_str(&line) {
                Ok(amount) if amount.is_positive() => return Ok(Some(amount)),
                Ok(_) => self.say("Please enter a positive amount.")?,
                Err(rust_decimal::Error::ExceedsMaximumPossibleValue) => self.say(&format!(
                    "Amount too large. The maximum is {}.",
                    Money::MAX
                ))?,
                Err(_) => self.say("Invalid input. Please enter a numerical value.")?,
            }
        }
    }

    /// Writes `text` without a newline and reads one trimmed line.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

/// Loads the store named by `config`, runs a session, then saves.
///
/// The store is saved whether the session ended with the exit sentinel or
/// with closed input.
pub fn run_atm<R: BufRead, W: Write>(config: &AtmConfig, input: R, mut output: W) -> Result<SessionEnd> {
    let mut store = AccountStore::from_config(config);
    if let LoadOutcome::Generated(_) = store.load(&config.data_path)? {
        writeln!(output, "Sample accounts created.")?;
    }

    let end = Session::new(&mut store, input, &mut output).run()?;

    store.save(&config.data_path)?;
    info!(
        "Session ended ({:?}), saved {} accounts to {}",
        end,
        store.len(),
        config.data_path.display()
    );
    Ok(end)
}
