//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use super::{resolve_account, resolve_user, Context};
use crate::display::account::{format_account_details, format_account_list, format_audit_log};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountType, Currency};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new account
    Open {
        /// Account type (checking, savings, retirement)
        #[arg(short = 't', long, default_value = "checking")]
        account_type: String,
        /// ISO 4217 currency code; defaults to the configured currency
        #[arg(short, long)]
        currency: Option<String>,
        /// Account name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List your open accounts
    List,
    /// Show account details and transactions
    Show {
        /// Account name or ID
        account: String,
    },
    /// Rename an account (an empty name clears it)
    Rename {
        /// Account name or ID
        account: String,
        /// New name
        name: String,
    },
    /// Close an account
    Close {
        /// Account name or ID
        account: String,
    },
    /// Add a co-owner to an account
    AddOwner {
        /// Account name or ID
        account: String,
        /// Username, e-mail or ID of the new owner
        user: String,
    },
    /// Show an account's audit trail
    Audit {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(
    ctx: &Context<'_>,
    login: Option<&str>,
    cmd: AccountCommands,
) -> LedgerResult<()> {
    let user = ctx.authenticate(login)?;
    let service = ctx.accounts();

    match cmd {
        AccountCommands::Open {
            account_type,
            currency,
            name,
        } => {
            let account_type = AccountType::parse(&account_type).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: checking, savings, retirement",
                    account_type
                ))
            })?;
            let currency = match currency {
                Some(code) => Currency::parse(&code)
                    .map_err(|e| LedgerError::Validation(e.to_string()))?,
                None => ctx.settings.default_currency,
            };

            let account = service.open(user.id(), account_type, currency, name)?;

            println!("Opened account: {}", account.display_name());
            println!("  Type:     {}", account.account_type());
            println!("  Currency: {}", account.currency());
            println!("  ID:       {}", account.id());
        }

        AccountCommands::List => {
            let accounts = service.accessible_accounts(user.id())?;
            print!("{}", format_account_list(&accounts));
        }

        AccountCommands::Show { account } => {
            let found = resolve_account(&service, &account)?;
            let viewed = service.log_access(user.id(), found.id())?;
            print!("{}", format_account_details(&viewed));
        }

        AccountCommands::Rename { account, name } => {
            let found = resolve_account(&service, &account)?;
            service.rename(user.id(), found.id(), &name)?;
            let renamed = service.get(found.id())?;
            println!("Renamed account: {}", renamed.display_name());
        }

        AccountCommands::Close { account } => {
            let found = resolve_account(&service, &account)?;
            if service.close(user.id(), found.id())? {
                println!("Closed account: {}", found.display_name());
            } else {
                println!("Account already closed: {}", found.display_name());
            }
        }

        AccountCommands::AddOwner {
            account,
            user: new_owner,
        } => {
            let found = resolve_account(&service, &account)?;
            let new_owner = resolve_user(&ctx.users(), &new_owner)?;
            if service.add_owner(user.id(), found.id(), new_owner.id())? {
                println!(
                    "Added {} as owner of {}",
                    new_owner.username(),
                    found.display_name()
                );
            } else {
                println!(
                    "{} already owns {}",
                    new_owner.username(),
                    found.display_name()
                );
            }
        }

        AccountCommands::Audit { account } => {
            let found = resolve_account(&service, &account)?;
            let viewed = service.log_access(user.id(), found.id())?;
            print!("{}", format_audit_log(viewed.audit_log()));
        }
    }

    Ok(())
}
