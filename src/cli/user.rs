//! User CLI commands

use clap::Subcommand;

use super::{read_password, Context};
use crate::display::user::format_user_list;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::SearchOutcome;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Login name
        username: String,
        /// E-mail address
        #[arg(short, long)]
        email: String,
        /// First name
        #[arg(long)]
        name: String,
        /// Last name
        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// Search users by ID, login or name
    Search {
        query: String,
    },
    /// Set or clear your preferred locale
    Locale {
        /// Locale tag such as "cs" or "en-GB"; omit to clear
        locale: Option<String>,
    },
}

/// Handle a user command
pub fn handle_user_command(
    ctx: &Context<'_>,
    login: Option<&str>,
    cmd: UserCommands,
) -> LedgerResult<()> {
    let service = ctx.users();

    match cmd {
        UserCommands::Register {
            username,
            email,
            name,
            last_name,
        } => {
            let password = read_password(&format!("Password for {}: ", username), true)?;
            let user = service.register(&username, &email, &name, &last_name, &password)?;
            println!("Registered user: {}", user.username());
            println!("  Name: {}", user.full_name());
            println!("  ID:   {}", user.id());
        }

        UserCommands::Search { query } => {
            ctx.authenticate(login)?;
            match service.search(&query) {
                SearchOutcome::NoQuery => {
                    return Err(LedgerError::Validation("Search query cannot be empty".into()))
                }
                SearchOutcome::NoMatch => println!("No users found."),
                SearchOutcome::Matches(users) => print!("{}", format_user_list(&users)),
            }
        }

        UserCommands::Locale { locale } => {
            let user = ctx.authenticate(login)?;
            service.set_preferred_locale(user.id(), locale.as_deref())?;
            match locale {
                Some(locale) => println!("Preferred locale set to {}", locale),
                None => println!("Preferred locale cleared"),
            }
        }
    }

    Ok(())
}
