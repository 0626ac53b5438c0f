use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use bank_ledger::auth::{Argon2Hasher, LoginGuard};
use bank_ledger::cli::{
    handle_account_command, handle_transfer_command, handle_user_command, Context,
};
use bank_ledger::config::{LedgerPaths, Settings};
use bank_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "bank",
    version,
    about = "Single-process banking ledger",
    long_about = "A banking ledger that keeps accounts, fee-aware transfers and a \
                  per-account audit trail in plain JSON files."
)]
struct Cli {
    /// Directory holding config.json and data/
    #[arg(long, global = true, env = "BANK_LEDGER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Username or e-mail to act as
    #[arg(short, long, global = true, env = "BANK_LOGIN")]
    login: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    #[command(subcommand)]
    User(bank_ledger::cli::UserCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(bank_ledger::cli::AccountCommands),

    /// Transfer funds between accounts
    Transfer {
        /// Source account name or ID
        from: String,
        /// Destination account name or ID
        to: String,
        /// Amount in the source account's currency (e.g. "100.00")
        amount: String,
        /// Login of a co-owner confirming the transfer; repeatable
        #[arg(long = "confirm")]
        confirmations: Vec<String>,
    },

    /// Initialize the ledger directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    bank_ledger::logging::init(&settings.log_filter);

    let hasher = Argon2Hasher::new();
    let storage = Storage::open(paths.clone(), &settings, &hasher)?;
    let converter = settings.converter();
    let guard = LoginGuard::new(settings.max_login_tries, settings.login_timeout());

    let ctx = Context {
        storage: &storage,
        settings: &settings,
        converter: &converter,
        hasher: &hasher,
        guard: &guard,
    };
    let login = cli.login.as_deref();

    match cli.command {
        Some(Commands::User(cmd)) => handle_user_command(&ctx, login, cmd)?,
        Some(Commands::Account(cmd)) => handle_account_command(&ctx, login, cmd)?,
        Some(Commands::Transfer {
            from,
            to,
            amount,
            confirmations,
        }) => handle_transfer_command(&ctx, login, &from, &to, &amount, &confirmations)?,
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!("Ledger already initialized at: {}", paths.base_dir().display());
            } else {
                settings.save(&paths)?;
                println!("Initialized ledger at: {}", paths.base_dir().display());
            }
            println!();
            println!(
                "Users: {}, accounts: {}",
                storage.users.count(),
                storage.accounts.count()
            );
            println!("Log in with '--login admin' to get started.");
        }
        Some(Commands::Config) => {
            println!("Bank Ledger Configuration");
            println!("=========================");
            println!("Config file:    {}", paths.settings_file().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Transaction fee:      {}", settings.transaction_fee);
            println!("  Base currency:        {}", settings.base_currency);
            println!("  Default currency:     {}", settings.default_currency);
            println!("  Joint account policy: {:?}", settings.joint_account_policy);
            println!("  Account order:        {:?}", settings.account_order);
            println!("  Max accounts/user:    {}", settings.max_accounts_per_user);
            println!("  Search threshold:     {}", settings.search_threshold);
        }
        None => {
            println!("Bank Ledger");
            println!();
            println!("Run 'bank --help' for usage information.");
        }
    }

    Ok(())
}
