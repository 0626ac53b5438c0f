//! CLI command handler for account transfers
//!
//! Resolves both accounts, collects owner confirmations when asked to, and
//! prints the receipt.

use super::{resolve_account, Context};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Amount, Authorization};
use crate::services::TransferService;

/// Handle the transfer command
pub fn handle_transfer_command(
    ctx: &Context<'_>,
    login: Option<&str>,
    from: &str,
    to: &str,
    amount: &str,
    confirmations: &[String],
) -> LedgerResult<()> {
    let user = ctx.authenticate(login)?;
    let accounts = ctx.accounts();

    let from_account = resolve_account(&accounts, from)?;
    let to_account = resolve_account(&accounts, to)?;

    let amount = Amount::parse(amount).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount format: '{}'. Use format like '100.00' or '100'. Error: {}",
            amount, e
        ))
    })?;

    let mut authorization = Authorization::new(user.id());
    for login in confirmations {
        let confirmer = ctx.confirm(login)?;
        authorization = authorization.confirmed_by(confirmer.id());
    }

    let receipt = TransferService::new(ctx.storage, ctx.settings, ctx.converter).transfer(
        from_account.id(),
        to_account.id(),
        amount,
        authorization,
    )?;

    println!("Transfer completed:");
    println!("  From: {} (-{})", from_account.display_name(), receipt.debited);
    println!("  To:   {} (+{})", to_account.display_name(), receipt.credited);
    println!("  Fee:  {}", receipt.fee);

    Ok(())
}
