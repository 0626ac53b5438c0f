//! Account display formatting
//!
//! Formats accounts, their history and their audit trail for terminal output.

use crate::audit::AuditLog;
use crate::models::{Account, Direction};

/// Format a list of accounts as a table
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| a.display_name().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<10}  {:>16}  {:<6}  {}\n",
        "Name",
        "Type",
        "Balance",
        "Joint",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<10}  {:->16}  {:-<6}  {:-<36}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for account in accounts {
        output.push_str(&format!(
            "{:<name_width$}  {:<10}  {:>16}  {:<6}  {}\n",
            account.display_name(),
            account.account_type().to_string(),
            account.balance().to_string(),
            if account.is_joint() { "Yes" } else { "" },
            account.id(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single account with its transaction history
pub fn format_account_details(account: &Account) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.display_name()));
    output.push_str(&format!("  Type:     {}\n", account.account_type()));
    output.push_str(&format!("  ID:       {}\n", account.id()));
    output.push_str(&format!("  Balance:  {}\n", account.balance()));
    output.push_str(&format!("  Owners:   {}\n", account.owners().len()));
    if account.is_closed() {
        output.push_str("  Status:   Closed\n");
    }

    output.push('\n');
    if account.transactions().is_empty() {
        output.push_str("  No transactions.\n");
        return output;
    }

    output.push_str("  Transactions:\n");
    for tx in account.transactions().iter().rev() {
        let (arrow, sign) = match tx.direction() {
            Direction::Incoming => ("from", "+"),
            Direction::Outgoing => ("to  ", "-"),
        };
        output.push_str(&format!(
            "    {}  {}{:>15}  {} {}\n",
            tx.timestamp().format("%Y-%m-%d %H:%M:%S"),
            sign,
            tx.money().to_string(),
            arrow,
            tx.counterparty().short(),
        ));
    }

    output
}

/// Format an audit trail, newest event first
pub fn format_audit_log(log: &AuditLog) -> String {
    if log.is_empty() {
        return "No audit events.".to_string();
    }

    let mut output = String::new();
    for event in log.newest_first() {
        output.push_str(&format!(
            "{}  {:<12}  {}",
            event.timestamp().format("%Y-%m-%d %H:%M:%S"),
            event.kind().to_string(),
            event.actor().short(),
        ));
        if let Some(detail) = event.detail() {
            output.push_str(&format!("  {}", detail));
        }
        output.push('\n');
    }
    output
}
