//! Transfer service
//!
//! Moves funds between two accounts. Both accounts are locked together and
//! the transfer is authorized on snapshots; the result only becomes visible
//! once both account files are written.

use crate::config::Settings;
use crate::conversion::ConversionService;
use crate::error::{LedgerResult, TransferError};
use crate::models::{AccountId, Amount, Authorization, TransferReceipt};
use crate::storage::Storage;

/// Service for transfers between accounts
pub struct TransferService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
    converter: &'a dyn ConversionService,
}

impl<'a> TransferService<'a> {
    pub fn new(
        storage: &'a Storage,
        settings: &'a Settings,
        converter: &'a dyn ConversionService,
    ) -> Self {
        Self {
            storage,
            settings,
            converter,
        }
    }

    /// Transfer `amount`, expressed in the sender's currency, from `from` to `to`
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        authorization: impl Into<Authorization>,
    ) -> LedgerResult<TransferReceipt> {
        if from == to {
            return Err(TransferError::SameAccount.into());
        }

        let authorization = authorization.into();
        let initiator = authorization.initiator;
        let policy = self.settings.transfer_policy();

        let result = self.storage.accounts.update_pair(from, to, |sender, receiver| {
            sender.authorize_transfer(amount, receiver, authorization, &policy, self.converter)
        });

        match &result {
            Ok(receipt) => tracing::info!(
                %from,
                %to,
                by = %initiator,
                debited = %receipt.debited,
                credited = %receipt.credited,
                "transfer completed"
            ),
            Err(err) if err.is_business_rule() => {
                tracing::warn!(%from, %to, by = %initiator, reason = %err, "transfer rejected")
            }
            Err(err) => tracing::error!(%from, %to, error = %err, "transfer failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::models::{Currency, Direction, JointAccountPolicy};
    use crate::services::test_support::Fixture;

    #[test]
    fn test_transfer_with_fee() {
        let fx = Fixture::new();
        let from = fx.funded(fx.admin, Currency::CZK, 100_000);
        let to = fx.funded(fx.admin, Currency::CZK, 0);

        let receipt = fx
            .transfers()
            .transfer(from, to, Amount::from_minor(10_000), fx.admin)
            .unwrap();
        assert_eq!(receipt.fee.to_string(), "10.00 CZK");

        let reopened = fx.reopen();
        let sender = reopened.accounts.get(from).unwrap().unwrap();
        let receiver = reopened.accounts.get(to).unwrap().unwrap();
        assert_eq!(sender.balance().to_string(), "890.00 CZK");
        assert_eq!(receiver.balance().to_string(), "100.00 CZK");
        assert_eq!(sender.transactions()[0].direction(), Direction::Outgoing);
        assert_eq!(receiver.transactions()[0].direction(), Direction::Incoming);
    }

    #[test]
    fn test_insufficient_funds_leaves_files_untouched() {
        let fx = Fixture::new();
        let from = fx.funded(fx.admin, Currency::CZK, 100_000);
        let to = fx.funded(fx.admin, Currency::CZK, 0);

        let err = fx
            .transfers()
            .transfer(from, to, Amount::from_minor(99_500), fx.admin)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transfer(TransferError::InsufficientFunds { .. })
        ));
        assert!(err.is_business_rule());

        let reopened = fx.reopen();
        let sender = reopened.accounts.get(from).unwrap().unwrap();
        assert_eq!(sender.balance().amount(), Amount::from_minor(100_000));
        assert!(sender.transactions().is_empty());
    }

    #[test]
    fn test_same_account() {
        let fx = Fixture::new();
        let from = fx.funded(fx.admin, Currency::CZK, 100_000);
        let err = fx
            .transfers()
            .transfer(from, from, Amount::from_minor(100), fx.admin)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Transfer(TransferError::SameAccount)));
    }

    #[test]
    fn test_unknown_account() {
        let fx = Fixture::new();
        let from = fx.funded(fx.admin, Currency::CZK, 100_000);
        let err = fx
            .transfers()
            .transfer(from, AccountId::new(), Amount::from_minor(100), fx.admin)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cross_currency() {
        let fx = Fixture::new();
        let from = fx.funded(fx.admin, Currency::EUR, 10_000);
        let to = fx.funded(fx.admin, Currency::CZK, 0);

        let receipt = fx
            .transfers()
            .transfer(from, to, Amount::from_minor(1_000), fx.admin)
            .unwrap();
        // 10 CZK fee is 0.40 EUR; 10 EUR arrive as 250 CZK
        assert_eq!(receipt.debited.to_string(), "10.40 EUR");
        assert_eq!(receipt.credited.to_string(), "250.00 CZK");
    }

    #[test]
    fn test_joint_policy_from_settings() {
        let mut fx = Fixture::new();
        fx.settings.joint_account_policy = JointAccountPolicy::AllOwners;
        let partner = fx.add_user("jsmith", "John", "Smith");
        let from = fx.funded(fx.admin, Currency::CZK, 100_000);
        let to = fx.funded(partner, Currency::CZK, 0);
        fx.accounts().add_owner(fx.admin, from, partner).unwrap();

        let err = fx
            .transfers()
            .transfer(from, to, Amount::from_minor(100), fx.admin)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transfer(TransferError::ConfirmationRequired { .. })
        ));

        fx.transfers()
            .transfer(
                from,
                to,
                Amount::from_minor(100),
                Authorization::new(fx.admin).confirmed_by(partner),
            )
            .unwrap();
    }
}
