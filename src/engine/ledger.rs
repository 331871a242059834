//! Portfolio ledger holding the shared NEO and GAS balances.
//!
//! Both trade channels draw from and credit the same two balances. The
//! only mutation path is an exchange, which always debits one asset and
//! credits the other in the same call.

use rust_decimal::Decimal;
use tracing::debug;

use crate::types::{Asset, BotError};

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioLedger {
    neo: Decimal,
    gas: Decimal,
    initial_neo: Decimal,
    initial_gas: Decimal,
}

impl PortfolioLedger {
    pub fn new(initial_neo: Decimal, initial_gas: Decimal) -> Self {
        Self {
            neo: initial_neo,
            gas: initial_gas,
            initial_neo,
            initial_gas,
        }
    }

    pub fn neo(&self) -> Decimal {
        self.neo
    }

    pub fn gas(&self) -> Decimal {
        self.gas
    }

    pub fn balance(&self, asset: Asset) -> Decimal {
        match asset {
            Asset::Neo => self.neo,
            Asset::Gas => self.gas,
        }
    }

    pub fn initial(&self, asset: Asset) -> Decimal {
        match asset {
            Asset::Neo => self.initial_neo,
            Asset::Gas => self.initial_gas,
        }
    }

    /// Current balance minus the starting balance.
    pub fn drift(&self, asset: Asset) -> Decimal {
        self.balance(asset) - self.initial(asset)
    }

    /// Debit `spent` of `spend` and credit `received` of the other asset.
    ///
    /// No funds check: exits always close in full, even if the other
    /// channel has since drawn the balance down. If either new balance
    /// does not fit a `Decimal`, neither balance changes.
    pub fn exchange(
        &mut self,
        spend: Asset,
        spent: Decimal,
        received: Decimal,
    ) -> Result<(), BotError> {
        let credit = spend.other();
        let debited = self.balance(spend).checked_sub(spent).ok_or_else(|| {
            BotError::overflow(format!("debiting {spent} {spend} from {}", self.balance(spend)))
        })?;
        let credited = self.balance(credit).checked_add(received).ok_or_else(|| {
            BotError::overflow(format!("crediting {received} {credit} to {}", self.balance(credit)))
        })?;

        match spend {
            Asset::Neo => (self.neo, self.gas) = (debited, credited),
            Asset::Gas => (self.gas, self.neo) = (debited, credited),
        }
        debug!(
            spend = %spend,
            spent = %spent,
            received = %received,
            neo = %self.neo,
            gas = %self.gas,
            "Ledger exchange"
        );
        Ok(())
    }

    /// Like `exchange`, but fails without touching either balance when
    /// fewer than `spent` units of `spend` are available.
    pub fn try_exchange(
        &mut self,
        spend: Asset,
        spent: Decimal,
        received: Decimal,
    ) -> Result<(), BotError> {
        let available = self.balance(spend);
        if available < spent {
            return Err(BotError::InsufficientFunds {
                asset: spend,
                needed: spent,
                available,
            });
        }
        self.exchange(spend, spent, received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_ledger() {
        let ledger = PortfolioLedger::new(dec!(10000), dec!(100000));
        assert_eq!(ledger.neo(), dec!(10000));
        assert_eq!(ledger.gas(), dec!(100000));
        assert_eq!(ledger.drift(Asset::Neo), Decimal::ZERO);
        assert_eq!(ledger.drift(Asset::Gas), Decimal::ZERO);
    }

    #[test]
    fn test_exchange_moves_both_balances() {
        let mut ledger = PortfolioLedger::new(dec!(10000), dec!(100000));
        ledger.exchange(Asset::Neo, dec!(3000), dec!(10000)).unwrap();
        assert_eq!(ledger.neo(), dec!(7000));
        assert_eq!(ledger.gas(), dec!(110000));
        assert_eq!(ledger.drift(Asset::Neo), dec!(-3000));
        assert_eq!(ledger.drift(Asset::Gas), dec!(10000));
    }

    #[test]
    fn test_exchange_allows_overdraw() {
        let mut ledger = PortfolioLedger::new(dec!(0), dec!(50));
        ledger.exchange(Asset::Gas, dec!(100), dec!(30)).unwrap();
        assert_eq!(ledger.gas(), dec!(-50));
        assert_eq!(ledger.neo(), dec!(30));
    }

    #[test]
    fn test_try_exchange_insufficient_is_noop() {
        let mut ledger = PortfolioLedger::new(dec!(100), dec!(100000));
        let before = ledger.clone();
        let err = ledger.try_exchange(Asset::Neo, dec!(3000), dec!(10000)).unwrap_err();
        assert_eq!(
            err,
            BotError::InsufficientFunds {
                asset: Asset::Neo,
                needed: dec!(3000),
                available: dec!(100),
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_exchange_overflow_leaves_balances() {
        let mut ledger = PortfolioLedger::new(dec!(10000), Decimal::MAX);
        let before = ledger.clone();
        let err = ledger.exchange(Asset::Neo, dec!(3000), dec!(1)).unwrap_err();
        assert!(matches!(err, BotError::Overflow(_)));
        assert_eq!(ledger, before);

        let err = ledger.try_exchange(Asset::Neo, dec!(3000), dec!(1)).unwrap_err();
        assert!(matches!(err, BotError::Overflow(_)));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_try_exchange_exact_balance_succeeds() {
        let mut ledger = PortfolioLedger::new(dec!(3000), dec!(0));
        ledger.try_exchange(Asset::Neo, dec!(3000), dec!(10000)).unwrap();
        assert_eq!(ledger.neo(), Decimal::ZERO);
        assert_eq!(ledger.gas(), dec!(10000));
    }
}
