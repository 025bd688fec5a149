//! # Customer Tab
//!
//! Customers and their running tabs. An "em aberto" sale
//! ([`PaymentMethod::OnAccount`]) does not settle at the register; it
//! lands on the customer's tab and is paid down later. The tab also
//! accumulates lifetime purchase totals for the summary screen.
//!
//! Persistence of customers is out of scope; this is the in-memory
//! record the session works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::ticket::Settlement;
use crate::types::PaymentMethod;

/// A customer with a running tab.
///
/// ## Tab Math
/// ```text
/// record_sale(on_account, ...) ──► open_balance += sale total
/// record_sale(any method, ...) ──► purchase totals += units, total
/// record_payment(amount)       ──► open_balance −= amount (floor 0)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerTab {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Customer display name.
    pub name: String,

    /// Contact phone, if known.
    pub phone: Option<String>,

    /// Lifetime units bought, any payment method.
    pub units_bought: i64,

    /// Lifetime purchase value in centavos, any payment method.
    pub purchases_total_cents: i64,

    /// Outstanding "em aberto" balance in centavos.
    pub open_balance_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CustomerTab {
    /// Creates a fresh tab for a customer.
    pub fn new(name: &str) -> Self {
        CustomerTab {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: None,
            units_bought: 0,
            purchases_total_cents: 0,
            open_balance_cents: 0,
            created_at: Utc::now(),
        }
    }

    /// Records a settled sale against this customer.
    ///
    /// Every method counts toward the purchase totals; only
    /// [`PaymentMethod::OnAccount`] raises the open balance.
    pub fn record_sale(&mut self, method: PaymentMethod, units: i64, settlement: &Settlement) {
        self.units_bought += units.max(0);
        self.purchases_total_cents += settlement.total_cents;
        if matches!(method, PaymentMethod::OnAccount) {
            self.open_balance_cents += settlement.total_cents;
        }
    }

    /// Pays the open balance down, returning what remains.
    ///
    /// Overpayment floors the balance at zero; the excess goes back to
    /// the customer as cash, it is never stored as credit.
    pub fn record_payment(&mut self, amount: Money) -> CoreResult<Money> {
        if !amount.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "payment amount".to_string(),
            }
            .into());
        }
        self.open_balance_cents = (self.open_balance_cents - amount.cents()).max(0);
        Ok(self.open_balance())
    }

    /// Outstanding balance as Money.
    #[inline]
    pub fn open_balance(&self) -> Money {
        Money::from_cents(self.open_balance_cents)
    }

    /// Whether the customer currently owes anything.
    #[inline]
    pub fn has_debt(&self) -> bool {
        self.open_balance_cents > 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn settlement(total_cents: i64) -> Settlement {
        Settlement {
            total_cents,
            change_cents: None,
            balance_due_cents: 0,
            paid: false,
        }
    }

    #[test]
    fn test_on_account_sale_raises_balance() {
        let mut tab = CustomerTab::new("João");
        tab.record_sale(PaymentMethod::OnAccount, 3, &settlement(2500));

        assert_eq!(tab.open_balance(), Money::from_cents(2500));
        assert!(tab.has_debt());
        assert_eq!(tab.units_bought, 3);
        assert_eq!(tab.purchases_total_cents, 2500);
    }

    #[test]
    fn test_cash_sale_counts_purchases_only() {
        let mut tab = CustomerTab::new("João");
        tab.record_sale(PaymentMethod::Cash, 2, &settlement(700));

        assert!(!tab.has_debt());
        assert_eq!(tab.purchases_total_cents, 700);
        assert_eq!(tab.units_bought, 2);
    }

    #[test]
    fn test_payment_pays_down_and_floors_at_zero() {
        let mut tab = CustomerTab::new("João");
        tab.record_sale(PaymentMethod::OnAccount, 1, &settlement(2000));

        let remaining = tab.record_payment(Money::from_cents(1500)).unwrap();
        assert_eq!(remaining, Money::from_cents(500));

        // Overpayment clears the debt, no stored credit.
        let remaining = tab.record_payment(Money::from_cents(1000)).unwrap();
        assert_eq!(remaining, Money::zero());
        assert!(!tab.has_debt());
    }

    #[test]
    fn test_payment_must_be_positive() {
        let mut tab = CustomerTab::new("João");
        assert!(tab.record_payment(Money::zero()).is_err());
        assert!(tab.record_payment(Money::from_cents(-100)).is_err());
    }
}
