//! # Cash Register Session
//!
//! Tracks one drawer session ("caixa") from opening float to close-out.
//! Only settled sales flow in here; the session never reaches back into
//! tickets or persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::ticket::Settlement;
use crate::types::PaymentMethod;

/// One cash register session.
///
/// ## Drawer Math
/// ```text
/// expected_drawer = opening_float + cash_received − outflows
/// over_short      = counted_at_close − expected_drawer
/// ```
/// Cash received for a sale is the sale total, not the tendered amount:
/// troco goes straight back out of the drawer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterSession {
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    /// Cash in the drawer at opening.
    pub opening_float_cents: i64,

    /// Net cash taken from settled cash sales.
    pub cash_received_cents: i64,

    /// Cash taken out of the drawer (supplier payments, withdrawals).
    pub outflow_cents: i64,

    /// Total of all recorded sales, any method.
    pub sales_total_cents: i64,

    /// Number of recorded sales.
    pub sale_count: u32,

    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl RegisterSession {
    /// Opens a session with the given float.
    pub fn open(opening_float: Money) -> Self {
        RegisterSession {
            opened_at: Utc::now(),
            opening_float_cents: opening_float.cents(),
            cash_received_cents: 0,
            outflow_cents: 0,
            sales_total_cents: 0,
            sale_count: 0,
            closed_at: None,
        }
    }

    /// Whether the session is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::RegisterClosed)
        }
    }

    /// Records a settled sale.
    ///
    /// Only fully paid cash sales move drawer cash; card/Pix/on-account
    /// sales count toward the sales total but settle outside the drawer.
    pub fn record_sale(&mut self, method: PaymentMethod, settlement: &Settlement) -> CoreResult<()> {
        self.ensure_open()?;

        self.sales_total_cents += settlement.total_cents;
        self.sale_count += 1;
        if method.is_cash() && settlement.paid {
            self.cash_received_cents += settlement.total_cents;
        }
        Ok(())
    }

    /// Records cash leaving the drawer.
    pub fn record_outflow(&mut self, amount: Money) -> CoreResult<()> {
        self.ensure_open()?;
        if !amount.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "outflow amount".to_string(),
            }
            .into());
        }
        self.outflow_cents += amount.cents();
        Ok(())
    }

    /// Cash that should be in the drawer right now.
    pub fn expected_drawer(&self) -> Money {
        Money::from_cents(self.opening_float_cents + self.cash_received_cents - self.outflow_cents)
    }

    /// Closes the session against a physical count.
    ///
    /// Returns the over/short amount (counted − expected): positive means
    /// extra cash, negative means a shortfall.
    pub fn close(&mut self, counted: Money) -> CoreResult<Money> {
        self.ensure_open()?;
        self.closed_at = Some(Utc::now());
        Ok(counted - self.expected_drawer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cash_settlement(total_cents: i64) -> Settlement {
        Settlement {
            total_cents,
            change_cents: Some(0),
            balance_due_cents: 0,
            paid: true,
        }
    }

    #[test]
    fn test_expected_drawer_math() {
        let mut session = RegisterSession::open(Money::from_cents(5000));

        session
            .record_sale(PaymentMethod::Cash, &cash_settlement(2000))
            .unwrap();
        session
            .record_sale(PaymentMethod::Pix, &cash_settlement(3000))
            .unwrap();
        session.record_outflow(Money::from_cents(1500)).unwrap();

        // Pix sale counts toward sales, not toward drawer cash.
        assert_eq!(session.sales_total_cents, 5000);
        assert_eq!(session.sale_count, 2);
        assert_eq!(session.expected_drawer(), Money::from_cents(5500));
    }

    #[test]
    fn test_unpaid_cash_sale_adds_no_drawer_cash() {
        let mut session = RegisterSession::open(Money::zero());
        let underpaid = Settlement {
            total_cents: 2000,
            change_cents: None,
            balance_due_cents: 500,
            paid: false,
        };
        session
            .record_sale(PaymentMethod::Cash, &underpaid)
            .unwrap();
        assert_eq!(session.cash_received_cents, 0);
        assert_eq!(session.sales_total_cents, 2000);
    }

    #[test]
    fn test_close_reports_over_short() {
        let mut session = RegisterSession::open(Money::from_cents(5000));
        session
            .record_sale(PaymentMethod::Cash, &cash_settlement(2000))
            .unwrap();

        // Expected 70,00; counted 69,00: one real short.
        let diff = session.close(Money::from_cents(6900)).unwrap();
        assert_eq!(diff, Money::from_cents(-100));
        assert!(!session.is_open());
    }

    #[test]
    fn test_closed_session_rejects_mutation() {
        let mut session = RegisterSession::open(Money::zero());
        session.close(Money::zero()).unwrap();

        assert!(matches!(
            session.record_sale(PaymentMethod::Cash, &cash_settlement(100)),
            Err(CoreError::RegisterClosed)
        ));
        assert!(matches!(
            session.record_outflow(Money::from_cents(100)),
            Err(CoreError::RegisterClosed)
        ));
        assert!(matches!(
            session.close(Money::zero()),
            Err(CoreError::RegisterClosed)
        ));
    }

    #[test]
    fn test_outflow_must_be_positive() {
        let mut session = RegisterSession::open(Money::zero());
        assert!(session.record_outflow(Money::zero()).is_err());
        assert!(session.record_outflow(Money::from_cents(-100)).is_err());
    }
}
