//! # Sale Ticket
//!
//! The in-memory sale aggregate and its reconciliation logic: line
//! subtotals, running total and troco (change due).
//!
//! ## Why an Aggregate?
//! The original screen kept its state in scattered DOM fields and re-read
//! them on every event, so the "total" was whatever happened to be in the
//! inputs. Here the [`Ticket`] is the single source of truth and the total
//! is always computed from the current lines - it cannot go stale. The
//! rendering layer subscribes to state, it never owns it.
//!
//! ## Reconciliation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Ticket Reconciliation                            │
//! │                                                                     │
//! │  Event                      Operation              Result           │
//! │  ─────                      ─────────              ──────           │
//! │  Barcode scanned ─────────► apply_scan()     ───►  line qty +1      │
//! │  Product picked ──────────► add_product()    ───►  merge or insert  │
//! │  Quantity edited ─────────► update_quantity()───►  set / remove     │
//! │  Tender edited ───────────► settle()         ───►  troco, balance   │
//! │                                                                     │
//! │  After every mutation: total() = Σ line subtotals, recomputed.      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Identity
//! Every line carries a [`LineId`], an opaque UUID assigned at insertion.
//! Callers address lines by id, never by row index; there is no
//! `__prefix__`-style suffix parsing anywhere in this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::scan::ScanHit;
use crate::types::{PaymentMethod, Product};
use crate::{MAX_LINE_QUANTITY, MAX_TICKET_LINES};

// =============================================================================
// Line Identifier
// =============================================================================

/// Stable opaque identifier for a ticket line.
///
/// Assigned once when the line is inserted and never reused; survives
/// reordering and removal of other lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Generates a fresh identifier (UUID v4).
    pub fn new() -> Self {
        LineId(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LineId {
    fn default() -> Self {
        LineId::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Ticket Line
// =============================================================================

/// One product entry on the ticket.
///
/// ## Price Freezing
/// `unit_price_cents` is a snapshot taken when the line is created (or the
/// price the backend reported on the most recent scan). A later price
/// change in the catalog does not move lines already on the ticket.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketLine {
    /// Stable opaque line identifier.
    pub id: LineId,

    /// Product this line refers to.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in centavos at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity on the line; always ≥ 1 while the line exists.
    pub quantity: i64,

    /// When this line was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl TicketLine {
    fn new(product_id: &str, name: &str, unit_price: Money, quantity: i64) -> Self {
        TicketLine {
            id: LineId::new(),
            product_id: product_id.to_string(),
            name: name.to_string(),
            unit_price_cents: unit_price.cents(),
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal: `unit_price × quantity`, exact in centavos.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Line subtotal in centavos. Saturates at the i64 range; prices big
    /// enough to matter are rejected at the boundary anyway.
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(self.quantity)
    }
}

// =============================================================================
// Pure Reconciliation Functions
// =============================================================================

/// Sums line subtotals into the sale total.
///
/// Pure function, no side effects; a commutative sum, so the result is
/// stable under any reordering of the lines.
pub fn compute_total(lines: &[TicketLine]) -> Money {
    lines.iter().map(TicketLine::line_total).sum()
}

/// Computes troco (change due).
///
/// Returns `None` when the method is not cash or the tendered amount does
/// not cover the total - a blank change field, never a negative one.
/// Otherwise `tendered − total`, which is non-negative by construction.
///
/// ## Example
/// ```rust
/// use pdv_core::money::Money;
/// use pdv_core::ticket::compute_change;
/// use pdv_core::types::PaymentMethod;
///
/// let total = Money::from_cents(2000);
/// assert_eq!(
///     compute_change(total, PaymentMethod::Cash, Money::from_cents(2500)),
///     Some(Money::from_cents(500)),
/// );
/// assert_eq!(
///     compute_change(total, PaymentMethod::Cash, Money::from_cents(1500)),
///     None,
/// );
/// assert_eq!(
///     compute_change(total, PaymentMethod::Pix, Money::from_cents(2500)),
///     None,
/// );
/// ```
pub fn compute_change(total: Money, method: PaymentMethod, tendered: Money) -> Option<Money> {
    if !method.is_cash() || tendered < total {
        return None;
    }
    Some((tendered - total).clamp_non_negative())
}

// =============================================================================
// Settlement
// =============================================================================

/// Outcome of evaluating payment against the ticket total.
///
/// Mirrors the payment rules of the sale record: for cash, troco and the
/// outstanding balance are both floored at zero and `paid` means the
/// tendered amount covered the total. Non-cash methods never carry troco
/// and settle outside the drawer, so `paid` stays false until the
/// external confirmation (card terminal, Pix receipt) which is not part
/// of this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    /// Sale total in centavos.
    pub total_cents: i64,

    /// Troco in centavos; `None` whenever it must display blank.
    pub change_cents: Option<i64>,

    /// Amount still owed in centavos (cash underpayment), floored at zero.
    pub balance_due_cents: i64,

    /// Whether the tendered cash covered the total.
    pub paid: bool,
}

impl Settlement {
    /// Troco as Money, if any.
    #[inline]
    pub fn change(&self) -> Option<Money> {
        self.change_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// The sale ticket: an ordered sequence of lines.
///
/// ## Invariants
/// - Lines are unique by `product_id`; re-adding a product merges into the
///   existing line
/// - `quantity ≥ 1` for every line; dropping to zero removes the line
/// - At most [`MAX_TICKET_LINES`] lines, [`MAX_LINE_QUANTITY`] per line
/// - Order is entry order (display-relevant); the total does not depend
///   on it
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ticket {
    /// Lines in entry order.
    pub lines: Vec<TicketLine>,

    /// When the ticket was started / last cleared.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Creates a new empty ticket.
    pub fn new() -> Self {
        Ticket {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Inserts a line for the product or updates the existing one.
    ///
    /// ## Behavior
    /// - Quantity is clamped to non-negative (permissive-input policy:
    ///   coerced garbage arrives here as 0)
    /// - Quantity 0 removes the line (or inserts nothing) and returns
    ///   `None`
    /// - Existing line: quantity and unit price are *set*, not added, so
    ///   the operation is idempotent
    ///
    /// ## Example
    /// ```rust
    /// use pdv_core::money::Money;
    /// use pdv_core::ticket::Ticket;
    ///
    /// let mut ticket = Ticket::new();
    /// let price = Money::from_cents(1000);
    /// ticket.add_or_update_line("p-1", "Café 250g", price, 2).unwrap();
    /// ticket.add_or_update_line("p-1", "Café 250g", price, 2).unwrap();
    /// // Update, not duplicate:
    /// assert_eq!(ticket.total().cents(), 2000);
    /// ```
    pub fn add_or_update_line(
        &mut self,
        product_id: &str,
        name: &str,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<Option<LineId>> {
        crate::validation::validate_price_cents(unit_price.cents())?;

        let quantity = quantity.max(0);
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        if let Some(pos) = self.lines.iter().position(|l| l.product_id == product_id) {
            if quantity == 0 {
                self.lines.remove(pos);
                return Ok(None);
            }
            let line = &mut self.lines[pos];
            line.unit_price_cents = unit_price.cents();
            line.quantity = quantity;
            return Ok(Some(line.id.clone()));
        }

        if quantity == 0 {
            return Ok(None);
        }
        if self.lines.len() >= MAX_TICKET_LINES {
            return Err(CoreError::TicketTooLarge {
                max: MAX_TICKET_LINES,
            });
        }

        let line = TicketLine::new(product_id, name, unit_price, quantity);
        let id = line.id.clone();
        self.lines.push(line);
        Ok(Some(id))
    }

    /// Adds a product with merge-increment semantics and a stock check.
    ///
    /// ## Behavior
    /// - If the product is already on the ticket: quantity increases
    /// - Otherwise a new line is appended with the product's current price
    /// - Stock-tracked products are checked against the *combined*
    ///   quantity
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<LineId> {
        crate::validation::validate_quantity(quantity)?;
        crate::validation::validate_price_cents(product.price_cents)?;

        let current = self
            .lines
            .iter()
            .find(|l| l.product_id == product.id)
            .map(|l| l.quantity)
            .unwrap_or(0);
        let combined = current + quantity;

        if combined > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: combined,
                max: MAX_LINE_QUANTITY,
            });
        }
        if !product.can_sell(combined) {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock.unwrap_or(0),
                requested: combined,
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity = combined;
            return Ok(line.id.clone());
        }

        if self.lines.len() >= MAX_TICKET_LINES {
            return Err(CoreError::TicketTooLarge {
                max: MAX_TICKET_LINES,
            });
        }
        let line = TicketLine::new(&product.id, &product.name, product.price(), quantity);
        let id = line.id.clone();
        self.lines.push(line);
        Ok(id)
    }

    /// Applies a decoded scan reply: one more unit of the scanned product.
    ///
    /// Re-scanning a product already on the ticket increments its line and
    /// refreshes the frozen price to what the backend just reported. The
    /// backend enforces stock on its side of the scan contract, so no
    /// local stock check happens here.
    pub fn apply_scan(&mut self, hit: &ScanHit) -> CoreResult<LineId> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == hit.product_id) {
            if line.quantity >= MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: line.quantity + 1,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity += 1;
            line.unit_price_cents = hit.unit_price.cents();
            return Ok(line.id.clone());
        }

        if self.lines.len() >= MAX_TICKET_LINES {
            return Err(CoreError::TicketTooLarge {
                max: MAX_TICKET_LINES,
            });
        }
        let line = TicketLine::new(&hit.product_id, &hit.name, hit.unit_price, 1);
        let id = line.id.clone();
        self.lines.push(line);
        Ok(id)
    }

    /// Sets the quantity of a line by its stable id.
    ///
    /// ## Behavior
    /// - Quantity ≤ 0: removes the line
    /// - Unknown id: [`CoreError::LineNotFound`]
    pub fn update_quantity(&mut self, line_id: &LineId, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_line(line_id).map(|_| ());
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| &l.id == line_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound(line_id.to_string())),
        }
    }

    /// Removes a line by its stable id, returning it.
    pub fn remove_line(&mut self, line_id: &LineId) -> CoreResult<TicketLine> {
        match self.lines.iter().position(|l| &l.id == line_id) {
            Some(pos) => Ok(self.lines.remove(pos)),
            None => Err(CoreError::LineNotFound(line_id.to_string())),
        }
    }

    /// Looks up a line by id.
    pub fn line(&self, line_id: &LineId) -> Option<&TicketLine> {
        self.lines.iter().find(|l| &l.id == line_id)
    }

    /// Clears all lines and restarts the ticket.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Number of lines on the ticket.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sale total, recomputed from the current lines.
    #[inline]
    pub fn total(&self) -> Money {
        compute_total(&self.lines)
    }

    /// Sale total in centavos.
    #[inline]
    pub fn total_cents(&self) -> i64 {
        self.total().cents()
    }

    /// Checks if the ticket is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Evaluates payment against the current total.
    ///
    /// Pure with respect to the ticket: settling never mutates lines.
    /// `tendered` is `None` while the cashier has not filled the field.
    pub fn settle(&self, method: PaymentMethod, tendered: Option<Money>) -> Settlement {
        let total = self.total();

        if !method.is_cash() {
            return Settlement {
                total_cents: total.cents(),
                change_cents: None,
                balance_due_cents: 0,
                paid: false,
            };
        }

        let tendered = tendered.unwrap_or_else(Money::zero);
        Settlement {
            total_cents: total.cents(),
            change_cents: compute_change(total, method, tendered).map(|m| m.cents()),
            balance_due_cents: (total - tendered).clamp_non_negative().cents(),
            paid: tendered >= total,
        }
    }
}

impl Default for Ticket {
    fn default() -> Self {
        Ticket::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
