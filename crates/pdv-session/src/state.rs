//! # Ticket State
//!
//! Owns the current sale ticket and translates raw input events into core
//! operations.
//!
//! ## Thread Safety
//! The ticket is wrapped in `Arc<Mutex<T>>` because the scan pipeline and
//! input handlers may run on different tasks, and only one of them should
//! mutate the ticket at a time. Operations are short and the lock is
//! never held across an await.
//!
//! ## Source of Truth
//! The redesign rule from the original screen: state lives here, not in
//! the rendering layer. Every handler returns a freshly computed
//! [`TicketView`], so whatever the frontend displays was derived from the
//! lines as they are right now - there is no cached total to go stale.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use pdv_core::parse;
use pdv_core::ticket::{LineId, Settlement, Ticket, TicketLine};
use pdv_core::types::PaymentMethod;

use crate::error::SessionResult;

// =============================================================================
// Frontend Views
// =============================================================================

/// Ticket totals summary for frontend responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl From<&Ticket> for TicketTotals {
    fn from(ticket: &Ticket) -> Self {
        TicketTotals {
            line_count: ticket.line_count(),
            total_quantity: ticket.total_quantity(),
            total_cents: ticket.total_cents(),
        }
    }
}

/// Full ticket view: lines plus totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub lines: Vec<TicketLine>,
    pub totals: TicketTotals,
}

impl From<&Ticket> for TicketView {
    fn from(ticket: &Ticket) -> Self {
        TicketView {
            lines: ticket.lines.clone(),
            totals: TicketTotals::from(ticket),
        }
    }
}

// =============================================================================
// Ticket State
// =============================================================================

/// Shared, mutex-guarded ticket state.
#[derive(Debug, Clone, Default)]
pub struct TicketState {
    ticket: Arc<Mutex<Ticket>>,
}

impl TicketState {
    /// Creates state holding a new empty ticket.
    pub fn new() -> Self {
        TicketState {
            ticket: Arc::new(Mutex::new(Ticket::new())),
        }
    }

    /// Executes a function with read access to the ticket.
    pub fn with_ticket<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ticket) -> R,
    {
        let ticket = self.ticket.lock().expect("Ticket mutex poisoned");
        f(&ticket)
    }

    /// Executes a function with write access to the ticket.
    pub fn with_ticket_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Ticket) -> R,
    {
        let mut ticket = self.ticket.lock().expect("Ticket mutex poisoned");
        f(&mut ticket)
    }

    /// Current view of the ticket.
    pub fn view(&self) -> TicketView {
        self.with_ticket(|t| TicketView::from(t))
    }

    /// Handles a quantity-field edit on a line.
    ///
    /// The raw field text goes through the permissive parser: malformed or
    /// empty input is zero, and zero removes the line - exactly what the
    /// cashier sees happen on screen.
    pub fn apply_quantity_input(&self, line_id: &LineId, raw: &str) -> SessionResult<TicketView> {
        let quantity = parse::parse_quantity(raw);
        debug!(line = %line_id, raw, quantity, "quantity input");

        self.with_ticket_mut(|t| t.update_quantity(line_id, quantity))?;
        Ok(self.view())
    }

    /// Handles an edit of the tender ("valor pago") field.
    ///
    /// Never fails: malformed amounts coerce to zero and an all-blank
    /// field counts as no tender yet. The returned settlement carries
    /// troco only when it should display.
    pub fn apply_tender_input(&self, method: PaymentMethod, raw: &str) -> Settlement {
        let tendered = if raw.trim().is_empty() {
            None
        } else {
            Some(parse::parse_money(raw))
        };
        debug!(?method, raw, tendered = ?tendered.map(|m| m.cents()), "tender input");

        self.with_ticket(|t| t.settle(method, tendered))
    }

    /// Removes a line (row delete button).
    pub fn remove_line(&self, line_id: &LineId) -> SessionResult<TicketView> {
        debug!(line = %line_id, "remove line");
        self.with_ticket_mut(|t| t.remove_line(line_id))?;
        Ok(self.view())
    }

    /// Clears the ticket for the next customer.
    pub fn clear(&self) -> TicketView {
        debug!("clear ticket");
        self.with_ticket_mut(|t| t.clear());
        self.view()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
