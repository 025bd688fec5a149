//! # Scan Pipeline
//!
//! Drives a barcode from keyboard-wedge input to a line on the ticket.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Scanner::scan                                │
//! │                                                                     │
//! │  barcode text                                                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  validate_barcode ──err──► SessionError (VALIDATION_ERROR)          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  sequencer.issue() ── token N                                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  lookup.lookup(barcode).await ──err──► SessionError (LOOKUP_FAILED) │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  sequencer.accept(N)? ──no──► ScanOutcome::Stale (discarded)        │
//! │       │ yes                                                         │
//! │       ▼                                                             │
//! │  reply.into_hit() ──err──► SessionError (SCAN_REJECTED)             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ticket.apply_scan(hit) ──► ScanOutcome::Applied(view)              │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The original screen fired a fetch per scan with no cancellation and
//! applied replies in arrival order. Here rapid scanning still issues
//! overlapping lookups, but only the newest one may touch the ticket.

use std::future::Future;

use tracing::{debug, error, info, warn};

use pdv_core::scan::ScanSequencer;
use pdv_core::validation::validate_barcode;
use pdv_core::{CoreError, ScanReply};

use crate::error::{LookupError, SessionResult};
use crate::state::{TicketState, TicketView};

// =============================================================================
// Lookup Seam
// =============================================================================

/// Abstract product-lookup backend.
///
/// The real implementation performs `GET /scan?codigo=<barcode>`; tests
/// substitute in-memory tables. Keeping the seam at the reply level means
/// the whole pipeline below it is exercised without a network.
pub trait ProductLookup: Send + Sync {
    /// Resolves a barcode to a raw scan reply.
    fn lookup(
        &self,
        barcode: &str,
    ) -> impl Future<Output = Result<ScanReply, LookupError>> + Send;
}

// =============================================================================
// Scanner
// =============================================================================

/// Outcome of one scan attempt.
#[derive(Debug)]
pub enum ScanOutcome {
    /// The reply was current and the ticket was updated.
    Applied(TicketView),
    /// A newer scan was issued while this one was in flight; the reply
    /// was discarded and the ticket untouched.
    Stale,
}

/// The scan pipeline: lookup seam, ordering guard, ticket state.
#[derive(Debug)]
pub struct Scanner<L> {
    lookup: L,
    sequencer: ScanSequencer,
    state: TicketState,
}

impl<L: ProductLookup> Scanner<L> {
    /// Creates a scanner feeding the given ticket state.
    pub fn new(lookup: L, state: TicketState) -> Self {
        Scanner {
            lookup,
            sequencer: ScanSequencer::new(),
            state,
        }
    }

    /// The ticket state this scanner feeds.
    pub fn state(&self) -> &TicketState {
        &self.state
    }

    /// Scans one barcode.
    ///
    /// ## Errors
    /// - Malformed barcode: validation error before any lookup
    /// - Transport/decoding failure: visible error (the original screen
    ///   swallowed these; that gap is closed here)
    /// - Backend rejection (`erro`): surfaced with the backend's message,
    ///   no retry
    pub async fn scan(&self, barcode: &str) -> SessionResult<ScanOutcome> {
        let barcode = validate_barcode(barcode).map_err(CoreError::from)?;

        let token = self.sequencer.issue();
        debug!(barcode = %barcode, seq = token.seq(), "scan dispatched");

        let reply = match self.lookup.lookup(&barcode).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(barcode = %barcode, error = %e, "product lookup failed");
                return Err(e.into());
            }
        };

        if !self.sequencer.accept(token) {
            warn!(barcode = %barcode, seq = token.seq(), "stale scan reply discarded");
            return Ok(ScanOutcome::Stale);
        }

        let hit = reply.into_hit()?;
        let view = self
            .state
            .with_ticket_mut(|t| t.apply_scan(&hit).map(|_| TicketView::from(&*t)))?;

        info!(
            product = %hit.name,
            unit_price = %hit.unit_price,
            total_cents = view.totals.total_cents,
            "scan applied"
        );
        Ok(ScanOutcome::Applied(view))
    }
}
