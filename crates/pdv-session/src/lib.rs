//! # pdv-session: Event-Driven Layer for Mercado PDV
//!
//! Everything between the frontend events and the pure core: shared
//! ticket state, input handlers, and the async barcode-scan pipeline.
//!
//! ## Event Model
//! The original admin screen recomputed everything inside DOM callbacks.
//! The same shape survives here, minus the DOM: each handler runs to
//! completion synchronously against the [`TicketState`] mutex, and the
//! only suspension point in the whole system is the product lookup await
//! inside [`Scanner::scan`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Session Event Flow                             │
//! │                                                                     │
//! │  Frontend Event            Handler                  Core Operation  │
//! │  ──────────────            ───────                  ──────────────  │
//! │  Barcode + Enter ────────► Scanner::scan ─────────► apply_scan      │
//! │  Quantity input ─────────► apply_quantity_input ──► update_quantity │
//! │  Tender input ───────────► apply_tender_input ────► settle          │
//! │  Row remove click ───────► remove_line ───────────► remove_line     │
//! │                                                                     │
//! │  Every handler returns a fresh TicketView; totals cannot go stale.  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`] - Shared ticket state and frontend view DTOs
//! - [`scanner`] - Async scan pipeline with stale-reply discarding
//! - [`error`] - Session error type with frontend error codes

pub mod error;
pub mod scanner;
pub mod state;

pub use error::{ErrorCode, FrontendError, LookupError, SessionError, SessionResult};
pub use scanner::{ProductLookup, ScanOutcome, Scanner};
pub use state::{TicketState, TicketTotals, TicketView};
