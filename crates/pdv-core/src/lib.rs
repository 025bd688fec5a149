//! # pdv-core: Pure Business Logic for Mercado PDV
//!
//! This crate is the **heart** of the PDV terminal. It contains the sale
//! ticket reconciler and everything it needs as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Mercado PDV Architecture                       │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  Admin Frontend (JS)                        │   │
//! │  │    Barcode input ──► Ticket table ──► Tender / Troco        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                  pdv-session                                │   │
//! │  │    TicketState, Scanner, input handlers                     │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │             ★ pdv-core (THIS CRATE) ★                       │   │
//! │  │                                                             │   │
//! │  │  ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ ┌──────────┐  │   │
//! │  │  │ money  │ │ parse  │ │ ticket │ │  scan  │ │ register │  │   │
//! │  │  │ Money  │ │ coerce │ │ Ticket │ │ replies│ │  Caixa   │  │   │
//! │  │  │ troco  │ │ to 0   │ │ lines  │ │ tokens │ │  drawer  │  │   │
//! │  │  └────────┘ └────────┘ └────────┘ └────────┘ └──────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                      │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer centavo arithmetic (no floats!)
//! - [`parse`] - Permissive numeric input parsing (malformed input is zero)
//! - [`types`] - Domain types (Product, PaymentMethod, Category)
//! - [`ticket`] - The sale ticket aggregate: lines, total, troco
//! - [`scan`] - Product-lookup reply decoding and the stale-reply guard
//! - [`register`] - Cash register session (opening float, drawer, close)
//! - [`customer`] - Customer tabs for "em aberto" sales
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, database access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use pdv_core::money::Money;
//! use pdv_core::ticket::{compute_change, Ticket};
//! use pdv_core::types::PaymentMethod;
//!
//! let mut ticket = Ticket::new();
//! ticket
//!     .add_or_update_line("p-1", "Água 500ml", Money::from_cents(1000), 2)
//!     .unwrap();
//!
//! let total = ticket.total();
//! assert_eq!(total.cents(), 2000);
//!
//! // R$ 25,00 in cash against a R$ 20,00 ticket: R$ 5,00 back
//! let troco = compute_change(total, PaymentMethod::Cash, Money::from_cents(2500));
//! assert_eq!(troco, Some(Money::from_cents(500)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod customer;
pub mod error;
pub mod money;
pub mod parse;
pub mod register;
pub mod scan;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pdv_core::Money` instead of
// `use pdv_core::money::Money`

pub use customer::CustomerTab;
pub use error::{CoreError, CoreResult, ScanError, ValidationError};
pub use money::Money;
pub use scan::{ScanHit, ScanReply, ScanSequencer, ScanToken};
pub use ticket::{compute_change, compute_total, LineId, Settlement, Ticket, TicketLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed on a single ticket.
///
/// ## Business Reason
/// Prevents runaway tickets and ensures reasonable transaction sizes.
/// Can be made configurable per store in future versions.
pub const MAX_TICKET_LINES: usize = 100;

/// Maximum quantity of a single product on a line.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum plausible unit price, in centavos (R$ 1.000.000,00).
///
/// ## Business Reason
/// Nothing in a market costs a million reais per unit. Prices beyond
/// this are garbage from the lookup boundary and are rejected before
/// they can reach subtotal arithmetic.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;
