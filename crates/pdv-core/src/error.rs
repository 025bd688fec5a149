//! # Error Types
//!
//! Domain-specific error types for pdv-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  pdv-core errors (this file)                                        │
//! │  ├── CoreError        - Ticket/register rule violations             │
//! │  ├── ValidationError  - Input validation failures                   │
//! │  └── ScanError        - Product-lookup reply problems               │
//! │                                                                     │
//! │  pdv-session errors (separate crate)                                │
//! │  └── SessionError     - What the frontend sees                      │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → SessionError → Frontend        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note what is NOT an error: malformed numeric *text* input. That is
//! coerced to zero in [`crate::parse`] by policy and never surfaces here.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, line id, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They should be caught
/// and translated to user-facing messages by the session layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to complete the sale.
    ///
    /// ## When This Occurs
    /// - Adding more units than available for a stock-tracked product
    ///
    /// ## User Workflow
    /// ```text
    /// Add to ticket (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Água 500ml", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Água 500ml in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// No ticket line with the given identifier.
    ///
    /// Lines are addressed by stable opaque ids, never by row index, so a
    /// miss means the line was already removed.
    #[error("Ticket line not found: {0}")]
    LineNotFound(String),

    /// Ticket has exceeded the maximum allowed number of lines.
    #[error("Ticket cannot have more than {max} lines")]
    TicketTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Register session is already closed.
    #[error("Register session is closed")]
    RegisterClosed,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when structured input (not free text - see module docs)
/// doesn't meet requirements. Used for early validation before business
/// logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Scan Error
// =============================================================================

/// Problems with a product-lookup reply.
///
/// A rejection carries the backend's message and is surfaced to the
/// cashier immediately; there is no retry.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Backend reported a lookup failure (`ok:false` / `erro`).
    #[error("{0}")]
    Rejected(String),

    /// Reply claimed success but is missing a required field.
    #[error("Scan reply missing field: {field}")]
    MalformedReply { field: &'static str },

    /// Reply price is negative or beyond any plausible unit price.
    #[error("Scan reply price out of range: {0} centavos")]
    PriceOutOfRange(i64),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
