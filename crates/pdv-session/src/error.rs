//! # Session Error Type
//!
//! Unified error type for session operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Mercado PDV                        │
//! │                                                                     │
//! │  CoreError ──┐                                                      │
//! │  ScanError ──┼──► SessionError ──► FrontendError { code, message }  │
//! │  LookupError ┘                                                      │
//! │                                                                     │
//! │  Frontend:                                                          │
//! │    catch (e) {                                                      │
//! │      // e.code = "SCAN_REJECTED"                                    │
//! │      // e.message = "Produto não encontrado"                        │
//! │    }                                                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The original screen swallowed transport failures silently; here they
//! are a first-class [`LookupError::Transport`] so the cashier sees that
//! the scan did not happen, instead of a ticket that quietly ignores it.

use serde::Serialize;
use thiserror::Error;

use pdv_core::{CoreError, ScanError};

// =============================================================================
// Lookup Error
// =============================================================================

/// Failure of the product-lookup call itself (as opposed to a reply that
/// arrived and was rejected).
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never completed (network, backend down).
    #[error("Product lookup failed: {0}")]
    Transport(String),

    /// A reply arrived but could not be decoded as JSON.
    #[error("Product lookup reply could not be decoded: {0}")]
    Decode(String),
}

// =============================================================================
// Session Error
// =============================================================================

/// Anything a session operation can fail with.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Convenience type alias for Results with SessionError.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// Frontend Representation
// =============================================================================

/// Error codes for frontend responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or ticket line not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Ticket rule violation (line/quantity limits, closed register)
    TicketError,

    /// Not enough stock for the requested quantity
    InsufficientStock,

    /// Backend rejected the scanned barcode
    ScanRejected,

    /// Lookup transport/decoding failure
    LookupFailed,
}

/// What the frontend receives when an operation fails.
///
/// ## Serialization
/// ```json
/// { "code": "SCAN_REJECTED", "message": "Produto não encontrado" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

impl SessionError {
    /// Maps the error onto a frontend code; the message is the error's
    /// display form.
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Core(CoreError::ProductNotFound(_))
            | SessionError::Core(CoreError::LineNotFound(_)) => ErrorCode::NotFound,
            SessionError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            SessionError::Core(CoreError::InsufficientStock { .. }) => ErrorCode::InsufficientStock,
            SessionError::Core(_) => ErrorCode::TicketError,
            SessionError::Scan(ScanError::Rejected(_)) => ErrorCode::ScanRejected,
            SessionError::Scan(_) => ErrorCode::LookupFailed,
            SessionError::Lookup(_) => ErrorCode::LookupFailed,
        }
    }

    /// Converts into the serializable frontend shape.
    pub fn to_frontend(&self) -> FrontendError {
        FrontendError {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
