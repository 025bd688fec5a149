//! # Barcode Scan Replies
//!
//! Client side of the product-lookup contract:
//!
//! ```text
//! GET /scan?codigo=<barcode>
//!   → { ok, erro?, id, preco, produto, quantidade, subtotal, total_venda }
//! ```
//!
//! The endpoint itself lives in the backend; this module only decodes its
//! replies and guards against the one latent hazard the fire-and-forget
//! original had: a slow reply for an earlier scan overwriting the result
//! of a later one. Every scan is tagged with a sequence token and a reply
//! is applied only if its token is still the newest issued.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Out-of-Order Scan Guard                          │
//! │                                                                     │
//! │  scan "A" ──issue token 1──► lookup ············ (slow)             │
//! │  scan "B" ──issue token 2──► lookup ──reply──► accept(2)? yes ✓     │
//! │                                   ·                                 │
//! │                (late) ◄───────────┘  reply A ──► accept(1)? NO ✗    │
//! │                                                   discarded         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Monetary fields arrive as JSON numbers (the backend serializes
//! decimals through `float`) or as decimal strings; both land in integer
//! centavos here, at the boundary, and floats never travel further.

use serde::{Deserialize, Deserializer};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ScanError;
use crate::money::Money;
use crate::parse;

// =============================================================================
// Wire Types
// =============================================================================

/// Raw product-lookup reply, exactly as the backend sends it.
///
/// Field names are the wire names (`preco`, `produto`, ...); every field
/// is optional at this level because failure replies carry only `erro`.
/// Use [`ScanReply::into_hit`] to get something typed.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanReply {
    /// Success flag. Some backend versions omit it on success, so the
    /// default is true and `erro` is authoritative for failure.
    #[serde(default = "default_true")]
    pub ok: bool,

    /// Failure message, user-facing, passed through verbatim.
    #[serde(default)]
    pub erro: Option<String>,

    /// Product identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// Unit price, converted to centavos on deserialization.
    #[serde(default, deserialize_with = "de_opt_cents")]
    pub preco: Option<i64>,

    /// Product display name.
    #[serde(default)]
    pub produto: Option<String>,

    /// Server-side line quantity after this scan.
    #[serde(default)]
    pub quantidade: Option<i64>,

    /// Server-side line subtotal in centavos.
    #[serde(default, deserialize_with = "de_opt_cents")]
    pub subtotal: Option<i64>,

    /// Server-side sale total in centavos.
    #[serde(default, deserialize_with = "de_opt_cents")]
    pub total_venda: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Amounts arrive as numbers or decimal strings depending on the backend
/// serializer; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Num(f64),
    Text(String),
}

fn de_opt_cents<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(raw.map(|r| match r {
        // Boundary conversion: the only place a float touches money.
        RawAmount::Num(v) => (v * 100.0).round() as i64,
        RawAmount::Text(s) => parse::parse_money(&s).cents(),
    }))
}

/// A successfully decoded scan: the product to put on the ticket.
///
/// The server-side `subtotal`/`sale_total` figures are kept for display
/// cross-checks only; the local [`crate::ticket::Ticket`] is the source
/// of truth for totals.
#[derive(Debug, Clone)]
pub struct ScanHit {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    /// Server-side quantity after the scan (defaults to 1 if absent).
    pub quantity: i64,
    pub subtotal: Option<Money>,
    pub sale_total: Option<Money>,
}

impl ScanReply {
    /// Resolves the reply into a typed hit or a scan error.
    ///
    /// `erro` (or `ok:false`) becomes [`ScanError::Rejected`] carrying the
    /// backend message; a success reply missing a required field becomes
    /// [`ScanError::MalformedReply`].
    pub fn into_hit(self) -> Result<ScanHit, ScanError> {
        if let Some(message) = self.erro {
            return Err(ScanError::Rejected(message));
        }
        if !self.ok {
            return Err(ScanError::Rejected("Product lookup rejected".to_string()));
        }

        let product_id = self.id.ok_or(ScanError::MalformedReply { field: "id" })?;
        let name = self
            .produto
            .ok_or(ScanError::MalformedReply { field: "produto" })?;
        let preco = self
            .preco
            .ok_or(ScanError::MalformedReply { field: "preco" })?;
        if crate::validation::validate_price_cents(preco).is_err() {
            return Err(ScanError::PriceOutOfRange(preco));
        }

        Ok(ScanHit {
            product_id,
            name,
            unit_price: Money::from_cents(preco),
            quantity: self.quantidade.unwrap_or(1),
            subtotal: self.subtotal.map(Money::from_cents),
            sale_total: self.total_venda.map(Money::from_cents),
        })
    }
}

// =============================================================================
// Scan Sequencer
// =============================================================================

/// Token identifying one issued scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanToken(u64);

impl ScanToken {
    /// The sequence number, for logging.
    #[inline]
    pub const fn seq(&self) -> u64 {
        self.0
    }
}

/// Issues scan tokens and decides which replies are still current.
///
/// Thread-safe via atomics; issuing a new token invalidates every token
/// issued before it. The newest scan always wins.
#[derive(Debug, Default)]
pub struct ScanSequencer {
    latest: AtomicU64,
}

impl ScanSequencer {
    pub fn new() -> Self {
        ScanSequencer {
            latest: AtomicU64::new(0),
        }
    }

    /// Issues the next token; all previously issued tokens go stale.
    pub fn issue(&self) -> ScanToken {
        ScanToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether a reply carrying this token may still be applied.
    pub fn accept(&self, token: ScanToken) -> bool {
        token.0 == self.latest.load(Ordering::Acquire)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_success_reply_with_float_price() {
        let reply: ScanReply = serde_json::from_value(json!({
            "ok": true,
            "id": "42",
            "preco": 4.5,
            "produto": "Água 500ml",
            "quantidade": 2,
            "subtotal": 9.0,
            "total_venda": 23.5,
        }))
        .unwrap();

        let hit = reply.into_hit().unwrap();
        assert_eq!(hit.product_id, "42");
        assert_eq!(hit.unit_price, Money::from_cents(450));
        assert_eq!(hit.quantity, 2);
        assert_eq!(hit.subtotal, Some(Money::from_cents(900)));
        assert_eq!(hit.sale_total, Some(Money::from_cents(2350)));
    }

    #[test]
    fn test_decode_success_reply_without_ok_flag() {
        // Older backend variant: no "ok" on success replies.
        let reply: ScanReply = serde_json::from_value(json!({
            "id": "7",
            "preco": "10,99",
            "produto": "Café 250g",
        }))
        .unwrap();

        let hit = reply.into_hit().unwrap();
        assert_eq!(hit.unit_price, Money::from_cents(1099));
        assert_eq!(hit.quantity, 1);
    }

    #[test]
    fn test_decode_error_reply() {
        let reply: ScanReply = serde_json::from_value(json!({
            "ok": false,
            "erro": "Produto não encontrado",
        }))
        .unwrap();

        let err = reply.into_hit().unwrap_err();
        assert!(matches!(err, ScanError::Rejected(ref m) if m == "Produto não encontrado"));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let reply: ScanReply = serde_json::from_value(json!({
            "ok": true,
            "id": "7",
            "produto": "Café 250g",
        }))
        .unwrap();

        let err = reply.into_hit().unwrap_err();
        assert!(matches!(err, ScanError::MalformedReply { field: "preco" }));
    }

    #[test]
    fn test_absurd_price_is_rejected_at_the_boundary() {
        // A backend bug sending 1e300 must not reach subtotal arithmetic;
        // the float saturates to i64::MAX in decoding and is rejected here.
        let reply: ScanReply = serde_json::from_value(json!({
            "ok": true,
            "id": "7",
            "preco": 1e300,
            "produto": "Café 250g",
        }))
        .unwrap();
        let err = reply.into_hit().unwrap_err();
        assert!(matches!(err, ScanError::PriceOutOfRange(_)));

        let reply: ScanReply = serde_json::from_value(json!({
            "id": "7",
            "preco": "-5,00",
            "produto": "Café 250g",
        }))
        .unwrap();
        let err = reply.into_hit().unwrap_err();
        assert!(matches!(err, ScanError::PriceOutOfRange(-500)));
    }

    #[test]
    fn test_sequencer_newest_wins() {
        let seq = ScanSequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(!seq.accept(first), "older token must be stale");
        assert!(seq.accept(second));

        let third = seq.issue();
        assert!(!seq.accept(second));
        assert!(seq.accept(third));
    }

    #[test]
    fn test_sequencer_tokens_are_monotonic() {
        let seq = ScanSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        assert!(b.seq() > a.seq());
    }
}
