//! # Domain Types
//!
//! Core domain types used throughout Mercado PDV.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │    Product     │   │ PaymentMethod  │   │    Category    │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  id (UUID)     │   │  Cash          │   │  Food          │      │
//! │  │  barcode       │   │  Pix           │   │  Drinks        │      │
//! │  │  name          │   │  Credit/Debit  │   │  Sweets        │      │
//! │  │  price_cents   │   │  OnAccount     │   │  ...           │      │
//! │  │  stock         │   └────────────────┘   └────────────────┘      │
//! │  └────────────────┘                                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Troco is only ever computed for [`PaymentMethod::Cash`]; every other
//! method yields no change amount at all (blank field, never negative).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Category
// =============================================================================

/// Product category, as curated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    NonAlcoholicDrink,
    AlcoholicDrink,
    Sweets,
    Accessories,
    Cigarettes,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale is paid.
///
/// ## Change Semantics
/// Only `Cash` ever produces troco. `OnAccount` leaves the sale open on
/// the customer's tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment ("dinheiro").
    Cash,
    /// Instant bank transfer.
    Pix,
    /// Credit card on external terminal.
    Credit,
    /// Debit card on external terminal.
    Debit,
    /// Sale left open on the customer's account ("em aberto").
    OnAccount,
}

impl PaymentMethod {
    /// Whether this method involves physical cash in the drawer.
    #[inline]
    pub const fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode (EAN-13 and friends); optional, some items are loose goods.
    pub barcode: Option<String>,

    /// Display name shown to the cashier and on the ticket.
    pub name: String,

    /// Price in centavos.
    pub price_cents: i64,

    /// Category for reporting.
    pub category: Option<Category>,

    /// Current stock level. `None` means stock is not tracked.
    pub stock: Option<i64>,

    /// Whether selling decrements and checks stock.
    pub track_stock: bool,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if the product can be sold at the given quantity
    /// (enough stock, or stock not tracked).
    pub fn can_sell(&self, quantity: i64) -> bool {
        if !self.track_stock {
            return true;
        }
        self.stock.unwrap_or(0) >= quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
