//! # Permissive Numeric Input Parsing
//!
//! The PDV screen treats malformed quantity and amount text as zero
//! instead of raising an error. That policy is deliberate: a cashier
//! mid-transaction should never be blocked by a half-typed field, and a
//! zeroed field is visibly wrong on screen.
//!
//! All coercion to centavos happens here, at the input boundary. Nothing
//! past this module ever sees decimal text.
//!
//! ## Locale Policy
//! Parsing accepts `.` and `,` as decimal separators (both appeared in the
//! field). When both occur, the last one is the decimal separator and the
//! others are grouping: `"1.234,56"` is R$ 1.234,56. Formatting is pinned
//! to the pt-BR comma in [`crate::money`].

use crate::money::Money;

/// Parses a quantity field.
///
/// Takes the leading run of ASCII digits, like the original screen's
/// `parseInt`. Empty, malformed, or negative input yields 0.
///
/// ```rust
/// use pdv_core::parse::parse_quantity;
///
/// assert_eq!(parse_quantity("3"), 3);
/// assert_eq!(parse_quantity("  12 "), 12);
/// assert_eq!(parse_quantity("12.5"), 12);
/// assert_eq!(parse_quantity(""), 0);
/// assert_eq!(parse_quantity("abc"), 0);
/// assert_eq!(parse_quantity("-4"), 0);
/// ```
pub fn parse_quantity(raw: &str) -> i64 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Parses an amount field into [`Money`].
///
/// Accepts an optional `R$` prefix and sign, digits, grouping separators
/// and a `.` or `,` decimal separator. Fractions beyond two places round
/// half-up. Anything malformed yields `Money::zero()`.
///
/// ```rust
/// use pdv_core::money::Money;
/// use pdv_core::parse::parse_money;
///
/// assert_eq!(parse_money("25,00"), Money::from_cents(2500));
/// assert_eq!(parse_money("25.00"), Money::from_cents(2500));
/// assert_eq!(parse_money("R$ 1.234,56"), Money::from_cents(123456));
/// assert_eq!(parse_money("3,335"), Money::from_cents(334));
/// assert_eq!(parse_money(""), Money::zero());
/// assert_eq!(parse_money("abc"), Money::zero());
/// ```
pub fn parse_money(raw: &str) -> Money {
    let cleaned = raw.trim().trim_start_matches("R$").trim();
    if cleaned.is_empty() {
        return Money::zero();
    }

    let negative = cleaned.starts_with('-');
    let body = cleaned.trim_start_matches(['-', '+']);

    if body.is_empty()
        || !body
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',' || c == ' ')
    {
        return Money::zero();
    }

    // Last '.' or ',' is the decimal separator; earlier ones are grouping.
    let (int_part, frac_part) = match body.rfind(['.', ',']) {
        Some(pos) => (&body[..pos], &body[pos + 1..]),
        None => (body, ""),
    };

    let int_digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();
    let frac_digits: String = frac_part.chars().filter(|c| c.is_ascii_digit()).collect();
    if frac_digits.len() != frac_part.len() {
        // Grouping characters after the decimal separator are malformed.
        return Money::zero();
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Money::zero();
    }

    let reais: i64 = match int_digits.parse() {
        Ok(v) => v,
        Err(_) if int_digits.is_empty() => 0,
        Err(_) => return Money::zero(),
    };

    let frac_cents = round_frac_to_cents(&frac_digits);

    let cents = match reais.checked_mul(100).and_then(|c| c.checked_add(frac_cents)) {
        Some(c) => c,
        None => return Money::zero(),
    };

    if negative {
        Money::from_cents(-cents)
    } else {
        Money::from_cents(cents)
    }
}

/// Converts a fractional digit string to centavos, rounding half-up on
/// the third digit.
fn round_frac_to_cents(frac: &str) -> i64 {
    let digit = |i: usize| frac.as_bytes().get(i).map(|b| (b - b'0') as i64);
    match frac.len() {
        0 => 0,
        1 => digit(0).unwrap_or(0) * 10,
        _ => {
            let base = digit(0).unwrap_or(0) * 10 + digit(1).unwrap_or(0);
            let round_up = digit(2).map(|d| d >= 5).unwrap_or(false);
            base + if round_up { 1 } else { 0 }
        }
    }
}
