//! # Money Module
//!
//! Provides the `Money` type used at the output boundary of a calculation.
//!
//! ## Float Inside, Integer Outside
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE ROUNDING HAPPENS                                                 │
//! │                                                                         │
//! │  CAPEX / OPEX / NPV math ── f64 all the way through                    │
//! │          │                                                              │
//! │          │  discounting (1+r)^-y and escalation (1+e)^(y-1)            │
//! │          │  keep full precision, nothing is rounded here               │
//! │          ▼                                                              │
//! │  Results assembly ── Money::round(x) ──► whole currency units (i64)    │
//! │                                                                         │
//! │  Rounding per year and then summing drifts; rounding once does not.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tco_core::money::Money;
//!
//! let capex = Money::round(1_234_567.49);
//! assert_eq!(capex.units(), 1_234_567);
//!
//! let savings = Money::round(-12.5);
//! assert_eq!(savings.units(), -13);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole units of the calculation currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: `Sub` is total; reported figures are floored before rounding
/// - **Whole units**: TCO figures are reported to the nearest dollar/euro
/// - **Single field tuple struct**: serializes as a plain JSON integer
///
/// The currency itself lives on the results summary, not on every value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Rounds a floating-point amount to the nearest whole unit.
    ///
    /// Halves round away from zero. Non-finite input becomes zero and
    /// values beyond the i64 range saturate, so the output boundary can
    /// never panic.
    ///
    /// ## Example
    /// ```rust
    /// use tco_core::money::Money;
    ///
    /// assert_eq!(Money::round(10.5).units(), 11);
    /// assert_eq!(Money::round(f64::NAN).units(), 0);
    /// assert_eq!(Money::round(1e30).units(), i64::MAX);
    /// ```
    pub fn round(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // `as` saturates at the i64 bounds.
        Money(amount.round() as i64)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns the value as f64 (for ratios in tests and charts).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with thousands separators, e.g. `-1,234,567`.
///
/// ## Note
/// This is for logs and debugging. Currency symbols and localized grouping
/// belong to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}", sign, grouped)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
