//! # Arithmetic Guards
//!
//! Named clamps applied inside the calculation. These are documented
//! behavior, not errors: a guard never fails, it bounds a value.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Guard               │ Bound              │ Used by                     │
//! │  ────────────────────┼────────────────────┼──────────────────────────── │
//! │  clamp_pue           │ ≥ 1.0              │ PUE for both systems        │
//! │  clamp_non_negative  │ ≥ 0.0              │ energy, savings, ROI        │
//! │  clamp_percent       │ [0, max]           │ improvement percentages     │
//! │  finite_or_zero      │ NaN / ±∞ → 0.0     │ ratios with tiny divisors   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Lowest physically meaningful PUE.
pub const MIN_PUE: f64 = 1.0;

/// Floors a PUE at 1.0. Non-finite input is treated as the floor.
///
/// ## Example
/// ```rust
/// use tco_core::guards::clamp_pue;
///
/// assert_eq!(clamp_pue(0.93), 1.0);
/// assert_eq!(clamp_pue(1.28), 1.28);
/// ```
#[inline]
pub fn clamp_pue(pue: f64) -> f64 {
    if pue.is_finite() {
        pue.max(MIN_PUE)
    } else {
        MIN_PUE
    }
}

/// Floors a value at zero. NaN becomes zero.
#[inline]
pub fn clamp_non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Bounds a percentage to `[0, max]`. NaN becomes zero.
#[inline]
pub fn clamp_percent(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

/// Replaces NaN and infinities with zero.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
