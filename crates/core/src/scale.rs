// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Linear scaling of sensor readings into a single byte.
//!
//! A reading `v` within `[min, max]` maps to a raw byte `x` such that
//! `v ≈ (m·x + b·10^b_exp) · 10^r_exp`. `m` is a signed 10-bit integer and
//! the exponents are signed 4-bit integers. `b` may use all 16 bits: only
//! the raw byte is ever recorded, and a wider offset keeps raw 0 close to
//! `min` when the range is narrow relative to its magnitude. Raw 0 tracks
//! `min` and raw 255 tracks `max`.

use thiserror::Error;

const MAX_10BIT: f64 = 511.0;
const MAX_4BIT: i8 = 7;
const MIN_4BIT: i8 = -8;
const FULL_SCALE: f64 = 255.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("illegal sensor range: max {max} must exceed min {min}")]
    IllegalRange { min: f64, max: f64 },
    #[error("sensor attributes must be finite")]
    NonFinite,
    #[error("range [{min}, {max}] cannot be represented by scaling coefficients")]
    Unrepresentable { min: f64, max: f64 },
}

/// Scaling coefficients for one sensor range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coefficients {
    pub m: i16,
    pub r_exp: i8,
    pub b: i16,
    pub b_exp: i8,
}

impl Coefficients {
    /// Reading represented by a raw byte
    pub fn decode(&self, raw: u8) -> f64 {
        (f64::from(self.m) * f64::from(raw) + f64::from(self.b) * pow10(self.b_exp))
            * pow10(self.r_exp)
    }

    /// Raw byte for a reading, rounded half away from zero and clamped
    pub fn scale(&self, value: f64) -> u8 {
        let offset = f64::from(self.b) * pow10(self.r_exp + self.b_exp);
        let x = (pow10(-self.r_exp) * (value - offset)) / f64::from(self.m);
        // f64::round rounds half away from zero; `as` saturates
        x.round().clamp(0.0, FULL_SCALE) as u8
    }
}

fn pow10(exp: i8) -> f64 {
    10f64.powf(f64::from(exp))
}

/// Derive coefficients covering `[min, max]`.
///
/// Searches from the finest multiplier exponent upward, and for each from
/// the finest offset exponent upward, for the first fit whose step is at
/// most two ideal steps. Rounding then loses at most one ideal step.
pub fn derive_coefficients(min: f64, max: f64) -> Result<Coefficients, ScaleError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ScaleError::NonFinite);
    }
    if max <= min {
        return Err(ScaleError::IllegalRange { min, max });
    }
    let range = max - min;
    let ideal_step = range / FULL_SCALE;

    for r_exp in MIN_4BIT..=MAX_4BIT {
        if ideal_step * pow10(-r_exp) > MAX_10BIT {
            continue;
        }
        for b_exp in MIN_4BIT..=MAX_4BIT {
            if let Some(coeffs) = fit(min, max, r_exp, b_exp, ideal_step) {
                return Ok(coeffs.normalized());
            }
        }
    }
    Err(ScaleError::Unrepresentable { min, max })
}

/// Offset floored and multiplier ceiled so raw 0 never sits above `min`
/// and raw 255 never sits below `max`
fn fit(min: f64, max: f64, r_exp: i8, b_exp: i8, ideal_step: f64) -> Option<Coefficients> {
    let unit = pow10(b_exp + r_exp);
    let b = (min / unit + 1e-9).floor();
    if b < f64::from(i16::MIN) || b > f64::from(i16::MAX) {
        return None;
    }
    let offset = b * unit;
    let m = ((max - offset) / FULL_SCALE * pow10(-r_exp) - 1e-9).ceil();
    if !(1.0..=MAX_10BIT).contains(&m) || m * pow10(r_exp) > 2.0 * ideal_step {
        return None;
    }
    Some(Coefficients {
        m: m as i16,
        r_exp,
        b: b as i16,
        b_exp,
    })
}

impl Coefficients {
    /// Strip trailing decimal zeros from `m` and `b` into the exponents
    fn normalized(mut self) -> Self {
        if self.b == 0 {
            self.b_exp = 0;
        }
        while self.m % 10 == 0 && self.r_exp < MAX_4BIT && self.b_exp > MIN_4BIT {
            self.m /= 10;
            self.r_exp += 1;
            self.b_exp -= 1;
        }
        while self.b != 0 && self.b % 10 == 0 && self.b_exp < MAX_4BIT {
            self.b /= 10;
            self.b_exp += 1;
        }
        if self.b == 0 {
            self.b_exp = 0;
        }
        self
    }
}

/// Scale a reading into its raw byte for the range `[min, max]`
pub fn scale_value(value: f64, min: f64, max: f64) -> Result<u8, ScaleError> {
    if !value.is_finite() {
        return Err(ScaleError::NonFinite);
    }
    Ok(derive_coefficients(min, max)?.scale(value))
}

#[cfg(test)]
#[path = "scale_tests.rs"]
mod tests;
