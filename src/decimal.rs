// This file contains a small exact decimal type. Completeness and contamination values are
// parsed into it so that the quality thresholds (e.g. contamination <= 5) are compared exactly,
// without binary floating point rounding.

// Copyright 2025 Fa Zhang

// This file is part of magqc. magqc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option) any later version. magqc is distributed
// in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details. You should have received a copy of the GNU General Public License along with
// magqc. If not, see <http://www.gnu.org/licenses/>.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, Sub};
use std::str::FromStr;


// Parsed values have at most MAX_INTEGER_DIGITS digits before the decimal point and are rounded to
// MAX_SCALE fractional digits. Every rescaled mantissa then stays below 10^36, inside i128 even
// after the QS arithmetic.
const MAX_INTEGER_DIGITS: i64 = 16;
const MAX_SCALE: i64 = 20;


#[derive(Clone, Copy, Debug)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    fn rescaled(&self, scale: u32) -> i128 {
        self.mantissa * 10i128.pow(scale - self.scale)
    }

    fn normalised(mut self) -> Self {
        while self.scale > 0 && self.mantissa % 10 == 0 {
            self.mantissa /= 10;
            self.scale -= 1;
        }
        self
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal { mantissa: value as i128, scale: 0 }
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, other: Decimal) -> Decimal {
        let scale = self.scale.max(other.scale);
        Decimal { mantissa: self.rescaled(scale) - other.rescaled(scale), scale }.normalised()
    }
}

impl Mul<i64> for Decimal {
    type Output = Decimal;

    fn mul(self, factor: i64) -> Decimal {
        Decimal { mantissa: self.mantissa * factor as i128, scale: self.scale }.normalised()
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.rescaled(scale).cmp(&other.rescaled(scale))
    }
}

impl fmt::Display for Decimal {
    // Shortest exact form: 65.00 prints as 65 and 4.50 as 4.5.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.normalised();
        let sign = if d.mantissa < 0 { "-" } else { "" };
        let digits = d.mantissa.unsigned_abs();
        if d.scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let divisor = 10u128.pow(d.scale);
        write!(f, "{}{}.{:0width$}", sign, digits / divisor, digits % divisor,
               width = d.scale as usize)
    }
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDecimalError(String);

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal number: {:?}", self.0)
    }
}

impl std::error::Error for ParseDecimalError {}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accepts an optional sign, digits, an optional fractional part and an optional exponent
        // (e.g. "-1", "95.45", ".5", "3.", "9.5e1", "1E-05").
        let err = || ParseDecimalError(s.to_string());
        let (negative, unsigned) = split_sign(s);
        let (coefficient, exponent) = match unsigned.find(['e', 'E']) {
            Some(i) => (&unsigned[..i], parse_exponent(&unsigned[i + 1..]).ok_or_else(err)?),
            None    => (unsigned, 0),
        };
        let (int_part, frac_part) = coefficient.split_once('.').unwrap_or((coefficient, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) || int_part.len() + frac_part.len() == 0 {
            return Err(err());
        }
        let digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).map(|b| b - b'0').collect();
        let scale = frac_part.len() as i64 - exponent;
        Decimal::from_digits(&digits, scale, negative).ok_or_else(err)
    }
}


impl Decimal {
    // Builds the value digits * 10^-scale, rounding half away from zero past MAX_SCALE.
    fn from_digits(digits: &[u8], scale: i64, negative: bool) -> Option<Self> {
        let first_nonzero = digits.iter().position(|&d| d != 0);
        let Some(first_nonzero) = first_nonzero else {
            return Some(Decimal::from(0));
        };
        let digits = &digits[first_nonzero..];
        if digits.len() as i64 - scale > MAX_INTEGER_DIGITS {
            return None;
        }
        let (kept, round_up, scale) = if scale > MAX_SCALE {
            let keep = digits.len() as i64 - (scale - MAX_SCALE);
            if keep < 0 {
                (&digits[..0], false, MAX_SCALE)
            } else {
                let keep = keep as usize;
                (&digits[..keep], digits.get(keep).is_some_and(|&d| d >= 5), MAX_SCALE)
            }
        } else {
            (digits, false, scale)
        };
        let mut mantissa = kept.iter().fold(0i128, |m, &d| m * 10 + d as i128);
        if round_up {
            mantissa += 1;
        }
        if scale < 0 {
            mantissa *= 10i128.pow((-scale) as u32);
        }
        if negative {
            mantissa = -mantissa;
        }
        Some(Decimal { mantissa, scale: scale.max(0) as u32 }.normalised())
    }
}


fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _          => (false, s),
    }
}


fn parse_exponent(s: &str) -> Option<i64> {
    let (negative, digits) = split_sign(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i64 = digits.parse::<i32>().ok()?.into();
    Some(if negative { -value } else { value })
}
