use serde::Serialize;
use thiserror::Error;

/// Rejections raised by the software addition model.
#[derive(Debug, Error, PartialEq)]
pub enum FloatError {
    #[error("operand {0} is not finite")]
    NotFinite(f64),
    #[error("operands have differing signs; only same-sign addition is modeled")]
    MixedSigns,
}

/// A finite f64 split into sign and an integral significand with its scale:
///
///   value = (-1)^sign * significand * 2^(exponent - 52)
///
/// Normal numbers carry the implicit leading bit explicitly, so their
/// significand occupies 53 bits. Zeros and subnormals share the fixed
/// exponent -1022 with a significand below 2^52.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FloatParts {
    pub negative: bool,
    pub exponent: i32,
    pub significand: u64,
}

const IMPLICIT_BIT: u64 = 1 << 52;
const FRACTION_MASK: u64 = IMPLICIT_BIT - 1;

impl FloatParts {
    /// Splits a finite f64 into its fields. NaN and infinities are refused;
    /// the addition model below has nothing to teach about them.
    pub fn decompose(value: f64) -> Result<Self, FloatError> {
        if !value.is_finite() {
            return Err(FloatError::NotFinite(value));
        }
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & FRACTION_MASK;

        let (exponent, significand) = if biased == 0 {
            (-1022, fraction)
        } else {
            (biased - 1023, IMPLICIT_BIT | fraction)
        };

        Ok(Self {
            negative,
            exponent,
            significand,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.significand == 0
    }

    /// Reassembles the f64. Exact for every value this module produces
    /// (callers keep at most 53 significant bits); magnitudes past the
    /// normal range overflow to infinity, as hardware does.
    pub fn recompose(&self) -> f64 {
        let sign_bit = (self.negative as u64) << 63;
        if self.significand == 0 {
            return f64::from_bits(sign_bit);
        }

        let mut significand = self.significand;
        let mut exponent = self.exponent;
        while significand >= 1 << 53 {
            significand >>= 1;
            exponent += 1;
        }
        while significand < IMPLICIT_BIT && exponent > -1022 {
            significand <<= 1;
            exponent -= 1;
        }

        if significand < IMPLICIT_BIT {
            // Subnormal: biased exponent field 0, no implicit bit.
            return f64::from_bits(sign_bit | significand);
        }
        let biased = exponent + 1023;
        if biased >= 0x7ff {
            return f64::from_bits(sign_bit | (0x7ff << 52));
        }
        f64::from_bits(sign_bit | ((biased as u64) << 52) | (significand & FRACTION_MASK))
    }
}

/// Every intermediate of one same-sign f64 addition, as floating-point
/// hardware performs it: align, add, renormalize, round to nearest even.
#[derive(Debug, Clone, Serialize)]
pub struct AdditionTrace {
    pub lhs: FloatParts,
    pub rhs: FloatParts,
    /// Right-shift applied to the smaller operand during alignment.
    pub alignment_shift: u32,
    /// Guard bit at the rounding decision (first bit below the result's
    /// least significant bit).
    pub guard: bool,
    /// Round bit (second bit below).
    pub round: bool,
    /// Sticky bit (OR of everything further down).
    pub sticky: bool,
    /// Whether the raw sum carried out of 53 bits and was shifted back.
    pub carried: bool,
    /// Whether round-to-nearest-even incremented the significand.
    pub rounded_up: bool,
    /// The recomposed result. Bit-identical to the hardware sum.
    pub sum: f64,
}

/// Right shift preserving lost information: returns the shifted value and
/// whether any nonzero bit was discarded.
fn shift_right_sticky(value: u64, shift: u32) -> (u64, bool) {
    if shift == 0 {
        (value, false)
    } else if shift >= 64 {
        (0, value != 0)
    } else {
        (value >> shift, value & ((1u64 << shift) - 1) != 0)
    }
}

/// Adds two same-sign finite f64 values bit by bit, recording the full
/// guard/round/sticky walkthrough.
///
/// The significands are widened by three bits. The smaller operand is
/// shifted right until the scales match, discarded bits folding into the
/// sticky position. After the integer add, a carry out of the 53-bit field
/// costs one more right shift, and the three low bits decide the final
/// round-to-nearest-even.
pub fn add_with_trace(a: f64, b: f64) -> Result<AdditionTrace, FloatError> {
    let lhs = FloatParts::decompose(a)?;
    let rhs = FloatParts::decompose(b)?;
    if lhs.negative != rhs.negative && !lhs.is_zero() && !rhs.is_zero() {
        return Err(FloatError::MixedSigns);
    }

    // Sign rule under round-to-nearest: a nonzero operand's sign wins, and
    // +0 + -0 is +0.
    let negative = if !lhs.is_zero() {
        lhs.negative
    } else if !rhs.is_zero() {
        rhs.negative
    } else {
        lhs.negative && rhs.negative
    };

    let (hi, lo) = if (lhs.exponent, lhs.significand) >= (rhs.exponent, rhs.significand) {
        (lhs, rhs)
    } else {
        (rhs, lhs)
    };
    let alignment_shift = (hi.exponent - lo.exponent) as u32;

    // Widen by guard, round, and sticky positions, then align.
    let hi_ext = hi.significand << 3;
    let (mut lo_ext, lost) = shift_right_sticky(lo.significand << 3, alignment_shift);
    if lost {
        lo_ext |= 1;
    }

    let mut sum_ext = hi_ext + lo_ext;
    let mut exponent = hi.exponent;

    // Carry out of the significand field: renormalize one position,
    // folding the dropped bit into sticky.
    let carried = sum_ext >= 1 << 56;
    if carried {
        let dropped = sum_ext & 1;
        sum_ext = (sum_ext >> 1) | dropped;
        exponent += 1;
    }

    let guard = sum_ext & 0b100 != 0;
    let round = sum_ext & 0b010 != 0;
    let sticky = sum_ext & 0b001 != 0;
    let lsb_odd = sum_ext & 0b1000 != 0;

    // Round to nearest, ties to even: below half stays, above half goes up,
    // exactly half goes to the even neighbor.
    let mut significand = sum_ext >> 3;
    let rounded_up = guard && (round || sticky || lsb_odd);
    if rounded_up {
        significand += 1;
        if significand == 1 << 53 {
            significand >>= 1;
            exponent += 1;
        }
    }

    let result = FloatParts {
        negative,
        exponent,
        significand,
    };

    Ok(AdditionTrace {
        lhs,
        rhs,
        alignment_shift,
        guard,
        round,
        sticky,
        carried,
        rounded_up,
        sum: result.recompose(),
    })
}
