//! Conversions between raw sysfs text and typed values
//!
//! Each codec is the pair of read/write conversions for one kind of
//! attribute. Raw text reaching `decode` has already been stripped of
//! trailing whitespace.

use std::fmt;

use super::color::{LedColor, LedColorMap};
use crate::constants::scale;
use crate::error::{HalError, Result};

/// Why a conversion failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Text is not a valid encoding (transient, treated as an absent reading)
    Parse(String),
    /// Value has no entry in a discrete map (configuration mismatch)
    Unmapped(String),
}

pub trait Codec: Send + Sync {
    type Value: fmt::Debug;

    /// Short name used when logging entries
    const KIND: &'static str;

    fn decode(&self, raw: &str) -> std::result::Result<Self::Value, ConvertError>;

    fn encode(&self, value: &Self::Value) -> std::result::Result<String, ConvertError>;
}

fn parse_int(raw: &str) -> std::result::Result<i64, ConvertError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| ConvertError::Parse(e.to_string()))
}

/// Text passed through untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
    type Value = String;
    const KIND: &'static str = "SysfsEntry";

    fn decode(&self, raw: &str) -> std::result::Result<String, ConvertError> {
        Ok(raw.to_string())
    }

    fn encode(&self, value: &String) -> std::result::Result<String, ConvertError> {
        Ok(value.clone())
    }
}

/// Decimal integers
#[derive(Debug, Clone, Copy, Default)]
pub struct IntCodec;

impl Codec for IntCodec {
    type Value = i64;
    const KIND: &'static str = "SysfsEntryInt";

    fn decode(&self, raw: &str) -> std::result::Result<i64, ConvertError> {
        parse_int(raw)
    }

    fn encode(&self, value: &i64) -> std::result::Result<String, ConvertError> {
        Ok(value.to_string())
    }
}

/// Closed integer interval `[lo, hi]` used as one side of a linear remap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearRange {
    pub lo: i64,
    pub hi: i64,
}

impl LinearRange {
    pub const fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    pub const PERCENT: LinearRange = LinearRange::new(0, 100);

    fn span(&self) -> Option<i64> {
        self.hi.checked_sub(self.lo)
    }
}

/// Floor division, matching the register granularity of the hardware
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

/// Affine remap of `value` from `from` onto `to`, rounding down.
///
/// Returns `None` when an intermediate step leaves the `i64` range or
/// `from` is degenerate.
pub fn linear_rescale(value: i64, from: LinearRange, to: LinearRange) -> Option<i64> {
    let scaled = value.checked_sub(from.lo)?.checked_mul(to.span()?)?;
    floor_div(scaled, from.span()?)?.checked_add(to.lo)
}

fn rescale_or_err(
    value: i64,
    from: LinearRange,
    to: LinearRange,
) -> std::result::Result<i64, ConvertError> {
    linear_rescale(value, from, to)
        .ok_or_else(|| ConvertError::Parse(format!("{} is out of range", value)))
}

/// Integers stored in one range and exposed in another, e.g. a PWM duty
/// cycle `0..=255` exposed as a percentage
#[derive(Debug, Clone, Copy)]
pub struct LinearCodec {
    from: LinearRange,
    to: LinearRange,
}

impl LinearCodec {
    /// `from` is the raw register range, `to` the exposed range
    pub fn new(from: LinearRange, to: LinearRange) -> Result<Self> {
        let usable = |r: LinearRange| !matches!(r.span(), None | Some(0));
        if !usable(from) || !usable(to) {
            return Err(HalError::InvalidRange {
                from: (from.lo, from.hi),
                to: (to.lo, to.hi),
            });
        }
        Ok(Self { from, to })
    }

    pub fn from_range(&self) -> LinearRange {
        self.from
    }

    pub fn to_range(&self) -> LinearRange {
        self.to
    }
}

impl Codec for LinearCodec {
    type Value = i64;
    const KIND: &'static str = "SysfsEntryIntLinear";

    fn decode(&self, raw: &str) -> std::result::Result<i64, ConvertError> {
        rescale_or_err(parse_int(raw)?, self.from, self.to)
    }

    fn encode(&self, value: &i64) -> std::result::Result<String, ConvertError> {
        rescale_or_err(*value, self.to, self.from).map(|raw| raw.to_string())
    }
}

/// Fixed-point integers (millidegrees, millivolts, microwatts) exposed as
/// floating point engineering units
#[derive(Debug, Clone, Copy)]
pub struct FloatCodec {
    scale: f64,
}

impl FloatCodec {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for FloatCodec {
    fn default() -> Self {
        Self::new(scale::MILLI)
    }
}

impl Codec for FloatCodec {
    type Value = f64;
    const KIND: &'static str = "SysfsEntryFloat";

    fn decode(&self, raw: &str) -> std::result::Result<f64, ConvertError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| ConvertError::Parse(e.to_string()))?;
        Ok(value / self.scale)
    }

    fn encode(&self, value: &f64) -> std::result::Result<String, ConvertError> {
        let scaled = (value * self.scale).round();
        // NaN fails the range check as well
        if !(i64::MIN as f64..i64::MAX as f64).contains(&scaled) {
            return Err(ConvertError::Parse(format!("{} is not representable", value)));
        }
        Ok((scaled as i64).to_string())
    }
}

/// `0` is false, anything else is true; written back as `0`/`1`
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    type Value = bool;
    const KIND: &'static str = "SysfsEntryBool";

    fn decode(&self, raw: &str) -> std::result::Result<bool, ConvertError> {
        Ok(parse_int(raw)? != 0)
    }

    fn encode(&self, value: &bool) -> std::result::Result<String, ConvertError> {
        Ok(if *value { "1" } else { "0" }.to_string())
    }
}

/// Brightness codes mapped onto colors
#[derive(Debug, Clone, Default)]
pub struct LedColorCodec {
    map: LedColorMap,
}

impl LedColorCodec {
    pub fn new(map: LedColorMap) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &LedColorMap {
        &self.map
    }
}

impl Codec for LedColorCodec {
    type Value = LedColor;
    const KIND: &'static str = "SysfsEntryCustomLed";

    fn decode(&self, raw: &str) -> std::result::Result<LedColor, ConvertError> {
        let code = parse_int(raw)?;
        self.map
            .color(code)
            .ok_or_else(|| ConvertError::Unmapped(code.to_string()))
    }

    fn encode(&self, value: &LedColor) -> std::result::Result<String, ConvertError> {
        self.map
            .code(*value)
            .map(|code| code.to_string())
            .ok_or_else(|| ConvertError::Unmapped(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PWM: LinearRange = LinearRange::new(0, 255);

    #[test]
    fn test_linear_rescale_pwm_to_percent() {
        assert_eq!(linear_rescale(0, PWM, LinearRange::PERCENT), Some(0));
        assert_eq!(linear_rescale(255, PWM, LinearRange::PERCENT), Some(100));
        assert_eq!(linear_rescale(128, PWM, LinearRange::PERCENT), Some(50));
        assert_eq!(linear_rescale(127, PWM, LinearRange::PERCENT), Some(49));
    }

    #[test]
    fn test_linear_rescale_with_offsets() {
        let from = LinearRange::new(10, 20);
        let to = LinearRange::new(100, 200);
        assert_eq!(linear_rescale(10, from, to), Some(100));
        assert_eq!(linear_rescale(15, from, to), Some(150));
        assert_eq!(linear_rescale(20, from, to), Some(200));
    }

    #[test]
    fn test_linear_rescale_floors_negative() {
        let from = LinearRange::new(0, 3);
        let to = LinearRange::new(0, 1);
        assert_eq!(linear_rescale(-1, from, to), Some(-1));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(7, 2), Some(3));
    }

    #[test]
    fn test_linear_round_trip_within_one() {
        let codec = LinearCodec::new(PWM, LinearRange::PERCENT).unwrap();
        for pct in 0..=100 {
            let raw = codec.encode(&pct).unwrap();
            let back = codec.decode(&raw).unwrap();
            assert!((back - pct).abs() <= 1, "{} -> {} -> {}", pct, raw, back);
        }
        for pwm in 0..=255 {
            let pct = codec.decode(&pwm.to_string()).unwrap();
            let back: i64 = codec.encode(&pct).unwrap().parse().unwrap();
            assert!((back - pwm).abs() <= 3, "{} -> {} -> {}", pwm, pct, back);
        }
    }

    #[test]
    fn test_linear_rejects_degenerate_range() {
        assert!(matches!(
            LinearCodec::new(LinearRange::new(5, 5), LinearRange::PERCENT),
            Err(HalError::InvalidRange { .. })
        ));
        assert!(matches!(
            LinearCodec::new(LinearRange::new(i64::MIN, i64::MAX), LinearRange::PERCENT),
            Err(HalError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_linear_overflow_is_parse_error() {
        let codec = LinearCodec::new(PWM, LinearRange::PERCENT).unwrap();
        assert!(matches!(
            codec.decode("9223372036854775807"),
            Err(ConvertError::Parse(_))
        ));
        assert!(matches!(
            codec.decode("-9223372036854775808"),
            Err(ConvertError::Parse(_))
        ));
        assert!(matches!(codec.encode(&i64::MAX), Err(ConvertError::Parse(_))));
        assert_eq!(linear_rescale(i64::MIN, PWM, LinearRange::PERCENT), None);
    }

    #[test]
    fn test_float_decode_scales() {
        let codec = FloatCodec::default();
        assert_eq!(codec.decode("45000").unwrap(), 45.0);
        assert_eq!(codec.decode("-2500").unwrap(), -2.5);
        let power = FloatCodec::new(scale::MICRO);
        assert_eq!(power.decode("12500000").unwrap(), 12.5);
    }

    #[test]
    fn test_float_round_trip_within_precision() {
        let codec = FloatCodec::default();
        for x in [0.0, 12.345, 85.0, -40.125, 0.0004, 1234.5678] {
            let back = codec.decode(&codec.encode(&x).unwrap()).unwrap();
            assert!((back - x).abs() <= 1.0 / codec.scale(), "{} -> {}", x, back);
        }
    }

    #[test]
    fn test_float_rejects_garbage() {
        assert!(matches!(
            FloatCodec::default().decode("abc"),
            Err(ConvertError::Parse(_))
        ));
        assert!(FloatCodec::default().encode(&f64::NAN).is_err());
    }

    #[test]
    fn test_float_encode_rejects_out_of_range() {
        let codec = FloatCodec::default();
        for x in [1e300, -1e300, f64::INFINITY, 9.3e15] {
            assert!(
                matches!(codec.encode(&x), Err(ConvertError::Parse(_))),
                "{} should not encode",
                x
            );
        }
        assert_eq!(codec.encode(&9.2e15).unwrap(), "9200000000000000000");
    }

    #[test]
    fn test_bool_codec() {
        let codec = BoolCodec;
        assert!(!codec.decode("0").unwrap());
        assert!(codec.decode("1").unwrap());
        assert!(codec.decode("4").unwrap());
        for b in [true, false] {
            assert_eq!(codec.decode(&codec.encode(&b).unwrap()).unwrap(), b);
        }
    }

    #[test]
    fn test_led_color_codec_unmapped() {
        let codec = LedColorCodec::default();
        assert_eq!(codec.decode("3").unwrap(), LedColor::Amber);
        assert_eq!(
            codec.decode("9"),
            Err(ConvertError::Unmapped("9".to_string()))
        );
        assert!(matches!(
            codec.encode(&LedColor::Blue),
            Err(ConvertError::Unmapped(_))
        ));
    }
}
