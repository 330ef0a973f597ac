use std::fmt;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A single cell of a table
///
/// Cells arrive already parsed from the file reader: numbers stay numbers, everything else is
/// text. An empty text cell is treated the same way as a missing one.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Returns true for missing cells and empty text
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Text(text) => text.is_empty(),
            Value::Number(_) => false,
        }
    }

    /// Numeric value of the cell, if it is a number or its text coerces to one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            Value::Text(text) if !text.is_empty() => coerce_number(text),
            _ => None,
        }
    }

    /// Returns true if the cell is present and numeric
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Fallback code of a non-numeric cell: first UTF-16 code unit modulo 100
    pub fn fallback_code(&self) -> Option<f64> {
        match self {
            Value::Text(text) => text.encode_utf16().next().map(|unit| (unit % 100) as f64),
            _ => None,
        }
    }

    /// Encode the cell as a feature value
    ///
    /// Numeric cells are used as they are, any other present cell gets its fallback code.
    /// Missing cells can not be encoded.
    pub fn encode(&self) -> Option<f64> {
        if self.is_missing() {
            None
        } else {
            self.as_number().or_else(|| self.fallback_code())
        }
    }
}

/// Loose numeric coercion of text
///
/// Surrounding whitespace is ignored and whitespace-only text becomes zero. Decimal and exponent
/// notation, `Infinity` and unsigned `0x`, `0o` and `0b` integers are accepted.
fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in &[
        ("0x", 16),
        ("0X", 16),
        ("0o", 8),
        ("0O", 8),
        ("0b", 2),
        ("0B", 2),
    ] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(*radix)) {
                return None;
            }
            return u64::from_str_radix(digits, *radix).ok().map(|x| x as f64);
        }
    }

    let (sign, unsigned) = match trimmed.as_bytes()[0] {
        b'+' => (1.0, &trimmed[1..]),
        b'-' => (-1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    // `str::parse` also knows `inf` and `NaN`, neither of which count as numbers here
    let plain = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !plain {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(x) if x.is_infinite() => {
                write!(f, "{}Infinity", if *x < 0.0 { "-" } else { "" })
            }
            Value::Number(x) => write!(f, "{}", x),
            Value::Text(text) => write!(f, "{}", text),
            Value::Missing => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells() {
        assert!(Value::Missing.is_missing());
        assert!(Value::from("").is_missing());
        assert!(!Value::from(" ").is_missing());
        assert!(!Value::from(0.).is_missing());
        assert_eq!(Value::from(None::<f64>), Value::Missing);
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(Value::from("42").as_number(), Some(42.));
        assert_eq!(Value::from(" 3.5 ").as_number(), Some(3.5));
        assert_eq!(Value::from("-1e3").as_number(), Some(-1000.));
        assert_eq!(Value::from(".5").as_number(), Some(0.5));
        assert_eq!(Value::from("0x1F").as_number(), Some(31.));
        assert_eq!(Value::from("0b101").as_number(), Some(5.));
        assert_eq!(Value::from("   ").as_number(), Some(0.));
        assert_eq!(
            Value::from("-Infinity").as_number(),
            Some(f64::NEG_INFINITY)
        );

        assert_eq!(Value::from("abc").as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::from("inf").as_number(), None);
        assert_eq!(Value::from("1e").as_number(), None);
        assert_eq!(Value::from("0x").as_number(), None);
        assert_eq!(Value::from("-0x10").as_number(), None);
        assert_eq!(Value::from("1_000").as_number(), None);
        assert_eq!(Value::from("").as_number(), None);
        assert_eq!(Value::Missing.as_number(), None);
    }

    #[test]
    fn fallback_codes() {
        // 'A' = 65, 'z' = 122, 'é' = 233
        assert_eq!(Value::from("Apple").encode(), Some(65.));
        assert_eq!(Value::from("zebra").encode(), Some(22.));
        assert_eq!(Value::from("été").encode(), Some(33.));
        assert_eq!(Value::from("12").encode(), Some(12.));
        assert_eq!(Value::from("").encode(), None);
        assert_eq!(Value::Missing.encode(), None);
    }

    #[test]
    fn string_form() {
        assert_eq!(Value::from(1.).to_string(), "1");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::from("yes").to_string(), "yes");
        assert_eq!(Value::Missing.to_string(), "");
    }
}
