//! Source origin - who may publish events to, or subscribe to, a channel

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Closed set of origins a channel accepts subscribers or events from.
///
/// Stored and exchanged as the integers 1, 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
#[repr(i16)]
pub enum SourceOrigin {
    /// Server-side application code
    #[default]
    Php = 1,
    /// Client-side script
    Script = 2,
    /// Either of the above
    Either = 3,
}

impl SourceOrigin {
    /// Every supported origin, in stored-value order
    pub const ALL: [SourceOrigin; 3] = [Self::Php, Self::Script, Self::Either];

    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Whether server-side code is an accepted origin
    #[must_use]
    pub fn allows_server(self) -> bool {
        matches!(self, Self::Php | Self::Either)
    }

    /// Whether client-side script is an accepted origin
    #[must_use]
    pub fn allows_script(self) -> bool {
        matches!(self, Self::Script | Self::Either)
    }

    /// Read an origin from a loosely typed attribute value (`2` or `"2"`)
    pub fn from_value(value: &Value) -> Option<Self> {
        coerce_integer(value).and_then(|v| Self::try_from(v).ok())
    }
}

impl TryFrom<i64> for SourceOrigin {
    type Error = InvalidSourceOrigin;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Php),
            2 => Ok(Self::Script),
            3 => Ok(Self::Either),
            other => Err(InvalidSourceOrigin(other)),
        }
    }
}

impl TryFrom<i16> for SourceOrigin {
    type Error = InvalidSourceOrigin;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<SourceOrigin> for i64 {
    fn from(source: SourceOrigin) -> Self {
        i64::from(source.as_i16())
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Php => "php",
            Self::Script => "script",
            Self::Either => "php_or_script",
        };
        f.write_str(label)
    }
}

/// Integer outside the source enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid source origin: {0}")]
pub struct InvalidSourceOrigin(pub i64);

/// Coerce an attribute value to an integer.
///
/// Accepts JSON integers and strings holding an optionally signed run of
/// digits; floats, booleans and everything else are rejected.
pub(crate) fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let s = s.trim();
            let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_from_i64() {
        assert_eq!(SourceOrigin::try_from(1_i64), Ok(SourceOrigin::Php));
        assert_eq!(SourceOrigin::try_from(2_i64), Ok(SourceOrigin::Script));
        assert_eq!(SourceOrigin::try_from(3_i64), Ok(SourceOrigin::Either));
        assert_eq!(SourceOrigin::try_from(0_i64), Err(InvalidSourceOrigin(0)));
        assert_eq!(SourceOrigin::try_from(4_i64), Err(InvalidSourceOrigin(4)));
    }

    #[test]
    fn test_all_in_stored_order() {
        let stored: Vec<i64> = SourceOrigin::ALL.into_iter().map(i64::from).collect();
        assert_eq!(stored, vec![1, 2, 3]);
    }

    #[test]
    fn test_from_value_coercion() {
        assert_eq!(SourceOrigin::from_value(&json!(3)), Some(SourceOrigin::Either));
        assert_eq!(SourceOrigin::from_value(&json!("2")), Some(SourceOrigin::Script));
        assert_eq!(SourceOrigin::from_value(&json!(2.5)), None);
        assert_eq!(SourceOrigin::from_value(&json!("two")), None);
        assert_eq!(SourceOrigin::from_value(&json!(true)), None);
        assert_eq!(SourceOrigin::from_value(&json!(9)), None);
    }

    #[test]
    fn test_origin_permissions() {
        assert!(SourceOrigin::Php.allows_server());
        assert!(!SourceOrigin::Php.allows_script());
        assert!(SourceOrigin::Either.allows_server());
        assert!(SourceOrigin::Either.allows_script());
    }

    #[test]
    fn test_serde_as_integer() {
        assert_eq!(serde_json::to_string(&SourceOrigin::Script).unwrap(), "2");
        let parsed: SourceOrigin = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, SourceOrigin::Either);
        assert!(serde_json::from_str::<SourceOrigin>("5").is_err());
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer(&json!(" -12 ")), Some(-12));
        assert_eq!(coerce_integer(&json!("+")), None);
        assert_eq!(coerce_integer(&json!("1e3")), None);
        assert_eq!(coerce_integer(&json!(null)), None);
    }
}
