//! Allowed roles - role tokens a channel is restricted to
//!
//! In memory the roles are an ordered list of tokens. Storage keeps them as a
//! single `", "`-joined string; conversion only happens at that boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Separator used in the stored representation
pub const ROLE_SEPARATOR: &str = ", ";

/// Ordered role tokens; empty means "no role restriction"
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct AllowedRoles(Vec<String>);

impl AllowedRoles {
    /// Build from tokens; surrounding whitespace is trimmed so the stored
    /// form reads back to the same tokens
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            roles
                .into_iter()
                .map(|role| role.into().trim().to_string())
                .collect(),
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r == role)
    }

    /// Stored form: tokens joined with `", "`
    pub fn to_stored(&self) -> String {
        self.0.join(ROLE_SEPARATOR)
    }

    /// Parse the stored form back into tokens
    pub fn from_stored(stored: &str) -> Self {
        Self(
            stored
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect(),
        )
    }
}

impl From<Vec<String>> for AllowedRoles {
    fn from(roles: Vec<String>) -> Self {
        Self::new(roles)
    }
}

impl<'de> Deserialize<'de> for AllowedRoles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_stored(&normalize_roles(&value)))
    }
}

/// Normalize a loosely typed roles value to its stored string.
///
/// A sequence is joined with `", "`, a string is kept as-is and anything else
/// becomes the empty string. Applying it to its own output is a no-op.
pub fn normalize_roles(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(ROLE_SEPARATOR),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}
