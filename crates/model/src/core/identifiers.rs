use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a single batch run in logs and reports.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random run id, `run-` followed by 12 hex characters.
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self::new(format!("run-{}", &hex[..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Prefix used for generated placeholder identifiers.
pub const PLACEHOLDER_PREFIX: &str = "user_";

/// Generates a placeholder identifier for records that carry none.
///
/// The shape is `user_` followed by the first 8 hex characters of a random
/// v4 UUID, which keeps accidental collisions inside one batch unlikely.
pub fn placeholder_identifier() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{PLACEHOLDER_PREFIX}{}", &hex[..8])
}

/// Returns true when `value` has the shape produced by [`placeholder_identifier`].
pub fn is_placeholder_identifier(value: &str) -> bool {
    value
        .strip_prefix(PLACEHOLDER_PREFIX)
        .is_some_and(|rest| rest.len() == 8 && rest.chars().all(|c| c.is_ascii_hexdigit()))
}
