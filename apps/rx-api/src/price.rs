//! `salePrice` as sent by the browser form.
//!
//! Accepts a JSON number (`12.5`), a string (`"12.50"`), an empty string or
//! null. Numbers go through their decimal text, never through `f64`
//! arithmetic, so `19.99` becomes exactly 1999 cents.

use rx_core::Money;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Deserializes an optional price; absent, null and `""` mean "no price".
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return Err(de::Error::custom(format!(
                "salePrice must be a number or decimal string, got {}",
                other
            )))
        }
    };

    text.parse::<Money>().map(Some).map_err(de::Error::custom)
}
