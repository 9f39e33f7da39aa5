/// Serde utility functions for remote identifiers
use serde::{Deserialize, Deserializer};
use std::fmt;

struct IdVisitor;

impl<'de> serde::de::Visitor<'de> for IdVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or integer identifier")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(v.to_string())
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(v)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(v.to_string())
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(v.to_string())
    }
}

/// Deserialize an identifier that the remote API may send as a JSON string or number.
///
/// Usage:
/// ```ignore
/// #[derive(Deserialize)]
/// struct Example {
///     #[serde(deserialize_with = "crate::serde_utils::string_or_int")]
///     id: String,
/// }
/// ```
pub fn string_or_int<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    de.deserialize_any(IdVisitor)
}

/// Optional variant of [`string_or_int`]: `null` or a missing field become `None`.
///
/// Pair with `#[serde(default)]` so a missing field is accepted.
pub fn opt_string_or_int<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "string_or_int")] String);

    Option::<Wrapper>::deserialize(de).map(|w| w.map(|Wrapper(id)| id))
}
