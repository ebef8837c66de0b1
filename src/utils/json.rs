//! Strict decoding of generated JSON text.
//!
//! Generated responses are sometimes wrapped in a markdown code fence
//! (```` ```json ... ``` ````). The fence is removed, then the body must decode
//! into the requested type or the call fails with `GenerationParse`.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

/// Remove one enclosing markdown code fence, if present.
pub fn strip_markdown_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Decode generated text into `T`, mapping any mismatch to `GenerationParse`.
pub fn decode_generated<T: DeserializeOwned>(text: &str, what: &str) -> AppResult<T> {
    let body = strip_markdown_fence(text);
    serde_json::from_str(body).map_err(|e| {
        tracing::debug!(what, error = %e, "generated text did not match the expected shape");
        AppError::GenerationParse(format!("{}: {}", what, e))
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<Raw> for String {
    fn from(raw: Raw) -> Self {
        match raw {
            Raw::Text(s) => s,
            Raw::Int(n) => n.to_string(),
            Raw::Float(f) => f.to_string(),
        }
    }
}

/// Accept `"45 minutes"`, `"45"` or `45` for free-form duration fields.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Raw::deserialize(deserializer)?.into())
}

/// Same as [`string_or_number`] for fields that may be absent or `null`.
pub fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Raw>::deserialize(deserializer)?.map(String::from))
}

/// `null` and a missing field both become an empty string.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
