use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse length bucket used to parameterize video lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
}

impl DurationBucket {
    /// `<= 10` short, `<= 30` medium, anything longer is long.
    pub fn classify(minutes: f64) -> Self {
        if minutes <= 10.0 {
            DurationBucket::Short
        } else if minutes <= 30.0 {
            DurationBucket::Medium
        } else {
            DurationBucket::Long
        }
    }

    /// Classify a free-form duration such as `"15 minutes"` or `"1 hour"`.
    /// Text with no leading number is treated as long.
    pub fn from_duration_text(text: &str) -> Self {
        match parse_minutes(text) {
            Some(minutes) => Self::classify(minutes),
            None => DurationBucket::Long,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationBucket::Short => "short",
            DurationBucket::Medium => "medium",
            DurationBucket::Long => "long",
        }
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the first number in `text` as minutes, scaling hours.
pub fn parse_minutes(text: &str) -> Option<f64> {
    let text = text.trim().to_ascii_lowercase();
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = number.trim_end_matches('.').parse().ok()?;

    let unit = &text[start + number.len()..];
    if unit.trim_start().starts_with('h') {
        Some(value * 60.0)
    } else {
        Some(value)
    }
}
