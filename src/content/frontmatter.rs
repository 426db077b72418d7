//! Front-matter parsing

use chrono::{DateTime, Local, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::BuildError;

/// Custom deserializer that handles both a quoted date string and a bare
/// TOML datetime (`updated = 2023-05-16`), normalizing to a string.
fn date_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, MapAccess, Visitor};
    use std::fmt;

    struct DateOrString;

    impl<'de> Visitor<'de> for DateOrString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an ISO-8601 date or datetime")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            // Bare TOML datetimes surface through serde as a one-entry map
            let dt = toml::value::Datetime::deserialize(de::value::MapAccessDeserializer::new(
                map,
            ))?;
            Ok(Some(dt.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(DateOrString)
}

/// Front-matter data from a post or page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "date_or_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(deserialize_with = "date_or_string", skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub draft: bool,

    /// Additional custom fields (`[extra]` table and any unknown keys),
    /// insertion-ordered so re-serialization is stable
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            updated: None,
            description: None,
            slug: None,
            draft: false,
            extra: IndexMap::new(),
        }
    }
}

const DELIMITER: &str = "+++";

impl FrontMatter {
    /// Parse front-matter from a source string.
    /// Returns (front_matter, remaining_body).
    ///
    /// The block is delimited by `+++` lines and must be well-formed TOML.
    /// An opening delimiter with no terminator, or invalid key-value syntax
    /// inside the block, fails the page load. A source with no opening
    /// delimiter simply has no front matter.
    pub fn parse(source: &str) -> Result<(Self, &str), BuildError> {
        let trimmed = source.trim_start();

        if !trimmed.starts_with(DELIMITER) {
            return Ok((FrontMatter::default(), source));
        }

        let rest = &trimmed[DELIMITER.len()..];
        let rest = rest.strip_prefix('\r').unwrap_or(rest);
        let Some(rest) = rest.strip_prefix('\n') else {
            // Opening "+++" must stand alone on its line
            return Err(BuildError::MalformedFrontMatter {
                reason: "opening delimiter is not on its own line".to_string(),
            });
        };

        let Some(end_pos) = find_terminator(rest) else {
            return Err(BuildError::MalformedFrontMatter {
                reason: "unterminated front-matter block".to_string(),
            });
        };

        let block = &rest[..end_pos];
        let remaining = rest[end_pos..]
            .trim_start_matches(|c| c != '\n')
            .trim_start_matches(['\n', '\r']);

        if block.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm: FrontMatter =
            toml::from_str(block).map_err(|e| BuildError::MalformedFrontMatter {
                reason: e.message().to_string(),
            })?;

        Ok((fm, remaining))
    }

    /// Re-serialize the mapping as TOML (parse → serialize → parse is
    /// idempotent)
    pub fn to_toml(&self) -> Result<String, BuildError> {
        toml::to_string(self).map_err(|e| BuildError::MalformedFrontMatter {
            reason: e.to_string(),
        })
    }

    /// Parse the date field into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_ref().and_then(|s| parse_date_string(s))
    }

    /// Parse the updated field into a DateTime
    pub fn parse_updated(&self) -> Option<DateTime<Local>> {
        self.updated.as_ref().and_then(|s| parse_date_string(s))
    }

    /// Whether `extra.in_header = true` was set
    pub fn in_header(&self) -> bool {
        self.extra
            .get("extra")
            .and_then(|v| v.get("in_header"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// Find the byte offset of the closing delimiter line.
///
/// The terminator must be exactly `+++` apart from trailing whitespace; a
/// line that merely starts with `+++` stays part of the block.
fn find_terminator(rest: &str) -> Option<usize> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Parse an ISO-8601 date or datetime string
fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(
                dt,
                *Local::now().offset(),
            ));
        }
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::from_naive_utc_and_offset(
                dt,
                *Local::now().offset(),
            ));
        }
    }

    // Offset-carrying forms (RFC 3339)
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    None
}
