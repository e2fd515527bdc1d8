//! Per-source inclusion and field-mapping rules.

use crate::error::ExportError;
use crate::record::{OutputRow, Record};
use std::fmt;
use std::str::FromStr;

/// Origin of an export file; selects the rule applied to every record in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceType {
    Notification,
    Profile,
    UserSegment,
}

/// Country written for every accepted notification record.
/// Notifications are selected by `language == "vi"` but labelled CZ; kept as exported upstream.
pub const NOTIFICATION_COUNTRY: &str = "CZ";
pub const NOTIFICATION_LANGUAGE: &str = "vi";
pub const PROFILE_COUNTRY: &str = "VN";

fn country_key(country: &str) -> String {
    format!("COUNTRY#{}", country)
}

fn user_key(user_id: &str) -> String {
    format!("#USER#{}", user_id)
}

impl SourceType {
    pub const ALL: [SourceType; 3] = [SourceType::Notification, SourceType::Profile, SourceType::UserSegment];

    pub fn tag(&self) -> &'static str {
        match self {
            SourceType::Notification => "NOTIFICATION",
            SourceType::Profile => "PROFILE",
            SourceType::UserSegment => "USER_SEGMENT",
        }
    }

    /// Map a record to an output row, or `None` when the record is filtered out or
    /// lacks a field the row needs.
    pub fn apply(&self, rec: &Record) -> Option<OutputRow> {
        match self {
            SourceType::Notification => {
                if !rec.text_eq("language", NOTIFICATION_LANGUAGE) {
                    return None;
                }
                let user_id = rec.text("userId")?;
                Some(OutputRow {
                    pk: country_key(NOTIFICATION_COUNTRY),
                    sk: user_key(&user_id),
                    country: NOTIFICATION_COUNTRY.to_string(),
                    user_id,
                })
            }
            SourceType::Profile => {
                if !rec.text_eq("country", PROFILE_COUNTRY) {
                    return None;
                }
                let country = rec.text("country")?;
                let user_id = rec.text("userId")?;
                Some(OutputRow { pk: country_key(&country), sk: user_key(&user_id), country, user_id })
            }
            SourceType::UserSegment => Some(OutputRow {
                pk: rec.text("PK")?,
                sk: rec.text("SK")?,
                country: rec.text("country")?,
                user_id: rec.text("userId")?,
            }),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SourceType {
    type Err = ExportError;

    /// Accepts the canonical tags case-insensitively, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase().replace('-', "_");
        match norm.as_str() {
            "NOTIFICATION" | "NOTIFICATIONS" => Ok(SourceType::Notification),
            "PROFILE" | "USER_PROFILE" | "USER_PROFILES" => Ok(SourceType::Profile),
            "USER_SEGMENT" | "USER_SEGMENTS" => Ok(SourceType::UserSegment),
            _ => Err(ExportError::UnknownSource(s.to_string())),
        }
    }
}
