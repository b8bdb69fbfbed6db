use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One source the service matched against the scanned content.
///
/// Natural order is `percents`; callers receive collections highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultRecord {
    #[serde(rename = "URL")]
    pub url: String,
    pub percents: u32,
    #[serde(default)]
    pub number_of_copied_words: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeded_comparison: Option<String>,
}

/// Body of the `status` action.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckStatusResponse {
    #[serde(rename = "Status", alias = "status", default)]
    pub status: String,
    #[serde(rename = "ProgressPercents", alias = "progressPercents")]
    pub progress_percents: u8,
}

/// A process as reported by the service's listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessInList {
    pub process_id: Uuid,
    #[serde(deserialize_with = "service_time::deserialize")]
    pub created_time: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub custom_fields: Option<HashMap<String, String>>,
}

impl ProcessInList {
    pub fn is_finished(&self) -> bool {
        self.status.eq_ignore_ascii_case("finished")
    }
}

/// Answer to a resource creation (scan submission) request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResourceResponse {
    #[serde(rename = "ProcessId")]
    pub process_id: Uuid,
    #[serde(
        rename = "CreationTimeUTC",
        deserialize_with = "service_time::deserialize"
    )]
    pub creation_time_utc: DateTime<Utc>,
}

/// Timestamps from the service: RFC 3339, or `dd/MM/yyyy HH:mm:ss` in UTC.
pub(crate) mod service_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    const SERVICE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, SERVICE_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("unrecognised timestamp: {}", raw)))
    }
}
