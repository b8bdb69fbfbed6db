use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Method;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{CheckStatusResponse, CreateResourceResponse, ProcessInList, ResultRecord};
use super::token::LoginToken;
use crate::api::ApiClient;
use crate::error::Result;
use crate::logging::ProgressLog;

/// Handle to a scan process running on the service.
///
/// Holds no connection; every operation is a single request/response round
/// trip. The login token is shared with the session that created the handle.
#[derive(Clone)]
pub struct ScanProcess {
    id: Uuid,
    created_at: DateTime<Utc>,
    custom_fields: HashMap<String, String>,
    token: Arc<LoginToken>,
    client: Arc<ApiClient>,
    known_complete: bool,
}

impl ScanProcess {
    /// Handle for a process returned by the listing endpoint.
    pub fn from_listing(
        client: Arc<ApiClient>,
        token: Arc<LoginToken>,
        listing: ProcessInList,
    ) -> Self {
        let known_complete = listing.is_finished();
        Self {
            id: listing.process_id,
            created_at: listing.created_time,
            custom_fields: listing.custom_fields.unwrap_or_default(),
            token,
            client,
            known_complete,
        }
    }

    /// Handle for a freshly submitted process.
    pub fn from_creation(
        client: Arc<ApiClient>,
        token: Arc<LoginToken>,
        response: CreateResourceResponse,
        custom_fields: HashMap<String, String>,
    ) -> Self {
        Self {
            id: response.process_id,
            created_at: response.creation_time_utc,
            custom_fields,
            token,
            client,
            known_complete: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn custom_fields(&self) -> &HashMap<String, String> {
        &self.custom_fields
    }

    pub fn is_known_complete(&self) -> bool {
        self.known_complete
    }

    /// Scan progress out of 100.
    ///
    /// A process listed as finished reports 100 without contacting the service.
    pub async fn current_progress(&self) -> Result<u8> {
        self.token.validate()?;

        if self.known_complete {
            return Ok(100);
        }

        let status: CheckStatusResponse = self
            .client
            .get_json(&self.token, &self.id, "status")
            .await?;
        debug!(process_id = %self.id, status = %status.status, progress = status.progress_percents, "Progress fetched");

        // u8 decoding rejects anything outside 0..=255; the rest is clamped
        Ok(status.progress_percents.min(100))
    }

    /// Matches found by the scan, highest similarity first.
    pub async fn results(&self) -> Result<Vec<ResultRecord>> {
        let mut results: Vec<ResultRecord> = self
            .client
            .get_json(&self.token, &self.id, "result")
            .await?;

        results.sort_by_key(|record| Reverse(record.percents));
        debug!(process_id = %self.id, count = results.len(), "Results fetched");

        Ok(results)
    }

    /// Remove the process and its results from the service.
    pub async fn delete(&self) -> Result<()> {
        self.client
            .execute(&self.token, Method::DELETE, &self.id, "delete")
            .await?;
        info!(process_id = %self.id, "Process deleted");
        Ok(())
    }

    /// Poll `current_progress` every `interval` until it reaches 100.
    ///
    /// The first error ends the wait. Returns the number of polls made.
    pub async fn wait_for_completion(&self, interval: Duration) -> Result<u32> {
        let mut progress_log = ProgressLog::new();
        let mut polls = 0;

        loop {
            let progress = self.current_progress().await?;
            polls += 1;
            if progress >= 100 {
                info!(process_id = %self.id, polls, "Scan complete");
                return Ok(polls);
            }

            if progress_log.changed(progress) {
                info!(process_id = %self.id, progress, "Scan in progress");
            } else {
                debug!(process_id = %self.id, progress, "No progress since last poll");
            }
            tokio::time::sleep(interval).await;
        }
    }
}

impl fmt::Display for ScanProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id.hyphenated())
    }
}

impl fmt::Debug for ScanProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanProcess")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("custom_fields", &self.custom_fields)
            .field("known_complete", &self.known_complete)
            .finish_non_exhaustive()
    }
}

// Chronological by creation time; the id only breaks ties so Eq stays consistent with Ord.
impl Ord for ScanProcess {
    fn cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for ScanProcess {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScanProcess {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScanProcess {}
