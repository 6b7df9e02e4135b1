//! COVID Tracking Project download client.
//!
//! The dataset is a single public CSV; one GET, no authentication, no query
//! parameters, no pagination. The client deliberately does not retry and does
//! not configure a timeout, matching the rest of the crate's
//! one-shot-and-propagate behavior.

use log::info;
use reqwest::blocking::Client;

use crate::error::AppError;

/// Historic state-level daily file published by the COVID Tracking Project.
pub const DAILY_CSV_URL: &str = "https://api.covidtracking.com/v1/states/daily.csv";

pub struct CtpClient {
    client: Client,
}

impl CtpClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Download the current daily CSV and return the raw response body.
    ///
    /// Non-success statuses are an error here, before anything touches disk:
    /// writing an HTML error page into a `.csv` snapshot would poison every
    /// later "latest snapshot" lookup.
    pub fn fetch_daily(&self) -> Result<Vec<u8>, AppError> {
        info!("GET {DAILY_CSV_URL}");
        let resp = self
            .client
            .get(DAILY_CSV_URL)
            .send()
            .map_err(|e| AppError::network(format!("Request to {DAILY_CSV_URL} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::network(format!(
                "Dataset request failed with status {status}"
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::network(format!("Failed to read dataset body: {e}")))?;
        info!("received {} bytes (status {status})", body.len());
        Ok(body.to_vec())
    }
}

impl Default for CtpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_url_points_at_the_csv_endpoint() {
        assert!(DAILY_CSV_URL.starts_with("https://"));
        assert!(DAILY_CSV_URL.ends_with("/daily.csv"));
    }
}
