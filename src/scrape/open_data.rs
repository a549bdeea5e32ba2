//! NYC Open Data (Socrata) client
//!
//! Covers the three datasets the monitor touches: 311 service requests
//! filtered by address, and the DOB / OATH-ECB violation datasets keyed
//! by BIN. All fields come back as strings; they are passed through
//! untyped rather than guessed at.

use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::domain::address::parser::Complaint311Address;
use crate::utils::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const COMPLAINTS_RESOURCE: &str = "/resource/erm2-nwe9.json";
const DOB_VIOLATIONS_RESOURCE: &str = "/resource/3h2n-5cm9.json";
const ECB_VIOLATIONS_RESOURCE: &str = "/resource/6bgk-3dad.json";

/// One 311 service request as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Complaint311Record {
    pub incident_id: Option<String>,
    pub incident_address: Option<String>,
    pub borough: Option<String>,
    pub incident_zip: Option<String>,
    pub created_date: Option<String>,
    pub complaint_type: Option<String>,
    pub descriptor: Option<String>,
    pub agency: Option<String>,
    pub status: Option<String>,
    pub closed_date: Option<String>,
    pub resolution_description: Option<String>,
    pub location_type: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenDataClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenDataClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal_error(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// The most recent 311 complaints filed for an address.
    pub async fn recent_complaints(
        &self,
        address: &Complaint311Address,
        limit: u32,
    ) -> Result<Vec<Complaint311Record>, AppError> {
        let where_clause = format!(
            "incident_address='{}' AND borough='{}' AND incident_zip='{}'",
            address.incident_address, address.borough, address.zip
        );

        let complaints: Vec<Complaint311Record> = self
            .get_json(
                COMPLAINTS_RESOURCE,
                &[
                    ("$limit", limit.to_string()),
                    ("$order", "created_date DESC".to_string()),
                    ("$where", where_clause),
                ],
            )
            .await?;

        info!(
            address = %address.incident_address,
            count = complaints.len(),
            "Fetched 311 complaints"
        );
        Ok(complaints)
    }

    /// DOB violation records for a BIN, newest first.
    pub async fn dob_violations_by_bin(
        &self,
        bin: &str,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.violations_by_bin(DOB_VIOLATIONS_RESOURCE, bin).await
    }

    /// OATH/ECB violation records for a BIN, newest first.
    pub async fn ecb_violations_by_bin(
        &self,
        bin: &str,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.violations_by_bin(ECB_VIOLATIONS_RESOURCE, bin).await
    }

    async fn violations_by_bin(
        &self,
        resource: &str,
        bin: &str,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.get_json(
            resource,
            &[
                ("$where", format!("bin='{}'", bin)),
                ("$order", "issue_date DESC".to_string()),
            ],
        )
        .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, resource);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::upstream_error(format!("Open Data request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream_error(format!(
                "Open Data returned {} for {}",
                status, resource
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::upstream_error(format!("Malformed Open Data response: {}", e)))
    }
}
